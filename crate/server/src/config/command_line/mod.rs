mod clap_config;
mod http_config;
mod keys_config;
mod token_config;

pub use clap_config::{ClapConfig, JWT_ISSUER_CONF_ENV};
pub use http_config::HttpConfig;
pub use keys_config::KeysConfig;
pub use token_config::TokenConfig;
