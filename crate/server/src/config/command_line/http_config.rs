use std::fmt::Display;

use clap::Args;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HOSTNAME: &str = "0.0.0.0";

#[derive(Args, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpConfig {
    /// The issuer server port
    #[clap(long, env = "JWT_ISSUER_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// The issuer server hostname
    #[clap(long, env = "JWT_ISSUER_HOSTNAME", default_value = DEFAULT_HOSTNAME)]
    pub hostname: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            hostname: DEFAULT_HOSTNAME.to_owned(),
        }
    }
}

impl Display for HttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "http://{}:{}", self.hostname, self.port)
    }
}

impl std::fmt::Debug for HttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}", &self))
    }
}
