use std::{fmt, path::Path};

use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{HttpConfig, KeysConfig, TokenConfig};
use crate::{
    result::{IssuerResult, IssuerResultHelper},
    telemetry::TelemetryConfig,
};

/// The environment variable naming a TOML configuration file.
/// When set, the file replaces the command line arguments.
pub const JWT_ISSUER_CONF_ENV: &str = "JWT_ISSUER_CONF";

#[derive(Parser, Default, Serialize, Deserialize, PartialEq, Eq)]
#[clap(version, about, long_about = None)]
#[serde(default)]
pub struct ClapConfig {
    #[clap(flatten)]
    pub http: HttpConfig,

    #[clap(flatten)]
    pub keys: KeysConfig,

    #[clap(flatten)]
    pub token: TokenConfig,

    #[clap(flatten)]
    pub telemetry: TelemetryConfig,
}

impl ClapConfig {
    /// Load the configuration from the TOML file named by `JWT_ISSUER_CONF`,
    /// or from the command line arguments and their environment fallbacks.
    ///
    /// # Errors
    ///
    /// Fails if the configuration file cannot be read or parsed.
    pub fn load() -> IssuerResult<Self> {
        match std::env::var(JWT_ISSUER_CONF_ENV) {
            Ok(conf_path) => Self::load_from_file(Path::new(&conf_path)),
            Err(_) => Ok(Self::parse()),
        }
    }

    /// Load the configuration from a TOML file.
    /// Missing entries take their default value.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a valid configuration.
    pub fn load_from_file(conf_path: &Path) -> IssuerResult<Self> {
        debug!("Loading configuration from: {}", conf_path.display());
        let content = std::fs::read_to_string(conf_path).with_context(|| {
            format!("unable to read the configuration file {}", conf_path.display())
        })?;
        Ok(toml::from_str(&content)?)
    }
}

impl fmt::Debug for ClapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut x = f.debug_struct("");
        let x = x
            .field("http", &self.http)
            .field("public key file", &self.keys.public_key_file)
            .field("private key file", &self.keys.private_key_file)
            .field("kid", &self.token.kid)
            .field("partner id", &self.token.partner_id)
            .field("scope", &self.token.scope);
        let x = if let Some(token_lifetime) = &self.token.token_lifetime {
            x.field("token lifetime", token_lifetime)
        } else {
            x
        };
        let x = x.field("telemetry", &self.telemetry);
        x.finish()
    }
}
