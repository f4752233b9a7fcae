use std::{fmt, path::PathBuf, sync::Arc};

use jwt_issuer_crypto::{ClaimSet, KeyMaterial, TokenConfig as TokenParams};
use tracing::info;

use crate::{
    config::ClapConfig, error::IssuerError, issuer_ensure, result::IssuerResult,
};

/// This structure is the context used by the server
/// while it is running. There is a singleton instance
/// shared between all threads.
pub struct ServerParams {
    pub hostname: String,

    pub port: u16,

    /// Where the key pair was loaded from
    pub public_key_file: PathBuf,
    pub private_key_file: PathBuf,

    /// The key pair, loaded once at startup
    pub key_material: Arc<KeyMaterial>,

    /// The kid, claims and lifetime of the issued tokens
    pub token_params: TokenParams,
}

impl TryFrom<ClapConfig> for ServerParams {
    type Error = IssuerError;

    fn try_from(conf: ClapConfig) -> IssuerResult<Self> {
        issuer_ensure!(
            !conf.http.hostname.is_empty(),
            IssuerError::InvalidRequest("the hostname cannot be empty".to_owned())
        );
        issuer_ensure!(
            !conf.token.kid.is_empty(),
            IssuerError::InvalidRequest("the key identifier (kid) cannot be empty".to_owned())
        );
        issuer_ensure!(
            conf.token.token_lifetime != Some(0),
            IssuerError::InvalidRequest("the token lifetime must be at least 1 second".to_owned())
        );

        let key_material =
            KeyMaterial::from_files(&conf.keys.public_key_file, &conf.keys.private_key_file)?;
        info!(
            "Loaded the {} bits RSA key pair from {} and {}",
            key_material.public_key().bits(),
            conf.keys.public_key_file.display(),
            conf.keys.private_key_file.display()
        );

        Ok(Self {
            hostname: conf.http.hostname,
            port: conf.http.port,
            public_key_file: conf.keys.public_key_file,
            private_key_file: conf.keys.private_key_file,
            key_material: Arc::new(key_material),
            token_params: TokenParams {
                kid: conf.token.kid,
                claims: ClaimSet {
                    partner_id: conf.token.partner_id,
                    scope: conf.token.scope,
                },
                lifetime: conf.token.token_lifetime,
            },
        })
    }
}

impl fmt::Debug for ServerParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("")
            .field("url", &format!("http://{}:{}", self.hostname, self.port))
            .field("public key file", &self.public_key_file)
            .field("private key file", &self.private_key_file)
            .field("key material", &self.key_material)
            .field("token", &self.token_params)
            .finish()
    }
}
