use std::path::PathBuf;

use clap::Args;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PUBLIC_KEY_FILE: &str = "partner_public.pem";
pub const DEFAULT_PRIVATE_KEY_FILE: &str = "partner_private.key";

/// The RSA key pair used to sign tokens and published in the JWKS.
/// Both files are read once, at startup.
#[derive(Debug, Args, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeysConfig {
    /// The PEM file of the RSA public key
    /// (`BEGIN PUBLIC KEY` or `BEGIN RSA PUBLIC KEY`)
    #[clap(
        long,
        env = "JWT_ISSUER_PUBLIC_KEY_FILE",
        default_value = DEFAULT_PUBLIC_KEY_FILE,
        verbatim_doc_comment
    )]
    pub public_key_file: PathBuf,

    /// The PEM file of the RSA private key
    /// (`BEGIN PRIVATE KEY` or `BEGIN RSA PRIVATE KEY`)
    #[clap(
        long,
        env = "JWT_ISSUER_PRIVATE_KEY_FILE",
        default_value = DEFAULT_PRIVATE_KEY_FILE,
        verbatim_doc_comment
    )]
    pub private_key_file: PathBuf,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            public_key_file: PathBuf::from(DEFAULT_PUBLIC_KEY_FILE),
            private_key_file: PathBuf::from(DEFAULT_PRIVATE_KEY_FILE),
        }
    }
}
