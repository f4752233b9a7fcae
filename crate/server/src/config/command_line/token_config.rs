use clap::Args;
use serde::{Deserialize, Serialize};

pub const DEFAULT_KID: &str = "6386cb4d-c0de-4629-a412-8dcf6f50f805";
pub const DEFAULT_PARTNER_ID: &str = "8b5773b4-adea-487c-bcec-f362e8b285bf";
pub const DEFAULT_SCOPE: &str = "issue verify";

/// What goes into the issued tokens
#[derive(Debug, Args, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TokenConfig {
    /// The key identifier put in the token headers and the JWKS.
    /// Only tokens carrying this kid are accepted.
    #[clap(long, env = "JWT_ISSUER_KID", default_value = DEFAULT_KID, verbatim_doc_comment)]
    pub kid: String,

    /// The `partnerId` claim of the issued tokens
    #[clap(long, env = "JWT_ISSUER_PARTNER_ID", default_value = DEFAULT_PARTNER_ID)]
    pub partner_id: String,

    /// The `scope` claim of the issued tokens
    #[clap(long, env = "JWT_ISSUER_SCOPE", default_value = DEFAULT_SCOPE)]
    pub scope: String,

    /// When set, issued tokens carry `iat` and an `exp` this many seconds later.
    /// When not set, issued tokens do not expire.
    #[clap(long, env = "JWT_ISSUER_TOKEN_LIFETIME", verbatim_doc_comment)]
    pub token_lifetime: Option<u64>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            kid: DEFAULT_KID.to_owned(),
            partner_id: DEFAULT_PARTNER_ID.to_owned(),
            scope: DEFAULT_SCOPE.to_owned(),
            token_lifetime: None,
        }
    }
}
