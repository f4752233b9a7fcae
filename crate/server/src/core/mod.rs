use std::sync::Arc;

use jwt_issuer_crypto::{Jwks, RS256, TokenService, VerificationError, build_jwk, build_jwks};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::{config::ServerParams, result::IssuerResult};

/// A token freshly issued by `/generate-valid-jwt`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedToken {
    pub jwt: String,
    /// The payload actually signed
    pub payload: Map<String, Value>,
    pub kid: String,
    pub algorithm: String,
}

/// The state shared by all the server workers.
///
/// The JWKS is derived once here, before the server binds,
/// and only read afterwards.
pub struct TokenIssuer {
    pub params: Arc<ServerParams>,
    jwks: Jwks,
    token_service: TokenService,
}

impl TokenIssuer {
    #[must_use]
    pub fn instantiate(params: Arc<ServerParams>) -> Self {
        let kid = &params.token_params.kid;
        let jwks = build_jwks(build_jwk(params.key_material.public_key(), kid));
        debug!("JWKS: {jwks:?}");
        let token_service =
            TokenService::new(params.key_material.clone(), params.token_params.clone());
        info!("Token issuer ready, kid: {kid}");
        Self {
            params,
            jwks,
            token_service,
        }
    }

    #[must_use]
    pub const fn jwks(&self) -> &Jwks {
        &self.jwks
    }

    /// Issue a token carrying the configured claims.
    ///
    /// # Errors
    ///
    /// Returns `IssuerError::Signing` if the signature cannot be produced.
    pub fn generate_token(&self) -> IssuerResult<GeneratedToken> {
        let issued = self.token_service.issue()?;
        Ok(GeneratedToken {
            jwt: issued.token,
            payload: issued.payload,
            kid: self.token_service.config().kid.clone(),
            algorithm: RS256.to_owned(),
        })
    }

    /// Verify a token against the issuer key and kid.
    ///
    /// # Errors
    ///
    /// Returns the first `VerificationError` found.
    pub fn verify_token(&self, token: &str) -> Result<Map<String, Value>, VerificationError> {
        self.token_service.verify(token)
    }
}
