//! RS256 JSON Web Token issuance and verification.
//!
//! [`issue`] and [`verify`] are the primitives. [`TokenService`] binds them
//! to a key pair and a token configuration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, trace};

pub use self::{issue::issue, verify::verify, verify::verify_at};
use crate::{
    CryptoResultHelper,
    error::{CryptoError, result::CryptoResult},
    key_material::KeyMaterial,
};

mod issue;
mod verify;

/// JOSE header of every issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct JwtHeader {
    pub alg: String,
    pub typ: String,
    pub kid: String,
}

/// The fixed set of claims carried by every issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSet {
    pub partner_id: String,
    pub scope: String,
}

impl ClaimSet {
    /// The claims as a JSON object, ready to be extended with time claims
    ///
    /// # Errors
    ///
    /// Fails only if the claim set does not serialize to a JSON object.
    pub fn to_map(&self) -> CryptoResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(CryptoError::Conversion(format!(
                "claim set is not a JSON object: {other}"
            ))),
        }
    }
}

/// What a [`TokenService`] puts in, and expects from, a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    pub kid: String,
    pub claims: ClaimSet,
    /// When set, issued tokens carry `iat` and `exp = iat + lifetime`
    pub lifetime: Option<u64>,
}

/// A freshly signed token and the payload it carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub payload: Map<String, Value>,
}

/// Why a token was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Algorithm mismatch: expected RS256, found {0}")]
    AlgorithmMismatch(String),

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Key identifier mismatch: expected {expected}, found {found}")]
    KidMismatch { expected: String, found: String },

    #[error("Token expired at {exp}")]
    ExpiredToken { exp: i64 },
}

impl VerificationError {
    /// Stable machine-readable tag of the failure
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MalformedToken(_) => "malformed_token",
            Self::AlgorithmMismatch(_) => "algorithm_mismatch",
            Self::InvalidSignature => "invalid_signature",
            Self::KidMismatch { .. } => "kid_mismatch",
            Self::ExpiredToken { .. } => "expired_token",
        }
    }
}

/// Issues and verifies tokens with one key pair and one configuration.
///
/// Cheap to clone: the key material is shared.
#[derive(Debug, Clone)]
pub struct TokenService {
    key_material: Arc<KeyMaterial>,
    config: TokenConfig,
}

impl TokenService {
    #[must_use]
    pub const fn new(key_material: Arc<KeyMaterial>, config: TokenConfig) -> Self {
        Self {
            key_material,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &TokenConfig {
        &self.config
    }

    #[must_use]
    pub fn key_material(&self) -> &KeyMaterial {
        &self.key_material
    }

    /// Issue a token carrying the configured claim set.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Signing`] if the signature cannot be produced.
    pub fn issue(&self) -> CryptoResult<IssuedToken> {
        self.issue_at(now())
    }

    /// Issue a token as if the current time were `now` (seconds since epoch).
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Signing`] if the signature cannot be produced.
    pub fn issue_at(&self, now: i64) -> CryptoResult<IssuedToken> {
        let mut payload = self.config.claims.to_map()?;
        if let Some(lifetime) = self.config.lifetime {
            let exp = i64::try_from(lifetime)
                .ok()
                .and_then(|lifetime| now.checked_add(lifetime))
                .context("the token lifetime overflows the expiry time")?;
            payload.insert("iat".to_owned(), Value::from(now));
            payload.insert("exp".to_owned(), Value::from(exp));
        }
        let token = issue(&payload, &self.config.kid, self.key_material.private_key())?;
        debug!("issued token with kid {}", self.config.kid);
        trace!("issued token payload: {payload:?}");
        Ok(IssuedToken { token, payload })
    }

    /// Verify `token` against the configured kid and the public key.
    ///
    /// # Errors
    ///
    /// Returns the first [`VerificationError`] found.
    pub fn verify(&self, token: &str) -> Result<Map<String, Value>, VerificationError> {
        self.verify_at(token, now())
    }

    /// Verify `token` as if the current time were `now` (seconds since epoch).
    ///
    /// # Errors
    ///
    /// Returns the first [`VerificationError`] found.
    pub fn verify_at(
        &self,
        token: &str,
        now: i64,
    ) -> Result<Map<String, Value>, VerificationError> {
        verify_at(
            token,
            &self.config.kid,
            self.key_material.public_key(),
            now,
        )
    }
}

pub(crate) fn now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{Value, json};

    use super::{ClaimSet, TokenConfig, TokenService, VerificationError};
    use crate::{
        key_material::KeyMaterial,
        tests::{TEST_KID, key_path},
    };

    fn partner_claims() -> ClaimSet {
        ClaimSet {
            partner_id: "8b5773b4-adea-487c-bcec-f362e8b285bf".to_owned(),
            scope: "issue verify".to_owned(),
        }
    }

    fn service(lifetime: Option<u64>) -> TokenService {
        jwt_issuer_logger::log_init(option_env!("RUST_LOG"));
        let key_material = KeyMaterial::from_files(
            &key_path("partner_public.pem"),
            &key_path("partner_private.key"),
        )
        .unwrap();
        TokenService::new(
            Arc::new(key_material),
            TokenConfig {
                kid: TEST_KID.to_owned(),
                claims: partner_claims(),
                lifetime,
            },
        )
    }

    #[test]
    fn claim_set_serialization() {
        let map = partner_claims().to_map().unwrap();
        assert_eq!(
            Value::Object(map),
            json!({"partnerId": "8b5773b4-adea-487c-bcec-f362e8b285bf", "scope": "issue verify"})
        );
    }

    #[test]
    fn partner_scenario() {
        let service = service(None);
        let issued = service.issue().unwrap();
        // no time claims without a lifetime
        assert_eq!(issued.payload, partner_claims().to_map().unwrap());

        let payload = service.verify(&issued.token).unwrap();
        assert_eq!(payload, issued.payload);
    }

    #[test]
    fn lifetime_adds_time_claims() {
        let service = service(Some(300));
        let issued = service.issue_at(1_700_000_000).unwrap();
        assert_eq!(issued.payload["iat"], json!(1_700_000_000));
        assert_eq!(issued.payload["exp"], json!(1_700_000_300));
        assert_eq!(issued.payload["partnerId"], json!(partner_claims().partner_id));

        let payload = service.verify_at(&issued.token, 1_700_000_299).unwrap();
        assert_eq!(payload, issued.payload);

        // exp must be strictly in the future
        let err = service
            .verify_at(&issued.token, 1_700_000_300)
            .unwrap_err();
        assert_eq!(err, VerificationError::ExpiredToken { exp: 1_700_000_300 });
        assert_eq!(err.reason(), "expired_token");
    }

    #[test]
    fn lifetime_overflow_fails() {
        let service = service(Some(u64::MAX));
        service.issue_at(0).unwrap_err();
    }

    #[test]
    fn reason_tags() {
        let tags = [
            (VerificationError::MalformedToken(String::new()), "malformed_token"),
            (VerificationError::AlgorithmMismatch("HS256".to_owned()), "algorithm_mismatch"),
            (VerificationError::InvalidSignature, "invalid_signature"),
            (
                VerificationError::KidMismatch {
                    expected: "a".to_owned(),
                    found: "b".to_owned(),
                },
                "kid_mismatch",
            ),
            (VerificationError::ExpiredToken { exp: 0 }, "expired_token"),
        ];
        for (err, tag) in tags {
            assert_eq!(err.reason(), tag);
        }
    }
}
