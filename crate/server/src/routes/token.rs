use std::sync::Arc;

use actix_web::{
    HttpResponse, get, post,
    web::{Bytes, Data, Json},
};
use jwt_issuer_crypto::VerificationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::{
    core::{GeneratedToken, TokenIssuer},
    result::IssuerResult,
};

/// Reason tag of a request that carries no usable token
pub const MISSING_TOKEN: &str = "missing_token";

/// The body of a `/verify-jwt` response, valid or not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyReply {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl VerifyReply {
    fn valid(payload: Map<String, Value>) -> Self {
        Self {
            valid: true,
            payload: Some(payload),
            message: Some("Token is valid".to_owned()),
            error: None,
            reason: None,
        }
    }

    fn invalid(error: String, reason: &str) -> Self {
        Self {
            valid: false,
            payload: None,
            message: None,
            error: Some(error),
            reason: Some(reason.to_owned()),
        }
    }
}

impl From<VerificationError> for VerifyReply {
    fn from(e: VerificationError) -> Self {
        Self::invalid(e.to_string(), e.reason())
    }
}

impl From<VerifyReply> for HttpResponse {
    fn from(reply: VerifyReply) -> Self {
        if reply.valid {
            Self::Ok().json(reply)
        } else {
            debug!("Verification failure: {reply:?}");
            Self::BadRequest().json(reply)
        }
    }
}

/// Issue a token carrying the configured claims
#[get("/generate-valid-jwt")]
pub(crate) async fn generate_valid_jwt(
    issuer: Data<Arc<TokenIssuer>>,
) -> IssuerResult<Json<GeneratedToken>> {
    info!("GET /generate-valid-jwt");
    Ok(Json(issuer.generate_token()?))
}

/// Verify the token posted as `{"token": "..."}`.
///
/// Answers 200 with the payload when the token is valid,
/// 400 with the failure reason otherwise.
/// A body the payload extractor rejects (too large, broken stream)
/// carries no usable token.
#[post("/verify-jwt")]
pub(crate) async fn verify_jwt(
    body: Result<Bytes, actix_web::Error>,
    issuer: Data<Arc<TokenIssuer>>,
) -> HttpResponse {
    info!("POST /verify-jwt");
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            warn!("POST /verify-jwt: unreadable body: {e}");
            return VerifyReply::invalid(format!("Unreadable request body: {e}"), MISSING_TOKEN)
                .into();
        }
    };
    let Some(token) = extract_token(&body) else {
        warn!("POST /verify-jwt: no token in the request");
        return VerifyReply::invalid("Missing or invalid token".to_owned(), MISSING_TOKEN).into();
    };
    match issuer.verify_token(&token) {
        Ok(payload) => VerifyReply::valid(payload).into(),
        Err(e) => {
            warn!("POST /verify-jwt: {e}");
            VerifyReply::from(e).into()
        }
    }
}

/// The non-empty string `token` member of a JSON object body
fn extract_token(body: &[u8]) -> Option<String> {
    let Ok(Value::Object(mut request)) = serde_json::from_slice::<Value>(body) else {
        return None;
    };
    match request.remove("token") {
        Some(Value::String(token)) if !token.is_empty() => Some(token),
        _ => None,
    }
}
