use std::sync::Arc;

use actix_web::{
    HttpResponse, HttpResponseBuilder, get,
    http::StatusCode,
    web::{Data, Json},
};
use clap::crate_version;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{core::TokenIssuer, error::IssuerError, result::IssuerResult};

pub mod jwks;
pub mod token;

/// The JSON body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorReply {
    pub error: String,
}

impl actix_web::error::ResponseError for IssuerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,

            Self::KeyLoad(_)
            | Self::Signing(_)
            | Self::ConversionError(_)
            | Self::Crypto(_)
            | Self::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let message = self.to_string();

        if status_code >= StatusCode::INTERNAL_SERVER_ERROR {
            error!("{status_code} - {message}");
        } else {
            warn!("{status_code} - {message}");
        }

        HttpResponseBuilder::new(status_code).json(ErrorReply { error: message })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceIndex {
    pub service: String,
    pub version: String,
    pub status: String,
    pub endpoints: Vec<String>,
}

/// Describe the service and its endpoints
#[get("/")]
pub(crate) async fn index(issuer: Data<Arc<TokenIssuer>>) -> IssuerResult<Json<ServiceIndex>> {
    info!("GET / kid: {}", issuer.params.token_params.kid);
    Ok(Json(ServiceIndex {
        service: env!("CARGO_PKG_NAME").to_owned(),
        version: crate_version!().to_owned(),
        status: "running".to_owned(),
        endpoints: [
            "GET /jwks",
            "GET /generate-valid-jwt",
            "POST /verify-jwt",
            "GET /version",
        ]
        .into_iter()
        .map(ToOwned::to_owned)
        .collect(),
    }))
}

/// Get the server version
#[get("/version")]
pub(crate) async fn get_version() -> IssuerResult<Json<String>> {
    info!("GET /version");
    Ok(Json(format!(
        "{} ({})",
        crate_version!(),
        openssl::version::version()
    )))
}
