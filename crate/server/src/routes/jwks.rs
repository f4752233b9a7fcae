use std::sync::Arc;

use actix_web::{
    get,
    web::{Data, Json},
};
use jwt_issuer_crypto::Jwks;
use tracing::info;

use crate::{core::TokenIssuer, result::IssuerResult};

/// Publish the issuer public key as a JSON Web Key Set
#[get("/jwks")]
pub(crate) async fn get_jwks(issuer: Data<Arc<TokenIssuer>>) -> IssuerResult<Json<Jwks>> {
    info!("GET /jwks");
    Ok(Json(issuer.jwks().clone()))
}
