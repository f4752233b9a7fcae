//! Starts the issuer HTTP server.
//!
//! The key pair is loaded and the JWKS derived before the server binds,
//! so a broken key configuration never reaches the network.

use std::sync::{Arc, mpsc};

use actix_cors::Cors;
use actix_web::{App, HttpServer, dev::ServerHandle, web::Data};
use tracing::info;

use crate::{
    config::ServerParams,
    core::TokenIssuer,
    result::{IssuerResult, IssuerResultHelper},
    routes,
};

/// Start the issuer server and run it until it stops.
///
/// # Arguments
///
/// * `server_params` - The validated server parameters, key pair included.
/// * `server_handle_transmitter` - An optional channel receiving the server
///   handle, to stop the server from another thread.
///
/// # Errors
///
/// Fails if the server cannot bind its address or stops on an error.
pub async fn start_server(
    server_params: Arc<ServerParams>,
    server_handle_transmitter: Option<mpsc::Sender<ServerHandle>>,
) -> IssuerResult<()> {
    info!("Server configuration: {server_params:#?}");
    let issuer = Arc::new(TokenIssuer::instantiate(server_params));

    let server = prepare_server(issuer)?;

    // send the server handle to the caller
    if let Some(tx) = &server_handle_transmitter {
        tx.send(server.handle())
            .context("failed sending the server handle")?;
    }

    info!("Starting the JWT issuer server...");
    server.await.context("the server stopped on an error")
}

/// Create the `HttpServer` serving the issuer routes.
///
/// # Errors
///
/// Fails if the configured address cannot be bound.
pub fn prepare_server(issuer: Arc<TokenIssuer>) -> IssuerResult<actix_web::dev::Server> {
    let address = format!("{}:{}", issuer.params.hostname, issuer.params.port);
    info!("Listening on http://{address}");

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(Data::new(issuer.clone()))
            .service(routes::index)
            .service(routes::get_version)
            .service(routes::jwks::get_jwks)
            .service(routes::token::generate_valid_jwt)
            .service(routes::token::verify_jwt)
    })
    .bind(&address)
    .with_context(|| format!("cannot bind the server to {address}"))?
    .run();

    Ok(server)
}
