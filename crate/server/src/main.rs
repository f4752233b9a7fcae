use dotenvy::dotenv;
use jwt_issuer_server::{
    config::{ClapConfig, ServerParams},
    result::IssuerResult,
    start_server::start_server,
    telemetry::initialize_telemetry,
};
use tracing::{debug, info};

/// The main entrypoint of the program.
///
/// Loads the configuration, starts the telemetry, loads the key pair and
/// serves the issuer endpoints. Any key loading error aborts the startup.
#[tokio::main]
async fn main() -> IssuerResult<()> {
    if std::env::var("RUST_BACKTRACE").is_err() {
        unsafe {
            std::env::set_var("RUST_BACKTRACE", "full");
        }
    }
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info,jwt_issuer_server=info,actix_web=info");
        }
    }

    // Load variable from a .env file
    dotenv().ok();

    let clap_config = ClapConfig::load()?;

    initialize_telemetry(&clap_config)?;

    info!(
        "OpenSSL version: {}, in {}, number: {:x}",
        openssl::version::version(),
        openssl::version::dir(),
        openssl::version::number()
    );
    debug!("Command line config: {clap_config:#?}");

    let server_params = ServerParams::try_from(clap_config)?;

    Box::pin(start_server(server_params.into(), None)).await
}
