use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::{Dispatch, dispatcher, info, span};
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};

use crate::{config::ClapConfig, result::IssuerResult};

#[derive(Debug, Default, Args, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TelemetryConfig {
    /// An alternative to setting the `RUST_LOG` environment variable.
    /// Setting this variable will override the `RUST_LOG` environment variable
    #[clap(long, env("JWT_ISSUER_RUST_LOG"), verbatim_doc_comment)]
    pub rust_log: Option<String>,

    /// Do not log to stdout
    #[clap(long, env("JWT_ISSUER_LOG_QUIET"), default_value = "false")]
    pub quiet: bool,
}

/// Initialize the telemetry system
///
/// # Arguments
///
/// * `clap_config` - The `ClapConfig` object containing the telemetry configuration
///
/// # Errors
///
/// Returns an error if the log filter is invalid or a global subscriber is
/// already installed.
pub fn initialize_telemetry(clap_config: &ClapConfig) -> IssuerResult<()> {
    let config = &clap_config.telemetry;
    let env_filter = match &config.rust_log {
        Some(rust_log) => EnvFilter::try_new(rust_log)?,
        None => EnvFilter::from_default_env(),
    };
    let (filter, _reload_handle) = tracing_subscriber::reload::Layer::new(env_filter);

    if config.quiet {
        let subscriber = Registry::default().with(filter);
        dispatcher::set_global_default(Dispatch::new(subscriber))?;
    } else {
        let subscriber = Registry::default().with(filter).with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_file(true)
                .with_ansi(true)
                .compact(),
        );
        dispatcher::set_global_default(Dispatch::new(subscriber))?;
    }

    let span = span!(tracing::Level::INFO, "start");
    let _guard = span.enter();
    info!("Telemetry initialized. Server starting with config {clap_config:#?}");

    Ok(())
}
