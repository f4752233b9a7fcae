use std::sync::Once;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static LOG_INIT: Once = Once::new();

const DEFAULT_RUST_LOG: &str = "info";

/// Install a global tracing subscriber, once per process.
///
/// `RUST_LOG` wins when it is set; otherwise `default_value` is used,
/// falling back to `info`.
///
/// Typical use in tests: `log_init(option_env!("RUST_LOG"))`.
pub fn log_init(default_value: Option<&str>) {
    LOG_INIT.call_once(|| {
        if std::env::var("RUST_BACKTRACE").is_err() {
            unsafe {
                std::env::set_var("RUST_BACKTRACE", "1");
            }
        }

        if std::env::var("RUST_LOG").is_err() {
            unsafe {
                std::env::set_var("RUST_LOG", default_value.unwrap_or(DEFAULT_RUST_LOG));
            }
        }

        tracing_setup();
    });
}

fn tracing_setup() {
    let format = tracing_subscriber::fmt::layer()
        .with_level(true)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true)
        .compact();

    let (filter, _reload_handle) =
        tracing_subscriber::reload::Layer::new(EnvFilter::from_default_env());

    // another subscriber may already be installed (e.g. by the server telemetry)
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .try_init();
}
