//! Logging Infrastructure
//!
//! `RUST_LOG` drives the filter. With `LOG_DIR` set, logs also go to a daily
//! rolling file; the returned guard must live as long as the process.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_FILTER: &str = "temple_server=info,security=info,tower_http=info";

/// Initialize the global subscriber
pub fn init_logger(log_dir: Option<&str>) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(false);

    let mut dir_error = None;
    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        match std::fs::create_dir_all(log_path) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::daily(log_path, "temple-server");
                let (writer, guard) = tracing_appender::non_blocking(file_appender);
                let file_layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(writer);

                tracing_subscriber::registry()
                    .with(filter)
                    .with(stdout_layer)
                    .with(file_layer)
                    .init();
                return Some(guard);
            }
            Err(e) => dir_error = Some((dir, e)),
        }
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .init();
    if let Some((dir, e)) = dir_error {
        tracing::warn!(log_dir = dir, error = %e, "Cannot create log directory, logging to stdout only");
    }
    None
}

/// Security event log on the `security` target.
///
/// ```ignore
/// security_log!(WARN, "login_failed", email = %email);
/// ```
#[macro_export]
macro_rules! security_log {
    (WARN, $event:expr, $($arg:tt)*) => {
        tracing::warn!(target: "security", event = $event, $($arg)*)
    };
    (ERROR, $event:expr, $($arg:tt)*) => {
        tracing::error!(target: "security", event = $event, $($arg)*)
    };
    (INFO, $event:expr, $($arg:tt)*) => {
        tracing::info!(target: "security", event = $event, $($arg)*)
    };
}
