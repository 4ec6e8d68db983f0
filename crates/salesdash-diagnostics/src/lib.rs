//! Logging setup and in-process capture of tracing events.

pub mod log_buffer;
pub mod tracing_layer;

pub use log_buffer::DiagnosticLog;
pub use tracing_layer::{DiagnosticEvent, DiagnosticEventLayer};

use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `default_filter`. With `echo` set, events are also
/// written to stderr. Returns the receiving end of the capture channel.
pub fn init(
    default_filter: &str,
    echo: bool,
) -> Result<mpsc::UnboundedReceiver<DiagnosticEvent>, TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let (layer, receiver) = DiagnosticEventLayer::channel();
    let stderr = echo.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .with(stderr)
        .try_init()?;

    Ok(receiver)
}
