//! Logging and tracing configuration
//!
//! Diagnostics go to stderr so that stdout stays free for the console
//! report and HTML output.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing for the CLI (stderr logging)
///
/// Logs are controlled by the `RUST_LOG` environment variable.
/// Default level is WARN, or DEBUG for this crate when `verbose` is set.
pub fn init_cli(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("thumbprobe=debug,warn")
        } else {
            EnvFilter::new("thumbprobe=warn,warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
