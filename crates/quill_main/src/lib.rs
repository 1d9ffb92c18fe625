mod cli;
mod command;

pub use cli::*;
pub use command::{apply_set, run, stream_html};

/// Installs the stderr log subscriber, filtered by `QUILL_LOG` (default
/// `warn`).
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("QUILL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
