//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Level used when neither `RUST_LOG` nor `--log-level` is given
pub fn effective_level<'a>(flag: Option<&'a str>, configured: &'a str) -> &'a str {
    flag.filter(|level| !level.trim().is_empty())
        .unwrap_or(configured)
}

/// Install a stderr fmt subscriber; `RUST_LOG` takes precedence over `level`
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder().parse_lossy(level)
    });

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
