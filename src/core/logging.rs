//! Logging setup
//!
//! Progress and diagnostics go to stdout through `tracing`. The level is
//! taken from `RUST_LOG` when set.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for the given verbosity
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "simverify=debug,info"
    } else {
        "simverify=info,warn"
    }
}

/// Initialize stdout logging for the CLI
pub fn init(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    // A second init (tests, embedding) is not an error worth surfacing
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(false)
                .without_time()
                .compact(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_by_verbosity() {
        assert!(default_directive(true).starts_with("simverify=debug"));
        assert!(default_directive(false).starts_with("simverify=info"));
    }
}
