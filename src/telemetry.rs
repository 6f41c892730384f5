//! Process-wide tracing setup for the binaries.
//!
//! Diagnostics go to stderr so that stdout carries only the report.
//! Verbosity follows `RUST_LOG`, defaulting to `info`.

use std::sync::OnceLock;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::error::{Error, Result};

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Installs the global subscriber. Calling it again is a no-op.
pub fn init_tracing() -> Result<()> {
    if INITIALISED.set(()).is_err() {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    Registry::default()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|err| Error::Tracing(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_noop() {
        // Another test may have installed a subscriber first; both calls
        // must still succeed or report the conflict without panicking.
        let _ = init_tracing();
        assert!(init_tracing().is_ok());
    }
}
