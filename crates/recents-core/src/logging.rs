#![forbid(unsafe_code)]

//! Logging glue.
//!
//! With the `tracing` feature the usual macros are re-exported so dependent
//! crates can log through `recents_core::debug!` without naming `tracing`
//! themselves. The `tracing-json` feature adds a one-call subscriber setup
//! for hosts that want line-delimited JSON on stderr.

#[cfg(feature = "tracing")]
pub use tracing::{debug, error, info, trace, warn};

/// Install a global JSON subscriber filtered by `RUST_LOG`.
///
/// Falls back to `info` when `RUST_LOG` is unset or unparsable. Returns
/// `false` if a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
