#![forbid(unsafe_code)]

//! Structured logging.
//!
//! With the `tracing` feature, the crate emits spans (`arbiter.process`,
//! `ancestry.resolve`, `router.route`) and events through the `tracing`
//! facade, and the macros are re-exported here. Without it, no logging code
//! is compiled.
//!
//! The `tracing-json` feature adds [`init_json_subscriber`] for hosts that
//! want newline-delimited JSON output filtered by an `EnvFilter` directive.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Error from installing the global JSON subscriber.
#[cfg(feature = "tracing-json")]
#[derive(Debug, thiserror::Error)]
pub enum LoggingInitError {
    #[error("invalid filter directive: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("global subscriber already installed: {0}")]
    AlreadySet(#[from] tracing_subscriber::util::TryInitError),
}

/// Install a global JSON subscriber.
///
/// `filter` uses `EnvFilter` syntax (e.g. `"pullnest_core=debug"`). When
/// `None`, `RUST_LOG` is read, falling back to `info`.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber(filter: Option<&str>) -> Result<(), LoggingInitError> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = match filter {
        Some(directive) => EnvFilter::try_new(directive)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()?;
    Ok(())
}
