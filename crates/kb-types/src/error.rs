//! Configuration error type.

use thiserror::Error;

/// Error raised while loading or validating settings.
#[derive(Debug, Error)]
#[error("Configuration error: {0}")]
pub struct ConfigError(pub String);
