use thiserror::Error;

use crate::config::LoadError;
use crate::infra::error::InfraError;

/// Failures at the binary boundary: configuration, telemetry, stdio.
///
/// Render failures never appear here — they are folded into the envelope by
/// the invoker and are not errors from the process's point of view.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}
