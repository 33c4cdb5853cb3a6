//! Error types used by the crate.

use geobridge_types::GeometryError;
use thiserror::Error;

/// Error of a conversion between the geometry model and an external representation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// Input value is malformed or contradicts the requested target (missing ordinates, SRID disagreement etc.).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The value is well-formed but cannot be represented by the target encoding.
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),
    /// Resulting geometry would break a model invariant.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl ConversionError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedEncoding(message.into())
    }
}
