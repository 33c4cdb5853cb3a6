//! Error type used by the crate.

use thiserror::Error;

use crate::crs::AxisKind;

/// Error enum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// CRS composition requested an axis the system already has.
    #[error("coordinate reference system already has a {0:?} axis")]
    AxisAlreadyPresent(AxisKind),
    /// Attempt to construct a geometry that breaks one of the model invariants.
    #[error("structural invariant violated: {0}")]
    StructuralInvariantViolation(String),
}

impl GeometryError {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Self::StructuralInvariantViolation(message.into())
    }
}
