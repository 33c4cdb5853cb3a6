//! (E)WKT and (E)WKB codecs built on `geozero`.
//!
//! Both codecs decode through the same [`GeomProcessor`](geozero::GeomProcessor) that assembles model geometries,
//! and encode by driving `geozero` writers with the geometry structure. The CRS of a decoded geometry is resolved
//! from its SRID with the registry given to the codec.

use geobridge_types::{Geometry, GeometryError, Position};
use geozero::error::GeozeroError;
use thiserror::Error;

mod builder;
mod emitter;
mod wkb;
mod wkt;

pub use wkb::WkbCodec;
pub use wkt::WktCodec;

/// Error of decoding a geometry. No partially decoded geometry is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// Input cannot be parsed or describes an inconsistent geometry structure.
    #[error("malformed input: {0}")]
    Malformed(String),
    /// Input is well-formed but uses geometry kinds the model does not have (curves, surfaces, TINs).
    #[error("unsupported geometry: {0}")]
    Unsupported(String),
    /// Z or M presence of the input differs from the requested position type.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    /// Decoded values break a model invariant.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Error of encoding a geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// Writer failed.
    #[error("writer error: {0}")]
    Writer(String),
    /// Output is not valid UTF-8 text.
    #[error("encoded text is not valid UTF-8")]
    Utf8,
}

impl From<GeozeroError> for EncodeError {
    fn from(value: GeozeroError) -> Self {
        Self::Writer(value.to_string())
    }
}

/// Decoder of an external geometry representation.
pub trait GeometryDecoder {
    /// Encoded value.
    type Input: ?Sized;

    /// Decodes a geometry with positions of type `P`.
    fn decode<P: Position>(&self, input: &Self::Input) -> Result<Geometry<P>, DecodeError>;
}

/// Encoder into an external geometry representation.
pub trait GeometryEncoder {
    /// Encoded value.
    type Output;

    /// Encodes the geometry.
    fn encode<P: Position>(&self, geometry: &Geometry<P>) -> Result<Self::Output, EncodeError>;
}

/// Decodes every item of a batch.
///
/// Returns one result per input in the same order. Failed items are logged and do not stop the batch.
pub fn decode_all<'a, D, P, I>(decoder: &D, inputs: I) -> Vec<Result<Geometry<P>, DecodeError>>
where
    D: GeometryDecoder,
    D::Input: 'a,
    P: Position,
    I: IntoIterator<Item = &'a D::Input>,
{
    inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| {
            let result = decoder.decode(input);
            if let Err(e) = &result {
                log::warn!("Failed to decode geometry #{index}: {e}");
            }
            result
        })
        .collect()
}
