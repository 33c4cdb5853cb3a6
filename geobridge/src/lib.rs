//! Lossless converters between the [`geobridge_types`] geometry model and external representations:
//!
//! * [`geo`] - `geo-types` geometries with SRID and Z/M side channel (feature `geo-types`),
//! * [`sdo`] - Oracle `SDO_GEOMETRY` values,
//! * [`codec`] - (E)WKT and (E)WKB through `geozero` (feature `codec`).
//!
//! Dimensionality, CRS identity, emptiness and collection structure survive every conversion.

pub mod error;
pub mod sdo;

#[cfg(feature = "codec")]
pub mod codec;
#[cfg(feature = "geo-types")]
pub mod geo;

pub use error::ConversionError;
pub use geobridge_types as types;
