//! Immutable, dimension-generic geometry model.
//!
//! Geometries are generic over the [`Position`] type, which fixes the number and meaning of ordinates at compile
//! time (2D, 2D with measure, 3D, 3D with measure; cartesian or geographic). Every geometry owns a
//! [`CoordinateReferenceSystem`] whose axes must agree with its position type.
//!
//! ```
//! use geobridge_types::crs::{CoordinateReferenceSystem, Unit};
//! use geobridge_types::geometry::{Point, Spatial};
//! use geobridge_types::position::G3D;
//!
//! let crs = CoordinateReferenceSystem::wgs84().add_vertical(Unit::Meter).unwrap();
//! let point = Point::new(G3D::new(4.35, 50.85, 13.0), crs).unwrap();
//! assert_eq!(point.srid(), Some(4326));
//! ```

pub mod crs;
pub mod envelope;
pub mod error;
pub mod geometry;
pub mod position;
pub mod sequence;

pub use crs::{CoordinateReferenceSystem, CrsId, CrsRegistry};
pub use envelope::Envelope;
pub use error::GeometryError;
pub use geometry::{Geometry, GeometryType, Spatial};
pub use position::Position;
pub use sequence::PositionSequence;
