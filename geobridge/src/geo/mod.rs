//! Conversion between the geometry model and [`geo_types`] geometries.
//!
//! `geo-types` coordinates only have X and Y, no SRID and no notion of a linear ring or an empty point.
//! [`GeoGeometry`] wraps a `geo_types::Geometry` with that information:
//! * SRID, `0` meaning "no SRID",
//! * Z and M ordinates stored next to the geometry, one value per coordinate in traversal order,
//! * a flag marking a line string that stands for a linear ring.
//!
//! An empty point is stored as a point with NaN coordinates and does not take part in the coordinate traversal.
//!
//! Traversal order is the order coordinates appear in the geometry: polygon exterior ring before interior rings,
//! children of multi-geometries and collections in order. `Line`, `Rect` and `Triangle` are traversed as the line
//! string and polygons they stand for.

use geo_types::Coord;
use geobridge_types::{Geometry, GeometryType, Position, Spatial};

mod reader;
mod writer;

pub use reader::{from_geo, from_geo_with_registry};
pub use writer::to_geo;

/// SRID value meaning "no SRID".
pub const NO_SRID: i32 = 0;

/// `geo-types` geometry with SRID, Z and M ordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoGeometry {
    geometry: geo_types::Geometry<f64>,
    srid: i32,
    z: Option<Vec<f64>>,
    m: Option<Vec<f64>>,
    linear_ring: bool,
}

/// Coordinate with all ordinates the external representation can carry.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DimensionalCoord {
    /// X.
    pub x: f64,
    /// Y.
    pub y: f64,
    /// Z, if the geometry has a vertical ordinate.
    pub z: Option<f64>,
    /// Measure, if the geometry is measured.
    pub m: Option<f64>,
}

impl GeoGeometry {
    /// Wraps a 2d geometry without SRID.
    pub fn new(geometry: impl Into<geo_types::Geometry<f64>>) -> Self {
        Self {
            geometry: geometry.into(),
            srid: NO_SRID,
            z: None,
            m: None,
            linear_ring: false,
        }
    }

    /// Sets the SRID.
    pub fn with_srid(mut self, srid: i32) -> Self {
        self.srid = srid;
        self
    }

    /// Sets the Z ordinates, one per coordinate in traversal order.
    pub fn with_z(mut self, z: Vec<f64>) -> Self {
        self.z = Some(z);
        self
    }

    /// Sets the measure ordinates, one per coordinate in traversal order.
    pub fn with_m(mut self, m: Vec<f64>) -> Self {
        self.m = Some(m);
        self
    }

    /// Marks a line string as a linear ring.
    pub fn with_linear_ring(mut self, linear_ring: bool) -> Self {
        self.linear_ring = linear_ring;
        self
    }

    /// The wrapped geometry.
    pub fn geometry(&self) -> &geo_types::Geometry<f64> {
        &self.geometry
    }

    /// SRID, [`NO_SRID`] if not set.
    pub fn srid(&self) -> i32 {
        self.srid
    }

    /// Z ordinates in traversal order.
    pub fn z(&self) -> Option<&[f64]> {
        self.z.as_deref()
    }

    /// Measure ordinates in traversal order.
    pub fn m(&self) -> Option<&[f64]> {
        self.m.as_deref()
    }

    /// Whether the geometry is a line string standing for a linear ring.
    pub fn is_linear_ring(&self) -> bool {
        self.linear_ring
    }

    /// Whether the geometry has no coordinates.
    pub fn is_empty(&self) -> bool {
        traversal_coords(&self.geometry).is_empty()
    }

    /// All coordinates in traversal order with their Z and M values.
    ///
    /// Missing side channel values (if the side channel is shorter than the geometry) are returned as `None`.
    pub fn coords(&self) -> Vec<DimensionalCoord> {
        traversal_coords(&self.geometry)
            .into_iter()
            .enumerate()
            .map(|(i, c)| DimensionalCoord {
                x: c.x,
                y: c.y,
                z: self.z.as_ref().and_then(|z| z.get(i).copied()),
                m: self.m.as_ref().and_then(|m| m.get(i).copied()),
            })
            .collect()
    }

    /// Unwraps the `geo-types` geometry dropping SRID and Z/M.
    pub fn into_inner(self) -> geo_types::Geometry<f64> {
        self.geometry
    }
}

impl<P: Position> From<&Geometry<P>> for GeoGeometry {
    fn from(value: &Geometry<P>) -> Self {
        to_geo(value)
    }
}

/// Compares a collection-like geometry with its external counterpart by type and number of children.
///
/// Nested collection contents are not compared: `geo-types` cannot keep linear ring and empty point distinctions
/// inside collections, so this is the fidelity guaranteed for collections. Non-collection geometries only compare
/// their types.
pub fn same_collection_shape<P: Position>(geometry: &Geometry<P>, external: &GeoGeometry) -> bool {
    let (external_type, external_children) = match external.geometry() {
        geo_types::Geometry::Point(_) => (GeometryType::Point, 1),
        geo_types::Geometry::Line(_) => (GeometryType::LineString, 1),
        geo_types::Geometry::LineString(_) if external.is_linear_ring() => (GeometryType::LinearRing, 1),
        geo_types::Geometry::LineString(_) => (GeometryType::LineString, 1),
        geo_types::Geometry::Polygon(_)
        | geo_types::Geometry::Rect(_)
        | geo_types::Geometry::Triangle(_) => (GeometryType::Polygon, 1),
        geo_types::Geometry::MultiPoint(g) => (GeometryType::MultiPoint, g.0.len()),
        geo_types::Geometry::MultiLineString(g) => (GeometryType::MultiLineString, g.0.len()),
        geo_types::Geometry::MultiPolygon(g) => (GeometryType::MultiPolygon, g.0.len()),
        geo_types::Geometry::GeometryCollection(g) => (GeometryType::GeometryCollection, g.0.len()),
    };

    geometry.geometry_type() == external_type && geometry.num_geometries() == external_children
}

pub(crate) fn is_empty_point(point: &geo_types::Point<f64>) -> bool {
    point.x().is_nan() && point.y().is_nan()
}

fn traversal_coords(geometry: &geo_types::Geometry<f64>) -> Vec<Coord<f64>> {
    let mut coords = vec![];
    collect_coords(geometry, &mut coords);
    coords
}

fn collect_coords(geometry: &geo_types::Geometry<f64>, coords: &mut Vec<Coord<f64>>) {
    match geometry {
        geo_types::Geometry::Point(p) => collect_point(p, coords),
        geo_types::Geometry::Line(l) => coords.extend([l.start, l.end]),
        geo_types::Geometry::LineString(l) => coords.extend(l.0.iter().copied()),
        geo_types::Geometry::Polygon(p) => collect_polygon(p, coords),
        geo_types::Geometry::MultiPoint(mp) => mp.0.iter().for_each(|p| collect_point(p, coords)),
        geo_types::Geometry::MultiLineString(ml) => {
            coords.extend(ml.0.iter().flat_map(|l| l.0.iter().copied()))
        }
        geo_types::Geometry::MultiPolygon(mp) => mp.0.iter().for_each(|p| collect_polygon(p, coords)),
        geo_types::Geometry::GeometryCollection(gc) => {
            gc.0.iter().for_each(|g| collect_coords(g, coords))
        }
        geo_types::Geometry::Rect(r) => collect_polygon(&r.to_polygon(), coords),
        geo_types::Geometry::Triangle(t) => collect_polygon(&t.to_polygon(), coords),
    }
}

fn collect_point(point: &geo_types::Point<f64>, coords: &mut Vec<Coord<f64>>) {
    if !is_empty_point(point) {
        coords.push(point.0);
    }
}

fn collect_polygon(polygon: &geo_types::Polygon<f64>, coords: &mut Vec<Coord<f64>>) {
    coords.extend(polygon.exterior().0.iter().copied());
    for interior in polygon.interiors() {
        coords.extend(interior.0.iter().copied());
    }
}

#[cfg(test)]
mod tests;
