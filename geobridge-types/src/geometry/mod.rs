//! Immutable geometry model. See [`Geometry`] for the closed set of variants.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::crs::CoordinateReferenceSystem;
use crate::envelope::Envelope;
use crate::error::GeometryError;
use crate::position::Position;

mod collection;
mod line_string;
mod multi;
mod point;
mod polygon;

pub use collection::GeometryCollection;
pub use line_string::{Linear, LineString, LinearRing};
pub use multi::{MultiLineString, MultiPoint, MultiPolygon};
pub use point::Point;
pub use polygon::Polygon;

/// Type tag of a geometry variant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    /// [`Point`]
    Point,
    /// [`LineString`]
    LineString,
    /// [`LinearRing`]
    LinearRing,
    /// [`Polygon`]
    Polygon,
    /// [`MultiPoint`]
    MultiPoint,
    /// [`MultiLineString`]
    MultiLineString,
    /// [`MultiPolygon`]
    MultiPolygon,
    /// [`GeometryCollection`]
    GeometryCollection,
}

impl GeometryType {
    /// Whether geometries of this type consist of child geometries.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            GeometryType::MultiPoint
                | GeometryType::MultiLineString
                | GeometryType::MultiPolygon
                | GeometryType::GeometryCollection
        )
    }
}

impl Display for GeometryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::LinearRing => "LinearRing",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
            GeometryType::GeometryCollection => "GeometryCollection",
        };
        f.write_str(name)
    }
}

/// Operations shared by all geometry variants.
pub trait Spatial<P: Position> {
    /// Coordinate reference system of the geometry.
    fn crs(&self) -> &CoordinateReferenceSystem;

    /// Type tag of the geometry.
    fn geometry_type(&self) -> GeometryType;

    /// All positions of the geometry in traversal order.
    fn positions(&self) -> Vec<P>;

    /// SRID of the geometry's CRS, `None` if the CRS has no identity.
    fn srid(&self) -> Option<i32> {
        self.crs().srid()
    }

    /// Total number of positions.
    fn num_positions(&self) -> usize {
        self.positions().len()
    }

    /// Whether the geometry has no positions.
    fn is_empty(&self) -> bool {
        self.num_positions() == 0
    }

    /// Bounding box of the geometry, `None` if the geometry is empty.
    fn envelope(&self) -> Option<Envelope<P>> {
        Envelope::from_positions(self.positions().iter())
    }
}

/// A geometry of any of the supported variants.
///
/// The set of variants is closed. Every variant owns exactly one CRS, which all of its children share.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry<P> {
    /// Single point.
    Point(Point<P>),
    /// Line string.
    LineString(LineString<P>),
    /// Closed line string.
    LinearRing(LinearRing<P>),
    /// Polygon.
    Polygon(Polygon<P>),
    /// Set of points.
    MultiPoint(MultiPoint<P>),
    /// Set of line strings.
    MultiLineString(MultiLineString<P>),
    /// Set of polygons.
    MultiPolygon(MultiPolygon<P>),
    /// Heterogeneous collection.
    GeometryCollection(GeometryCollection<P>),
}

macro_rules! for_each_variant {
    ($self:expr, $g:ident => $body:expr) => {
        match $self {
            Geometry::Point($g) => $body,
            Geometry::LineString($g) => $body,
            Geometry::LinearRing($g) => $body,
            Geometry::Polygon($g) => $body,
            Geometry::MultiPoint($g) => $body,
            Geometry::MultiLineString($g) => $body,
            Geometry::MultiPolygon($g) => $body,
            Geometry::GeometryCollection($g) => $body,
        }
    };
}

impl<P: Position> Spatial<P> for Geometry<P> {
    fn crs(&self) -> &CoordinateReferenceSystem {
        for_each_variant!(self, g => g.crs())
    }

    fn geometry_type(&self) -> GeometryType {
        for_each_variant!(self, g => g.geometry_type())
    }

    fn positions(&self) -> Vec<P> {
        for_each_variant!(self, g => g.positions())
    }

    fn num_positions(&self) -> usize {
        for_each_variant!(self, g => g.num_positions())
    }
}

impl<P: Position> Geometry<P> {
    /// Number of direct children. Non-composite geometries count as one.
    pub fn num_geometries(&self) -> usize {
        match self {
            Geometry::MultiPoint(g) => g.num_geometries(),
            Geometry::MultiLineString(g) => g.num_geometries(),
            Geometry::MultiPolygon(g) => g.num_geometries(),
            Geometry::GeometryCollection(g) => g.num_geometries(),
            _ => 1,
        }
    }

    /// Returns a copy of the `n`-th direct child. For non-composite geometries index 0 is the geometry itself.
    pub fn geometry_n(&self, n: usize) -> Option<Geometry<P>> {
        match self {
            Geometry::MultiPoint(g) => g.geometry_n(n).cloned().map(Geometry::Point),
            Geometry::MultiLineString(g) => g.geometry_n(n).cloned().map(Geometry::LineString),
            Geometry::MultiPolygon(g) => g.geometry_n(n).cloned().map(Geometry::Polygon),
            Geometry::GeometryCollection(g) => g.geometry_n(n).cloned(),
            _ if n == 0 => Some(self.clone()),
            _ => None,
        }
    }

    /// Creates an empty geometry of the given type.
    pub fn empty(
        geometry_type: GeometryType,
        crs: CoordinateReferenceSystem,
    ) -> Result<Self, GeometryError> {
        Ok(match geometry_type {
            GeometryType::Point => Point::empty(crs)?.into(),
            GeometryType::LineString => LineString::empty(crs)?.into(),
            GeometryType::LinearRing => LinearRing::empty(crs)?.into(),
            GeometryType::Polygon => Polygon::empty(crs)?.into(),
            GeometryType::MultiPoint => MultiPoint::empty(crs)?.into(),
            GeometryType::MultiLineString => MultiLineString::empty(crs)?.into(),
            GeometryType::MultiPolygon => MultiPolygon::empty(crs)?.into(),
            GeometryType::GeometryCollection => GeometryCollection::empty(crs)?.into(),
        })
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),+) => {
        $(
            impl<P> From<$variant<P>> for Geometry<P> {
                fn from(value: $variant<P>) -> Self {
                    Geometry::$variant(value)
                }
            }
        )+
    };
}

impl_from_variant!(
    Point,
    LineString,
    LinearRing,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection
);

fn check_child_crs(
    parent: &CoordinateReferenceSystem,
    child: &CoordinateReferenceSystem,
) -> Result<(), GeometryError> {
    if parent == child {
        Ok(())
    } else {
        Err(GeometryError::invariant(
            "child geometry has a different coordinate reference system than its parent",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Unit;
    use crate::position::{C2D, G3D};

    fn crs() -> CoordinateReferenceSystem {
        CoordinateReferenceSystem::undefined_for::<C2D>()
    }

    #[test]
    fn empty_of_every_type() {
        let types = [
            GeometryType::Point,
            GeometryType::LineString,
            GeometryType::LinearRing,
            GeometryType::Polygon,
            GeometryType::MultiPoint,
            GeometryType::MultiLineString,
            GeometryType::MultiPolygon,
            GeometryType::GeometryCollection,
        ];
        for geometry_type in types {
            let geometry = Geometry::<C2D>::empty(geometry_type, crs()).expect("empty");
            assert_eq!(geometry.geometry_type(), geometry_type);
            assert!(geometry.is_empty());
            assert_eq!(geometry.envelope(), None);
            assert_eq!(geometry.crs(), &crs());
        }
    }

    #[test]
    fn empty_rejects_incompatible_crs() {
        assert!(Geometry::<G3D>::empty(GeometryType::Point, CoordinateReferenceSystem::wgs84()).is_err());

        let wgs84z = CoordinateReferenceSystem::wgs84().add_vertical(Unit::Meter).expect("vertical");
        assert!(Geometry::<G3D>::empty(GeometryType::Point, wgs84z).is_ok());
    }

    #[test]
    fn children_access() {
        let a = Point::new(C2D::new(0.0, 0.0), crs()).expect("point");
        let b = Point::new(C2D::new(1.0, 2.0), crs()).expect("point");
        let multi: Geometry<_> = MultiPoint::new(vec![a.clone(), b.clone()], crs())
            .expect("multipoint")
            .into();

        assert_eq!(multi.num_geometries(), 2);
        assert_eq!(multi.geometry_n(1), Some(Geometry::Point(b)));
        assert_eq!(multi.geometry_n(2), None);

        let single: Geometry<_> = a.into();
        assert_eq!(single.num_geometries(), 1);
        assert_eq!(single.geometry_n(0), Some(single.clone()));
    }

    #[test]
    fn envelope_of_composite() {
        let line = LineString::new(
            vec![C2D::new(0.0, 0.0), C2D::new(4.0, 1.0)].into(),
            crs(),
        )
        .expect("line");
        let point = Point::new(C2D::new(-1.0, 3.0), crs()).expect("point");
        let collection: Geometry<_> =
            GeometryCollection::new(vec![line.into(), point.into()], crs())
                .expect("collection")
                .into();

        let envelope = collection.envelope().expect("envelope");
        assert_eq!(envelope.lower(), C2D::new(-1.0, 0.0));
        assert_eq!(envelope.upper(), C2D::new(4.0, 3.0));
        assert_eq!(collection.num_positions(), 3);
    }

    #[test]
    fn type_names() {
        assert_eq!(GeometryType::MultiLineString.to_string(), "MultiLineString");
        assert!(GeometryType::GeometryCollection.is_composite());
        assert!(!GeometryType::LinearRing.is_composite());
    }
}
