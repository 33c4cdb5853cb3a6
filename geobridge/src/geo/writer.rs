use geo_types::{coord, Coord};
use geobridge_types::geometry::{
    GeometryCollection, LineString, LinearRing, MultiLineString, MultiPoint, MultiPolygon, Point,
    Polygon, Spatial,
};
use geobridge_types::{Geometry, Position, PositionSequence};

use super::{GeoGeometry, NO_SRID};

/// Converts a geometry into its `geo-types` counterpart.
///
/// Each variant maps to exactly one `geo-types` variant: a linear ring becomes a line string with the ring flag set,
/// an empty point becomes a point with NaN coordinates. CRS identity becomes the SRID, an undefined CRS
/// becomes [`NO_SRID`].
pub fn to_geo<P: Position>(geometry: &Geometry<P>) -> GeoGeometry {
    let mut writer = SideChannelWriter::<P>::default();
    let converted = writer.geometry(geometry);

    GeoGeometry {
        geometry: converted,
        srid: geometry.srid().unwrap_or(NO_SRID),
        z: P::HAS_Z.then_some(writer.z),
        m: P::HAS_M.then_some(writer.m),
        linear_ring: matches!(geometry, Geometry::LinearRing(_)),
    }
}

struct SideChannelWriter<P> {
    z: Vec<f64>,
    m: Vec<f64>,
    _position: std::marker::PhantomData<P>,
}

impl<P> Default for SideChannelWriter<P> {
    fn default() -> Self {
        Self {
            z: vec![],
            m: vec![],
            _position: Default::default(),
        }
    }
}

impl<P: Position> SideChannelWriter<P> {
    fn geometry(&mut self, geometry: &Geometry<P>) -> geo_types::Geometry<f64> {
        match geometry {
            Geometry::Point(g) => self.point(g).into(),
            Geometry::LineString(g) => self.line_string(g).into(),
            Geometry::LinearRing(g) => self.ring(g).into(),
            Geometry::Polygon(g) => self.polygon(g).into(),
            Geometry::MultiPoint(g) => self.multi_point(g).into(),
            Geometry::MultiLineString(g) => self.multi_line_string(g).into(),
            Geometry::MultiPolygon(g) => self.multi_polygon(g).into(),
            Geometry::GeometryCollection(g) => {
                geo_types::Geometry::GeometryCollection(self.collection(g))
            }
        }
    }

    fn coord(&mut self, position: &P) -> Coord<f64> {
        if let Some(z) = position.z() {
            self.z.push(z);
        }
        if let Some(m) = position.m() {
            self.m.push(m);
        }

        coord!(x: position.x(), y: position.y())
    }

    fn coords(&mut self, sequence: &PositionSequence<P>) -> geo_types::LineString<f64> {
        geo_types::LineString::new(sequence.iter().map(|p| self.coord(p)).collect())
    }

    fn point(&mut self, point: &Point<P>) -> geo_types::Point<f64> {
        match point.position() {
            Some(position) => geo_types::Point(self.coord(&position)),
            None => geo_types::Point::new(f64::NAN, f64::NAN),
        }
    }

    fn line_string(&mut self, line: &LineString<P>) -> geo_types::LineString<f64> {
        self.coords(line.sequence())
    }

    fn ring(&mut self, ring: &LinearRing<P>) -> geo_types::LineString<f64> {
        self.coords(ring.sequence())
    }

    fn polygon(&mut self, polygon: &Polygon<P>) -> geo_types::Polygon<f64> {
        let mut rings = polygon.rings().iter().map(|r| self.ring(r));
        let exterior = rings.next().unwrap_or_else(|| geo_types::LineString::new(vec![]));
        let interiors = rings.collect();

        geo_types::Polygon::new(exterior, interiors)
    }

    fn multi_point(&mut self, multi: &MultiPoint<P>) -> geo_types::MultiPoint<f64> {
        geo_types::MultiPoint::new(multi.parts().iter().map(|p| self.point(p)).collect())
    }

    fn multi_line_string(
        &mut self,
        multi: &MultiLineString<P>,
    ) -> geo_types::MultiLineString<f64> {
        geo_types::MultiLineString::new(
            multi.parts().iter().map(|l| self.line_string(l)).collect(),
        )
    }

    fn multi_polygon(&mut self, multi: &MultiPolygon<P>) -> geo_types::MultiPolygon<f64> {
        geo_types::MultiPolygon::new(multi.parts().iter().map(|p| self.polygon(p)).collect())
    }

    fn collection(
        &mut self,
        collection: &GeometryCollection<P>,
    ) -> geo_types::GeometryCollection<f64> {
        geo_types::GeometryCollection(
            collection
                .geometries()
                .iter()
                .map(|g| self.geometry(g))
                .collect(),
        )
    }
}
