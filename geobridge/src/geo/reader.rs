use geo_types::Coord;
use geobridge_types::geometry::{
    GeometryCollection, LineString, LinearRing, MultiLineString, MultiPoint, MultiPolygon, Point,
    Polygon,
};
use geobridge_types::{CoordinateReferenceSystem, CrsRegistry, Geometry, Position, PositionSequence};

use super::{is_empty_point, traversal_coords, GeoGeometry, NO_SRID};
use crate::error::ConversionError;

/// Converts a `geo-types` geometry into the model using the given CRS.
///
/// If the external geometry has an SRID, it must be the SRID of `crs`. Z and M side channels must be present exactly
/// when `P` has these ordinates and must have a value for every coordinate. `Line` is converted into a line string,
/// `Rect` and `Triangle` into polygons.
pub fn from_geo<P: Position>(
    geometry: &GeoGeometry,
    crs: &CoordinateReferenceSystem,
) -> Result<Geometry<P>, ConversionError> {
    if geometry.srid() != NO_SRID && crs.srid() != Some(geometry.srid()) {
        return Err(ConversionError::invalid(format!(
            "geometry SRID {} does not match CRS {:?}",
            geometry.srid(),
            crs.id()
        )));
    }
    crs.check_compatible::<P>()?;

    let coord_count = traversal_coords(geometry.geometry()).len();
    let z = side_channel(geometry.z(), P::HAS_Z, coord_count, "Z")?;
    let m = side_channel(geometry.m(), P::HAS_M, coord_count, "M")?;

    let mut reader = SideChannelReader {
        crs,
        z,
        m,
        cursor: 0,
        _position: std::marker::PhantomData,
    };

    match geometry.geometry() {
        geo_types::Geometry::LineString(line) if geometry.is_linear_ring() => {
            Ok(reader.ring(line)?.into())
        }
        _ if geometry.is_linear_ring() => Err(ConversionError::invalid(
            "only a line string can be marked as a linear ring",
        )),
        g => reader.geometry(g),
    }
}

/// Converts a `geo-types` geometry into the model resolving the CRS from its SRID.
///
/// A geometry without SRID gets the undefined CRS of `P`.
pub fn from_geo_with_registry<P: Position>(
    geometry: &GeoGeometry,
    registry: &CrsRegistry,
) -> Result<Geometry<P>, ConversionError> {
    let crs = match geometry.srid() {
        NO_SRID => CoordinateReferenceSystem::undefined_for::<P>(),
        srid => registry.resolve_for::<P>(srid)?,
    };

    from_geo(geometry, &crs)
}

fn side_channel<'a>(
    values: Option<&'a [f64]>,
    expected: bool,
    coord_count: usize,
    name: &str,
) -> Result<&'a [f64], ConversionError> {
    match (values, expected) {
        (Some(values), true) if values.len() == coord_count => Ok(values),
        (Some(values), true) => Err(ConversionError::invalid(format!(
            "{name} side channel has {} values for {coord_count} coordinates",
            values.len()
        ))),
        (None, false) => Ok(&[]),
        (None, true) => Err(ConversionError::invalid(format!(
            "{name} ordinates are required by the position type"
        ))),
        (Some(_), false) => Err(ConversionError::invalid(format!(
            "{name} ordinates are not supported by the position type"
        ))),
    }
}

struct SideChannelReader<'a, P> {
    crs: &'a CoordinateReferenceSystem,
    z: &'a [f64],
    m: &'a [f64],
    cursor: usize,
    _position: std::marker::PhantomData<P>,
}

impl<P: Position> SideChannelReader<'_, P> {
    fn geometry(&mut self, geometry: &geo_types::Geometry<f64>) -> Result<Geometry<P>, ConversionError> {
        Ok(match geometry {
            geo_types::Geometry::Point(p) => self.point(p)?.into(),
            geo_types::Geometry::Line(l) => {
                log::debug!("Converting geo-types Line into a line string");
                self.line_string(&geo_types::LineString::new(vec![l.start, l.end]))?
                    .into()
            }
            geo_types::Geometry::LineString(l) => self.line_string(l)?.into(),
            geo_types::Geometry::Polygon(p) => self.polygon(p)?.into(),
            geo_types::Geometry::MultiPoint(mp) => MultiPoint::new(
                mp.0.iter().map(|p| self.point(p)).collect::<Result<_, _>>()?,
                self.crs.clone(),
            )?
            .into(),
            geo_types::Geometry::MultiLineString(ml) => MultiLineString::new(
                ml.0.iter()
                    .map(|l| self.line_string(l))
                    .collect::<Result<_, _>>()?,
                self.crs.clone(),
            )?
            .into(),
            geo_types::Geometry::MultiPolygon(mp) => MultiPolygon::new(
                mp.0.iter().map(|p| self.polygon(p)).collect::<Result<_, _>>()?,
                self.crs.clone(),
            )?
            .into(),
            geo_types::Geometry::GeometryCollection(gc) => GeometryCollection::new(
                gc.0.iter()
                    .map(|g| self.geometry(g))
                    .collect::<Result<_, _>>()?,
                self.crs.clone(),
            )?
            .into(),
            geo_types::Geometry::Rect(r) => {
                log::debug!("Converting geo-types Rect into a polygon");
                self.polygon(&r.to_polygon())?.into()
            }
            geo_types::Geometry::Triangle(t) => {
                log::debug!("Converting geo-types Triangle into a polygon");
                self.polygon(&t.to_polygon())?.into()
            }
        })
    }

    fn position(&mut self, coord: &Coord<f64>) -> Result<P, ConversionError> {
        if coord.x.is_nan() || coord.y.is_nan() {
            return Err(ConversionError::invalid(
                "NaN coordinates are only allowed for an empty point",
            ));
        }

        let i = self.cursor;
        self.cursor += 1;
        Ok(P::from_components(
            coord.x,
            coord.y,
            self.z.get(i).copied(),
            self.m.get(i).copied(),
        )?)
    }

    fn sequence(
        &mut self,
        line: &geo_types::LineString<f64>,
    ) -> Result<PositionSequence<P>, ConversionError> {
        line.0.iter().map(|c| self.position(c)).collect()
    }

    fn point(&mut self, point: &geo_types::Point<f64>) -> Result<Point<P>, ConversionError> {
        if is_empty_point(point) {
            Ok(Point::empty(self.crs.clone())?)
        } else {
            Ok(Point::new(self.position(&point.0)?, self.crs.clone())?)
        }
    }

    fn line_string(
        &mut self,
        line: &geo_types::LineString<f64>,
    ) -> Result<LineString<P>, ConversionError> {
        Ok(LineString::new(self.sequence(line)?, self.crs.clone())?)
    }

    fn ring(&mut self, line: &geo_types::LineString<f64>) -> Result<LinearRing<P>, ConversionError> {
        Ok(LinearRing::new(self.sequence(line)?, self.crs.clone())?)
    }

    fn polygon(&mut self, polygon: &geo_types::Polygon<f64>) -> Result<Polygon<P>, ConversionError> {
        if polygon.exterior().0.is_empty() {
            if !polygon.interiors().is_empty() {
                return Err(ConversionError::invalid(
                    "polygon with an empty exterior ring cannot have interior rings",
                ));
            }
            return Ok(Polygon::empty(self.crs.clone())?);
        }

        let mut rings = vec![self.ring(polygon.exterior())?];
        for interior in polygon.interiors() {
            rings.push(self.ring(interior)?);
        }

        Ok(Polygon::new(rings, self.crs.clone())?)
    }
}
