use geobridge_types::geometry::{
    GeometryCollection, LineString, LinearRing, MultiLineString, MultiPoint, MultiPolygon, Point,
    Polygon, Spatial,
};
use geobridge_types::{CoordinateReferenceSystem, CrsRegistry, Geometry, Position};
use geozero::error::{GeozeroError, Result as GeozeroResult};
use geozero::{CoordDimensions, GeomProcessor, GeozeroGeometry};

use super::DecodeError;

/// Decodes `source` into a geometry.
///
/// `srid` is used when the source itself does not report one. SRID `0` means no SRID.
pub(crate) fn build<P: Position>(
    source: &impl GeozeroGeometry,
    srid: Option<i32>,
    registry: &CrsRegistry,
) -> Result<Geometry<P>, DecodeError> {
    let mut builder = GeometryBuilder::<P>::new(registry, srid);
    match source.process_geom(&mut builder) {
        Ok(()) => builder.finish(),
        Err(e) => Err(builder
            .error
            .take()
            .unwrap_or_else(|| DecodeError::Malformed(e.to_string()))),
    }
}

enum Frame<P> {
    Point(Vec<P>),
    MultiPoint(Vec<Point<P>>),
    LineString(Vec<P>),
    Polygon(Vec<LinearRing<P>>),
    MultiLineString(Vec<LineString<P>>),
    MultiPolygon(Vec<Polygon<P>>),
    Collection(Vec<Geometry<P>>),
}

impl<P> Frame<P> {
    fn name(&self) -> &'static str {
        match self {
            Frame::Point(_) => "point",
            Frame::MultiPoint(_) => "multi point",
            Frame::LineString(_) => "line string",
            Frame::Polygon(_) => "polygon",
            Frame::MultiLineString(_) => "multi line string",
            Frame::MultiPolygon(_) => "multi polygon",
            Frame::Collection(_) => "geometry collection",
        }
    }
}

/// Assembles a geometry from `geozero` processing events.
///
/// Open geometries are kept on a stack. Each finished geometry is handed to the enclosing one or becomes the result.
/// The first failure is stored in `error` and processing is stopped with a generic `geozero` error.
struct GeometryBuilder<'a, P> {
    registry: &'a CrsRegistry,
    srid: Option<i32>,
    crs: Option<CoordinateReferenceSystem>,
    frames: Vec<Frame<P>>,
    result: Option<Geometry<P>>,
    error: Option<DecodeError>,
}

impl<'a, P: Position> GeometryBuilder<'a, P> {
    fn new(registry: &'a CrsRegistry, srid: Option<i32>) -> Self {
        Self {
            registry,
            srid: srid.filter(|srid| *srid != 0),
            crs: None,
            frames: vec![],
            result: None,
            error: None,
        }
    }

    fn finish(self) -> Result<Geometry<P>, DecodeError> {
        if let Some(frame) = self.frames.last() {
            return Err(DecodeError::Malformed(format!(
                "{} is not terminated",
                frame.name()
            )));
        }

        self.result
            .ok_or_else(|| DecodeError::Malformed("input contains no geometry".into()))
    }

    fn apply(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<(), DecodeError>,
    ) -> GeozeroResult<()> {
        op(self).or_else(|e| {
            let message = e.to_string();
            self.error = Some(e);
            Err(GeozeroError::Geometry(message))
        })
    }

    fn crs(&mut self) -> Result<CoordinateReferenceSystem, DecodeError> {
        if let Some(crs) = &self.crs {
            return Ok(crs.clone());
        }

        let crs = match self.srid {
            Some(srid) => self.registry.resolve_for::<P>(srid)?,
            None => CoordinateReferenceSystem::undefined_for::<P>(),
        };
        self.crs = Some(crs.clone());
        Ok(crs)
    }

    fn open(&mut self, frame: Frame<P>) -> GeozeroResult<()> {
        self.frames.push(frame);
        Ok(())
    }

    fn close(&mut self, expected: &str) -> Result<Frame<P>, DecodeError> {
        match self.frames.pop() {
            Some(frame) if frame.name() == expected => Ok(frame),
            Some(frame) => Err(DecodeError::Malformed(format!(
                "end of {expected} inside of a {}",
                frame.name()
            ))),
            None => Err(DecodeError::Malformed(format!(
                "end of {expected} without a start"
            ))),
        }
    }

    fn reject(&mut self, kind: &str) -> GeozeroResult<()> {
        self.apply(|_| Err(DecodeError::Unsupported(format!("{kind} is not supported"))))
    }

    fn position(
        x: f64,
        y: f64,
        z: Option<f64>,
        m: Option<f64>,
    ) -> Result<P, DecodeError> {
        if z.is_some() != P::HAS_Z {
            return Err(DecodeError::DimensionMismatch(format!(
                "input {} Z ordinates",
                if P::HAS_Z { "lacks" } else { "has" }
            )));
        }
        if m.is_some() != P::HAS_M {
            return Err(DecodeError::DimensionMismatch(format!(
                "input {} M ordinates",
                if P::HAS_M { "lacks" } else { "has" }
            )));
        }
        if x.is_nan() || y.is_nan() {
            return Err(DecodeError::Malformed(
                "NaN coordinates are only allowed for an empty point".into(),
            ));
        }

        Ok(P::from_components(x, y, z, m)?)
    }

    fn add_coordinate(
        &mut self,
        x: f64,
        y: f64,
        z: Option<f64>,
        m: Option<f64>,
    ) -> Result<(), DecodeError> {
        if matches!(self.frames.last(), Some(Frame::MultiPoint(_))) {
            let crs = self.crs()?;
            let is_empty_point = x.is_nan()
                && y.is_nan()
                && z.map_or(true, f64::is_nan)
                && m.map_or(true, f64::is_nan);
            let point = if is_empty_point {
                Point::empty(crs)?
            } else {
                Point::new(Self::position(x, y, z, m)?, crs)?
            };
            return self.deliver(point.into());
        }

        let position = Self::position(x, y, z, m)?;
        match self.frames.last_mut() {
            Some(Frame::Point(positions)) | Some(Frame::LineString(positions)) => {
                positions.push(position);
                Ok(())
            }
            Some(frame) => Err(DecodeError::Malformed(format!(
                "coordinate directly inside of a {}",
                frame.name()
            ))),
            None => Err(DecodeError::Malformed(
                "coordinate outside of a geometry".into(),
            )),
        }
    }

    fn deliver(&mut self, geometry: Geometry<P>) -> Result<(), DecodeError> {
        match (self.frames.last_mut(), geometry) {
            (None, geometry) => {
                if self.result.is_some() {
                    return Err(DecodeError::Malformed(
                        "input contains more than one geometry".into(),
                    ));
                }
                self.result = Some(geometry);
            }
            (Some(Frame::Collection(children)), geometry) => children.push(geometry),
            (Some(Frame::MultiPoint(points)), Geometry::Point(point)) => points.push(point),
            (Some(Frame::MultiLineString(lines)), Geometry::LineString(line)) => lines.push(line),
            (Some(Frame::MultiPolygon(polygons)), Geometry::Polygon(polygon)) => {
                polygons.push(polygon)
            }
            (Some(frame), geometry) => {
                return Err(DecodeError::Malformed(format!(
                    "{} cannot be a part of a {}",
                    geometry.geometry_type(),
                    frame.name()
                )))
            }
        }

        Ok(())
    }

    fn end_point(&mut self) -> Result<(), DecodeError> {
        let Frame::Point(positions) = self.close("point")? else {
            return Ok(());
        };
        let point = match positions[..] {
            [position] => Point::new(position, self.crs()?)?,
            [] => Point::empty(self.crs()?)?,
            _ => {
                return Err(DecodeError::Malformed(format!(
                    "point with {} coordinates",
                    positions.len()
                )))
            }
        };

        self.deliver(point.into())
    }

    fn end_line_string(&mut self) -> Result<(), DecodeError> {
        let Frame::LineString(positions) = self.close("line string")? else {
            return Ok(());
        };
        let crs = self.crs()?;
        match self.frames.last_mut() {
            Some(Frame::Polygon(rings)) => {
                rings.push(LinearRing::new(positions.into(), crs)?);
                Ok(())
            }
            _ => {
                let line = LineString::new(positions.into(), crs)?;
                self.deliver(line.into())
            }
        }
    }

    fn end_polygon(&mut self) -> Result<(), DecodeError> {
        let Frame::Polygon(rings) = self.close("polygon")? else {
            return Ok(());
        };
        let polygon = Polygon::new(rings, self.crs()?)?;
        self.deliver(polygon.into())
    }

    fn end_multi(&mut self, name: &str) -> Result<(), DecodeError> {
        let crs = self.crs()?;
        let geometry = match self.close(name)? {
            Frame::MultiPoint(points) => MultiPoint::new(points, crs)?.into(),
            Frame::MultiLineString(lines) => MultiLineString::new(lines, crs)?.into(),
            Frame::MultiPolygon(polygons) => MultiPolygon::new(polygons, crs)?.into(),
            Frame::Collection(children) => GeometryCollection::new(children, crs)?.into(),
            _ => return Ok(()),
        };

        self.deliver(geometry)
    }
}

impl<P: Position> GeomProcessor for GeometryBuilder<'_, P> {
    fn dimensions(&self) -> CoordDimensions {
        CoordDimensions::xyzm()
    }

    fn srid(&mut self, srid: Option<i32>) -> GeozeroResult<()> {
        if let Some(srid) = srid.filter(|srid| *srid != 0) {
            self.srid = Some(srid);
        }
        Ok(())
    }

    fn xy(&mut self, x: f64, y: f64, _idx: usize) -> GeozeroResult<()> {
        self.apply(|b| b.add_coordinate(x, y, None, None))
    }

    fn coordinate(
        &mut self,
        x: f64,
        y: f64,
        z: Option<f64>,
        m: Option<f64>,
        _t: Option<f64>,
        _tm: Option<u64>,
        _idx: usize,
    ) -> GeozeroResult<()> {
        self.apply(|b| b.add_coordinate(x, y, z, m))
    }

    fn empty_point(&mut self, _idx: usize) -> GeozeroResult<()> {
        self.apply(|b| {
            let point = Point::empty(b.crs()?)?;
            b.deliver(point.into())
        })
    }

    fn point_begin(&mut self, _idx: usize) -> GeozeroResult<()> {
        self.open(Frame::Point(Vec::with_capacity(1)))
    }

    fn point_end(&mut self, _idx: usize) -> GeozeroResult<()> {
        self.apply(Self::end_point)
    }

    fn multipoint_begin(&mut self, size: usize, _idx: usize) -> GeozeroResult<()> {
        self.open(Frame::MultiPoint(Vec::with_capacity(size)))
    }

    fn multipoint_end(&mut self, _idx: usize) -> GeozeroResult<()> {
        self.apply(|b| b.end_multi("multi point"))
    }

    fn linestring_begin(&mut self, _tagged: bool, size: usize, _idx: usize) -> GeozeroResult<()> {
        self.open(Frame::LineString(Vec::with_capacity(size)))
    }

    fn linestring_end(&mut self, _tagged: bool, _idx: usize) -> GeozeroResult<()> {
        self.apply(Self::end_line_string)
    }

    fn multilinestring_begin(&mut self, size: usize, _idx: usize) -> GeozeroResult<()> {
        self.open(Frame::MultiLineString(Vec::with_capacity(size)))
    }

    fn multilinestring_end(&mut self, _idx: usize) -> GeozeroResult<()> {
        self.apply(|b| b.end_multi("multi line string"))
    }

    fn polygon_begin(&mut self, _tagged: bool, size: usize, _idx: usize) -> GeozeroResult<()> {
        self.open(Frame::Polygon(Vec::with_capacity(size)))
    }

    fn polygon_end(&mut self, _tagged: bool, _idx: usize) -> GeozeroResult<()> {
        self.apply(Self::end_polygon)
    }

    fn multipolygon_begin(&mut self, size: usize, _idx: usize) -> GeozeroResult<()> {
        self.open(Frame::MultiPolygon(Vec::with_capacity(size)))
    }

    fn multipolygon_end(&mut self, _idx: usize) -> GeozeroResult<()> {
        self.apply(|b| b.end_multi("multi polygon"))
    }

    fn geometrycollection_begin(&mut self, size: usize, _idx: usize) -> GeozeroResult<()> {
        self.open(Frame::Collection(Vec::with_capacity(size)))
    }

    fn geometrycollection_end(&mut self, _idx: usize) -> GeozeroResult<()> {
        self.apply(|b| b.end_multi("geometry collection"))
    }

    fn circularstring_begin(&mut self, _size: usize, _idx: usize) -> GeozeroResult<()> {
        self.reject("circular string")
    }

    fn compoundcurve_begin(&mut self, _size: usize, _idx: usize) -> GeozeroResult<()> {
        self.reject("compound curve")
    }

    fn curvepolygon_begin(&mut self, _size: usize, _idx: usize) -> GeozeroResult<()> {
        self.reject("curve polygon")
    }

    fn multicurve_begin(&mut self, _size: usize, _idx: usize) -> GeozeroResult<()> {
        self.reject("multi curve")
    }

    fn multisurface_begin(&mut self, _size: usize, _idx: usize) -> GeozeroResult<()> {
        self.reject("multi surface")
    }

    fn triangle_begin(&mut self, _tagged: bool, _size: usize, _idx: usize) -> GeozeroResult<()> {
        self.reject("triangle")
    }

    fn polyhedralsurface_begin(&mut self, _size: usize, _idx: usize) -> GeozeroResult<()> {
        self.reject("polyhedral surface")
    }

    fn tin_begin(&mut self, _size: usize, _idx: usize) -> GeozeroResult<()> {
        self.reject("TIN")
    }
}
