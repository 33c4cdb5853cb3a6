use geobridge_types::geometry::{LinearRing, Point, Polygon, Spatial};
use geobridge_types::{Geometry, Position, PositionSequence};
use geozero::error::Result as GeozeroResult;
use geozero::{CoordDimensions, GeomProcessor, GeozeroGeometry};

/// Feeds a geometry into `geozero` processors.
pub(crate) struct GeometrySource<'a, P> {
    geometry: &'a Geometry<P>,
    empty_points_as_nan: bool,
}

impl<'a, P: Position> GeometrySource<'a, P> {
    pub(crate) fn new(geometry: &'a Geometry<P>) -> Self {
        Self {
            geometry,
            empty_points_as_nan: false,
        }
    }

    /// Emits empty points as points with NaN ordinates, for writers without an empty point form.
    pub(crate) fn with_empty_points_as_nan(mut self) -> Self {
        self.empty_points_as_nan = true;
        self
    }

    fn emit<T: GeomProcessor>(
        &self,
        geometry: &Geometry<P>,
        idx: usize,
        processor: &mut T,
    ) -> GeozeroResult<()> {
        match geometry {
            Geometry::Point(g) => self.point(g, idx, processor),
            Geometry::LineString(g) => line(g.sequence(), true, idx, processor),
            Geometry::LinearRing(g) => line(g.sequence(), true, idx, processor),
            Geometry::Polygon(g) => polygon(g, true, idx, processor),
            Geometry::MultiPoint(g) => {
                processor.multipoint_begin(g.num_geometries(), idx)?;
                for (i, point) in g.parts().iter().enumerate() {
                    match point.position() {
                        Some(position) => coordinate(&position, i, processor)?,
                        None => nan_coordinate::<P, T>(i, processor)?,
                    }
                }
                processor.multipoint_end(idx)
            }
            Geometry::MultiLineString(g) => {
                processor.multilinestring_begin(g.num_geometries(), idx)?;
                for (i, part) in g.parts().iter().enumerate() {
                    line(part.sequence(), false, i, processor)?;
                }
                processor.multilinestring_end(idx)
            }
            Geometry::MultiPolygon(g) => {
                processor.multipolygon_begin(g.num_geometries(), idx)?;
                for (i, part) in g.parts().iter().enumerate() {
                    polygon(part, false, i, processor)?;
                }
                processor.multipolygon_end(idx)
            }
            Geometry::GeometryCollection(g) => {
                processor.geometrycollection_begin(g.num_geometries(), idx)?;
                for (i, child) in g.geometries().iter().enumerate() {
                    self.emit(child, i, processor)?;
                }
                processor.geometrycollection_end(idx)
            }
        }
    }

    fn point<T: GeomProcessor>(
        &self,
        point: &Point<P>,
        idx: usize,
        processor: &mut T,
    ) -> GeozeroResult<()> {
        match point.position() {
            Some(position) => {
                processor.point_begin(idx)?;
                coordinate(&position, 0, processor)?;
                processor.point_end(idx)
            }
            None if self.empty_points_as_nan => {
                processor.point_begin(idx)?;
                nan_coordinate::<P, T>(0, processor)?;
                processor.point_end(idx)
            }
            None => processor.empty_point(idx),
        }
    }
}

impl<P: Position> GeozeroGeometry for GeometrySource<'_, P> {
    fn process_geom<T: GeomProcessor>(&self, processor: &mut T) -> GeozeroResult<()> {
        self.emit(self.geometry, 0, processor)
    }

    fn dims(&self) -> CoordDimensions {
        dimensions::<P>()
    }

    fn srid(&self) -> Option<i32> {
        self.geometry.srid()
    }
}

/// Coordinate dimensions of `P`.
pub(crate) fn dimensions<P: Position>() -> CoordDimensions {
    match (P::HAS_Z, P::HAS_M) {
        (false, false) => CoordDimensions::xy(),
        (true, false) => CoordDimensions::xyz(),
        (false, true) => CoordDimensions::xym(),
        (true, true) => CoordDimensions::xyzm(),
    }
}

fn coordinate<P: Position, T: GeomProcessor>(
    position: &P,
    idx: usize,
    processor: &mut T,
) -> GeozeroResult<()> {
    processor.coordinate(
        position.x(),
        position.y(),
        position.z(),
        position.m(),
        None,
        None,
        idx,
    )
}

fn nan_coordinate<P: Position, T: GeomProcessor>(
    idx: usize,
    processor: &mut T,
) -> GeozeroResult<()> {
    processor.coordinate(
        f64::NAN,
        f64::NAN,
        P::HAS_Z.then_some(f64::NAN),
        P::HAS_M.then_some(f64::NAN),
        None,
        None,
        idx,
    )
}

fn line<P: Position, T: GeomProcessor>(
    sequence: &PositionSequence<P>,
    tagged: bool,
    idx: usize,
    processor: &mut T,
) -> GeozeroResult<()> {
    processor.linestring_begin(tagged, sequence.len(), idx)?;
    for (i, position) in sequence.iter().enumerate() {
        coordinate(position, i, processor)?;
    }
    processor.linestring_end(tagged, idx)
}

fn ring<P: Position, T: GeomProcessor>(
    ring: &LinearRing<P>,
    idx: usize,
    processor: &mut T,
) -> GeozeroResult<()> {
    line(ring.sequence(), false, idx, processor)
}

fn polygon<P: Position, T: GeomProcessor>(
    polygon: &Polygon<P>,
    tagged: bool,
    idx: usize,
    processor: &mut T,
) -> GeozeroResult<()> {
    processor.polygon_begin(tagged, polygon.rings().len(), idx)?;
    for (i, r) in polygon.rings().iter().enumerate() {
        ring(r, i, processor)?;
    }
    processor.polygon_end(tagged, idx)
}
