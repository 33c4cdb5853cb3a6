use geobridge_types::geometry::{GeometryCollection, LinearRing, Point, Polygon, Spatial};
use geobridge_types::{Geometry, GeometryType, Position, PositionSequence};

use super::{ElemInfo, ElementType, SdoGType, SdoGeometry, SdoGeometryKind, SdoPoint, UNSPECIFIED_SRID};
use crate::error::ConversionError;

/// Encodes a geometry with the default [`SdoEncoder`].
pub fn encode<P: Position>(geometry: &Geometry<P>) -> Result<SdoGeometry, ConversionError> {
    SdoEncoder::new().encode(geometry)
}

/// Encoder of geometries into [`SdoGeometry`] values.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct SdoEncoder {
    use_point_column: bool,
}

impl SdoEncoder {
    /// Creates an encoder that writes points through element info and ordinates.
    pub fn new() -> Self {
        Self::default()
    }

    /// If set, non-measured points are written into `SDO_POINT` instead of the ordinates array.
    pub fn with_point_column(mut self, use_point_column: bool) -> Self {
        self.use_point_column = use_point_column;
        self
    }

    /// Encodes the geometry.
    ///
    /// Empty geometries are encoded with the geometry type and SRID only. Empty parts of multi-geometries and
    /// collections cannot be encoded, even when every part is empty. Nested collections cannot be encoded either.
    pub fn encode<P: Position>(&self, geometry: &Geometry<P>) -> Result<SdoGeometry, ConversionError> {
        let crs = geometry.crs();
        let dimension = crs.dimension();
        if !(2..=4).contains(&dimension) {
            return Err(ConversionError::unsupported(format!(
                "{dimension} dimensional coordinates cannot be encoded"
            )));
        }

        // Geometry CRSs always keep the measure axis last, so `L` equals `D` when present.
        let measure_ordinal = crs.measure_ordinal().unwrap_or(0);

        let gtype = SdoGType {
            dimension: dimension as u8,
            measure_ordinal: measure_ordinal as u8,
            kind: kind_of(geometry),
        };
        let srid = crs.srid().unwrap_or(UNSPECIFIED_SRID);

        // A composite holding only empty parts falls through and is rejected part by part.
        let has_parts = geometry.geometry_type().is_composite() && geometry.num_geometries() > 0;
        if geometry.is_empty() && !has_parts {
            return Ok(SdoGeometry::empty(gtype, srid));
        }

        if let Geometry::Point(point) = geometry {
            if self.use_point_column && !P::HAS_M {
                if let Some(position) = point.position() {
                    log::debug!("Encoding point into the point column");
                    return Ok(SdoGeometry {
                        point: Some(SdoPoint {
                            x: position.x(),
                            y: position.y(),
                            z: position.z(),
                        }),
                        ..SdoGeometry::empty(gtype, srid)
                    });
                }
            }
        }

        let mut elements = ElementWriter::default();
        match geometry {
            Geometry::Point(g) => elements.point(g)?,
            Geometry::LineString(g) => elements.line(g.sequence()),
            Geometry::LinearRing(g) => elements.line(g.sequence()),
            Geometry::Polygon(g) => elements.polygon(g)?,
            Geometry::MultiPoint(g) => elements.cluster(g.parts())?,
            Geometry::MultiLineString(g) => {
                for line in g.parts() {
                    require_non_empty(line, "multi line string")?;
                    elements.line(line.sequence());
                }
            }
            Geometry::MultiPolygon(g) => {
                for polygon in g.parts() {
                    require_non_empty(polygon, "multi polygon")?;
                    elements.polygon(polygon)?;
                }
            }
            Geometry::GeometryCollection(g) => elements.collection(g)?,
        }

        Ok(SdoGeometry {
            elem_info: elements.elem_info,
            ordinates: elements.ordinates,
            ..SdoGeometry::empty(gtype, srid)
        })
    }
}

fn kind_of<P>(geometry: &Geometry<P>) -> SdoGeometryKind {
    match geometry {
        Geometry::Point(_) => SdoGeometryKind::Point,
        Geometry::LineString(_) | Geometry::LinearRing(_) => SdoGeometryKind::Line,
        Geometry::Polygon(_) => SdoGeometryKind::Polygon,
        Geometry::MultiPoint(_) => SdoGeometryKind::MultiPoint,
        Geometry::MultiLineString(_) => SdoGeometryKind::MultiLine,
        Geometry::MultiPolygon(_) => SdoGeometryKind::MultiPolygon,
        Geometry::GeometryCollection(_) => SdoGeometryKind::Collection,
    }
}

fn require_non_empty<P: Position>(
    part: &impl Spatial<P>,
    container: &str,
) -> Result<(), ConversionError> {
    if part.is_empty() {
        Err(ConversionError::unsupported(format!(
            "empty {} inside a {container} cannot be encoded",
            part.geometry_type()
        )))
    } else {
        Ok(())
    }
}

#[derive(Default)]
struct ElementWriter {
    elem_info: Vec<ElemInfo>,
    ordinates: Vec<Option<f64>>,
}

impl ElementWriter {
    fn element<'a, P: Position + 'a>(
        &mut self,
        element_type: ElementType,
        interpretation: i32,
        positions: impl IntoIterator<Item = &'a P>,
    ) {
        self.elem_info.push(ElemInfo::new(
            self.ordinates.len() + 1,
            element_type,
            interpretation,
        ));
        for position in positions {
            self.ordinates
                .extend(position.ordinates().into_iter().map(Some));
        }
    }

    fn point<P: Position>(&mut self, point: &Point<P>) -> Result<(), ConversionError> {
        require_non_empty(point, "collection")?;
        self.element(ElementType::Point, 1, point.sequence());
        Ok(())
    }

    fn cluster<P: Position>(&mut self, points: &[Point<P>]) -> Result<(), ConversionError> {
        for point in points {
            require_non_empty(point, "multi point")?;
        }

        let positions: Vec<P> = points.iter().filter_map(|p| p.position()).collect();
        self.element(ElementType::Point, positions.len() as i32, &positions);
        Ok(())
    }

    fn line<P: Position>(&mut self, sequence: &PositionSequence<P>) {
        self.element(ElementType::Line, 1, sequence);
    }

    fn ring<P: Position>(&mut self, ring: &LinearRing<P>, element_type: ElementType) {
        self.element(element_type, 1, ring.sequence());
    }

    fn polygon<P: Position>(&mut self, polygon: &Polygon<P>) -> Result<(), ConversionError> {
        require_non_empty(polygon, "collection")?;
        let mut rings = polygon.rings().iter();
        if let Some(exterior) = rings.next() {
            self.ring(exterior, ElementType::ExteriorRing);
        }
        for interior in rings {
            self.ring(interior, ElementType::InteriorRing);
        }

        Ok(())
    }

    fn collection<P: Position>(
        &mut self,
        collection: &GeometryCollection<P>,
    ) -> Result<(), ConversionError> {
        for child in collection.geometries() {
            require_non_empty(child, "collection")?;
            match child {
                Geometry::Point(g) => self.point(g)?,
                Geometry::LineString(g) => self.line(g.sequence()),
                Geometry::LinearRing(g) => self.line(g.sequence()),
                Geometry::Polygon(g) => self.polygon(g)?,
                Geometry::MultiPoint(g) if g.num_geometries() > 1 => self.cluster(g.parts())?,
                other => {
                    return Err(ConversionError::unsupported(format!(
                        "{} cannot be encoded as a part of a collection",
                        describe(other)
                    )))
                }
            }
        }

        Ok(())
    }
}

fn describe<P: Position>(geometry: &Geometry<P>) -> String {
    match geometry.geometry_type() {
        GeometryType::MultiPoint => "multi point with a single point".into(),
        GeometryType::GeometryCollection => "nested collection".into(),
        other => other.to_string(),
    }
}
