use geobridge_types::geometry::{
    GeometryCollection, LineString, LinearRing, MultiLineString, MultiPoint, MultiPolygon, Point,
    Polygon,
};
use geobridge_types::{
    CoordinateReferenceSystem, CrsRegistry, Geometry, GeometryType, Position, PositionSequence,
};

use super::{ElemInfo, ElementType, SdoGeometry, SdoGeometryKind, SdoPoint, UNSPECIFIED_SRID};
use crate::error::ConversionError;

const STRAIGHT: i32 = 1;
const ARCS: i32 = 2;
const RECTANGLE: i32 = 3;
const CIRCLE: i32 = 4;

/// Decodes an `SDO_GEOMETRY` value into a geometry with positions of type `P`.
///
/// The CRS is resolved from the SRID through the registry; an unspecified SRID gives the undefined CRS of `P`.
/// Arcs, circles, compound elements and oriented points are not supported.
pub fn decode<P: Position>(
    sdo: &SdoGeometry,
    registry: &CrsRegistry,
) -> Result<Geometry<P>, ConversionError> {
    let gtype = sdo.gtype;
    if gtype.dimension as usize != P::DIMENSION {
        return Err(ConversionError::invalid(format!(
            "geometry has {} dimensions, position type has {}",
            gtype.dimension,
            P::DIMENSION
        )));
    }
    match (gtype.is_measured(), P::HAS_M) {
        (true, true) if gtype.measure_ordinal != gtype.dimension => {
            return Err(ConversionError::unsupported(format!(
                "measure at ordinate {} of {} cannot be represented, it must be the last ordinate",
                gtype.measure_ordinal, gtype.dimension
            )))
        }
        (true, false) => {
            return Err(ConversionError::unsupported(
                "measured geometry cannot be decoded into a position type without a measure",
            ))
        }
        (false, true) => {
            return Err(ConversionError::invalid(
                "geometry is not measured but the position type requires a measure",
            ))
        }
        _ => {}
    }

    let crs = match sdo.srid {
        UNSPECIFIED_SRID => CoordinateReferenceSystem::undefined_for::<P>(),
        srid => registry.resolve_for::<P>(srid)?,
    };

    if sdo.elem_info.is_empty() {
        return match (sdo.point, gtype.kind) {
            (Some(point), SdoGeometryKind::Point) => Ok(Point::new(point_column(&point)?, crs)?.into()),
            (Some(_), kind) => Err(ConversionError::invalid(format!(
                "point column is set for a geometry of kind {kind:?}"
            ))),
            (None, _) if !sdo.ordinates.is_empty() => Err(ConversionError::invalid(
                "ordinates are present without element info",
            )),
            (None, kind) => Ok(Geometry::empty(geometry_type_of(kind), crs)?),
        };
    }
    if sdo.point.is_some() {
        log::debug!("Ignoring point column of a geometry with element info");
    }

    let elements = read_elements::<P>(sdo)?;
    GeometryBuilder { crs }.build(gtype.kind, elements)
}

fn geometry_type_of(kind: SdoGeometryKind) -> GeometryType {
    match kind {
        SdoGeometryKind::Point => GeometryType::Point,
        SdoGeometryKind::Line => GeometryType::LineString,
        SdoGeometryKind::Polygon => GeometryType::Polygon,
        SdoGeometryKind::Collection => GeometryType::GeometryCollection,
        SdoGeometryKind::MultiPoint => GeometryType::MultiPoint,
        SdoGeometryKind::MultiLine => GeometryType::MultiLineString,
        SdoGeometryKind::MultiPolygon => GeometryType::MultiPolygon,
    }
}

fn point_column<P: Position>(point: &SdoPoint) -> Result<P, ConversionError> {
    if P::HAS_M {
        return Err(ConversionError::invalid(
            "point column cannot hold a measured position",
        ));
    }

    P::from_components(point.x, point.y, point.z, None).map_err(|_| {
        ConversionError::invalid("point column does not have the ordinates of the position type")
    })
}

enum Element<P> {
    Points(Vec<P>),
    Line(Vec<P>),
    ExteriorRing(Vec<P>),
    InteriorRing(Vec<P>),
}

fn read_elements<P: Position>(sdo: &SdoGeometry) -> Result<Vec<Element<P>>, ConversionError> {
    if let Some(first) = sdo.elem_info.first() {
        if first.offset != 1 {
            return Err(ConversionError::invalid(format!(
                "first element must start at offset 1, found {}",
                first.offset
            )));
        }
    }

    let mut elements = Vec::with_capacity(sdo.elem_info.len());
    for (i, info) in sdo.elem_info.iter().enumerate() {
        if info.offset == 0 || (info.offset - 1) % P::DIMENSION != 0 {
            return Err(ConversionError::invalid(format!(
                "element offset {} does not start a {}-dimensional position",
                info.offset,
                P::DIMENSION
            )));
        }

        let start = info.offset - 1;
        let end = match sdo.elem_info.get(i + 1) {
            Some(next) => next.offset.saturating_sub(1),
            None => sdo.ordinates.len(),
        };
        let ordinates = sdo
            .ordinates
            .get(start..end)
            .filter(|o| !o.is_empty())
            .ok_or_else(|| {
                ConversionError::invalid(format!(
                    "element offset {} is outside of the ordinates array",
                    info.offset
                ))
            })?;

        elements.push(read_element(info, ordinates)?);
    }

    Ok(elements)
}

fn read_element<P: Position>(
    info: &ElemInfo,
    ordinates: &[Option<f64>],
) -> Result<Element<P>, ConversionError> {
    let positions = read_positions::<P>(ordinates)?;

    Ok(match (info.element_type, info.interpretation) {
        (ElementType::Point, 0) => {
            return Err(ConversionError::unsupported("oriented points are not supported"))
        }
        (ElementType::Point, n) if n > 0 && n as usize == positions.len() => {
            Element::Points(positions)
        }
        (ElementType::Point, n) => {
            return Err(ConversionError::invalid(format!(
                "point element declares {n} points but has {}",
                positions.len()
            )))
        }
        (ElementType::Line, STRAIGHT) => Element::Line(positions),
        (ElementType::ExteriorRing, STRAIGHT) => Element::ExteriorRing(positions),
        (ElementType::InteriorRing, STRAIGHT) => Element::InteriorRing(positions),
        (ElementType::ExteriorRing, RECTANGLE) => Element::ExteriorRing(rectangle(&positions, true)?),
        (ElementType::InteriorRing, RECTANGLE) => Element::InteriorRing(rectangle(&positions, false)?),
        (_, ARCS) => return Err(ConversionError::unsupported("arc segments are not supported")),
        (_, CIRCLE) => return Err(ConversionError::unsupported("circles are not supported")),
        (element_type, interpretation) => {
            return Err(ConversionError::unsupported(format!(
                "interpretation {interpretation} of {element_type:?} element is not supported"
            )))
        }
    })
}

fn read_positions<P: Position>(ordinates: &[Option<f64>]) -> Result<Vec<P>, ConversionError> {
    if ordinates.len() % P::DIMENSION != 0 {
        return Err(ConversionError::invalid(format!(
            "element has {} ordinates, which is not a multiple of dimension {}",
            ordinates.len(),
            P::DIMENSION
        )));
    }

    ordinates
        .chunks_exact(P::DIMENSION)
        .map(|chunk| {
            let values = chunk
                .iter()
                .map(|o| o.ok_or_else(|| ConversionError::invalid("ordinate is null")))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(P::from_ordinates(&values)?)
        })
        .collect()
}

/// Expands an optimized rectangle given by lower-left and upper-right corners. Exterior rings are
/// counterclockwise, interior rings clockwise.
fn rectangle<P: Position>(corners: &[P], exterior: bool) -> Result<Vec<P>, ConversionError> {
    if P::DIMENSION != 2 {
        return Err(ConversionError::unsupported(
            "optimized rectangles are only supported for 2d geometries",
        ));
    }
    let [ll, ur] = corners else {
        return Err(ConversionError::invalid(format!(
            "rectangle must have 2 corners, got {}",
            corners.len()
        )));
    };

    let lr = P::from_ordinates(&[ur.x(), ll.y()])?;
    let ul = P::from_ordinates(&[ll.x(), ur.y()])?;
    Ok(if exterior {
        vec![*ll, lr, *ur, ul, *ll]
    } else {
        vec![*ll, ul, *ur, lr, *ll]
    })
}

struct GeometryBuilder {
    crs: CoordinateReferenceSystem,
}

impl GeometryBuilder {
    fn build<P: Position>(
        &self,
        kind: SdoGeometryKind,
        elements: Vec<Element<P>>,
    ) -> Result<Geometry<P>, ConversionError> {
        let mut elements = elements.into_iter().peekable();
        let geometry: Geometry<P> = match kind {
            SdoGeometryKind::Point => match (elements.next(), elements.next()) {
                (Some(Element::Points(positions)), None) if positions.len() == 1 => {
                    self.point(positions[0])?.into()
                }
                _ => return Err(unexpected_elements(kind)),
            },
            SdoGeometryKind::Line => match (elements.next(), elements.next()) {
                (Some(Element::Line(positions)), None) => self.line(positions)?.into(),
                _ => return Err(unexpected_elements(kind)),
            },
            SdoGeometryKind::Polygon => {
                let polygon = self.polygon(&mut elements)?;
                if elements.next().is_some() {
                    return Err(unexpected_elements(kind));
                }
                polygon.into()
            }
            SdoGeometryKind::MultiPoint => {
                let mut points = vec![];
                for element in elements {
                    let Element::Points(positions) = element else {
                        return Err(unexpected_elements(kind));
                    };
                    for position in positions {
                        points.push(self.point(position)?);
                    }
                }
                MultiPoint::new(points, self.crs.clone())?.into()
            }
            SdoGeometryKind::MultiLine => {
                let lines = elements
                    .map(|element| match element {
                        Element::Line(positions) => self.line(positions),
                        _ => Err(unexpected_elements(kind)),
                    })
                    .collect::<Result<_, _>>()?;
                MultiLineString::new(lines, self.crs.clone())?.into()
            }
            SdoGeometryKind::MultiPolygon => {
                let mut polygons = vec![];
                while elements.peek().is_some() {
                    polygons.push(self.polygon(&mut elements)?);
                }
                MultiPolygon::new(polygons, self.crs.clone())?.into()
            }
            SdoGeometryKind::Collection => {
                let mut geometries = vec![];
                while let Some(starts_polygon) = elements
                    .peek()
                    .map(|e| matches!(e, Element::ExteriorRing(_)))
                {
                    let geometry: Geometry<P> = if starts_polygon {
                        self.polygon(&mut elements)?.into()
                    } else {
                        match elements.next() {
                            Some(Element::Points(positions)) => self.points(positions)?,
                            Some(Element::Line(positions)) => self.line(positions)?.into(),
                            _ => return Err(unexpected_elements(kind)),
                        }
                    };
                    geometries.push(geometry);
                }
                GeometryCollection::new(geometries, self.crs.clone())?.into()
            }
        };

        Ok(geometry)
    }

    fn point<P: Position>(&self, position: P) -> Result<Point<P>, ConversionError> {
        Ok(Point::new(position, self.crs.clone())?)
    }

    /// Single point, or a multi point for a point cluster.
    fn points<P: Position>(&self, positions: Vec<P>) -> Result<Geometry<P>, ConversionError> {
        if positions.len() == 1 {
            return Ok(self.point(positions[0])?.into());
        }

        let points = positions
            .into_iter()
            .map(|p| self.point(p))
            .collect::<Result<_, _>>()?;
        Ok(MultiPoint::new(points, self.crs.clone())?.into())
    }

    fn line<P: Position>(&self, positions: Vec<P>) -> Result<LineString<P>, ConversionError> {
        Ok(LineString::new(
            PositionSequence::new(positions),
            self.crs.clone(),
        )?)
    }

    fn ring<P: Position>(&self, positions: Vec<P>) -> Result<LinearRing<P>, ConversionError> {
        Ok(LinearRing::new(
            PositionSequence::new(positions),
            self.crs.clone(),
        )?)
    }

    /// Reads an exterior ring followed by any number of interior rings.
    fn polygon<P: Position>(
        &self,
        elements: &mut std::iter::Peekable<impl Iterator<Item = Element<P>>>,
    ) -> Result<Polygon<P>, ConversionError> {
        let Some(Element::ExteriorRing(exterior)) = elements.next() else {
            return Err(ConversionError::invalid(
                "polygon must start with an exterior ring",
            ));
        };

        let mut rings = vec![self.ring(exterior)?];
        while matches!(elements.peek(), Some(Element::InteriorRing(_))) {
            if let Some(Element::InteriorRing(interior)) = elements.next() {
                rings.push(self.ring(interior)?);
            }
        }

        Ok(Polygon::new(rings, self.crs.clone())?)
    }
}

fn unexpected_elements(kind: SdoGeometryKind) -> ConversionError {
    ConversionError::invalid(format!("unexpected element layout for a geometry of kind {kind:?}"))
}
