use crate::crs::CoordinateReferenceSystem;
use crate::error::GeometryError;
use crate::geometry::{check_child_crs, GeometryType, LinearRing, Spatial};
use crate::position::Position;

/// Polygon bounded by an exterior ring and zero or more interior rings.
///
/// An empty polygon has no rings at all. A non-empty polygon never contains an empty ring.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<P> {
    crs: CoordinateReferenceSystem,
    rings: Vec<LinearRing<P>>,
}

impl<P: Position> Polygon<P> {
    /// Creates a polygon from its rings, exterior ring first.
    pub fn new(
        rings: Vec<LinearRing<P>>,
        crs: CoordinateReferenceSystem,
    ) -> Result<Self, GeometryError> {
        crs.check_compatible::<P>()?;
        for ring in &rings {
            check_child_crs(&crs, ring.crs())?;
            if ring.is_empty() {
                return Err(GeometryError::invariant(
                    "empty ring is not allowed in a polygon",
                ));
            }
        }

        Ok(Self { crs, rings })
    }

    /// Creates an empty polygon.
    pub fn empty(crs: CoordinateReferenceSystem) -> Result<Self, GeometryError> {
        Self::new(vec![], crs)
    }

    /// Exterior ring, `None` for an empty polygon.
    pub fn exterior(&self) -> Option<&LinearRing<P>> {
        self.rings.first()
    }

    /// Interior rings (holes).
    pub fn interiors(&self) -> &[LinearRing<P>] {
        self.rings.get(1..).unwrap_or_default()
    }

    /// All rings, exterior first.
    pub fn rings(&self) -> &[LinearRing<P>] {
        &self.rings
    }
}

impl<P: Position> Spatial<P> for Polygon<P> {
    fn crs(&self) -> &CoordinateReferenceSystem {
        &self.crs
    }

    fn geometry_type(&self) -> GeometryType {
        GeometryType::Polygon
    }

    fn positions(&self) -> Vec<P> {
        self.rings.iter().flat_map(|r| r.sequence().iter().copied()).collect()
    }

    fn num_positions(&self) -> usize {
        self.rings.iter().map(|r| r.num_positions()).sum()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::position::G2D;

    fn ring(offset: f64, size: f64, crs: &CoordinateReferenceSystem) -> LinearRing<G2D> {
        LinearRing::new(
            vec![
                G2D::new(offset, offset),
                G2D::new(offset + size, offset),
                G2D::new(offset + size, offset + size),
                G2D::new(offset, offset + size),
                G2D::new(offset, offset),
            ]
            .into(),
            crs.clone(),
        )
        .expect("ring")
    }

    #[test]
    fn rings() {
        let crs = CoordinateReferenceSystem::wgs84();
        let polygon = Polygon::new(vec![ring(0.0, 10.0, &crs), ring(2.0, 2.0, &crs)], crs.clone())
            .expect("polygon");

        assert_eq!(polygon.exterior(), Some(&ring(0.0, 10.0, &crs)));
        assert_eq!(polygon.interiors().len(), 1);
        assert_eq!(polygon.num_positions(), 10);
        assert_eq!(polygon.srid(), Some(4326));
    }

    #[test]
    fn empty_polygon() {
        let polygon = Polygon::<G2D>::empty(CoordinateReferenceSystem::wgs84()).expect("empty");
        assert!(polygon.is_empty());
        assert_eq!(polygon.exterior(), None);
        assert!(polygon.interiors().is_empty());
    }

    #[test]
    fn empty_ring_is_rejected() {
        let crs = CoordinateReferenceSystem::wgs84();
        let empty = LinearRing::empty(crs.clone()).expect("ring");
        assert_matches!(
            Polygon::new(vec![ring(0.0, 1.0, &crs), empty], crs),
            Err(GeometryError::StructuralInvariantViolation(_))
        );
    }

    #[test]
    fn rings_share_crs() {
        let crs = CoordinateReferenceSystem::wgs84();
        let other = CoordinateReferenceSystem::etrs89();
        assert!(Polygon::new(vec![ring(0.0, 1.0, &other)], crs).is_err());
    }
}
