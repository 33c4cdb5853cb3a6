use crate::crs::CoordinateReferenceSystem;
use crate::error::GeometryError;
use crate::geometry::{GeometryType, Spatial};
use crate::position::Position;
use crate::sequence::PositionSequence;

/// A single position, or nothing for an empty point.
#[derive(Debug, Clone, PartialEq)]
pub struct Point<P> {
    crs: CoordinateReferenceSystem,
    positions: PositionSequence<P>,
}

impl<P: Position> Point<P> {
    /// Creates a point at the given position.
    pub fn new(position: P, crs: CoordinateReferenceSystem) -> Result<Self, GeometryError> {
        Self::from_sequence(vec![position].into(), crs)
    }

    /// Creates an empty point.
    pub fn empty(crs: CoordinateReferenceSystem) -> Result<Self, GeometryError> {
        Self::from_sequence(PositionSequence::empty(), crs)
    }

    /// Creates a point from a sequence of zero or one positions.
    pub fn from_sequence(
        positions: PositionSequence<P>,
        crs: CoordinateReferenceSystem,
    ) -> Result<Self, GeometryError> {
        crs.check_compatible::<P>()?;
        if positions.len() > 1 {
            return Err(GeometryError::invariant(format!(
                "point must have at most one position, got {}",
                positions.len()
            )));
        }

        Ok(Self { crs, positions })
    }

    /// Position of the point, `None` for an empty point.
    pub fn position(&self) -> Option<P> {
        self.positions.first().copied()
    }

    /// Underlying position sequence.
    pub fn sequence(&self) -> &PositionSequence<P> {
        &self.positions
    }
}

impl<P: Position> Spatial<P> for Point<P> {
    fn crs(&self) -> &CoordinateReferenceSystem {
        &self.crs
    }

    fn geometry_type(&self) -> GeometryType {
        GeometryType::Point
    }

    fn positions(&self) -> Vec<P> {
        self.positions.to_vec()
    }

    fn num_positions(&self) -> usize {
        self.positions.len()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::position::{C2D, C2DM};

    #[test]
    fn at_most_one_position() {
        let crs = CoordinateReferenceSystem::undefined_for::<C2D>();
        let sequence = vec![C2D::new(0.0, 0.0), C2D::new(1.0, 1.0)].into();
        assert_matches!(
            Point::from_sequence(sequence, crs.clone()),
            Err(GeometryError::StructuralInvariantViolation(_))
        );

        let point = Point::new(C2D::new(1.0, 2.0), crs).expect("point");
        assert_eq!(point.position(), Some(C2D::new(1.0, 2.0)));
        assert!(!point.is_empty());
    }

    #[test]
    fn crs_must_fit_position() {
        let crs = CoordinateReferenceSystem::undefined_for::<C2D>();
        assert!(Point::new(C2DM::new(0.0, 0.0, 1.0), crs).is_err());
    }

    #[test]
    fn empty_point() {
        let point = Point::<C2D>::empty(CoordinateReferenceSystem::undefined_for::<C2D>())
            .expect("empty");
        assert!(point.is_empty());
        assert_eq!(point.position(), None);
        assert_eq!(point.srid(), None);
    }
}
