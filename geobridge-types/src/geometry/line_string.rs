use crate::crs::CoordinateReferenceSystem;
use crate::error::GeometryError;
use crate::geometry::{GeometryType, Spatial};
use crate::position::Position;
use crate::sequence::PositionSequence;

/// Geometries with a start and an end.
pub trait Linear<P: Position> {
    /// First position, `None` if empty.
    fn start_position(&self) -> Option<P>;
    /// Last position, `None` if empty.
    fn end_position(&self) -> Option<P>;
}

/// Sequence of connected positions. Either empty or at least two positions long.
#[derive(Debug, Clone, PartialEq)]
pub struct LineString<P> {
    crs: CoordinateReferenceSystem,
    positions: PositionSequence<P>,
}

impl<P: Position> LineString<P> {
    /// Creates a new line string.
    pub fn new(
        positions: PositionSequence<P>,
        crs: CoordinateReferenceSystem,
    ) -> Result<Self, GeometryError> {
        crs.check_compatible::<P>()?;
        if positions.len() == 1 {
            return Err(GeometryError::invariant(
                "line string must be empty or have at least 2 positions",
            ));
        }

        Ok(Self { crs, positions })
    }

    /// Creates an empty line string.
    pub fn empty(crs: CoordinateReferenceSystem) -> Result<Self, GeometryError> {
        Self::new(PositionSequence::empty(), crs)
    }

    /// Underlying position sequence.
    pub fn sequence(&self) -> &PositionSequence<P> {
        &self.positions
    }

    /// Whether the line string is non-empty and ends where it starts.
    pub fn is_closed(&self) -> bool {
        self.positions.is_closed()
    }
}

/// Closed line string used as a polygon boundary.
///
/// Either empty, or at least four positions long with equal first and last positions.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRing<P> {
    crs: CoordinateReferenceSystem,
    positions: PositionSequence<P>,
}

impl<P: Position> LinearRing<P> {
    /// Creates a new ring.
    pub fn new(
        positions: PositionSequence<P>,
        crs: CoordinateReferenceSystem,
    ) -> Result<Self, GeometryError> {
        crs.check_compatible::<P>()?;
        if !positions.is_empty() {
            if positions.len() < 4 {
                return Err(GeometryError::invariant(format!(
                    "linear ring must be empty or have at least 4 positions, got {}",
                    positions.len()
                )));
            }
            if !positions.is_closed() {
                return Err(GeometryError::invariant(
                    "linear ring must start and end at the same position",
                ));
            }
        }

        Ok(Self { crs, positions })
    }

    /// Creates an empty ring.
    pub fn empty(crs: CoordinateReferenceSystem) -> Result<Self, GeometryError> {
        Self::new(PositionSequence::empty(), crs)
    }

    /// Underlying position sequence.
    pub fn sequence(&self) -> &PositionSequence<P> {
        &self.positions
    }
}

impl<P: Position> From<LinearRing<P>> for LineString<P> {
    fn from(value: LinearRing<P>) -> Self {
        Self {
            crs: value.crs,
            positions: value.positions,
        }
    }
}

macro_rules! impl_linear {
    ($name:ident, $geometry_type:expr) => {
        impl<P: Position> Spatial<P> for $name<P> {
            fn crs(&self) -> &CoordinateReferenceSystem {
                &self.crs
            }

            fn geometry_type(&self) -> GeometryType {
                $geometry_type
            }

            fn positions(&self) -> Vec<P> {
                self.positions.to_vec()
            }

            fn num_positions(&self) -> usize {
                self.positions.len()
            }
        }

        impl<P: Position> Linear<P> for $name<P> {
            fn start_position(&self) -> Option<P> {
                self.positions.first().copied()
            }

            fn end_position(&self) -> Option<P> {
                self.positions.last().copied()
            }
        }
    };
}

impl_linear!(LineString, GeometryType::LineString);
impl_linear!(LinearRing, GeometryType::LinearRing);

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::position::C3D;

    fn crs() -> CoordinateReferenceSystem {
        CoordinateReferenceSystem::undefined_for::<C3D>()
    }

    fn square() -> PositionSequence<C3D> {
        vec![
            C3D::new(0.0, 0.0, 1.0),
            C3D::new(1.0, 0.0, 1.0),
            C3D::new(1.0, 1.0, 1.0),
            C3D::new(0.0, 0.0, 1.0),
        ]
        .into()
    }

    #[test]
    fn line_string_length() {
        assert!(LineString::<C3D>::empty(crs()).expect("empty").is_empty());
        assert_matches!(
            LineString::new(vec![C3D::new(0.0, 0.0, 0.0)].into(), crs()),
            Err(GeometryError::StructuralInvariantViolation(_))
        );

        let line = LineString::new(
            vec![C3D::new(0.0, 0.0, 0.0), C3D::new(1.0, 2.0, 3.0)].into(),
            crs(),
        )
        .expect("line");
        assert_eq!(line.start_position(), Some(C3D::new(0.0, 0.0, 0.0)));
        assert_eq!(line.end_position(), Some(C3D::new(1.0, 2.0, 3.0)));
        assert!(!line.is_closed());
    }

    #[test]
    fn ring_must_be_closed() {
        let ring = LinearRing::new(square(), crs()).expect("ring");
        assert_eq!(ring.start_position(), ring.end_position());
        assert_eq!(ring.geometry_type(), GeometryType::LinearRing);

        let open: PositionSequence<_> = square()
            .iter()
            .take(3)
            .copied()
            .chain([C3D::new(5.0, 5.0, 5.0)])
            .collect();
        assert_matches!(
            LinearRing::new(open, crs()),
            Err(GeometryError::StructuralInvariantViolation(_))
        );
    }

    #[test]
    fn ring_must_have_four_positions() {
        let short = vec![
            C3D::new(0.0, 0.0, 0.0),
            C3D::new(1.0, 0.0, 0.0),
            C3D::new(0.0, 0.0, 0.0),
        ];
        assert!(LinearRing::new(short.into(), crs()).is_err());
        assert!(LinearRing::<C3D>::empty(crs()).is_ok());
    }

    #[test]
    fn ring_converts_to_line_string() {
        let ring = LinearRing::new(square(), crs()).expect("ring");
        let line: LineString<_> = ring.clone().into();
        assert!(line.is_closed());
        assert_eq!(line.sequence(), ring.sequence());
    }
}
