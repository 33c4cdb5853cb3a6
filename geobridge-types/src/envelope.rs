//! Bounding boxes of positions (see [`Envelope`]).

use crate::position::Position;

/// Axis-aligned bounding box over all ordinates of a set of positions.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Envelope<P> {
    lower: P,
    upper: P,
}

impl<P: Position> Envelope<P> {
    /// Creates an envelope of the given positions, or `None` if there are no positions.
    pub fn from_positions<'a>(mut positions: impl Iterator<Item = &'a P>) -> Option<Self> {
        let first = positions.next()?;
        let mut lower = first.ordinates();
        let mut upper = lower.clone();

        for p in positions {
            for (i, value) in p.ordinates().into_iter().enumerate() {
                if value < lower[i] {
                    lower[i] = value;
                }
                if value > upper[i] {
                    upper[i] = value;
                }
            }
        }

        Some(Self {
            lower: P::from_ordinates(&lower).ok()?,
            upper: P::from_ordinates(&upper).ok()?,
        })
    }

    /// Position with the minimum of each ordinate.
    pub fn lower(&self) -> P {
        self.lower
    }

    /// Position with the maximum of each ordinate.
    pub fn upper(&self) -> P {
        self.upper
    }

    /// Whether every ordinate of the position lies within the envelope.
    pub fn contains(&self, position: &P) -> bool {
        (0..P::DIMENSION).all(|i| {
            match (self.lower.ordinate(i), self.upper.ordinate(i), position.ordinate(i)) {
                (Some(lo), Some(hi), Some(v)) => lo <= v && v <= hi,
                _ => false,
            }
        })
    }

    /// Smallest envelope containing both envelopes.
    pub fn merge(&self, other: &Self) -> Self {
        let positions = [self.lower, self.upper, other.lower, other.upper];
        Self::from_positions(positions.iter()).unwrap_or(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::C3DM;

    #[test]
    fn covers_all_ordinates() {
        let positions = [
            C3DM::new(1.0, 5.0, -2.0, 0.0),
            C3DM::new(-1.0, 7.0, 4.0, 10.0),
            C3DM::new(3.0, 6.0, 0.0, 5.0),
        ];
        let envelope = Envelope::from_positions(positions.iter()).expect("envelope");
        assert_eq!(envelope.lower(), C3DM::new(-1.0, 5.0, -2.0, 0.0));
        assert_eq!(envelope.upper(), C3DM::new(3.0, 7.0, 4.0, 10.0));
        assert!(envelope.contains(&C3DM::new(0.0, 6.0, 1.0, 1.0)));
        assert!(!envelope.contains(&C3DM::new(0.0, 6.0, 1.0, 11.0)));
    }

    #[test]
    fn merge() {
        let a = Envelope::from_positions([C3DM::new(0.0, 0.0, 0.0, 0.0)].iter()).expect("a");
        let b = Envelope::from_positions([C3DM::new(2.0, -1.0, 1.0, 3.0)].iter()).expect("b");
        let merged = a.merge(&b);
        assert_eq!(merged.lower(), C3DM::new(0.0, -1.0, 0.0, 0.0));
        assert_eq!(merged.upper(), C3DM::new(2.0, 0.0, 1.0, 3.0));
    }

    #[test]
    fn empty_has_no_envelope() {
        assert!(Envelope::<C3DM>::from_positions([].iter()).is_none());
    }
}
