//! Ordered, immutable position sequences (see [`PositionSequence`]).

use std::ops::Deref;

use crate::position::Position;

/// Ordered, possibly empty, immutable sequence of positions of one type.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSequence<P> {
    positions: Vec<P>,
}

impl<P> Default for PositionSequence<P> {
    fn default() -> Self {
        Self { positions: vec![] }
    }
}

impl<P> Deref for PositionSequence<P> {
    type Target = [P];

    fn deref(&self) -> &Self::Target {
        &self.positions
    }
}

impl<P: Position> PositionSequence<P> {
    /// Creates a new sequence.
    pub fn new(positions: Vec<P>) -> Self {
        Self { positions }
    }

    /// Creates an empty sequence.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the sequence has at least one position and its first and last positions are equal.
    pub fn is_closed(&self) -> bool {
        match (self.positions.first(), self.positions.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }

    /// Returns a new sequence with the positions in reverse order.
    pub fn reversed(&self) -> Self {
        Self {
            positions: self.positions.iter().rev().copied().collect(),
        }
    }

    /// Consumes the sequence returning the underlying positions.
    pub fn into_inner(self) -> Vec<P> {
        self.positions
    }
}

impl<P: Position> From<Vec<P>> for PositionSequence<P> {
    fn from(value: Vec<P>) -> Self {
        Self::new(value)
    }
}

impl<P: Position> FromIterator<P> for PositionSequence<P> {
    fn from_iter<T: IntoIterator<Item = P>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, P> IntoIterator for &'a PositionSequence<P> {
    type Item = &'a P;
    type IntoIter = std::slice::Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions.iter()
    }
}
