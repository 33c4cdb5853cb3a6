//! Coordinate reference systems composed from a horizontal base system with optional vertical and measure axes.

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::position::{CoordinateSpace, Position};

mod registry;

pub use registry::{CrsRegistry, CrsRegistryBuilder};

/// Identity of a coordinate reference system.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrsId {
    /// The system has no registered authority identity.
    #[default]
    Undefined,
    /// EPSG code.
    Epsg(i32),
}

impl CrsId {
    /// Returns the integer SRID, or `None` for an undefined identity.
    pub fn srid(&self) -> Option<i32> {
        match self {
            CrsId::Undefined => None,
            CrsId::Epsg(code) => Some(*code),
        }
    }
}

/// Role of a coordinate system axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisKind {
    /// Cartesian X.
    Easting,
    /// Cartesian Y.
    Northing,
    /// Geographic X.
    Longitude,
    /// Geographic Y.
    Latitude,
    /// Vertical (height or depth) axis.
    Vertical,
    /// Linear referencing measure.
    Measure,
}

/// Unit of an axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Metre.
    Meter,
    /// International foot.
    Foot,
    /// Angular degree.
    Degree,
    /// Unit is not known.
    Unknown,
}

/// One axis of a coordinate system.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoordinateSystemAxis {
    kind: AxisKind,
    unit: Unit,
}

impl CoordinateSystemAxis {
    /// Creates a new axis.
    pub const fn new(kind: AxisKind, unit: Unit) -> Self {
        Self { kind, unit }
    }

    /// Role of the axis.
    pub fn kind(&self) -> AxisKind {
        self.kind
    }

    /// Unit of the axis.
    pub fn unit(&self) -> Unit {
        self.unit
    }
}

/// Coordinate reference system: an identity plus an ordered list of axes.
///
/// Two systems are equal when both their identities and their axis lists are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoordinateReferenceSystem {
    id: CrsId,
    axes: Vec<CoordinateSystemAxis>,
}

const EASTING_M: CoordinateSystemAxis = CoordinateSystemAxis::new(AxisKind::Easting, Unit::Meter);
const NORTHING_M: CoordinateSystemAxis = CoordinateSystemAxis::new(AxisKind::Northing, Unit::Meter);
const LONGITUDE: CoordinateSystemAxis = CoordinateSystemAxis::new(AxisKind::Longitude, Unit::Degree);
const LATITUDE: CoordinateSystemAxis = CoordinateSystemAxis::new(AxisKind::Latitude, Unit::Degree);

impl CoordinateReferenceSystem {
    /// Creates a horizontal (2d) system.
    ///
    /// Use [`add_vertical`](Self::add_vertical) and [`add_linear`](Self::add_linear) to extend it.
    pub fn horizontal(id: CrsId, space: CoordinateSpace) -> Self {
        let axes = match space {
            CoordinateSpace::Cartesian => vec![EASTING_M, NORTHING_M],
            CoordinateSpace::Geographic => vec![LONGITUDE, LATITUDE],
        };
        Self { id, axes }
    }

    /// Creates a system from an explicit axis list.
    ///
    /// The list must start with a horizontal axis pair of the same space, contain at most one vertical and one
    /// measure axis and nothing else.
    pub fn from_axes(id: CrsId, axes: Vec<CoordinateSystemAxis>) -> Result<Self, GeometryError> {
        let horizontal = matches!(
            axes.get(..2).map(|a| (a[0].kind, a[1].kind)),
            Some((AxisKind::Easting, AxisKind::Northing))
                | Some((AxisKind::Longitude, AxisKind::Latitude))
        );
        if !horizontal {
            return Err(GeometryError::invariant(
                "coordinate system must start with a horizontal axis pair",
            ));
        }

        let mut crs = Self {
            id,
            axes: axes[..2].to_vec(),
        };
        for axis in &axes[2..] {
            crs = match axis.kind {
                AxisKind::Vertical => crs.add_vertical(axis.unit)?,
                AxisKind::Measure => crs.add_linear(axis.unit)?,
                kind => {
                    return Err(GeometryError::invariant(format!(
                        "unexpected {kind:?} axis after the horizontal axes"
                    )))
                }
            };
        }

        Ok(crs)
    }

    /// WGS 84 geographic system (EPSG:4326).
    pub fn wgs84() -> Self {
        Self::horizontal(CrsId::Epsg(4326), CoordinateSpace::Geographic)
    }

    /// ETRS89 geographic system (EPSG:4258).
    pub fn etrs89() -> Self {
        Self::horizontal(CrsId::Epsg(4258), CoordinateSpace::Geographic)
    }

    /// WGS 84 / Pseudo-Mercator (EPSG:3857).
    pub fn web_mercator() -> Self {
        Self::horizontal(CrsId::Epsg(3857), CoordinateSpace::Cartesian)
    }

    /// Belgian Lambert 72 (EPSG:31370).
    pub fn belgian_lambert_72() -> Self {
        Self::horizontal(CrsId::Epsg(31370), CoordinateSpace::Cartesian)
    }

    /// Undefined system with the axis layout of position type `P` (metre units for non-angular axes).
    pub fn undefined_for<P: Position>() -> Self {
        Self::horizontal(CrsId::Undefined, P::SPACE).with_layout_of::<P>()
    }

    /// System with the given identity and the axis layout of position type `P`.
    pub fn with_id_for<P: Position>(id: CrsId) -> Self {
        Self::horizontal(id, P::SPACE).with_layout_of::<P>()
    }

    fn with_layout_of<P: Position>(mut self) -> Self {
        if P::HAS_Z {
            self.axes.push(CoordinateSystemAxis::new(AxisKind::Vertical, Unit::Meter));
        }
        if P::HAS_M {
            self.axes.push(CoordinateSystemAxis::new(AxisKind::Measure, Unit::Meter));
        }
        self
    }

    /// Identity of the system.
    pub fn id(&self) -> CrsId {
        self.id
    }

    /// Integer SRID of the system, `None` if the identity is undefined.
    pub fn srid(&self) -> Option<i32> {
        self.id.srid()
    }

    /// Axes of the system in order.
    pub fn axes(&self) -> &[CoordinateSystemAxis] {
        &self.axes
    }

    /// Number of axes.
    pub fn dimension(&self) -> usize {
        self.axes.len()
    }

    /// Space of the horizontal axes.
    pub fn space(&self) -> CoordinateSpace {
        match self.axes.first().map(|a| a.kind) {
            Some(AxisKind::Longitude) | Some(AxisKind::Latitude) => CoordinateSpace::Geographic,
            _ => CoordinateSpace::Cartesian,
        }
    }

    /// Whether the system has an axis of the given kind.
    pub fn has_axis(&self, kind: AxisKind) -> bool {
        self.axes.iter().any(|a| a.kind == kind)
    }

    /// Whether the system has a vertical axis.
    pub fn has_vertical(&self) -> bool {
        self.has_axis(AxisKind::Vertical)
    }

    /// Whether the system has a measure axis.
    pub fn has_measure(&self) -> bool {
        self.has_axis(AxisKind::Measure)
    }

    /// 1-based position of the measure axis among all axes.
    pub fn measure_ordinal(&self) -> Option<usize> {
        self.axes
            .iter()
            .position(|a| a.kind == AxisKind::Measure)
            .map(|i| i + 1)
    }

    /// Returns a new system with a vertical axis appended.
    pub fn add_vertical(&self, unit: Unit) -> Result<Self, GeometryError> {
        self.add_axis(CoordinateSystemAxis::new(AxisKind::Vertical, unit))
    }

    /// Returns a new system with a linear (measure) axis appended.
    pub fn add_linear(&self, unit: Unit) -> Result<Self, GeometryError> {
        self.add_axis(CoordinateSystemAxis::new(AxisKind::Measure, unit))
    }

    fn add_axis(&self, axis: CoordinateSystemAxis) -> Result<Self, GeometryError> {
        if self.has_axis(axis.kind) {
            return Err(GeometryError::AxisAlreadyPresent(axis.kind));
        }

        let mut axes = self.axes.clone();
        axes.push(axis);
        Ok(Self { id: self.id, axes })
    }

    /// Whether positions of type `P` can be expressed in this system.
    ///
    /// Besides the axis set, the order must match: positions always store the vertical ordinate third and the
    /// measure last.
    pub fn is_compatible_with<P: Position>(&self) -> bool {
        self.dimension() == P::DIMENSION
            && self.has_vertical() == P::HAS_Z
            && self.has_measure() == P::HAS_M
            && self.space() == P::SPACE
            && (!P::HAS_Z || self.axes.get(2).map(|a| a.kind) == Some(AxisKind::Vertical))
            && (!P::HAS_M || self.measure_ordinal() == Some(P::DIMENSION))
    }

    /// Fails with a structural error unless positions of type `P` can be expressed in this system.
    pub fn check_compatible<P: Position>(&self) -> Result<(), GeometryError> {
        if self.is_compatible_with::<P>() {
            Ok(())
        } else {
            Err(GeometryError::invariant(format!(
                "position type with {} ordinates (z: {}, m: {}, {:?}) does not fit a system with axes {:?}",
                P::DIMENSION,
                P::HAS_Z,
                P::HAS_M,
                P::SPACE,
                self.axes.iter().map(|a| a.kind).collect::<Vec<_>>()
            )))
        }
    }

    /// Extends the system with the vertical and measure axes needed by `P`.
    ///
    /// A missing vertical axis is placed right after the horizontal ones. Fails if the system already has axes `P`
    /// does not have, if its axes are out of the order of `P`, or if the spaces differ.
    pub fn adapt_to<P: Position>(&self) -> Result<Self, GeometryError> {
        let mut crs = self.clone();
        if P::HAS_Z && !crs.has_vertical() {
            let vertical = CoordinateSystemAxis::new(AxisKind::Vertical, Unit::Meter);
            crs.axes.insert(2, vertical);
        }
        if P::HAS_M && !crs.has_measure() {
            crs = crs.add_linear(Unit::Meter)?;
        }
        crs.check_compatible::<P>()?;

        Ok(crs)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use assert_matches::assert_matches;

    use super::*;
    use crate::position::{C2D, C2DM, C3DM, G2D, G3D, G3DM};

    #[test]
    fn composition() {
        let wgs84z = CoordinateReferenceSystem::wgs84().add_vertical(Unit::Meter).expect("vertical");
        let wgs84zm = wgs84z.add_linear(Unit::Meter).expect("measure");

        assert_eq!(wgs84z.srid(), Some(4326));
        assert_eq!(wgs84z.dimension(), 3);
        assert!(wgs84z.is_compatible_with::<G3D>());
        assert_eq!(wgs84zm.measure_ordinal(), Some(4));
        assert!(wgs84zm.is_compatible_with::<G3DM>());
    }

    #[test]
    fn composition_rejects_existing_axis() {
        let wgs84z = CoordinateReferenceSystem::wgs84().add_vertical(Unit::Meter).expect("vertical");
        assert_matches!(
            wgs84z.add_vertical(Unit::Foot),
            Err(GeometryError::AxisAlreadyPresent(AxisKind::Vertical))
        );

        let measured = CoordinateReferenceSystem::undefined_for::<C2DM>();
        assert_matches!(
            measured.add_linear(Unit::Meter),
            Err(GeometryError::AxisAlreadyPresent(AxisKind::Measure))
        );
    }

    #[test]
    fn vertical_after_measure_keeps_axis_order() {
        let crs = CoordinateReferenceSystem::undefined_for::<C2DM>()
            .add_vertical(Unit::Meter)
            .expect("vertical");
        assert_eq!(crs.measure_ordinal(), Some(3));
        assert_eq!(crs.dimension(), 4);

        assert!(!crs.is_compatible_with::<C3DM>());
        assert_matches!(
            crs.check_compatible::<C3DM>(),
            Err(GeometryError::StructuralInvariantViolation(_))
        );
        assert!(CoordinateReferenceSystem::undefined_for::<C3DM>().is_compatible_with::<C3DM>());
    }

    #[test]
    fn equality_is_structural() {
        let a = CoordinateReferenceSystem::wgs84().add_vertical(Unit::Meter).expect("vertical");
        let b = CoordinateReferenceSystem::wgs84().add_vertical(Unit::Meter).expect("vertical");
        let c = CoordinateReferenceSystem::wgs84().add_vertical(Unit::Foot).expect("vertical");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, CoordinateReferenceSystem::with_id_for::<G3D>(CrsId::Undefined));

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn undefined_systems_follow_position_layout() {
        let crs = CoordinateReferenceSystem::undefined_for::<C2DM>();
        assert_eq!(crs.srid(), None);
        assert_eq!(crs.measure_ordinal(), Some(3));
        assert!(crs.is_compatible_with::<C2DM>());
        assert!(!crs.is_compatible_with::<C2D>());
        assert!(!crs.is_compatible_with::<G2D>());
    }

    #[test]
    fn adapt_adds_missing_axes() {
        let adapted = CoordinateReferenceSystem::wgs84().adapt_to::<G3DM>().expect("adapt");
        assert_eq!(adapted.srid(), Some(4326));
        assert_eq!(adapted.dimension(), 4);

        assert!(CoordinateReferenceSystem::wgs84().adapt_to::<C3DM>().is_err());
        assert!(adapted.adapt_to::<G2D>().is_err());

        let measured = CoordinateReferenceSystem::undefined_for::<C2DM>();
        let adapted = measured.adapt_to::<C3DM>().expect("adapt");
        assert_eq!(adapted.measure_ordinal(), Some(4));
        assert_eq!(adapted, CoordinateReferenceSystem::undefined_for::<C3DM>());
    }

    #[test]
    fn serialization() {
        let crs = CoordinateReferenceSystem::wgs84().add_vertical(Unit::Meter).expect("vertical");
        let json = serde_json::to_string(&crs).expect("serialize");
        let restored: CoordinateReferenceSystem = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, crs);
    }

    #[test]
    fn from_axes_validates_layout() {
        let crs = CoordinateReferenceSystem::from_axes(
            CrsId::Epsg(3857),
            vec![
                CoordinateSystemAxis::new(AxisKind::Easting, Unit::Meter),
                CoordinateSystemAxis::new(AxisKind::Northing, Unit::Meter),
                CoordinateSystemAxis::new(AxisKind::Measure, Unit::Meter),
            ],
        )
        .expect("valid axes");
        assert!(crs.is_compatible_with::<C2DM>());

        assert!(CoordinateReferenceSystem::from_axes(
            CrsId::Undefined,
            vec![CoordinateSystemAxis::new(AxisKind::Vertical, Unit::Meter)]
        )
        .is_err());
    }
}
