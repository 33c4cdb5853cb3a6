//! Fixed-arity coordinate tuples (see [`Position`]).

use std::fmt::Debug;

use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// Kind of the coordinate space a position lives in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordinateSpace {
    /// Projected or engineering coordinates (easting, northing).
    Cartesian,
    /// Longitude and latitude.
    Geographic,
}

/// An immutable coordinate tuple.
///
/// Ordinates are always ordered X, Y, then Z if present, then M if present. For geographic positions X is the
/// longitude and Y is the latitude. Arity and axis layout are fixed by the implementing type.
pub trait Position: Debug + Copy + PartialEq + Send + Sync + 'static {
    /// Number of ordinates.
    const DIMENSION: usize;
    /// Whether the position has a vertical ordinate.
    const HAS_Z: bool;
    /// Whether the position has a measure ordinate.
    const HAS_M: bool;
    /// Coordinate space of the position.
    const SPACE: CoordinateSpace;

    /// Creates a position from ordinates in X, Y, [Z], [M] order.
    ///
    /// Fails if the slice length differs from [`Position::DIMENSION`].
    fn from_ordinates(ordinates: &[f64]) -> Result<Self, GeometryError>;

    /// Returns the ordinate at `index`, or `None` if the index is out of range.
    fn ordinate(&self, index: usize) -> Option<f64>;

    /// X ordinate (longitude for geographic positions).
    fn x(&self) -> f64;

    /// Y ordinate (latitude for geographic positions).
    fn y(&self) -> f64;

    /// Vertical ordinate.
    fn z(&self) -> Option<f64> {
        if Self::HAS_Z {
            self.ordinate(2)
        } else {
            None
        }
    }

    /// Measure ordinate.
    fn m(&self) -> Option<f64> {
        if Self::HAS_M {
            self.ordinate(Self::DIMENSION - 1)
        } else {
            None
        }
    }

    /// Returns all ordinates in axis order.
    fn ordinates(&self) -> Vec<f64> {
        (0..Self::DIMENSION).filter_map(|i| self.ordinate(i)).collect()
    }

    /// Creates a position from separate components. Components not present in the position type are ignored,
    /// components required by the type but missing are reported as an error.
    fn from_components(x: f64, y: f64, z: Option<f64>, m: Option<f64>) -> Result<Self, GeometryError> {
        let mut ordinates = Vec::with_capacity(Self::DIMENSION);
        ordinates.push(x);
        ordinates.push(y);
        if Self::HAS_Z {
            ordinates.push(z.ok_or_else(|| GeometryError::invariant("missing Z ordinate"))?);
        }
        if Self::HAS_M {
            ordinates.push(m.ok_or_else(|| GeometryError::invariant("missing M ordinate"))?);
        }

        Self::from_ordinates(&ordinates)
    }
}

macro_rules! position {
    ($(#[$doc:meta])* $name:ident, $space:expr, z: $has_z:expr, m: $has_m:expr, [$($field:ident),+]) => {
        $(#[$doc])*
        #[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            $($field: f64),+
        }

        impl $name {
            /// Creates a new position.
            pub const fn new($($field: f64),+) -> Self {
                Self { $($field),+ }
            }
        }

        impl Position for $name {
            const DIMENSION: usize = [$(stringify!($field)),+].len();
            const HAS_Z: bool = $has_z;
            const HAS_M: bool = $has_m;
            const SPACE: CoordinateSpace = $space;

            fn from_ordinates(ordinates: &[f64]) -> Result<Self, GeometryError> {
                match *ordinates {
                    [$($field),+] => Ok(Self { $($field),+ }),
                    _ => Err(GeometryError::invariant(format!(
                        "{} requires {} ordinates, got {}",
                        stringify!($name),
                        Self::DIMENSION,
                        ordinates.len()
                    ))),
                }
            }

            fn ordinate(&self, index: usize) -> Option<f64> {
                [$(self.$field),+].get(index).copied()
            }

            fn x(&self) -> f64 {
                [$(self.$field),+][0]
            }

            fn y(&self) -> f64 {
                [$(self.$field),+][1]
            }
        }

        impl AbsDiffEq for $name {
            type Epsilon = f64;

            fn default_epsilon() -> Self::Epsilon {
                f64::default_epsilon()
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
                $(self.$field.abs_diff_eq(&other.$field, epsilon))&&+
            }
        }
    };
}

position!(
    /// 2d cartesian position.
    C2D, CoordinateSpace::Cartesian, z: false, m: false, [x, y]
);
position!(
    /// 2d cartesian position with a measure.
    C2DM, CoordinateSpace::Cartesian, z: false, m: true, [x, y, m]
);
position!(
    /// 3d cartesian position.
    C3D, CoordinateSpace::Cartesian, z: true, m: false, [x, y, z]
);
position!(
    /// 3d cartesian position with a measure.
    C3DM, CoordinateSpace::Cartesian, z: true, m: true, [x, y, z, m]
);
position!(
    /// Geographic position (longitude, latitude).
    G2D, CoordinateSpace::Geographic, z: false, m: false, [lon, lat]
);
position!(
    /// Geographic position with a measure.
    G2DM, CoordinateSpace::Geographic, z: false, m: true, [lon, lat, m]
);
position!(
    /// Geographic position with ellipsoidal height.
    G3D, CoordinateSpace::Geographic, z: true, m: false, [lon, lat, height]
);
position!(
    /// Geographic position with ellipsoidal height and a measure.
    G3DM, CoordinateSpace::Geographic, z: true, m: true, [lon, lat, height, m]
);

macro_rules! geographic_accessors {
    ($($name:ident),+) => {
        $(
            impl $name {
                /// Longitude in degrees.
                pub fn lon(&self) -> f64 {
                    self.lon
                }

                /// Latitude in degrees.
                pub fn lat(&self) -> f64 {
                    self.lat
                }
            }
        )+
    };
}

geographic_accessors!(G2D, G2DM, G3D, G3DM);

impl G3D {
    /// Height above the ellipsoid.
    pub fn height(&self) -> f64 {
        self.height
    }
}

impl G3DM {
    /// Height above the ellipsoid.
    pub fn height(&self) -> f64 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn axis_layout() {
        let p = C2DM::new(12.0, 14.0, 3.0);
        assert_eq!(C2DM::DIMENSION, 3);
        assert_eq!(p.z(), None);
        assert_eq!(p.m(), Some(3.0));
        assert_eq!(p.ordinates(), vec![12.0, 14.0, 3.0]);

        let p = G3DM::new(12.0, 14.0, 3.0, 6.0);
        assert_eq!(p.x(), 12.0);
        assert_eq!(p.lat(), 14.0);
        assert_eq!(p.z(), Some(3.0));
        assert_eq!(p.m(), Some(6.0));
        assert_eq!(p.ordinate(4), None);
    }

    #[test]
    fn from_ordinates_checks_arity() {
        assert_eq!(C3D::from_ordinates(&[1.0, 2.0, 3.0]), Ok(C3D::new(1.0, 2.0, 3.0)));
        assert_matches!(
            C3D::from_ordinates(&[1.0, 2.0]),
            Err(GeometryError::StructuralInvariantViolation(_))
        );
    }

    #[test]
    fn from_components_requires_present_axes() {
        assert_eq!(
            C3DM::from_components(1.0, 2.0, Some(3.0), Some(4.0)),
            Ok(C3DM::new(1.0, 2.0, 3.0, 4.0))
        );
        assert_eq!(C2D::from_components(1.0, 2.0, Some(3.0), None), Ok(C2D::new(1.0, 2.0)));
        assert!(C2DM::from_components(1.0, 2.0, Some(3.0), None).is_err());
    }

    #[test]
    fn approximate_equality() {
        assert_abs_diff_eq!(G2D::new(1.0, 2.0), G2D::new(1.0 + 1e-12, 2.0), epsilon = 1e-9);
    }
}
