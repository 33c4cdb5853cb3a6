use crate::crs::CoordinateReferenceSystem;
use crate::error::GeometryError;
use crate::geometry::{check_child_crs, GeometryType, LineString, Point, Polygon, Spatial};
use crate::position::Position;

macro_rules! multi_geometry {
    ($(#[$doc:meta])* $name:ident, $child:ident, $geometry_type:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name<P> {
            crs: CoordinateReferenceSystem,
            parts: Vec<$child<P>>,
        }

        impl<P: Position> $name<P> {
            /// Creates a new geometry. All parts must use the same CRS as the geometry.
            pub fn new(
                parts: Vec<$child<P>>,
                crs: CoordinateReferenceSystem,
            ) -> Result<Self, GeometryError> {
                crs.check_compatible::<P>()?;
                for part in &parts {
                    check_child_crs(&crs, part.crs())?;
                }

                Ok(Self { crs, parts })
            }

            /// Creates a geometry without parts.
            pub fn empty(crs: CoordinateReferenceSystem) -> Result<Self, GeometryError> {
                Self::new(vec![], crs)
            }

            /// Parts in order.
            pub fn parts(&self) -> &[$child<P>] {
                &self.parts
            }

            /// Number of parts.
            pub fn num_geometries(&self) -> usize {
                self.parts.len()
            }

            /// Returns the `n`-th part.
            pub fn geometry_n(&self, n: usize) -> Option<&$child<P>> {
                self.parts.get(n)
            }
        }

        impl<P: Position> Spatial<P> for $name<P> {
            fn crs(&self) -> &CoordinateReferenceSystem {
                &self.crs
            }

            fn geometry_type(&self) -> GeometryType {
                $geometry_type
            }

            fn positions(&self) -> Vec<P> {
                self.parts.iter().flat_map(|p| p.positions()).collect()
            }

            fn num_positions(&self) -> usize {
                self.parts.iter().map(|p| p.num_positions()).sum()
            }
        }
    };
}

multi_geometry!(
    /// Set of points.
    MultiPoint, Point, GeometryType::MultiPoint
);
multi_geometry!(
    /// Set of line strings.
    MultiLineString, LineString, GeometryType::MultiLineString
);
multi_geometry!(
    /// Set of polygons.
    MultiPolygon, Polygon, GeometryType::MultiPolygon
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::C2DM;

    #[test]
    fn parts_keep_order() {
        let crs = CoordinateReferenceSystem::undefined_for::<C2DM>();
        let points: Vec<_> = (0..3)
            .map(|i| Point::new(C2DM::new(i as f64, 0.0, 10.0 * i as f64), crs.clone()).expect("point"))
            .collect();
        let multi = MultiPoint::new(points.clone(), crs).expect("multipoint");

        assert_eq!(multi.parts(), &points[..]);
        assert_eq!(multi.geometry_n(2), Some(&points[2]));
        assert_eq!(multi.positions()[1], C2DM::new(1.0, 0.0, 10.0));
    }

    #[test]
    fn empty_parts_make_empty_geometry() {
        let crs = CoordinateReferenceSystem::undefined_for::<C2DM>();
        let multi = MultiLineString::new(
            vec![LineString::<C2DM>::empty(crs.clone()).expect("line")],
            crs.clone(),
        )
        .expect("multiline");
        assert!(multi.is_empty());
        assert_eq!(multi.num_geometries(), 1);
        assert_ne!(multi, MultiLineString::empty(crs).expect("empty"));
    }

    #[test]
    fn parts_share_crs() {
        let crs = CoordinateReferenceSystem::undefined_for::<C2DM>();
        let other = CoordinateReferenceSystem::with_id_for::<C2DM>(crate::crs::CrsId::Epsg(3857));
        let polygon = Polygon::<C2DM>::empty(other).expect("polygon");
        assert!(MultiPolygon::new(vec![polygon], crs).is_err());
    }
}
