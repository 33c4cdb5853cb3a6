use crate::crs::CoordinateReferenceSystem;
use crate::error::GeometryError;
use crate::geometry::{check_child_crs, Geometry, GeometryType, Spatial};
use crate::position::Position;

/// Ordered heterogeneous collection of geometries, possibly nested.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryCollection<P> {
    crs: CoordinateReferenceSystem,
    geometries: Vec<Geometry<P>>,
}

impl<P: Position> GeometryCollection<P> {
    /// Creates a new collection.
    pub fn new(
        geometries: Vec<Geometry<P>>,
        crs: CoordinateReferenceSystem,
    ) -> Result<Self, GeometryError> {
        crs.check_compatible::<P>()?;
        for geometry in &geometries {
            check_child_crs(&crs, geometry.crs())?;
        }

        Ok(Self { crs, geometries })
    }

    /// Creates an empty collection.
    pub fn empty(crs: CoordinateReferenceSystem) -> Result<Self, GeometryError> {
        Self::new(vec![], crs)
    }

    /// Children in order.
    pub fn geometries(&self) -> &[Geometry<P>] {
        &self.geometries
    }

    /// Number of direct children.
    pub fn num_geometries(&self) -> usize {
        self.geometries.len()
    }

    /// Returns the `n`-th child.
    pub fn geometry_n(&self, n: usize) -> Option<&Geometry<P>> {
        self.geometries.get(n)
    }
}

impl<P: Position> Spatial<P> for GeometryCollection<P> {
    fn crs(&self) -> &CoordinateReferenceSystem {
        &self.crs
    }

    fn geometry_type(&self) -> GeometryType {
        GeometryType::GeometryCollection
    }

    fn positions(&self) -> Vec<P> {
        self.geometries.iter().flat_map(|g| g.positions()).collect()
    }

    fn num_positions(&self) -> usize {
        self.geometries.iter().map(|g| g.num_positions()).sum()
    }
}
