use std::collections::HashMap;

use lazy_static::lazy_static;

use super::{CoordinateReferenceSystem, CrsId};
use crate::error::GeometryError;
use crate::position::Position;

lazy_static! {
    static ref GLOBAL_REGISTRY: CrsRegistry = CrsRegistry::builder().with_defaults().build();
}

/// Read-only table of coordinate reference systems keyed by SRID.
///
/// A registry is built once with [`CrsRegistryBuilder`] and never mutated afterwards, so it can be shared between
/// threads by reference.
#[derive(Debug, Clone, Default)]
pub struct CrsRegistry {
    systems: HashMap<i32, CoordinateReferenceSystem>,
}

impl CrsRegistry {
    /// Creates a builder for a new registry.
    pub fn builder() -> CrsRegistryBuilder {
        CrsRegistryBuilder::default()
    }

    /// Process-wide registry with the predefined systems. Initialized on first access.
    pub fn global() -> &'static CrsRegistry {
        &GLOBAL_REGISTRY
    }

    /// Returns the system registered under `srid`.
    pub fn get(&self, srid: i32) -> Option<&CoordinateReferenceSystem> {
        self.systems.get(&srid)
    }

    /// Whether a system is registered under `srid`.
    pub fn contains(&self, srid: i32) -> bool {
        self.systems.contains_key(&srid)
    }

    /// Number of registered systems.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Returns the system for `srid` with the axis layout of `P`.
    ///
    /// Registered systems are extended with the vertical and measure axes `P` needs. An unknown SRID produces a
    /// system that carries the SRID as identity and the default axes of `P`.
    pub fn resolve_for<P: Position>(
        &self,
        srid: i32,
    ) -> Result<CoordinateReferenceSystem, GeometryError> {
        match self.get(srid) {
            Some(crs) => crs.adapt_to::<P>(),
            None => {
                log::warn!("SRID {srid} is not registered, using default axes");
                Ok(CoordinateReferenceSystem::with_id_for::<P>(CrsId::Epsg(srid)))
            }
        }
    }
}

/// Builder for [`CrsRegistry`].
#[derive(Debug, Default)]
pub struct CrsRegistryBuilder {
    systems: HashMap<i32, CoordinateReferenceSystem>,
}

impl CrsRegistryBuilder {
    /// Adds the predefined systems (EPSG 4326, 4258, 3857, 31370).
    pub fn with_defaults(self) -> Self {
        self.register(CoordinateReferenceSystem::wgs84())
            .register(CoordinateReferenceSystem::etrs89())
            .register(CoordinateReferenceSystem::web_mercator())
            .register(CoordinateReferenceSystem::belgian_lambert_72())
    }

    /// Adds a system under its SRID. Systems without an identity are ignored.
    pub fn register(mut self, crs: CoordinateReferenceSystem) -> Self {
        match crs.srid() {
            Some(srid) => {
                self.systems.insert(srid, crs);
            }
            None => log::debug!("Ignoring registration of a system without identity"),
        }
        self
    }

    /// Finishes the registry.
    pub fn build(self) -> CrsRegistry {
        CrsRegistry {
            systems: self.systems,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Unit;
    use crate::position::{C2D, G2D, G3DM};

    #[test]
    fn global_registry_has_defaults() {
        let registry = CrsRegistry::global();
        assert_eq!(registry.get(4326), Some(&CoordinateReferenceSystem::wgs84()));
        assert!(registry.contains(3857));
        assert!(!registry.contains(-1));
    }

    #[test]
    fn resolve_adapts_axes() {
        let registry = CrsRegistry::global();
        let crs = registry.resolve_for::<G3DM>(4326).expect("resolve");
        let expected = CoordinateReferenceSystem::wgs84()
            .add_vertical(Unit::Meter)
            .and_then(|c| c.add_linear(Unit::Meter))
            .expect("compose");
        assert_eq!(crs, expected);

        assert!(registry.resolve_for::<C2D>(4326).is_err());
    }

    #[test]
    fn unknown_srid_keeps_identity() {
        let registry = CrsRegistry::builder().build();
        let crs = registry.resolve_for::<G2D>(2154).expect("resolve");
        assert_eq!(crs.srid(), Some(2154));
        assert!(crs.is_compatible_with::<G2D>());
    }

    #[test]
    fn registry_is_shareable() {
        fn assert_sync<T: Send + Sync>(_: &T) {}
        assert_sync(CrsRegistry::global());

        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| CrsRegistry::global().get(3857).cloned()))
            .collect();
        for handle in handles {
            assert_eq!(
                handle.join().expect("thread"),
                Some(CoordinateReferenceSystem::web_mercator())
            );
        }
    }
}
