use geobridge_types::{CrsRegistry, Geometry, Position};
use geozero::wkb::{Ewkb, WkbDialect, WkbWriter};
use geozero::GeozeroGeometry;

use super::builder::build;
use super::emitter::{dimensions, GeometrySource};
use super::{DecodeError, EncodeError, GeometryDecoder, GeometryEncoder};

/// EWKB codec.
///
/// Z and M flags of the geometry type and the SRID are carried in the header, so every geometry survives a round
/// trip. Empty points are written as points with NaN ordinates.
#[derive(Debug, Clone, Copy)]
pub struct WkbCodec<'a> {
    registry: &'a CrsRegistry,
}

impl<'a> WkbCodec<'a> {
    /// Creates a codec resolving SRIDs with the given registry.
    pub fn new(registry: &'a CrsRegistry) -> Self {
        Self { registry }
    }
}

impl Default for WkbCodec<'static> {
    fn default() -> Self {
        Self::new(CrsRegistry::global())
    }
}

impl GeometryDecoder for WkbCodec<'_> {
    type Input = [u8];

    fn decode<P: Position>(&self, input: &[u8]) -> Result<Geometry<P>, DecodeError> {
        build(&Ewkb(input), None, self.registry)
    }
}

impl GeometryEncoder for WkbCodec<'_> {
    type Output = Vec<u8>;

    fn encode<P: Position>(&self, geometry: &Geometry<P>) -> Result<Vec<u8>, EncodeError> {
        let source = GeometrySource::new(geometry).with_empty_points_as_nan();
        let mut out = Vec::new();
        let mut writer = WkbWriter::with_opts(
            &mut out,
            WkbDialect::Ewkb,
            dimensions::<P>(),
            source.srid(),
            Vec::new(),
        );
        source.process_geom(&mut writer)?;

        Ok(out)
    }
}
