use geobridge_types::{CrsRegistry, Geometry, Position};
use geozero::wkt::{Wkt, WktDialect, WktWriter};
use geozero::GeozeroGeometry;

use super::builder::build;
use super::emitter::{dimensions, GeometrySource};
use super::{DecodeError, EncodeError, GeometryDecoder, GeometryEncoder};

/// (E)WKT codec.
///
/// Decodes WKT with an optional `SRID=<n>;` prefix. Z and M ordinates must be tagged (`POINT Z (1 2 3)`).
///
/// Encodes EWKT: the prefix is written when the geometry has an SRID. Z and M ordinates are written without
/// dimension tags, so only 2d output can be decoded back; use [`WkbCodec`](super::WkbCodec) for lossless
/// transfer of 3d and measured geometries.
#[derive(Debug, Clone, Copy)]
pub struct WktCodec<'a> {
    registry: &'a CrsRegistry,
}

impl<'a> WktCodec<'a> {
    /// Creates a codec resolving SRIDs with the given registry.
    pub fn new(registry: &'a CrsRegistry) -> Self {
        Self { registry }
    }
}

impl Default for WktCodec<'static> {
    fn default() -> Self {
        Self::new(CrsRegistry::global())
    }
}

impl GeometryDecoder for WktCodec<'_> {
    type Input = str;

    fn decode<P: Position>(&self, input: &str) -> Result<Geometry<P>, DecodeError> {
        let (srid, text) = split_srid(input)?;
        build(&Wkt(text), srid, self.registry)
    }
}

impl GeometryEncoder for WktCodec<'_> {
    type Output = String;

    fn encode<P: Position>(&self, geometry: &Geometry<P>) -> Result<String, EncodeError> {
        let source = GeometrySource::new(geometry);
        let mut out = Vec::new();
        let mut writer =
            WktWriter::with_opts(&mut out, WktDialect::Ewkt, dimensions::<P>(), source.srid());
        source.process_geom(&mut writer)?;

        String::from_utf8(out).map_err(|_| EncodeError::Utf8)
    }
}

fn split_srid(input: &str) -> Result<(Option<i32>, &str), DecodeError> {
    let input = input.trim();
    let Some((prefix, text)) = input.split_once(';') else {
        return Ok((None, input));
    };

    let prefix = prefix.trim();
    let value = prefix
        .get(..5)
        .filter(|tag| tag.eq_ignore_ascii_case("SRID="))
        .and_then(|_| prefix.get(5..))
        .ok_or_else(|| DecodeError::Malformed(format!("unexpected prefix '{prefix}'")))?;
    let srid = value
        .trim()
        .parse::<i32>()
        .map_err(|e| DecodeError::Malformed(format!("invalid SRID '{value}': {e}")))?;

    Ok((Some(srid), text.trim_start()))
}
