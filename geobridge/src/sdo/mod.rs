//! Oracle `SDO_GEOMETRY` values and their conversion to and from the geometry model.
//!
//! [`SdoGeometry`] mirrors the column object type:
//! * `SDO_GTYPE` as [`SdoGType`] (`D*1000 + L*100 + TT`),
//! * `SDO_SRID`, `-1` when the geometry has no SRID,
//! * `SDO_POINT` as an optional [`SdoPoint`],
//! * `SDO_ELEM_INFO` as a list of [`ElemInfo`] triplets,
//! * `SDO_ORDINATES`, where database nulls are `None`.

use serde::{Deserialize, Serialize};

use crate::error::ConversionError;

mod decoder;
mod encoder;

pub use decoder::decode;
pub use encoder::{encode, SdoEncoder};

/// SRID value meaning "no SRID".
pub const UNSPECIFIED_SRID: i32 = -1;

/// `TT` part of `SDO_GTYPE`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SdoGeometryKind {
    /// Single point.
    Point,
    /// Line string.
    Line,
    /// Polygon.
    Polygon,
    /// Heterogeneous collection.
    Collection,
    /// Set of points.
    MultiPoint,
    /// Set of line strings.
    MultiLine,
    /// Set of polygons.
    MultiPolygon,
}

impl SdoGeometryKind {
    /// Numeric code of the kind.
    pub fn code(&self) -> i32 {
        match self {
            SdoGeometryKind::Point => 1,
            SdoGeometryKind::Line => 2,
            SdoGeometryKind::Polygon => 3,
            SdoGeometryKind::Collection => 4,
            SdoGeometryKind::MultiPoint => 5,
            SdoGeometryKind::MultiLine => 6,
            SdoGeometryKind::MultiPolygon => 7,
        }
    }

    /// Creates a kind from its numeric code. Unknown geometries (0) and solids (8, 9) are not supported.
    pub fn from_code(code: i32) -> Result<Self, ConversionError> {
        Ok(match code {
            1 => SdoGeometryKind::Point,
            2 => SdoGeometryKind::Line,
            3 => SdoGeometryKind::Polygon,
            4 => SdoGeometryKind::Collection,
            5 => SdoGeometryKind::MultiPoint,
            6 => SdoGeometryKind::MultiLine,
            7 => SdoGeometryKind::MultiPolygon,
            _ => {
                return Err(ConversionError::unsupported(format!(
                    "geometry type code {code} is not supported"
                )))
            }
        })
    }
}

/// Decoded `SDO_GTYPE`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SdoGType {
    /// Number of ordinates per position (`D`).
    pub dimension: u8,
    /// 1-based index of the measure ordinate, `0` if not measured (`L`).
    pub measure_ordinal: u8,
    /// Geometry kind (`TT`).
    pub kind: SdoGeometryKind,
}

impl SdoGType {
    /// Numeric `SDO_GTYPE` value.
    pub fn code(&self) -> i32 {
        self.dimension as i32 * 1000 + self.measure_ordinal as i32 * 100 + self.kind.code()
    }

    /// Parses a numeric `SDO_GTYPE` value.
    pub fn from_code(code: i32) -> Result<Self, ConversionError> {
        if !(1000..10000).contains(&code) {
            return Err(ConversionError::invalid(format!(
                "geometry type {code} does not have four digits"
            )));
        }

        let dimension = (code / 1000) as u8;
        let measure_ordinal = (code / 100 % 10) as u8;
        let kind = SdoGeometryKind::from_code(code % 100)?;

        if !(2..=4).contains(&dimension) {
            return Err(ConversionError::unsupported(format!(
                "geometry type {code} has unsupported dimension {dimension}"
            )));
        }
        if measure_ordinal != 0 && !(3..=dimension).contains(&measure_ordinal) {
            return Err(ConversionError::invalid(format!(
                "geometry type {code} has measure ordinal {measure_ordinal} outside of its dimension"
            )));
        }

        Ok(Self {
            dimension,
            measure_ordinal,
            kind,
        })
    }

    /// Whether the geometry has a measure ordinate.
    pub fn is_measured(&self) -> bool {
        self.measure_ordinal != 0
    }
}

/// `SDO_POINT` value.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdoPoint {
    /// X.
    pub x: f64,
    /// Y.
    pub y: f64,
    /// Z, `None` for 2d points.
    pub z: Option<f64>,
}

/// `SDO_ETYPE` of an element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    /// Point or point cluster.
    Point,
    /// Line string.
    Line,
    /// Exterior polygon ring.
    ExteriorRing,
    /// Interior polygon ring.
    InteriorRing,
}

impl ElementType {
    /// Numeric code of the element type.
    pub fn code(&self) -> i32 {
        match self {
            ElementType::Point => 1,
            ElementType::Line => 2,
            ElementType::ExteriorRing => 1003,
            ElementType::InteriorRing => 2003,
        }
    }

    /// Creates an element type from its code. Compound elements and rings of unknown orientation are not supported.
    pub fn from_code(code: i32) -> Result<Self, ConversionError> {
        Ok(match code {
            1 => ElementType::Point,
            2 => ElementType::Line,
            1003 => ElementType::ExteriorRing,
            2003 => ElementType::InteriorRing,
            4 | 1005 | 2005 => {
                return Err(ConversionError::unsupported(format!(
                    "compound element type {code} is not supported"
                )))
            }
            _ => {
                return Err(ConversionError::unsupported(format!(
                    "element type {code} is not supported"
                )))
            }
        })
    }
}

/// One `SDO_ELEM_INFO` triplet.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElemInfo {
    /// 1-based offset of the first ordinate of the element in the ordinates array.
    pub offset: usize,
    /// Element type.
    pub element_type: ElementType,
    /// Interpretation. Number of points for point clusters, `1` for straight segments, `3` for rectangles.
    pub interpretation: i32,
}

impl ElemInfo {
    /// Creates a new triplet.
    pub fn new(offset: usize, element_type: ElementType, interpretation: i32) -> Self {
        Self {
            offset,
            element_type,
            interpretation,
        }
    }
}

/// Value of an `SDO_GEOMETRY` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdoGeometry {
    /// `SDO_GTYPE`.
    pub gtype: SdoGType,
    /// `SDO_SRID`, [`UNSPECIFIED_SRID`] if not set.
    pub srid: i32,
    /// `SDO_POINT`.
    pub point: Option<SdoPoint>,
    /// `SDO_ELEM_INFO`.
    pub elem_info: Vec<ElemInfo>,
    /// `SDO_ORDINATES`.
    pub ordinates: Vec<Option<f64>>,
}

impl SdoGeometry {
    /// Creates a value from the attributes as a database driver returns them.
    ///
    /// `srid` of `None` means a null `SDO_SRID`. `elem_info` is the flat triplet array.
    pub fn from_raw(
        gtype: i32,
        srid: Option<i32>,
        point: Option<SdoPoint>,
        elem_info: &[i32],
        ordinates: Vec<Option<f64>>,
    ) -> Result<Self, ConversionError> {
        if elem_info.len() % 3 != 0 {
            return Err(ConversionError::invalid(format!(
                "element info length {} is not a multiple of 3",
                elem_info.len()
            )));
        }

        let elem_info = elem_info
            .chunks_exact(3)
            .map(|triplet| {
                let offset = usize::try_from(triplet[0])
                    .ok()
                    .filter(|offset| *offset >= 1)
                    .ok_or_else(|| {
                        ConversionError::invalid(format!("invalid element offset {}", triplet[0]))
                    })?;
                Ok(ElemInfo::new(
                    offset,
                    ElementType::from_code(triplet[1])?,
                    triplet[2],
                ))
            })
            .collect::<Result<Vec<_>, ConversionError>>()?;

        Ok(Self {
            gtype: SdoGType::from_code(gtype)?,
            srid: srid.unwrap_or(UNSPECIFIED_SRID),
            point,
            elem_info,
            ordinates,
        })
    }

    /// Creates a value with only the geometry type and SRID set.
    pub fn empty(gtype: SdoGType, srid: i32) -> Self {
        Self {
            gtype,
            srid,
            point: None,
            elem_info: vec![],
            ordinates: vec![],
        }
    }

    /// `SDO_ELEM_INFO` as a flat array.
    pub fn raw_elem_info(&self) -> Vec<i32> {
        self.elem_info
            .iter()
            .flat_map(|e| [e.offset as i32, e.element_type.code(), e.interpretation])
            .collect()
    }

    /// Whether the value holds no geometry data.
    pub fn is_empty(&self) -> bool {
        self.point.is_none() && self.elem_info.is_empty() && self.ordinates.is_empty()
    }
}
