// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Locally authored WKT
//!
//! Printing and extraction of the LOCAL_CS, COMPD_CS and FITTED_CS shapes
//! this crate writes. Every such definition ends with
//! `AUTHORITY["BENTLEY_SYSTEMS",...]`, which is how text we wrote is told
//! apart from third-party WKT that must go to the base library instead.

use gcs_lite_core::{format_g16, parse_f64_strict, parse_i64_strict, WktKeyword, WktSection};
use gcs_lite_geometry::{eq_eps, TransfoMatrix};

use crate::error::{Error, Result};
use crate::units::Unit;

/// Authority name marking locally authored definitions
pub const BENTLEY_AUTHORITY: &str = "BENTLEY_SYSTEMS";

/// Local datum type codes
pub const BLDT_ANYWHERE_XYZ: i64 = 11000;
pub const BLDT_ANYWHERE_LAT_LONG: i64 = 11001;
pub const BLDT_ANYWHERE_VERTICAL: i64 = 11002;

/// Kind of local datum in a LOCAL_CS definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalDatumType {
    /// Cartesian, linear unit
    AnywhereXyz,
    /// Horizontal part of a composed system, angular unit
    AnywhereLatLong,
    /// Vertical part of a composed system, linear unit
    AnywhereVertical,
}

impl LocalDatumType {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            BLDT_ANYWHERE_XYZ => Some(LocalDatumType::AnywhereXyz),
            BLDT_ANYWHERE_LAT_LONG => Some(LocalDatumType::AnywhereLatLong),
            BLDT_ANYWHERE_VERTICAL => Some(LocalDatumType::AnywhereVertical),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            LocalDatumType::AnywhereXyz => BLDT_ANYWHERE_XYZ,
            LocalDatumType::AnywhereLatLong => BLDT_ANYWHERE_LAT_LONG,
            LocalDatumType::AnywhereVertical => BLDT_ANYWHERE_VERTICAL,
        }
    }

    pub fn datum_name(&self) -> &'static str {
        match self {
            LocalDatumType::AnywhereXyz => "AnywhereXYZ",
            LocalDatumType::AnywhereLatLong => "AnywhereLatLong",
            LocalDatumType::AnywhereVertical => "AnywhereVertical",
        }
    }

    fn axes(&self) -> &'static str {
        match self {
            LocalDatumType::AnywhereXyz => r#"AXIS["X",OTHER], AXIS["Y",OTHER], AXIS["Z",OTHER]"#,
            LocalDatumType::AnywhereLatLong => r#"AXIS["Lat",OTHER], AXIS["Long",OTHER]"#,
            LocalDatumType::AnywhereVertical => r#"AXIS["Up",UP]"#,
        }
    }

    /// Angular for lat/long, linear otherwise
    fn is_angular(&self) -> bool {
        matches!(self, LocalDatumType::AnywhereLatLong)
    }
}

// ---------------------------------------------------------------------------
// Printing
// ---------------------------------------------------------------------------

fn escape_quotes(text: &str) -> String {
    text.replace('"', "\"\"")
}

fn local_cs_with_datum(datum: LocalDatumType, unit: &Unit) -> String {
    format!(
        r#"LOCAL_CS["", LOCAL_DATUM["{name}", {code}, AUTHORITY["{auth}","{code}"]], UNIT["{unit}", {ratio}], {axes}, AUTHORITY["{auth}","0"]]"#,
        name = datum.datum_name(),
        code = datum.code(),
        auth = BENTLEY_AUTHORITY,
        unit = escape_quotes(unit.name()),
        ratio = format_g16(unit.ratio_to_base()),
        axes = datum.axes(),
    )
}

/// Single-unit local coordinate system (the unit is expected to be linear)
pub fn local_cs_wkt(unit: &Unit) -> String {
    local_cs_with_datum(LocalDatumType::AnywhereXyz, unit)
}

/// Composed local coordinate system: horizontal lat/long + vertical
pub fn local_composed_cs_wkt(horizontal: &Unit, vertical: &Unit) -> String {
    format!(
        r#"COMPD_CS["", {}, {}, AUTHORITY["{}","0"]]"#,
        local_cs_with_datum(LocalDatumType::AnywhereLatLong, horizontal),
        local_cs_with_datum(LocalDatumType::AnywhereVertical, vertical),
        BENTLEY_AUTHORITY,
    )
}

/// Affine PARAM_MT listing only the cells that differ from identity
fn param_mt_wkt(transform: &TransfoMatrix) -> String {
    let identity = TransfoMatrix::identity();
    let mut parameters = Vec::new();

    for row in 0..TransfoMatrix::ROWS {
        for col in 0..TransfoMatrix::COLS {
            let value = transform.get(row, col);
            if !eq_eps(value, identity.get(row, col)) {
                parameters.push(format!(
                    r#"PARAMETER["elt_{}_{}", {}]"#,
                    row,
                    col,
                    format_g16(value)
                ));
            }
        }
    }

    if parameters.is_empty() {
        r#"PARAM_MT["Affine"]"#.to_string()
    } else {
        format!(r#"PARAM_MT["Affine", {}]"#, parameters.join(","))
    }
}

/// Fitted coordinate system wrapping `base_cs_wkt`
///
/// When `transform_is_to_base` is false the matrix maps global to local
/// and is wrapped in INVERSE_MT.
pub fn fitted_cs_wkt(transform: &TransfoMatrix, transform_is_to_base: bool, base_cs_wkt: &str) -> String {
    let param_mt = param_mt_wkt(transform);
    let to_base = if transform_is_to_base {
        param_mt
    } else {
        format!("INVERSE_MT[{}]", param_mt)
    };

    format!(
        r#"FITTED_CS["", {}, {}, AUTHORITY["{}","0"]]"#,
        to_base, base_cs_wkt, BENTLEY_AUTHORITY
    )
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Check if the last parameter is `AUTHORITY["BENTLEY_SYSTEMS", code]`
pub fn has_bentley_as_authority(section: &WktSection) -> bool {
    section
        .last()
        .and_then(|p| p.as_section())
        .filter(|authority| authority.keyword() == WktKeyword::Authority && authority.len() == 2)
        .and_then(|authority| authority.get(0))
        .and_then(|name| name.as_quoted())
        .map_or(false, |name| name == BENTLEY_AUTHORITY)
}

fn expect_keyword(section: &WktSection, keyword: WktKeyword, min_len: usize) -> Result<()> {
    if section.keyword() != keyword {
        return Err(Error::structure(format!(
            "expected {}, found {}",
            keyword,
            section.name()
        )));
    }
    if section.len() < min_len {
        return Err(Error::structure(format!(
            "{} needs at least {} parameters, found {}",
            keyword,
            min_len,
            section.len()
        )));
    }
    Ok(())
}

fn section_parameter<'s, 'a>(section: &'s WktSection<'a>, index: usize) -> Result<&'s WktSection<'a>> {
    section
        .get(index)
        .and_then(|p| p.as_section())
        .ok_or_else(|| {
            Error::structure(format!(
                "parameter {} of {} is not a section",
                index,
                section.name()
            ))
        })
}

/// Extract the unit of a locally authored LOCAL_CS
pub fn extract_local_cs(section: &WktSection) -> Result<Unit> {
    expect_keyword(section, WktKeyword::LocalCs, 3)?;

    let datum = section_parameter(section, 1)?;
    expect_keyword(datum, WktKeyword::LocalDatum, 2)?;
    let code_text = datum.get(1).map(|p| p.unquoted()).unwrap_or_default();
    let datum_type = parse_i64_strict(code_text)
        .and_then(LocalDatumType::from_code)
        .ok_or_else(|| Error::structure(format!("unrecognized local datum type '{}'", code_text)))?;

    let unit = section_parameter(section, 2)?;
    expect_keyword(unit, WktKeyword::Unit, 2)?;
    let name = unit
        .get(0)
        .and_then(|p| p.as_quoted())
        .ok_or_else(|| Error::structure("unit name is not quoted"))?
        .replace("\"\"", "\"");
    let ratio_text = unit.get(1).map(|p| p.unquoted()).unwrap_or_default();
    let ratio = parse_f64_strict(ratio_text)
        .filter(|ratio| *ratio > 0.0)
        .ok_or_else(|| Error::structure(format!("invalid unit ratio '{}'", ratio_text)))?;

    Ok(if datum_type.is_angular() {
        Unit::create_angular_from(name, ratio)
    } else {
        Unit::create_linear_from(name, ratio)
    })
}

/// Extract (horizontal, vertical) units of a locally authored COMPD_CS
pub fn extract_local_composed_cs(section: &WktSection) -> Result<(Unit, Unit)> {
    expect_keyword(section, WktKeyword::CompdCs, 3)?;

    let horizontal = extract_local_cs(section_parameter(section, 1)?)?;
    let vertical = extract_local_cs(section_parameter(section, 2)?)?;

    if !horizontal.is_angular() {
        return Err(Error::structure("horizontal unit of a composed system must be angular"));
    }
    if !vertical.is_linear() {
        return Err(Error::structure("vertical unit of a composed system must be linear"));
    }

    Ok((horizontal, vertical))
}

/// Parts of a locally authored FITTED_CS
#[derive(Debug, Clone, PartialEq)]
pub struct FittedCs<'a> {
    /// Affine matrix; cells not listed stay at identity
    pub transform: TransfoMatrix,
    /// False when the matrix was wrapped in INVERSE_MT
    pub transform_is_to_base: bool,
    /// Embedded base definition, verbatim
    pub base_cs_wkt: &'a str,
}

/// Parse "elt_<row>_<col>"
fn parse_element_name(name: &str) -> Option<(usize, usize)> {
    let (row, col) = name.strip_prefix("elt_")?.split_once('_')?;
    let row = parse_i64_strict(row)?;
    let col = parse_i64_strict(col)?;

    let rows = 0..TransfoMatrix::ROWS as i64;
    let cols = 0..TransfoMatrix::COLS as i64;
    if rows.contains(&row) && cols.contains(&col) {
        Some((row as usize, col as usize))
    } else {
        None
    }
}

/// Extract transform, direction and embedded base text of a FITTED_CS
pub fn extract_fitted_cs<'a>(section: &WktSection<'a>) -> Result<FittedCs<'a>> {
    expect_keyword(section, WktKeyword::FittedCs, 3)?;

    let to_base = section_parameter(section, 1)?;
    let (param_mt, transform_is_to_base) = match to_base.keyword() {
        WktKeyword::ParamMt => (to_base, true),
        WktKeyword::InverseMt if to_base.len() == 1 => {
            let inner = section_parameter(to_base, 0)?;
            if inner.keyword() != WktKeyword::ParamMt {
                return Err(Error::structure("INVERSE_MT must wrap a PARAM_MT"));
            }
            (inner, false)
        }
        _ => {
            return Err(Error::structure(format!(
                "expected PARAM_MT or INVERSE_MT, found {}",
                to_base.name()
            )))
        }
    };

    if param_mt.get(0).and_then(|p| p.as_quoted()) != Some("Affine") {
        return Err(Error::structure("only Affine PARAM_MT is supported"));
    }

    let mut transform = TransfoMatrix::identity();
    for parameter in &param_mt.parameters()[1..] {
        let element = parameter
            .as_section()
            .filter(|s| s.keyword() == WktKeyword::Parameter && s.len() == 2)
            .ok_or_else(|| Error::structure(format!("invalid affine parameter '{}'", parameter.raw())))?;

        let name = element.get(0).map(|p| p.unquoted()).unwrap_or_default();
        let (row, col) = parse_element_name(name)
            .ok_or_else(|| Error::structure(format!("invalid matrix element '{}'", name)))?;

        let value_text = element.get(1).map(|p| p.unquoted()).unwrap_or_default();
        let value = parse_f64_strict(value_text)
            .ok_or_else(|| Error::structure(format!("invalid matrix value '{}'", value_text)))?;

        transform.set(row, col, value);
    }

    let base_cs_wkt = section
        .get(2)
        .map(|p| p.raw())
        .ok_or_else(|| Error::structure("missing base coordinate system"))?;

    Ok(FittedCs {
        transform,
        transform_is_to_base,
        base_cs_wkt,
    })
}
