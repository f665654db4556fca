// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WKT Keywords
//!
//! Fast keyword checking using an enum instead of string comparison.

use std::fmt;

/// WKT section keywords
///
/// Only the keywords the coordinate system model dispatches on are
/// classified; everything else maps to [`WktKeyword::Unknown`] and keeps its
/// raw name on the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WktKeyword {
    // Locally authored coordinate systems
    LocalCs,
    FittedCs,
    CompdCs,
    Null,

    // Building blocks
    LocalDatum,
    Unit,
    Parameter,
    ParamMt,
    InverseMt,
    Authority,
    Axis,

    // WKT1 base coordinate systems
    GeogCs,
    ProjCs,
    GeocCs,
    VertCs,
    Datum,
    VertDatum,
    Spheroid,
    Primem,
    Projection,
    ToWgs84,

    Unknown,
}

impl WktKeyword {
    /// Classify a keyword name (case-sensitive)
    pub fn from_name(name: &str) -> Self {
        match name {
            "LOCAL_CS" => WktKeyword::LocalCs,
            "FITTED_CS" => WktKeyword::FittedCs,
            "COMPD_CS" => WktKeyword::CompdCs,
            "NULL" => WktKeyword::Null,
            "LOCAL_DATUM" => WktKeyword::LocalDatum,
            "UNIT" => WktKeyword::Unit,
            "PARAMETER" => WktKeyword::Parameter,
            "PARAM_MT" => WktKeyword::ParamMt,
            "INVERSE_MT" => WktKeyword::InverseMt,
            "AUTHORITY" => WktKeyword::Authority,
            "AXIS" => WktKeyword::Axis,
            "GEOGCS" => WktKeyword::GeogCs,
            "PROJCS" => WktKeyword::ProjCs,
            "GEOCCS" => WktKeyword::GeocCs,
            "VERT_CS" => WktKeyword::VertCs,
            "DATUM" => WktKeyword::Datum,
            "VERT_DATUM" => WktKeyword::VertDatum,
            "SPHEROID" => WktKeyword::Spheroid,
            "PRIMEM" => WktKeyword::Primem,
            "PROJECTION" => WktKeyword::Projection,
            "TOWGS84" => WktKeyword::ToWgs84,
            _ => WktKeyword::Unknown,
        }
    }

    /// Canonical keyword text
    pub fn as_str(&self) -> &'static str {
        match self {
            WktKeyword::LocalCs => "LOCAL_CS",
            WktKeyword::FittedCs => "FITTED_CS",
            WktKeyword::CompdCs => "COMPD_CS",
            WktKeyword::Null => "NULL",
            WktKeyword::LocalDatum => "LOCAL_DATUM",
            WktKeyword::Unit => "UNIT",
            WktKeyword::Parameter => "PARAMETER",
            WktKeyword::ParamMt => "PARAM_MT",
            WktKeyword::InverseMt => "INVERSE_MT",
            WktKeyword::Authority => "AUTHORITY",
            WktKeyword::Axis => "AXIS",
            WktKeyword::GeogCs => "GEOGCS",
            WktKeyword::ProjCs => "PROJCS",
            WktKeyword::GeocCs => "GEOCCS",
            WktKeyword::VertCs => "VERT_CS",
            WktKeyword::Datum => "DATUM",
            WktKeyword::VertDatum => "VERT_DATUM",
            WktKeyword::Spheroid => "SPHEROID",
            WktKeyword::Primem => "PRIMEM",
            WktKeyword::Projection => "PROJECTION",
            WktKeyword::ToWgs84 => "TOWGS84",
            WktKeyword::Unknown => "UNKNOWN",
        }
    }

    /// Check if the keyword opens a complete coordinate system definition
    pub fn is_coordinate_system(&self) -> bool {
        matches!(
            self,
            WktKeyword::LocalCs
                | WktKeyword::FittedCs
                | WktKeyword::CompdCs
                | WktKeyword::GeogCs
                | WktKeyword::ProjCs
                | WktKeyword::GeocCs
                | WktKeyword::VertCs
        )
    }
}

impl fmt::Display for WktKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
