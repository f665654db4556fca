// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Base coordinate system collaborator
//!
//! A base GCS is a geodetic or projected definition owned by an external
//! library. The model only needs a handful of operations from it, captured
//! by [`BaseGcs`] and [`BaseGcsLibrary`]. [`WktBaseGcsLibrary`] is the
//! built-in implementation: it keeps WKT1 definitions as canonical text and
//! reads their unit.

use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use gcs_lite_core::{parse_f64_strict, parse_wkt, WktKeyword, WktSection};

use crate::error::{Error, Result};

/// WKT dialect understood by the base library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum WktFlavor {
    Unknown = 0,
    Ogc = 1,
    GeoTiff = 2,
    Esri = 3,
    Oracle = 4,
    GeoTools = 5,
    Epsg = 6,
    Oracle9 = 7,
    #[default]
    Autodesk = 8,
}

impl WktFlavor {
    /// Flavor used when none is given
    pub const DEFAULT: WktFlavor = WktFlavor::Autodesk;

    const ALL: [WktFlavor; 9] = [
        WktFlavor::Unknown,
        WktFlavor::Ogc,
        WktFlavor::GeoTiff,
        WktFlavor::Esri,
        WktFlavor::Oracle,
        WktFlavor::GeoTools,
        WktFlavor::Epsg,
        WktFlavor::Oracle9,
        WktFlavor::Autodesk,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WktFlavor::Unknown => "UNKNOWN",
            WktFlavor::Ogc => "OGC",
            WktFlavor::GeoTiff => "GEOTIFF",
            WktFlavor::Esri => "ESRI",
            WktFlavor::Oracle => "ORACLE",
            WktFlavor::GeoTools => "GEOTOOLS",
            WktFlavor::Epsg => "EPSG",
            WktFlavor::Oracle9 => "ORACLE9",
            WktFlavor::Autodesk => "AUTODESK",
        }
    }

    /// Case-insensitive lookup by flavor name
    pub fn from_name(name: &str) -> Option<WktFlavor> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|flavor| flavor.name().eq_ignore_ascii_case(name))
    }

    /// Numeric flavor code
    #[inline]
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Guess the flavor of a WKT text
    ///
    /// An explicit `NAME::` prefix wins and is stripped from the returned
    /// text. Otherwise the text is returned unchanged and the flavor is
    /// sniffed from well-known markers.
    pub fn detect(text: &str) -> (WktFlavor, &str) {
        let trimmed = text.trim_start();
        if let Some((prefix, rest)) = trimmed.split_once("::") {
            if let Some(flavor) = Self::from_name(prefix).filter(|f| *f != WktFlavor::Unknown) {
                return (flavor, rest);
            }
        }

        let flavor = if trimmed.contains(r#"GEOGCS["GCS_"#) {
            WktFlavor::Esri
        } else if trimmed.contains(r#"AUTHORITY["EPSG""#) {
            WktFlavor::Epsg
        } else {
            WktFlavor::Unknown
        };
        (flavor, text)
    }
}

impl fmt::Display for WktFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WktFlavor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| Error::BaseGcs(format!("unknown WKT flavor '{}'", s)))
    }
}

/// Base coordinate system owned by an external library
pub trait BaseGcs: fmt::Debug + Send + Sync {
    fn is_valid(&self) -> bool;

    fn is_equivalent(&self, other: &dyn BaseGcs) -> bool;

    /// Name of the unit of the (horizontal) coordinate system
    fn units(&self) -> &str;

    /// Size of the unit in meters, or radians when geographic
    fn unit_ratio(&self) -> Option<f64> {
        None
    }

    /// True when the horizontal coordinates are angular
    fn is_geographic(&self) -> bool {
        false
    }

    fn well_known_text(&self, flavor: WktFlavor, single_flavor_only: bool) -> Result<String>;

    /// WKT including the vertical component when there is one
    fn compound_well_known_text(&self, flavor: WktFlavor, single_flavor_only: bool) -> Result<String>;

    fn as_any(&self) -> &dyn Any;
}

/// Library able to build base coordinate systems from WKT
pub trait BaseGcsLibrary: fmt::Debug + Send + Sync {
    fn init_from_well_known_text(&self, flavor: WktFlavor, text: &str) -> Result<Arc<dyn BaseGcs>>;
}

/// WKT1 definition held as canonical text
#[derive(Debug, Clone, PartialEq)]
pub struct WktBaseGcs {
    keyword: WktKeyword,
    horizontal_keyword: WktKeyword,
    canonical: String,
    horizontal: String,
    units: String,
    unit_ratio: Option<f64>,
}

impl WktBaseGcs {
    /// Root keywords accepted as base definitions
    pub fn accepts(keyword: WktKeyword) -> bool {
        matches!(
            keyword,
            WktKeyword::GeogCs
                | WktKeyword::ProjCs
                | WktKeyword::GeocCs
                | WktKeyword::VertCs
                | WktKeyword::CompdCs
                | WktKeyword::LocalCs
        )
    }

    pub fn from_section(section: &WktSection) -> Result<Self> {
        let keyword = section.keyword();
        if !Self::accepts(keyword) {
            return Err(Error::BaseGcs(format!(
                "unsupported base coordinate system '{}'",
                section.name()
            )));
        }

        // The horizontal part of a compound system is its first component
        let horizontal = if keyword == WktKeyword::CompdCs {
            section
                .parameters()
                .iter()
                .filter_map(|p| p.as_section())
                .find(|s| s.keyword().is_coordinate_system())
        } else {
            Some(section)
        };

        let unit = horizontal.and_then(|s| s.child(WktKeyword::Unit));
        let units = unit
            .and_then(|unit| unit.get(0))
            .and_then(|name| name.as_quoted())
            .unwrap_or_default()
            .replace("\"\"", "\"");
        let unit_ratio = unit
            .and_then(|unit| unit.get(1))
            .and_then(|ratio| parse_f64_strict(ratio.unquoted()))
            .filter(|ratio| *ratio > 0.0);

        Ok(Self {
            keyword,
            horizontal_keyword: horizontal.map_or(keyword, |s| s.keyword()),
            canonical: section.to_string(),
            horizontal: horizontal.map(|s| s.to_string()).unwrap_or_default(),
            units,
            unit_ratio,
        })
    }

    #[inline]
    pub fn keyword(&self) -> WktKeyword {
        self.keyword
    }

    #[inline]
    pub fn is_compound(&self) -> bool {
        self.keyword == WktKeyword::CompdCs
    }

    /// Canonical re-serialized definition
    #[inline]
    pub fn canonical_text(&self) -> &str {
        &self.canonical
    }
}

impl BaseGcs for WktBaseGcs {
    fn is_valid(&self) -> bool {
        !self.units.is_empty()
    }

    fn is_equivalent(&self, other: &dyn BaseGcs) -> bool {
        other
            .as_any()
            .downcast_ref::<WktBaseGcs>()
            .map_or(false, |other| other.canonical == self.canonical)
    }

    fn units(&self) -> &str {
        &self.units
    }

    fn unit_ratio(&self) -> Option<f64> {
        self.unit_ratio
    }

    fn is_geographic(&self) -> bool {
        self.horizontal_keyword == WktKeyword::GeogCs
    }

    fn well_known_text(&self, _flavor: WktFlavor, _single_flavor_only: bool) -> Result<String> {
        if self.horizontal.is_empty() {
            return Err(Error::BaseGcs("compound system has no horizontal component".to_string()));
        }
        Ok(self.horizontal.clone())
    }

    fn compound_well_known_text(&self, _flavor: WktFlavor, _single_flavor_only: bool) -> Result<String> {
        Ok(self.canonical.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Built-in base library for WKT1 text
#[derive(Debug, Clone, Copy, Default)]
pub struct WktBaseGcsLibrary;

impl BaseGcsLibrary for WktBaseGcsLibrary {
    fn init_from_well_known_text(&self, flavor: WktFlavor, text: &str) -> Result<Arc<dyn BaseGcs>> {
        let section = parse_wkt(text).map_err(|e| Error::BaseGcs(e.to_string()))?;
        let base = WktBaseGcs::from_section(&section)?;
        tracing::debug!(
            flavor = %flavor,
            keyword = ?base.keyword(),
            units = base.units(),
            "Initialized base GCS"
        );
        Ok(Arc::new(base))
    }
}
