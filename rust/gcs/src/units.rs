// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Measurement units
//!
//! A [`Unit`] is linear (meter based) or angular (radian based) and stores
//! its ratio to that base. Canonical meter, radian and degree units are
//! process-wide statics.

use std::borrow::Cow;
use std::sync::OnceLock;

use gcs_lite_geometry::eq_eps;
use rustc_hash::FxHashMap;

/// Radians in one degree
pub const RADIANS_PER_DEGREE: f64 = std::f64::consts::PI / 180.0;

/// Kind of quantity a unit measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitBase {
    /// Linear, ratio expressed in meters
    Meter,
    /// Angular, ratio expressed in radians
    Radian,
}

/// Immutable measurement unit
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    name: Cow<'static, str>,
    base: UnitBase,
    ratio_to_base: f64,
}

static METER: Unit = Unit {
    name: Cow::Borrowed("meter"),
    base: UnitBase::Meter,
    ratio_to_base: 1.0,
};

static RADIAN: Unit = Unit {
    name: Cow::Borrowed("radian"),
    base: UnitBase::Radian,
    ratio_to_base: 1.0,
};

static DEGREE: Unit = Unit {
    name: Cow::Borrowed("degree"),
    base: UnitBase::Radian,
    ratio_to_base: RADIANS_PER_DEGREE,
};

impl Unit {
    /// Linear unit from its size in meters
    pub fn create_linear_from(name: impl Into<Cow<'static, str>>, ratio_to_meter: f64) -> Self {
        debug_assert!(ratio_to_meter > 0.0);
        Self {
            name: name.into(),
            base: UnitBase::Meter,
            ratio_to_base: ratio_to_meter,
        }
    }

    /// Angular unit from its size in radians
    pub fn create_angular_from(name: impl Into<Cow<'static, str>>, ratio_to_radian: f64) -> Self {
        debug_assert!(ratio_to_radian > 0.0);
        Self {
            name: name.into(),
            base: UnitBase::Radian,
            ratio_to_base: ratio_to_radian,
        }
    }

    /// Angular unit from its size in degrees
    pub fn create_from_degree_based(name: impl Into<Cow<'static, str>>, ratio_to_degree: f64) -> Self {
        Self::create_angular_from(name, ratio_to_degree * RADIANS_PER_DEGREE)
    }

    #[inline]
    pub fn meter() -> &'static Unit {
        &METER
    }

    #[inline]
    pub fn radian() -> &'static Unit {
        &RADIAN
    }

    #[inline]
    pub fn degree() -> &'static Unit {
        &DEGREE
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn base_kind(&self) -> UnitBase {
        self.base
    }

    #[inline]
    pub fn ratio_to_base(&self) -> f64 {
        self.ratio_to_base
    }

    #[inline]
    pub fn is_linear(&self) -> bool {
        self.base == UnitBase::Meter
    }

    #[inline]
    pub fn is_angular(&self) -> bool {
        self.base == UnitBase::Radian
    }

    /// Conventional display unit of the same kind
    ///
    /// Meter for linear units, degree (not radian) for angular units.
    pub fn get_base(&self) -> &'static Unit {
        match self.base {
            UnitBase::Meter => &METER,
            UnitBase::Radian => &DEGREE,
        }
    }

    /// Same kind and same ratio within epsilon; names are ignored
    pub fn is_equivalent(&self, other: &Unit) -> bool {
        self.base == other.base && eq_eps(self.ratio_to_base, other.ratio_to_base)
    }

    /// Look up a well-known unit by name
    ///
    /// Case-insensitive; underscores and hyphens are treated as spaces.
    pub fn from_name(name: &str) -> Option<Unit> {
        let key = normalize_unit_name(name);
        known_units()
            .get(key.as_str())
            .map(|(canonical, base, ratio)| Unit {
                name: Cow::Borrowed(*canonical),
                base: *base,
                ratio_to_base: *ratio,
            })
    }
}

fn normalize_unit_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '_' | '-' => ' ',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

type UnitEntry = (&'static str, UnitBase, f64);

/// Alias -> (canonical name, base, ratio to base)
fn known_units() -> &'static FxHashMap<&'static str, UnitEntry> {
    static TABLE: OnceLock<FxHashMap<&'static str, UnitEntry>> = OnceLock::new();

    TABLE.get_or_init(|| {
        const US_FOOT: f64 = 1200.0 / 3937.0;
        let groups: [(&[&'static str], UnitEntry); 16] = [
            (&["meter", "metre", "m", "meters", "metres"], ("meter", UnitBase::Meter, 1.0)),
            (&["millimeter", "millimetre", "mm"], ("millimeter", UnitBase::Meter, 1e-3)),
            (&["centimeter", "centimetre", "cm"], ("centimeter", UnitBase::Meter, 1e-2)),
            (&["kilometer", "kilometre", "km"], ("kilometer", UnitBase::Meter, 1e3)),
            (&["foot", "feet", "ft", "international foot", "iftm"], ("foot", UnitBase::Meter, 0.3048)),
            (
                &["us survey foot", "us foot", "foot us", "us feet", "ftus", "survey foot"],
                ("us survey foot", UnitBase::Meter, US_FOOT),
            ),
            (&["inch", "in"], ("inch", UnitBase::Meter, 0.0254)),
            (&["yard", "yd"], ("yard", UnitBase::Meter, 0.9144)),
            (&["mile", "mi", "statute mile"], ("mile", UnitBase::Meter, 1609.344)),
            (&["chain", "gunter chain"], ("chain", UnitBase::Meter, 20.1168)),
            (&["degree", "degrees", "deg"], ("degree", UnitBase::Radian, RADIANS_PER_DEGREE)),
            (&["radian", "radians", "rad"], ("radian", UnitBase::Radian, 1.0)),
            (&["grad", "gon", "grade"], ("grad", UnitBase::Radian, std::f64::consts::PI / 200.0)),
            (
                &["arc minute", "arcminute", "minute"],
                ("arc minute", UnitBase::Radian, RADIANS_PER_DEGREE / 60.0),
            ),
            (
                &["arc second", "arcsecond", "second"],
                ("arc second", UnitBase::Radian, RADIANS_PER_DEGREE / 3600.0),
            ),
            (&["microradian", "urad"], ("microradian", UnitBase::Radian, 1e-6)),
        ];

        let mut table = FxHashMap::default();
        for (aliases, entry) in groups {
            for alias in aliases {
                table.insert(*alias, entry);
            }
        }
        table
    })
}
