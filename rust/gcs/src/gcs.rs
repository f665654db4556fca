// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate system value type
//!
//! A [`Gcs`] combines an optional base coordinate system, a horizontal and
//! vertical unit pair and an optional local transform. The payload sits
//! behind an [`Arc`]: clones share it, mutators copy it first when shared.

use std::sync::{Arc, OnceLock};

use gcs_lite_geometry::{eq_eps, LocalTransform, TransfoMatrix};

use crate::base::{BaseGcs, WktFlavor};
use crate::error::{Error, Result};
use crate::georef::GeoRef;
use crate::units::{Unit, UnitBase};
use crate::wkt::Wkt;
use crate::wkt_parsing::{fitted_cs_wkt, local_composed_cs_wkt, local_cs_wkt};

#[derive(Debug, Clone, PartialEq)]
struct UnitPair {
    horizontal: Unit,
    vertical: Unit,
}

impl UnitPair {
    /// Vertical follows a linear horizontal unit, otherwise meter
    fn from_horizontal(horizontal: Unit) -> Self {
        let vertical = if horizontal.is_linear() {
            horizontal.clone()
        } else {
            Unit::meter().clone()
        };
        Self {
            horizontal,
            vertical,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct GcsImpl {
    geo_ref: GeoRef,
    units: Option<UnitPair>,
    local_transform: LocalTransform,
    has_local_transform: bool,
}

impl GcsImpl {
    fn set_local_transform(&mut self, local_transform: LocalTransform) {
        self.has_local_transform = !local_transform.is_identity();
        self.local_transform = local_transform;
    }
}

/// Coordinate system definition
#[derive(Debug, Clone)]
pub struct Gcs {
    inner: Arc<GcsImpl>,
}

impl Default for Gcs {
    fn default() -> Self {
        Gcs::null().clone()
    }
}

impl Gcs {
    fn from_impl(mut payload: GcsImpl, local_transform: Option<&LocalTransform>) -> Self {
        if let Some(local_transform) = local_transform {
            payload.set_local_transform(local_transform.clone());
        }
        Self {
            inner: Arc::new(payload),
        }
    }

    /// Process-wide null GCS: no unit, no base, no transform
    pub fn null() -> &'static Gcs {
        static NULL: OnceLock<Gcs> = OnceLock::new();
        NULL.get_or_init(|| Gcs {
            inner: Arc::new(GcsImpl::default()),
        })
    }

    pub(crate) fn from_unit(unit: Unit, local_transform: Option<&LocalTransform>) -> Self {
        Self::from_impl(
            GcsImpl {
                units: Some(UnitPair::from_horizontal(unit)),
                ..GcsImpl::default()
            },
            local_transform,
        )
    }

    pub(crate) fn from_geo_ref(
        geo_ref: GeoRef,
        unit: Unit,
        local_transform: Option<&LocalTransform>,
    ) -> Self {
        Self::from_impl(
            GcsImpl {
                geo_ref,
                units: Some(UnitPair::from_horizontal(unit)),
                ..GcsImpl::default()
            },
            local_transform,
        )
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.inner.units.is_none()
    }

    #[inline]
    pub fn has_geo_ref(&self) -> bool {
        !self.inner.geo_ref.is_null()
    }

    #[inline]
    pub fn geo_ref(&self) -> &GeoRef {
        &self.inner.geo_ref
    }

    /// True when the horizontal unit is not angular
    pub fn has_uniform_units(&self) -> bool {
        self.inner
            .units
            .as_ref()
            .map_or(false, |units| !units.horizontal.is_angular())
    }

    /// Horizontal unit; `None` for the null GCS
    #[inline]
    pub fn unit(&self) -> Option<&Unit> {
        self.horizontal_unit()
    }

    #[inline]
    pub fn horizontal_unit(&self) -> Option<&Unit> {
        self.inner.units.as_ref().map(|units| &units.horizontal)
    }

    #[inline]
    pub fn vertical_unit(&self) -> Option<&Unit> {
        self.inner.units.as_ref().map(|units| &units.vertical)
    }

    #[inline]
    pub fn has_local_transform(&self) -> bool {
        self.inner.has_local_transform
    }

    #[inline]
    pub fn local_transform(&self) -> &LocalTransform {
        &self.inner.local_transform
    }

    /// Replace the vertical unit, which must be linear
    pub fn set_vertical_unit(&mut self, unit: Unit) -> Result<()> {
        if !unit.is_linear() {
            return Err(Error::NonLinearVerticalUnit(unit.name().to_string()));
        }
        if self.is_null() {
            return Err(Error::NullGcs);
        }

        if let Some(units) = Arc::make_mut(&mut self.inner).units.as_mut() {
            units.vertical = unit;
        }
        Ok(())
    }

    pub fn set_local_transform(&mut self, local_transform: LocalTransform) {
        Arc::make_mut(&mut self.inner).set_local_transform(local_transform);
    }

    /// Compose `appended` on top of the current transform
    ///
    /// On failure the GCS is left untouched.
    pub fn append_local_transform(&mut self, appended: &LocalTransform) -> Result<()> {
        let combined = LocalTransform::combine(&self.inner.local_transform, appended)?;
        Arc::make_mut(&mut self.inner).set_local_transform(combined);
        Ok(())
    }

    /// Check if both handles share one payload
    #[inline]
    pub fn shares_payload(&self, other: &Gcs) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    #[inline]
    pub fn swap(&mut self, other: &mut Gcs) {
        std::mem::swap(&mut self.inner, &mut other.inner);
    }

    /// WKT in the default flavor
    pub fn wkt(&self) -> Result<Wkt> {
        self.get_wkt(WktFlavor::DEFAULT)
    }

    /// Export as WKT
    ///
    /// A local transform yields FITTED_CS around the base or local text; a
    /// base yields its compound WKT; units alone yield LOCAL_CS (COMPD_CS
    /// when the horizontal unit is angular); the null GCS yields "".
    pub fn get_wkt(&self, flavor: WktFlavor) -> Result<Wkt> {
        if self.inner.has_local_transform {
            return self.fitted_wkt(flavor).map(Wkt::from);
        }

        if let Some(base) = self.inner.geo_ref.base() {
            return Ok(base.compound_well_known_text(flavor, false)?.into());
        }

        match &self.inner.units {
            Some(units) => Ok(local_wkt(units).into()),
            None => Ok(Wkt::default()),
        }
    }

    fn fitted_wkt(&self, flavor: WktFlavor) -> Result<String> {
        let (transform, transform_is_to_base) = self.fitted_matrix()?;

        let base_cs_wkt = if let Some(base) = self.inner.geo_ref.base() {
            base.compound_well_known_text(flavor, false)?
        } else if let Some(units) = &self.inner.units {
            local_wkt(units)
        } else {
            return Err(Error::NullGcs);
        };

        Ok(fitted_cs_wkt(&transform, transform_is_to_base, &base_cs_wkt))
    }

    /// Matrix of the local transform, to-global preferred
    ///
    /// An identity direction is skipped when the other one carries the
    /// actual transform.
    fn fitted_matrix(&self) -> Result<(TransfoMatrix, bool)> {
        let local_transform = &self.inner.local_transform;
        let to_local_is_identity = local_transform.to_local().map_or(true, |m| m.is_identity());

        if let Some(matrix) = local_transform
            .to_global()
            .filter(|m| !m.is_identity() || to_local_is_identity)
            .and_then(|m| m.convert_to_matrix())
        {
            return Ok((matrix, true));
        }
        if let Some(matrix) = local_transform.to_local().and_then(|m| m.convert_to_matrix()) {
            return Ok((matrix, false));
        }
        Err(Error::NotMatrixConvertible)
    }

    /// Equivalence driven by how `self` is defined
    ///
    /// A GCS with a base only matches one with an equivalent base; a unit-only
    /// GCS only matches another unit-only GCS; null only matches null.
    pub fn is_equivalent(&self, rhs: &Gcs) -> bool {
        if let Some(base) = self.inner.geo_ref.base() {
            let Some(rhs_base) = rhs.inner.geo_ref.base() else {
                return false;
            };
            return base.is_equivalent(rhs_base.as_ref()) && self.transforms_equivalent(rhs);
        }

        if !self.is_null() {
            if rhs.is_null() || rhs.has_geo_ref() {
                return false;
            }
            return have_equivalent_units(self, rhs) && self.transforms_equivalent(rhs);
        }

        rhs.is_null()
    }

    fn transforms_equivalent(&self, rhs: &Gcs) -> bool {
        if !self.has_local_transform() && !rhs.has_local_transform() {
            return true;
        }
        self.local_transform().is_equivalent(rhs.local_transform())
    }
}

fn local_wkt(units: &UnitPair) -> String {
    if units.horizontal.is_linear() {
        local_cs_wkt(&units.horizontal)
    } else {
        // Vertical unit is not carried for angular systems
        local_composed_cs_wkt(&units.horizontal, Unit::meter())
    }
}

/// Unit of a base coordinate system
///
/// The kind follows the base (angular when geographic) and the ratio comes
/// from its unit definition. Known names are reported under their usual
/// spelling. Without a ratio the name alone decides, and unknown names fall
/// back to meter.
pub fn get_unit_for(base: &dyn BaseGcs) -> Unit {
    let name = base.units();
    let Some(ratio) = base.unit_ratio() else {
        return Unit::from_name(name).unwrap_or_else(|| {
            tracing::warn!(units = name, "Unmapped base GCS unit, using meter");
            Unit::meter().clone()
        });
    };

    let kind = if base.is_geographic() {
        UnitBase::Radian
    } else {
        UnitBase::Meter
    };
    if let Some(known) = Unit::from_name(name)
        .filter(|known| known.base_kind() == kind && eq_eps(known.ratio_to_base(), ratio))
    {
        return known;
    }

    match kind {
        UnitBase::Radian => Unit::create_angular_from(name.to_string(), ratio),
        UnitBase::Meter => Unit::create_linear_from(name.to_string(), ratio),
    }
}

/// Same unit kinds, horizontally and vertically
pub fn have_compatible_units(a: &Gcs, b: &Gcs) -> bool {
    match (&a.inner.units, &b.inner.units) {
        (Some(a), Some(b)) => {
            a.horizontal.base_kind() == b.horizontal.base_kind()
                && a.vertical.base_kind() == b.vertical.base_kind()
        }
        (None, None) => true,
        _ => false,
    }
}

/// Equivalent units, horizontally and vertically
pub fn have_equivalent_units(a: &Gcs, b: &Gcs) -> bool {
    match (&a.inner.units, &b.inner.units) {
        (Some(a), Some(b)) => {
            a.horizontal.is_equivalent(&b.horizontal) && a.vertical.is_equivalent(&b.vertical)
        }
        (None, None) => true,
        _ => false,
    }
}
