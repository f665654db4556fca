// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GCS factory
//!
//! Two layers:
//! - `try_create_*` return [`Result<Gcs>`] with the precise [`Error`]
//! - `create_*` wrap those into a single [`CreationError`], or log and
//!   return the null GCS when `throw_on_unhandled_errors` is off
//!
//! WKT input is dispatched on its first keyword. LOCAL_CS, COMPD_CS and
//! FITTED_CS carrying the Bentley authority are handled here; anything else
//! goes to the base library.

use std::fmt;
use std::sync::{Arc, OnceLock};

use gcs_lite_core::{wkt_keyword, WktKeyword, WktRoot, WktSection};
use gcs_lite_geometry::{LocalTransform, TransfoModel};
use thiserror::Error;

use crate::base::{BaseGcs, BaseGcsLibrary, WktBaseGcsLibrary, WktFlavor};
use crate::config::FactoryOptions;
use crate::error::{Error, Result};
use crate::gcs::{get_unit_for, Gcs};
use crate::georef::GeoRef;
use crate::units::Unit;
use crate::wkt::WktSupport;
use crate::wkt_parsing::{
    extract_fitted_cs, extract_local_composed_cs, extract_local_cs, has_bentley_as_authority,
};

/// Input kind a creation failed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationStage {
    Wkt,
    BaseGcs,
    GeoRef,
    Unit,
    AppendLocalTransform,
}

impl fmt::Display for CreationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CreationStage::Wkt => "wkt",
            CreationStage::BaseGcs => "base gcs",
            CreationStage::GeoRef => "geo reference",
            CreationStage::Unit => "unit",
            CreationStage::AppendLocalTransform => "append local transform",
        })
    }
}

/// Error returned by every convenience creation method
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Error creating gcs! ({stage}: '{input}'): {source}")]
pub struct CreationError {
    pub stage: CreationStage,
    /// Offending input, as text
    pub input: String,
    pub source: Error,
}

/// Builder of [`Gcs`] values
#[derive(Debug, Clone)]
pub struct GcsFactory {
    options: FactoryOptions,
    library: Arc<dyn BaseGcsLibrary>,
}

impl Default for GcsFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl GcsFactory {
    /// Default options and the built-in WKT base library
    pub fn new() -> Self {
        Self::with_options(FactoryOptions::default())
    }

    pub fn with_options(options: FactoryOptions) -> Self {
        Self::with_library(options, Arc::new(WktBaseGcsLibrary))
    }

    pub fn with_library(options: FactoryOptions, library: Arc<dyn BaseGcsLibrary>) -> Self {
        Self { options, library }
    }

    /// Process-wide factory configured from the environment
    pub fn default_factory() -> &'static GcsFactory {
        static FACTORY: OnceLock<GcsFactory> = OnceLock::new();
        FACTORY.get_or_init(|| GcsFactory::with_options(FactoryOptions::from_env()))
    }

    #[inline]
    pub fn options(&self) -> &FactoryOptions {
        &self.options
    }

    #[inline]
    pub fn library(&self) -> &Arc<dyn BaseGcsLibrary> {
        &self.library
    }

    // -----------------------------------------------------------------------
    // Status layer
    // -----------------------------------------------------------------------

    /// Create from WKT text
    ///
    /// Blank text and `NULL[...]` give the null GCS. `local_transform` maps
    /// a further local space into the one the text describes.
    pub fn try_create_from_wkt(
        &self,
        text: &str,
        flavor: Option<WktFlavor>,
        local_transform: Option<&LocalTransform>,
    ) -> Result<Gcs> {
        self.create_from_wkt_at_depth(text, flavor, local_transform, 0)
    }

    /// Create from a base coordinate system
    ///
    /// `None` gives the null GCS; an invalid base is an error.
    pub fn try_create_from_base(
        &self,
        base: Option<Arc<dyn BaseGcs>>,
        local_transform: Option<&LocalTransform>,
    ) -> Result<Gcs> {
        let Some(base) = base else {
            return Ok(Gcs::null().clone());
        };
        if !base.is_valid() {
            return Err(Error::InvalidBaseGcs);
        }

        let unit = get_unit_for(base.as_ref());
        Ok(Gcs::from_geo_ref(GeoRef::new(base), unit, local_transform))
    }

    /// Create from a non-null geo reference
    pub fn try_create_from_geo_ref(
        &self,
        geo_ref: &GeoRef,
        local_transform: Option<&LocalTransform>,
    ) -> Result<Gcs> {
        let base = geo_ref.base().ok_or(Error::NullGeoRef)?;
        if !base.is_valid() {
            return Err(Error::InvalidBaseGcs);
        }

        let unit = get_unit_for(base.as_ref());
        Ok(Gcs::from_geo_ref(geo_ref.clone(), unit, local_transform))
    }

    /// Create a unit-only GCS
    pub fn try_create_from_unit(
        &self,
        unit: Unit,
        local_transform: Option<&LocalTransform>,
    ) -> Result<Gcs> {
        Ok(Gcs::from_unit(unit, local_transform))
    }

    /// New GCS equal to `gcs` with `appended` composed on its transform
    ///
    /// `gcs` itself is not modified.
    pub fn try_create_appended(&self, gcs: &Gcs, appended: &LocalTransform) -> Result<Gcs> {
        let Some(horizontal) = gcs.horizontal_unit() else {
            return Err(Error::NullGcs);
        };
        let combined = LocalTransform::combine(gcs.local_transform(), appended)?;

        let mut created = if gcs.has_geo_ref() {
            self.try_create_from_geo_ref(gcs.geo_ref(), Some(&combined))?
        } else {
            self.try_create_from_unit(horizontal.clone(), Some(&combined))?
        };

        if let Some(vertical) = gcs.vertical_unit() {
            created.set_vertical_unit(vertical.clone())?;
        }
        Ok(created)
    }

    fn create_from_wkt_at_depth(
        &self,
        text: &str,
        flavor: Option<WktFlavor>,
        local_transform: Option<&LocalTransform>,
        depth: usize,
    ) -> Result<Gcs> {
        if text.trim().is_empty() {
            return Ok(Gcs::null().clone());
        }

        let keyword = wkt_keyword(text);
        tracing::debug!(keyword = ?keyword, depth, "Creating GCS from WKT");

        match keyword {
            WktKeyword::LocalCs => self.create_from_local_cs(text, flavor, local_transform),
            WktKeyword::CompdCs => self.create_from_composed_cs(text, flavor, local_transform),
            WktKeyword::FittedCs => {
                self.create_from_fitted_cs(text, flavor, local_transform, depth)
            }
            WktKeyword::Null => Ok(Gcs::null().clone()),
            _ => self.create_from_base_cs(text, flavor, local_transform),
        }
    }

    fn create_from_local_cs(
        &self,
        text: &str,
        flavor: Option<WktFlavor>,
        local_transform: Option<&LocalTransform>,
    ) -> Result<Gcs> {
        let root = WktRoot::parse(text)?;
        if root.is_empty() {
            return Ok(Gcs::null().clone());
        }
        let Some(section) = authored_section(&root) else {
            return self.create_from_base_cs(text, flavor, local_transform);
        };

        let unit = extract_local_cs(section)?;
        self.try_create_from_unit(unit, local_transform)
    }

    fn create_from_composed_cs(
        &self,
        text: &str,
        flavor: Option<WktFlavor>,
        local_transform: Option<&LocalTransform>,
    ) -> Result<Gcs> {
        let root = WktRoot::parse(text)?;
        if root.is_empty() {
            return Ok(Gcs::null().clone());
        }
        let Some(section) = authored_section(&root) else {
            return self.create_from_base_cs(text, flavor, local_transform);
        };

        let (horizontal, vertical) = extract_local_composed_cs(section)?;
        if !vertical.is_equivalent(Unit::meter()) {
            tracing::warn!(unit = vertical.name(), "Composed GCS vertical unit is not meter");
            return Err(Error::UnsupportedVerticalUnit(vertical.name().to_string()));
        }

        self.try_create_from_unit(horizontal, local_transform)
    }

    fn create_from_fitted_cs(
        &self,
        text: &str,
        flavor: Option<WktFlavor>,
        local_transform: Option<&LocalTransform>,
        depth: usize,
    ) -> Result<Gcs> {
        let root = WktRoot::parse(text)?;
        if root.is_empty() {
            return Ok(Gcs::null().clone());
        }
        let Some(section) = authored_section(&root) else {
            return self.create_from_base_cs(text, flavor, local_transform);
        };

        if depth >= self.options.max_recursion_depth {
            tracing::warn!(depth, "FITTED_CS nesting too deep");
            return Err(Error::RecursionLimit(self.options.max_recursion_depth));
        }

        let fitted = extract_fitted_cs(section)?;
        let model = TransfoModel::from_matrix(fitted.transform)?;
        let fitted_transform = if fitted.transform_is_to_base {
            LocalTransform::from_to_global(model)
        } else {
            LocalTransform::from_to_local(model)
        };

        let combined = match local_transform {
            Some(incoming) => LocalTransform::combine(&fitted_transform, incoming)?,
            None => fitted_transform,
        };

        tracing::debug!(depth, "Recursing into FITTED_CS base");
        self.create_from_wkt_at_depth(fitted.base_cs_wkt, flavor, Some(&combined), depth + 1)
    }

    fn create_from_base_cs(
        &self,
        text: &str,
        flavor: Option<WktFlavor>,
        local_transform: Option<&LocalTransform>,
    ) -> Result<Gcs> {
        let (detected, body) = WktFlavor::detect(text);
        let flavor = match flavor {
            Some(flavor) if flavor != WktFlavor::Unknown => flavor,
            _ if detected != WktFlavor::Unknown => detected,
            _ => self.options.default_flavor,
        };

        let base = self.library.init_from_well_known_text(flavor, body)?;
        self.try_create_from_base(Some(base), local_transform)
    }

    // -----------------------------------------------------------------------
    // Convenience layer
    // -----------------------------------------------------------------------

    pub fn create_from_wkt(
        &self,
        text: &str,
        flavor: Option<WktFlavor>,
        local_transform: Option<&LocalTransform>,
    ) -> std::result::Result<Gcs, CreationError> {
        self.handle(
            CreationStage::Wkt,
            || text.to_string(),
            self.try_create_from_wkt(text, flavor, local_transform),
        )
    }

    pub fn create_from_base(
        &self,
        base: Option<Arc<dyn BaseGcs>>,
        local_transform: Option<&LocalTransform>,
    ) -> std::result::Result<Gcs, CreationError> {
        let input = base.clone();
        self.handle(
            CreationStage::BaseGcs,
            move || describe_base(input.as_deref()),
            self.try_create_from_base(base, local_transform),
        )
    }

    pub fn create_from_geo_ref(
        &self,
        geo_ref: &GeoRef,
        local_transform: Option<&LocalTransform>,
    ) -> std::result::Result<Gcs, CreationError> {
        self.handle(
            CreationStage::GeoRef,
            || describe_base(geo_ref.base().map(|base| base.as_ref())),
            self.try_create_from_geo_ref(geo_ref, local_transform),
        )
    }

    pub fn create_from_unit(
        &self,
        unit: Unit,
        local_transform: Option<&LocalTransform>,
    ) -> std::result::Result<Gcs, CreationError> {
        let name = unit.name().to_string();
        self.handle(
            CreationStage::Unit,
            move || name,
            self.try_create_from_unit(unit, local_transform),
        )
    }

    pub fn create_appended(
        &self,
        gcs: &Gcs,
        appended: &LocalTransform,
    ) -> std::result::Result<Gcs, CreationError> {
        self.handle(
            CreationStage::AppendLocalTransform,
            || gcs.wkt().map(|wkt| wkt.into_string()).unwrap_or_default(),
            self.try_create_appended(gcs, appended),
        )
    }

    fn handle(
        &self,
        stage: CreationStage,
        input: impl FnOnce() -> String,
        result: Result<Gcs>,
    ) -> std::result::Result<Gcs, CreationError> {
        let source = match result {
            Ok(gcs) => return Ok(gcs),
            Err(source) => source,
        };

        let error = CreationError {
            stage,
            input: input(),
            source,
        };
        if self.options.throw_on_unhandled_errors {
            return Err(error);
        }

        tracing::error!(stage = %stage, error = %error, "GCS creation failed, using null GCS");
        Ok(Gcs::null().clone())
    }

    // -----------------------------------------------------------------------
    // WKT support
    // -----------------------------------------------------------------------

    /// Export `gcs` and try to import the text back with this factory
    pub fn wkt_support_for(&self, gcs: &Gcs, flavor: Option<WktFlavor>) -> WktSupport {
        let flavor = flavor.unwrap_or(WktFlavor::DEFAULT);

        let wkt = match gcs.get_wkt(flavor) {
            Ok(wkt) => wkt,
            Err(e) => {
                tracing::debug!(error = %e, "GCS cannot be exported to WKT");
                return WktSupport::None;
            }
        };

        match self.try_create_from_wkt(&wkt, Some(flavor), None) {
            Ok(_) => WktSupport::Full,
            Err(e) => {
                tracing::debug!(error = %e, "Exported WKT cannot be imported back");
                WktSupport::OnlyTo
            }
        }
    }
}

/// Root section of locally authored WKT; `None` when the text belongs to
/// the base library
fn authored_section<'r, 'a>(root: &'r WktRoot<'a>) -> Option<&'r WktSection<'a>> {
    let section = root.section()?;
    if has_bentley_as_authority(section) {
        Some(section)
    } else {
        tracing::debug!(
            keyword = ?section.keyword(),
            "No Bentley authority, deferring to base library"
        );
        None
    }
}

fn describe_base(base: Option<&dyn BaseGcs>) -> String {
    base.and_then(|base| base.compound_well_known_text(WktFlavor::DEFAULT, false).ok())
        .unwrap_or_default()
}
