// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Local-to-global relationship of a coordinate system
//!
//! A [`LocalTransform`] may know the to-global direction, the to-local
//! direction, or both. Creating one from a single invertible direction
//! fills in the other.

use nalgebra::Point3;

use crate::error::{Error, Result};
use crate::transform::TransfoModel;

/// Optional to-global / to-local transform pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalTransform {
    to_global: Option<TransfoModel>,
    to_local: Option<TransfoModel>,
}

impl LocalTransform {
    /// No transform in either direction
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from a local -> global model, deriving the inverse when possible
    pub fn from_to_global(model: TransfoModel) -> Self {
        let to_local = model.try_inverse();
        Self {
            to_global: Some(model),
            to_local,
        }
    }

    /// Create from a global -> local model, deriving the inverse when possible
    pub fn from_to_local(model: TransfoModel) -> Self {
        let to_global = model.try_inverse();
        Self {
            to_global,
            to_local: Some(model),
        }
    }

    /// Create from explicit models without deriving anything
    pub fn from_models(to_global: Option<TransfoModel>, to_local: Option<TransfoModel>) -> Self {
        Self {
            to_global,
            to_local,
        }
    }

    #[inline]
    pub fn has_to_global(&self) -> bool {
        self.to_global.is_some()
    }

    #[inline]
    pub fn to_global(&self) -> Option<&TransfoModel> {
        self.to_global.as_ref()
    }

    #[inline]
    pub fn has_to_local(&self) -> bool {
        self.to_local.is_some()
    }

    #[inline]
    pub fn to_local(&self) -> Option<&TransfoModel> {
        self.to_local.as_ref()
    }

    pub fn is_identity(&self) -> bool {
        self.to_global.as_ref().map_or(true, |m| m.is_identity())
            && self.to_local.as_ref().map_or(true, |m| m.is_identity())
    }

    /// Compare the to-global models, falling back to the to-local models
    ///
    /// When the two sides only hold opposite directions, one of them is
    /// inverted before comparing.
    pub fn is_equivalent(&self, other: &Self) -> bool {
        if self.is_identity() || other.is_identity() {
            return self.is_identity() && other.is_identity();
        }

        if let (Some(a), Some(b)) = (&self.to_global, &other.to_global) {
            return a.is_equivalent(b);
        }
        if let (Some(a), Some(b)) = (&self.to_local, &other.to_local) {
            return a.is_equivalent(b);
        }
        if let (Some(a), Some(b)) = (&self.to_global, &other.to_local) {
            return a.try_inverse().map_or(false, |inverse| inverse.is_equivalent(b));
        }
        if let (Some(a), Some(b)) = (&self.to_local, &other.to_global) {
            return a.try_inverse().map_or(false, |inverse| inverse.is_equivalent(b));
        }
        false
    }

    /// Compose `appended` on top of `existing`
    ///
    /// `appended` maps a new local space into the local space of `existing`,
    /// so the result goes new local -> existing local -> global. A direction
    /// missing on either side is dropped from the result; losing both
    /// directions is an error.
    pub fn combine(existing: &Self, appended: &Self) -> Result<Self> {
        if appended.is_identity() {
            return Ok(existing.clone());
        }
        if existing.is_identity() {
            return Ok(appended.clone());
        }

        let to_global = match (&existing.to_global, &appended.to_global) {
            (Some(outer), Some(inner)) => Some(TransfoModel::combine(outer, inner)),
            _ => None,
        };
        let to_local = match (&existing.to_local, &appended.to_local) {
            (Some(inner), Some(outer)) => Some(TransfoModel::combine(outer, inner)),
            _ => None,
        };

        if to_global.is_none() && to_local.is_none() {
            return Err(Error::NotComposable(
                "no common transform direction".to_string(),
            ));
        }

        Ok(Self {
            to_global,
            to_local,
        })
    }

    /// Map a local point to global coordinates
    pub fn apply_to_global(&self, point: &Point3<f64>) -> Option<Point3<f64>> {
        match &self.to_global {
            Some(model) => model.transform_point(point),
            None if self.is_identity() => Some(*point),
            None => None,
        }
    }

    /// Map a global point to local coordinates
    pub fn apply_to_local(&self, point: &Point3<f64>) -> Option<Point3<f64>> {
        match &self.to_local {
            Some(model) => model.transform_point(point),
            None if self.is_identity() => Some(*point),
            None => None,
        }
    }
}
