// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geospatial reference
//!
//! Nullable shared handle to a base coordinate system. Cloning shares the
//! base; it is released with the last handle.

use std::sync::Arc;

use crate::base::BaseGcs;

/// Optional reference to a base coordinate system
#[derive(Debug, Clone, Default)]
pub struct GeoRef {
    base: Option<Arc<dyn BaseGcs>>,
}

impl GeoRef {
    pub fn new(base: Arc<dyn BaseGcs>) -> Self {
        Self { base: Some(base) }
    }

    /// Reference to nothing
    pub fn null() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.base.is_none()
    }

    /// Referenced base, `None` when null
    #[inline]
    pub fn base(&self) -> Option<&Arc<dyn BaseGcs>> {
        self.base.as_ref()
    }

    /// Check if both handles point at the same base object
    pub fn ptr_eq(&self, other: &GeoRef) -> bool {
        match (&self.base, &other.base) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl From<Arc<dyn BaseGcs>> for GeoRef {
    fn from(base: Arc<dyn BaseGcs>) -> Self {
        Self::new(base)
    }
}
