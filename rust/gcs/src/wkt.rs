// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WKT text and interchange support probe

use std::fmt;
use std::ops::Deref;

use crate::base::WktFlavor;
use crate::factory::GcsFactory;
use crate::gcs::Gcs;

/// Immutable WKT text
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Wkt(Box<str>);

impl Wkt {
    pub fn new(text: impl Into<Box<str>>) -> Self {
        Self(text.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0.into_string()
    }
}

impl Deref for Wkt {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Wkt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Wkt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Wkt {
    fn from(text: String) -> Self {
        Self(text.into_boxed_str())
    }
}

impl From<&str> for Wkt {
    fn from(text: &str) -> Self {
        Self(text.into())
    }
}

/// How far a GCS survives WKT interchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WktSupport {
    /// Cannot be exported
    None,
    /// Exported text cannot be imported back
    OnlyTo,
    /// Exported text imports back
    Full,
}

/// Probe WKT support using the process-wide default factory
pub fn wkt_support_for(gcs: &Gcs, flavor: Option<WktFlavor>) -> WktSupport {
    GcsFactory::default_factory().wkt_support_for(gcs, flavor)
}
