// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Factory configuration, optionally loaded from environment variables.

use crate::base::WktFlavor;

/// Factory options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryOptions {
    /// Return creation errors from the convenience layer instead of
    /// logging them and yielding the null GCS.
    pub throw_on_unhandled_errors: bool,
    /// Deepest FITTED_CS nesting accepted when importing WKT.
    pub max_recursion_depth: usize,
    /// Flavor used for base WKT when none is given or detected.
    pub default_flavor: WktFlavor,
}

impl FactoryOptions {
    /// Load options from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            throw_on_unhandled_errors: std::env::var("GCS_THROW_ON_ERROR")
                .ok()
                .and_then(|value| parse_bool(&value))
                .unwrap_or(defaults.throw_on_unhandled_errors),
            max_recursion_depth: std::env::var("GCS_MAX_RECURSION_DEPTH")
                .unwrap_or_else(|_| defaults.max_recursion_depth.to_string())
                .parse()
                .unwrap_or(defaults.max_recursion_depth),
            default_flavor: std::env::var("GCS_DEFAULT_WKT_FLAVOR")
                .ok()
                .and_then(|value| WktFlavor::from_name(&value))
                .unwrap_or(defaults.default_flavor),
        }
    }
}

impl Default for FactoryOptions {
    fn default() -> Self {
        Self {
            throw_on_unhandled_errors: true,
            max_recursion_depth: 8,
            default_flavor: WktFlavor::DEFAULT,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
