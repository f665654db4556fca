// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # GCS-Lite
//!
//! Coordinate system model with WKT interchange.
//!
//! ## Overview
//!
//! - **[`Gcs`]**: copy-on-write value combining an optional base coordinate
//!   system, a horizontal/vertical [`Unit`] pair and a [`LocalTransform`]
//! - **[`GcsFactory`]**: builds a [`Gcs`] from WKT, a base, a geo reference
//!   or a unit, dispatching on the WKT keyword
//! - **Local WKT dialect**: LOCAL_CS, COMPD_CS and FITTED_CS tagged with
//!   `AUTHORITY["BENTLEY_SYSTEMS",...]`; other WKT goes to a pluggable
//!   [`BaseGcsLibrary`]
//!
//! ## Quick Start
//!
//! ```rust
//! use gcs_lite::{GcsFactory, Unit};
//!
//! let factory = GcsFactory::new();
//! let gcs = factory.try_create_from_unit(Unit::meter().clone(), None).unwrap();
//! let wkt = gcs.wkt().unwrap();
//! assert!(wkt.starts_with("LOCAL_CS["));
//!
//! let back = factory.try_create_from_wkt(&wkt, None, None).unwrap();
//! assert!(gcs.is_equivalent(&back));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for [`WktFlavor`], [`UnitBase`],
//!   [`WktSupport`] and the parser keyword type

pub mod base;
pub mod config;
pub mod error;
pub mod factory;
pub mod gcs;
pub mod georef;
pub mod rectification;
pub mod units;
pub mod wkt;
pub mod wkt_parsing;

pub use base::{BaseGcs, BaseGcsLibrary, WktBaseGcs, WktBaseGcsLibrary, WktFlavor};
pub use config::FactoryOptions;
pub use error::{Error, Result};
pub use factory::{CreationError, CreationStage, GcsFactory};
pub use gcs::{get_unit_for, have_compatible_units, have_equivalent_units, Gcs};
pub use georef::GeoRef;
pub use rectification::{
    gcs_unit_rectification_matrix, unit_rectification_scale_factor,
    unit_rectification_transfo_matrix, unit_rectification_transfo_matrix_hv,
    unit_rectification_transfo_model, unit_rectification_transfo_model_hv,
};
pub use units::{Unit, UnitBase, RADIANS_PER_DEGREE};
pub use wkt::{wkt_support_for, Wkt, WktSupport};

// Collaborator types used throughout the API
pub use gcs_lite_geometry::{LocalTransform, TransfoMatrix, TransfoModel};
