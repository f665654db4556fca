// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # GCS-Lite Core Parser
//!
//! Well-Known Text (WKT) tokenizer built with [nom](https://docs.rs/nom).
//! Turns coordinate system definitions into a zero-copy section tree.
//!
//! ## Overview
//!
//! - **Section tree**: keyword + ordered parameters, each parameter being a
//!   nested section, a quoted string or a bare token
//! - **Keyword classification**: [`WktKeyword`] for fast dispatch
//! - **Strict numbers**: whole-token parsing with [fast-float](https://docs.rs/fast-float)
//!   and [lexical-core](https://docs.rs/lexical-core), `%.16g` printing
//!
//! ## Quick Start
//!
//! ```rust
//! use gcs_lite_core::{parse_wkt, parse_f64_strict, WktKeyword};
//!
//! let unit = parse_wkt(r#"UNIT["foot", 0.3048]"#).unwrap();
//! assert_eq!(unit.keyword(), WktKeyword::Unit);
//! assert_eq!(unit.get(0).unwrap().as_quoted(), Some("foot"));
//! assert_eq!(parse_f64_strict(unit.get(1).unwrap().unquoted()), Some(0.3048));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for [`WktKeyword`]

pub mod error;
pub mod keyword;
pub mod number;
pub mod parser;

pub use error::{Error, Result};
pub use keyword::WktKeyword;
pub use number::{format_g16, parse_f64_strict, parse_i64_strict, WKT_PRECISION};
pub use parser::{
    find_section_keyword, parse_wkt, wkt_keyword, ParameterValue, WktParameter, WktRoot,
    WktSection, MAX_NESTING_DEPTH,
};
