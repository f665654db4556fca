// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for coordinate system operations.

use thiserror::Error;

/// Result type alias for coordinate system operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, mutating or exporting a GCS.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The text is not syntactically valid WKT.
    #[error("WKT syntax error: {0}")]
    Wkt(#[from] gcs_lite_core::Error),

    /// A transform could not be built or composed.
    #[error("transform error: {0}")]
    Transform(#[from] gcs_lite_geometry::Error),

    /// Wrong keyword, missing parameter or malformed value.
    #[error("unexpected WKT structure: {0}")]
    Structure(String),

    /// Composed coordinate systems only support meter as vertical unit.
    #[error("unsupported vertical unit: {0}")]
    UnsupportedVerticalUnit(String),

    /// Vertical units must be linear.
    #[error("vertical unit must be linear: {0}")]
    NonLinearVerticalUnit(String),

    /// Neither direction of the local transform reduces to an affine matrix.
    #[error("local transform is not convertible to a matrix in either direction")]
    NotMatrixConvertible,

    /// The base coordinate system library rejected the input.
    #[error("base GCS error: {0}")]
    BaseGcs(String),

    /// The base coordinate system is present but not valid.
    #[error("base GCS is not valid")]
    InvalidBaseGcs,

    /// A geo reference was required but is null.
    #[error("geo reference is null")]
    NullGeoRef,

    /// The operation requires a non-null GCS.
    #[error("GCS is null")]
    NullGcs,

    /// Fitted coordinate systems nested deeper than the configured limit.
    #[error("fitted coordinate system nesting exceeds {0} levels")]
    RecursionLimit(usize),
}

impl Error {
    pub(crate) fn structure(message: impl Into<String>) -> Self {
        Error::Structure(message.into())
    }
}
