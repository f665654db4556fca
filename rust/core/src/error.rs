// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for WKT tokenization.

use thiserror::Error;

/// Result type for WKT parsing
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a WKT section tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed section, parameter or delimiter at the given byte offset.
    #[error("WKT parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// The root section parsed but non-blank text follows it.
    #[error("unexpected trailing input at position {0}")]
    TrailingInput(usize),
}

impl Error {
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            position,
            message: message.into(),
        }
    }

    /// Byte offset into the parsed text where the error was detected
    pub fn position(&self) -> usize {
        match self {
            Error::Parse { position, .. } => *position,
            Error::TrailingInput(position) => *position,
        }
    }
}
