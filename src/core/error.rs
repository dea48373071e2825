// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types for the baker
//!
//! Fragment-level failures (a property line that will not parse, a geometry
//! with unmatched braces) are absorbed inside the driver and logged; they
//! never abort a file. File-level failures (I/O, binary input) propagate to
//! the batch runner, which tallies them without aborting the batch.

use thiserror::Error;

/// Errors produced while baking a file
#[derive(Debug, Error)]
pub enum BakeError {
    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input is a binary FBX file; only the ASCII serialization is supported
    #[error("binary FBX skipped: {0}")]
    BinarySkipped(String),

    /// A locator or reader could not make sense of a text fragment
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// Zero-based buffer line the failure was detected on
        line: usize,
        /// What the reader expected and what it found
        message: String,
    },

    /// A matrix that must be inverted has a near-zero determinant
    #[error("singular matrix (|det| < 1e-14)")]
    SingularMatrix,

    /// Any other invariant violation during a single file
    #[error("unexpected: {0}")]
    Unexpected(String),
}

impl BakeError {
    /// Shorthand for a [`BakeError::Parse`] at the given buffer line
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, BakeError>;
