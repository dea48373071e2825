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

//! Property reader/writer
//!
//! Property lines carry their values as the trailing comma-separated fields
//! of the line (`P: "Lcl Rotation", "Lcl Rotation", "", "A",90,0,0`). The
//! reader takes the last three fields as a 3-vector; the writer overwrites
//! exactly those fields and leaves every other byte of the line alone.

use super::super::error::{BakeError, Result};
use super::super::math::Vec3;
use super::number::{format_f64, parse_f64};
use super::{split_fields, Document};

/// Read the 3-vector at the tail of a property line
pub fn read_vec3(doc: &Document, line_idx: usize) -> Result<Vec3> {
    let line = doc.line(line_idx);
    let fields = split_fields(line);
    if fields.len() < 3 {
        return Err(BakeError::parse(line_idx, "expected three trailing fields"));
    }
    let mut tail = fields[fields.len() - 3..]
        .iter()
        .map(|r| parse_f64(&line[r.clone()]));
    match (tail.next(), tail.next(), tail.next()) {
        (Some(Some(x)), Some(Some(y)), Some(Some(z))) => Ok(Vec3::new(x, y, z)),
        _ => Err(BakeError::parse(line_idx, "non-numeric property tail")),
    }
}

/// Read the last comma-separated field as an integer scalar
pub fn read_scalar_i64(doc: &Document, line_idx: usize) -> Result<i64> {
    let line = doc.line(line_idx);
    let fields = split_fields(line);
    let last = &line[fields[fields.len() - 1].clone()];
    // Scalar properties may carry a fractional spelling ("0.0")
    parse_f64(last)
        .map(|v| v as i64)
        .ok_or_else(|| BakeError::parse(line_idx, "non-numeric scalar property"))
}

/// Overwrite the three trailing fields of a property line
///
/// The prefix up to and including the third-from-last comma is preserved
/// byte for byte; the new fields are printed in the canonical numeric
/// format with no padding.
pub fn write_vec3(doc: &mut Document, line_idx: usize, value: Vec3) -> Result<()> {
    let line = doc.line(line_idx);
    let fields = split_fields(line);
    if fields.len() < 3 {
        return Err(BakeError::parse(line_idx, "expected three trailing fields"));
    }
    let keep = fields[fields.len() - 3].start;
    let rewritten = format!(
        "{}{},{},{}",
        &line[..keep],
        format_f64(value.x),
        format_f64(value.y),
        format_f64(value.z)
    );
    doc.set_line(line_idx, rewritten);
    Ok(())
}
