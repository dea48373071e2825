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

//! Polygon winding reversal and per-polygon-vertex reordering
//!
//! The polygon-vertex-index array packs polygons back to back; a negative
//! entry `-(v+1)` closes the current polygon. Reversing winding keeps the
//! first vertex of each polygon in place and reverses the rest, so a
//! triangle `0, 1, -3` becomes `0, 2, -2`. Per-polygon-vertex layer data
//! is shuffled with the identical keep-first pattern, which preserves the
//! value-to-vertex pairing.

use super::super::error::{BakeError, Result};

/// Positional extent of one polygon inside the index array, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polygon {
    pub start: usize,
    pub end: usize,
}

impl Polygon {
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Group the index array into polygons by their negative terminators
///
/// # Errors
///
/// A trailing run without a terminator means the array is truncated or
/// corrupt; the caller skips mirror handling entirely rather than reorder
/// half a mesh.
pub fn parse_polygons(indices: &[i64]) -> Result<Vec<Polygon>> {
    let mut polygons = Vec::new();
    let mut start = 0;
    for (i, &raw) in indices.iter().enumerate() {
        if raw < 0 {
            polygons.push(Polygon { start, end: i });
            start = i + 1;
        }
    }
    if start != indices.len() {
        return Err(BakeError::Unexpected(
            "polygon index array has an unterminated tail".to_string(),
        ));
    }
    Ok(polygons)
}

/// Swap the tail of each polygon in place, keeping entry zero fixed
///
/// For a polygon of length n this exchanges positions `a` and `n - a` for
/// `a` in `1..n/2 + 1` while `a < n - a`, i.e. `[0, 1, 2, 3]` becomes
/// `[0, 3, 2, 1]`. `stride` widens the swap to whole value blocks.
fn swap_tail<T>(values: &mut [T], poly: &Polygon, stride: usize) {
    let len = poly.len();
    let mut a = 1;
    while a < len - a {
        let b = len - a;
        for k in 0..stride {
            values.swap((poly.start + a) * stride + k, (poly.start + b) * stride + k);
        }
        a += 1;
    }
}

/// Reverse the winding of every polygon in the index array
///
/// Decodes each polygon's closing entry, applies the keep-first reversal
/// and re-encodes the new closing entry, so exactly the final entry stays
/// negative.
pub fn reverse_winding(indices: &mut [i64], polygons: &[Polygon]) {
    for poly in polygons {
        indices[poly.end] = -indices[poly.end] - 1;
        swap_tail(indices, poly, 1);
        indices[poly.end] = -(indices[poly.end] + 1);
    }
}

/// Reorder a per-polygon-vertex value array to match reversed winding
///
/// Returns false (leaving `values` untouched beyond prior polygons) when a
/// polygon would index past the end of the array, which signals a layer
/// inconsistent with the index array.
pub fn reorder_values<T>(values: &mut [T], polygons: &[Polygon], stride: usize) -> bool {
    if let Some(last) = polygons.last() {
        if (last.end + 1) * stride > values.len() {
            return false;
        }
    }
    for poly in polygons {
        swap_tail(values, poly, stride);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_polygons_groups_runs() {
        let indices = [0, 1, -3, 2, 3, 4, -6];
        let polys = parse_polygons(&indices).unwrap();
        assert_eq!(
            polys,
            vec![Polygon { start: 0, end: 2 }, Polygon { start: 3, end: 6 }]
        );
    }

    #[test]
    fn test_parse_polygons_rejects_unterminated_tail() {
        assert!(parse_polygons(&[0, 1, -3, 4, 5]).is_err());
        assert!(parse_polygons(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_reverse_winding_triangle() {
        // 0, 1, -3 encodes (0, 1, 2); reversed winding keeps vertex 0 first
        let mut indices = [0i64, 1, -3];
        let polys = parse_polygons(&indices).unwrap();
        reverse_winding(&mut indices, &polys);
        assert_eq!(indices, [0, 2, -2]);
    }

    #[test]
    fn test_reverse_winding_quad() {
        let mut indices = [0i64, 1, 2, -4];
        let polys = parse_polygons(&indices).unwrap();
        reverse_winding(&mut indices, &polys);
        // (0, 1, 2, 3) -> (0, 3, 2, 1)
        assert_eq!(indices, [0, 3, 2, -2]);
    }

    #[test]
    fn test_reverse_winding_twice_is_identity() {
        let original = [4i64, 7, 2, 9, -1, 3, 1, -5];
        let mut indices = original;
        let polys = parse_polygons(&indices).unwrap();
        reverse_winding(&mut indices, &polys);
        reverse_winding(&mut indices, &polys);
        assert_eq!(indices, original);
    }

    #[test]
    fn test_reorder_values_stride_one() {
        let mut ids = [10i64, 11, 12, 20, 21, 22, 23];
        let polys = vec![Polygon { start: 0, end: 2 }, Polygon { start: 3, end: 6 }];
        assert!(reorder_values(&mut ids, &polys, 1));
        assert_eq!(ids, [10, 12, 11, 20, 23, 22, 21]);
    }

    #[test]
    fn test_reorder_values_stride_three_matches_index_reversal() {
        // Triangle normals (nx, ny, nz) per polygon vertex; after reversal
        // position 1 must carry the values that sat at position 2.
        let mut normals = [
            0.0, 0.0, 1.0, // v0
            1.0, 0.0, 0.0, // v1
            0.0, 1.0, 0.0, // v2
        ];
        let polys = vec![Polygon { start: 0, end: 2 }];
        assert!(reorder_values(&mut normals, &polys, 3));
        assert_eq!(
            normals,
            [
                0.0, 0.0, 1.0, // v0 kept
                0.0, 1.0, 0.0, // was v2
                1.0, 0.0, 0.0, // was v1
            ]
        );
    }

    #[test]
    fn test_reorder_values_rejects_short_array() {
        let mut uv = [0.0f64; 4];
        let polys = vec![Polygon { start: 0, end: 2 }];
        assert!(!reorder_values(&mut uv, &polys, 2));
    }
}
