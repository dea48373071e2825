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

//! Locale-independent numeric parsing and printing
//!
//! The printed form is part of the output contract: rewritten files are
//! diffed against their inputs, so the format must be stable across
//! platforms and locales. Exact zero prints as `0`; values of ordinary
//! magnitude print in fixed notation with up to ten fractional digits and
//! no trailing zeros; everything else falls back to scientific notation
//! with 15 significant digits.

/// Lower magnitude bound of the fixed-notation range
const FIXED_MIN: f64 = 1e-4;

/// Upper magnitude bound (exclusive) of the fixed-notation range
const FIXED_MAX: f64 = 1e15;

/// Print a double in the canonical output format
pub fn format_f64(value: f64) -> String {
    if value == 0.0 {
        // Covers -0.0 as well; the sign of zero is not an output signal
        return "0".to_string();
    }
    let magnitude = value.abs();
    if (FIXED_MIN..FIXED_MAX).contains(&magnitude) {
        let mut s = format!("{:.10}", value);
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
        s
    } else {
        format!("{:.14e}", value)
    }
}

/// Print an integer array element
pub fn format_i64(value: i64) -> String {
    value.to_string()
}

/// Parse a double from a trimmed decimal token
///
/// Rust's `f64` grammar is already locale-independent (dot separator,
/// optional sign and exponent), which is exactly the contract here.
pub fn parse_f64(token: &str) -> Option<f64> {
    let value: f64 = token.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Parse an integer array element
pub fn parse_i64(token: &str) -> Option<i64> {
    token.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_prints_bare() {
        assert_eq!(format_f64(0.0), "0");
        assert_eq!(format_f64(-0.0), "0");
    }

    #[test]
    fn test_fixed_notation_strips_trailing_zeros() {
        assert_eq!(format_f64(1.0), "1");
        assert_eq!(format_f64(-1.0), "-1");
        assert_eq!(format_f64(0.5), "0.5");
        assert_eq!(format_f64(2.25), "2.25");
        assert_eq!(format_f64(-90.0), "-90");
        assert_eq!(format_f64(0.0001), "0.0001");
    }

    #[test]
    fn test_fixed_notation_caps_fractional_digits() {
        // 1/3 rounds at the tenth fractional digit
        assert_eq!(format_f64(1.0 / 3.0), "0.3333333333");
    }

    #[test]
    fn test_tiny_and_huge_use_scientific() {
        let tiny = format_f64(1e-8);
        assert!(tiny.contains('e'), "expected scientific, got {}", tiny);
        let huge = format_f64(1e18);
        assert!(huge.contains('e'), "expected scientific, got {}", huge);
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        assert_eq!(parse_f64("inf"), None);
        assert_eq!(parse_f64("NaN"), None);
        assert_eq!(parse_f64(" 1.5 "), Some(1.5));
        assert_eq!(parse_f64("-2e3"), Some(-2000.0));
    }

    #[test]
    fn test_parse_i64_trims() {
        assert_eq!(parse_i64(" -42 "), Some(-42));
        assert_eq!(parse_i64("3.5"), None);
    }

    proptest! {
        #[test]
        fn prop_format_never_uses_locale_separators(v in -1e20f64..1e20) {
            let s = format_f64(v);
            prop_assert!(!s.contains(','));
            prop_assert!(!s.ends_with('.'));
        }

        #[test]
        fn prop_roundtrip_error_is_bounded(v in -1e16f64..1e16) {
            let back = parse_f64(&format_f64(v)).unwrap();
            let bound = 1e-10f64.max(v.abs() * 1e-13);
            prop_assert!(
                (back - v).abs() <= bound,
                "{} -> {} -> {}", v, format_f64(v), back
            );
        }

        #[test]
        fn prop_integers_print_exactly(v in -1_000_000_000i64..1_000_000_000) {
            prop_assert_eq!(format_f64(v as f64), v.to_string());
        }
    }
}
