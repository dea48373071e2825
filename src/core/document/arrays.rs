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

//! Array reader/writer
//!
//! Numeric arrays live inside a named child block with a `*<len>`
//! declaration, their values on an `a:` line that may spill across any
//! number of continuation lines:
//!
//! ```text
//! Vertices: *9 {
//!     a: -0.5,-0.5,0,0.5,-0.5,0,
//!     0.5,0.5,0
//! }
//! ```
//!
//! Reading records, per body line, the prefix, value count and
//! trailing-comma flag; writing re-emits exactly that partitioning with
//! freshly formatted values. A rewritten array is therefore structurally
//! indistinguishable from the original: same line count, same per-line
//! value counts, same continuation commas.

use super::super::error::{BakeError, Result};
use super::number::{format_f64, format_i64, parse_f64, parse_i64};
use super::{Block, Document};

/// Shape of one body line of an array literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayLine {
    /// Buffer line index
    pub index: usize,
    /// For the first body line, everything up to and including `a:`;
    /// for continuation lines, the leading whitespace
    pub prefix: String,
    /// Number of values this line carries
    pub count: usize,
    /// Whether the line (ignoring trailing whitespace) ends in a comma
    pub continuation: bool,
}

/// A located array block: the brace block plus its `a:` line
#[derive(Debug, Clone, Copy)]
pub struct ArrayBlock {
    pub block: Block,
    /// Line index of the `a:` line; the body runs to `block.close - 1`
    pub data_start: usize,
}

/// A decoded double array plus the line shapes to rebuild it
#[derive(Debug, Clone)]
pub struct F64Array {
    pub values: Vec<f64>,
    pub lines: Vec<ArrayLine>,
}

/// A decoded integer array plus the line shapes to rebuild it
#[derive(Debug, Clone)]
pub struct I64Array {
    pub values: Vec<i64>,
    pub lines: Vec<ArrayLine>,
}

/// Locate the array block named `name` inside `range`
///
/// Detection requires the `*` length marker on the header line, which
/// keeps plain scalar children (`Version: 232`) from matching.
pub fn find_array(doc: &Document, range: std::ops::Range<usize>, name: &str) -> Option<ArrayBlock> {
    let prefix = format!("{}:", name);
    let header = range.into_iter().find(|&i| {
        let line = doc.line(i);
        line.trim_start().starts_with(&prefix) && line.contains('*')
    })?;
    let block = doc.match_block(header)?;
    let data_start = block
        .body()
        .find(|&i| doc.line(i).trim_start().starts_with("a:"))?;
    Some(ArrayBlock { block, data_start })
}

fn read_lines<T>(
    doc: &Document,
    array: &ArrayBlock,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<(Vec<T>, Vec<ArrayLine>)> {
    let mut values = Vec::new();
    let mut lines = Vec::new();

    for index in array.data_start..array.block.close {
        let line = doc.line(index);
        let (prefix, remainder) = if index == array.data_start {
            // Trimmed start is "a:", so the marker is right after the indent
            let indent = line.len() - line.trim_start().len();
            line.split_at(indent + 2)
        } else {
            let indent = line.len() - line.trim_start().len();
            line.split_at(indent)
        };

        let tail = remainder.trim_end();
        let continuation = tail.ends_with(',');
        let tail = tail.strip_suffix(',').unwrap_or(tail);

        let mut count = 0;
        if !tail.trim().is_empty() {
            for token in tail.split(',') {
                let value = parse(token)
                    .ok_or_else(|| BakeError::parse(index, format!("bad value {:?}", token)))?;
                values.push(value);
                count += 1;
            }
        }

        lines.push(ArrayLine {
            index,
            prefix: prefix.to_string(),
            count,
            continuation,
        });
    }

    Ok((values, lines))
}

fn write_lines<T>(
    doc: &mut Document,
    lines: &[ArrayLine],
    values: &[T],
    format: impl Fn(&T) -> String,
) -> Result<()> {
    let expected: usize = lines.iter().map(|l| l.count).sum();
    if expected != values.len() {
        let line = lines.first().map(|l| l.index).unwrap_or(0);
        return Err(BakeError::parse(line, "array value count changed"));
    }

    let mut next = 0;
    for (pos, info) in lines.iter().enumerate() {
        let mut text = info.prefix.clone();
        if pos == 0 && info.count > 0 {
            text.push(' ');
        }
        for slot in 0..info.count {
            if slot > 0 {
                text.push(',');
            }
            text.push_str(&format(&values[next]));
            next += 1;
        }
        if info.continuation {
            text.push(',');
        }
        doc.set_line(info.index, text);
    }
    Ok(())
}

/// Read a double array
pub fn read_f64(doc: &Document, array: &ArrayBlock) -> Result<F64Array> {
    let (values, lines) = read_lines(doc, array, parse_f64)?;
    Ok(F64Array { values, lines })
}

/// Read an integer array
pub fn read_i64(doc: &Document, array: &ArrayBlock) -> Result<I64Array> {
    let (values, lines) = read_lines(doc, array, parse_i64)?;
    Ok(I64Array { values, lines })
}

/// Write a double array back through its recorded line shapes
pub fn write_f64(doc: &mut Document, array: &F64Array) -> Result<()> {
    write_lines(doc, &array.lines, &array.values, |v| format_f64(*v))
}

/// Write an integer array back through its recorded line shapes
pub fn write_i64(doc: &mut Document, array: &I64Array) -> Result<()> {
    write_lines(doc, &array.lines, &array.values, |v| format_i64(*v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MULTILINE: &str = "Geometry: 1, \"Geometry::\", \"Mesh\" {\n\
        \tVertices: *9 {\n\
        \t\ta: -0.5,-0.5,0,0.5,\n\
        \t\t-0.5,0,0.5,\n\
        \t\t0.5,0\n\
        \t}\n\
        \tPolygonVertexIndex: *3 {\n\
        \t\ta: 0,1,-3\n\
        \t}\n\
        }\n";

    fn sample() -> Document {
        Document::from_text(MULTILINE)
    }

    #[test]
    fn test_find_array_requires_star() {
        let doc = Document::from_text("x {\n\tVersion: 232\n\tVertices: *3 {\n\t\ta: 1,2,3\n\t}\n}\n");
        assert!(find_array(&doc, 0..6, "Version").is_none());
        let found = find_array(&doc, 0..6, "Vertices").unwrap();
        assert_eq!(found.data_start, 3);
    }

    #[test]
    fn test_read_multiline_f64() {
        let doc = sample();
        let block = find_array(&doc, 0..doc.len(), "Vertices").unwrap();
        let array = read_f64(&doc, &block).unwrap();
        assert_eq!(array.values.len(), 9);
        assert_eq!(array.values[0], -0.5);
        assert_eq!(array.values[8], 0.0);
        let counts: Vec<usize> = array.lines.iter().map(|l| l.count).collect();
        assert_eq!(counts, vec![4, 3, 2]);
        let flags: Vec<bool> = array.lines.iter().map(|l| l.continuation).collect();
        assert_eq!(flags, vec![true, true, false]);
        assert_eq!(array.lines[0].prefix, "\t\ta:");
        assert_eq!(array.lines[1].prefix, "\t\t");
    }

    #[test]
    fn test_write_unchanged_roundtrips() {
        let mut doc = sample();
        let before = doc.to_text();

        let block = find_array(&doc, 0..doc.len(), "Vertices").unwrap();
        let array = read_f64(&doc, &block).unwrap();
        write_f64(&mut doc, &array).unwrap();

        let block = find_array(&doc, 0..doc.len(), "PolygonVertexIndex").unwrap();
        let indices = read_i64(&doc, &block).unwrap();
        assert_eq!(indices.values, vec![0, 1, -3]);
        write_i64(&mut doc, &indices).unwrap();

        assert_eq!(doc.to_text(), before);
    }

    #[test]
    fn test_write_preserves_partitioning_for_new_values() {
        let mut doc = sample();
        let block = find_array(&doc, 0..doc.len(), "Vertices").unwrap();
        let mut array = read_f64(&doc, &block).unwrap();
        for v in &mut array.values {
            *v *= 2.0;
        }
        write_f64(&mut doc, &array).unwrap();
        assert_eq!(doc.line(2), "\t\ta: -1,-1,0,1,");
        assert_eq!(doc.line(3), "\t\t-1,0,1,");
        assert_eq!(doc.line(4), "\t\t1,0");
    }

    #[test]
    fn test_write_rejects_count_change() {
        let mut doc = sample();
        let block = find_array(&doc, 0..doc.len(), "Vertices").unwrap();
        let mut array = read_f64(&doc, &block).unwrap();
        array.values.pop();
        assert!(write_f64(&mut doc, &array).is_err());
    }

    #[test]
    fn test_read_rejects_garbage() {
        let doc = Document::from_text("Vertices: *3 {\n\ta: 1,two,3\n}\n");
        let block = find_array(&doc, 0..3, "Vertices").unwrap();
        assert!(read_f64(&doc, &block).is_err());
    }

    prop_compose! {
        fn arb_partition(len: usize)(cuts in proptest::collection::vec(1usize..=6, 1..5)) -> Vec<usize> {
            // Distribute `len` values over up to five lines
            let mut counts: Vec<usize> = Vec::new();
            let mut left = len;
            for c in cuts {
                if left == 0 {
                    break;
                }
                let take = c.min(left);
                counts.push(take);
                left -= take;
            }
            if left > 0 {
                counts.push(left);
            }
            counts
        }
    }

    proptest! {
        #[test]
        fn prop_read_write_roundtrip(
            raw in proptest::collection::vec(-1000i64..1000, 1..18),
            counts in arb_partition(12),
        ) {
            // Build a canonical multi-line integer array, then check that a
            // read-write cycle reproduces it byte for byte.
            let values: Vec<i64> = raw;
            let total: usize = values.len();
            // Rescale the partition to the actual value count, dropping
            // empty lines so the generated text is canonical.
            let mut acc = 0usize;
            let mut counts: Vec<usize> = counts
                .into_iter()
                .filter_map(|c| {
                    let take = c.min(total - acc);
                    acc += take;
                    (take > 0).then_some(take)
                })
                .collect();
            if acc < total {
                counts.push(total - acc);
            }

            let mut text = String::from("Indexes: *1 {\n");
            let mut next = 0;
            for (i, c) in counts.iter().enumerate() {
                let chunk: Vec<String> = values[next..next + c].iter().map(|v| v.to_string()).collect();
                next += c;
                let last = next == total;
                if i == 0 {
                    text.push_str(&format!("\ta: {}{}\n", chunk.join(","), if last { "" } else { "," }));
                } else {
                    text.push_str(&format!("\t{}{}\n", chunk.join(","), if last { "" } else { "," }));
                }
            }
            text.push_str("}\n");

            let mut doc = Document::from_text(&text);
            let block = find_array(&doc, 0..doc.len(), "Indexes").unwrap();
            let array = read_i64(&doc, &block).unwrap();
            prop_assert_eq!(&array.values, &values);
            write_i64(&mut doc, &array).unwrap();
            prop_assert_eq!(doc.to_text(), text);
        }
    }
}
