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

//! Line buffer and text locator for the ASCII scene format
//!
//! The buffer is an ordered sequence of lines with endings stripped; every
//! mutation rewrites a single entry in place, so untouched lines flow back
//! to disk byte-identical. The locator finds top-level sections, node
//! headers and property lines without building a syntax tree: it only
//! recognizes what the baker mutates and treats everything else as opaque
//! text.
//!
//! # Modules
//!
//! - [`number`]: locale-independent numeric parse/print
//! - [`props`]: 3-vector property reader/writer
//! - [`arrays`]: multi-line numeric array reader/writer

pub mod arrays;
pub mod number;
pub mod props;

use super::error::{BakeError, Result};
use std::path::Path;

/// An in-memory text file as a vector of ending-stripped lines
///
/// The line-ending flavor and the presence of a final newline are captured
/// at load and reproduced at save, so a file that needs no changes writes
/// back byte-identical. The line count never changes after load.
#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<String>,
    crlf: bool,
    trailing_newline: bool,
}

impl Document {
    /// Build a document from in-memory text
    pub fn from_text(text: &str) -> Self {
        let crlf = text.contains("\r\n");
        let trailing_newline = text.ends_with('\n');
        let body = text.strip_suffix('\n').unwrap_or(text);
        let lines = body
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect();
        Self {
            lines,
            crlf,
            trailing_newline,
        }
    }

    /// Read a file into a document
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        // Inputs are "ASCII-compatible single-byte lines"; anything beyond
        // that passes through untouched as replacement-lossless text.
        let text = String::from_utf8_lossy(&bytes);
        Ok(Self::from_text(&text))
    }

    /// Serialize back to text with the original ending flavor
    pub fn to_text(&self) -> String {
        let sep = if self.crlf { "\r\n" } else { "\n" };
        let mut text = self.lines.join(sep);
        if self.trailing_newline {
            text.push_str(sep);
        }
        text
    }

    /// Write the document to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_text())?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Borrow a line by index
    pub fn line(&self, index: usize) -> &str {
        &self.lines[index]
    }

    /// Replace a line in place
    ///
    /// This is the only mutation the buffer supports; insertions and
    /// deletions are structurally impossible.
    pub fn set_line(&mut self, index: usize, text: String) {
        self.lines[index] = text;
    }
}

/// A brace-delimited region located in the buffer
///
/// `header` is the line carrying `<name>:`, `open` the line with the
/// opening brace (possibly the header line itself) and `close` the line
/// with the matching closing brace. All indices are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub header: usize,
    pub open: usize,
    pub close: usize,
}

impl Block {
    /// Lines strictly inside the braces
    pub fn body(&self) -> std::ops::Range<usize> {
        self.open + 1..self.close
    }
}

/// Count brace depth across one line, ignoring braces inside quoted runs
///
/// Returns the updated depth. Quoted runs never span lines in this format.
fn advance_depth(line: &str, mut depth: i32) -> i32 {
    let mut in_quotes = false;
    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            '{' if !in_quotes => depth += 1,
            '}' if !in_quotes => depth -= 1,
            _ => {}
        }
    }
    depth
}

/// True if the line is blank or a `;` comment
fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with(';')
}

impl Document {
    /// Find the first top-level section named `name`
    ///
    /// A section starts at the first line whose leading non-whitespace text
    /// is `<name>:`. The opening brace may sit on the header line or on a
    /// later non-empty, non-comment line; any other intervening content
    /// cancels the discovery.
    pub fn find_section(&self, name: &str) -> Option<Block> {
        let prefix = format!("{}:", name);
        let header = (0..self.len()).find(|&i| self.line(i).trim_start().starts_with(&prefix))?;
        self.match_block(header)
    }

    /// Resolve the brace-delimited block introduced at `header`
    ///
    /// Returns `None` when the opening brace is missing or never balanced.
    pub fn match_block(&self, header: usize) -> Option<Block> {
        let mut open = None;
        if line_has_brace(self.line(header)) {
            open = Some(header);
        } else {
            for i in header + 1..self.len() {
                let line = self.line(i);
                if is_skippable(line) {
                    continue;
                }
                if line.trim_start().starts_with('{') {
                    open = Some(i);
                }
                break;
            }
        }
        let open = open?;

        // The open line is guaranteed to contain a brace, so depth only
        // returns to zero once the block is balanced.
        let mut depth = 0;
        for i in open..self.len() {
            depth = advance_depth(self.line(i), depth);
            if depth == 0 {
                return Some(Block {
                    header,
                    open,
                    close: i,
                });
            }
        }
        None
    }

    /// Line indices of depth-one child headers starting with `prefix`
    ///
    /// Scans the body of `block` tracking nesting so that identically
    /// prefixed lines inside nested nodes are not misread as headers.
    pub fn child_headers(&self, block: &Block, prefix: &str) -> Vec<usize> {
        let mut headers = Vec::new();
        let mut depth = 1; // just inside the section's opening brace
        for i in block.body() {
            let line = self.line(i);
            if depth == 1 && line.trim_start().starts_with(prefix) {
                headers.push(i);
            }
            depth = advance_depth(line, depth);
        }
        headers
    }

    /// Find a `P:`/`Property:` line containing the quoted `name`
    pub fn find_property(&self, range: std::ops::Range<usize>, name: &str) -> Option<usize> {
        let quoted = format!("\"{}\"", name);
        range.into_iter().find(|&i| {
            let trimmed = self.line(i).trim_start();
            (trimmed.starts_with("P:") || trimmed.starts_with("Property:"))
                && trimmed.contains(&quoted)
        })
    }
}

fn line_has_brace(line: &str) -> bool {
    let mut in_quotes = false;
    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            '{' if !in_quotes => return true,
            _ => {}
        }
    }
    false
}

/// Read the node identifier from a header line
///
/// The identifier is the first integer literal after the first colon; an
/// optional trailing `L` suffix is accepted and a leading minus only counts
/// at position zero of the tail.
pub fn extract_node_id(line: &str) -> Option<i64> {
    let colon = line.find(':')?;
    let tail = line[colon + 1..].trim_start();
    let negative = tail.starts_with('-');
    let digits_from = usize::from(negative);
    let digit_len = tail[digits_from..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(tail.len() - digits_from);
    if digit_len == 0 {
        // No literal directly after the colon; fall back to the first digit
        // run anywhere in the tail (unsigned).
        let start = tail.find(|c: char| c.is_ascii_digit())?;
        let len = tail[start..]
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(tail.len() - start);
        return tail[start..start + len].parse().ok();
    }
    let literal = &tail[..digits_from + digit_len];
    literal.parse().ok()
}

/// Read the display name from a node header line
///
/// Prefers the text following `Model::` inside the quoted name; otherwise
/// takes whatever sits between the first two double quotes. `?` when the
/// line has no quoted name at all.
pub fn extract_node_name(line: &str) -> String {
    if let Some(pos) = line.find("Model::") {
        let after = &line[pos + "Model::".len()..];
        if let Some(end) = after.find('"') {
            return after[..end].to_string();
        }
    }
    let mut quotes = line.match_indices('"');
    if let (Some((a, _)), Some((b, _))) = (quotes.next(), quotes.next()) {
        return line[a + 1..b].to_string();
    }
    "?".to_string()
}

/// Split a line's tail into comma-separated fields, honoring quotes
///
/// Returns byte ranges into `line` so callers can both read and splice.
pub fn split_fields(line: &str) -> Vec<std::ops::Range<usize>> {
    let mut fields = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(start..i);
                start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(start..line.len());
    fields
}
