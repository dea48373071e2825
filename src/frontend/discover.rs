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

//! Input discovery
//!
//! Enumerates `.fbx` scene files and `.prefab` descriptors directly inside
//! the input directory (never descending into subdirectories, so the
//! output directory can never feed back into a run) and sniffs binary FBX
//! files by their magic header.

use crate::core::error::Result;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Leading bytes of the binary FBX serialization
const BINARY_MAGIC: &[u8] = b"Kaydara FBX Binary";

/// What kind of processing an input file needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// ASCII scene file for the transform baker
    Fbx,
    /// Engine descriptor for the value-substitution pass
    Prefab,
}

/// One file selected for processing
#[derive(Debug, Clone)]
pub struct InputFile {
    pub path: PathBuf,
    pub kind: InputKind,
}

/// Enumerate processable files in `dir`, sorted by file name
///
/// The sort keeps batch output and reports deterministic regardless of
/// directory iteration order.
pub fn discover(dir: &Path) -> Result<Vec<InputFile>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let kind = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("fbx") => InputKind::Fbx,
            Some(ext) if ext.eq_ignore_ascii_case("prefab") => InputKind::Prefab,
            _ => continue,
        };
        files.push(InputFile { path, kind });
    }
    files.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(files)
}

/// Check the first 20 bytes for the binary FBX magic
pub fn is_binary_fbx(path: &Path) -> Result<bool> {
    let mut head = Vec::with_capacity(20);
    File::open(path)?.take(20).read_to_end(&mut head)?;
    Ok(head.starts_with(BINARY_MAGIC))
}
