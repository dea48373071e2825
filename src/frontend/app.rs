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

//! Batch runner
//!
//! Walks the discovered inputs, runs the baker (or the descriptor pass)
//! over each, and writes results under the output subdirectory. Per-file
//! failures are tallied, never propagated: one corrupt file must not stop
//! a directory run. The run ends with an `OK`/`FAIL` summary and an
//! optional JSON report.

use super::config::RunConfig;
use super::discover::{self, InputFile, InputKind};
use super::prefab;
use crate::core::baker;
use crate::core::document::Document;
use crate::core::error::{BakeError, Result};
use serde::Serialize;
use std::path::Path;

/// How one input file ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// Processed and written to the output directory
    Ok,
    /// Binary scene format, not processed
    Skipped,
    /// Could not be read, processed or written
    Failed,
}

/// Per-file entry of the batch report
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub name: String,
    pub status: FileStatus,
    /// Meshes baked (always zero for descriptors)
    pub meshes: usize,
    /// Normals adjusted by the hygiene pass
    pub fixed_normals: usize,
    /// Transform keys rested (descriptors only)
    pub rested_keys: usize,
    /// Failure or skip explanation, empty on success
    pub message: String,
}

/// Aggregated result of one directory run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileOutcome>,
    pub ok: usize,
    pub skipped: usize,
    pub failed: usize,
    pub baked_meshes: usize,
}

impl BatchReport {
    fn push(&mut self, outcome: FileOutcome) {
        match outcome.status {
            FileStatus::Ok => self.ok += 1,
            FileStatus::Skipped => self.skipped += 1,
            FileStatus::Failed => self.failed += 1,
        }
        self.baked_meshes += outcome.meshes;
        self.files.push(outcome);
    }
}

/// Process every input file in `dir` and write results under the output
/// subdirectory
///
/// # Errors
///
/// Only directory-level problems (unreadable input directory, output
/// directory that cannot be created) abort the run; per-file failures are
/// recorded in the report.
pub fn run(dir: &Path, config: &RunConfig) -> Result<BatchReport> {
    let inputs = discover::discover(dir)?;
    let out_dir = dir.join(&config.output_subdir);
    std::fs::create_dir_all(&out_dir)?;

    let mut report = BatchReport::default();
    for input in &inputs {
        if input.kind == InputKind::Prefab && !config.process_prefabs {
            continue;
        }
        let outcome = process_file(input, &out_dir);
        match outcome.status {
            FileStatus::Ok if input.kind == InputKind::Fbx => {
                log::info!("{}: {} meshes baked", outcome.name, outcome.meshes);
            }
            FileStatus::Ok => {
                log::info!("{}: {} transform keys rested", outcome.name, outcome.rested_keys);
            }
            FileStatus::Skipped => log::info!("{}: skipped ({})", outcome.name, outcome.message),
            FileStatus::Failed => log::error!("{}: {}", outcome.name, outcome.message),
        }
        report.push(outcome);
    }

    if report.failed == 0 {
        log::info!(
            "OK: {} files processed, {} meshes baked, {} skipped",
            report.ok,
            report.baked_meshes,
            report.skipped
        );
    } else {
        log::error!("FAIL: {} of {} files failed", report.failed, report.files.len());
    }

    if let Some(path) = &config.report_path {
        write_report(&report, path)?;
    }
    Ok(report)
}

fn process_file(input: &InputFile, out_dir: &Path) -> FileOutcome {
    let name = input
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.path.display().to_string());

    match try_process(input, out_dir) {
        Ok((meshes, fixed_normals, rested_keys)) => FileOutcome {
            name,
            status: FileStatus::Ok,
            meshes,
            fixed_normals,
            rested_keys,
            message: String::new(),
        },
        Err(BakeError::BinarySkipped(message)) => FileOutcome {
            name,
            status: FileStatus::Skipped,
            meshes: 0,
            fixed_normals: 0,
            rested_keys: 0,
            message,
        },
        Err(e) => FileOutcome {
            name,
            status: FileStatus::Failed,
            meshes: 0,
            fixed_normals: 0,
            rested_keys: 0,
            message: e.to_string(),
        },
    }
}

fn try_process(input: &InputFile, out_dir: &Path) -> Result<(usize, usize, usize)> {
    if input.kind == InputKind::Fbx && discover::is_binary_fbx(&input.path)? {
        return Err(BakeError::BinarySkipped(
            "binary scene format, only ASCII is supported".to_string(),
        ));
    }

    let mut doc = Document::load(&input.path)?;
    let (meshes, fixed_normals, rested_keys) = match input.kind {
        InputKind::Fbx => {
            let outcome = baker::bake_document(&mut doc);
            (outcome.meshes, outcome.fixed_normals, 0)
        }
        InputKind::Prefab => (0, 0, prefab::rest_descriptor(&mut doc)),
    };

    let file_name = input
        .path
        .file_name()
        .ok_or_else(|| BakeError::Unexpected("input path has no file name".to_string()))?;
    doc.save(out_dir.join(file_name))?;
    Ok((meshes, fixed_normals, rested_keys))
}

fn write_report(report: &BatchReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| BakeError::Unexpected(format!("report serialization failed: {}", e)))?;
    std::fs::write(path, json)?;
    log::info!("report written to {}", path.display());
    Ok(())
}
