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

//! Unit tests for the batch runner

use crate::frontend::app::{run, FileStatus};
use crate::frontend::config::RunConfig;
use std::fs;

const SCENE: &str = "; FBX 7.3.0 project file\n\
Objects:  {\n\
\tModel: 100, \"Model::mesh\", \"Mesh\" {\n\
\t\tProperties70:  {\n\
\t\t\tP: \"Lcl Rotation\", \"Lcl Rotation\", \"\", \"A\",90,0,0\n\
\t\t}\n\
\t}\n\
\tGeometry: 200, \"Geometry::\", \"Mesh\" {\n\
\t\tVertices: *9 {\n\
\t\t\ta: 1,0,0,0,1,0,0,0,1\n\
\t\t}\n\
\t\tPolygonVertexIndex: *3 {\n\
\t\t\ta: 0,1,-3\n\
\t\t}\n\
\t}\n\
}\n\
Connections:  {\n\
\tC: \"OO\",200,100\n\
}\n";

const PREFAB: &str = "Transform:\n  m_LocalRotation: {x: 0.7, y: 0, z: 0, w: 0.7}\n  m_LocalScale: {x: 2, y: 2, z: 2}\n";

#[test]
fn test_run_writes_under_output_subdir() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("cube.fbx"), SCENE).unwrap();
    fs::write(dir.path().join("cube.prefab"), PREFAB).unwrap();

    let report = run(dir.path(), &RunConfig::default_config()).unwrap();
    assert_eq!(report.ok, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(report.baked_meshes, 1);

    let baked = fs::read_to_string(dir.path().join("baked").join("cube.fbx")).unwrap();
    assert!(baked.contains("\"A\",0,0,0"), "rotation not reset:\n{}", baked);
    let prefab = fs::read_to_string(dir.path().join("baked").join("cube.prefab")).unwrap();
    assert!(prefab.contains("m_LocalRotation: {x: 0, y: 0, z: 0, w: 1}"));
    assert!(prefab.contains("m_LocalScale: {x: 1, y: 1, z: 1}"));
}

#[test]
fn test_binary_fbx_is_skipped_not_failed() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bin.fbx"), b"Kaydara FBX Binary  \x00").unwrap();

    let report = run(dir.path(), &RunConfig::default_config()).unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(report.files[0].status, FileStatus::Skipped);
    assert!(!dir.path().join("baked").join("bin.fbx").exists());
}

#[test]
fn test_prefabs_can_be_disabled() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("cube.prefab"), PREFAB).unwrap();

    let mut config = RunConfig::default_config();
    config.process_prefabs = false;
    let report = run(dir.path(), &config).unwrap();
    assert!(report.files.is_empty());
    assert!(!dir.path().join("baked").join("cube.prefab").exists());
}

#[test]
fn test_report_written_when_configured() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("cube.fbx"), SCENE).unwrap();

    let mut config = RunConfig::default_config();
    let report_path = dir.path().join("report.json");
    config.report_path = Some(report_path.clone());
    run(dir.path(), &config).unwrap();

    let json = fs::read_to_string(&report_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["baked_meshes"], 1);
    assert_eq!(parsed["files"][0]["status"], "ok");
}

#[test]
fn test_second_run_ignores_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("cube.fbx"), SCENE).unwrap();

    run(dir.path(), &RunConfig::default_config()).unwrap();
    let first = fs::read_to_string(dir.path().join("baked").join("cube.fbx")).unwrap();
    let report = run(dir.path(), &RunConfig::default_config()).unwrap();
    // Still exactly one input: the baked/ subdirectory is never discovered
    assert_eq!(report.files.len(), 1);
    let second = fs::read_to_string(dir.path().join("baked").join("cube.fbx")).unwrap();
    assert_eq!(first, second);
}
