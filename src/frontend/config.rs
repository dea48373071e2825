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

//! Run configuration that can be saved/loaded
//!
//! An optional `fbxbake.toml` next to the input files tweaks where output
//! goes and whether prefab descriptors are processed. CLI flags override
//! whatever the file says.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Batch run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Subdirectory of the input directory that receives rewritten files
    #[serde(default = "default_output_subdir")]
    pub output_subdir: String,

    /// Whether `.prefab` descriptors are processed alongside `.fbx` files
    #[serde(default = "default_process_prefabs")]
    pub process_prefabs: bool,

    /// Optional path for a JSON batch report
    #[serde(default)]
    pub report_path: Option<PathBuf>,
}

fn default_output_subdir() -> String {
    "baked".to_string()
}

fn default_process_prefabs() -> bool {
    true
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl RunConfig {
    /// Create default configuration
    pub fn default_config() -> Self {
        Self {
            output_subdir: default_output_subdir(),
            process_prefabs: default_process_prefabs(),
            report_path: None,
        }
    }

    /// Load configuration from TOML file
    pub fn load(path: &str) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        toml::from_str(&contents).map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: &str) -> Result<(), String> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        std::fs::write(path, contents).map_err(|e| format!("Failed to write config file: {}", e))
    }
}
