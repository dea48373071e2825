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

//! fbxbake CLI entry point
//!
//! Bakes every FBX ASCII file in a directory and rests the matching Unity
//! prefab transforms, writing results into a `baked` subdirectory.

use clap::Parser;
use fbxbake::frontend::{app, RunConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fbxbake")]
#[command(about = "Bakes FBX ASCII transform chains into mesh geometry")]
#[command(version)]
struct Cli {
    /// Directory containing the .fbx and .prefab files to process
    directory: PathBuf,

    /// Path to a run configuration file (default: <directory>/fbxbake.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the output subdirectory name
    #[arg(long)]
    output_subdir: Option<String>,

    /// Leave .prefab descriptors untouched
    #[arg(long)]
    no_prefabs: bool,

    /// Write a JSON batch report to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Environment first, so RUST_LOG from .env is honored
    dotenvy::dotenv().ok();

    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.directory.join("fbxbake.toml"));
    let mut config = config_path
        .to_str()
        .map(RunConfig::load)
        .unwrap_or_else(|| Err("config path is not valid UTF-8".to_string()))
        .unwrap_or_else(|e| {
            log::info!("Using default run config (failed to load: {})", e);
            RunConfig::default_config()
        });
    if let Some(subdir) = cli.output_subdir {
        config.output_subdir = subdir;
    }
    if cli.no_prefabs {
        config.process_prefabs = false;
    }
    if let Some(report) = cli.report {
        config.report_path = Some(report);
    }

    log::info!("Processing {}", cli.directory.display());
    let report = app::run(&cli.directory, &config)?;

    if report.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
