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

//! fbxbake: an in-place transform baker for FBX ASCII files
//!
//! This crate folds node-level transforms (rotation, scaling, pivots,
//! pre/post rotation, geometric offsets) of an FBX ASCII scene into the mesh
//! geometry itself, leaving the node transforms at identity. It also rests
//! the local transform values inside Unity `.prefab` descriptors so a baked
//! model drops into the engine without a hidden rotation.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`core`]: The baker itself (math kernel, text locator, readers/writers,
//!   transform composer, geometry mutator, per-file driver)
//! - [`frontend`]: Batch orchestration (input discovery, prefab pass, run
//!   configuration, console tally, JSON report)
//!
//! # Example
//!
//! ```no_run
//! use fbxbake::core::baker;
//! use fbxbake::core::document::Document;
//!
//! let mut doc = Document::load("cube.fbx")?;
//! let outcome = baker::bake_document(&mut doc);
//! println!("baked {} meshes", outcome.meshes);
//! doc.save("baked/cube.fbx")?;
//! # Ok::<(), fbxbake::BakeError>(())
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`core::error::Result<T>`] which is an
//! alias for `Result<T, BakeError>`.

pub mod core;
pub mod frontend;

// Re-export commonly used types
pub use core::error::{BakeError, Result};
