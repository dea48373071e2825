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

//! Core baking components
//!
//! Everything in here operates on an in-memory line buffer and performs no
//! I/O between load and save. The modules are layered leaves-first:
//!
//! - [`math`]: 3-vectors, 4x4 matrices, Euler composition
//! - [`document`]: line buffer, section/node locator, property and array
//!   readers/writers
//! - [`transform`]: the FBX transform chain composer
//! - [`geometry`]: the mesh mutator (positions, layers, winding, hygiene)
//! - [`baker`]: the per-file driver tying the above together

pub mod baker;
pub mod document;
pub mod error;
pub mod geometry;
pub mod math;
pub mod transform;
