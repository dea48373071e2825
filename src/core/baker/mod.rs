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

//! Per-file baker driver
//!
//! Discovers model and geometry nodes inside the `Objects` section, links
//! them through the `Connections` table, and runs the composer and mutator
//! over every linked pair. Work units are processed by ascending geometry
//! identifier so repeated runs produce identical output. Every fragment
//! failure (bad identifier, unbalanced node, singular residue) skips just
//! that entry with a warning; the driver itself cannot fail a file.

use super::document::{extract_node_id, extract_node_name, props, split_fields, Block, Document};
use super::geometry;
use super::math::Vec3;
use super::transform::NodeTransform;
use std::collections::HashMap;

/// What one driver invocation did to the buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BakeOutcome {
    /// Meshes whose geometry was rewritten
    pub meshes: usize,
    /// Normals adjusted by the hygiene pass, summed over meshes
    pub fixed_normals: usize,
}

/// A model node located in the buffer
#[derive(Debug, Clone)]
struct ModelEntry {
    id: i64,
    name: String,
    /// Property block bounds; absent means no bakeable transforms
    properties: Option<Block>,
}

/// A mesh-bearing geometry node located in the buffer
#[derive(Debug, Clone, Copy)]
struct GeometryEntry {
    id: i64,
    block: Block,
}

/// Bake every linked mesh in the buffer
///
/// Returns how many meshes were rewritten; zero is a normal outcome for
/// files without an `Objects` section or without bakeable transforms.
pub fn bake_document(doc: &mut Document) -> BakeOutcome {
    let mut outcome = BakeOutcome::default();

    let Some(objects) = doc.find_section("Objects") else {
        log::debug!("no Objects section; nothing to bake");
        return outcome;
    };

    let models = scan_models(doc, &objects);
    let geometries = scan_geometries(doc, &objects);
    let links = scan_connections(doc, &models, &geometries);

    // Canonical work order: ascending geometry identifier
    let mut work: Vec<(&GeometryEntry, &ModelEntry)> = links
        .iter()
        .filter_map(|(geo_id, model_id)| {
            Some((geometries.get(geo_id)?, models.get(model_id)?))
        })
        .collect();
    work.sort_by_key(|(geo, _)| geo.id);

    for (geo, model) in work {
        let Some(props_block) = model.properties else {
            continue;
        };
        let transform = NodeTransform::read(doc, &props_block);
        if !transform.needs_bake() {
            log::trace!("model \"{}\" is already at rest", model.name);
            continue;
        }
        let bake = match transform.bake_matrix() {
            Ok(m) => m,
            Err(e) => {
                log::warn!("skipping mesh {} (\"{}\"): {}", geo.id, model.name, e);
                continue;
            }
        };

        let change = geometry::bake_mesh(doc, &geo.block, &bake);
        reset_transforms(doc, &props_block);
        outcome.meshes += 1;
        outcome.fixed_normals += change.fixed_normals;
        log::info!(
            "baked mesh {} into \"{}\" ({} normals fixed)",
            geo.id,
            model.name,
            change.fixed_normals
        );
    }

    outcome
}

fn scan_models(doc: &Document, objects: &Block) -> HashMap<i64, ModelEntry> {
    let mut models = HashMap::new();
    for header in doc.child_headers(objects, "Model:") {
        let line = doc.line(header);
        let Some(id) = extract_node_id(line) else {
            log::warn!("model header at line {} has no identifier", header + 1);
            continue;
        };
        let Some(block) = doc.match_block(header) else {
            log::warn!("model {} at line {} is unbalanced", id, header + 1);
            continue;
        };
        let properties = doc
            .child_headers(&block, "Properties")
            .first()
            .and_then(|&h| doc.match_block(h));
        models.insert(
            id,
            ModelEntry {
                id,
                name: extract_node_name(line),
                properties,
            },
        );
    }
    models
}

fn scan_geometries(doc: &Document, objects: &Block) -> HashMap<i64, GeometryEntry> {
    let mut geometries = HashMap::new();
    for header in doc.child_headers(objects, "Geometry:") {
        let line = doc.line(header);
        if !line.contains("\"Mesh\"") {
            continue;
        }
        let Some(id) = extract_node_id(line) else {
            log::warn!("geometry header at line {} has no identifier", header + 1);
            continue;
        };
        let Some(block) = doc.match_block(header) else {
            log::warn!("geometry {} at line {} is unbalanced", id, header + 1);
            continue;
        };
        geometries.insert(id, GeometryEntry { id, block });
    }
    geometries
}

/// Map geometry identifiers to their owning model via `OO` rows
fn scan_connections(
    doc: &Document,
    models: &HashMap<i64, ModelEntry>,
    geometries: &HashMap<i64, GeometryEntry>,
) -> HashMap<i64, i64> {
    let mut links = HashMap::new();
    let Some(connections) = doc.find_section("Connections") else {
        return links;
    };
    for i in connections.body() {
        let trimmed = doc.line(i).trim_start();
        let Some(row) = trimmed.strip_prefix("C:").or_else(|| trimmed.strip_prefix("Connect:"))
        else {
            continue;
        };
        let fields = split_fields(row);
        if fields.len() < 3 {
            continue;
        }
        let kind = row[fields[0].clone()].trim().trim_matches('"');
        if kind != "OO" {
            continue;
        }
        let (Some(child), Some(parent)) = (
            parse_id_field(&row[fields[1].clone()]),
            parse_id_field(&row[fields[2].clone()]),
        ) else {
            continue;
        };
        if geometries.contains_key(&child) && models.contains_key(&parent) {
            links.entry(child).or_insert(parent);
        }
    }
    links
}

fn parse_id_field(field: &str) -> Option<i64> {
    field.trim().trim_end_matches('L').parse().ok()
}

/// Neutral values written back after a successful bake
///
/// Translation, offsets and pivots stay: their effect is the clean residue
/// that keeps the node's world position.
const RESET_PROPERTIES: [(&str, Vec3); 7] = [
    ("Lcl Rotation", Vec3::ZERO),
    ("Lcl Scaling", Vec3::ONE),
    ("PreRotation", Vec3::ZERO),
    ("PostRotation", Vec3::ZERO),
    ("GeometricTranslation", Vec3::ZERO),
    ("GeometricRotation", Vec3::ZERO),
    ("GeometricScaling", Vec3::ONE),
];

fn reset_transforms(doc: &mut Document, props_block: &Block) {
    for (name, neutral) in RESET_PROPERTIES {
        if let Some(line) = doc.find_property(props_block.body(), name) {
            if let Err(e) = props::write_vec3(doc, line, neutral) {
                log::warn!("could not reset {}: {}", name, e);
            }
        }
    }
}
