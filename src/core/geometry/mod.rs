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

//! Geometry mutator
//!
//! Applies a composed bake matrix to one mesh node: positions get the full
//! affine transform, directional layers (normals, tangents, binormals) get
//! the normal matrix with renormalization, and mirroring transforms
//! additionally reverse polygon winding and reorder per-polygon-vertex
//! layer data. A final hygiene pass snaps noisy normals back to unit
//! length. Every fragment failure is absorbed here with a warning; a bad
//! array never takes the rest of the mesh down with it.

pub mod winding;

use super::document::arrays;
use super::document::{Block, Document};
use super::math::{Mat4, Vec3};
use winding::Polygon;

/// Components smaller than this are noise and snap to zero
const COMPONENT_EPSILON: f64 = 1e-6;

/// Normals shorter than this are degenerate and get replaced
const DEGENERATE_EPSILON: f64 = 1e-6;

/// Tolerated deviation from unit length before renormalizing
const UNIT_TOLERANCE: f64 = 1e-3;

/// Directions shorter than this after transform are left for hygiene
const RENORMALIZE_FLOOR: f64 = 1e-14;

/// What the mutator did to one mesh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshChange {
    /// Normals adjusted by the hygiene pass
    pub fixed_normals: usize,
}

/// Layer-element kinds the mutator recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LayerKind {
    Normal,
    Tangent,
    Binormal,
    Uv,
    Color,
}

impl LayerKind {
    const ALL: [LayerKind; 5] = [
        LayerKind::Normal,
        LayerKind::Tangent,
        LayerKind::Binormal,
        LayerKind::Uv,
        LayerKind::Color,
    ];

    /// Header prefix of the layer-element block
    fn header(&self) -> &'static str {
        match self {
            LayerKind::Normal => "LayerElementNormal:",
            LayerKind::Tangent => "LayerElementTangent:",
            LayerKind::Binormal => "LayerElementBinormal:",
            LayerKind::Uv => "LayerElementUV:",
            LayerKind::Color => "LayerElementColor:",
        }
    }

    /// Name of the direct data array inside the block
    fn array_name(&self) -> &'static str {
        match self {
            LayerKind::Normal => "Normals",
            LayerKind::Tangent => "Tangents",
            LayerKind::Binormal => "Binormals",
            LayerKind::Uv => "UV",
            LayerKind::Color => "Colors",
        }
    }

    /// Values per polygon vertex in the direct array
    fn stride(&self) -> usize {
        match self {
            LayerKind::Normal | LayerKind::Tangent | LayerKind::Binormal => 3,
            LayerKind::Uv => 2,
            LayerKind::Color => 4,
        }
    }

    /// Whether the layer holds directions the normal matrix applies to
    fn directional(&self) -> bool {
        matches!(
            self,
            LayerKind::Normal | LayerKind::Tangent | LayerKind::Binormal
        )
    }
}

/// One located layer-element block with its declared types
#[derive(Debug, Clone)]
struct Layer {
    kind: LayerKind,
    block: Block,
    mapping: String,
    reference: String,
}

/// Text between the first two double quotes on a line
fn quoted_value(line: &str) -> Option<&str> {
    let mut quotes = line.match_indices('"');
    let (a, _) = quotes.next()?;
    let (b, _) = quotes.next()?;
    Some(&line[a + 1..b])
}

/// Find the declared value of a `<key>: "<value>"` line inside a block
fn declared_type(doc: &Document, block: &Block, key: &str) -> String {
    let prefix = format!("{}:", key);
    block
        .body()
        .find(|&i| doc.line(i).trim_start().starts_with(&prefix))
        .and_then(|i| quoted_value(doc.line(i)))
        .unwrap_or_default()
        .to_string()
}

/// Locate every recognized layer-element block inside the geometry node
fn scan_layers(doc: &Document, geo: &Block) -> Vec<Layer> {
    let mut layers = Vec::new();
    for kind in LayerKind::ALL {
        for header in doc.child_headers(geo, kind.header()) {
            let Some(block) = doc.match_block(header) else {
                log::warn!("unbalanced layer element at line {}", header + 1);
                continue;
            };
            layers.push(Layer {
                kind,
                block,
                mapping: declared_type(doc, &block, "MappingInformationType"),
                reference: declared_type(doc, &block, "ReferenceInformationType"),
            });
        }
    }
    layers
}

/// Apply the bake matrix to one mesh node's arrays
///
/// `geo` is the geometry node's brace block. Fragment failures (a missing
/// or unparseable array) are logged and skipped; the function always
/// leaves the buffer in a structurally valid state.
pub fn bake_mesh(doc: &mut Document, geo: &Block, bake: &Mat4) -> MeshChange {
    transform_positions(doc, geo, bake);

    let layers = scan_layers(doc, geo);

    match bake.normal_matrix() {
        Ok(normal_mat) => {
            for layer in layers.iter().filter(|l| l.kind.directional()) {
                transform_directions(doc, layer, &normal_mat);
            }
        }
        Err(_) => {
            log::warn!("bake matrix has no normal transform; directions left untouched");
        }
    }

    if bake.det3() < 0.0 {
        mirror_mesh(doc, geo, &layers);
    }

    let mut change = MeshChange::default();
    for layer in layers.iter().filter(|l| l.kind == LayerKind::Normal) {
        change.fixed_normals += fix_normals(doc, layer);
    }
    change
}

fn transform_positions(doc: &mut Document, geo: &Block, bake: &Mat4) {
    let Some(block) = arrays::find_array(doc, geo.body(), "Vertices") else {
        log::warn!("geometry at line {} has no vertex array", geo.header + 1);
        return;
    };
    let mut array = match arrays::read_f64(doc, &block) {
        Ok(a) => a,
        Err(e) => {
            log::warn!("skipping vertex array: {}", e);
            return;
        }
    };
    if array.values.len() % 3 != 0 {
        log::warn!("vertex array length {} is not a triple", array.values.len());
        return;
    }
    for chunk in array.values.chunks_exact_mut(3) {
        let v = bake.transform_point(Vec3::new(chunk[0], chunk[1], chunk[2]));
        chunk[0] = v.x;
        chunk[1] = v.y;
        chunk[2] = v.z;
    }
    if let Err(e) = arrays::write_f64(doc, &array) {
        log::warn!("vertex array write failed: {}", e);
    }
}

fn transform_directions(doc: &mut Document, layer: &Layer, normal_mat: &Mat4) {
    let name = layer.kind.array_name();
    let Some(block) = arrays::find_array(doc, layer.block.body(), name) else {
        return;
    };
    let mut array = match arrays::read_f64(doc, &block) {
        Ok(a) => a,
        Err(e) => {
            log::warn!("skipping {} array: {}", name, e);
            return;
        }
    };
    if array.values.len() % 3 != 0 {
        log::warn!("{} array length {} is not a triple", name, array.values.len());
        return;
    }
    for chunk in array.values.chunks_exact_mut(3) {
        let mut d = normal_mat.transform_direction(Vec3::new(chunk[0], chunk[1], chunk[2]));
        let len = d.length();
        if len > RENORMALIZE_FLOOR {
            d = d.scaled(1.0 / len);
        }
        chunk[0] = d.x;
        chunk[1] = d.y;
        chunk[2] = d.z;
    }
    if let Err(e) = arrays::write_f64(doc, &array) {
        log::warn!("{} array write failed: {}", name, e);
    }
}

/// Reverse winding and reorder per-polygon-vertex layers
fn mirror_mesh(doc: &mut Document, geo: &Block, layers: &[Layer]) {
    let Some(block) = arrays::find_array(doc, geo.body(), "PolygonVertexIndex") else {
        log::warn!("mirrored geometry at line {} has no index array", geo.header + 1);
        return;
    };
    let mut indices = match arrays::read_i64(doc, &block) {
        Ok(a) => a,
        Err(e) => {
            log::warn!("skipping winding reversal: {}", e);
            return;
        }
    };
    let polygons = match winding::parse_polygons(&indices.values) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("skipping winding reversal: {}", e);
            return;
        }
    };

    winding::reverse_winding(&mut indices.values, &polygons);
    if let Err(e) = arrays::write_i64(doc, &indices) {
        log::warn!("index array write failed: {}", e);
        return;
    }

    for layer in layers {
        if !layer.mapping.contains("ByPolygonVertex") {
            continue;
        }
        reorder_layer(doc, layer, &polygons);
    }
}

fn reorder_layer(doc: &mut Document, layer: &Layer, polygons: &[Polygon]) {
    if layer.reference.contains("IndexToDirect") {
        let name = format!("{}Index", layer.kind.array_name());
        let Some(block) = arrays::find_array(doc, layer.block.body(), &name) else {
            log::warn!("layer at line {} lacks its {} array", layer.block.header + 1, name);
            return;
        };
        match arrays::read_i64(doc, &block) {
            Ok(mut array) => {
                if !winding::reorder_values(&mut array.values, polygons, 1) {
                    log::warn!("{} array is shorter than the polygon list", name);
                    return;
                }
                if let Err(e) = arrays::write_i64(doc, &array) {
                    log::warn!("{} array write failed: {}", name, e);
                }
            }
            Err(e) => log::warn!("skipping {} array: {}", name, e),
        }
    } else {
        let name = layer.kind.array_name();
        let Some(block) = arrays::find_array(doc, layer.block.body(), name) else {
            return;
        };
        match arrays::read_f64(doc, &block) {
            Ok(mut array) => {
                if !winding::reorder_values(&mut array.values, polygons, layer.kind.stride()) {
                    log::warn!("{} array is shorter than the polygon list", name);
                    return;
                }
                if let Err(e) = arrays::write_f64(doc, &array) {
                    log::warn!("{} array write failed: {}", name, e);
                }
            }
            Err(e) => log::warn!("skipping {} array: {}", name, e),
        }
    }
}

/// Snap noisy normals: zero out sub-epsilon components, replace degenerate
/// triples with +Y and renormalize anything visibly off unit length
fn fix_normals(doc: &mut Document, layer: &Layer) -> usize {
    let Some(block) = arrays::find_array(doc, layer.block.body(), "Normals") else {
        return 0;
    };
    let mut array = match arrays::read_f64(doc, &block) {
        Ok(a) => a,
        Err(e) => {
            log::warn!("skipping normal hygiene: {}", e);
            return 0;
        }
    };
    if array.values.len() % 3 != 0 {
        return 0;
    }

    let mut fixed = 0;
    let mut changed = false;
    for chunk in array.values.chunks_exact_mut(3) {
        let before = Vec3::new(chunk[0], chunk[1], chunk[2]);
        let mut n = before;
        if n.x.abs() < COMPONENT_EPSILON {
            n.x = 0.0;
        }
        if n.y.abs() < COMPONENT_EPSILON {
            n.y = 0.0;
        }
        if n.z.abs() < COMPONENT_EPSILON {
            n.z = 0.0;
        }
        let len = n.length();
        if len < DEGENERATE_EPSILON {
            n = Vec3::new(0.0, 1.0, 0.0);
            fixed += 1;
        } else if (len - 1.0).abs() > UNIT_TOLERANCE {
            n = n.scaled(1.0 / len);
            fixed += 1;
        }
        if n != before {
            changed = true;
            chunk[0] = n.x;
            chunk[1] = n.y;
            chunk[2] = n.z;
        }
    }

    if changed {
        if let Err(e) = arrays::write_f64(doc, &array) {
            log::warn!("normal array write failed: {}", e);
            return 0;
        }
    }
    fixed
}
