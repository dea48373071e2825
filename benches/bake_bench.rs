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

//! Baker benchmarks
//!
//! Times a full driver pass over a synthetic multi-mesh scene, which is
//! dominated by array parsing and reformatting.

use criterion::{criterion_group, criterion_main, Criterion};
use fbxbake::core::baker::bake_document;
use fbxbake::core::document::Document;
use std::hint::black_box;

/// Build a scene with `meshes` rotated grid meshes of `quads` quads each
fn synthetic_scene(meshes: usize, quads: usize) -> String {
    let mut text = String::from("; synthetic benchmark scene\nObjects:  {\n");
    for m in 0..meshes {
        let model_id = 1000 + m as i64;
        let geo_id = 2000 + m as i64;
        text.push_str(&format!(
            "\tModel: {}, \"Model::bench{}\", \"Mesh\" {{\n\
             \t\tProperties70:  {{\n\
             \t\t\tP: \"Lcl Rotation\", \"Lcl Rotation\", \"\", \"A\",90,0,45\n\
             \t\t\tP: \"Lcl Scaling\", \"Lcl Scaling\", \"\", \"A\",-1,1,1\n\
             \t\t}}\n\
             \t}}\n",
            model_id, m
        ));

        let verts = (quads + 1) * 2;
        let mut positions = Vec::with_capacity(verts * 3);
        for v in 0..verts {
            positions.push(format!("{},{},0", v / 2, v % 2));
        }
        let mut indices = Vec::with_capacity(quads * 4);
        for q in 0..quads {
            let base = (q * 2) as i64;
            indices.push(format!("{},{},{},{}", base, base + 1, base + 3, -(base + 2) - 1));
        }
        text.push_str(&format!(
            "\tGeometry: {}, \"Geometry::\", \"Mesh\" {{\n\
             \t\tVertices: *{} {{\n\
             \t\t\ta: {}\n\
             \t\t}}\n\
             \t\tPolygonVertexIndex: *{} {{\n\
             \t\t\ta: {}\n\
             \t\t}}\n\
             \t}}\n",
            geo_id,
            verts * 3,
            positions.join(","),
            quads * 4,
            indices.join(",")
        ));
    }
    text.push_str("}\nConnections:  {\n");
    for m in 0..meshes {
        text.push_str(&format!("\tC: \"OO\",{},{}\n", 2000 + m, 1000 + m));
    }
    text.push_str("}\n");
    text
}

fn bench_bake(c: &mut Criterion) {
    let scene = synthetic_scene(8, 256);
    let template = Document::from_text(&scene);

    c.bench_function("bake_8_meshes_256_quads", |b| {
        b.iter(|| {
            let mut doc = template.clone();
            black_box(bake_document(&mut doc))
        })
    });
}

criterion_group!(benches, bench_bake);
criterion_main!(benches);
