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

//! Transform composer
//!
//! Composes a model node's transform properties into the matrices the
//! baker needs, following the engine convention:
//!
//! ```text
//! M_node  = T * Roff * Rp * Rpre * R * Rpost^-1 * Rp^-1 * Soff * Sp * S * Sp^-1
//! M_geo   = Tg * Rg * Sg
//! M_clean = T * Roff * Soff
//! M_bake  = M_clean^-1 * M_node * M_geo
//! ```
//!
//! `M_clean` is the translation-only residue deliberately left on the node
//! so the world-space position of the mesh origin is unchanged after the
//! bake. Each pivot step is a separate affine factor; the chain must not
//! be algebraically "simplified".

use super::document::{props, Block, Document};
use super::error::Result;
use super::math::{Mat4, RotationOrder, Vec3};

/// Property names of the transform chain, as spelled in the scene format
mod names {
    pub const LCL_TRANSLATION: &str = "Lcl Translation";
    pub const LCL_ROTATION: &str = "Lcl Rotation";
    pub const LCL_SCALING: &str = "Lcl Scaling";
    pub const PRE_ROTATION: &str = "PreRotation";
    pub const POST_ROTATION: &str = "PostRotation";
    pub const ROTATION_OFFSET: &str = "RotationOffset";
    pub const ROTATION_PIVOT: &str = "RotationPivot";
    pub const SCALING_OFFSET: &str = "ScalingOffset";
    pub const SCALING_PIVOT: &str = "ScalingPivot";
    pub const GEOMETRIC_TRANSLATION: &str = "GeometricTranslation";
    pub const GEOMETRIC_ROTATION: &str = "GeometricRotation";
    pub const GEOMETRIC_SCALING: &str = "GeometricScaling";
    pub const ROTATION_ORDER: &str = "RotationOrder";
}

/// The full set of transform properties read from one model node
///
/// Missing properties take their neutral defaults: zero for translations
/// and rotations, one for scalings, `Xyz` for the rotation order.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTransform {
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scaling: Vec3,
    pub pre_rotation: Vec3,
    pub post_rotation: Vec3,
    pub rotation_offset: Vec3,
    pub rotation_pivot: Vec3,
    pub scaling_offset: Vec3,
    pub scaling_pivot: Vec3,
    pub geometric_translation: Vec3,
    pub geometric_rotation: Vec3,
    pub geometric_scaling: Vec3,
    pub rotation_order: RotationOrder,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scaling: Vec3::ONE,
            pre_rotation: Vec3::ZERO,
            post_rotation: Vec3::ZERO,
            rotation_offset: Vec3::ZERO,
            rotation_pivot: Vec3::ZERO,
            scaling_offset: Vec3::ZERO,
            scaling_pivot: Vec3::ZERO,
            geometric_translation: Vec3::ZERO,
            geometric_rotation: Vec3::ZERO,
            geometric_scaling: Vec3::ONE,
            rotation_order: RotationOrder::Xyz,
        }
    }
}

impl NodeTransform {
    /// Read the transform properties out of a model's property block
    ///
    /// Unreadable individual lines fall back to their defaults; a totally
    /// absent property block is simply all defaults, which the bake gate
    /// then rejects as nothing-to-do.
    pub fn read(doc: &Document, block: &Block) -> Self {
        let mut t = Self::default();
        let read = |name: &str, default: Vec3| -> Vec3 {
            doc.find_property(block.body(), name)
                .and_then(|line| props::read_vec3(doc, line).ok())
                .unwrap_or(default)
        };
        t.translation = read(names::LCL_TRANSLATION, Vec3::ZERO);
        t.rotation = read(names::LCL_ROTATION, Vec3::ZERO);
        t.scaling = read(names::LCL_SCALING, Vec3::ONE);
        t.pre_rotation = read(names::PRE_ROTATION, Vec3::ZERO);
        t.post_rotation = read(names::POST_ROTATION, Vec3::ZERO);
        t.rotation_offset = read(names::ROTATION_OFFSET, Vec3::ZERO);
        t.rotation_pivot = read(names::ROTATION_PIVOT, Vec3::ZERO);
        t.scaling_offset = read(names::SCALING_OFFSET, Vec3::ZERO);
        t.scaling_pivot = read(names::SCALING_PIVOT, Vec3::ZERO);
        t.geometric_translation = read(names::GEOMETRIC_TRANSLATION, Vec3::ZERO);
        t.geometric_rotation = read(names::GEOMETRIC_ROTATION, Vec3::ZERO);
        t.geometric_scaling = read(names::GEOMETRIC_SCALING, Vec3::ONE);
        t.rotation_order = doc
            .find_property(block.body(), names::ROTATION_ORDER)
            .and_then(|line| props::read_scalar_i64(doc, line).ok())
            .map(RotationOrder::from_index)
            .unwrap_or_default();
        t
    }

    /// Whether any property the bake folds in is away from neutral
    ///
    /// Local translation, offsets and pivots are deliberately not part of
    /// the gate: their effect either lands in the clean residue or cancels,
    /// so alone they compose to an identity bake matrix.
    pub fn needs_bake(&self) -> bool {
        self.rotation != Vec3::ZERO
            || self.pre_rotation != Vec3::ZERO
            || self.post_rotation != Vec3::ZERO
            || self.scaling != Vec3::ONE
            || self.geometric_translation != Vec3::ZERO
            || self.geometric_rotation != Vec3::ZERO
            || self.geometric_scaling != Vec3::ONE
    }

    /// The node's full local transform under the engine convention
    pub fn node_matrix(&self) -> Result<Mat4> {
        let post_inv = Mat4::euler(self.post_rotation, RotationOrder::Xyz).inverse()?;
        Ok(Mat4::translation(self.translation)
            * Mat4::translation(self.rotation_offset)
            * Mat4::translation(self.rotation_pivot)
            * Mat4::euler(self.pre_rotation, RotationOrder::Xyz)
            * Mat4::euler(self.rotation, self.rotation_order)
            * post_inv
            * Mat4::translation(-self.rotation_pivot)
            * Mat4::translation(self.scaling_offset)
            * Mat4::translation(self.scaling_pivot)
            * Mat4::scaling(self.scaling)
            * Mat4::translation(-self.scaling_pivot))
    }

    /// The mesh-only transform, never propagated to children
    pub fn geometric_matrix(&self) -> Mat4 {
        Mat4::translation(self.geometric_translation)
            * Mat4::euler(self.geometric_rotation, RotationOrder::Xyz)
            * Mat4::scaling(self.geometric_scaling)
    }

    /// The translation residue left on the node after baking
    pub fn clean_matrix(&self) -> Mat4 {
        Mat4::translation(self.translation)
            * Mat4::translation(self.rotation_offset)
            * Mat4::translation(self.scaling_offset)
    }

    /// The matrix folded into the geometry: `M_clean^-1 * M_node * M_geo`
    ///
    /// # Errors
    ///
    /// [`super::error::BakeError::SingularMatrix`] when the clean residue
    /// cannot be inverted; the driver skips such meshes.
    pub fn bake_matrix(&self) -> Result<Mat4> {
        Ok(self.clean_matrix().inverse()? * self.node_matrix()? * self.geometric_matrix())
    }
}

/// True when the transform flips handedness and winding must reverse
pub fn is_mirroring(bake: &Mat4) -> bool {
    bake.det3() < 0.0
}
