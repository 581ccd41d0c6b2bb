//! CPU Skinner
//!
//! Linear-blend skinning on the CPU: each vertex is a weighted blend of up
//! to [`MAX_INFLUENCES`] bone transforms applied to its bind-pose position.
//! Normals go through the rotation part of each skin matrix only and are
//! renormalized after blending.
//!
//! The pass is pure: it reads skin matrices and bind-pose vertices and
//! writes a separate output buffer, never touching the bone table. Repeated
//! calls with identical inputs produce bit-identical output, which keeps the
//! CPU path usable as a parity reference for a GPU skinning path.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3A, Mat4, Vec2, Vec3};

/// Maximum number of bone influences per vertex.
pub const MAX_INFLUENCES: usize = 4;

/// Sentinel bone index marking an unused influence slot.
pub const UNUSED_BONE: u16 = u16::MAX;

/// One vertex of a skeletal mesh, in the layout handed to the render data.
///
/// `bone_indices`/`weights` pair up slot-wise; slots past the vertex's real
/// influence count hold [`UNUSED_BONE`] and a zero weight. Weights are
/// non-negative but need not sum to 1 — the skinner renormalizes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SkinnedVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub bone_indices: [u16; MAX_INFLUENCES],
    pub weights: [f32; MAX_INFLUENCES],
}

impl SkinnedVertex {
    /// A vertex with no bone influences (skins to its bind pose).
    #[must_use]
    pub fn unskinned(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            uv,
            bone_indices: [UNUSED_BONE; MAX_INFLUENCES],
            weights: [0.0; MAX_INFLUENCES],
        }
    }
}

/// Skins `bind_vertices` with `skin_matrices` into a fresh buffer.
///
/// See [`skin_vertices_into`] for the blend rules.
#[must_use]
pub fn skin_vertices(bind_vertices: &[SkinnedVertex], skin_matrices: &[Mat4]) -> Vec<SkinnedVertex> {
    let mut out = bind_vertices.to_vec();
    skin_vertices_into(bind_vertices, skin_matrices, &mut out);
    out
}

/// Skins `bind_vertices` with `skin_matrices` into `out` (same length),
/// for per-frame reuse without reallocation.
///
/// Per vertex: influences whose index is [`UNUSED_BONE`], out of range for
/// `skin_matrices`, or whose weight is zero are skipped. The remaining
/// weights are renormalized to sum to 1 before blending. A vertex with no
/// active influence at all is left at its bind pose — a recoverable
/// condition, not an error.
///
/// # Panics
///
/// Panics if `out` is not the same length as `bind_vertices`; a partially
/// skinned buffer is never produced.
pub fn skin_vertices_into(
    bind_vertices: &[SkinnedVertex],
    skin_matrices: &[Mat4],
    out: &mut [SkinnedVertex],
) {
    assert_eq!(
        bind_vertices.len(),
        out.len(),
        "output buffer must match the bind vertex buffer length"
    );

    let mut unweighted = 0usize;
    let mut out_of_range = 0usize;

    for (bind, skinned) in bind_vertices.iter().zip(out.iter_mut()) {
        *skinned = *bind;

        let mut total_weight = 0.0f32;
        for slot in 0..MAX_INFLUENCES {
            let index = bind.bone_indices[slot];
            let weight = bind.weights[slot];
            if index == UNUSED_BONE || weight <= 0.0 {
                continue;
            }
            if index as usize >= skin_matrices.len() {
                out_of_range += 1;
                continue;
            }
            total_weight += weight;
        }

        // Zero total weight: bind-pose passthrough.
        if total_weight <= 0.0 {
            unweighted += 1;
            continue;
        }

        let inv_total = 1.0 / total_weight;
        let mut position = Vec3::ZERO;
        let mut normal = Vec3::ZERO;

        for slot in 0..MAX_INFLUENCES {
            let index = bind.bone_indices[slot];
            let weight = bind.weights[slot];
            if index == UNUSED_BONE || weight <= 0.0 || index as usize >= skin_matrices.len() {
                continue;
            }
            let matrix = &skin_matrices[index as usize];
            let w = weight * inv_total;
            position += w * matrix.transform_point3(bind.position);
            normal += w * (Mat3A::from_mat4(*matrix) * bind.normal);
        }

        skinned.position = position;
        skinned.normal = normal.try_normalize().unwrap_or(bind.normal);
    }

    if unweighted > 0 {
        log::debug!("skinning pass: {unweighted} vertices with zero total weight left at bind pose");
    }
    if out_of_range > 0 {
        log::warn!(
            "skinning pass: {out_of_range} influences referenced bones outside the {}-bone table and were skipped",
            skin_matrices.len()
        );
    }
}
