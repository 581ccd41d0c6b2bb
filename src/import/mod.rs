//! Importer Front Door
//!
//! [`import_skeletal_mesh`] turns one [`SceneSource`] into a
//! [`SkeletalMeshData`] asset: skeleton extraction, vertex-buffer build
//! (positions/normals/uvs plus per-vertex influences), then index buffer
//! and material subsets.
//!
//! Each call operates on caller-owned inputs and produces an independent
//! asset — there is no shared importer state, so concurrent imports of
//! different meshes are safe by construction. Cancellation is "drop the
//! output"; a pass is never interrupted mid-traversal.

pub mod extractor;
pub mod subsets;

pub use extractor::{ExtractedSkeleton, extract_skeleton};
pub use subsets::build_material_subsets;

use smallvec::SmallVec;
use uuid::Uuid;

use crate::errors::Result;
use crate::mesh::SkeletalMeshData;
use crate::skinning::{MAX_INFLUENCES, SkinnedVertex};
use crate::source::SceneSource;

/// Imports one skeletal mesh from a parsed source scene.
///
/// A source with zero joints imports fine and yields a mesh whose
/// [`is_skinned`](SkeletalMeshData::is_skinned) is `false`.
///
/// # Errors
///
/// Structural errors from skeleton extraction (see [`extract_skeleton`])
/// abort the import; no mesh is produced.
pub fn import_skeletal_mesh(source: &dyn SceneSource) -> Result<SkeletalMeshData> {
    let ExtractedSkeleton {
        skeleton,
        joint_to_bone,
    } = extract_skeleton(source)?;

    let convention = source.convention();
    let vertex_count = source.vertex_count();
    let mut vertices: Vec<SkinnedVertex> = Vec::with_capacity(vertex_count);
    let mut unknown_joints = 0usize;

    for v in 0..vertex_count {
        let position = convention.point_to_engine(source.position(v));
        let normal = convention
            .direction_to_engine(source.normal(v))
            .try_normalize()
            .unwrap_or(glam::Vec3::Z);
        let mut vertex = SkinnedVertex::unskinned(position, normal, source.uv(v));

        // Collect influences, dropping unusable ones. Weights stay as
        // authored: the skinner renormalizes per vertex at blend time.
        let mut influences: SmallVec<[(u16, f32); 8]> = SmallVec::new();
        for influence in source.influences(v) {
            if influence.weight <= 0.0 {
                continue;
            }
            let Some(&bone) = joint_to_bone.get(&influence.joint) else {
                unknown_joints += 1;
                continue;
            };
            influences.push((bone as u16, influence.weight));
        }

        // SDK-style cap: keep the largest weights when a vertex carries
        // more influences than a slot set holds.
        if influences.len() > MAX_INFLUENCES {
            influences.sort_by(|a, b| b.1.total_cmp(&a.1));
            influences.truncate(MAX_INFLUENCES);
        }

        for (slot, &(bone, weight)) in influences.iter().enumerate() {
            vertex.bone_indices[slot] = bone;
            vertex.weights[slot] = weight;
        }

        vertices.push(vertex);
    }

    if unknown_joints > 0 {
        log::warn!(
            "import \"{}\": {unknown_joints} influences referenced joints outside the skeleton and were dropped",
            skeleton.name
        );
    }

    let (indices, subsets) = build_material_subsets(&source.faces());

    let name = source.mesh_name();
    log::debug!(
        "imported skeletal mesh \"{name}\": {} bones, {} vertices, {} indices, {} subsets",
        skeleton.len(),
        vertices.len(),
        indices.len(),
        subsets.len()
    );

    Ok(SkeletalMeshData {
        id: Uuid::new_v4(),
        name,
        skeleton,
        vertices,
        indices,
        subsets,
    })
}
