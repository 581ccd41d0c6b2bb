//! Skeletal mesh render data: the output boundary of an import.

use uuid::Uuid;

use crate::skeleton::Skeleton;
use crate::skinning::{SkinnedVertex, skin_vertices};

/// A contiguous run of the index buffer sharing one material, lining up
/// with one sequential draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialSubset {
    /// Material slot of the source scene this subset draws with.
    pub material_index: usize,
    /// Offset of the first index of the run.
    pub first_index: u32,
    /// Number of indices in the run (a multiple of 3).
    pub index_count: u32,
}

/// Everything one skeletal-mesh import produces, owned by the mesh asset
/// that commissioned it.
///
/// `vertices` holds the bind pose; skinning never mutates it. The bone
/// table lives for as long as this asset and is dropped with it.
#[derive(Debug, Clone)]
pub struct SkeletalMeshData {
    pub id: Uuid,
    pub name: String,
    pub skeleton: Skeleton,
    /// Bind-pose vertex buffer.
    pub vertices: Vec<SkinnedVertex>,
    /// Index buffer, laid out subset-by-subset.
    pub indices: Vec<u32>,
    /// Contiguous per-material index ranges into `indices`.
    pub subsets: Vec<MaterialSubset>,
}

impl SkeletalMeshData {
    /// `false` means the source had no joints: treat this mesh as static
    /// and skip the skinning path entirely.
    #[must_use]
    pub fn is_skinned(&self) -> bool {
        !self.skeleton.is_empty()
    }

    /// Skins the bind-pose vertices with the skeleton's current pose into a
    /// fresh buffer. For per-frame reuse, derive the matrices once via
    /// [`Skeleton::skin_matrices`] and call
    /// [`skin_vertices_into`](crate::skin_vertices_into) directly.
    #[must_use]
    pub fn skinned_vertices(&self) -> Vec<SkinnedVertex> {
        if !self.is_skinned() {
            return self.vertices.clone();
        }
        skin_vertices(&self.vertices, &self.skeleton.skin_matrices())
    }
}
