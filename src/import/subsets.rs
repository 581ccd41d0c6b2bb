//! Material Subset Association
//!
//! Faces arrive from the source in authoring order, each tagged with a
//! material slot. Draw calls want one contiguous index range per material,
//! so the index buffer is laid out material-by-material — materials in order
//! of first appearance, and within each subset the faces in their original
//! order, so index ranges line up with sequential draws.

use crate::mesh::MaterialSubset;
use crate::source::SourceFace;

/// Groups `faces` into a reordered index buffer plus one contiguous
/// [`MaterialSubset`] per unique material.
#[must_use]
pub fn build_material_subsets(faces: &[SourceFace]) -> (Vec<u32>, Vec<MaterialSubset>) {
    // Unique materials in order of first appearance.
    let mut materials: Vec<usize> = Vec::new();
    for face in faces {
        if !materials.contains(&face.material) {
            materials.push(face.material);
        }
    }

    let mut indices: Vec<u32> = Vec::with_capacity(faces.len() * 3);
    let mut subsets: Vec<MaterialSubset> = Vec::with_capacity(materials.len());

    for material in materials {
        let first_index = indices.len() as u32;
        for face in faces.iter().filter(|f| f.material == material) {
            indices.extend_from_slice(&face.indices);
        }
        subsets.push(MaterialSubset {
            material_index: material,
            first_index,
            index_count: indices.len() as u32 - first_index,
        });
    }

    (indices, subsets)
}
