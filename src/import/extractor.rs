//! Skeleton Extractor
//!
//! Walks the source joint hierarchy depth-first, root joints first, and
//! flattens it into the ordered bone table the rest of the pipeline runs
//! on. Visiting parents before children is what establishes the
//! parent-before-child index invariant that makes pose propagation a single
//! forward pass.
//!
//! Every bind-pose transform is converted from the source's coordinate
//! convention into the engine's here, exactly once; nothing downstream may
//! convert again.

use std::collections::HashMap;

use glam::Mat4;

use crate::errors::{MarrowError, Result};
use crate::skeleton::Skeleton;
use crate::source::SceneSource;

/// Flattened skeleton plus the source-joint → bone-index mapping the
/// importer needs to remap per-vertex influences.
#[derive(Debug)]
pub struct ExtractedSkeleton {
    pub skeleton: Skeleton,
    /// Source joint id → index into `skeleton`'s bone table.
    pub joint_to_bone: HashMap<usize, usize>,
}

/// Extracts the bone table from a source skeleton.
///
/// A source with zero joints yields an empty skeleton; that is the valid
/// "static mesh, no skinning" signal, not an error.
///
/// # Errors
///
/// [`MarrowError::DuplicateBoneName`] if two joints share a name, or if the
/// reported hierarchy is not a tree (a joint reachable twice, e.g. through a
/// cycle). The extraction aborts with no partial bone table.
pub fn extract_skeleton(source: &dyn SceneSource) -> Result<ExtractedSkeleton> {
    let convention = source.convention();
    let mut local_binds: Vec<(String, Option<usize>, Mat4)> = Vec::new();
    let mut joint_to_bone: HashMap<usize, usize> = HashMap::new();

    // Depth-first, explicit stack. Children are pushed in reverse so they
    // pop in authoring order.
    let mut stack: Vec<(usize, Option<usize>)> = Vec::new();
    for &root in source.root_joints().iter().rev() {
        stack.push((root, None));
    }

    while let Some((joint, parent_bone)) = stack.pop() {
        let name = source.joint_name(joint);

        // A joint reachable twice means the source hierarchy is not a tree
        // (a cycle or a shared child). Surface it as the duplicate it would
        // produce instead of walking forever.
        if joint_to_bone.contains_key(&joint) {
            return Err(MarrowError::DuplicateBoneName { name });
        }

        let local_bind = convention.matrix_to_engine(source.joint_bind_pose(joint));
        let bone_index = local_binds.len();
        local_binds.push((name, parent_bone, local_bind));
        joint_to_bone.insert(joint, bone_index);

        for &child in source.joint_children(joint).iter().rev() {
            stack.push((child, Some(bone_index)));
        }
    }

    // Global bind poses are composed in the same forward pass the table is
    // built in; the traversal order above makes that safe. Duplicate joint
    // names fail here, before any partial table can escape.
    let skeleton = Skeleton::from_local_binds(&source.mesh_name(), local_binds)?;

    log::debug!(
        "extracted skeleton \"{}\": {} bones",
        skeleton.name,
        skeleton.len()
    );

    Ok(ExtractedSkeleton {
        skeleton,
        joint_to_bone,
    })
}
