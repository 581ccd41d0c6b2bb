//! Skeleton & Pose Propagation
//!
//! A [`Skeleton`] is a flat, ordered bone table. Parent/child relationships
//! are a tree expressed purely through indices into that table (arena +
//! index), never through owning pointers, and the table is ordered
//! parent-before-child: every bone's parent index is strictly less than its
//! own index. That ordering is established once at extraction time and makes
//! global-pose propagation a single forward pass.
//!
//! # Pose data flow
//!
//! - `local_bind_pose` / `global_bind_pose` are captured at import and never
//!   change afterwards.
//! - `local_pose` starts equal to the bind pose and is the only thing pose
//!   edits ([`Skeleton::rotate_bone`]) touch.
//! - `global_pose` is exclusively written by
//!   [`Skeleton::recalculate_global_poses`]; an edit takes effect only after
//!   the next recalculation.
//!
//! Skin matrices (`global_pose * global_bind_pose⁻¹`) are derived on demand
//! rather than stored, see [`Skeleton::skin_matrices`].

use glam::{EulerRot, Mat4, Quat, Vec3};
use uuid::Uuid;

use crate::errors::{MarrowError, Result};

/// Inverse of `m`, or `None` when the matrix is singular. A small but
/// well-conditioned determinant (e.g. a uniformly tiny bind scale) still
/// inverts fine; only a zero/non-finite determinant or a non-finite
/// inverse counts as degenerate.
fn try_invert(m: &Mat4) -> Option<Mat4> {
    let det = m.determinant();
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    let inverse = m.inverse();
    inverse.is_finite().then_some(inverse)
}

/// One bone of a skeleton.
#[derive(Debug, Clone)]
pub struct Bone {
    /// Bone name, unique within its skeleton.
    pub name: String,
    /// Index of the parent bone in the owning table, `None` for a root.
    /// Always strictly less than this bone's own index.
    pub parent: Option<usize>,
    /// Rest transform relative to the parent, captured at bind time.
    pub local_bind_pose: Mat4,
    /// Rest transform in model space, composed during extraction.
    pub global_bind_pose: Mat4,
    /// Current transform relative to the parent. Starts at
    /// `local_bind_pose`; mutated by pose edits.
    pub local_pose: Mat4,
    /// Current transform in model space. Recomputed by
    /// [`Skeleton::recalculate_global_poses`].
    pub global_pose: Mat4,
}

/// Ordered bone table with bind poses and the current pose.
///
/// An empty skeleton is valid: it is the "static mesh, no skinning" signal,
/// and every pose/skin operation on it is a no-op.
#[derive(Debug, Clone)]
pub struct Skeleton {
    pub id: Uuid,
    pub name: String,
    bones: Vec<Bone>,
}

impl Skeleton {
    /// Builds a skeleton from `(name, parent, local_bind_pose)` triples in
    /// parent-before-child order, composing each bone's global bind pose
    /// with its parent's in the same forward pass.
    ///
    /// # Errors
    ///
    /// - [`MarrowError::InvalidBoneIndex`] if a parent link does not point
    ///   at an earlier entry.
    /// - [`MarrowError::DuplicateBoneName`] if two bones share a name.
    pub fn from_local_binds<N>(
        name: &str,
        local_binds: impl IntoIterator<Item = (N, Option<usize>, Mat4)>,
    ) -> Result<Self>
    where
        N: Into<String>,
    {
        let mut bones: Vec<Bone> = Vec::new();

        for (bone_name, parent, local_bind_pose) in local_binds {
            let bone_name = bone_name.into();
            let index = bones.len();

            if bones.iter().any(|b| b.name == bone_name) {
                return Err(MarrowError::DuplicateBoneName { name: bone_name });
            }

            let global_bind_pose = match parent {
                None => local_bind_pose,
                Some(p) if p < index => bones[p].global_bind_pose * local_bind_pose,
                Some(p) => {
                    return Err(MarrowError::InvalidBoneIndex {
                        index: p,
                        bone_count: index,
                    });
                }
            };

            bones.push(Bone {
                name: bone_name,
                parent,
                local_bind_pose,
                global_bind_pose,
                local_pose: local_bind_pose,
                global_pose: global_bind_pose,
            });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            bones,
        })
    }

    /// An empty skeleton (static mesh, no skinning).
    #[must_use]
    pub fn empty(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            bones: Vec::new(),
        }
    }

    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[must_use]
    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Linear search for a bone by exact, case-sensitive name.
    ///
    /// Returns the first matching index; extraction already guarantees
    /// names are unique, so "first" is also "only".
    #[must_use]
    pub fn find_bone_by_name(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    /// Recomputes `global_pose` for every bone in one forward pass:
    /// `global = parent_global * local` (a root's global is its own local).
    ///
    /// Idempotent: calling this twice without an intervening pose edit
    /// leaves every `global_pose` unchanged.
    pub fn recalculate_global_poses(&mut self) {
        for i in 0..self.bones.len() {
            debug_assert!(
                self.bones[i].parent.is_none_or(|p| p < i),
                "bone table must be ordered parent-before-child"
            );
            self.bones[i].global_pose = match self.bones[i].parent {
                None => self.bones[i].local_pose,
                Some(p) => self.bones[p].global_pose * self.bones[i].local_pose,
            };
        }
    }

    /// Applies an incremental rotation, given as Euler degrees (XYZ order),
    /// to one bone's current local pose. The bone rotates about its own
    /// origin; its local translation is preserved.
    ///
    /// The edit does not propagate to descendants by itself — callers must
    /// follow up with [`Self::recalculate_global_poses`].
    ///
    /// # Errors
    ///
    /// [`MarrowError::InvalidBoneIndex`] if `bone_index` is out of range.
    pub fn rotate_bone(&mut self, bone_index: usize, euler_degrees: Vec3) -> Result<()> {
        let bone_count = self.bones.len();
        let bone = self
            .bones
            .get_mut(bone_index)
            .ok_or(MarrowError::InvalidBoneIndex {
                index: bone_index,
                bone_count,
            })?;

        let rotation = Mat4::from_quat(Quat::from_euler(
            EulerRot::XYZ,
            euler_degrees.x.to_radians(),
            euler_degrees.y.to_radians(),
            euler_degrees.z.to_radians(),
        ));
        bone.local_pose *= rotation;
        Ok(())
    }

    /// Restores every bone's current local pose to its bind pose. Takes
    /// effect on the next [`Self::recalculate_global_poses`].
    pub fn reset_pose(&mut self) {
        for bone in &mut self.bones {
            bone.local_pose = bone.local_bind_pose;
        }
    }

    /// Strict inverse of one bone's global bind pose.
    ///
    /// # Errors
    ///
    /// - [`MarrowError::InvalidBoneIndex`] if `bone_index` is out of range.
    /// - [`MarrowError::DegenerateBindPose`] if the matrix is singular.
    pub fn inverse_bind_matrix(&self, bone_index: usize) -> Result<Mat4> {
        let bone = self
            .bones
            .get(bone_index)
            .ok_or(MarrowError::InvalidBoneIndex {
                index: bone_index,
                bone_count: self.bones.len(),
            })?;

        try_invert(&bone.global_bind_pose).ok_or_else(|| MarrowError::DegenerateBindPose {
            bone: bone.name.clone(),
        })
    }

    /// Current skin matrices, one per bone in table order:
    /// `global_pose * global_bind_pose⁻¹`, mapping a bind-pose vertex to its
    /// position under the current pose.
    ///
    /// A bone whose global bind pose is singular contributes an identity
    /// skin matrix (logged, not an error): one degenerate bone must not
    /// poison a whole mesh with NaNs.
    #[must_use]
    pub fn skin_matrices(&self) -> Vec<Mat4> {
        self.bones
            .iter()
            .map(|bone| {
                if let Some(inverse_bind) = try_invert(&bone.global_bind_pose) {
                    bone.global_pose * inverse_bind
                } else {
                    log::warn!(
                        "skeleton \"{}\": degenerate bind pose for bone \"{}\", using identity skin matrix",
                        self.name,
                        bone.name
                    );
                    Mat4::IDENTITY
                }
            })
            .collect()
    }
}
