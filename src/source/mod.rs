//! Input Boundary
//!
//! The import pipeline never talks to an asset SDK directly. The surrounding
//! loader owns the SDK's manager/importer/scene lifecycle as a scoped
//! resource and exposes the already-parsed scene to this crate through the
//! [`SceneSource`] trait. This keeps every import re-entrant over independent
//! inputs: there is no module-level "current scene" anywhere in the pipeline,
//! so concurrent imports of different meshes need no coordination.
//!
//! Joints are addressed by opaque `usize` ids chosen by the source; the
//! extractor remaps them to flat bone-table indices.

use glam::{Mat4, Vec2, Vec3};

/// Axis/handedness convention of a source scene.
///
/// The engine is left-handed Z-up. Sources authored in another frame are
/// converted exactly once, at extraction/import time — converted data is
/// never run through the conversion again, which would silently swap axes
/// back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateConvention {
    /// The engine's native frame. Data passes through untouched.
    LeftHandedZUp,
    /// Common DCC export frame (e.g. Maya-style FBX). Converted by swapping
    /// the Y and Z axes, which also flips handedness.
    RightHandedYUp,
}

impl CoordinateConvention {
    /// Change-of-basis matrix from this frame into the engine frame.
    ///
    /// The Y/Z swap is an involution, so the same matrix serves as its own
    /// inverse in [`Self::matrix_to_engine`].
    #[must_use]
    pub fn basis_change(self) -> Mat4 {
        match self {
            Self::LeftHandedZUp => Mat4::IDENTITY,
            Self::RightHandedYUp => Mat4::from_cols_array_2d(&[
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]),
        }
    }

    /// Converts a transform authored in this frame into the engine frame.
    #[must_use]
    pub fn matrix_to_engine(self, m: Mat4) -> Mat4 {
        match self {
            Self::LeftHandedZUp => m,
            Self::RightHandedYUp => {
                let c = self.basis_change();
                // c is self-inverse: M' = C * M * C^-1 = C * M * C
                c * m * c
            }
        }
    }

    /// Converts a point authored in this frame into the engine frame.
    #[must_use]
    pub fn point_to_engine(self, p: Vec3) -> Vec3 {
        match self {
            Self::LeftHandedZUp => p,
            Self::RightHandedYUp => Vec3::new(p.x, p.z, p.y),
        }
    }

    /// Converts a direction authored in this frame into the engine frame.
    ///
    /// The basis change is a pure axis permutation, so directions convert
    /// the same way points do (no inverse-transpose needed).
    #[must_use]
    pub fn direction_to_engine(self, d: Vec3) -> Vec3 {
        self.point_to_engine(d)
    }
}

/// One (joint, weight) pair attached to a control point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Influence {
    /// Source joint id, as used by [`SceneSource`] joint queries.
    pub joint: usize,
    /// Non-negative blend weight. Weights need not sum to 1 across a
    /// vertex; the skinner renormalizes.
    pub weight: f32,
}

/// One triangulated face of the source mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceFace {
    /// Control-point indices of the triangle corners.
    pub indices: [u32; 3],
    /// Material slot this face is assigned to.
    pub material: usize,
}

/// Read-only view of one skeletal mesh inside a parsed source scene.
///
/// All queries are in the source's own coordinate convention; the pipeline
/// converts via [`SceneSource::convention`] during import.
pub trait SceneSource {
    /// Display name of the mesh, used for the produced asset.
    fn mesh_name(&self) -> String {
        "SkeletalMesh".to_string()
    }

    /// Axis/handedness convention the source data is authored in.
    fn convention(&self) -> CoordinateConvention;

    /// Ids of the skeleton's root joints. Empty for an unskinned mesh.
    fn root_joints(&self) -> Vec<usize>;

    /// Child joint ids of `joint`, in the source's authoring order.
    fn joint_children(&self, joint: usize) -> Vec<usize>;

    /// Name of `joint`. Names must be unique per skeleton; duplicates fail
    /// extraction.
    fn joint_name(&self, joint: usize) -> String;

    /// Bind-pose transform of `joint` relative to its parent, in source
    /// coordinates. For deformer joints this is the stored cluster bind
    /// matrix; for plain joints, the node's local transform at rest.
    fn joint_bind_pose(&self, joint: usize) -> Mat4;

    /// Number of control points (vertices) in the mesh.
    fn vertex_count(&self) -> usize;

    /// Bind-pose position of control point `vertex`.
    fn position(&self, vertex: usize) -> Vec3;

    /// Bind-pose normal of control point `vertex`.
    fn normal(&self, vertex: usize) -> Vec3;

    /// Texture coordinate of control point `vertex`.
    fn uv(&self, vertex: usize) -> Vec2;

    /// Triangulated faces with per-face material indices, in authoring
    /// order.
    fn faces(&self) -> Vec<SourceFace>;

    /// Skin-cluster influences of control point `vertex`. May exceed the
    /// engine's per-vertex cap; the importer keeps the largest weights.
    fn influences(&self, vertex: usize) -> Vec<Influence>;
}
