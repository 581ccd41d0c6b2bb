//! Error Types
//!
//! This module defines the error types used throughout the import pipeline.
//!
//! # Overview
//!
//! The main error type [`MarrowError`] covers the structural failure modes of
//! skeleton extraction and pose editing. Numeric edge cases that have a
//! documented safe fallback (a vertex with zero total weight, a singular bind
//! pose encountered while deriving skin matrices) are handled locally and
//! never surface through this type — partial correctness of a skinning pass
//! is preferred over aborting a whole mesh.
//!
//! An empty skeleton is not an error either: it is the valid "static mesh,
//! no skinning" signal.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, MarrowError>`.

use thiserror::Error;

/// The main error type for the import pipeline.
///
/// Structural errors detected during extraction abort the import for that
/// mesh; no partial bone table or vertex buffer is ever returned alongside
/// one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarrowError {
    /// Two joints in the source skeleton share a name. Bone names must be
    /// unique within one skeleton; extraction fails rather than silently
    /// overwriting the earlier bone.
    #[error("duplicate bone name in skeleton: \"{name}\"")]
    DuplicateBoneName {
        /// The offending bone name.
        name: String,
    },

    /// A bone index was outside the skeleton's bone table, or a bone's
    /// parent link did not point at an earlier entry of the table.
    #[error("bone index out of range: {index} (skeleton has {bone_count} bones)")]
    InvalidBoneIndex {
        /// The invalid index.
        index: usize,
        /// Number of bones in the skeleton the index was checked against.
        bone_count: usize,
    },

    /// A bone's global bind pose is singular and cannot be inverted.
    ///
    /// Only surfaced by the strict accessor
    /// [`Skeleton::inverse_bind_matrix`](crate::Skeleton::inverse_bind_matrix);
    /// the pose/skinning path substitutes an identity skin matrix for such a
    /// bone instead of propagating NaNs.
    #[error("degenerate bind pose for bone \"{bone}\" (singular global bind matrix)")]
    DegenerateBindPose {
        /// Name of the bone whose bind pose could not be inverted.
        bone: String,
    },
}

/// Alias for `Result<T, MarrowError>`.
pub type Result<T> = std::result::Result<T, MarrowError>;
