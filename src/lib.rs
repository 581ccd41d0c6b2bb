#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod errors;
pub mod source;
pub mod skeleton;
pub mod skinning;
pub mod import;
pub mod mesh;

pub use errors::{MarrowError, Result};
pub use source::{CoordinateConvention, Influence, SceneSource, SourceFace};
pub use skeleton::{Bone, Skeleton};
pub use skinning::{MAX_INFLUENCES, SkinnedVertex, UNUSED_BONE, skin_vertices, skin_vertices_into};
pub use import::{extract_skeleton, import_skeletal_mesh};
pub use mesh::{MaterialSubset, SkeletalMeshData};
