//! Skeleton & Pose Propagation Tests
//!
//! Tests for:
//! - Bone table construction and the parent-before-child invariant
//! - Global pose propagation (forward pass, idempotence)
//! - Incremental bone rotation and bind-pose immutability
//! - Skin matrix derivation and the degenerate-bind-pose fallback

use glam::{Mat4, Vec3};

use marrow::{MarrowError, Skeleton};

const EPSILON: f32 = 1e-5;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

fn approx_mat4(a: Mat4, b: Mat4) -> bool {
    a.to_cols_array()
        .iter()
        .zip(b.to_cols_array().iter())
        .all(|(x, y)| (x - y).abs() < EPSILON)
}

/// root → mid → tip, each one unit up from its parent.
fn translate_chain() -> Skeleton {
    Skeleton::from_local_binds(
        "chain",
        vec![
            ("root", None, Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0))),
            ("mid", Some(0), Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0))),
            ("tip", Some(1), Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0))),
        ],
    )
    .expect("valid chain")
}

// ============================================================================
// Construction & Invariants
// ============================================================================

#[test]
fn parent_always_precedes_child() {
    let skeleton = translate_chain();
    for (i, bone) in skeleton.bones().iter().enumerate() {
        assert!(
            bone.parent.is_none_or(|p| p < i),
            "bone {i} (\"{}\") has parent {:?} not strictly before it",
            bone.name,
            bone.parent
        );
    }
}

#[test]
fn forward_parent_link_is_rejected() {
    let result = Skeleton::from_local_binds(
        "bad",
        vec![
            ("a", None, Mat4::IDENTITY),
            ("b", Some(5), Mat4::IDENTITY),
        ],
    );
    assert!(matches!(
        result,
        Err(MarrowError::InvalidBoneIndex { index: 5, bone_count: 1 })
    ));
}

#[test]
fn duplicate_bone_name_is_rejected() {
    let result = Skeleton::from_local_binds(
        "dup",
        vec![
            ("spine", None, Mat4::IDENTITY),
            ("spine", Some(0), Mat4::IDENTITY),
        ],
    );
    assert!(matches!(
        result,
        Err(MarrowError::DuplicateBoneName { name }) if name == "spine"
    ));
}

#[test]
fn global_bind_composes_down_the_chain() {
    let skeleton = translate_chain();
    let tip = &skeleton.bones()[2];
    assert!(
        approx_vec3(tip.global_bind_pose.w_axis.truncate(), Vec3::new(0.0, 3.0, 0.0)),
        "tip bind should sit at (0,3,0), got {:?}",
        tip.global_bind_pose.w_axis
    );
}

// ============================================================================
// Pose Propagation
// ============================================================================

#[test]
fn chain_tip_reaches_three_up() {
    let mut skeleton = translate_chain();
    skeleton.recalculate_global_poses();
    let tip = &skeleton.bones()[2];
    assert!(approx_vec3(
        tip.global_pose.w_axis.truncate(),
        Vec3::new(0.0, 3.0, 0.0)
    ));
}

#[test]
fn recalculation_is_idempotent() {
    let mut skeleton = translate_chain();
    skeleton.rotate_bone(1, Vec3::new(10.0, 20.0, 30.0)).unwrap();
    skeleton.recalculate_global_poses();
    let first: Vec<Mat4> = skeleton.bones().iter().map(|b| b.global_pose).collect();

    skeleton.recalculate_global_poses();
    let second: Vec<Mat4> = skeleton.bones().iter().map(|b| b.global_pose).collect();

    assert_eq!(first, second, "second pass must be bit-identical");
}

#[test]
fn root_rotation_moves_descendants_but_not_bind_poses() {
    let mut skeleton = translate_chain();
    let bind_locals: Vec<Mat4> = skeleton.bones().iter().map(|b| b.local_bind_pose).collect();
    let bind_globals: Vec<Mat4> = skeleton.bones().iter().map(|b| b.global_bind_pose).collect();

    skeleton.rotate_bone(0, Vec3::new(0.0, 0.0, 90.0)).unwrap();
    skeleton.recalculate_global_poses();

    // Descendants swing around the root: the chain along +Y folds to -X.
    let mid = skeleton.bones()[1].global_pose.w_axis.truncate();
    let tip = skeleton.bones()[2].global_pose.w_axis.truncate();
    assert!(approx_vec3(mid, Vec3::new(-1.0, 1.0, 0.0)), "mid at {mid:?}");
    assert!(approx_vec3(tip, Vec3::new(-2.0, 1.0, 0.0)), "tip at {tip:?}");

    // Bind data is immutable under pose edits.
    for (i, bone) in skeleton.bones().iter().enumerate() {
        assert_eq!(bone.local_bind_pose, bind_locals[i]);
        assert_eq!(bone.global_bind_pose, bind_globals[i]);
    }
}

#[test]
fn rotate_out_of_range_is_an_error() {
    let mut skeleton = translate_chain();
    let result = skeleton.rotate_bone(7, Vec3::new(0.0, 0.0, 45.0));
    assert!(matches!(
        result,
        Err(MarrowError::InvalidBoneIndex { index: 7, bone_count: 3 })
    ));
}

#[test]
fn reset_pose_restores_bind() {
    let mut skeleton = translate_chain();
    skeleton.rotate_bone(0, Vec3::new(0.0, 0.0, 90.0)).unwrap();
    skeleton.recalculate_global_poses();

    skeleton.reset_pose();
    skeleton.recalculate_global_poses();

    for bone in skeleton.bones() {
        assert!(
            approx_mat4(bone.global_pose, bone.global_bind_pose),
            "bone \"{}\" did not return to bind pose",
            bone.name
        );
    }
}

// ============================================================================
// Bone Lookup
// ============================================================================

#[test]
fn find_bone_by_name_exact_match() {
    let skeleton = translate_chain();
    assert_eq!(skeleton.find_bone_by_name("mid"), Some(1));
    assert_eq!(skeleton.find_bone_by_name("tip"), Some(2));
}

#[test]
fn find_bone_by_name_is_case_sensitive() {
    let skeleton = translate_chain();
    assert_eq!(skeleton.find_bone_by_name("Mid"), None);
    assert_eq!(skeleton.find_bone_by_name("toes"), None);
}

// ============================================================================
// Skin Matrices
// ============================================================================

#[test]
fn skin_matrices_at_bind_are_identity() {
    let mut skeleton = translate_chain();
    skeleton.recalculate_global_poses();
    for (i, m) in skeleton.skin_matrices().iter().enumerate() {
        assert!(
            approx_mat4(*m, Mat4::IDENTITY),
            "bone {i}: skin matrix at bind pose should be identity, got {m:?}"
        );
    }
}

#[test]
fn degenerate_bind_pose_falls_back_to_identity() {
    init_logs();
    let mut skeleton = Skeleton::from_local_binds(
        "flat",
        vec![
            ("ok", None, Mat4::from_translation(Vec3::X)),
            ("collapsed", Some(0), Mat4::from_scale(Vec3::new(0.0, 1.0, 1.0))),
        ],
    )
    .expect("construction itself is fine");
    skeleton.recalculate_global_poses();

    let matrices = skeleton.skin_matrices();
    assert!(approx_mat4(matrices[0], Mat4::IDENTITY));
    assert_eq!(matrices[1], Mat4::IDENTITY, "singular bind must fall back to identity");
    assert!(matrices.iter().all(|m| m.is_finite()), "no NaNs may escape");
}

#[test]
fn strict_inverse_bind_reports_degenerate_pose() {
    let skeleton = Skeleton::from_local_binds(
        "flat",
        vec![
            ("ok", None, Mat4::from_translation(Vec3::X)),
            ("collapsed", Some(0), Mat4::from_scale(Vec3::new(0.0, 1.0, 1.0))),
        ],
    )
    .unwrap();

    assert!(skeleton.inverse_bind_matrix(0).is_ok());
    assert!(matches!(
        skeleton.inverse_bind_matrix(1),
        Err(MarrowError::DegenerateBindPose { bone }) if bone == "collapsed"
    ));
    assert!(matches!(
        skeleton.inverse_bind_matrix(9),
        Err(MarrowError::InvalidBoneIndex { .. })
    ));
}

#[test]
fn tiny_uniform_bind_scale_is_not_degenerate() {
    // det ≈ 6e-8 is far below f32::EPSILON but the matrix inverts fine; a
    // mouse-sized rig must not be misclassified as singular.
    let mut skeleton = Skeleton::from_local_binds(
        "mouse",
        vec![("root", None, Mat4::from_scale(Vec3::splat(0.004)))],
    )
    .unwrap();

    assert!(skeleton.inverse_bind_matrix(0).is_ok());

    skeleton.rotate_bone(0, Vec3::new(0.0, 0.0, 90.0)).unwrap();
    skeleton.recalculate_global_poses();
    let m = skeleton.skin_matrices()[0];
    assert!(m.is_finite());
    assert!(
        !approx_mat4(m, Mat4::IDENTITY),
        "a posed tiny-scale bone must get a real skin matrix, not the identity fallback"
    );
}

// ============================================================================
// Empty Skeleton
// ============================================================================

#[test]
fn empty_skeleton_is_a_valid_static_signal() {
    let mut skeleton = Skeleton::empty("static");
    assert!(skeleton.is_empty());
    skeleton.recalculate_global_poses();
    assert!(skeleton.skin_matrices().is_empty());
    assert_eq!(skeleton.find_bone_by_name("anything"), None);
}
