use heartlock_core::snap::{offset_error, snap_released, MergeKind};
use heartlock_core::Scene;

const SIZE: f32 = 160.0;
const THRESHOLD: f32 = 30.0;

/// Every piece parked far from every other one.
fn scattered() -> Scene {
    let translations: Vec<[f32; 2]> = (0..9).map(|id| [2000.0 + id as f32 * 500.0, 0.0]).collect();
    Scene::new(3, SIZE, &translations)
}

#[test]
fn near_miss_merges() {
    let mut scene = scattered();
    scene.set_translation(0, [0.0, 0.0]);
    // Rendered at (158, 2) while it belongs at (160, 0).
    scene.set_translation(1, [-2.0, 2.0]);
    let error = offset_error(&scene, 1, 0).expect("error");
    assert!((error - 8.0f32.sqrt()).abs() < 1e-4);

    let outcome = snap_released(&mut scene, 1, THRESHOLD);
    assert_eq!(outcome.merges.len(), 1);
    assert_eq!(outcome.merges[0].kind, MergeKind::PiecePiece);
    assert_eq!(outcome.merges[0].survivor, 0);
    assert_eq!(scene.group_of(1), Some(0));
    assert_eq!(scene.piece_position(1), Some([160.0, 0.0]));
    assert!(scene.covers_grid_exactly_once());
}

#[test]
fn forty_pixels_off_does_not_merge() {
    let mut scene = scattered();
    scene.set_translation(0, [0.0, 0.0]);
    scene.set_translation(1, [-40.0, 0.0]);
    let outcome = snap_released(&mut scene, 1, THRESHOLD);
    assert!(!outcome.merged());
    assert_eq!(scene.group_count(), 9);
}

#[test]
fn threshold_is_inclusive() {
    let mut scene = scattered();
    scene.set_translation(0, [0.0, 0.0]);
    scene.set_translation(1, [-30.0, 0.0]);
    assert!(snap_released(&mut scene, 1, THRESHOLD).merged());
}

#[test]
fn lone_piece_joins_group() {
    let mut scene = scattered();
    scene.merge(0, 1);
    scene.set_translation(0, [10.0, 10.0]);
    scene.set_translation(2, [15.0, 10.0]);
    let outcome = snap_released(&mut scene, 2, THRESHOLD);
    assert_eq!(outcome.merges[0].kind, MergeKind::PieceGroup);
    assert_eq!(scene.group_of(2), Some(0));
    assert_eq!(scene.translation(0), Some([10.0, 10.0]));
}

#[test]
fn dragged_group_keeps_its_translation() {
    let mut scene = scattered();
    scene.merge(1, 2);
    scene.set_translation(1, [10.0, 10.0]);
    scene.set_translation(0, [30.0, 0.0]);
    let outcome = snap_released(&mut scene, 1, THRESHOLD);
    assert_eq!(outcome.merges[0].kind, MergeKind::GroupPiece);
    assert_eq!(outcome.final_group(), Some(1));
    assert_eq!(scene.piece_position(0), Some([10.0, 10.0]));
}

#[test]
fn larger_group_survives() {
    let mut scene = scattered();
    scene.merge(0, 1);
    scene.merge(3, 4);
    scene.merge(3, 5);
    scene.set_translation(0, [0.0, 0.0]);
    scene.set_translation(3, [0.0, 0.0]);
    let outcome = snap_released(&mut scene, 0, THRESHOLD);
    assert_eq!(outcome.merges.len(), 1);
    assert_eq!(outcome.merges[0].kind, MergeKind::GroupGroup);
    assert_eq!(outcome.merges[0].survivor, 3);
    assert_eq!(scene.group(3).map(|group| group.len()), Some(5));
}

#[test]
fn tie_goes_to_dragged_group() {
    let mut scene = scattered();
    scene.merge(0, 1);
    scene.merge(3, 4);
    scene.set_translation(0, [0.0, 0.0]);
    scene.set_translation(3, [4.0, -3.0]);
    let outcome = snap_released(&mut scene, 0, THRESHOLD);
    assert_eq!(outcome.merges[0].survivor, 0);
    assert!((outcome.merges[0].distance - 5.0).abs() < 1e-4);
    assert_eq!(scene.piece_position(4), Some([160.0, 160.0]));
}

#[test]
fn only_the_released_piece_looks_around() {
    let mut scene = scattered();
    scene.set_translation(0, [5.0, 0.0]);
    scene.set_translation(1, [0.0, 0.0]);
    scene.set_translation(2, [0.0, 0.0]);
    let outcome = snap_released(&mut scene, 0, THRESHOLD);
    assert_eq!(outcome.merges.len(), 1);
    // Piece 2 lines up with piece 1 but is not a neighbor of piece 0.
    assert_eq!(scene.group_of(2), Some(2));
    assert_eq!(scene.group_count(), 8);
}

#[test]
fn one_release_can_merge_on_every_side() {
    let mut scene = scattered();
    for id in [1, 3, 4, 5, 7] {
        scene.set_translation(id, [0.0, 0.0]);
    }
    let outcome = snap_released(&mut scene, 4, THRESHOLD);
    assert_eq!(outcome.merges.len(), 4);
    assert_eq!(scene.group_count(), 5);
    assert!(scene.covers_grid_exactly_once());
}
