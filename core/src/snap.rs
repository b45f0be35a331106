use crate::grid::SNAP_DIRS;
use crate::model::{GroupId, PieceId, Scene};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeKind {
    /// Two lone pieces; the pair takes the neighbor's translation.
    PiecePiece,
    /// The dragged group swallows a lone neighbor.
    GroupPiece,
    /// A lone dragged piece joins the neighbor's group.
    PieceGroup,
    /// Two groups; the larger survives, ties go to the dragged one.
    GroupGroup,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MergeRecord {
    pub kind: MergeKind,
    pub dir: usize,
    pub neighbor: PieceId,
    pub survivor: GroupId,
    pub absorbed: GroupId,
    pub moved: Vec<PieceId>,
    pub distance: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SnapOutcome {
    pub merges: Vec<MergeRecord>,
    pub solved: bool,
}

impl SnapOutcome {
    pub fn merged(&self) -> bool {
        !self.merges.is_empty()
    }

    /// Group holding the released piece after all merges.
    pub fn final_group(&self) -> Option<GroupId> {
        self.merges.last().map(|record| record.survivor)
    }
}

/// Distance between where `neighbor` sits relative to `piece` and where it
/// would sit in the assembled picture.
pub fn offset_error(scene: &Scene, piece: PieceId, neighbor: PieceId) -> Option<f32> {
    let here = scene.piece_position(piece)?;
    let there = scene.piece_position(neighbor)?;
    let coord = scene.coord_of(piece);
    let other = scene.coord_of(neighbor);
    let expected_x = (other.col as f32 - coord.col as f32) * scene.piece_size;
    let expected_y = (other.row as f32 - coord.row as f32) * scene.piece_size;
    let actual_x = there[0] - here[0];
    let actual_y = there[1] - here[1];
    let dx = actual_x - expected_x;
    let dy = actual_y - expected_y;
    Some((dx * dx + dy * dy).sqrt())
}

fn merge_kind(current_solo: bool, neighbor_solo: bool) -> MergeKind {
    match (current_solo, neighbor_solo) {
        (true, true) => MergeKind::PiecePiece,
        (false, true) => MergeKind::GroupPiece,
        (true, false) => MergeKind::PieceGroup,
        (false, false) => MergeKind::GroupGroup,
    }
}

/// Checks the released piece's own neighbors (left, right, up, down) and
/// merges every one within `threshold`. Neighbors of neighbors are not
/// revisited even if a merge brings them into range.
pub fn snap_released(scene: &mut Scene, piece: PieceId, threshold: f32) -> SnapOutcome {
    let mut outcome = SnapOutcome::default();
    if piece >= scene.total_pieces() {
        return outcome;
    }
    let coord = scene.coord_of(piece);
    for dir in SNAP_DIRS {
        let Some(neighbor) = coord
            .neighbor(dir, scene.grid_size)
            .and_then(|next| scene.piece_at(next))
        else {
            continue;
        };
        let (Some(current_group), Some(neighbor_group)) =
            (scene.group_of(piece), scene.group_of(neighbor))
        else {
            continue;
        };
        if current_group == neighbor_group {
            continue;
        }
        let Some(distance) = offset_error(scene, piece, neighbor) else {
            continue;
        };
        if distance > threshold {
            continue;
        }
        let (Some(current_len), Some(neighbor_len)) = (
            scene.group(current_group).map(|group| group.len()),
            scene.group(neighbor_group).map(|group| group.len()),
        ) else {
            continue;
        };
        let kind = merge_kind(current_len == 1, neighbor_len == 1);
        let (survivor, absorbed) = match kind {
            MergeKind::PiecePiece | MergeKind::PieceGroup => (neighbor_group, current_group),
            MergeKind::GroupPiece => (current_group, neighbor_group),
            MergeKind::GroupGroup if neighbor_len > current_len => (neighbor_group, current_group),
            MergeKind::GroupGroup => (current_group, neighbor_group),
        };
        let Some(moved) = scene.merge(survivor, absorbed) else {
            continue;
        };
        scene.bring_to_front(survivor);
        outcome.merges.push(MergeRecord {
            kind,
            dir,
            neighbor,
            survivor,
            absorbed,
            moved,
            distance,
        });
    }
    outcome.solved = scene.is_solved();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{DIR_LEFT, DIR_RIGHT};

    #[test]
    fn left_neighbor_is_checked_first() {
        // Piece 1 sits exactly between 0 and 2; both are in range.
        let mut scene = Scene::new(3, 160.0, &[[0.0, 0.0]; 9]);
        for id in 3..9 {
            scene.set_translation(id, [1000.0, 1000.0]);
        }
        let outcome = snap_released(&mut scene, 1, 30.0);
        assert_eq!(outcome.merges.len(), 2);
        assert_eq!(outcome.merges[0].dir, DIR_LEFT);
        assert_eq!(outcome.merges[0].kind, MergeKind::PiecePiece);
        assert_eq!(outcome.merges[1].dir, DIR_RIGHT);
        assert_eq!(outcome.merges[1].kind, MergeKind::GroupPiece);
        assert!(!outcome.solved);
    }

    #[test]
    fn unknown_piece_is_ignored() {
        let mut scene = Scene::new(3, 160.0, &[[0.0, 0.0]; 9]);
        assert_eq!(snap_released(&mut scene, 99, 30.0), SnapOutcome::default());
    }
}
