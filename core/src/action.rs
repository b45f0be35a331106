use crate::model::{GroupId, PieceId};
use crate::snap::MergeRecord;

#[derive(Clone, Debug)]
pub enum PuzzleAction {
    BeginDrag {
        piece_id: PieceId,
        x: f32,
        y: f32,
        pointer_id: Option<i32>,
    },
    DragMove {
        x: f32,
        y: f32,
    },
    DragEnd {
        pointer_id: Option<i32>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum PuzzleEvent {
    DragStarted { group: GroupId, members: Vec<PieceId> },
    GroupMoved { group: GroupId, translation: [f32; 2] },
    DragEnded { group: GroupId },
    Merged(MergeRecord),
    Solved,
}
