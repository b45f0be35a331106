use crate::model::{GroupId, PieceId, Scene};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveDrag {
    pub group: GroupId,
    /// Piece the pointer went down on; the snap pass starts from it.
    pub primary: PieceId,
    /// Pointer position minus group translation at pointer-down.
    pub offset: [f32; 2],
    /// Touch identifier, `None` for mouse input.
    pub pointer_id: Option<i32>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(ActiveDrag),
}

#[derive(Clone, Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn active(&self) -> Option<&ActiveDrag> {
        match &self.state {
            DragState::Dragging(drag) => Some(drag),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Starts dragging the group holding `piece` and raises it. Ignored while
    /// another drag is live or when the piece is unknown.
    pub fn begin(
        &mut self,
        scene: &mut Scene,
        piece: PieceId,
        x: f32,
        y: f32,
        pointer_id: Option<i32>,
    ) -> Option<ActiveDrag> {
        if self.is_dragging() {
            return None;
        }
        let group = scene.group_of(piece)?;
        let translation = scene.translation(group)?;
        scene.bring_to_front(group);
        let drag = ActiveDrag {
            group,
            primary: piece,
            offset: [x - translation[0], y - translation[1]],
            pointer_id,
        };
        self.state = DragState::Dragging(drag);
        Some(drag)
    }

    /// Moves the dragged group so the grab point follows the pointer.
    pub fn drag_move(&mut self, scene: &mut Scene, x: f32, y: f32) -> Option<(GroupId, [f32; 2])> {
        let drag = self.active()?;
        let group = drag.group;
        let translation = [x - drag.offset[0], y - drag.offset[1]];
        if !scene.set_translation(group, translation) {
            return None;
        }
        Some((group, translation))
    }

    /// Finishes the drag. A release from a different touch, or a mouse
    /// release during a touch drag, leaves the drag running.
    pub fn end(&mut self, pointer_id: Option<i32>) -> Option<ActiveDrag> {
        let DragState::Dragging(drag) = self.state else {
            return None;
        };
        if drag.pointer_id.is_some() && pointer_id.is_none() {
            return None;
        }
        if pointer_id.is_some() && drag.pointer_id != pointer_id {
            return None;
        }
        self.state = DragState::Idle;
        Some(drag)
    }
}
