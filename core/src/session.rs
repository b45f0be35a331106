use crate::action::{PuzzleAction, PuzzleEvent};
use crate::config::PuzzleConfig;
use crate::drag::DragController;
use crate::model::Scene;
use crate::piece::{build_pieces, scene_from_blueprints, PieceBlueprint, ScatterArea};
use crate::snap::snap_released;

/// One puzzle from scatter to completion. Owns the scene and the single
/// active drag; every pointer event goes through `apply_action`.
#[derive(Clone, Debug)]
pub struct PuzzleSession {
    config: PuzzleConfig,
    scene: Scene,
    drag: DragController,
    solved_notified: bool,
}

impl PuzzleSession {
    pub fn new(config: PuzzleConfig, scene: Scene) -> Self {
        Self {
            config,
            scene,
            drag: DragController::new(),
            solved_notified: false,
        }
    }

    /// Scatters fresh pieces and returns the session with its blueprints.
    pub fn scatter(config: PuzzleConfig, seed: u32, area: &ScatterArea) -> (Self, Vec<PieceBlueprint>) {
        let blueprints = build_pieces(&config, seed, area);
        let scene = scene_from_blueprints(&config, &blueprints);
        (Self::new(config, scene), blueprints)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn is_solved(&self) -> bool {
        self.scene.is_solved()
    }

    pub fn apply_action(&mut self, action: PuzzleAction) -> Vec<PuzzleEvent> {
        match action {
            PuzzleAction::BeginDrag {
                piece_id,
                x,
                y,
                pointer_id,
            } => self.begin_drag(piece_id, x, y, pointer_id),
            PuzzleAction::DragMove { x, y } => self.drag_move(x, y),
            PuzzleAction::DragEnd { pointer_id } => self.drag_end(pointer_id),
        }
    }

    fn begin_drag(&mut self, piece_id: usize, x: f32, y: f32, pointer_id: Option<i32>) -> Vec<PuzzleEvent> {
        let Some(drag) = self.drag.begin(&mut self.scene, piece_id, x, y, pointer_id) else {
            return Vec::new();
        };
        let members = self
            .scene
            .group(drag.group)
            .map(|group| group.members.clone())
            .unwrap_or_default();
        vec![PuzzleEvent::DragStarted {
            group: drag.group,
            members,
        }]
    }

    fn drag_move(&mut self, x: f32, y: f32) -> Vec<PuzzleEvent> {
        match self.drag.drag_move(&mut self.scene, x, y) {
            Some((group, translation)) => vec![PuzzleEvent::GroupMoved { group, translation }],
            None => Vec::new(),
        }
    }

    fn drag_end(&mut self, pointer_id: Option<i32>) -> Vec<PuzzleEvent> {
        let Some(drag) = self.drag.end(pointer_id) else {
            return Vec::new();
        };
        let mut events = vec![PuzzleEvent::DragEnded { group: drag.group }];
        let outcome = snap_released(&mut self.scene, drag.primary, self.config.snap_threshold);
        events.extend(outcome.merges.into_iter().map(PuzzleEvent::Merged));
        if outcome.solved && !self.solved_notified {
            self.solved_notified = true;
            events.push(PuzzleEvent::Solved);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scatter_builds_one_group_per_piece() {
        let config = PuzzleConfig::default();
        let area = ScatterArea::for_viewport(1200.0, 900.0, config.piece_size);
        let (session, blueprints) = PuzzleSession::scatter(config, 11, &area);
        assert_eq!(blueprints.len(), 9);
        assert_eq!(session.scene().group_count(), 9);
        assert_eq!(session.scene().translation(4), Some(blueprints[4].translation));
        assert!(!session.drag().is_dragging());
    }

    #[test]
    fn release_while_idle_is_noop() {
        let config = PuzzleConfig::default();
        let area = ScatterArea::for_viewport(1200.0, 900.0, config.piece_size);
        let (mut session, _) = PuzzleSession::scatter(config, 1, &area);
        let before = session.scene().clone();
        assert!(session
            .apply_action(PuzzleAction::DragEnd { pointer_id: None })
            .is_empty());
        assert_eq!(session.scene(), &before);
    }
}
