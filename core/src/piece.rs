use crate::config::PuzzleConfig;
use crate::grid::{grid_coords, GridCoord};
use crate::model::{PieceId, Scene};
use crate::path::{generate_piece_path, PiecePath};
use crate::random::{item_seed, rand_range, SCATTER_X_SALT, SCATTER_Y_SALT};

pub const SCATTER_MARGIN_X: f32 = 50.0;
pub const SCATTER_MARGIN_TOP: f32 = 150.0;
pub const SCATTER_MARGIN_BOTTOM: f32 = 50.0;

pub const OUTLINE_STROKE: &str = "#000";
pub const OUTLINE_STROKE_WIDTH: f32 = 1.0;
pub const OUTLINE_OPACITY: f32 = 0.2;
/// Transparent stroke around the hit shape so thin tabs are easy to grab.
pub const HIT_STROKE_WIDTH: f32 = 12.0;

/// Region in canvas space where a piece's top-left may land.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScatterArea {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl ScatterArea {
    pub fn for_viewport(width: f32, height: f32, piece_size: f32) -> Self {
        let min_x = SCATTER_MARGIN_X;
        let min_y = SCATTER_MARGIN_TOP;
        let max_x = (width - piece_size - SCATTER_MARGIN_X).max(min_x);
        let max_y = (height - piece_size - SCATTER_MARGIN_BOTTOM).max(min_y);
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// Full-board image placed at the board origin; each piece clips it.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageWindow {
    pub href: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Everything the renderer needs to materialise one piece.
#[derive(Clone, Debug, PartialEq)]
pub struct PieceBlueprint {
    pub id: PieceId,
    pub coord: GridCoord,
    pub outline: PiecePath,
    pub outline_d: String,
    pub clip_id: String,
    pub image: ImageWindow,
    pub translation: [f32; 2],
}

pub fn clip_id(coord: GridCoord) -> String {
    format!("clip-{}-{}", coord.row, coord.col)
}

pub fn landing_point(seed: u32, area: &ScatterArea) -> (f32, f32) {
    (
        rand_range(seed, SCATTER_X_SALT, area.min_x, area.max_x),
        rand_range(seed, SCATTER_Y_SALT, area.min_y, area.max_y),
    )
}

pub fn build_piece(
    config: &PuzzleConfig,
    coord: GridCoord,
    seed: u32,
    area: &ScatterArea,
) -> PieceBlueprint {
    let outline = generate_piece_path(config, coord);
    let outline_d = outline.to_svg_d();
    let board = config.board_size();
    let (land_x, land_y) = landing_point(seed, area);
    let (home_x, home_y) = coord.home_offset(config.piece_size);
    PieceBlueprint {
        id: coord.id(config.grid_size),
        coord,
        outline,
        outline_d,
        clip_id: clip_id(coord),
        image: ImageWindow {
            href: config.image_ref.clone(),
            x: 0.0,
            y: 0.0,
            width: board,
            height: board,
        },
        translation: [land_x - home_x, land_y - home_y],
    }
}

pub fn build_pieces(config: &PuzzleConfig, seed: u32, area: &ScatterArea) -> Vec<PieceBlueprint> {
    grid_coords(config.grid_size)
        .enumerate()
        .map(|(index, coord)| build_piece(config, coord, item_seed(seed, index), area))
        .collect()
}

pub fn scene_from_blueprints(config: &PuzzleConfig, blueprints: &[PieceBlueprint]) -> Scene {
    let mut translations = vec![[0.0, 0.0]; config.total_pieces()];
    for blueprint in blueprints {
        if let Some(slot) = translations.get_mut(blueprint.id) {
            *slot = blueprint.translation;
        }
    }
    Scene::new(config.grid_size, config.piece_size, &translations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landing_stays_inside_area() {
        let config = PuzzleConfig::default();
        let area = ScatterArea::for_viewport(1280.0, 800.0, config.piece_size);
        for blueprint in build_pieces(&config, 42, &area) {
            let (hx, hy) = blueprint.coord.home_offset(config.piece_size);
            let x = blueprint.translation[0] + hx;
            let y = blueprint.translation[1] + hy;
            assert!(x >= area.min_x - 1e-3 && x <= area.max_x + 1e-3, "{x}");
            assert!(y >= area.min_y - 1e-3 && y <= area.max_y + 1e-3, "{y}");
        }
    }

    #[test]
    fn small_viewport_collapses_to_margin() {
        let area = ScatterArea::for_viewport(100.0, 100.0, 160.0);
        assert_eq!(area.max_x, area.min_x);
        assert_eq!(area.max_y, area.min_y);
        assert_eq!(landing_point(9, &area), (50.0, 150.0));
        assert!(area.contains(50.0, 150.0));
        assert!(!area.contains(49.0, 150.0));
    }

    #[test]
    fn blueprint_clips_full_board_image() {
        let config = PuzzleConfig::default();
        let area = ScatterArea::for_viewport(1000.0, 1000.0, config.piece_size);
        let piece = build_piece(&config, GridCoord::new(1, 2), 3, &area);
        assert_eq!(piece.id, 5);
        assert_eq!(piece.clip_id, "clip-1-2");
        assert_eq!(piece.image.width, 480.0);
        assert_eq!(piece.image.href, "puzzle.jpg");
        assert_eq!(piece.outline_d, piece.outline.to_svg_d());
    }
}
