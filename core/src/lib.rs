pub mod action;
pub mod config;
pub mod drag;
pub mod flow;
pub mod grid;
pub mod model;
pub mod path;
pub mod piece;
pub mod random;
pub mod session;
pub mod snap;

pub use action::{PuzzleAction, PuzzleEvent};
pub use config::{ConfigError, PageConfig, PuzzleConfig};
pub use drag::{ActiveDrag, DragController, DragState};
pub use flow::{evade_position, Envelope, PinCheck, PinKey, PinPad, Plea, PleaStep, Screen, ScreenFlow};
pub use grid::{edge_kind, EdgeKind, GridCoord};
pub use model::{GroupId, GroupState, PieceId, Scene};
pub use path::{generate_piece_path, PathCommand, PiecePath, Point};
pub use piece::{build_piece, build_pieces, PieceBlueprint, ScatterArea};
pub use session::PuzzleSession;
pub use snap::{snap_released, MergeKind, MergeRecord, SnapOutcome};
