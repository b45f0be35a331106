pub const DIR_UP: usize = 0;
pub const DIR_RIGHT: usize = 1;
pub const DIR_DOWN: usize = 2;
pub const DIR_LEFT: usize = 3;

/// Clockwise outline order used by the path generator.
pub const OUTLINE_DIRS: [usize; 4] = [DIR_UP, DIR_RIGHT, DIR_DOWN, DIR_LEFT];
/// Order in which a released piece probes its neighbors.
pub const SNAP_DIRS: [usize; 4] = [DIR_LEFT, DIR_RIGHT, DIR_UP, DIR_DOWN];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridCoord {
    pub row: usize,
    pub col: usize,
}

impl GridCoord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn from_id(id: usize, grid_size: usize) -> Self {
        Self {
            row: id / grid_size,
            col: id % grid_size,
        }
    }

    pub fn id(self, grid_size: usize) -> usize {
        self.row * grid_size + self.col
    }

    pub fn neighbor(self, dir: usize, grid_size: usize) -> Option<GridCoord> {
        neighbor_id(self.id(grid_size), grid_size, grid_size, dir)
            .map(|id| GridCoord::from_id(id, grid_size))
    }

    /// Top-left corner of the piece's slot in the assembled picture.
    pub fn home_offset(self, piece_size: f32) -> (f32, f32) {
        (self.col as f32 * piece_size, self.row as f32 * piece_size)
    }

    pub fn is_boundary(self, dir: usize, grid_size: usize) -> bool {
        self.neighbor(dir, grid_size).is_none()
    }
}

pub fn neighbor_id(id: usize, cols: usize, rows: usize, dir: usize) -> Option<usize> {
    let col = id % cols;
    let row = id / cols;
    match dir {
        DIR_UP if row > 0 => Some(id - cols),
        DIR_RIGHT if col + 1 < cols => Some(id + 1),
        DIR_DOWN if row + 1 < rows => Some(id + cols),
        DIR_LEFT if col > 0 => Some(id - 1),
        _ => None,
    }
}

pub fn opposite_dir(dir: usize) -> usize {
    match dir {
        DIR_UP => DIR_DOWN,
        DIR_RIGHT => DIR_LEFT,
        DIR_DOWN => DIR_UP,
        DIR_LEFT => DIR_RIGHT,
        _ => DIR_UP,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    Tab,
    Blank,
    Flat,
}

impl EdgeKind {
    pub fn complement(self) -> EdgeKind {
        match self {
            EdgeKind::Tab => EdgeKind::Blank,
            EdgeKind::Blank => EdgeKind::Tab,
            EdgeKind::Flat => EdgeKind::Flat,
        }
    }
}

/// Interior edges follow a checkerboard: pieces on odd cells push tabs out,
/// pieces on even cells take blanks. Neighbors always differ in parity.
pub fn edge_kind(coord: GridCoord, dir: usize, grid_size: usize) -> EdgeKind {
    if coord.is_boundary(dir, grid_size) {
        return EdgeKind::Flat;
    }
    if (coord.row + coord.col) % 2 == 1 {
        EdgeKind::Tab
    } else {
        EdgeKind::Blank
    }
}

pub fn grid_coords(grid_size: usize) -> impl Iterator<Item = GridCoord> {
    (0..grid_size * grid_size).map(move |id| GridCoord::from_id(id, grid_size))
}
