use std::fmt::Write;

use crate::config::{PuzzleConfig, BULB_WIDTH_RATIO, NECK_WIDTH_RATIO};
use crate::grid::{edge_kind, EdgeKind, GridCoord, DIR_DOWN, DIR_LEFT, DIR_RIGHT, DIR_UP, OUTLINE_DIRS};

/// Control points sit at these fractions of the protrusion depth.
const NECK_DEPTH_FRAC: f32 = 0.2;
const BULB_DEPTH_FRAC: f32 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { c1: Point, c2: Point, end: Point },
    Close,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PiecePath {
    pub commands: Vec<PathCommand>,
}

impl PiecePath {
    pub fn to_svg_d(&self) -> String {
        let mut path = String::new();
        for command in &self.commands {
            let sep = if path.is_empty() { "" } else { " " };
            match *command {
                PathCommand::MoveTo(p) => {
                    let _ = write!(path, "{sep}M {} {}", fmt_f32(p.x), fmt_f32(p.y));
                }
                PathCommand::LineTo(p) => {
                    let _ = write!(path, "{sep}L {} {}", fmt_f32(p.x), fmt_f32(p.y));
                }
                PathCommand::CubicTo { c1, c2, end } => {
                    let _ = write!(
                        path,
                        "{sep}C {} {}, {} {}, {} {}",
                        fmt_f32(c1.x),
                        fmt_f32(c1.y),
                        fmt_f32(c2.x),
                        fmt_f32(c2.y),
                        fmt_f32(end.x),
                        fmt_f32(end.y)
                    );
                }
                PathCommand::Close => {
                    let _ = write!(path, "{sep}Z");
                }
            }
        }
        path
    }

    /// Every anchor and control point in drawing order.
    pub fn points(&self) -> Vec<Point> {
        command_points(&self.commands)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.commands.first(), Some(PathCommand::MoveTo(_)))
            && matches!(self.commands.last(), Some(PathCommand::Close))
    }
}

pub fn fmt_f32(value: f32) -> String {
    format!("{:.3}", value)
}

fn command_points(commands: &[PathCommand]) -> Vec<Point> {
    let mut points = Vec::with_capacity(commands.len() * 3);
    for command in commands {
        match *command {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => points.push(p),
            PathCommand::CubicTo { c1, c2, end } => {
                points.push(c1);
                points.push(c2);
                points.push(end);
            }
            PathCommand::Close => {}
        }
    }
    points
}

/// Start and end of one side of a piece, walking clockwise.
pub fn edge_endpoints(config: &PuzzleConfig, coord: GridCoord, dir: usize) -> (Point, Point) {
    let size = config.piece_size;
    let (x0, y0) = coord.home_offset(size);
    let (x1, y1) = (x0 + size, y0 + size);
    match dir {
        DIR_UP => (Point::new(x0, y0), Point::new(x1, y0)),
        DIR_RIGHT => (Point::new(x1, y0), Point::new(x1, y1)),
        DIR_DOWN => (Point::new(x1, y1), Point::new(x0, y1)),
        DIR_LEFT => (Point::new(x0, y1), Point::new(x0, y0)),
        _ => (Point::new(x0, y0), Point::new(x0, y0)),
    }
}

/// Drawing commands for one side, excluding the initial move to its start.
pub fn edge_commands(config: &PuzzleConfig, coord: GridCoord, dir: usize) -> Vec<PathCommand> {
    let (start, end) = edge_endpoints(config, coord, dir);
    let depth = match edge_kind(coord, dir, config.grid_size) {
        EdgeKind::Flat => return vec![PathCommand::LineTo(end)],
        EdgeKind::Tab => config.tab_size,
        EdgeKind::Blank => -config.tab_size,
    };

    let size = config.piece_size;
    let ux = (end.x - start.x) / size;
    let uy = (end.y - start.y) / size;
    // Outward normal of a clockwise edge with y pointing down.
    let (nx, ny) = (uy, -ux);
    let at = |along: f32, out: f32| {
        Point::new(start.x + ux * along + nx * out, start.y + uy * along + ny * out)
    };

    let mid = size * 0.5;
    let neck = config.tab_size * NECK_WIDTH_RATIO;
    let bulb = config.tab_size * BULB_WIDTH_RATIO;
    vec![
        PathCommand::LineTo(at(mid - neck, 0.0)),
        PathCommand::CubicTo {
            c1: at(mid - neck, depth * NECK_DEPTH_FRAC),
            c2: at(mid - bulb, depth * BULB_DEPTH_FRAC),
            end: at(mid, depth),
        },
        PathCommand::CubicTo {
            c1: at(mid + bulb, depth * BULB_DEPTH_FRAC),
            c2: at(mid + neck, depth * NECK_DEPTH_FRAC),
            end: at(mid + neck, 0.0),
        },
        PathCommand::LineTo(end),
    ]
}

/// Points along one side from its start corner to its end corner.
pub fn edge_points(config: &PuzzleConfig, coord: GridCoord, dir: usize) -> Vec<Point> {
    let (start, _) = edge_endpoints(config, coord, dir);
    let mut points = vec![start];
    points.extend(command_points(&edge_commands(config, coord, dir)));
    points
}

pub fn generate_piece_path(config: &PuzzleConfig, coord: GridCoord) -> PiecePath {
    let (start, _) = edge_endpoints(config, coord, DIR_UP);
    let mut commands = Vec::with_capacity(18);
    commands.push(PathCommand::MoveTo(start));
    for dir in OUTLINE_DIRS {
        commands.extend(edge_commands(config, coord, dir));
    }
    commands.push(PathCommand::Close);
    PiecePath { commands }
}
