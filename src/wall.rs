//! Walls: oriented opaque segments that cast shadows on one side only
//!
//! A wall's *face axis* is the axis its occluding face points along, not the
//! orientation of its segment: a horizontal segment has a vertical face. The
//! *direction* picks which side of that axis the wall faces. A light only
//! produces a shadow from walls it sees from behind, so the lit face of a
//! solid block stays visible and the shadow starts at its far side.

use crate::display::PixelBuffer;
use crate::geometry::{Point, Rect};

/// Slope substituted for vertical rays (zero horizontal delta)
const VERTICAL_SLOPE: f32 = 999999.0;
/// Slope substituted for horizontal rays so `1 / slope` stays finite
const FLAT_SLOPE: f32 = 0.000001;

/// Axis the wall's face points along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FaceAxis {
    /// Face points left/right; the segment itself is vertical
    Horizontal,
    /// Face points up/down; the segment itself is horizontal
    Vertical,
}

impl FaceAxis {
    /// Coordinate index compared by the cast test (0 = x, 1 = y)
    #[inline]
    pub fn index(self) -> usize {
        match self {
            FaceAxis::Horizontal => 0,
            FaceAxis::Vertical => 1,
        }
    }
}

/// Which side of the face axis the wall faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Faces the negative end of the axis (-1)
    Inward,
    /// Faces the positive end of the axis (+1)
    Outward,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Direction::Inward => -1,
            Direction::Outward => 1,
        }
    }
}

/// Edge of the shadow bounds a cast ray lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Top = 0,
    Bottom = 1,
    Left = 2,
    Right = 3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    p1: Point,
    p2: Point,
    face_axis: FaceAxis,
    direction: Direction,
    pub color: (u8, u8, u8),
    rect: Rect,
}

impl Wall {
    pub fn new(p1: Point, p2: Point, face_axis: FaceAxis, direction: Direction) -> Self {
        Self {
            p1,
            p2,
            face_axis,
            direction,
            color: (255, 255, 255),
            rect: bounding_rect(p1, p2),
        }
    }

    pub fn with_color(mut self, color: (u8, u8, u8)) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn p1(&self) -> Point {
        self.p1
    }

    #[inline]
    pub fn p2(&self) -> Point {
        self.p2
    }

    #[inline]
    pub fn face_axis(&self) -> FaceAxis {
        self.face_axis
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Broad-phase bounding box, one pixel thicker than the segment on each axis
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Move the endpoints in place (dynamic wall groups)
    pub fn set_endpoints(&mut self, p1: Point, p2: Point) {
        self.p1 = p1;
        self.p2 = p2;
        self.rect = bounding_rect(p1, p2);
    }

    pub fn translate(&mut self, offset: Point) {
        self.set_endpoints(self.p1 + offset, self.p2 + offset);
    }

    /// Translated copy with the same facing and colour
    pub fn clone_move(&self, offset: Point) -> Wall {
        let mut moved = *self;
        moved.translate(offset);
        moved
    }

    /// True when `source` is strictly behind the wall's face
    #[inline]
    pub fn check_cast(&self, source: Point) -> bool {
        let axis = self.face_axis.index();
        (source.axis(axis) - self.p1.axis(axis)) * (self.direction.sign() as f32) < 0.0
    }

    /// Project the ray `source -> endpoint` onto the edge of `bounds`.
    ///
    /// Of the two edges the ray's quadrant can reach (one horizontal, one
    /// vertical) the nearer hit by Manhattan distance wins.
    pub fn determine_cast_endpoint(source: Point, endpoint: Point, bounds: &Rect) -> (Point, Side) {
        let difx = source.x - endpoint.x;
        let dify = source.y - endpoint.y;
        let mut slope = if difx == 0.0 {
            VERTICAL_SLOPE
        } else {
            dify / difx
        };
        if slope == 0.0 {
            slope = FLAT_SLOPE;
        }

        let (edge_x, x_side) = if difx < 0.0 {
            (bounds.right(), Side::Right)
        } else {
            (bounds.left(), Side::Left)
        };
        let (edge_y, y_side) = if dify < 0.0 {
            (bounds.bottom(), Side::Bottom)
        } else {
            (bounds.top(), Side::Top)
        };

        let x_hit = Point::new(edge_x, slope * (edge_x - source.x) + source.y);
        let y_hit = Point::new((edge_y - source.y) / slope + source.x, edge_y);

        if x_hit.manhattan(&source) < y_hit.manhattan(&source) {
            (x_hit, x_side)
        } else {
            (y_hit, y_side)
        }
    }

    /// Corners of `bounds` that must sit between the two cast points
    pub fn intermediate_points(&self, side1: Side, side2: Side, bounds: &Rect) -> Vec<Point> {
        let (a, b) = if side1 <= side2 {
            (side1, side2)
        } else {
            (side2, side1)
        };
        let inward = self.direction == Direction::Inward;

        match (a, b) {
            (Side::Top, Side::Right) => vec![bounds.top_right()],
            (Side::Bottom, Side::Right) => vec![bounds.bottom_right()],
            (Side::Bottom, Side::Left) => vec![bounds.bottom_left()],
            (Side::Top, Side::Left) => vec![bounds.top_left()],
            // Opposite edges: the facing tells which way the shadow wraps
            (Side::Top, Side::Bottom) if inward => vec![bounds.top_left(), bounds.bottom_left()],
            (Side::Top, Side::Bottom) => vec![bounds.top_right(), bounds.bottom_right()],
            (Side::Left, Side::Right) if inward => vec![bounds.top_left(), bounds.top_right()],
            (Side::Left, Side::Right) => vec![bounds.bottom_left(), bounds.bottom_right()],
            _ => Vec::new(),
        }
    }

    /// Shadow outline `[p1, cast1, corners.., cast2, p2]`, or None when the
    /// source is on the lit side
    pub fn shadow_polygon(&self, source: Point, bounds: &Rect) -> Option<Vec<Point>> {
        if !self.check_cast(source) {
            return None;
        }

        let (cast1, side1) = Self::determine_cast_endpoint(source, self.p1, bounds);
        let (cast2, side2) = Self::determine_cast_endpoint(source, self.p2, bounds);
        let corners = self.intermediate_points(side1, side2, bounds);

        let mut points = Vec::with_capacity(corners.len() + 4);
        points.push(self.p1);
        points.push(cast1);
        points.extend(corners);
        points.push(cast2);
        points.push(self.p2);
        Some(points)
    }

    /// Fill the shadow cast by `source` onto `target`. Vertices are shifted by
    /// `-offset`, the target's top-left in the same space as `source`.
    pub fn draw_shadow(
        &self,
        target: &mut PixelBuffer,
        source: Point,
        bounds: &Rect,
        color: (u8, u8, u8),
        offset: Point,
    ) {
        if let Some(points) = self.shadow_polygon(source, bounds) {
            let vertices: Vec<(f32, f32)> = points
                .iter()
                .map(|p| (p.x - offset.x, p.y - offset.y))
                .collect();
            target.fill_polygon_rgba(&vertices, color.0, color.1, color.2, 255);
        }
    }

    /// Debug overlay: draw the wall's segment in its colour
    pub fn render(&self, target: &mut PixelBuffer, offset: Point) {
        let a = self.p1 + offset;
        let b = self.p2 + offset;
        target.line(
            a.x as i32,
            a.y as i32,
            b.x as i32,
            b.y as i32,
            self.color.0,
            self.color.1,
            self.color.2,
        );
    }
}

fn bounding_rect(p1: Point, p2: Point) -> Rect {
    let r = Rect::from_corners(p1, p2);
    // zero-width segments still need area for collision tests
    Rect::new(r.x, r.y, r.w + 1.0, r.h + 1.0)
}

/// Four outward-facing walls around the rectangle at `pos` with `size`
pub fn box_walls(pos: Point, size: Point) -> Vec<Wall> {
    let top_right = Point::new(pos.x + size.x, pos.y);
    let bottom_left = Point::new(pos.x, pos.y + size.y);
    let bottom_right = pos + size;
    vec![
        Wall::new(pos, top_right, FaceAxis::Vertical, Direction::Inward),
        Wall::new(pos, bottom_left, FaceAxis::Horizontal, Direction::Inward),
        Wall::new(top_right, bottom_right, FaceAxis::Horizontal, Direction::Outward),
        Wall::new(bottom_left, bottom_right, FaceAxis::Vertical, Direction::Outward),
    ]
}
