/// Jump physics and the axis-aligned overlap test.
///
/// ## Coordinates
///
/// Pixel canvas, origin top-left, y grows downward. A positive velocity
/// means "moving up": each frame the velocity loses 1 (gravity) and is
/// then subtracted from y.
///
/// ## Overlap semantics
///
/// Boxes are closed intervals on both axes, so rectangles that merely touch
/// along an edge overlap. The landing probe is only 1 px tall and relies on
/// this to register a foot resting exactly on a platform's top edge.

/// Constant downward acceleration, px/frame².
pub const GRAVITY: i32 = 1;

/// Landing is only honored while velocity is strictly below this.
pub const LANDING_VELOCITY: i32 = -1;

/// Axis-aligned box given by two corners (inclusive).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Rect {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Rect { x0, y0, x1, y1 }
    }

    /// Box from a top-left corner and a size.
    pub fn sized(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x0: x, y0: y, x1: x + w, y1: y + h }
    }

    #[inline]
    pub fn width(&self) -> i32 { self.x1 - self.x0 }

    #[inline]
    pub fn height(&self) -> i32 { self.y1 - self.y0 }

    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x0 <= other.x1 && other.x0 <= self.x1
            && self.y0 <= other.y1 && other.y0 <= self.y1
    }

    /// Same size, top-left moved to (x, y).
    pub fn moved_to(&self, x: i32, y: i32) -> Rect {
        Rect::sized(x, y, self.width(), self.height())
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x0 + dx, self.y0 + dy, self.x1 + dx, self.y1 + dy)
    }
}

/// One frame of vertical integration: returns `(new_y, new_velocity)`.
#[inline]
pub fn integrate(y: i32, velocity: i32) -> (i32, i32) {
    let v = velocity - GRAVITY;
    (y - v, v)
}

/// Is the actor descending fast enough for a touch to count as a landing?
#[inline]
pub fn can_land(velocity: i32) -> bool {
    velocity < LANDING_VELOCITY
}

/// The landing probe: the bottom pixel row under the sprite's foot columns.
pub fn foot_region(x: i32, y: i32, height: i32, foot_left: i32, foot_right: i32) -> Rect {
    Rect::new(x + foot_left, y + height - 1, x + foot_right, y + height)
}
