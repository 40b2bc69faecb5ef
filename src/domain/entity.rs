/// Entities: Player, Platform, and the handle type that ties them to the scene.
/// Entities carry their own geometry; the scene mirrors it for drawing
/// and hit-testing.

use super::physics::{self, Rect};

/// Stable handle of a visual object in the scene.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct VisualId(pub u32);

/// Fill colors used by the game.
/// Platform colors are ordered widest → narrowest.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Paint {
    Black,
    Blue,
    Green,
    Yellow,
    Orange,
    Red,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub visual: VisualId,
    pub x: i32,
    pub y: i32,
    pub velocity: i32,
    pub width: i32,
    pub height: i32,
    pub foot_left: i32,
    pub foot_right: i32,
}

impl Player {
    #[cfg(test)]
    pub fn rect(&self) -> Rect {
        Rect::sized(self.x, self.y, self.width, self.height)
    }

    /// Landing probe at the current position.
    pub fn foot(&self) -> Rect {
        physics::foot_region(self.x, self.y, self.height, self.foot_left, self.foot_right)
    }
}

#[derive(Clone, Debug)]
pub struct Platform {
    pub visual: VisualId,
    pub rect: Rect,
    pub paint: Paint,
}

impl Platform {
    #[inline]
    pub fn top(&self) -> i32 { self.rect.y0 }

    #[inline]
    pub fn width(&self) -> i32 { self.rect.width() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foot_follows_player_position() {
        let mut p = Player {
            visual: VisualId(0),
            x: 725, y: 690, velocity: 23,
            width: 50, height: 60,
            foot_left: 27, foot_right: 41,
        };
        assert_eq!(p.foot(), Rect::new(752, 749, 766, 750));
        p.x = 0;
        p.y = 0;
        assert_eq!(p.foot(), Rect::new(27, 59, 41, 60));
        assert!(p.rect().overlaps(&p.foot()));
    }
}
