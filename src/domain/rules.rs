/// Game rules as pure functions: platform sizing and coloring,
/// the climb check, and score captions.
///
/// ## Platform sizing
///
/// Below the difficulty cap (`base_width - base_height`) a platform is
/// `base_width - score` wide. The width range is cut into five color
/// bands of `cap / 4` pixels each, widest first:
///
///   blue → green → yellow → orange → red
///
/// From the cap on, every platform is a red square of side `base_height`.

use super::entity::Paint;

/// Width and color of a platform spawned at `score`.
pub fn platform_shape(score: u32, base_width: i32, base_height: i32) -> (i32, Paint) {
    let cap = (base_width - base_height).max(0) as u32;
    if score < cap {
        let width = base_width - score as i32;
        (width, paint_for_width(width, base_width, base_height))
    } else {
        (base_height, Paint::Red)
    }
}

/// Step function from width to color band.
pub fn paint_for_width(width: i32, base_width: i32, base_height: i32) -> Paint {
    let band = (base_width - base_height) / 4;
    if width > base_width - band {
        Paint::Blue
    } else if width > base_width - 2 * band {
        Paint::Green
    } else if width > base_width - 3 * band {
        Paint::Yellow
    } else if width > base_width - 4 * band {
        Paint::Orange
    } else {
        Paint::Red
    }
}

/// A landing at `y` climbs high enough to scroll the level.
#[inline]
pub fn clears_climb_threshold(y: i32, threshold: i32) -> bool {
    y < threshold
}

pub fn score_caption(score: u32) -> String {
    format!("Score: {}", score)
}

/// Horizontal offset (left of canvas center) of the final score caption,
/// chosen by digit count so the caption stays centered.
pub fn game_over_caption_offset(score: u32) -> i32 {
    if score < 10 {
        74
    } else if score < 100 {
        83
    } else if score < 1000 {
        92
    } else {
        101
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
