/// Score caption and the game-over screen.
///
/// Both are plain scene objects. The score caption is never edited in
/// place: each update deletes the old text object and creates a new one.

use crate::domain::rules;
use super::scene::Font;
use super::world::{WorldState, SCORE_ANCHOR};

/// Replace the live score caption with one showing `world.score`.
pub fn update_score(world: &mut WorldState) {
    world.scene.delete(world.score_board);
    world.score_board = world.scene.create_text(
        SCORE_ANCHOR.0,
        SCORE_ANCHOR.1,
        Font::SCORE,
        rules::score_caption(world.score),
    );
}

/// Clear everything and show the banner plus the final score, centered
/// by digit count.
pub fn show_game_over(world: &mut WorldState) {
    let cx = world.config.canvas.width / 2;
    let cy = world.config.canvas.height / 2;

    world.scene.clear();
    world.scene.create_text(cx - 250, cy - 100, Font::BANNER, "GAME OVER!");
    world.score_board = world.scene.create_text(
        cx - rules::game_over_caption_offset(world.score),
        cy + 50,
        Font::CAPTION,
        rules::score_caption(world.score),
    );
}
