/// Player controller: one frame of a jump.
///
/// Per frame:
///   1. x follows the pointer (no clamping)
///   2. velocity -= 1, y -= velocity
///   3. sprite moved to (x, y)
///   4. landing check, only while velocity < -1
///   5. out-of-bounds check (y past the canvas bottom)
///
/// A jump in progress returns `None`; the frame that ends it returns the
/// outcome. What happens next (scrolling, game over) is decided by `step`.

use crate::domain::physics;
use super::world::WorldState;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum JumpOutcome {
    /// Foot touched something while descending; carries the landing y.
    Landed(i32),
    /// Dropped past the bottom of the play area.
    FellOutOfBounds,
}

pub fn advance(world: &mut WorldState, pointer_x: i32) -> Option<JumpOutcome> {
    let player = &mut world.player;
    player.x = pointer_x;
    let (y, v) = physics::integrate(player.y, player.velocity);
    player.y = y;
    player.velocity = v;
    world.scene.move_to(player.visual, player.x, player.y);

    if physics::can_land(player.velocity) && on_surface(world) {
        return Some(JumpOutcome::Landed(world.player.y));
    }
    if world.player.y > world.config.canvas.height {
        return Some(JumpOutcome::FellOutOfBounds);
    }
    None
}

/// Does the foot probe touch any visual object other than Karel itself?
pub fn on_surface(world: &WorldState) -> bool {
    let foot = world.player.foot();
    world.scene.find_overlapping(&foot)
        .into_iter()
        .any(|id| id != world.player.visual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::entity::Paint;
    use crate::domain::physics::Rect;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world() -> WorldState {
        WorldState::with_rng(GameConfig::default(), StdRng::seed_from_u64(3))
    }

    /// Run frames until the jump resolves (bounded).
    fn run(w: &mut WorldState, x: i32) -> (JumpOutcome, u32) {
        for frame in 1..=500 {
            if let Some(out) = advance(w, x) {
                return (out, frame);
            }
        }
        panic!("jump never resolved");
    }

    /// An x where no spawned platform lies under the foot.
    fn clear_column(w: &WorldState) -> i32 {
        (0..1450)
            .step_by(10)
            .find(|&x| {
                let foot = Rect::new(x + 27, -10_000, x + 41, 10_000);
                w.platforms.iter().skip(1).all(|p| !p.rect.overlaps(&foot))
            })
            .expect("some column is free of platforms")
    }

    #[test]
    fn first_jump_from_floor_lands_back_on_floor() {
        let mut w = world();
        let x = clear_column(&w);
        let (out, frames) = run(&mut w, x);
        assert_eq!(out, JumpOutcome::Landed(690));
        assert_eq!(frames, 45);
        assert_eq!(w.scene.position(w.player.visual), Some((x, 690)));
    }

    #[test]
    fn ascending_through_a_platform_does_not_land() {
        let mut w = world();
        let x = clear_column(&w);
        // A platform right above the launch position, inside the ascent.
        let r = Rect::sized(x, 600, 200, 50);
        w.scene.create_rectangle(r, Paint::Blue);
        let mut overlapped_while_rising = false;
        for _ in 0..22 {
            assert_eq!(advance(&mut w, x), None);
            if w.player.foot().overlaps(&r) {
                overlapped_while_rising = true;
            }
        }
        assert!(overlapped_while_rising);
        assert!(w.player.velocity > 0);
    }

    #[test]
    fn descending_onto_a_platform_lands_on_it() {
        let mut w = world();
        let x = clear_column(&w);
        let r = Rect::sized(x, 600, 200, 50);
        w.scene.create_rectangle(r, Paint::Blue);
        let (out, _) = run(&mut w, x);
        match out {
            JumpOutcome::Landed(y) => {
                assert!(y + 60 >= 600 && y + 59 <= 650, "landed at {y}");
            }
            other => panic!("expected a landing, got {other:?}"),
        }
        assert!(w.player.velocity < -1);
    }

    #[test]
    fn falling_off_screen_ends_the_jump() {
        let mut w = world();
        // Past the right edge of the canvas nothing is under the foot.
        let (out, _) = run(&mut w, 2000);
        assert_eq!(out, JumpOutcome::FellOutOfBounds);
        assert!(w.player.y > 800);
    }

    #[test]
    fn touch_at_minus_one_is_ignored_and_minus_two_lands() {
        let mut w = world();
        let x = clear_column(&w);
        // After integration: velocity -1, foot resting on the floor edge.
        w.player.velocity = 0;
        w.player.y = 689;
        assert_eq!(advance(&mut w, x), None);
        assert_eq!(w.player.y, 690);
        assert!(on_surface(&w));

        // Same spot reached with velocity -2: a landing.
        let mut w = world();
        w.player.velocity = -1;
        w.player.y = 688;
        assert_eq!(advance(&mut w, x), Some(JumpOutcome::Landed(690)));
        assert_eq!(w.player.velocity, -2);
    }
}
