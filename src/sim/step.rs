/// The step function: advances the world by one frame.
///
/// Processing by phase:
///   Jumping   → jump frame; on landing decide between another jump and a
///               scroll; on falling out switch to the game-over screen
///   Scrolling → scroll frame; when done bump the score and relaunch
///               Karel at the scroll speed
///   GameOver  → nothing (the final screen is frozen)

use crate::domain::rules;
use super::event::GameEvent;
use super::hud;
use super::jump::{self, JumpOutcome};
use super::scroll;
use super::world::{Phase, WorldState};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, pointer_x: i32) -> Vec<GameEvent> {
    let mut events: Vec<GameEvent> = Vec::new();
    if world.phase == Phase::GameOver {
        return events;
    }
    world.tick += 1;

    match world.phase {
        Phase::Jumping => match jump::advance(world, pointer_x) {
            Some(JumpOutcome::Landed(y)) => resolve_landing(world, y, &mut events),
            Some(JumpOutcome::FellOutOfBounds) => resolve_game_over(world, &mut events),
            None => {}
        },
        Phase::Scrolling { .. } => {
            if scroll::advance(world, pointer_x, &mut events) {
                resolve_scroll_done(world, &mut events);
            }
        }
        Phase::GameOver => {}
    }

    events
}

// ══════════════════════════════════════════════════════════════
// Phase transitions
// ══════════════════════════════════════════════════════════════

fn resolve_landing(world: &mut WorldState, y: i32, events: &mut Vec<GameEvent>) {
    events.push(GameEvent::Landed { y });
    world.player.velocity = world.config.player.jump_speed;

    if rules::clears_climb_threshold(y, world.config.climb_threshold()) {
        scroll::begin(world, events);
    }
}

fn resolve_scroll_done(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    world.score += 1;
    hud::update_score(world);
    events.push(GameEvent::ScoreChanged { score: world.score });

    // Karel still has some climbing to do after the world slid under him.
    world.player.velocity = world.config.platform.scroll_speed;
    world.phase = Phase::Jumping;
}

fn resolve_game_over(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    events.push(GameEvent::FellOutOfBounds { score: world.score });
    hud::show_game_over(world);
    world.phase = Phase::GameOver;
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::entity::Paint;
    use crate::domain::physics::Rect;
    use crate::sim::platforms::ACTIVE_PLATFORMS;
    use crate::sim::scene::Visual;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world_with(cfg: GameConfig) -> WorldState {
        WorldState::with_rng(cfg, StdRng::seed_from_u64(5))
    }

    fn world() -> WorldState {
        world_with(GameConfig::default())
    }

    /// Step until an event matching `pred` shows up (bounded).
    fn step_until(w: &mut WorldState, x: i32, pred: impl Fn(&GameEvent) -> bool) -> Vec<GameEvent> {
        let mut all = vec![];
        for _ in 0..2000 {
            let evs = step(w, x);
            let hit = evs.iter().any(&pred);
            all.extend(evs);
            if hit {
                return all;
            }
        }
        panic!("event never happened; got {all:?}");
    }

    /// Pointer x that puts the foot over the middle of the given platform.
    fn x_over(rect: &Rect) -> i32 {
        (rect.x0 + rect.x1) / 2 - 34
    }

    fn x_clear_of_platforms(w: &WorldState) -> i32 {
        (0..1450)
            .step_by(10)
            .find(|&x| {
                let foot = Rect::new(x + 27, -10_000, x + 41, 10_000);
                w.platforms.iter().skip(1).all(|p| !p.rect.overlaps(&foot))
            })
            .unwrap()
    }

    fn score_text(w: &WorldState) -> String {
        match w.scene.get(w.score_board) {
            Some(Visual::Text { content, .. }) => content.clone(),
            other => panic!("score board is {other:?}"),
        }
    }

    #[test]
    fn landing_on_the_floor_does_not_scroll() {
        let mut w = world();
        let x = x_clear_of_platforms(&w);
        let evs = step_until(&mut w, x, |e| matches!(e, GameEvent::Landed { .. }));
        assert!(evs.contains(&GameEvent::Landed { y: 690 }));
        assert_eq!(w.phase, Phase::Jumping);
        assert_eq!(w.score, 0);
        assert_eq!(w.player.velocity, 23);
        assert_eq!(w.platforms.len(), ACTIVE_PLATFORMS);
        assert_eq!(score_text(&w), "Score: 0");
    }

    #[test]
    fn climbing_onto_the_first_platform_scrolls_once() {
        let mut w = world();
        let first = w.platforms.iter().nth(1).unwrap().rect;
        let old_bottom = w.platforms.bottom().unwrap().visual;
        let x = x_over(&first);

        let evs = step_until(&mut w, x, |e| matches!(e, GameEvent::Landed { .. }));
        let y = evs.iter()
            .find_map(|e| match e {
                GameEvent::Landed { y } => Some(*y),
                _ => None,
            })
            .unwrap();
        assert!(evs.contains(&GameEvent::ScrollStarted));
        assert!(y < 550);
        assert!(matches!(w.phase, Phase::Scrolling { frames_left: 16 }));
        assert_eq!(w.platforms.len(), ACTIVE_PLATFORMS + 1);

        let evs = step_until(&mut w, x, |e| matches!(e, GameEvent::ScoreChanged { .. }));
        let spawned = evs.iter().filter(|e| matches!(e, GameEvent::PlatformSpawned { .. })).count();
        let removed = evs.iter().filter(|e| matches!(e, GameEvent::PlatformRemoved)).count();
        assert_eq!(spawned, 0); // spawned on the landing frame, already counted above
        assert_eq!(removed, 1);
        assert_eq!(w.score, 1);
        assert_eq!(w.phase, Phase::Jumping);
        assert_eq!(w.player.velocity, 12);
        assert_eq!(w.player.y, y);
        assert_eq!(w.platforms.len(), ACTIVE_PLATFORMS);
        assert!(w.scene.get(old_bottom).is_none());
        assert_eq!(score_text(&w), "Score: 1");
        // Landed-on platform now sits where the floor used to be.
        assert_eq!(w.platforms.bottom().unwrap().top(), 750);
    }

    #[test]
    fn score_caption_updates_once_per_scroll() {
        let mut w = world();
        let first = w.platforms.iter().nth(1).unwrap().rect;
        let x = x_over(&first);
        let mut changes = 0;
        let mut boards = vec![w.score_board];
        for _ in 0..200 {
            for e in step(&mut w, x) {
                if let GameEvent::ScoreChanged { score } = e {
                    changes += 1;
                    assert_eq!(score, w.score);
                    boards.push(w.score_board);
                }
            }
            if w.score == 1 {
                break;
            }
        }
        assert_eq!(changes, 1);
        assert_eq!(boards.len(), 2);
        assert_ne!(boards[0], boards[1]);
    }

    #[test]
    fn falling_out_shows_final_score_and_freezes() {
        let mut w = world();
        w.score = 7;
        let evs = step_until(&mut w, 2000, |e| matches!(e, GameEvent::FellOutOfBounds { .. }));
        assert!(evs.contains(&GameEvent::FellOutOfBounds { score: 7 }));
        assert!(w.is_over());
        assert_eq!(score_text(&w), "Score: 7");
        assert_eq!(w.scene.len(), 2);

        let tick = w.tick;
        assert!(step(&mut w, 0).is_empty());
        assert_eq!(w.tick, tick);
        assert_eq!(w.score, 7);
    }

    #[test]
    fn no_game_over_while_inside_the_canvas() {
        let mut w = world();
        // Over the floor the whole time: the run never ends.
        let x = x_clear_of_platforms(&w);
        for _ in 0..500 {
            let evs = step(&mut w, x);
            assert!(!evs.iter().any(|e| matches!(e, GameEvent::FellOutOfBounds { .. })));
            assert!(w.player.y <= 800);
        }
    }

    #[test]
    fn platforms_become_red_squares_at_the_cap() {
        let mut w = world();
        w.score = w.config.platform.difficulty_cap();
        let mut shapes = vec![];
        for _ in 0..3 {
            let mut evs = vec![];
            scroll::begin(&mut w, &mut evs);
            while !scroll::advance(&mut w, 0, &mut evs) {}
            resolve_scroll_done(&mut w, &mut evs);
            let top = w.platforms.top().unwrap();
            shapes.push((top.rect.width(), top.rect.height(), top.paint));
            assert_eq!(w.platforms.len(), ACTIVE_PLATFORMS);
        }
        assert!(shapes.iter().all(|s| *s == (50, 50, Paint::Red)));
        assert_eq!(w.score, 153);
    }

    #[test]
    fn platform_set_size_is_invariant_across_many_scrolls() {
        let mut w = world();
        for n in 0..20 {
            let mut evs = vec![];
            scroll::begin(&mut w, &mut evs);
            while !scroll::advance(&mut w, 0, &mut evs) {}
            resolve_scroll_done(&mut w, &mut evs);
            assert_eq!(w.platforms.len(), ACTIVE_PLATFORMS);
            assert_eq!(w.score, n + 1);
        }
        let widths: Vec<i32> = w.platforms.iter().map(|p| p.width()).collect();
        assert!(widths.windows(2).all(|p| p[1] <= p[0]));
    }
}
