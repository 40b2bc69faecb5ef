/// Level scroll: the world slides down one platform spacing while Karel
/// holds his screen height.
///
/// `begin` spawns the new top platform and arms the frame counter.
/// Each `advance` moves every platform down by the scroll speed and pins
/// Karel at (pointer x, landing y). The last frame drops the bottom
/// platform, so the set is back to its resting size.

use super::event::GameEvent;
use super::world::{Phase, WorldState};

pub fn begin(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    events.push(GameEvent::ScrollStarted);

    let spawned = world.platforms.spawn_above(
        &mut world.scene, &world.config, world.score, &mut world.rng,
    );
    events.push(GameEvent::PlatformSpawned {
        x: spawned.rect.x0,
        y: spawned.rect.y0,
        width: spawned.width(),
        paint: spawned.paint,
    });

    world.phase = Phase::Scrolling { frames_left: world.config.platform.scroll_frames() };
}

/// One scroll frame. Returns true when the scroll has finished.
pub fn advance(world: &mut WorldState, pointer_x: i32, events: &mut Vec<GameEvent>) -> bool {
    let frames_left = match world.phase {
        Phase::Scrolling { frames_left } => frames_left,
        _ => return true,
    };

    world.player.x = pointer_x;
    world.scene.move_to(world.player.visual, world.player.x, world.player.y);
    world.platforms.shift_down(&mut world.scene, world.config.platform.scroll_speed);

    let frames_left = frames_left.saturating_sub(1);
    if frames_left > 0 {
        world.phase = Phase::Scrolling { frames_left };
        return false;
    }

    if world.platforms.remove_bottom(&mut world.scene).is_some() {
        events.push(GameEvent::PlatformRemoved);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::platforms::ACTIVE_PLATFORMS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world() -> WorldState {
        WorldState::with_rng(GameConfig::default(), StdRng::seed_from_u64(11))
    }

    #[test]
    fn begin_appends_one_platform_above_the_top() {
        let mut w = world();
        let top = w.platforms.top().unwrap().top();
        let mut events = vec![];
        begin(&mut w, &mut events);
        assert_eq!(w.platforms.len(), ACTIVE_PLATFORMS + 1);
        assert_eq!(w.platforms.top().unwrap().top(), top - 192);
        assert_eq!(w.phase, Phase::Scrolling { frames_left: 16 });
        assert_eq!(events[0], GameEvent::ScrollStarted);
        assert!(matches!(events[1], GameEvent::PlatformSpawned { y, .. } if y == top - 192));
    }

    #[test]
    fn full_scroll_shifts_by_one_spacing_and_drops_the_floor() {
        let mut w = world();
        w.player.y = 500;
        let before: Vec<i32> = w.platforms.iter().skip(1).map(|p| p.top()).collect();
        let mut events = vec![];
        begin(&mut w, &mut events);

        let mut frames = 0;
        loop {
            frames += 1;
            let done = advance(&mut w, 300, &mut events);
            if done { break; }
            // Karel is pinned while the world moves.
            assert_eq!(w.scene.position(w.player.visual), Some((300, 500)));
        }
        assert_eq!(frames, 16);
        assert_eq!(w.platforms.len(), ACTIVE_PLATFORMS);
        assert_eq!(events.last(), Some(&GameEvent::PlatformRemoved));

        // The floor is gone; former platforms each moved down 192 px.
        let after: Vec<i32> = w.platforms.iter().map(|p| p.top()).collect();
        for (b, a) in before.iter().zip(after.iter()) {
            assert_eq!(*a, b + 192);
        }
        assert_eq!(*after.last().unwrap(), -18);
        for p in w.platforms.iter() {
            assert_eq!(w.scene.position(p.visual), Some((p.rect.x0, p.rect.y0)));
        }
    }

    #[test]
    fn advance_outside_a_scroll_is_a_no_op() {
        let mut w = world();
        let mut events = vec![];
        assert!(advance(&mut w, 0, &mut events));
        assert!(events.is_empty());
        assert_eq!(w.platforms.len(), ACTIVE_PLATFORMS);
    }
}
