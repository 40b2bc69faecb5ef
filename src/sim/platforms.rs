/// Platform set: the platforms currently on screen, bottom to top.
///
/// The front is the oldest (lowest) platform, the back the newest
/// (highest). Every mutation is mirrored into the scene so drawing and
/// hit-testing always see the same geometry as the simulation.

use std::collections::VecDeque;

use rand::Rng;

use crate::config::GameConfig;
use crate::domain::entity::{Paint, Platform};
use crate::domain::physics::Rect;
use crate::domain::rules;
use super::scene::Scene;

/// Platforms on screen between scroll events.
pub const ACTIVE_PLATFORMS: usize = 5;

pub struct PlatformSet {
    platforms: VecDeque<Platform>,
}

impl PlatformSet {
    /// Full-width floor plus enough spawned platforms to fill the set.
    pub fn seed(scene: &mut Scene, cfg: &GameConfig, rng: &mut impl Rng) -> Self {
        let canvas = &cfg.canvas;
        let floor_rect = Rect::new(
            cfg.platform.floor_inset,
            canvas.height - cfg.platform.height,
            canvas.width,
            canvas.height,
        );
        let floor = Platform {
            visual: scene.create_rectangle(floor_rect, Paint::Black),
            rect: floor_rect,
            paint: Paint::Black,
        };

        let mut set = PlatformSet { platforms: VecDeque::with_capacity(ACTIVE_PLATFORMS + 1) };
        set.platforms.push_back(floor);
        while set.platforms.len() < ACTIVE_PLATFORMS {
            set.spawn_above(scene, cfg, 0, rng);
        }
        set
    }

    /// Spawn one platform `spacing` above the current top, sized for
    /// `score`, at a random x that keeps a base-width platform on screen.
    pub fn spawn_above(&mut self, scene: &mut Scene, cfg: &GameConfig, score: u32, rng: &mut impl Rng) -> &Platform {
        let pc = &cfg.platform;
        let max_x = (cfg.canvas.width - pc.width).max(0);
        let x = rng.gen_range(0..=max_x);
        let y = self.top().map_or(cfg.canvas.height - pc.height, |p| p.top()) - pc.spacing;

        let (width, paint) = rules::platform_shape(score, pc.width, pc.height);
        let rect = Rect::sized(x, y, width, pc.height);
        let platform = Platform {
            visual: scene.create_rectangle(rect, paint),
            rect,
            paint,
        };
        self.platforms.push_back(platform);
        // Just pushed, so back() is Some.
        &self.platforms[self.platforms.len() - 1]
    }

    /// Shift every platform down by `dy` (x unchanged).
    pub fn shift_down(&mut self, scene: &mut Scene, dy: i32) {
        for p in self.platforms.iter_mut() {
            p.rect = p.rect.offset(0, dy);
            scene.move_by(p.visual, 0, dy);
        }
    }

    /// Delete the oldest platform from the scene and the set.
    pub fn remove_bottom(&mut self, scene: &mut Scene) -> Option<Platform> {
        let p = self.platforms.pop_front()?;
        scene.delete(p.visual);
        Some(p)
    }

    pub fn top(&self) -> Option<&Platform> {
        self.platforms.back()
    }

    #[cfg(test)]
    pub fn bottom(&self) -> Option<&Platform> {
        self.platforms.front()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter()
    }
}
