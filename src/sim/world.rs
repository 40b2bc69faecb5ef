/// WorldState: the complete snapshot of a running game.
///
/// The world owns the scene (what is drawn), the player, the platform set
/// and the score. Phase functions in `jump`, `scroll` and `step` take the
/// world explicitly; nothing lives in globals.
///
/// ## Phases
///
///   Jumping ──landed high──▶ Scrolling ──frames done──▶ Jumping
///      │
///      └──fell out──▶ GameOver (terminal; the world no longer changes)

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GameConfig;
use crate::domain::entity::{Player, VisualId};
use crate::domain::rules;
use super::platforms::PlatformSet;
use super::scene::{Font, Scene};

/// Corner the live score caption is anchored to.
pub const SCORE_ANCHOR: (i32, i32) = (10, 10);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Jumping,
    Scrolling { frames_left: u32 },
    GameOver,
}

pub struct WorldState {
    pub config: GameConfig,
    pub scene: Scene,
    pub player: Player,
    pub platforms: PlatformSet,
    pub score: u32,
    pub score_board: VisualId,
    pub phase: Phase,
    pub tick: u64,
    pub rng: StdRng,
}

// ── Construction ──

impl WorldState {
    pub fn new(config: GameConfig) -> Self {
        WorldState::with_rng(config, StdRng::from_entropy())
    }

    /// Build the opening scene: floor, four platforms, Karel standing on
    /// the floor at the horizontal center, and the score caption.
    pub fn with_rng(config: GameConfig, mut rng: StdRng) -> Self {
        let mut scene = Scene::new();
        let platforms = PlatformSet::seed(&mut scene, &config, &mut rng);

        let pc = &config.player;
        let x = config.canvas.width / 2 - pc.width / 2;
        let y = config.canvas.height - config.platform.height - pc.height;
        let player = Player {
            visual: scene.create_sprite(x, y, pc.width, pc.height),
            x,
            y,
            velocity: pc.jump_speed,
            width: pc.width,
            height: pc.height,
            foot_left: pc.foot_left,
            foot_right: pc.foot_right,
        };

        let score_board = scene.create_text(
            SCORE_ANCHOR.0, SCORE_ANCHOR.1, Font::SCORE, rules::score_caption(0),
        );

        WorldState {
            config,
            scene,
            player,
            platforms,
            score: 0,
            score_board,
            phase: Phase::Jumping,
            tick: 0,
            rng,
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}
