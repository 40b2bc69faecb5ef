/// Entry point and game loop.

mod config;
mod domain;
mod logging;
mod sim;
mod ui;

use std::time::Duration;

use config::GameConfig;
use sim::clock::FrameClock;
use sim::event::GameEvent;
use sim::step;
use sim::world::WorldState;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::{SoundAssets, SoundEngine};

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let log_sink = logging::init();
    let config = GameConfig::load();
    if let Err(e) = log_sink.attach(&config.log_file) {
        eprintln!("Cannot open log file {}: {e}", config.log_file.display());
        log_sink.discard();
    }
    log::info!(
        "canvas {}x{} at {} fps, platforms {}x{} every {} px, squares from score {}",
        config.canvas.width, config.canvas.height, config.canvas.frame_rate,
        config.platform.width, config.platform.height, config.platform.spacing,
        config.platform.difficulty_cap(),
    );

    // Configured clips are read before the terminal is taken over so a
    // bad path is reported on a normal screen.
    let assets = if config.sound.enabled {
        match SoundAssets::load(&config.sound) {
            Ok(a) => a,
            Err(e) => {
                log::error!("sound clip: {e}");
                eprintln!("Cannot load sound clip: {e}");
                std::process::exit(1);
            }
        }
    } else {
        SoundAssets::default()
    };

    let mut world = WorldState::new(config);

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = if world.config.sound.enabled {
        SoundEngine::new(assets, world.config.sound.death_volume)
    } else {
        log::info!("sound disabled in config");
        None
    };

    let result = game_loop(&mut world, &mut renderer, sound.as_ref());

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log::error!("game loop failed: {e}");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Karel Jump!");
    println!("Final Score: {}", world.score);
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new(world.player.x);
    kb.honor_release = renderer.keyboard_enhanced();
    let mut gp = GamepadState::new();
    gp.load_button_config(&world.config.gamepad);
    if gp.connected {
        log::info!("gamepad detected");
    }

    let mut clock = FrameClock::new(world.config.canvas.frame_rate);
    log::debug!("frame budget {:?}", clock.frame());

    loop {
        let view = renderer.viewport(world.config.canvas.width, world.config.canvas.height);
        kb.drain_events(&view);
        gp.update();

        if kb.quit_requested() || gp.quit_pressed() {
            log::info!("quit at score {} after {} frames", world.score, world.tick);
            break;
        }

        for _ in 0..clock.due() {
            if world.is_over() {
                break;
            }
            let pointer_x = kb.frame_pointer(&gp, &world.config.controls, world.config.canvas.width);
            let events = step::step(world, pointer_x);
            process_events(sound, &events);
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn process_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::Landed { y } => log::debug!("landed at y={y}"),
            GameEvent::ScrollStarted => {
                log::debug!("scroll started");
                if let Some(sfx) = sound {
                    sfx.play_swoosh();
                }
            }
            GameEvent::PlatformSpawned { x, y, width, paint } => {
                log::debug!("{paint:?} platform spawned at ({x}, {y}), width {width}");
            }
            GameEvent::PlatformRemoved => log::debug!("bottom platform removed"),
            GameEvent::ScoreChanged { score } => log::info!("score {score}"),
            GameEvent::FellOutOfBounds { score } => {
                log::info!("game over, final score {score}");
                if let Some(sfx) = sound {
                    sfx.play_death();
                }
            }
        }
    }
}
