/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to the classic Karel Jump constants if the file is missing
/// or incomplete. Out-of-range values are clamped with a logged warning.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub canvas: CanvasConfig,
    pub player: PlayerConfig,
    pub platform: PlatformConfig,
    pub controls: ControlsConfig,
    pub sound: SoundConfig,
    pub gamepad: GamepadConfig,
    pub log_file: PathBuf,
}

/// Logical pixel canvas. The renderer scales it onto the terminal.
#[derive(Clone, Debug)]
pub struct CanvasConfig {
    pub width: i32,
    pub height: i32,
    pub frame_rate: u32,
}

#[derive(Clone, Debug)]
pub struct PlayerConfig {
    pub width: i32,
    pub height: i32,
    pub foot_left: i32,    // first sprite column of the downward facing foot
    pub foot_right: i32,   // last sprite column of the foot
    pub jump_speed: i32,
}

#[derive(Clone, Debug)]
pub struct PlatformConfig {
    pub width: i32,
    pub height: i32,
    pub spacing: i32,      // vertical distance between consecutive platforms
    pub scroll_speed: i32, // px per frame while the level scrolls
    pub climb_margin: i32, // landing above `canvas.height - climb_margin` scrolls
    pub floor_inset: i32,  // left edge of the full-width floor
}

#[derive(Clone, Debug)]
pub struct ControlsConfig {
    pub key_step: i32,
    pub stick_speed: i32,
}

#[derive(Clone, Debug)]
pub struct SoundConfig {
    pub enabled: bool,
    pub death_volume: f32,
    pub swoosh_file: Option<PathBuf>,
    pub death_file: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub quit: Vec<String>,
}

impl PlatformConfig {
    /// Score at which platforms stop shrinking and become squares.
    pub fn difficulty_cap(&self) -> u32 {
        (self.width - self.height).max(0) as u32
    }

    /// Number of animation frames in one scroll event.
    pub fn scroll_frames(&self) -> u32 {
        (self.spacing / self.scroll_speed).max(1) as u32
    }
}

impl GameConfig {
    /// Landings with a y above this line trigger a scroll event.
    pub fn climb_threshold(&self) -> i32 {
        self.canvas.height - self.platform.climb_margin
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    canvas: TomlCanvas,
    #[serde(default)]
    player: TomlPlayer,
    #[serde(default)]
    platform: TomlPlatform,
    #[serde(default)]
    controls: TomlControls,
    #[serde(default)]
    sound: TomlSound,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlCanvas {
    #[serde(default = "default_canvas_width")]
    width: i32,
    #[serde(default = "default_canvas_height")]
    height: i32,
    #[serde(default = "default_frame_rate")]
    frame_rate: u32,
}

#[derive(Deserialize, Debug)]
struct TomlPlayer {
    #[serde(default = "default_player_width")]
    width: i32,
    #[serde(default = "default_player_height")]
    height: i32,
    #[serde(default = "default_foot_left")]
    foot_left: i32,
    #[serde(default = "default_foot_right")]
    foot_right: i32,
    #[serde(default = "default_jump_speed")]
    jump_speed: i32,
}

#[derive(Deserialize, Debug)]
struct TomlPlatform {
    #[serde(default = "default_platform_width")]
    width: i32,
    #[serde(default = "default_platform_height")]
    height: i32,
    #[serde(default = "default_spacing")]
    spacing: i32,
    #[serde(default = "default_scroll_speed")]
    scroll_speed: i32,
    #[serde(default = "default_climb_margin")]
    climb_margin: i32,
    #[serde(default = "default_floor_inset")]
    floor_inset: i32,
}

#[derive(Deserialize, Debug)]
struct TomlControls {
    #[serde(default = "default_key_step")]
    key_step: i32,
    #[serde(default = "default_stick_speed")]
    stick_speed: i32,
}

#[derive(Deserialize, Debug)]
struct TomlSound {
    #[serde(default = "default_sound_enabled")]
    enabled: bool,
    #[serde(default = "default_death_volume")]
    death_volume: f32,
    #[serde(default)]
    swoosh_file: Option<String>,
    #[serde(default)]
    death_file: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_log_file")]
    log_file: Option<String>,
}

// ── Defaults ──

fn default_canvas_width() -> i32 { 1500 }
fn default_canvas_height() -> i32 { 800 }
fn default_frame_rate() -> u32 { 30 }

fn default_player_width() -> i32 { 50 }
fn default_player_height() -> i32 { 60 }
fn default_foot_left() -> i32 { 27 }
fn default_foot_right() -> i32 { 41 }
fn default_jump_speed() -> i32 { 23 }

fn default_platform_width() -> i32 { 200 }
fn default_platform_height() -> i32 { 50 }
fn default_spacing() -> i32 { 192 }
fn default_scroll_speed() -> i32 { 12 }
fn default_climb_margin() -> i32 { 250 }
fn default_floor_inset() -> i32 { 4 }

fn default_key_step() -> i32 { 30 }
fn default_stick_speed() -> i32 { 40 }

fn default_sound_enabled() -> bool { true }
fn default_death_volume() -> f32 { 0.1 }

fn default_quit() -> Vec<String> { vec!["Select".into()] }
fn default_log_file() -> Option<String> { None }

impl Default for TomlCanvas {
    fn default() -> Self {
        TomlCanvas {
            width: default_canvas_width(),
            height: default_canvas_height(),
            frame_rate: default_frame_rate(),
        }
    }
}

impl Default for TomlPlayer {
    fn default() -> Self {
        TomlPlayer {
            width: default_player_width(),
            height: default_player_height(),
            foot_left: default_foot_left(),
            foot_right: default_foot_right(),
            jump_speed: default_jump_speed(),
        }
    }
}

impl Default for TomlPlatform {
    fn default() -> Self {
        TomlPlatform {
            width: default_platform_width(),
            height: default_platform_height(),
            spacing: default_spacing(),
            scroll_speed: default_scroll_speed(),
            climb_margin: default_climb_margin(),
            floor_inset: default_floor_inset(),
        }
    }
}

impl Default for TomlControls {
    fn default() -> Self {
        TomlControls {
            key_step: default_key_step(),
            stick_speed: default_stick_speed(),
        }
    }
}

impl Default for TomlSound {
    fn default() -> Self {
        TomlSound {
            enabled: default_sound_enabled(),
            death_volume: default_death_volume(),
            swoosh_file: None,
            death_file: None,
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad { quit: default_quit() }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral { log_file: default_log_file() }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default(), &[])
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        GameConfig::from_toml(toml_cfg, &search_dirs)
    }

    /// Parse a config document. Used by `load` and by tests.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(GameConfig::from_toml(cfg, &[]))
    }

    fn from_toml(t: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let mut canvas = CanvasConfig {
            width: t.canvas.width,
            height: t.canvas.height,
            frame_rate: t.canvas.frame_rate,
        };
        if canvas.width <= 0 || canvas.height <= 0 {
            log::warn!("canvas size {}x{} is invalid, using defaults", canvas.width, canvas.height);
            canvas.width = default_canvas_width();
            canvas.height = default_canvas_height();
        }
        if canvas.frame_rate == 0 {
            log::warn!("frame_rate = 0 is invalid, using {}", default_frame_rate());
            canvas.frame_rate = default_frame_rate();
        }

        let mut player = PlayerConfig {
            width: t.player.width.max(1),
            height: t.player.height.max(1),
            foot_left: t.player.foot_left,
            foot_right: t.player.foot_right,
            jump_speed: t.player.jump_speed,
        };
        if player.foot_left < 0 || player.foot_right >= player.width || player.foot_left > player.foot_right {
            log::warn!(
                "foot columns {}..{} fall outside a {} px sprite, clamping",
                player.foot_left, player.foot_right, player.width
            );
            player.foot_right = player.foot_right.clamp(0, player.width - 1);
            player.foot_left = player.foot_left.clamp(0, player.foot_right);
        }

        let mut platform = PlatformConfig {
            width: t.platform.width.max(1),
            height: t.platform.height.max(1),
            spacing: t.platform.spacing,
            scroll_speed: t.platform.scroll_speed,
            climb_margin: t.platform.climb_margin,
            floor_inset: t.platform.floor_inset.max(0),
        };
        if platform.scroll_speed <= 0 {
            log::warn!("scroll_speed = {} is invalid, using {}", platform.scroll_speed, default_scroll_speed());
            platform.scroll_speed = default_scroll_speed();
        }
        if platform.spacing < platform.scroll_speed {
            log::warn!("spacing {} is shorter than one scroll frame, clamping", platform.spacing);
            platform.spacing = platform.scroll_speed;
        }
        if platform.width > canvas.width {
            log::warn!("platform width {} exceeds canvas width, clamping", platform.width);
            platform.width = canvas.width;
        }
        if platform.height > platform.width {
            log::warn!("platform height {} exceeds platform width, clamping", platform.height);
            platform.height = platform.width;
        }

        let controls = ControlsConfig {
            key_step: t.controls.key_step.max(1),
            stick_speed: t.controls.stick_speed.max(1),
        };

        let sound = SoundConfig {
            enabled: t.sound.enabled,
            death_volume: t.sound.death_volume.clamp(0.0, 1.0),
            swoosh_file: t.sound.swoosh_file.map(|s| resolve_path(&s, search_dirs)),
            death_file: t.sound.death_file.map(|s| resolve_path(&s, search_dirs)),
        };

        let log_file = match t.general.log_file {
            Some(s) => PathBuf::from(s),
            None => std::env::temp_dir().join("karel-jump.log"),
        };

        GameConfig {
            canvas,
            player,
            platform,
            controls,
            sound,
            gamepad: GamepadConfig { quit: t.gamepad.quit },
            log_file,
        }
    }
}

/// Resolve an asset path: absolute paths are kept, relative paths are
/// looked up in the candidate dirs (first existing wins).
fn resolve_path(s: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let p = PathBuf::from(s);
    if p.is_absolute() {
        return p;
    }
    search_dirs.iter()
        .map(|d| d.join(&p))
        .find(|c| c.exists())
        .unwrap_or(p)
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => {
                        log::info!("loaded {}", path.display());
                        return cfg;
                    }
                    Err(e) => {
                        log::warn!("config.toml parse error: {e}; using default settings");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    log::warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_classic_constants() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.canvas.width, 1500);
        assert_eq!(cfg.canvas.height, 800);
        assert_eq!(cfg.canvas.frame_rate, 30);
        assert_eq!(cfg.player.jump_speed, 23);
        assert_eq!(cfg.platform.spacing, 192);
        assert_eq!(cfg.platform.scroll_speed, 12);
        assert_eq!(cfg.climb_threshold(), 550);
        assert_eq!(cfg.platform.difficulty_cap(), 150);
        assert_eq!(cfg.platform.scroll_frames(), 16);
        assert!((cfg.sound.death_volume - 0.1).abs() < 1e-6);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_toml_str(
            "[platform]\nwidth = 120\n\n[canvas]\nframe_rate = 60\n",
        ).unwrap();
        assert_eq!(cfg.platform.width, 120);
        assert_eq!(cfg.platform.height, 50);
        assert_eq!(cfg.platform.difficulty_cap(), 70);
        assert_eq!(cfg.canvas.frame_rate, 60);
        assert_eq!(cfg.canvas.width, 1500);
    }

    #[test]
    fn invalid_values_are_clamped() {
        let cfg = GameConfig::from_toml_str(
            "[canvas]\nframe_rate = 0\n[platform]\nscroll_speed = 0\n[player]\nfoot_right = 99\n",
        ).unwrap();
        assert_eq!(cfg.canvas.frame_rate, 30);
        assert_eq!(cfg.platform.scroll_speed, 12);
        assert_eq!(cfg.player.foot_right, 49);
        assert!(cfg.player.foot_left <= cfg.player.foot_right);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(GameConfig::from_toml_str("[canvas\nwidth = ").is_err());
    }
}
