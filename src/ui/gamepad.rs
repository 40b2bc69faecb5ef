/// Gamepad input tracker using gilrs.
///
/// Steering only needs one axis, so the tracker keeps:
///   Left stick X / D-pad left-right  →  steer in [-1.0, 1.0]
///   Quit buttons (config, default Select)  →  quit
///
/// Button names for `quit` are loaded from config.toml via `load_button_config()`.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South     => Some(Btn::A),
            Button::East      => Some(Btn::B),
            Button::West      => Some(Btn::X),
            Button::North     => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start     => Some(Btn::Start),
            Button::Select    => Some(Btn::Select),
            _ => None,
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Buttons freshly pressed since the last `update()`.
    just_pressed: Vec<Btn>,

    dpad_left: bool,
    dpad_right: bool,
    stick_x: f32,

    quit: Vec<Btn>,

    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(e) => {
                    log::info!("gamepad support unavailable: {e}");
                    (None, false)
                }
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            just_pressed: Vec::with_capacity(4),
            dpad_left: false,
            dpad_right: false,
            stick_x: 0.0,
            quit: vec![Btn::Select],
            connected,
        }
    }

    /// A tracker that never polls hardware.
    #[cfg(test)]
    pub fn detached() -> Self {
        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: None,
            just_pressed: Vec::new(),
            dpad_left: false,
            dpad_right: false,
            stick_x: 0.0,
            quit: vec![Btn::Select],
            connected: false,
        }
    }

    /// Load button mapping from config. Unknown names are skipped; an
    /// empty result keeps the default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        let quit: Vec<Btn> = cfg.quit.iter().filter_map(|s| Btn::from_name(s)).collect();
        if !quit.is_empty() {
            self.quit = quit;
        }
    }

    pub fn update(&mut self) {
        self.just_pressed.clear();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, false);
                }
                EventType::AxisChanged(Axis::LeftStickX, value, _) => {
                    self.connected = true;
                    self.stick_x = value;
                }
                EventType::Connected => {
                    log::info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    log::info!("gamepad disconnected");
                    self.connected = false;
                    self.release_all();
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        match gilrs_btn {
            Button::DPadLeft => { self.dpad_left = held; return; }
            Button::DPadRight => { self.dpad_right = held; return; }
            _ => {}
        }
        if held {
            if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
                self.just_pressed.push(btn);
            }
        }
    }

    // ── Queries ──

    /// Horizontal steering in [-1.0, 1.0]; the d-pad counts as full tilt.
    pub fn steer(&self) -> f32 {
        let dpad = match (self.dpad_left, self.dpad_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        if dpad != 0.0 {
            dpad
        } else if self.stick_x.abs() > STICK_DEADZONE {
            self.stick_x.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn quit_pressed(&self) -> bool {
        self.quit.iter().any(|b| self.just_pressed.contains(b))
    }

    // ── Internal ──

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        self.just_pressed.clear();
        self.dpad_left = false;
        self.dpad_right = false;
        self.stick_x = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_names_parse_case_insensitively() {
        assert_eq!(Btn::from_name("select"), Some(Btn::Select));
        assert_eq!(Btn::from_name("Back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("rb"), Some(Btn::R1));
        assert_eq!(Btn::from_name("turbo"), None);
    }

    #[test]
    fn quit_mapping_from_config() {
        let mut gp = GamepadState::detached();
        gp.load_button_config(&GamepadConfig { quit: vec!["Start".into(), "bogus".into()] });
        gp.just_pressed.push(Btn::Start);
        assert!(gp.quit_pressed());

        let mut gp = GamepadState::detached();
        gp.load_button_config(&GamepadConfig { quit: vec!["bogus".into()] });
        gp.just_pressed.push(Btn::Select);
        assert!(gp.quit_pressed());
    }

    #[test]
    fn steering_deadzone_and_dpad() {
        let mut gp = GamepadState::detached();
        gp.stick_x = 0.2;
        assert_eq!(gp.steer(), 0.0);
        gp.stick_x = -0.6;
        assert!((gp.steer() + 0.6).abs() < 1e-6);
        gp.dpad_right = true;
        assert_eq!(gp.steer(), 1.0);
        gp.release_all();
        assert_eq!(gp.steer(), 0.0);
    }
}
