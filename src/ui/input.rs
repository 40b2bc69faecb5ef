/// Input state tracker.
///
/// Karel's x follows a pointer in canvas pixels. The pointer is driven by:
///   - Mouse motion (terminal mouse capture): jumps straight to the column
///   - Left/Right (A/D) held: nudges by `key_step` px per frame
///   - Gamepad stick / d-pad: nudges by `stick_speed` px per frame
///
/// Keyboard nudges and gamepad input are clamped to the canvas; mouse
/// positions are bounded by the terminal itself.
///
/// Uses crossterm's keyboard enhancement for Release events when available.
/// Falls back to timeout-based release detection on terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

use crate::config::ControlsConfig;
use crate::ui::gamepad::GamepadState;
use crate::ui::renderer::Viewport;

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went from "not held" to "held" during the most recent drain.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for Ctrl+C detection.
    raw_events: Vec<KeyEvent>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,

    /// Pointer x in canvas pixels.
    pointer_x: i32,
}

impl InputState {
    pub fn new(start_x: i32) -> Self {
        InputState {
            last_active: HashMap::with_capacity(8),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
            pointer_x: start_x,
        }
    }

    /// Drain all pending terminal events and update key and pointer state.
    /// Call this once per loop iteration, before simulation frames.
    pub fn drain_events(&mut self, view: &Viewport) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => self.on_key(key),
                Ok(Event::Mouse(m)) => match m.kind {
                    MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_) => {
                        self.pointer_x = view.column_to_x(m.column);
                    }
                    _ => {}
                },
                Ok(_) => {}
                Err(e) => {
                    log::warn!("terminal event read failed: {e}");
                    break;
                }
            }
        }

        // Expire keys that have timed out (fallback for terminals without Release)
        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn on_key(&mut self, key: KeyEvent) {
        self.raw_events.push(key);
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {}
            _ => {
                let was_held = self.is_held(key.code);
                self.last_active.insert(key.code, Instant::now());
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    /// Pointer x for the next simulation frame, after applying held
    /// keyboard and gamepad nudges.
    pub fn frame_pointer(&mut self, gp: &GamepadState, controls: &ControlsConfig, canvas_width: i32) -> i32 {
        let mut dx = 0;
        if self.any_held(KEYS_LEFT) { dx -= controls.key_step; }
        if self.any_held(KEYS_RIGHT) { dx += controls.key_step; }
        dx += (gp.steer() * controls.stick_speed as f32).round() as i32;
        if dx != 0 {
            self.pointer_x = nudge(self.pointer_x, dx, canvas_width);
        }
        self.pointer_x
    }

    pub fn quit_requested(&self) -> bool {
        self.any_pressed(KEYS_QUIT) || self.ctrl_c_pressed()
    }

    // ── Internal ──

    fn is_held(&self, code: KeyCode) -> bool {
        self.last_active.get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }

    fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.fresh_presses.contains(c))
    }

    fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

/// Move the pointer by `dx`, keeping it on the canvas.
fn nudge(x: i32, dx: i32, canvas_width: i32) -> i32 {
    (x + dx).clamp(0, canvas_width.max(0))
}
