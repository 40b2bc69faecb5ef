/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// The game lives on a pixel canvas (1500×800 by default). Each frame the
/// scene's display list is rasterised onto a terminal-sized cell grid:
///
///   1. Build the next frame into `front` (array of Cell), painting
///      scene objects in order so later ones cover earlier ones
///   2. Compare each cell with `back` (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The bottom terminal row is reserved for a help bar.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::Paint;
use crate::domain::physics::Rect;
use crate::sim::scene::Visual;
use crate::sim::world::WorldState;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
    bold: bool,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, so the
    /// inter-row gap color on VTE terminals matches the cells.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG, bold: false };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta, bold: false };
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    /// Signed coordinates: anything off the grid is dropped.
    fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.cells[y as usize * self.width + x as usize] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y), keeping whatever background is underneath.
    fn put_str(&mut self, x: i32, y: i32, s: &str, fg: Color, bold: bool) {
        if y < 0 || y as usize >= self.height {
            return;
        }
        for (i, ch) in s.chars().enumerate() {
            let cx = x + i as i32;
            if cx < 0 { continue; }
            if cx as usize >= self.width { break; }
            let bg = self.get(cx as usize, y as usize).bg;
            self.set(cx, y, Cell { ch, fg, bg, bold });
        }
    }
}

// ── Viewport: canvas pixels ↔ terminal cells ──

/// Maps the pixel canvas onto the terminal area above the help bar.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub canvas_w: i32,
    pub canvas_h: i32,
}

impl Viewport {
    pub fn new(term_w: u16, term_h: u16, canvas_w: i32, canvas_h: i32) -> Self {
        Viewport {
            cols: term_w.max(1),
            rows: term_h.saturating_sub(HELP_ROWS).max(1),
            canvas_w: canvas_w.max(1),
            canvas_h: canvas_h.max(1),
        }
    }

    /// Column containing canvas x (floor division, may be off-grid).
    pub fn x_to_col(&self, x: i32) -> i32 {
        (x as i64 * self.cols as i64).div_euclid(self.canvas_w as i64) as i32
    }

    pub fn y_to_row(&self, y: i32) -> i32 {
        (y as i64 * self.rows as i64).div_euclid(self.canvas_h as i64) as i32
    }

    /// Canvas x at the left edge of a terminal column.
    pub fn column_to_x(&self, col: u16) -> i32 {
        (col as i64 * self.canvas_w as i64 / self.cols as i64) as i32
    }

    /// Cell span covered by a pixel box: (col0, row0, col1, row1), inclusive,
    /// at least one cell in each direction.
    fn cells_of(&self, r: &Rect) -> (i32, i32, i32, i32) {
        let c0 = self.x_to_col(r.x0);
        let r0 = self.y_to_row(r.y0);
        let c1 = self.x_to_col(r.x1 - 1).max(c0);
        let r1 = self.y_to_row(r.y1 - 1).max(r0);
        (c0, r0, c1, r1)
    }
}

const HELP_ROWS: u16 = 1;

fn paint_color(p: Paint) -> Color {
    match p {
        Paint::Black => Color::Rgb { r: 8, g: 8, b: 8 },
        Paint::Blue => Color::Rgb { r: 40, g: 90, b: 230 },
        Paint::Green => Color::Rgb { r: 40, g: 190, b: 70 },
        Paint::Yellow => Color::Rgb { r: 235, g: 215, b: 40 },
        Paint::Orange => Color::Rgb { r: 245, g: 140, b: 30 },
        Paint::Red => Color::Rgb { r: 225, g: 45, b: 45 },
    }
}

const KAREL_FG: Color = Color::Rgb { r: 235, g: 235, b: 225 };
const TEXT_FG: Color = Color::White;
const HELP_FG: Color = Color::DarkGrey;

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: u16,
    term_h: u16,
    last_over: Option<bool>,
    keyboard_enhanced: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_over: None,
            keyboard_enhanced: false,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        // Release events make held-key steering precise; optional.
        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.keyboard_enhanced = true;
        }

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw, th);
        log::info!("terminal {}x{}, keyboard enhancement: {}", tw, th, self.keyboard_enhanced);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.keyboard_enhanced {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.writer,
            DisableMouseCapture,
            SetAttribute(Attribute::Reset),
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn keyboard_enhanced(&self) -> bool {
        self.keyboard_enhanced
    }

    /// Current pixel ↔ cell mapping for a canvas of the given size.
    pub fn viewport(&self, canvas_w: i32, canvas_h: i32) -> Viewport {
        Viewport::new(self.term_w, self.term_h, canvas_w, canvas_h)
    }

    fn resize(&mut self, tw: u16, th: u16) {
        self.term_w = tw;
        self.term_h = th;
        self.front.resize(tw as usize, th as usize);
        self.back.resize(tw as usize, th as usize);
        // Force full repaint: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw != self.term_w || th != self.term_h {
            log::debug!("terminal resized to {}x{}", tw, th);
            self.resize(tw, th);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Game over replaces the whole scene: repaint from scratch.
        let over = world.is_over();
        if self.last_over != Some(over) {
            self.back.cells.fill(Cell::INVALID);
            self.last_over = Some(over);
        }

        let view = self.viewport(world.config.canvas.width, world.config.canvas.height);
        self.front.clear();
        compose_scene(&mut self.front, world, &view);
        compose_help(&mut self.front, over);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut last_bold = false;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(
            self.writer,
            SetAttribute(Attribute::NormalIntensity),
            SetForegroundColor(last_fg),
            SetBackgroundColor(last_bg),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.bold != last_bold {
                    let attr = if cell.bold { Attribute::Bold } else { Attribute::NormalIntensity };
                    queue!(self.writer, SetAttribute(attr))?;
                    last_bold = cell.bold;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}

// ── Compose: build front buffer content ──

fn compose_scene(buf: &mut FrameBuffer, world: &WorldState, view: &Viewport) {
    for (_, visual) in world.scene.iter() {
        match visual {
            Visual::Rectangle { rect, paint } => {
                let bg = paint_color(*paint);
                let (c0, r0, c1, r1) = view.cells_of(rect);
                for row in r0..=r1.min(view.rows as i32 - 1) {
                    for col in c0..=c1 {
                        buf.set(col, row, Cell { ch: ' ', fg: TEXT_FG, bg, bold: false });
                    }
                }
            }
            Visual::Sprite { rect } => compose_karel(buf, view, rect),
            Visual::Text { x, y, font, content } => {
                buf.put_str(view.x_to_col(*x), view.y_to_row(*y), content, TEXT_FG, font.is_large());
            }
        }
    }
}

/// Karel as a block figure: body rows of '█', legs on the bottom row.
fn compose_karel(buf: &mut FrameBuffer, view: &Viewport, rect: &Rect) {
    let (c0, r0, c1, r1) = view.cells_of(rect);
    for row in r0..=r1.min(view.rows as i32 - 1) {
        for col in c0..=c1 {
            let ch = if row == r1 && r1 > r0 {
                if (col - c0) % 2 == 0 { '▀' } else { ' ' }
            } else {
                '█'
            };
            let bg = if row >= 0 && col >= 0 {
                buf.get(col as usize, row as usize).bg
            } else {
                Cell::BASE_BG
            };
            buf.set(col, row, Cell { ch, fg: KAREL_FG, bg, bold: false });
        }
    }
}

fn compose_help(buf: &mut FrameBuffer, over: bool) {
    if buf.height == 0 {
        return;
    }
    let row = buf.height as i32 - 1;
    let help = if over {
        " Esc/Q: Quit"
    } else {
        " Mouse or ←/→ (A/D): Steer  │  Esc/Q: Quit"
    };
    buf.put_str(0, row, help, HELP_FG, false);
}
