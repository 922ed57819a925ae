//! Terminal display surface and keyboard source.
//!
//! The scene is rasterized onto a half-block pixel grid (two pixels per
//! character cell) with text drawn on the character grid above it.

use std::collections::HashMap;
use std::io::{self, Write};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::style::{self, Color};
use crossterm::{cursor, execute, queue, terminal};
use glam::{Vec2, Vec4};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::ClientError;
use crate::game_loop::{FrameSink, HostEvent};
use crate::scene::{Align, Scene, Shape};

/// How long the reader waits for a key before checking for cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(20);
/// Without release reporting, a key counts as released once it has not
/// been pressed or repeated for this long.
const RELEASE_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const BLACK: Rgb = Rgb(0, 0, 0);

    /// Composite `color` over `self` using its alpha.
    fn blend(self, color: Vec4) -> Rgb {
        let a = color.w.clamp(0.0, 1.0);
        let mix = |under: u8, over: f32| -> u8 {
            let over = over.clamp(0.0, 1.0) * 255.0;
            (f32::from(under) * (1.0 - a) + over * a).round() as u8
        };
        Rgb(mix(self.0, color.x), mix(self.1, color.y), mix(self.2, color.z))
    }

    fn term(self) -> Color {
        Color::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Glyph {
    ch: char,
    fg: Rgb,
}

/// Character-cell canvas: `cols × rows * 2` pixels plus one glyph slot per cell.
pub struct Canvas {
    cols: usize,
    rows: usize,
    px: Vec<Rgb>,
    glyphs: Vec<Option<Glyph>>,
}

impl Canvas {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            px: vec![Rgb::BLACK; cols * rows * 2],
            glyphs: vec![None; cols * rows],
        }
    }

    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.px.resize(cols * rows * 2, Rgb::BLACK);
        self.glyphs.resize(cols * rows, None);
    }

    pub fn size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    fn clear(&mut self) {
        self.px.fill(Rgb::BLACK);
        self.glyphs.fill(None);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.cols + x]
    }

    pub fn glyph(&self, col: usize, row: usize) -> Option<char> {
        self.glyphs[row * self.cols + col].map(|g| g.ch)
    }

    fn paint(&mut self, x: i32, y: i32, color: Vec4) {
        if x < 0 || y < 0 || x as usize >= self.cols || y as usize >= self.rows * 2 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let i = y * self.cols + x;
        self.px[i] = self.px[i].blend(color);
        // Opaque paint hides text underneath.
        if color.w >= 1.0 {
            self.glyphs[(y / 2) * self.cols + x] = None;
        }
    }

    fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Vec4) {
        for y in y0..y1 {
            for x in x0..x1 {
                self.paint(x, y, color);
            }
        }
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Vec4) {
        if radii.x <= 0.0 || radii.y <= 0.0 {
            return;
        }
        let x0 = (center.x - radii.x).floor() as i32;
        let x1 = (center.x + radii.x).ceil() as i32;
        let y0 = (center.y - radii.y).floor() as i32;
        let y1 = (center.y + radii.y).ceil() as i32;
        for y in y0..y1 {
            for x in x0..x1 {
                let d = (Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center) / radii;
                if d.length_squared() <= 1.0 {
                    self.paint(x, y, color);
                }
            }
        }
    }

    fn put_text(&mut self, col: i32, row: i32, text: &str, fg: Rgb) {
        if row < 0 || row as usize >= self.rows {
            return;
        }
        for (i, ch) in text.chars().enumerate() {
            let c = col + i as i32;
            if c < 0 {
                continue;
            }
            if c as usize >= self.cols {
                break;
            }
            self.glyphs[row as usize * self.cols + c as usize] = Some(Glyph { ch, fg });
        }
    }

    /// Draw `scene`, whose coordinates span `logical`, scaled to fill the canvas.
    pub fn rasterize(&mut self, scene: &Scene, logical: Vec2) {
        self.clear();
        if self.cols == 0 || self.rows == 0 {
            return;
        }
        let scale = Vec2::new(self.cols as f32, (self.rows * 2) as f32) / logical;
        let to_px = |p: Vec2| p * scale;
        let to_cell = |p: Vec2| {
            let px = to_px(p);
            (px.x.floor() as i32, (px.y / 2.0).floor() as i32)
        };
        let fg_of = |c: Vec4| Rgb::BLACK.blend(c.truncate().extend(1.0));

        for obj in scene.draw_order() {
            match &obj.shape {
                Shape::Rect { size } => {
                    let a = to_px(obj.position);
                    let b = to_px(obj.position + *size);
                    self.fill_rect(
                        a.x.floor() as i32,
                        a.y.floor() as i32,
                        b.x.ceil() as i32,
                        b.y.ceil() as i32,
                        obj.color,
                    );
                },
                Shape::Circle { radius } => {
                    self.fill_ellipse(to_px(obj.position), Vec2::splat(*radius) * scale, obj.color);
                },
                Shape::Text { text, align } => {
                    let (mut col, row) = to_cell(obj.position);
                    if *align == Align::Center {
                        col -= text.chars().count() as i32 / 2;
                    }
                    self.put_text(col, row, text, fg_of(obj.color));
                },
                Shape::Bubble { text, size, ink } => {
                    let a = to_px(obj.position);
                    let b = to_px(obj.position + *size);
                    self.fill_rect(
                        a.x.floor() as i32,
                        a.y.floor() as i32,
                        b.x.ceil() as i32,
                        b.y.ceil() as i32,
                        obj.color,
                    );
                    let (center_col, row) = to_cell(obj.position + *size / 2.0);
                    let max = (b.x.ceil() - a.x.floor()).max(0.0) as usize;
                    let clipped: String = text.chars().take(max).collect();
                    let col = center_col - clipped.chars().count() as i32 / 2;
                    self.put_text(col, row, &clipped, fg_of(*ink));
                },
            }
        }
    }

    /// Emit the canvas. Each cell shows a glyph over its top pixel, or a
    /// half block with the top pixel as foreground and the bottom as background.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let top = self.pixel(col, row * 2);
                let bottom = self.pixel(col, row * 2 + 1);
                match self.glyphs[row * self.cols + col] {
                    Some(glyph) => queue!(
                        out,
                        style::SetForegroundColor(glyph.fg.term()),
                        style::SetBackgroundColor(top.term()),
                        style::Print(glyph.ch)
                    )?,
                    None => queue!(
                        out,
                        style::SetForegroundColor(top.term()),
                        style::SetBackgroundColor(bottom.term()),
                        style::Print('\u{2580}')
                    )?,
                }
            }
            if row + 1 < self.rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

/// Draws frames onto the terminal, following its size.
pub struct TerminalSink<W: Write> {
    out: W,
    canvas: Canvas,
    logical: Vec2,
}

impl<W: Write> TerminalSink<W> {
    /// `logical` is the size of the scene's coordinate space.
    pub fn new(out: W, logical: Vec2) -> Result<Self, ClientError> {
        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            canvas: Canvas::new(usize::from(cols), usize::from(rows)),
            logical,
        })
    }
}

impl<W: Write> FrameSink for TerminalSink<W> {
    fn present(&mut self, scene: &Scene) -> Result<(), ClientError> {
        let (cols, rows) = terminal::size()?;
        let size = (usize::from(cols), usize::from(rows));
        if self.canvas.size() != size {
            tracing::debug!(cols, rows, "Terminal resized");
            self.canvas.resize(size.0, size.1);
            queue!(self.out, terminal::Clear(terminal::ClearType::All))?;
        }
        self.canvas.rasterize(scene, self.logical);
        self.canvas.render(&mut self.out)?;
        Ok(())
    }
}

/// Raw mode and alternate screen for as long as it lives.
pub struct TerminalGuard {
    reports_releases: bool,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
        )?;
        let reports_releases = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if reports_releases {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        tracing::info!(reports_releases, "Terminal ready");
        Ok(Self { reports_releases })
    }

    /// Whether the terminal reports key releases itself.
    pub fn reports_releases(&self) -> bool {
        self.reports_releases
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        if self.reports_releases {
            let _ = execute!(out, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(
            out,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// Normalized identifier for a movement key.
fn key_id(code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Left => Some("arrowleft".to_string()),
        KeyCode::Right => Some("arrowright".to_string()),
        KeyCode::Up => Some("arrowup".to_string()),
        KeyCode::Down => Some("arrowdown".to_string()),
        KeyCode::Char(c) => Some(c.to_lowercase().collect()),
        _ => None,
    }
}

/// Map a terminal key event to a host event.
pub fn translate_key(key: KeyEvent) -> Option<HostEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(HostEvent::Quit);
    }
    if key.kind == KeyEventKind::Release {
        return key_id(key.code).map(HostEvent::KeyUp);
    }
    match key.code {
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(HostEvent::Quit),
        KeyCode::Char('r' | 'R') | KeyCode::Enter => Some(HostEvent::Restart),
        code => key_id(code).map(HostEvent::KeyDown),
    }
}

/// Synthesizes releases for terminals that only report presses and repeats.
pub(crate) struct HeldKeys {
    window: Duration,
    last_seen: HashMap<String, Instant>,
}

impl HeldKeys {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            window,
            last_seen: HashMap::new(),
        }
    }

    pub(crate) fn touch(&mut self, code: &str, now: Instant) {
        self.last_seen.insert(code.to_string(), now);
    }

    /// Drop and return keys not seen within the window.
    pub(crate) fn expire(&mut self, now: Instant) -> Vec<String> {
        let expired: Vec<String> = self
            .last_seen
            .iter()
            .filter(|(_, seen)| now.duration_since(**seen) >= self.window)
            .map(|(code, _)| code.clone())
            .collect();
        for code in &expired {
            self.last_seen.remove(code);
        }
        expired
    }
}

/// Read terminal key events on a dedicated thread and queue them as host
/// events until cancelled or the receiver goes away.
pub fn spawn_input_reader(
    tx: mpsc::UnboundedSender<HostEvent>,
    cancel: CancellationToken,
    reports_releases: bool,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let mut held = HeldKeys::new(RELEASE_WINDOW);
        while !cancel.is_cancelled() {
            match event::poll(POLL_INTERVAL) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => {
                        if let Some(host_event) = translate_key(key) {
                            if !reports_releases && let HostEvent::KeyDown(code) = &host_event {
                                held.touch(code, Instant::now());
                            }
                            if tx.send(host_event).is_err() {
                                return;
                            }
                        }
                    },
                    Ok(_) => {},
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read terminal event");
                        return;
                    },
                },
                Ok(false) => {},
                Err(e) => {
                    tracing::error!(error = %e, "Failed to poll terminal events");
                    return;
                },
            }
            if !reports_releases {
                for code in held.expire(Instant::now()) {
                    if tx.send(HostEvent::KeyUp(code)).is_err() {
                        return;
                    }
                }
            }
        }
    })
}
