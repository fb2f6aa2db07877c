//! Terminal frontend
//!
//! Each character cell shows two vertically stacked pixels (`▀` with
//! separate foreground/background colors). Text is overlaid on the cells.

use std::io::{self, BufRead, IsTerminal, Write};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::style::{self, Color as CColor};
use crossterm::{cursor, execute, queue, terminal};
use glam::Vec2;

use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::persistence::{ScoreGateway, UserStore};
use crate::renderer::{Canvas, Color, draw_frame};
use crate::session::Session;
use crate::sim::{Rect, TickInput};

/// Without release events a press counts as held for this long
const TAP_HOLD: Duration = Duration::from_millis(80);
/// Safety net when release events are reported but one gets lost
const RELEASE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Rgb(u8, u8, u8);

impl From<Color> for Rgb {
    fn from(c: Color) -> Self {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb(channel(c[0]), channel(c[1]), channel(c[2]))
    }
}

impl From<Rgb> for CColor {
    fn from(c: Rgb) -> Self {
        CColor::Rgb {
            r: c.0,
            g: c.1,
            b: c.2,
        }
    }
}

// ── Pixel buffer with half-block rendering ──────────────────────────────────

struct Overlay {
    col: usize,
    row: usize,
    text: String,
    color: Rgb,
}

/// Pixel canvas scaled from playfield coordinates
pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
    overlays: Vec<Overlay>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![Rgb(0, 0, 0); w * h],
            overlays: Vec::new(),
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px = vec![Rgb(0, 0, 0); w * h];
        self.overlays.clear();
    }

    fn scale(&self) -> Vec2 {
        Vec2::new(
            self.w as f32 / PLAYFIELD_WIDTH,
            self.h as f32 / PLAYFIELD_HEIGHT,
        )
    }

    /// Pixel center in playfield coordinates
    fn to_playfield(&self, x: usize, y: usize) -> Vec2 {
        (Vec2::new(x as f32, y as f32) + 0.5) / self.scale()
    }

    /// Clamped pixel range covering `[min, max)` in playfield coordinates
    fn pixel_span(&self, min: Vec2, max: Vec2) -> (usize, usize, usize, usize) {
        let s = self.scale();
        let clamp_x = |v: f32| (v.max(0.0) as usize).min(self.w);
        let clamp_y = |v: f32| (v.max(0.0) as usize).min(self.h);
        (
            clamp_x((min.x * s.x).floor()),
            clamp_x((max.x * s.x).ceil()),
            clamp_y((min.y * s.y).floor()),
            clamp_y((max.y * s.y).ceil()),
        )
    }

    fn set(&mut self, x: usize, y: usize, c: Rgb) {
        if x < self.w && y < self.h {
            self.px[y * self.w + x] = c;
        }
    }

    fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    /// Fill every pixel whose center passes `inside`
    fn fill_where(&mut self, min: Vec2, max: Vec2, color: Color, inside: impl Fn(Vec2) -> bool) {
        let c = Rgb::from(color);
        let (x0, x1, y0, y1) = self.pixel_span(min, max);
        for y in y0..y1 {
            for x in x0..x1 {
                if inside(self.to_playfield(x, y)) {
                    self.set(x, y, c);
                }
            }
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev: Option<(Rgb, Rgb)> = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);
                if prev != Some((top, bot)) {
                    queue!(
                        out,
                        style::SetForegroundColor(top.into()),
                        style::SetBackgroundColor(bot.into())
                    )?;
                    prev = Some((top, bot));
                }
                queue!(out, style::Print('\u{2580}'))?; // ▀
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                prev = None;
            }
        }

        for overlay in &self.overlays {
            if overlay.row >= rows || overlay.col >= self.w {
                continue;
            }
            let room = self.w - overlay.col;
            let text: String = overlay.text.chars().take(room).collect();
            let bg = self.get(overlay.col, overlay.row * 2 + 1);
            queue!(
                out,
                cursor::MoveTo(overlay.col as u16, overlay.row as u16),
                style::SetForegroundColor(overlay.color.into()),
                style::SetBackgroundColor(bg.into()),
                style::Print(text)
            )?;
        }

        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

impl Canvas for PixelBuf {
    fn clear(&mut self, color: Color) {
        self.px.fill(color.into());
        self.overlays.clear();
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fill_where(rect.min, rect.max(), color, |p| rect.contains_point(p));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let r = Vec2::splat(radius);
        self.fill_where(center - r, center + r, color, |p| {
            p.distance_squared(center) <= radius * radius
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        if points.len() < 3 {
            return;
        }
        let min = points.iter().fold(Vec2::splat(f32::MAX), |a, &p| a.min(p));
        let max = points.iter().fold(Vec2::splat(f32::MIN), |a, &p| a.max(p));
        self.fill_where(min, max, color, |p| inside_convex(points, p));
    }

    fn text(&mut self, pos: Vec2, text: &str, color: Color) {
        let s = self.scale();
        self.overlays.push(Overlay {
            col: (pos.x * s.x).max(0.0) as usize,
            row: ((pos.y * s.y).max(0.0) / 2.0) as usize,
            text: text.to_string(),
            color: color.into(),
        });
    }
}

/// Point-in-convex-polygon test, either winding
fn inside_convex(points: &[Vec2], p: Vec2) -> bool {
    let mut sign = 0.0f32;
    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        let cross = (b - a).perp_dot(p - a);
        if cross != 0.0 {
            if sign != 0.0 && cross.signum() != sign {
                return false;
            }
            sign = cross.signum();
        }
    }
    true
}

// ── Input ──────────────────────────────────────────────────────────────────

/// Up/down held state built from key events
struct HeldKeys {
    up: Option<Instant>,
    down: Option<Instant>,
    /// Terminal reports key releases
    reports_release: bool,
}

impl HeldKeys {
    fn new(reports_release: bool) -> Self {
        Self {
            up: None,
            down: None,
            reports_release,
        }
    }

    fn update(slot: &mut Option<Instant>, pressed: bool, hold: Duration, now: Instant) {
        *slot = pressed.then(|| now + hold);
    }

    fn hold(&self) -> Duration {
        if self.reports_release {
            RELEASE_TIMEOUT
        } else {
            TAP_HOLD
        }
    }

    fn input(&self, now: Instant, pause: bool) -> TickInput {
        let held = |slot: Option<Instant>| slot.is_some_and(|until| until > now);
        TickInput {
            up: held(self.up),
            down: held(self.down),
            pause,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Action {
    None,
    Pause,
    Restart,
    Quit,
}

fn handle_key(key: KeyEvent, keys: &mut HeldKeys, game_over: bool, now: Instant) -> Action {
    let pressed = key.kind != KeyEventKind::Release;
    let hold = keys.hold();
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Up | KeyCode::Char('w') => {
            HeldKeys::update(&mut keys.up, pressed, hold, now);
            Action::None
        }
        KeyCode::Down | KeyCode::Char('s') => {
            HeldKeys::update(&mut keys.down, pressed, hold, now);
            Action::None
        }
        KeyCode::Esc if pressed => Action::Quit,
        KeyCode::Char('p') if key.kind == KeyEventKind::Press => Action::Pause,
        KeyCode::Char('r') if game_over && pressed => Action::Restart,
        KeyCode::Char('q') if game_over && pressed => Action::Quit,
        _ => Action::None,
    }
}

// ── Terminal lifetime ───────────────────────────────────────────────────────

/// Raw mode + alternate screen, undone on drop
struct TerminalGuard {
    enhanced: bool,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("enabling raw mode")?;
        let mut guard = Self { enhanced: false };
        let mut out = io::stdout();
        execute!(out, terminal::EnterAlternateScreen, cursor::Hide)?;
        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            guard.enhanced = true;
        }
        log::info!("Terminal ready (key release events: {})", guard.enhanced);
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        if self.enhanced {
            let _ = execute!(out, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(out, style::ResetColor, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Seed for a new run
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Play until the user quits
pub fn run<G: ScoreGateway>(session: &mut Session<G>) -> Result<()> {
    let guard = TerminalGuard::enter()?;
    let (cols, rows) = terminal::size().context("reading terminal size")?;
    let mut canvas = PixelBuf::new(cols as usize, rows as usize * 2);
    let mut keys = HeldKeys::new(guard.enhanced);
    let frame_budget = session.settings().frame_duration();
    let mut out = io::BufWriter::new(io::stdout());
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        let mut pause = false;

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => {
                    match handle_key(key, &mut keys, session.is_over(), Instant::now()) {
                        Action::Quit => {
                            log::info!(
                                "{} quit with score {}",
                                session.user(),
                                session.state().score
                            );
                            return Ok(());
                        }
                        Action::Pause => pause = true,
                        Action::Restart => session.restart(clock_seed()),
                        Action::None => {}
                    }
                }
                Event::Resize(c, r) => canvas.resize(c as usize, r as usize * 2),
                _ => {}
            }
        }

        let now = Instant::now();
        let elapsed_ms = now.duration_since(last).as_secs_f32() * 1000.0;
        last = now;

        session.frame(&keys.input(now, pause), elapsed_ms);
        draw_frame(session.state(), &mut canvas, session.best_score());
        canvas.render(&mut out)?;

        if let Some(rest) = frame_budget.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }
}

// ── Login / signup ──────────────────────────────────────────────────────────

/// Where the login prompt reads its answers from
pub trait PromptInput {
    /// Next line, without the trailing newline; `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>>;

    /// A line that must not be shown as typed. Plain by default.
    fn read_secret(&mut self, _out: &mut dyn Write) -> io::Result<Option<String>> {
        self.read_line()
    }
}

impl<B: BufRead> PromptInput for io::Lines<B> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.next().transpose()
    }
}

/// Stdin; secrets are read in raw mode and echoed as `*` when stdin is a tty
pub struct ConsoleInput {
    lines: io::Lines<io::StdinLock<'static>>,
    masked: bool,
}

impl ConsoleInput {
    pub fn new() -> Self {
        let stdin = io::stdin();
        let masked = stdin.is_terminal();
        Self {
            lines: stdin.lock().lines(),
            masked,
        }
    }
}

impl Default for ConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptInput for ConsoleInput {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.lines.next().transpose()
    }

    fn read_secret(&mut self, out: &mut dyn Write) -> io::Result<Option<String>> {
        if !self.masked {
            return self.read_line();
        }
        terminal::enable_raw_mode()?;
        let secret = read_masked(out);
        terminal::disable_raw_mode()?;
        writeln!(out)?;
        secret
    }
}

/// Collect keys until Enter, echoing `*`. Esc or Ctrl-C cancels.
fn read_masked(out: &mut dyn Write) -> io::Result<Option<String>> {
    let mut secret = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(Some(secret)),
            KeyCode::Esc => return Ok(None),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(None);
            }
            KeyCode::Backspace => {
                if secret.pop().is_some() {
                    write!(out, "\u{8} \u{8}")?;
                }
            }
            KeyCode::Char(c) => {
                secret.push(c);
                write!(out, "*")?;
            }
            _ => continue,
        }
        out.flush()?;
    }
}

fn ask(
    out: &mut impl Write,
    input: &mut impl PromptInput,
    prompt: &str,
    secret: bool,
) -> Result<Option<String>> {
    write!(out, "{}", prompt)?;
    out.flush()?;
    let answer = if secret {
        input.read_secret(out)?
    } else {
        input.read_line()?
    };
    Ok(answer.map(|l| l.trim().to_string()))
}

/// Username then (masked) password; `None` if input ended
fn ask_credentials(
    out: &mut impl Write,
    input: &mut impl PromptInput,
) -> Result<Option<(String, String)>> {
    let Some(user) = ask(out, input, "Username: ", false)? else {
        return Ok(None);
    };
    let Some(password) = ask(out, input, "Password: ", true)? else {
        return Ok(None);
    };
    Ok(Some((user, password)))
}

/// Login/signup loop. Returns the logged-in username, or `None` if the user
/// quit (or input ended).
pub fn login_prompt(
    store: &mut UserStore,
    input: &mut impl PromptInput,
    mut out: impl Write,
) -> Result<Option<String>> {
    writeln!(out, "Speedy Sums")?;

    loop {
        let Some(choice) = ask(&mut out, input, "[l]ogin, [s]ignup or [q]uit: ", false)? else {
            return Ok(None);
        };
        match choice.to_lowercase().as_str() {
            "l" | "login" => {
                let Some((user, password)) = ask_credentials(&mut out, input)? else {
                    return Ok(None);
                };
                match store.login(&user, &password) {
                    Ok(()) => {
                        writeln!(
                            out,
                            "Login successful. Max score: {}",
                            store.get_best_score(&user)
                        )?;
                        return Ok(Some(user));
                    }
                    Err(e) => writeln!(out, "Error: {}", e)?,
                }
            }
            "s" | "signup" => {
                let Some((user, password)) = ask_credentials(&mut out, input)? else {
                    return Ok(None);
                };
                match store.signup(&user, &password) {
                    Ok(()) => writeln!(out, "Signup successful, you can log in now")?,
                    Err(e) => writeln!(out, "Error: {}", e)?,
                }
            }
            "q" | "quit" => return Ok(None),
            _ => writeln!(out, "Unknown choice")?,
        }
    }
}
