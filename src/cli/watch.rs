//! Watch command implementation - walk the pasture in the terminal.
//!
//! Each terminal cell shows two pixels stacked with the upper half block:
//! the foreground is the top pixel and the background the bottom one.

// Pixel sizes move between u16 cells, u32 pixels and f32 seconds
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use std::convert::Infallible;
use std::io::stdout;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use glam::UVec2;
use pasture::{FrameSink, MoveInput, Renderer, SimConfig, Simulation};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect, Size},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Widget},
};
use tracing::debug;

use super::{AssetOptions, CliError, MapOptions};

/// How long a key counts as held after its last press or repeat.
const KEY_HOLD: Duration = Duration::from_millis(150);

/// Longest step the simulation takes, so a stalled terminal doesn't teleport
/// the player.
const MAX_DT: f32 = 0.1;

/// Rows taken by the header and footer, plus the map block's border.
const CHROME_ROWS: u16 = 3 + 3 + 2;

/// Execute the watch command.
///
/// # Errors
///
/// Returns an error if the map cannot be generated, an atlas fails to load,
/// or the terminal fails.
pub(crate) fn execute(
    map: &MapOptions,
    assets: &AssetOptions,
    view: Option<(u32, u32)>,
    fps: u32,
) -> Result<(), CliError> {
    let (map, seed) = map.generate()?;
    let sim = Simulation::new(map, SimConfig::default(), seed);

    let mut renderer = Renderer::new(1, 1);
    assets.attach(&mut renderer)?;
    renderer.set_clear_color(sim.palette_for(&renderer).timberwolf);

    let mut app = App::new(sim, renderer, seed, view, fps);

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_tui(&mut terminal, &mut app);

    // Restore terminal even if the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

/// The last frame handed over by the renderer.
#[derive(Debug, Default)]
struct FrameCopy {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl FrameSink for FrameCopy {
    type Error = Infallible;

    fn present(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<(), Infallible> {
        self.width = width;
        self.height = height;
        self.rgba.clear();
        self.rgba.extend_from_slice(rgba);
        Ok(())
    }
}

/// Draws an RGBA frame with two pixels per cell.
struct PixelView<'a> {
    frame: &'a FrameCopy,
}

impl PixelView<'_> {
    fn color_at(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.frame.width || y >= self.frame.height {
            return None;
        }
        let i = (y as usize * self.frame.width as usize + x as usize) * 4;
        let p = self.frame.rgba.get(i..i + 3)?;
        Some(Color::Rgb(p[0], p[1], p[2]))
    }
}

impl Widget for PixelView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let (x, y) = (u32::from(col), u32::from(row) * 2);
                let Some(top) = self.color_at(x, y) else {
                    continue;
                };
                let bottom = self.color_at(x, y + 1).unwrap_or(Color::Reset);
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol("▀").set_fg(top).set_bg(bottom);
                }
            }
        }
    }
}

/// Arrow keys or WASD held down, tracked by when each was last seen.
#[derive(Debug, Default)]
struct HeldKeys {
    left: Option<Instant>,
    right: Option<Instant>,
    up: Option<Instant>,
    down: Option<Instant>,
}

impl HeldKeys {
    /// Record a press. Returns false if the key doesn't steer.
    fn press(&mut self, code: KeyCode, now: Instant) -> bool {
        let slot = match code {
            KeyCode::Left | KeyCode::Char('a') => &mut self.left,
            KeyCode::Right | KeyCode::Char('d') => &mut self.right,
            KeyCode::Up | KeyCode::Char('w') => &mut self.up,
            KeyCode::Down | KeyCode::Char('s') => &mut self.down,
            _ => return false,
        };
        *slot = Some(now);
        true
    }

    fn input(&self, now: Instant) -> MoveInput {
        let held = |t: Option<Instant>| t.is_some_and(|t| now.duration_since(t) < KEY_HOLD);
        MoveInput::from_keys(
            held(self.left),
            held(self.right),
            held(self.up),
            held(self.down),
        )
    }
}

/// App state for the TUI.
struct App {
    sim: Simulation,
    renderer: Renderer,
    frame: FrameCopy,
    keys: HeldKeys,
    seed: u64,
    fixed_view: Option<(u32, u32)>,
    frame_time: Duration,
    paused: bool,
    fps: f32,
    last_tick: Instant,
}

impl App {
    fn new(sim: Simulation, renderer: Renderer, seed: u64, view: Option<(u32, u32)>, fps: u32) -> Self {
        Self {
            sim,
            renderer,
            frame: FrameCopy::default(),
            keys: HeldKeys::default(),
            seed,
            fixed_view: view,
            frame_time: Duration::from_secs(1) / fps.max(1),
            paused: false,
            fps: 0.0,
            last_tick: Instant::now(),
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.keys.press(code, Instant::now()) {
            return true;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char(' ') => self.paused = !self.paused,
            KeyCode::Char('n') => {
                let show = !self.sim.config().show_names;
                self.sim.set_show_names(show);
            }
            _ => {}
        }
        true
    }

    /// Advance and redraw the off-screen frame for a terminal of `size`.
    fn tick(&mut self, size: Size) -> Result<(), CliError> {
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).as_secs_f32().min(MAX_DT);
        self.last_tick = now;
        if dt > 0.0 {
            self.fps = self.fps * 0.9 + 0.1 / dt;
        }

        let (width, height) = self.fixed_view.unwrap_or_else(|| view_for(size));
        if (width, height) != (self.renderer.width(), self.renderer.height()) {
            debug!(width, height, "viewport resized");
            self.renderer.resize(width, height);
        }

        if !self.paused {
            self.sim
                .update(dt, self.keys.input(now), UVec2::new(width, height));
        }
        self.renderer.clear();
        self.sim.draw(&mut self.renderer)?;
        match self.renderer.update(&mut self.frame) {
            Ok(()) => Ok(()),
            Err(never) => match never {},
        }
    }
}

/// Pixel viewport that fills the map block of a terminal of `size`.
fn view_for(size: Size) -> (u32, u32) {
    let cols = size.width.saturating_sub(2).max(1);
    let rows = size.height.saturating_sub(CHROME_ROWS).max(1);
    (u32::from(cols), u32::from(rows) * 2)
}

fn run_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), CliError> {
    loop {
        let started = Instant::now();
        app.tick(terminal.size()?)?;
        terminal.draw(|f| ui(f, app))?;

        let wait = app.frame_time.saturating_sub(started.elapsed());
        if event::poll(wait)?
            && let Event::Key(key) = event::read()?
            && key.kind != KeyEventKind::Release
            && !app.handle_key(key.code)
        {
            break;
        }
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(3),    // Pasture
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    let block = Block::default().borders(Borders::ALL).title(" Pasture ");
    let inner = block.inner(chunks[1]);
    f.render_widget(block, chunks[1]);
    f.render_widget(PixelView { frame: &app.frame }, inner);

    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let status = if app.paused { "PAUSED" } else { "RUNNING" };
    let sheep = app.sim.sheep().count();
    let onscreen = app.sim.onscreen_sheep().count();
    let title = format!(
        " Pasture | Seed {} | {:.0} fps | Sheep: {sheep} ({onscreen} in view) | {status} ",
        app.seed, app.fps
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let names = if app.sim.config().show_names { "on" } else { "off" };
    let controls = format!(" [q] Quit  [Space] Pause  [←↑↓→/WASD] Walk  [n] Names ({names}) ");

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}
