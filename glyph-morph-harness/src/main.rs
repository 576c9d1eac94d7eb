use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};
use tracing::Level;

use glyph_morph::direction::Direction;
use glyph_morph::display::{self, GridView};
use glyph_morph::font::{BitmapFont, Rasterize};
use glyph_morph::grid::{self, Grid};
use glyph_morph::params::MorphParams;
use glyph_morph::phase::{self, MAX_SPEED, MIN_SPEED, PhaseClock};
use glyph_morph::registry::Registry;

const SPEED_STEP: u32 = 10;

#[derive(Parser, Debug)]
#[command(
    name = "glyph-morph",
    version,
    about = "Morph between two rendered texts in the terminal"
)]
struct Cli {
    /// Params file, read at startup and written with `s`
    #[arg(long, default_value = "glyph-morph.json")]
    params: PathBuf,

    #[arg(long)]
    text1: Option<String>,

    #[arg(long)]
    text2: Option<String>,

    #[arg(long)]
    style: Option<String>,

    #[arg(long)]
    direction: Option<Direction>,

    /// BDF font to rasterize with instead of the built-in 5×7 digits
    #[arg(long, value_name = "BDF")]
    font: Option<PathBuf>,

    /// Fixed seed for the flicker noise
    #[arg(long)]
    seed: Option<u64>,

    /// Print the frame at this phase and exit
    #[arg(long, value_name = "PHASE")]
    once: Option<f64>,

    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut app = App::new(&cli)?;

    if let Some(phase) = cli.once {
        println!("{}", display::to_half_blocks(&app.frame_at(phase)));
        return Ok(());
    }

    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        hook(info);
    }));

    enable_raw_mode()?;
    crossterm::execute!(io::stdout(), EnterAlternateScreen)?;

    let result = run(&mut app);

    restore_terminal()?;

    result
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
}

/// The TUI owns stdout, so interactive runs only log to a file.
fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };

    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if cli.once.is_some() {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .init();
    }

    Ok(())
}

fn run(app: &mut App) -> anyhow::Result<()> {
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    let mut last_tick = Instant::now();

    loop {
        let grid = app.frame();
        terminal.draw(|f| app.draw(f, &grid))?;

        let interval = phase::tick_interval(app.params.speed);
        let timeout = interval.saturating_sub(last_tick.elapsed());

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !app.handle_key(key.code)? {
                    break;
                }
            }
        }

        if last_tick.elapsed() >= interval {
            app.tick()?;
            last_tick = Instant::now();
        }
    }

    Ok(())
}

struct App {
    registry: Registry,
    params: MorphParams,
    params_path: PathBuf,
    font: Box<dyn Rasterize>,
    rng: StdRng,
    clock: PhaseClock,
    first: Grid,
    second: Grid,
    increment: i64,
    paused: bool,
    status: String,
}

impl App {
    fn new(cli: &Cli) -> anyhow::Result<Self> {
        let registry = Registry::builtin();

        let mut params = MorphParams::load(&cli.params)
            .with_context(|| format!("loading params from {}", cli.params.display()))?;

        if let Some(text) = &cli.text1 {
            params.text1 = text.clone();
        }
        if let Some(text) = &cli.text2 {
            params.text2 = text.clone();
        }
        if let Some(style) = &cli.style {
            params.style = style.clone();
        }
        if let Some(direction) = cli.direction {
            params.direction = direction;
        }

        if registry.get(&params.style).is_none() {
            let fallback = registry.default_name()?;
            tracing::warn!(style = %params.style, fallback, "unknown style");
            params.style = fallback.to_string();
        }

        let font: Box<dyn Rasterize> = match &cli.font {
            Some(path) => {
                let source = std::fs::read_to_string(path)
                    .with_context(|| format!("reading font {}", path.display()))?;
                Box::new(BitmapFont::parse_bdf(&source)?)
            }
            None => Box::new(BitmapFont::builtin()),
        };

        let rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut app = Self {
            registry,
            clock: PhaseClock::new(params.pingpong),
            params,
            params_path: cli.params.clone(),
            font,
            rng,
            first: Grid::default(),
            second: Grid::default(),
            increment: 0,
            paused: false,
            status: String::new(),
        };
        app.rasterize()?;

        tracing::info!(
            text1 = %app.params.text1,
            text2 = %app.params.text2,
            style = %app.params.style,
            "starting"
        );

        Ok(app)
    }

    fn rasterize(&mut self) -> anyhow::Result<()> {
        self.first = prepare(self.font.as_ref(), &self.params.text1)?;
        self.second = prepare(self.font.as_ref(), &self.params.text2)?;
        Ok(())
    }

    fn frame_at(&mut self, raw_phase: f64) -> Grid {
        glyph_morph::morph(
            &self.registry,
            &self.first,
            &self.second,
            self.params.shaped_phase(raw_phase),
            &self.params.style,
            &self.params.options(),
            &mut self.rng,
        )
    }

    fn frame(&mut self) -> Grid {
        self.frame_at(self.clock.phase())
    }

    fn tick(&mut self) -> anyhow::Result<()> {
        if self.paused {
            return Ok(());
        }

        if self.clock.cycle_ending() && self.increment != 0 {
            self.params.advance_counter(self.increment);
            self.rasterize()?;
            tracing::debug!(
                text1 = %self.params.text1,
                text2 = %self.params.text2,
                "counter advanced"
            );
        }

        self.clock.advance();
        Ok(())
    }

    /// Returns `false` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> anyhow::Result<bool> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(false),

            KeyCode::Left => self.cycle_style(-1),
            KeyCode::Right => self.cycle_style(1),

            KeyCode::Char('d') => self.params.direction = self.params.direction.cycle(),

            KeyCode::Char('p') => {
                self.params.pingpong = !self.params.pingpong;
                self.clock.pingpong = self.params.pingpong;
            }

            KeyCode::Up => {
                self.params.speed = self.params.speed.saturating_add(SPEED_STEP).min(MAX_SPEED);
            }
            KeyCode::Down => {
                self.params.speed = self.params.speed.saturating_sub(SPEED_STEP).max(MIN_SPEED);
            }

            KeyCode::Char(c @ '1'..='3') => self.cycle_curve(c as usize - '1' as usize),
            KeyCode::Char('!') => self.toggle_invert(0),
            KeyCode::Char('@') => self.toggle_invert(1),
            KeyCode::Char('#') => self.toggle_invert(2),

            KeyCode::Char(' ') => self.paused = !self.paused,

            KeyCode::Char('-') => self.increment = -1,
            KeyCode::Char('0') => self.increment = 0,
            KeyCode::Char('+') | KeyCode::Char('=') => self.increment = 1,

            KeyCode::Char('s') => self.save(),

            _ => {}
        }

        Ok(true)
    }

    fn cycle_style(&mut self, step: isize) {
        if let Some(name) = self.registry.cycle(&self.params.style, step) {
            self.params.style = name.to_string();
        }
    }

    fn cycle_curve(&mut self, slot: usize) {
        if let Some(setting) = self.params.mapping_mut(slot) {
            setting.name = setting.to_shaped().curve.cycle().name().to_string();
        }
    }

    fn toggle_invert(&mut self, slot: usize) {
        if let Some(setting) = self.params.mapping_mut(slot) {
            setting.invert_in = !setting.invert_in;
        }
    }

    fn save(&mut self) {
        self.status = match self.params.save(&self.params_path) {
            Ok(()) => format!("saved {}", self.params_path.display()),
            Err(err) => {
                tracing::error!(%err, "saving params");
                format!("save failed: {err}")
            }
        };
    }

    fn draw(&self, f: &mut Frame, grid: &Grid) {
        let cols = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(34),
        ])
        .split(f.area());

        let block = Block::bordered()
            .title(format!(" {} → {} ", self.params.text1, self.params.text2));
        let inner = block.inner(cols[0]);
        f.render_widget(block, cols[0]);

        let view = GridView::new(grid).color(display::parse_color(&self.params.color));
        f.render_widget(view, centered(inner, view.cell_size()));

        f.render_widget(
            Paragraph::new(self.panel_lines()).block(Block::bordered().title(" Params ")),
            cols[1],
        );
    }

    fn panel_lines(&self) -> Vec<Line<'static>> {
        let hint = Style::new().fg(Color::DarkGray);
        let params = &self.params;

        let mut lines = vec![
            Line::from(format!("style      {}", params.style)),
            Line::from(format!("direction  {}", params.direction)),
            Line::from(format!("speed      {}", params.speed)),
            Line::from(format!("pingpong   {}", params.pingpong)),
            Line::from(format!("stay       {:.2} / {:.2}", params.stay_start, params.stay_end)),
            Line::from(format!("counter    {:+}", self.increment)),
            Line::from(""),
        ];

        if let Some(style) = self.registry.get(&params.style) {
            let curves = params.curves();

            for (slot, name) in style.slot_names().enumerate() {
                let curve = &curves[slot];
                let flags = match (curve.invert_input, curve.invert_output) {
                    (false, false) => "",
                    (true, false) => " (in)",
                    (false, true) => " (out)",
                    (true, true) => " (in, out)",
                };

                lines.push(Line::from(format!("{}. {name}", slot + 1)));
                lines.push(Line::from(format!("   {}{flags}", curve.curve)));
            }
        }

        if self.paused {
            lines.push(Line::from(""));
            lines.push(Line::from("paused"));
        }

        if !self.status.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(self.status.clone()));
        }

        lines.push(Line::from(""));
        for help in [
            "←/→ style  d direction",
            "↑/↓ speed  p pingpong",
            "1-3 curve  !@# invert",
            "-/0/+ counter  space pause",
            "s save  q quit",
        ] {
            lines.push(Line::styled(help, hint));
        }

        lines
    }
}

fn prepare(font: &dyn Rasterize, text: &str) -> anyhow::Result<Grid> {
    let rendered = font
        .render(text)
        .with_context(|| format!("rendering {text:?}"))?;

    Ok(grid::pad_rows(&grid::trim_empty_rows(&rendered), 1))
}

fn centered(area: Rect, (width, height): (u16, u16)) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
