use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use tracing_subscriber::EnvFilter;

use pixel_morph::easing::{self, Easing};
use pixel_morph::{
    Canvas, Controls, IntervalScheduler, Mode, MorphConfig, MorphSession, ParticleView, Raster,
    RasterView, view,
};

const PALETTE: [[u8; 3]; 5] = [
    [0, 0, 0],
    [220, 40, 40],
    [40, 160, 60],
    [40, 80, 220],
    [250, 200, 40],
];

#[derive(Parser, Debug)]
#[command(name = "pixel-morph", version)]
struct Cli {
    /// Image A, the one-shot morph source.
    #[arg(long)]
    source: Option<PathBuf>,

    /// Image B, the one-shot target and the live-mode target.
    #[arg(long)]
    target: Option<PathBuf>,

    /// Raster side in pixels. A 64px image fits a 64x32 terminal area.
    #[arg(long, default_value_t = 64)]
    side: u32,

    /// One-shot morph duration in milliseconds.
    #[arg(long, default_value_t = 4000)]
    one_shot_ms: u64,

    /// Live re-match transition duration in milliseconds.
    #[arg(long, default_value_t = 2000)]
    live_ms: u64,

    /// Timing curve: linear, ease-in, ease-out, ease-in-out.
    #[arg(long, default_value = "ease-in-out", value_parser = parse_easing)]
    easing: Easing,

    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Write logs to this file. The terminal belongs to the UI.
    #[arg(long)]
    log: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `pixel_morph=trace`.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_easing(name: &str) -> Result<Easing, String> {
    easing::by_name(name).ok_or_else(|| format!("unknown easing `{name}`"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = MorphConfig {
        side: cli.side,
        one_shot_duration: Duration::from_millis(cli.one_shot_ms),
        live_duration: Duration::from_millis(cli.live_ms),
        easing: cli.easing,
        fps: cli.fps,
    };
    let mut app = App::new(config);
    app.load(&cli)?;

    enable_raw_mode()?;
    crossterm::execute!(io::stdout(), EnterAlternateScreen)?;

    let result = run(&mut app);

    disable_raw_mode()?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)?;

    result
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let Some(path) = &cli.log else {
        return Ok(());
    };

    let file =
        File::create(path).with_context(|| format!("create log file {}", path.display()))?;
    let filter = EnvFilter::try_new(&cli.log_level).context("parse --log-level")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

struct App {
    session: MorphSession<IntervalScheduler>,
    canvas: Canvas,
    cursor: (u32, u32),
    pen_down: bool,
    color: usize,
    notice: Option<String>,
}

impl App {
    fn new(config: MorphConfig) -> Self {
        let scheduler = IntervalScheduler::new(config.frame_interval());
        let side = config.side;

        Self {
            session: MorphSession::new(config, scheduler),
            canvas: Canvas::new(side),
            cursor: (side / 2, side / 2),
            pen_down: false,
            color: 0,
            notice: None,
        }
    }

    fn load(&mut self, cli: &Cli) -> anyhow::Result<()> {
        let side = self.session.config().side;

        if let Some(path) = &cli.source {
            let raster = Raster::open(path, side)
                .with_context(|| format!("load source image {}", path.display()))?;
            self.session.load_source(raster);
        }

        if let Some(path) = &cli.target {
            let raster = Raster::open(path, side)
                .with_context(|| format!("load target image {}", path.display()))?;
            self.session.load_target(raster.clone());
            self.session.load_live_target(raster);
        }

        Ok(())
    }

    /// Returns `false` when the user asked to quit.
    fn on_key(&mut self, code: KeyCode) -> bool {
        self.notice = None;

        let result = match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,

            KeyCode::Char('u') => {
                self.session.switch_mode(Mode::Upload);
                Ok(())
            }

            KeyCode::Char('d') => {
                self.session.switch_mode(Mode::Draw);
                Ok(())
            }

            KeyCode::Char('s') if self.session.mode() == Mode::Upload => {
                self.session.start_one_shot().map(drop)
            }

            KeyCode::Char('r') => {
                match self.session.mode() {
                    Mode::Upload => self.session.reset(),
                    Mode::Draw => {
                        self.session.reset_live();
                        self.canvas.clear();
                    }
                }
                Ok(())
            }

            KeyCode::Char('l') if self.session.mode() == Mode::Draw => {
                if self.session.controls().stop_live {
                    self.session.stop_live();
                    Ok(())
                } else {
                    self.session.start_live(self.canvas.raster()).map(drop)
                }
            }

            KeyCode::Char('c') if self.session.mode() == Mode::Draw => {
                self.canvas.clear();
                self.drawing_changed()
            }

            KeyCode::Char('x') => {
                self.color = (self.color + 1) % PALETTE.len();
                self.canvas.brush.color = PALETTE[self.color];
                Ok(())
            }

            KeyCode::Char('+') => {
                self.canvas.brush.size = (self.canvas.brush.size + 1.0).min(50.0);
                Ok(())
            }

            KeyCode::Char('-') => {
                self.canvas.brush.size = (self.canvas.brush.size - 1.0).max(1.0);
                Ok(())
            }

            KeyCode::Char(' ') if self.session.mode() == Mode::Draw => {
                self.pen_down = !self.pen_down;

                if self.pen_down {
                    self.paint_to(self.cursor)
                } else {
                    Ok(())
                }
            }

            KeyCode::Left => self.move_cursor(-1, 0),
            KeyCode::Right => self.move_cursor(1, 0),
            KeyCode::Up => self.move_cursor(0, -1),
            KeyCode::Down => self.move_cursor(0, 1),

            _ => Ok(()),
        };

        if let Err(err) = result {
            tracing::warn!(error = %err, "action failed");
            self.notice = Some(err.to_string());
        }

        true
    }

    fn move_cursor(&mut self, dx: i64, dy: i64) -> pixel_morph::MorphResult<()> {
        let max = i64::from(self.canvas.side().saturating_sub(1));
        let next = (
            (i64::from(self.cursor.0) + dx).clamp(0, max) as u32,
            (i64::from(self.cursor.1) + dy).clamp(0, max) as u32,
        );

        if self.pen_down && self.session.mode() == Mode::Draw {
            self.paint_to(next)?;
        } else {
            self.cursor = next;
        }

        Ok(())
    }

    fn paint_to(&mut self, next: (u32, u32)) -> pixel_morph::MorphResult<()> {
        let center = |(x, y): (u32, u32)| (x as f32 + 0.5, y as f32 + 0.5);
        self.canvas.stroke(center(self.cursor), center(next));
        self.cursor = next;
        self.drawing_changed()
    }

    fn drawing_changed(&mut self) -> pixel_morph::MorphResult<()> {
        self.session.source_changed(self.canvas.raster()).map(drop)
    }
}

fn run(app: &mut App) -> anyhow::Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.draw(|f| ui(f, app))?;

    loop {
        let timeout = app.session.animator().scheduler().until_next_frame();
        let mut dirty = false;

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if !app.on_key(key.code) {
                        break;
                    }
                    dirty = true;
                }
            }
        }

        if app.session.pump().is_some() {
            dirty = true;
        }

        if dirty {
            terminal.draw(|f| ui(f, app))?;
        }
    }

    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .split(f.area());

    header(f, rows[0], app.session.mode(), app.session.controls());

    let side = app.session.config().side;
    let (w, _) = view::cell_size(side);

    match app.session.mode() {
        Mode::Upload => {
            f.render_widget(ParticleView::new(app.session.particles(), side), rows[1]);
        }

        Mode::Draw => {
            let cols = Layout::horizontal([
                Constraint::Length(w),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(rows[1]);

            f.render_widget(RasterView::new(app.canvas.raster()), cols[0]);
            draw_cursor(f.buffer_mut(), cols[0], app.cursor, app.pen_down);
            f.render_widget(ParticleView::new(app.session.particles(), side), cols[2]);
        }
    }

    let status = match &app.notice {
        Some(notice) => notice.clone(),
        None => app.session.status().to_string(),
    };
    f.render_widget(
        Paragraph::new(status).style(Style::new().fg(Color::Gray)),
        rows[2],
    );
}

fn header(f: &mut Frame, area: Rect, mode: Mode, controls: Controls) {
    let keys: &[(&str, bool)] = match mode {
        Mode::Upload => &[
            ("s start", controls.start),
            ("r reset", controls.reset),
            ("d draw mode", true),
            ("q quit", true),
        ],
        Mode::Draw => &[
            ("arrows move", true),
            ("space pen", true),
            ("l live", controls.start_live || controls.stop_live),
            ("c clear", true),
            ("x color", true),
            ("+/- size", true),
            ("r reset", controls.reset),
            ("u upload mode", true),
            ("q quit", true),
        ],
    };

    let mut spans = vec![Span::raw("pixel-morph ")];
    for &(label, enabled) in keys {
        let style = if enabled {
            Style::new().fg(Color::DarkGray)
        } else {
            Style::new().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
        };
        spans.push(Span::styled(format!(" [{label}]"), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_cursor(buf: &mut Buffer, area: Rect, cursor: (u32, u32), pen_down: bool) {
    let col = cursor.0 as u16;
    let row = (cursor.1 / 2) as u16;

    if col >= area.width || row >= area.height {
        return;
    }

    let color = if pen_down { Color::Red } else { Color::Magenta };
    let cell = &mut buf[(area.x + col, area.y + row)];

    if cursor.1 % 2 == 0 {
        cell.set_fg(color);
    } else {
        cell.set_bg(color);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;

    use super::*;

    fn app() -> App {
        App::new(MorphConfig {
            side: 4,
            ..MorphConfig::default()
        })
    }

    #[test]
    fn live_key_toggles_from_controls() {
        let mut app = app();
        app.session.load_live_target(Raster::filled(4, 4, [9, 9, 9]));

        assert!(app.on_key(KeyCode::Char('d')));
        app.on_key(KeyCode::Char('l'));
        assert!(app.session.is_live());
        assert!(app.session.controls().stop_live);

        app.on_key(KeyCode::Char('l'));
        assert!(!app.session.is_live());
        assert!(app.session.controls().start_live);
        assert!(app.notice.is_none());
    }

    #[test]
    fn header_crosses_out_unavailable_actions() {
        let app = app();
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();

        terminal
            .draw(|f| header(f, f.area(), Mode::Upload, app.session.controls()))
            .unwrap();

        let buf = terminal.backend().buffer();
        // " [s start]" follows the 12-column title.
        assert_eq!(buf[(14, 0)].symbol(), "s");
        assert!(buf[(14, 0)].modifier.contains(Modifier::CROSSED_OUT));
        // " [r reset]" follows it.
        assert_eq!(buf[(24, 0)].symbol(), "r");
        assert!(!buf[(24, 0)].modifier.contains(Modifier::CROSSED_OUT));
    }
}
