use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing_subscriber::EnvFilter;

use mathdrill::app::App;
use mathdrill::clock::SystemClock;
use mathdrill::config::Config;
use mathdrill::event::{AppEvent, EVENT_POLL_MS, EventHandler};
use mathdrill::preset::Preset;
use mathdrill::session::controller::{Screen, SessionController};
use mathdrill::sound::{Muted, SoundSink, TerminalBell};
use mathdrill::store::{self, Storage, StorageBackend};
use mathdrill::ui::components::countdown_view::CountdownView;
use mathdrill::ui::components::drill_view::DrillView;
use mathdrill::ui::components::exit_modal::ExitModal;
use mathdrill::ui::components::history_list::HistoryList;
use mathdrill::ui::components::home::HomeScreen;
use mathdrill::ui::components::results::ResultsScreen;
use mathdrill::ui::layout::{AppLayout, centered_rect, pack_hint_lines};

const LOG_FILE: &str = "mathdrill.log";

#[derive(Parser)]
#[command(name = "mathdrill", version, about = "Timed mental arithmetic drills in the terminal")]
struct Cli {
    #[arg(long, help = "Keep progress in memory only; nothing is written to disk")]
    ephemeral: bool,

    #[arg(long, help = "Directory for saved progress and the log file")]
    data_dir: Option<PathBuf>,

    #[arg(long, help = "Never ring the terminal bell")]
    no_bell: bool,

    #[arg(long, help = "Seed the problem generator for a reproducible drill")]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    if cli.ephemeral {
        config.storage = StorageBackend::Memory;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir.to_string_lossy().to_string();
    }
    if cli.no_bell {
        config.terminal_bell = false;
    }

    let data_dir = config.data_dir();
    init_logging(&config.log_filter, &data_dir);
    if let Some(e) = config_error {
        tracing::warn!(
            path = %Config::config_path().display(),
            error = %e,
            "config unreadable, using defaults"
        );
    }

    let storage = Storage::new(store::open_backend(config.storage, &data_dir));
    let sounds: Box<dyn SoundSink> = if config.terminal_bell {
        Box::new(TerminalBell)
    } else {
        Box::new(Muted)
    };
    let mut controller = SessionController::new(
        Preset::quick_drill(),
        storage,
        sounds,
        Box::new(SystemClock),
    )
    .with_feedback_ms(config.feedback_ms);
    if let Some(seed) = cli.seed {
        controller = controller.with_seed(seed);
    }
    let mut app = App::new(controller);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(EVENT_POLL_MS));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "terminal loop failed");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// The screen belongs to the UI, so logs go to a file. No file, no logs.
fn init_logging(filter: &str, data_dir: &Path) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let file = fs::create_dir_all(data_dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(data_dir.join(LOG_FILE))
    });
    if let Ok(file) = file {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .try_init();
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    let mut last = Instant::now();
    loop {
        terminal.draw(|frame| render(frame, app))?;

        let event = events.next()?;

        // Time first, so a keypress lands on up-to-date state
        let now = Instant::now();
        app.advance(now.duration_since(last));
        last = now;

        match event {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick | AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen() {
        Screen::Home => handle_home_key(app, key),
        Screen::Countdown => handle_countdown_key(app, key),
        Screen::Drill if app.controller.exit_modal_open() => handle_exit_modal_key(app, key),
        Screen::Drill => handle_drill_key(app, key),
        Screen::Results => handle_results_key(app, key),
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => app.start_drill(),
        KeyCode::Char('h') => app.toggle_history(),
        KeyCode::Char('m') => app.toggle_sound(),
        KeyCode::Char('t') => app.cycle_theme(),
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

fn handle_countdown_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char(' ') {
        app.skip_countdown();
    }
}

fn handle_drill_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_input(),
        KeyCode::Tab => app.skip_problem(),
        KeyCode::Esc => app.request_exit(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(ch) => app.type_char(ch),
        _ => {}
    }
}

fn handle_exit_modal_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') => app.confirm_exit(),
        KeyCode::Char('n') | KeyCode::Esc | KeyCode::Enter => app.cancel_exit(),
        _ => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') | KeyCode::Enter => app.start_drill(),
        KeyCode::Char('q') | KeyCode::Esc => app.go_home(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area);
    render_header(frame, app, layout.header);

    match app.screen() {
        Screen::Home => render_home(frame, app, layout.main),
        Screen::Countdown => render_countdown(frame, app, layout.main),
        Screen::Drill => render_drill(frame, app, layout.main),
        Screen::Results => render_results(frame, app, layout.main),
    }

    render_footer(frame, app, layout.footer);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let controller = &app.controller;

    let mut info = format!(" {} ", controller.preset().name);
    if controller.storage().backend_name() == "memory" {
        info.push_str("| progress not saved ");
    }
    if !controller.sound_enabled() {
        info.push_str("| muted ");
    }

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " mathdrill ",
            Style::default()
                .fg(colors.bg())
                .bg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(info, Style::default().fg(colors.muted())),
    ]))
    .block(Block::bordered().border_style(Style::default().fg(colors.border())));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let hints: &[&str] = match app.screen() {
        Screen::Home => &[
            "[Enter] Start",
            "[h] History",
            "[m] Sound",
            "[t] Theme",
            "[q] Quit",
        ],
        Screen::Countdown => &["[Space] Skip countdown"],
        Screen::Drill if app.controller.exit_modal_open() => &["[y] Leave", "[n/Esc] Resume"],
        Screen::Drill => &["[Enter] Submit", "[Tab] Skip", "[Esc] Leave"],
        Screen::Results => &["[r/Enter] Retry", "[q/Esc] Home"],
    };
    let lines: Vec<Line> = pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .map(|line| {
            Line::from(Span::styled(
                line,
                Style::default().fg(app.theme.colors.muted()),
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_home(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let controller = &app.controller;
    let home = HomeScreen::new(
        controller.preset(),
        controller.home_stats(),
        controller.sound_enabled(),
        app.theme_preference,
        &app.theme,
    );

    if app.history_expanded {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(16), Constraint::Min(4)])
            .split(area);
        frame.render_widget(&home, split[0]);
        frame.render_widget(
            HistoryList::new(&controller.home_stats().history, &app.theme),
            split[1],
        );
    } else {
        frame.render_widget(&home, centered_rect(60, 80, 56, 16, area));
    }
}

fn render_countdown(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    if let Some(countdown) = app.controller.countdown()
        && let Some(step) = countdown.current()
    {
        frame.render_widget(CountdownView::new(step, countdown.index(), &app.theme), area);
    }
}

fn render_drill(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let controller = &app.controller;
    let Some(drill) = controller.drill() else {
        return;
    };

    let fraction = controller
        .timer()
        .map_or(0.0, |timer| timer.fraction_remaining());
    let view = DrillView::new(drill, &app.input, &app.theme)
        .feedback(controller.feedback())
        .timer(fraction, controller.timer_level());
    frame.render_widget(view, centered_rect(60, 100, 40, 13, area));

    if controller.exit_modal_open() {
        let modal = ExitModal::new(drill.score, drill.answered(), &app.theme);
        frame.render_widget(modal, centered_rect(50, 40, 48, 9, area));
    }
}

fn render_results(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    if let Some(outcome) = app.controller.outcome() {
        frame.render_widget(
            ResultsScreen::new(outcome, &app.theme),
            centered_rect(60, 90, 56, 17, area),
        );
    }
}
