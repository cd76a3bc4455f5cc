mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use dowquiz::{
    config::{Config, ConfigStore, FileConfigStore},
    plan::{build_plan, DateFields, GameMode, PlanOptions, TimedVariant},
    runtime::{CrosstermEventSource, FixedTicker, QuizEvent, Runner},
    session::{Phase, QuizSession},
    Weekday,
};
use env_logger::{Env, Target};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::OpenOptions,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};

/// drill for naming the day of the week of any date in your head
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal quiz that shows you a calendar date and asks which day of the week it fell on. Pick a mode, answer with the number keys, and see how fast and accurate your mental calendar is."
)]
pub struct Cli {
    /// mode to start straight away instead of showing the setup menu
    #[clap(short = 'm', long, value_enum)]
    mode: Option<ModeArg>,

    /// first year of the century to draw dates from (e.g. 1900 for 1900-1999)
    #[clap(short = 'c', long)]
    century: Option<i32>,

    /// earliest year within the century
    #[clap(long)]
    from: Option<i32>,

    /// latest year within the century
    #[clap(long)]
    to: Option<i32>,

    /// date to practice in custom mode, as YYYY-MM-DD
    #[clap(short = 'd', long, value_parser = parse_date_fields)]
    date: Option<DateFields>,

    /// number of questions in the timed modes (1-100)
    #[clap(short = 'q', long)]
    questions: Option<u32>,

    /// seconds allowed per question in speed mode
    #[clap(long)]
    speed_limit: Option<f64>,

    /// seconds allowed per question in blitz mode (must be below the speed limit)
    #[clap(long)]
    blitz_limit: Option<f64>,

    /// remember these options as the defaults for future runs
    #[clap(long)]
    save_config: bool,

    /// write logs to this file (level set by RUST_LOG, default info)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Quick,
    Standard,
    Challenge,
    Endless,
    Speed,
    Blitz,
    Custom,
    LeapYear,
    Historical,
}

impl From<ModeArg> for GameMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Quick => GameMode::Quick,
            ModeArg::Standard => GameMode::Standard,
            ModeArg::Challenge => GameMode::Challenge,
            ModeArg::Endless => GameMode::Endless,
            ModeArg::Speed => GameMode::Timed(TimedVariant::Speed),
            ModeArg::Blitz => GameMode::Timed(TimedVariant::Blitz),
            ModeArg::Custom => GameMode::CustomPractice,
            ModeArg::LeapYear => GameMode::LeapYear,
            ModeArg::Historical => GameMode::HistoricalEvents,
        }
    }
}

/// Splits `YYYY-MM-DD` without judging the values; range checks happen when the plan is built
fn parse_date_fields(s: &str) -> Result<DateFields, String> {
    let parts: Vec<&str> = s.trim().split('-').collect();
    let [y, m, d] = parts.as_slice() else {
        return Err(format!("expected YYYY-MM-DD, got '{s}'"));
    };
    let num = |field: &str, name: &str| {
        field
            .parse::<i64>()
            .map_err(|_| format!("{name} '{field}' is not a number"))
    };
    Ok(DateFields {
        year: num(*y, "year")?.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
        month: num(*m, "month")?.clamp(0, u32::MAX as i64) as u32,
        day: num(*d, "day")?.clamp(0, u32::MAX as i64) as u32,
    })
}

fn secs_to_ms(secs: f64) -> Option<u64> {
    match Duration::try_from_secs_f64(secs) {
        Ok(d) => Some(d.as_millis() as u64),
        Err(e) => {
            log::warn!("ignoring time limit {}: {}", secs, e);
            None
        }
    }
}

impl Cli {
    /// Layers the command-line overrides on top of the stored defaults
    fn plan_options(&self, mut config: Config) -> PlanOptions {
        if let Some(century) = self.century {
            config.century = century;
            config.year_from = None;
            config.year_to = None;
        }
        if self.from.is_some() {
            config.year_from = self.from;
        }
        if self.to.is_some() {
            config.year_to = self.to;
        }
        if let Some(q) = self.questions {
            config.speed_questions = q;
            config.blitz_questions = q;
        }
        if let Some(ms) = self.speed_limit.and_then(secs_to_ms) {
            config.speed_limit_ms = ms;
        }
        if let Some(ms) = self.blitz_limit.and_then(secs_to_ms) {
            config.blitz_limit_ms = ms;
        }

        let mut options = config.plan_options();
        options.custom_date = self.date;
        options
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Setup,
    Quiz,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub session: QuizSession,
    pub options: PlanOptions,
    pub selected: usize,
    pub screen: AppScreen,
    /// One-line message shown on the setup screen
    pub status: Option<String>,
    /// Instant of the last event, used when rendering live timers
    pub now: Instant,
}

impl App {
    pub fn new(options: PlanOptions, now: Instant) -> Self {
        Self {
            session: QuizSession::new(),
            options,
            selected: 0,
            screen: AppScreen::Setup,
            status: None,
            now,
        }
    }

    pub fn selected_mode(&self) -> GameMode {
        GameMode::ALL[self.selected % GameMode::ALL.len()]
    }

    pub fn select_mode(&mut self, mode: GameMode) {
        if let Some(idx) = GameMode::ALL.iter().position(|m| *m == mode) {
            self.selected = idx;
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.now = now;
        let plan = match build_plan(self.selected_mode(), &self.options) {
            Ok(plan) => plan,
            Err(e) => {
                log::warn!("cannot start {}: {}", self.selected_mode(), e);
                self.status = Some(match self.selected_mode() {
                    GameMode::CustomPractice => format!("{e} (pass --date YYYY-MM-DD)"),
                    _ => e.to_string(),
                });
                self.screen = AppScreen::Setup;
                return;
            }
        };
        // a finished session is restarted; an abandoned one is already idle
        match self.session.start(plan, now) {
            Ok(_) => {
                self.status = None;
                self.screen = AppScreen::Quiz;
            }
            Err(e) => {
                log::error!("{}", e);
                debug_assert!(false, "{e}");
            }
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.now = now;
        if self.session.tick(now).is_some() {
            self.after_resolve();
        }
    }

    pub fn answer(&mut self, day: Weekday, now: Instant) {
        self.now = now;
        if self.session.phase() != Phase::Answering {
            return;
        }
        match self.session.submit_answer(day, now) {
            Ok(_) => self.after_resolve(),
            Err(e) => {
                log::error!("{}", e);
                debug_assert!(false, "{e}");
            }
        }
    }

    pub fn next(&mut self, now: Instant) {
        self.now = now;
        if self.session.phase() != Phase::Resolved {
            return;
        }
        if let Err(e) = self.session.request_next(now) {
            log::error!("{}", e);
            debug_assert!(false, "{e}");
        }
    }

    pub fn back(&mut self) {
        self.session.go_back();
        self.screen = AppScreen::Setup;
    }

    // Custom practice goes straight back to setup with its feedback instead of a report.
    fn after_resolve(&mut self) {
        if self.session.phase() != Phase::Finished {
            return;
        }
        if self.selected_mode() == GameMode::CustomPractice {
            self.status = self.session.last_record().map(|r| {
                format!("{}: {}", r.date, r.feedback())
            });
            self.session.go_back();
            self.screen = AppScreen::Setup;
        } else {
            self.screen = AppScreen::Results;
        }
    }
}

fn day_for_key(c: char) -> Option<Weekday> {
    let idx = c.to_digit(10)?.checked_sub(1)?;
    Weekday::from_index(idx as u8)
}

fn handle_key(app: &mut App, key: KeyEvent, now: Instant) -> Flow {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Flow::Quit;
    }

    match app.screen {
        AppScreen::Setup => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Up | KeyCode::Char('k') => {
                app.selected = (app.selected + GameMode::ALL.len() - 1) % GameMode::ALL.len();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.selected = (app.selected + 1) % GameMode::ALL.len();
            }
            KeyCode::Enter | KeyCode::Char(' ') => app.start(now),
            _ => {}
        },
        AppScreen::Quiz => match key.code {
            KeyCode::Esc | KeyCode::Backspace => app.back(),
            KeyCode::Enter | KeyCode::Right | KeyCode::Char(' ') | KeyCode::Char('n') => {
                app.next(now)
            }
            KeyCode::Char(c) => {
                if let Some(day) = day_for_key(c) {
                    app.answer(day, now);
                }
            }
            _ => {}
        },
        AppScreen::Results => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Char('r') => app.start(now),
            KeyCode::Char('n') | KeyCode::Backspace => app.back(),
            _ => {}
        },
    }
    Flow::Continue
}

fn init_logging(log_file: Option<&PathBuf>) -> io::Result<()> {
    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            env_logger::Builder::from_env(Env::default().default_filter_or("info"))
                .target(Target::Pipe(Box::new(file)))
                .init();
        }
        // stderr would draw over the alternate screen
        None => env_logger::Builder::from_env(Env::default().default_filter_or("off")).init(),
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let store = FileConfigStore::new();
    let options = cli.plan_options(store.load());
    if cli.save_config {
        store.save(&Config::from(&options))?;
        log::info!("saved defaults to {}", store.path().display());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(options, Instant::now());
    if let Some(mode) = cli.mode {
        app.select_mode(mode.into());
        app.start(Instant::now());
    }
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| ui(app, f))?;
    loop {
        match runner.step() {
            QuizEvent::Tick(now) => {
                app.on_tick(now);
                if app.screen == AppScreen::Quiz {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            QuizEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            QuizEvent::Key(key) => {
                if handle_key(app, key, Instant::now()) == Flow::Quit {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
