use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

use skriv::app::App;
use skriv::clock::SystemClock;
use skriv::config::{ConfigStore, FileConfigStore};
use skriv::drafts::DraftStore;
use skriv::runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner, TICK_RATE_MS};
use skriv::{ui, util};

/// distraction-free freewriting with a session timer
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A distraction-free freewriting TUI. Sessions run against a countdown, \
                  drafts autosave every minute, and backspace is disabled by default so \
                  you keep moving forward."
)]
pub struct Cli {
    /// session length in minutes
    #[clap(short = 'm', long)]
    minutes: Option<u64>,

    /// word goal shown in the progress bar
    #[clap(short = 'g', long)]
    goal: Option<usize>,

    /// seconds between autosaves
    #[clap(long)]
    autosave_secs: Option<u64>,

    /// allow backspace while writing
    #[clap(long)]
    allow_backspace: bool,

    /// colour theme to start with
    #[clap(short = 't', long)]
    theme: Option<String>,

    /// directory to keep draft snapshots in
    #[clap(short = 'd', long)]
    drafts_dir: Option<PathBuf>,

    /// persist the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,

    /// print the draft history and exit
    #[clap(long)]
    list_drafts: bool,

    /// text file to load into the editor at startup
    file: Option<PathBuf>,
}

impl Cli {
    /// Overlay command-line flags on the stored configuration
    fn apply(&self, config: &mut skriv::Config) {
        if let Some(minutes) = self.minutes {
            config.session_minutes = minutes;
        }
        if let Some(goal) = self.goal {
            config.word_goal = goal;
        }
        if let Some(secs) = self.autosave_secs {
            config.autosave_secs = secs;
        }
        if self.allow_backspace {
            config.lock_backspace = false;
        }
        if let Some(theme) = &self.theme {
            config.theme = theme.clone();
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();
    cli.apply(&mut config);
    if let Err(e) = config.validate() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, e).exit();
    }

    let store = match &cli.drafts_dir {
        Some(dir) => DraftStore::new(dir),
        None => DraftStore::default_location(),
    };

    if cli.list_drafts {
        print_drafts(&store)?;
        return Ok(());
    }

    if cli.save_config {
        config_store.save(&config)?;
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::new(SystemClock, config, store);
    if let Some(path) = &cli.file {
        let content = std::fs::read_to_string(path)?;
        app.editor.load(&content);
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App<SystemClock>,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        match runner.step() {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
            AppEvent::Key(key) => app.handle_key(key),
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn print_drafts(store: &DraftStore) -> Result<(), Box<dyn Error>> {
    let now = chrono::Local::now();
    for meta in store.list()? {
        let when = match &meta.created {
            Some(dt) => format!("{} ({})", util::human_date(dt), util::relative_age(dt, &now)),
            None => meta.file_name.clone(),
        };
        println!("{}  {} words", when, meta.word_count);
        println!("    {}", meta.preview);
    }
    Ok(())
}
