mod ui;

use anyhow::{anyhow, Context};
use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use typedojo::{
    app_dirs::AppDirs,
    clock::SystemClock,
    config::{Config, ConfigStore, FileConfigStore},
    engine::{Engine, EngineOutcome},
    record::{export_csv, CompletedRecord, RecordStore},
    runtime::{translate_key, CrosstermEventSource, DojoEvent, Runner},
    sentence::SentenceSet,
    session::Phase,
    sink::{NullSink, RecordSink, StoreSink},
    util::mean,
};

const TICK_RATE_MS: u64 = 100;

/// sentence typing practice with live feedback and wpm records
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type practice sentences one at a time. Every character is checked as you type, and a fully correct sentence is scored in words per minute and saved to your local history."
)]
pub struct Cli {
    /// user id attached to saved records
    #[clap(short = 'u', long, global = true)]
    user: Option<i64>,

    /// JSON file with the sentences to practice
    #[clap(short = 's', long)]
    sentences: Option<PathBuf>,

    /// only practice sentences with this tag
    #[clap(short = 't', long)]
    tag: Option<String>,

    /// do not save completed sentences
    #[clap(long)]
    no_save: bool,

    /// write the effective settings back to the config file
    #[clap(long)]
    save_config: bool,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Command {
    /// list the tags of the sentence list
    Tags,
    /// show saved records
    History {
        /// print CSV instead of a table
        #[clap(long)]
        csv: bool,
        /// include every user
        #[clap(long)]
        all: bool,
    },
}

impl Cli {
    /// Flags win over the stored config
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(user) = self.user {
            cfg.user_id = user;
        }
        if let Some(path) = &self.sentences {
            cfg.sentences_path = Some(path.clone());
        }
        if let Some(tag) = &self.tag {
            cfg.tag = Some(tag.clone());
        }
        if self.no_save {
            cfg.save_records = false;
        }
        cfg
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Practice,
    History,
}

pub struct HistoryState {
    pub records: Vec<CompletedRecord>,
    pub scroll_offset: usize,
}

pub struct App {
    pub engine: Engine,
    pub state: AppState,
    pub history: HistoryState,
    pub last_record: Option<CompletedRecord>,
    db_path: Option<PathBuf>,
}

impl App {
    pub fn new(engine: Engine, db_path: Option<PathBuf>) -> Self {
        Self {
            engine,
            state: AppState::Practice,
            history: HistoryState {
                records: Vec::new(),
                scroll_offset: 0,
            },
            last_record: None,
            db_path,
        }
    }

    fn open_history(&mut self) {
        let user_id = self.engine.user_id();
        self.history.records = match &self.db_path {
            Some(path) => RecordStore::open(path)
                .and_then(|store| store.for_user(user_id))
                .unwrap_or_else(|e| {
                    tracing::warn!("could not read history: {}", e);
                    Vec::new()
                }),
            None => Vec::new(),
        };
        self.history.scroll_offset = 0;
        self.state = AppState::History;
    }

    /// Returns false when the app should quit
    fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return true;
        }
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return match self.state {
                AppState::Practice => false,
                AppState::History => {
                    self.state = AppState::Practice;
                    true
                }
            };
        }

        match self.state {
            AppState::Practice => self.on_practice_key(key),
            AppState::History => match key.code {
                KeyCode::F(2) | KeyCode::Backspace => self.state = AppState::Practice,
                KeyCode::Up => {
                    self.history.scroll_offset = self.history.scroll_offset.saturating_sub(1)
                }
                KeyCode::Down => self.history.scroll_offset += 1,
                KeyCode::PageUp => {
                    self.history.scroll_offset = self.history.scroll_offset.saturating_sub(10)
                }
                KeyCode::PageDown => self.history.scroll_offset += 10,
                KeyCode::Home => self.history.scroll_offset = 0,
                _ => {}
            },
        }
        true
    }

    fn on_practice_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.engine.start(),
            KeyCode::Right | KeyCode::Tab => self.engine.next(),
            KeyCode::Left | KeyCode::BackTab => self.engine.back(),
            KeyCode::F(2) => self.open_history(),
            _ => {
                if self.engine.phase() == Phase::Idle {
                    return;
                }
                if let Some(k) = translate_key(&key) {
                    if let EngineOutcome::Completed(record) = self.engine.key_press(k) {
                        self.last_record = Some(record);
                    }
                }
            }
        }
    }
}

fn init_logging() -> Option<WorkerGuard> {
    let dir = AppDirs::log_dir()?;
    // an unusable log directory means running without logs, never aborting
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("typedojo")
        .filename_suffix("log")
        .build(dir)
        .ok()?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("TYPEDOJO_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    Some(guard)
}

fn load_sentences(cfg: &Config) -> anyhow::Result<SentenceSet> {
    let set = match &cfg.sentences_path {
        Some(path) => SentenceSet::from_path(path)
            .with_context(|| format!("loading sentences from {}", path.display()))?,
        None => SentenceSet::builtin()?,
    };
    match &cfg.tag {
        Some(tag) => Ok(set.with_tag(tag)?),
        None => Ok(set),
    }
}

fn print_history(cfg: &Config, csv: bool, all: bool) -> anyhow::Result<()> {
    let path = AppDirs::db_path().ok_or_else(|| anyhow!("no state directory available"))?;
    let store = RecordStore::open(&path)?;
    let records = if all {
        store.all()?
    } else {
        store.for_user(cfg.user_id)?
    };

    if csv {
        export_csv(&records, io::stdout().lock())?;
        return Ok(());
    }

    if records.is_empty() {
        println!("no records yet");
        return Ok(());
    }

    println!("{:>8} {:>6} {:>6}  recorded", "sentence", "user", "wpm");
    for r in &records {
        println!(
            "{:>8} {:>6} {:>6}  {}",
            r.sentence_id,
            r.user_id,
            r.wpm,
            r.recorded_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    let scores: Vec<f64> = records.iter().map(|r| r.wpm as f64).collect();
    if let Some(avg) = mean(&scores) {
        println!("\n{} records, average {:.1} wpm", records.len(), avg);
    }

    if !all {
        println!("\nbest per sentence:");
        for best in store.best_per_sentence(cfg.user_id)? {
            println!(
                "{:>8} {:>6} wpm  ({} attempts)",
                best.sentence_id, best.best_wpm, best.attempts
            );
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging();

    let config_store = FileConfigStore::new();
    let config = cli.apply(config_store.load());
    if cli.save_config {
        config_store.save(&config)?;
        tracing::info!("config saved to {}", config_store.path().display());
    }

    match &cli.command {
        Some(Command::Tags) => {
            let set = load_sentences(&Config {
                tag: None,
                ..config.clone()
            })?;
            for tag in set.tags() {
                println!("{tag}");
            }
            return Ok(());
        }
        Some(Command::History { csv, all }) => return print_history(&config, *csv, *all),
        None => {}
    }

    let sentences = load_sentences(&config)?;

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let db_path = AppDirs::db_path();
    let sink: Box<dyn RecordSink> = match (&db_path, config.save_records) {
        (Some(path), true) => Box::new(StoreSink::spawn(path.clone())),
        _ => Box::new(NullSink),
    };
    tracing::info!(
        user_id = config.user_id,
        sentences = sentences.len(),
        "starting practice"
    );
    let engine = Engine::new(sentences, config.user_id, Box::new(SystemClock), sink);
    let mut app = App::new(engine, db_path);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("shutting down");
    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    terminal.draw(|f| ui(app, f))?;
    loop {
        match runner.step() {
            DojoEvent::Tick => {
                // keep the elapsed timer moving
                if app.state == AppState::Practice && app.engine.phase() == Phase::Active {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            DojoEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            DojoEvent::Key(key) => {
                if !app.on_key(key) {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    match app.state {
        AppState::Practice => f.render_widget(&*app, f.area()),
        AppState::History => ui::history::render_history(app, f),
    }
}
