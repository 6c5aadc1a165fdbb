use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use digit_span::{
    app_dirs::AppDirs,
    clock::{Clock, SystemClock},
    config::{Config, ConfigStore, FileConfigStore, MAX_INTERVAL_MS},
    controller::Controller,
    event_log::{CsvEventLog, EventSink},
    keymap::{self, Buttons, KeyAction},
    runtime::{self, AppEvent, AppEventSource, Runner},
    sequence::Mode,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    panic,
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const TICK_RATE_MS: u64 = 50;

/// digit span and letter-number sequencing memory test
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Shows a sequence of characters one at a time, then asks for them back. Each correct answer adds a character, each mistake starts over at three. Every response, plus a heartbeat row four times a second, is appended to a csv event log."
)]
pub struct Cli {
    /// csv file to write the event log to (truncated on start) [default: digit_span_data.csv]
    #[clap(short = 'o', long)]
    log_path: Option<PathBuf>,

    /// test to start in
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// milliseconds each character stays on screen
    #[clap(long = "reveal-ms", value_parser = clap::value_parser!(u64).range(1..=MAX_INTERVAL_MS))]
    reveal_ms: Option<u64>,

    /// milliseconds between heartbeat rows in the event log
    #[clap(long = "heartbeat-ms", value_parser = clap::value_parser!(u64).range(1..=MAX_INTERVAL_MS))]
    heartbeat_ms: Option<u64>,
}

impl Cli {
    /// Command line flags win over the saved config
    fn apply(&self, config: Config) -> Config {
        Config {
            mode: self.mode.unwrap_or(config.mode),
            log_path: self.log_path.clone().or(config.log_path),
            reveal_interval_ms: self.reveal_ms.unwrap_or(config.reveal_interval_ms),
            heartbeat_interval_ms: self.heartbeat_ms.unwrap_or(config.heartbeat_interval_ms),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_diagnostics();

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    let mut controller = Controller::new(
        SystemClock,
        config.session_config(),
        open_event_log(&config),
    );

    install_panic_hook();
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        runtime::spawn_terminal_reader(),
        Duration::from_millis(TICK_RATE_MS),
    );
    let result = start_tui(&mut terminal, &mut controller, &runner);

    controller.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // only the mode is remembered, flags stay one-off
    let saved = Config {
        mode: controller.mode(),
        ..store.load()
    };
    if let Err(e) = store.save(&saved) {
        warn!(error = %e, "could not save config");
    }

    result
}

fn start_tui<B: Backend, C: Clock, E: AppEventSource>(
    terminal: &mut Terminal<B>,
    controller: &mut Controller<C>,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui(controller, f))?;

    loop {
        let event = runner.step();
        // keys can starve the timeout tick, and due rows must land before the key's
        controller.on_tick();

        match event {
            AppEvent::Key(key) => match keymap::action_for(&key, Buttons::from(&*controller)) {
                Some(KeyAction::Quit) => break,
                Some(KeyAction::Intent(intent)) => {
                    controller.dispatch(intent);
                }
                None => {}
            },
            AppEvent::InputClosed => {
                warn!("terminal input closed, ending session");
                break;
            }
            AppEvent::Resize | AppEvent::Tick => {}
        }

        terminal.draw(|f| ui(controller, f))?;
    }

    Ok(())
}

fn ui<C: Clock>(controller: &Controller<C>, f: &mut Frame) {
    f.render_widget(controller, f.area());
}

fn open_event_log(config: &Config) -> Option<Box<dyn EventSink>> {
    let path = config.event_log_path();
    match CsvEventLog::create(&path) {
        Ok(log) => {
            info!(path = %path.display(), "event log opened");
            Some(Box::new(log))
        }
        Err(e) => {
            error!(error = %e, "event log unavailable, running without it");
            None
        }
    }
}

/// Send tracing output to a file; the alternate screen owns the terminal
fn init_diagnostics() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("digit_span=info"));

    let file = AppDirs::diagnostics_path().and_then(|path| {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        OpenOptions::new().create(true).append(true).open(path).ok()
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true);

    match file {
        Some(file) => builder.with_writer(Mutex::new(file)).init(),
        None => builder.with_writer(io::sink).init(),
    }
}

fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}
