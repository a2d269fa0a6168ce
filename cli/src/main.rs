//! Terminal shell around the query engine.
//!
//! Reads commands from stdin on a helper thread and drives the controller's
//! timers from the main loop.

mod command;
mod terminal;

use clap::Parser;
use command::{Command, HELP};
use glossa_core::BackendError;
use glossa_core::types::{AppConfig, EngineConfig, PathsConfig};
use glossa_search::{
    Backends, FullTextIndex, FuzzyIndex, IncrementalIndex, PrefixIndex, QueryController,
    ResultSink, SpellIndex, SymSpellIndex, SystemClock,
};
use log::{debug, info, warn};
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use terminal::TerminalSink;

/// Longest sleep of the loop while nothing is scheduled.
const IDLE_WAIT: Duration = Duration::from_millis(250);

/// Poll interval while a full-text request is in flight.
const BUSY_WAIT: Duration = Duration::from_millis(10);

#[derive(Parser, Debug)]
#[command(name = "glossa", version, about = "Incremental dictionary lookup")]
struct Cli {
    /// Directory holding config.toml. Relative index paths resolve against it.
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Write the default config.toml if none exists.
    #[arg(long)]
    init_config: bool,

    /// Look up one query, print the settled list and exit.
    query: Option<String>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("glossa: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> glossa_core::Result<()> {
    let config = load_config(&cli.data_dir, cli.init_config)?;
    let backends = open_backends(&config.paths, &cli.data_dir);

    let mut controller = QueryController::new(
        EngineConfig::from(&config),
        backends,
        Arc::new(SystemClock),
        TerminalSink::new(io::stdout()),
    );

    match cli.query {
        Some(query) => {
            controller.on_query_changed(&query, true);
            settle(&mut controller);
        }
        None => interactive(&mut controller),
    }

    controller.shutdown();
    Ok(())
}

fn load_config(data_dir: &Path, init: bool) -> glossa_core::Result<AppConfig> {
    let path = AppConfig::path(data_dir);
    if init && !path.exists() {
        AppConfig::default().save(&path)?;
        info!("wrote default config to {}", path.display());
    }

    let config = AppConfig::load(&path)?;
    for problem in config.validate() {
        warn!("{}: {problem}; using the default", path.display());
    }
    Ok(config.with_defaults_for_invalid())
}

fn open_backends(paths: &PathsConfig, data_dir: &Path) -> Backends {
    let resolve = |path: &Path| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            data_dir.join(path)
        }
    };

    let incremental = paths
        .incremental_index
        .as_deref()
        .and_then(|path| opened("incremental index", PrefixIndex::open(&resolve(path))))
        .map(|index| Arc::new(index) as Arc<dyn IncrementalIndex>);

    let full_text = paths
        .fulltext_index
        .as_deref()
        .and_then(|path| opened("full-text index", FuzzyIndex::open(&resolve(path))))
        .map(|index| Arc::new(index) as Arc<dyn FullTextIndex>);

    let spelling = paths
        .spelling_dictionary
        .as_deref()
        .and_then(|path| opened("spelling dictionary", SymSpellIndex::open(&resolve(path))))
        .map(|index| Arc::new(index) as Arc<dyn SpellIndex>);

    Backends {
        incremental,
        full_text,
        spelling,
    }
}

fn opened<T>(name: &str, result: Result<T, BackendError>) -> Option<T> {
    match result {
        Ok(index) => {
            info!("opened {name}");
            Some(index)
        }
        Err(err) => {
            warn!("{name} disabled: {err}");
            None
        }
    }
}

/// Runs timers and the full-text worker until nothing is pending.
fn settle<S: ResultSink>(controller: &mut QueryController<S>) {
    loop {
        controller.poll();
        if controller.current_request().is_some() {
            controller.wait_for_full_text(IDLE_WAIT);
            continue;
        }
        match controller.time_until_next_timer() {
            Some(wait) => thread::sleep(wait),
            None => return,
        }
    }
}

fn interactive<S: ResultSink>(controller: &mut QueryController<S>) {
    let (lines_tx, lines) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if lines_tx.send(line).is_err() {
                break;
            }
        }
    });

    println!("type to search, :help for commands");
    loop {
        controller.poll();

        let mut wait = controller.time_until_next_timer().unwrap_or(IDLE_WAIT).min(IDLE_WAIT);
        if controller.current_request().is_some() {
            wait = wait.min(BUSY_WAIT);
        }

        match lines.recv_timeout(wait) {
            Ok(line) => match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => execute(controller, command),
                Err(err) => println!("{err}"),
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                debug!("stdin closed");
                settle(controller);
                break;
            }
        }
    }
}

fn execute<S: ResultSink>(controller: &mut QueryController<S>, command: Command) {
    match command {
        Command::Query(text) => controller.on_query_changed(&text, false),
        Command::Paste(text) => controller.on_query_pasted(&text),
        Command::Clipboard(text) => {
            if !controller.on_clipboard_changed(&text, false) {
                println!("-- clipboard ignored");
            }
        }
        Command::Move(delta) => controller.select_relative(delta),
        Command::Load => controller.load_selected(),
        Command::Open(row) => controller.activate_row(row),
        Command::Advanced { phrase, filters } => {
            controller.run_advanced_search(&phrase, filters.as_deref(), None);
        }
        Command::Page(mode) => controller.run_page_search(mode),
        Command::Focus(focus) => controller.set_focus(focus),
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}
