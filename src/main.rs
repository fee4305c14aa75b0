mod clock;
mod config;
mod error;
mod models;
mod report;
mod storage;
mod tracker;
mod utils;

use anyhow::Result;
use chrono::{Local, SubsecRound};
use clap::{Parser, Subcommand};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use storage::Storage;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tracker::Tracker;

const USAGE: &str = "\
Usage examples:
  tasktimes                     Show current task
  tasktimes \"prj - stuff\"       Start task called \"stuff\" with project \"prj\"
  tasktimes on \"prj - stuff\"    Start task called \"stuff\" with project \"prj\"
  tasktimes on 8:24             Change start time of current task to 8:24
  tasktimes on reset            Change start time of current task to now
  tasktimes off                 Stop tracking current task
  tasktimes off 8h38m           Stop current task 8h38m after its start
  tasktimes off 17:36           Stop current task at 17:36, or change end time of previous task
  tasktimes off reset           Change end time of previous task to now
  tasktimes resume              Restart previous task
  tasktimes rename \"task\"       Change name of current task to \"task\"
  tasktimes delete              Delete current task
  tasktimes times               Give report of tasks
  tasktimes times [file]        Give report of tasks in another file

The log file defaults to times.txt in the working directory; set
\"default_file\" in ~/.tasktimes/config.json to change it.";

#[derive(Parser)]
#[command(name = "tasktimes", version)]
#[command(about = "Simple command-line time tracking", long_about = None)]
#[command(after_help = USAGE)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a task, or move the current task's start to H:MM or now ("reset")
    On {
        /// "project - name", H:MM or reset
        text: Vec<String>,
    },
    /// Stop the current task, or move the previous task's end to H:MM or now ("reset")
    Off {
        /// XhYm after start, H:MM or reset
        arg: Option<String>,
    },
    /// Restart the previous task
    Resume,
    /// Change the name of the current task
    Rename {
        /// "project - name"
        text: Vec<String>,
    },
    /// Delete the current task
    Delete,
    /// Report time spent per project
    Times {
        /// Log file to report on instead of the default one
        file: Option<PathBuf>,
    },
    /// Any other word starts a task with that name
    #[command(external_subcommand)]
    Task(Vec<String>),
}

fn main() {
    // Warnings always reach stderr; RUST_LOG=debug shows storage activity.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal())
                .without_time()
                .with_target(false),
        )
        .with(filter)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load_config()?;
    let now = Local::now().trunc_subsecs(0);

    let path = match &cli.command {
        Some(Commands::Times { file: Some(file) }) => file.clone(),
        _ => config.default_file,
    };
    tracing::debug!(path = %path.display(), "using log file");
    let mut tracker = Tracker::new(Storage::from_path(path), now)?;
    let out = io::stdout();

    match cli.command {
        None => tracker.show_current(out),
        Some(Commands::On { text }) => tracker.on(joined(&text).as_deref(), out),
        Some(Commands::Off { arg }) => tracker.off(arg.as_deref(), out),
        Some(Commands::Resume) => tracker.resume_previous(out),
        Some(Commands::Rename { text }) => tracker.rename(joined(&text).as_deref(), out),
        Some(Commands::Delete) => tracker.delete_current(out),
        Some(Commands::Times { .. }) => tracker.report(out),
        Some(Commands::Task(words)) => tracker.start_task(&words.join(" "), out),
    }
}

/// Several words on the command line form one task text.
fn joined(words: &[String]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}
