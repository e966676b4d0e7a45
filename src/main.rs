mod logging;
mod ui;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use revasm::engine::format::render_text;
use revasm::engine::{EngineConfig, Session, Snapshot, StepError};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "revasm", version, about = "Step forward and backward through x86-64 assembly")]
struct Cli {
    /// JSON engine config; flags below override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Initial rsp/rbp.
    #[arg(long, global = true)]
    stack_base: Option<i64>,

    /// Maximum undo depth.
    #[arg(long, global = true, conflicts_with = "unbounded_history")]
    history_limit: Option<usize>,

    /// Keep every step in the undo history.
    #[arg(long, global = true)]
    unbounded_history: bool,

    /// Write logs here (the TUI logs nowhere else).
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// -v info, -vv debug, -vvv trace.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive stepping debugger.
    Tui { file: PathBuf },

    /// Run to the end, printing the state after every step.
    Trace {
        file: PathBuf,

        #[arg(long, default_value_t = 10_000)]
        max_steps: u64,

        /// One JSON snapshot per line.
        #[arg(long)]
        json: bool,

        /// Step back to the start afterwards and print the final state.
        #[arg(long)]
        rewind: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let is_tui = matches!(cli.command, Command::Tui { .. });
    logging::init(cli.verbose, cli.log_file.as_deref(), !is_tui)?;

    let config = engine_config(&cli)?;
    info!(?config, "engine config");

    match cli.command {
        Command::Tui { file } => {
            let text = read_source(&file)?;
            let app = ui::App::new(Session::new(config), file, text);
            let mut terminal = ratatui::init();
            let res = ui::run(&mut terminal, app);
            ratatui::restore();
            res.context("terminal UI")
        }
        Command::Trace { file, max_steps, json, rewind } => {
            let bytes = fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            trace(Session::new(config), &bytes, max_steps, json, rewind)
        }
    }
}

fn engine_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            EngineConfig::from_json(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    if let Some(base) = cli.stack_base {
        config.stack_base = base;
    }
    if let Some(limit) = cli.history_limit {
        config.history_limit = Some(limit);
    }
    if cli.unbounded_history {
        config.history_limit = None;
    }
    Ok(config)
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn trace(mut session: Session, bytes: &[u8], max_steps: u64, json: bool, rewind: bool) -> Result<()> {
    let emit = |snap: &Snapshot| -> Result<()> {
        if json {
            println!("{}", serde_json::to_string(snap)?);
        } else {
            println!("{}", render_text(snap));
        }
        Ok(())
    };

    emit(&session.start_execution_bytes(bytes)?)?;

    let mut steps = 0;
    while steps < max_steps {
        match session.step_forward() {
            Ok(snap) => emit(&snap)?,
            Err(StepError::ExecutionFinished(_)) => break,
            Err(e @ StepError::InvalidInstructionPointer { .. }) => {
                eprintln!("stopped: {e}");
                break;
            }
            Err(e) => bail!(e),
        }
        steps += 1;
    }
    if steps == max_steps && !session.current_state().is_finished() {
        eprintln!("stopped after {max_steps} steps");
    }

    if rewind {
        while session.step_back().is_ok() {}
        emit(&session.current_state())?;
    }
    Ok(())
}
