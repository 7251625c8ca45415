mod config;
mod executor;
mod matcher;
mod model;
mod sources;
mod state;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::config::load_config;
use crate::model::Candidate;
use crate::state::SelectionState;
use crate::ui::Renderer;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file to read instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Applications directory to scan, repeatable; replaces the configured search path
    #[arg(short, long = "dir")]
    dirs: Vec<PathBuf>,

    /// Initial filter query
    #[arg(short, long, default_value = "")]
    query: String,

    /// Print the ranked matches for the query and exit
    #[arg(short, long)]
    list: bool,

    /// Print --list output as JSON
    #[arg(long, requires = "list")]
    json: bool,

    /// Print the resolved launch command instead of running it
    #[arg(long)]
    dry_run: bool,

    /// Append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    // 1. Load Config
    let config = load_config(args.config.as_deref())?;

    // 2. Load candidates once
    let paths = if args.dirs.is_empty() {
        config.sources.search_paths()
    } else {
        args.dirs.clone()
    };
    let candidates = sources::load(&paths);

    if args.list {
        return print_matches(&args.query, &candidates, args.json);
    }

    // 3. Interactive selection
    let mut state = SelectionState::with_query(candidates, &args.query);
    log::info!("Starting selection over {} candidates", state.candidate_count());
    let mut renderer = Renderer::new(&config.theme);
    let Some(candidate) = ui::run(&mut state, &mut renderer)? else {
        log::info!("Selection cancelled");
        return Ok(());
    };

    // 4. Launch, detached
    let terminal = executor::resolve_terminal(&config.general.terminal_preferences());
    let plan = executor::plan(
        &candidate,
        terminal.as_deref(),
        config.general.prefer_terminal_for_terminal_entries,
    );
    if args.dry_run {
        println!("{}", executor::describe(&plan));
    } else {
        executor::launch(&plan);
    }

    Ok(())
}

/// Logs go to `log_file` when given. Without one they would land on the
/// screen the TUI draws to, so they stay off unless `RUST_LOG` asks.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let env = env_logger::Env::default();
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {path:?}"))?;
            env_logger::Builder::from_env(env.default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        None => env_logger::Builder::from_env(env.default_filter_or("off")).init(),
    }
    Ok(())
}

fn print_matches(query: &str, candidates: &[Candidate], json: bool) -> Result<()> {
    let ranked = matcher::rank(query, candidates);
    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
    } else {
        for m in &ranked {
            println!("{}\t{}\t{}", m.score, m.candidate.name, m.candidate.exec);
        }
    }
    Ok(())
}
