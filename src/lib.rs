//! Gozelle: a minimal directory jumper.
//!
//! **Gozelle remembers the directories you visit and takes you back to the
//! best match for a keyword.**
//!
//! A shell hook calls `gozelle add $PWD` on every directory change. The `gz`
//! shell function calls `gozelle query <keywords>` and `cd`s into whatever it
//! prints.
//!
//! # Ranking
//!
//! Every tracked directory carries a score and the time of its last visit.
//! Candidates are ranked by *frecency*: the score decayed with a one-day half
//! life since the last visit. Each jump multiplies the stored score by 1.05;
//! repeated `add`s of the same directory are merged (scores summed) by a
//! background prune.
//!
//! # Storage
//!
//! One binary file (`$GOZELLE_DATA_DIR/db.bin`, default
//! `$XDG_DATA_HOME/gozelle/db.bin`). Saves are staged in a sibling `.tmp` file
//! and renamed into place, so a crash mid-save never leaves a torn store.
//!
//! # Examples
//!
//! ```bash
//! # Install the shell hook
//! eval "$(gozelle init bash)"
//!
//! # Jump to the best match for "proj"
//! gz proj
//!
//! # Show what is tracked
//! gozelle list
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: the store engine (codec, store, maintenance, ranking, query)
//! - [`plugins`]: shell integration, completions, interactive picker

pub mod config;
pub mod core;
pub mod logging;
pub mod plugins;

mod cli;

use crate::cli::{Cli, Command, OutputFormat};
use crate::config::Config;
use crate::core::error::GozelleError;
use crate::core::query::{self, ScoredMatch};
use crate::core::store::{DirectoryStore, FileStore};
use crate::core::{ops, time};
use crate::logging::Verbosity;
use crate::plugins::{completions, interactive, shell};

use clap::{CommandFactory, Parser};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What `query` and `interactive` print when there is nothing to jump to:
/// the shell function `cd`s into it and stays put.
pub const NO_MATCH_MARKER: &str = ".";

#[derive(Serialize, Debug)]
struct ListRow<'a> {
    path: &'a str,
    score: f64,
    last_visit: i64,
    frecency: f64,
}

fn open_store(config: &Config) -> Result<FileStore, GozelleError> {
    FileStore::open(&config.data_file)
}

fn path_to_key(path: &Path) -> Result<String, GozelleError> {
    let absolute = std::path::absolute(path).map_err(|e| GozelleError::io(path, e))?;
    absolute.to_str().map(str::to_string).ok_or_else(|| {
        GozelleError::io(
            &absolute,
            std::io::Error::new(std::io::ErrorKind::InvalidData, "path is not valid UTF-8"),
        )
    })
}

fn print_jump(config: &Config, target: &str) {
    if config.echo {
        eprintln!("jumped to: {}", target);
    }
    println!("{}", target);
}

fn run_add(config: &Config, path: PathBuf) -> Result<(), GozelleError> {
    let key = path_to_key(&path)?;
    let store = open_store(config)?;
    ops::add(&store, &key)?;
    Ok(())
}

fn run_list(config: &Config, format: OutputFormat) -> Result<(), GozelleError> {
    let store = open_store(config)?;
    let ranked = query::ranked(store.all()?, time::now_epoch_secs());
    match format {
        OutputFormat::Json => {
            let rows: Vec<ListRow<'_>> = ranked
                .iter()
                .map(|m| ListRow {
                    path: &m.entry.path,
                    score: m.entry.score,
                    last_visit: m.entry.last_visit,
                    frecency: m.frecency,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Text => {
            for ScoredMatch { entry, frecency, .. } in &ranked {
                println!(
                    "{}  {}",
                    format!("{:>10.3}", frecency).bright_cyan(),
                    entry.path
                );
            }
        }
    }
    Ok(())
}

fn run_query(config: &Config, keywords: &[String]) -> Result<(), GozelleError> {
    if keywords.is_empty() {
        println!("{}", NO_MATCH_MARKER);
        return Ok(());
    }
    let store = open_store(config)?;
    match query::query(&store, keywords, time::now_epoch_secs())? {
        Some(found) => print_jump(config, &found.entry.path),
        None => println!("{}", NO_MATCH_MARKER),
    }
    Ok(())
}

fn run_interactive(config: &Config) -> Result<(), GozelleError> {
    let finder = interactive::ensure_finder()?;
    let store = open_store(config)?;
    let candidates: Vec<String> = query::ranked(store.all()?, time::now_epoch_secs())
        .into_iter()
        .map(|m| m.entry.path)
        .collect();

    match interactive::select(&finder, &[], &candidates)? {
        Some(choice) => {
            ops::record_visit(&store, &choice, time::now_epoch_secs())?;
            print_jump(config, &choice);
        }
        None => println!("{}", NO_MATCH_MARKER),
    }

    ops::prune(&store)?;
    Ok(())
}

pub fn run() -> Result<(), GozelleError> {
    let cli = Cli::parse();
    logging::init(Verbosity::from_flags(cli.verbose, cli.quiet));

    match cli.command {
        Command::Init { shell: target } => {
            println!("{}", shell::init_script(target));
            shell::spawn_background_prune();
            Ok(())
        }
        Command::Completions { shell: target } => {
            let mut cmd = Cli::command();
            completions::generate(target, &mut cmd, &mut std::io::stdout());
            Ok(())
        }
        Command::Add { path } => run_add(&Config::from_env()?, path),
        Command::Remove { path } => {
            let store = open_store(&Config::from_env()?)?;
            ops::remove(&store, &path)?;
            Ok(())
        }
        Command::List { format } => run_list(&Config::from_env()?, format),
        Command::Query { keywords } => run_query(&Config::from_env()?, &keywords),
        Command::Interactive => run_interactive(&Config::from_env()?),
        Command::Prune => {
            let store = open_store(&Config::from_env()?)?;
            ops::prune(&store)?;
            Ok(())
        }
    }
}
