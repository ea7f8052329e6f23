//! Clap adapter for the `gcfg` binary.
//!
//! Compiled only with the `clap` Cargo feature (on by default). The only
//! bridge to the core is [`Cli::into_action()`], which splits the parsed
//! arguments into the files to read and a clap-free [`Action`]. From there,
//! all logic flows through [`GcfgBuilder::handle()`](crate::GcfgBuilder::handle).

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

use crate::ops::Action;

/// Inspect git-config style files.
#[derive(Debug, Parser)]
#[command(name = "gcfg", version)]
pub struct Cli {
    /// Log more: `-v` for debug, `-vv` for trace.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: GcfgSubcommand,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum GcfgSubcommand {
    /// Print every assignment as `key=value`, after layering the files.
    List {
        /// Files to read, lowest priority first.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the value of one key.
    Get {
        /// Print every value, not just the last one.
        #[arg(long)]
        all: bool,
        /// Dotted key (e.g. "core.editor" or "remote.origin.url").
        key: String,
        /// Files to read, lowest priority first.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the parse events of a file as JSON.
    Events { file: PathBuf },
    /// Print the tokens and lexical errors of a file as JSON.
    Tokens { file: PathBuf },
}

impl Cli {
    /// Convert clap-parsed args into the files to read and an [`Action`].
    pub fn into_action(self) -> (Vec<PathBuf>, Action) {
        match self.command {
            GcfgSubcommand::List { files } => (files, Action::List),
            GcfgSubcommand::Get { all, key, files } => (files, Action::Get { key, all }),
            GcfgSubcommand::Events { file } => (vec![file], Action::Events),
            GcfgSubcommand::Tokens { file } => (vec![file], Action::Tokens),
        }
    }

    /// Log level selected by `--verbose`.
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
