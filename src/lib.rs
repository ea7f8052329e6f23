//! Read git-config style INI files into typed Rust structs.
//!
//! ```text
//! ; comment
//! [core]
//!     editor = vim
//!     bare                      ; no value: "true"
//! [remote "origin"]
//!     url = "git@example.com:x.git"
//!     fetch = +refs/heads/*     ; repeated: appended to a Vec
//!     fetch = +refs/tags/*
//! ```
//!
//! Destinations are plain structs. Instead of runtime reflection, each record
//! declares a small descriptor table through the [`section!`] and [`config!`]
//! macros:
//!
//! ```ignore
//! #[derive(Default)]
//! struct Core { editor: String, bare: bool }
//! gcfg::section!(Core { editor, bare });
//!
//! #[derive(Default)]
//! struct Remote { url: String, fetch: Vec<String> }
//! gcfg::section!(Remote { url, fetch });
//!
//! #[derive(Default)]
//! struct Repo { core: Core, remote: BTreeMap<String, Remote> }
//! gcfg::config!(Repo { core, remote });
//!
//! let mut repo = Repo::default();
//! gcfg::read_file_into(&mut repo, ".git/config")?;
//! ```
//!
//! # Names
//!
//! Section and variable names match fields case-insensitively, with `-` in a
//! name matching `_` in a field. A field can be renamed in its table
//! (`other: rename("renamed-section")`). Subsection names are case-sensitive:
//! they are the keys of map-typed sections.
//!
//! # Values
//!
//! Every value arrives as text and is coerced by the field's [`Value`]
//! implementation:
//!
//! - strings are stored as is;
//! - booleans accept `true/yes/on/1` and `false/no/off/0`, in any case;
//! - integers accept decimal and `0x` hex by default. Named integer types
//!   ([`int_value!`]) also accept leading-zero octal, and a table entry can
//!   choose any mix with `int("dho")`;
//! - `Vec<T>` fields are multi-valued: each assignment appends;
//! - `Option<T>` fields are set on the first successful assignment;
//! - anything with a `FromStr` impl can opt in through [`value_from_str!`].
//!
//! # Errors
//!
//! A read stops at the first lexical, syntax or value error, with the
//! position of the offending text. Data with no destination (an unknown
//! section, subsection or variable) is not fatal: reading continues and the
//! misses are reported together as [`GcfgError::Warnings`]. Use
//! [`fatal_only`] to ignore them, or a lenient [builder](Gcfg::builder) to
//! log and drop them.
//!
//! # Layered reads
//!
//! [`Gcfg::builder()`] reads discovered files (platform config directory,
//! home, working directory, explicit directories), explicit files and
//! in-memory texts into one destination, in that order, later sources
//! overriding earlier ones.
//!
//! # Clap adapter
//!
//! With the `clap` feature (on by default) the crate ships a `gcfg` binary
//! with `list`, `get`, `events` and `tokens` commands, built on [`Cli`].

pub mod bind;
pub mod error;
pub mod parser;
pub mod scanner;
pub mod token;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod dynamic;
mod file;
mod ops;
mod read;
mod set;
mod value;

#[cfg(test)]
mod fixtures;

pub use bind::{Binding, Config, Field, Section, SectionSlot};
pub use builder::{Gcfg, GcfgBuilder};
#[cfg(feature = "clap")]
pub use cli::{Cli, GcfgSubcommand};
pub use dynamic::{Document, Variable, Variables};
pub use error::{Collector, ExtraData, GcfgError, Unknown, ValueError, fatal_only};
pub use file::{SearchMode, SearchPath};
pub use ops::{Action, Output};
pub use parser::{Event, Parser};
pub use read::{read_file_into, read_into, read_string_into};
pub use set::{SetError, set};
pub use types::{IntMode, parse_bool, parse_int};
pub use value::Value;
