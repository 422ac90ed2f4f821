//! shls - A simulated shell with a faithful Unix `ls` option engine
//!
//! An `ls` line flows through a fixed pipeline: the tokenizer splits it into
//! options and targets, the option table records what was asked for, the
//! resolver applies the precedence rules once in a fixed order, the lister
//! enumerates each target, the filters narrow and sort the entries, and the
//! formatter renders them in one of five views.
//!
//! # Features
//!
//! - **Option engine**: short and long flags, valued options, `-f` style implications
//! - **Five views**: long, single-column, vertical and horizontal grids, comma list
//! - **Path shorthands**: `~`, `..`, absolute paths, `*` expansion, name globs
//! - **Redirection**: `ls ... > file` relative to the session directory
//! - **Configuration**: Support for .shls.toml config files

pub mod cli;
pub mod config;
pub mod error;
pub mod filters;
pub mod formatter;
pub mod lister;
pub mod options;
pub mod record;
pub mod resolver;
pub mod shell;
pub mod tokenizer;

pub use cli::Args;
pub use config::Config;
pub use error::{Error, Result};
pub use lister::{FsProvider, Listing, MetadataProvider};
pub use options::{FlagValue, OptionTable};
pub use record::FileRecord;
pub use resolver::{resolve, EffectiveConfig, View};
pub use shell::{Outcome, Session, Shell};
pub use tokenizer::Invocation;
