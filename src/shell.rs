//! Simulated shell
//!
//! A [`Session`] carries the working and home directories explicitly; the
//! [`Shell`] dispatches one command line at a time (`ls`, `cd`, `exit`) against
//! it. Any failure surfaces as a single generic diagnostic line.

use crate::config::{Config, DisplayConfig};
use crate::formatter;
use crate::lister::{self, base_name, FsProvider, MetadataProvider};
use crate::options::OptionTable;
use crate::record::FileRecord;
use crate::resolver::{resolve, EffectiveConfig, View};
use crate::tokenizer::{first_target, Invocation};
use crate::{filters, Error, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Working context of the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Current working directory
    pub cwd: PathBuf,
    /// Target of `~`
    pub home: PathBuf,
}

impl Session {
    pub fn new(cwd: PathBuf, home: PathBuf) -> Self {
        Self { cwd, home }
    }

    /// Session rooted at the process working directory
    pub fn from_env() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let home = dirs::home_dir().unwrap_or_else(|| cwd.clone());
        Ok(Self::new(cwd, home))
    }
}

/// What the caller should do after a line ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

/// The line printed for any failed command
pub fn diagnostic(line: &str) -> String {
    format!(
        "'{}' is not recognized as an internal or external command,\n\
         operable program or batch file.",
        line.trim()
    )
}

/// Command dispatcher bound to one session
pub struct Shell {
    session: Session,
    display: DisplayConfig,
    prompt: Option<String>,
    provider: Box<dyn MetadataProvider>,
}

impl Shell {
    pub fn new(session: Session, config: &Config) -> Self {
        Self::with_provider(session, config, Box::new(FsProvider))
    }

    pub fn with_provider(
        session: Session,
        config: &Config,
        provider: Box<dyn MetadataProvider>,
    ) -> Self {
        Self {
            session,
            display: config.display.clone(),
            prompt: config.shell.prompt.clone(),
            provider,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Configured prompt, or the working directory
    pub fn prompt(&self) -> String {
        match &self.prompt {
            Some(prompt) => prompt.clone(),
            None => format!("{}> ", self.session.cwd.display()),
        }
    }

    /// Run one command line, writing console output to `out`
    pub fn execute(&mut self, line: &str, out: &mut dyn Write) -> Result<Outcome> {
        let line = line.trim();
        let (command, args) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "" => {}
            "ls" => run_ls(args, &self.session, &self.display, self.provider.as_ref(), out)?,
            "cd" => change_dir(args, &mut self.session, self.provider.as_ref())?,
            "exit" => return Ok(Outcome::Exit),
            other => return Err(Error::UnknownCommand(other.to_string())),
        }

        out.flush()?;
        Ok(Outcome::Continue)
    }
}

/// `cd`: move to the first target when it is an existing directory
pub fn change_dir(
    args: &str,
    session: &mut Session,
    provider: &dyn MetadataProvider,
) -> Result<()> {
    let target = match first_target(args, session) {
        Ok(Some(target)) => target,
        Ok(None) | Err(Error::TargetNotFound(_)) => return Ok(()),
        Err(e) => return Err(e),
    };

    match provider.stat(&target) {
        Ok(record) if record.is_dir => {
            log::debug!("cd {:?}", target);
            session.cwd = target;
        }
        _ => log::debug!("cd target {:?} is not a directory, staying put", target),
    }
    Ok(())
}

/// Execute an `ls` argument line
pub fn run_ls(
    args: &str,
    session: &Session,
    display: &DisplayConfig,
    provider: &dyn MetadataProvider,
    console: &mut dyn Write,
) -> Result<()> {
    let invocation = Invocation::parse(args, session)?;
    let table = OptionTable::from_options(&invocation.options)?;
    let mut config = resolve(&table, &invocation.hints, display)?;

    match &invocation.redirect {
        Some(file) => {
            let path = session.cwd.join(file);
            log::debug!("Redirecting output to {:?}", path);
            config.color = false;
            let mut writer = BufWriter::new(File::create(&path)?);
            list_targets(&invocation, &config, session, provider, &mut writer)?;
            writer.flush()?;
        }
        None => {
            config.color = config.color
                && atty::is(atty::Stream::Stdout)
                && std::env::var("NO_COLOR").is_err();
            list_targets(&invocation, &config, session, provider, console)?;
        }
    }
    Ok(())
}

fn list_targets(
    invocation: &Invocation,
    config: &EffectiveConfig,
    session: &Session,
    provider: &dyn MetadataProvider,
    out: &mut dyn Write,
) -> Result<()> {
    if config.help {
        return formatter::print_help(out);
    }

    let targets = if invocation.targets.is_empty() {
        vec![session.cwd.clone()]
    } else {
        invocation.targets.clone()
    };

    for target in &targets {
        let mut visited = HashSet::new();
        list_target(target, config, provider, out, &mut visited)?;
    }
    Ok(())
}

/// Filter, sort, then optionally dereference
fn prepare(
    provider: &dyn MetadataProvider,
    entries: Vec<FileRecord>,
    config: &EffectiveConfig,
) -> Result<Vec<FileRecord>> {
    let entries = filters::apply(entries, config)?;
    if config.dereference {
        lister::dereference(provider, entries)
    } else {
        Ok(entries)
    }
}

fn list_target(
    path: &Path,
    config: &EffectiveConfig,
    provider: &dyn MetadataProvider,
    out: &mut dyn Write,
    visited: &mut HashSet<PathBuf>,
) -> Result<()> {
    writeln!(out)?;

    if config.directory_only {
        let entry = lister::directory_entry(provider, path)?;
        let entries = prepare(provider, vec![entry], config)?;
        return formatter::render(out, &base_name(path), &entries, config);
    }

    let listing = lister::enumerate(provider, path)?;
    let entries = prepare(provider, listing.entries, config)?;

    if config.expand_subdirs && config.view == View::Long {
        visited.insert(provider.canonicalize(path)?);
        return list_expanded(
            &listing.header,
            &listing.path,
            &entries,
            config,
            provider,
            out,
            visited,
        );
    }

    formatter::render(out, &listing.header, &entries, config)
}

/// Long listing where every real subdirectory gets its own nested listing
fn list_expanded(
    header: &str,
    path: &Path,
    entries: &[FileRecord],
    config: &EffectiveConfig,
    provider: &dyn MetadataProvider,
    out: &mut dyn Write,
    visited: &mut HashSet<PathBuf>,
) -> Result<()> {
    formatter::print_long_header(out, header)?;
    for entry in entries.iter().filter(|e| !e.is_dir || e.is_symlink) {
        formatter::print_detailed_line(out, entry, config)?;
    }

    let nested = config.without_expansion();
    for entry in entries.iter().filter(|e| e.is_dir && !e.is_symlink) {
        if entry.name == "." || entry.name == ".." {
            continue;
        }
        let child = path.join(&entry.name);
        let canonical = provider.canonicalize(&child)?;
        if !visited.insert(canonical) {
            log::debug!("Skipping already listed directory {:?}", child);
            continue;
        }
        list_target(&child, &nested, provider, out, visited)?;
    }
    Ok(())
}
