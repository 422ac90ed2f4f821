//! shls - CLI entry point
//!
//! Parses arguments, loads configuration, sets up logging and then either runs
//! the `-c` lines or an interactive loop on stdin.

#[cfg(feature = "jemalloc")]
use tikv_jemallocator::Jemalloc;

#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::Parser;
use env_logger::Env;
use shls::shell::diagnostic;
use shls::{Args, Config, Outcome, Result, Session, Shell};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::process;

fn main() {
    // Initialize logger with RUST_LOG env var support
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            log::error!("Error: {}", e);
            eprintln!("Error: {}", e);

            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("  Caused by: {}", err);
                source = err.source();
            }

            process::exit(1);
        }
    }
}

/// Returns the process exit code
fn run() -> Result<i32> {
    let args = Args::parse();

    if args.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let mut session = Session::from_env()?;
    if let Some(cwd) = &args.cwd {
        session.cwd = std::fs::canonicalize(cwd)?;
    }

    let mut shell = Shell::new(session, &config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !args.command.is_empty() {
        for line in &args.command {
            match shell.execute(line, &mut out) {
                Ok(Outcome::Continue) => {}
                Ok(Outcome::Exit) => break,
                Err(e) => {
                    log::debug!("{:?} failed: {}", line, e);
                    writeln!(out, "{}", diagnostic(line))?;
                    return Ok(1);
                }
            }
        }
        return Ok(0);
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        write!(out, "{}", shell.prompt())?;
        out.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        match shell.execute(&line, &mut out) {
            Ok(Outcome::Continue) => {}
            Ok(Outcome::Exit) => break,
            Err(e) => {
                log::debug!("{:?} failed: {}", line, e);
                writeln!(out, "{}", diagnostic(&line))?;
            }
        }
    }

    Ok(0)
}
