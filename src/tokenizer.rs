//! Command-line tokenizer
//!
//! Splits the argument part of a command line into long options, short
//! option characters and positional arguments, then interprets the
//! positional arguments as listing targets, path shorthands and an output
//! redirection.

use crate::shell::Session;
use crate::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// One classified command-line token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `--name` or `--name=value`, without the dashes
    LongOption(String),
    /// One character out of a `-abc` run
    ShortOption(char),
    /// Anything else, with quote spans already rejoined
    Positional(String),
}

/// Split an argument string into tokens
///
/// A word starting with a quote opens a span that runs until a word ending
/// with the same quote; the span becomes one positional token with the quotes
/// stripped and the words rejoined by single spaces.
pub fn tokenize(args: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut words = args.split(' ').filter(|w| !w.is_empty());

    while let Some(word) = words.next() {
        if let Some(quote) = opening_quote(word) {
            tokens.push(Token::Positional(read_quoted(word, quote, &mut words)?));
        } else if let Some(name) = word.strip_prefix("--") {
            if !name.is_empty() {
                tokens.push(Token::LongOption(name.to_string()));
            }
        } else if let Some(chars) = word.strip_prefix('-') {
            tokens.extend(chars.chars().map(Token::ShortOption));
        } else {
            tokens.push(Token::Positional(word.to_string()));
        }
    }

    Ok(tokens)
}

fn opening_quote(word: &str) -> Option<char> {
    word.chars().next().filter(|c| *c == '\'' || *c == '"')
}

fn read_quoted<'a>(
    first: &str,
    quote: char,
    rest: &mut impl Iterator<Item = &'a str>,
) -> Result<String> {
    let mut span = first.to_string();
    let mut closed = first.len() > 1 && first.ends_with(quote);

    while !closed {
        match rest.next() {
            Some(word) => {
                span.push(' ');
                span.push_str(word);
                closed = word.ends_with(quote);
            }
            None => return Err(Error::MalformedQuotedArgument(span)),
        }
    }

    Ok(span[1..span.len() - 1].to_string())
}

/// Hints captured from positional shorthands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathHints {
    /// `*` alone: expand subdirectories one level in long view
    pub expand_subdirs: bool,
    /// `*/`: mark directories with a slash under `-d`
    pub mark_directories: bool,
    /// Any other token containing `*`: a name glob
    pub glob: Option<String>,
}

/// A parsed `ls` argument line
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    /// Long option names and short option characters, in command-line order
    pub options: Vec<String>,
    /// Resolved listing targets; empty means the current directory
    pub targets: Vec<PathBuf>,
    /// File name after `>`
    pub redirect: Option<String>,
    pub hints: PathHints,
}

impl Invocation {
    /// Parse the argument part of an `ls` command line
    pub fn parse(args: &str, session: &Session) -> Result<Self> {
        let mut invocation = Self::default();
        let mut expect_redirect = false;

        for token in tokenize(args)? {
            let arg = match token {
                Token::LongOption(name) => {
                    invocation.options.push(name);
                    continue;
                }
                Token::ShortOption(c) => {
                    invocation.options.push(c.to_string());
                    continue;
                }
                Token::Positional(arg) => arg,
            };

            if expect_redirect {
                invocation.redirect = Some(arg);
                expect_redirect = false;
            } else if arg == ">" {
                expect_redirect = true;
            } else if arg == "*" {
                invocation.hints.expand_subdirs = true;
            } else if arg == "*/" {
                invocation.hints.mark_directories = true;
            } else if arg.contains('*') {
                invocation.hints.glob = Some(arg);
            } else {
                invocation.targets.push(resolve_target(&arg, session)?);
            }
        }

        if expect_redirect {
            return Err(Error::MissingRedirectTarget);
        }

        Ok(invocation)
    }
}

/// First resolved target of a `cd` argument line
///
/// Only the first positional token is ever considered; the rest of the line
/// is ignored.
pub fn first_target(args: &str, session: &Session) -> Result<Option<PathBuf>> {
    for token in tokenize(args)? {
        if let Token::Positional(arg) = token {
            return resolve_target(&arg, session).map(Some);
        }
    }
    Ok(None)
}

/// Resolve one positional token against the session
pub fn resolve_target(arg: &str, session: &Session) -> Result<PathBuf> {
    if arg.starts_with("..") {
        return Ok(normalize(&session.cwd.join(arg)));
    }

    if let Some(rest) = arg.strip_prefix('~').or_else(|| arg.strip_prefix('\\')) {
        let rest = rest.trim_start_matches(|c: char| c == '/' || c == '\\');
        return Ok(if rest.is_empty() {
            session.home.clone()
        } else {
            normalize(&session.home.join(rest))
        });
    }

    if is_absolute(arg) {
        return std::fs::canonicalize(arg).map_err(|_| Error::not_found(arg));
    }

    Ok(normalize(&session.cwd.join(arg)))
}

fn is_absolute(arg: &str) -> bool {
    let bytes = arg.as_bytes();
    arg.starts_with('/')
        || (bytes.len() > 2
            && bytes[0].is_ascii_alphabetic()
            && bytes[1] == b':'
            && (bytes[2] == b'\\' || bytes[2] == b'/'))
}

/// Lexically remove `.` and `..` components
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
