//! Error types for shls
//!
//! Every failure raised while tokenizing, resolving, enumerating or rendering
//! an `ls` invocation ends up in this enum. The shell loop catches it at the
//! top level and prints one generic diagnostic line.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for shls operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for shls
#[derive(Error, Debug)]
pub enum Error {
    /// An option name that is not part of the canonical flag registry
    #[error("unrecognized option '{0}'")]
    UnrecognizedOption(String),

    /// A canonical option carrying a value it does not understand
    #[error("invalid argument '{value}' for '--{option}'")]
    InvalidOptionValue { option: String, value: String },

    /// A requested listing target does not exist
    #[error("cannot access '{}': No such file or directory", .0.display())]
    TargetNotFound(PathBuf),

    /// A quote span that was opened but never closed
    #[error("unterminated quoted argument: {0}")]
    MalformedQuotedArgument(String),

    /// `>` given without a file name after it
    #[error("missing file name after '>'")]
    MissingRedirectTarget,

    /// First word of the line is not a known command
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// I/O errors from filesystem operations or output writing
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Name glob that does not compile
    #[error("Invalid glob pattern: {0}")]
    RegexError(#[from] regex::Error),

    /// Configuration file errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl Error {
    /// Create an invalid option value error
    pub fn invalid_value<O: Into<String>, V: Into<String>>(option: O, value: V) -> Self {
        Error::InvalidOptionValue {
            option: option.into(),
            value: value.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::ConfigError(msg.into())
    }

    /// Create a target-not-found error
    pub fn not_found<P: Into<PathBuf>>(path: P) -> Self {
        Error::TargetNotFound(path.into())
    }
}
