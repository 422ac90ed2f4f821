//! Canonical option registry
//!
//! Every flag `ls` understands is pre-registered here with an `Unset` value.
//! Parsed options are written into the table by name; anything that is not a
//! canonical name is rejected.

use crate::{Error, Result};
use std::collections::HashMap;

/// Every recognized option name, short and long forms alike
pub const CANONICAL_FLAGS: &[&str] = &[
    "a",
    "all",
    "A",
    "almost-all",
    "author",
    "block-size",
    "B",
    "ignore-backups",
    "c",
    "C",
    "d",
    "directory",
    "f",
    "F",
    "classify",
    "file-type",
    "format",
    "full-time",
    "g",
    "group-directories-first",
    "G",
    "no-group",
    "h",
    "human-readable",
    "si",
    "indicator-style",
    "l",
    "L",
    "dereference",
    "m",
    "N",
    "literal",
    "o",
    "p",
    "Q",
    "quote-name",
    "quoting-style",
    "r",
    "reverse",
    "s",
    "size",
    "S",
    "sort",
    "time",
    "time-style",
    "t",
    "u",
    "U",
    "w",
    "width",
    "x",
    "X",
    "1",
    "help",
];

/// Value of one canonical flag
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlagValue {
    /// Never given on the command line
    #[default]
    Unset,
    /// Given without a value, or forced by another flag
    Bool(bool),
    /// Given as `name=value`
    Value(String),
}

impl FlagValue {
    /// Explicitly switched on
    pub fn is_true(&self) -> bool {
        matches!(self, FlagValue::Bool(true))
    }

    /// Anything other than unset or forced off
    pub fn is_set(&self) -> bool {
        !matches!(self, FlagValue::Unset | FlagValue::Bool(false))
    }

    /// The `=value` part, if any
    pub fn value(&self) -> Option<&str> {
        match self {
            FlagValue::Value(v) => Some(v),
            _ => None,
        }
    }
}

static UNSET: FlagValue = FlagValue::Unset;

/// Registry of canonical flags and their current values
#[derive(Debug, Clone)]
pub struct OptionTable {
    values: HashMap<&'static str, FlagValue>,
}

impl Default for OptionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionTable {
    /// A table with every canonical flag unset
    pub fn new() -> Self {
        Self {
            values: CANONICAL_FLAGS
                .iter()
                .map(|&name| (name, FlagValue::Unset))
                .collect(),
        }
    }

    /// Build a table from a merged list of option strings
    pub fn from_options<I, S>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for option in options {
            table.apply(option.as_ref())?;
        }
        Ok(table)
    }

    /// Record one option string: `name` sets a boolean, `name=value` a value
    pub fn apply(&mut self, option: &str) -> Result<()> {
        let (name, value) = match option.split_once('=') {
            Some((name, value)) => (name, FlagValue::Value(value.to_string())),
            None => (option, FlagValue::Bool(true)),
        };

        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::UnrecognizedOption(option.to_string())),
        }
    }

    /// Current value of a flag; non-canonical names read as unset
    pub fn get(&self, name: &str) -> &FlagValue {
        self.values.get(name).unwrap_or(&UNSET)
    }

    pub fn is_true(&self, name: &str) -> bool {
        self.get(name).is_true()
    }

    /// True when any of the names is explicitly switched on
    pub fn any_true(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.is_true(name))
    }

    /// True when any of the names is set to anything
    pub fn any_set(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.get(name).is_set())
    }

    /// True when the flag carries exactly this value
    pub fn value_is(&self, name: &str, expected: &str) -> bool {
        self.get(name).value() == Some(expected)
    }

    /// Overwrite a flag as an implication of another flag
    pub(crate) fn force(&mut self, name: &'static str, on: bool) {
        debug_assert!(self.values.contains_key(name), "not a canonical flag: {}", name);
        self.values.insert(name, FlagValue::Bool(on));
    }
}
