//! File records and their display formatting
//!
//! A [`FileRecord`] is an immutable snapshot of the attributes `ls` can show
//! for one directory entry. The formatting helpers here turn those attributes
//! into the exact strings the renderer lays out: permission strings, scaled
//! sizes, timestamps, quoted names and indicator suffixes.

use crate::{Error, Result};
use chrono::{DateTime, Local, Utc};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Read/write/execute bits of one permission class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Triad {
    pub read: bool,
    pub write: bool,
    pub execute: bool,
}

impl Triad {
    pub fn new(read: bool, write: bool, execute: bool) -> Self {
        Self { read, write, execute }
    }

    /// Decode the low three bits of a Unix mode
    pub fn from_bits(bits: u32) -> Self {
        Self::new(bits & 0o4 != 0, bits & 0o2 != 0, bits & 0o1 != 0)
    }
}

/// Permission bits of an entry
///
/// Group and other classes are `None` when the platform cannot report them.
/// Unknown bits render as `.` so they never read as a denied `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileMode {
    pub owner: Triad,
    pub group: Option<Triad>,
    pub other: Option<Triad>,
}

impl FileMode {
    /// Mode with only the owner class known
    pub fn owner_only(owner: Triad) -> Self {
        Self {
            owner,
            group: None,
            other: None,
        }
    }

    /// Full Unix mode from `st_mode` permission bits
    pub fn from_unix(mode: u32) -> Self {
        Self {
            owner: Triad::from_bits(mode >> 6),
            group: Some(Triad::from_bits(mode >> 3)),
            other: Some(Triad::from_bits(mode)),
        }
    }

    fn push_triad(out: &mut String, triad: Option<Triad>) {
        match triad {
            Some(t) => {
                out.push(if t.read { 'r' } else { '-' });
                out.push(if t.write { 'w' } else { '-' });
                out.push(if t.execute { 'x' } else { '-' });
            }
            None => out.push_str("..."),
        }
    }

    /// The nine-character triad encoding
    pub fn triads(&self) -> String {
        let mut out = String::with_capacity(9);
        Self::push_triad(&mut out, Some(self.owner));
        Self::push_triad(&mut out, self.group);
        Self::push_triad(&mut out, self.other);
        out
    }
}

/// A snapshot of one filesystem entry's display-relevant attributes
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    /// Display name (`.` and `..` for the synthetic entries)
    pub name: String,
    /// Absolute path
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Is this a directory?
    pub is_dir: bool,
    /// Is this a symlink?
    pub is_symlink: bool,
    /// Resolved target for symlinks
    pub link_target: Option<PathBuf>,
    /// Is this executable by its owner?
    pub is_executable: bool,
    /// Modification time
    pub modified: SystemTime,
    /// Access time
    pub accessed: SystemTime,
    /// Owner name
    pub owner: String,
    /// Group name
    pub group: String,
    /// Permission bits
    pub mode: FileMode,
}

impl FileRecord {
    /// A plain file record with neutral metadata, mostly useful for building
    /// listings by hand
    pub fn file<S: Into<String>>(name: S, size: u64) -> Self {
        let name = name.into();
        Self {
            path: PathBuf::from(&name),
            name,
            size,
            is_dir: false,
            is_symlink: false,
            link_target: None,
            is_executable: false,
            modified: UNIX_EPOCH,
            accessed: UNIX_EPOCH,
            owner: "SYSTEM".to_string(),
            group: "SYSTEM".to_string(),
            mode: FileMode::owner_only(Triad::new(true, true, false)),
        }
    }

    /// A directory record with neutral metadata
    pub fn dir<S: Into<String>>(name: S) -> Self {
        Self {
            is_dir: true,
            mode: FileMode::owner_only(Triad::new(true, true, true)),
            ..Self::file(name, 0)
        }
    }

    /// Same record under another display name
    pub fn renamed<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Permission string: type character followed by the triads
    pub fn permissions(&self) -> String {
        let kind = if self.is_symlink {
            'l'
        } else if self.is_dir {
            'd'
        } else {
            '-'
        };
        format!("{}{}", kind, self.mode.triads())
    }

    /// Sort key for extension ordering: the text after the last dot, the
    /// whole name when there is no dot, empty for directories. Trailing dots
    /// are ignored, so `a.` sorts as `a`.
    pub fn extension(&self) -> &str {
        if self.is_dir {
            return "";
        }
        let name = self.name.trim_end_matches('.');
        match name.rfind('.') {
            Some(idx) => &name[idx + 1..],
            None => name,
        }
    }

    /// Size as shown in listings; directories always show `0`
    pub fn formatted_size(&self, scale: SizeScale) -> String {
        if self.is_dir {
            return "0".to_string();
        }
        format_size(self.size, scale)
    }

    /// Name wrapped or escaped per the quoting style
    pub fn quoted_name(&self, style: QuotingStyle) -> String {
        quote_name(&self.name, style)
    }

    /// Indicator suffix per the indicator style
    pub fn indicator(&self, style: IndicatorStyle) -> &'static str {
        match style {
            IndicatorStyle::None => "",
            IndicatorStyle::Slash => {
                if self.is_dir {
                    "/"
                } else {
                    ""
                }
            }
            IndicatorStyle::FileType | IndicatorStyle::Classify => {
                if self.is_symlink {
                    "@"
                } else if self.is_dir {
                    "/"
                } else if style == IndicatorStyle::Classify && self.is_executable {
                    "*"
                } else {
                    ""
                }
            }
        }
    }

    /// Quoted name plus indicator, the text every view prints for an entry
    pub fn display_name(&self, quoting: QuotingStyle, indicator: IndicatorStyle) -> String {
        format!("{}{}", self.quoted_name(quoting), self.indicator(indicator))
    }
}

/// Size units in scaling order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    B,
    K,
    M,
    G,
    T,
}

impl Unit {
    const ALL: [Unit; 5] = [Unit::B, Unit::K, Unit::M, Unit::G, Unit::T];

    fn suffix(self) -> &'static str {
        match self {
            Unit::B => "B",
            Unit::K => "K",
            Unit::M => "M",
            Unit::G => "G",
            Unit::T => "T",
        }
    }
}

impl FromStr for Unit {
    type Err = Error;

    /// Accepts `K`, `KB`, `KiB` and friends, case-insensitive
    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_uppercase();
        let (head, tail) = upper.split_at(upper.chars().next().map_or(0, |c| c.len_utf8()));
        if !matches!(tail, "" | "B" | "IB") || (head == "B" && !tail.is_empty()) {
            return Err(Error::invalid_value("block-size", s));
        }
        match head {
            "B" => Ok(Unit::B),
            "K" => Ok(Unit::K),
            "M" => Ok(Unit::M),
            "G" => Ok(Unit::G),
            "T" => Ok(Unit::T),
            _ => Err(Error::invalid_value("block-size", s)),
        }
    }
}

/// How byte counts are scaled for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeScale {
    /// Unit to scale to; `None` means "largest unit below the divisor"
    pub unit: Option<Unit>,
    /// 1024 or 1000
    pub divisor: u64,
}

impl Default for SizeScale {
    fn default() -> Self {
        Self {
            unit: Some(Unit::B),
            divisor: 1024,
        }
    }
}

impl SizeScale {
    /// Scale used for allocated-size columns, which never go below kilobytes
    pub fn allocated(self) -> Self {
        if self.unit == Some(Unit::B) {
            Self {
                unit: Some(Unit::K),
                ..self
            }
        } else {
            self
        }
    }
}

/// Format a byte count with the given scale
pub fn format_size(size: u64, scale: SizeScale) -> String {
    let divisor = scale.divisor as f64;
    let mut value = size as f64;
    let mut order = 0;

    while (value >= divisor || scale.unit.is_some())
        && order < Unit::ALL.len() - 1
        && scale.unit != Some(Unit::ALL[order])
    {
        value /= divisor;
        order += 1;
    }

    if order == 0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}{}", value, Unit::ALL[order].suffix())
    }
}

/// Entry name quoting policies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotingStyle {
    Literal,
    Locale,
    Shell,
    ShellAlways,
    ShellEscape,
    ShellEscapeAlways,
    C,
    CLocale,
    Escape,
}

impl FromStr for QuotingStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "literal" => Ok(QuotingStyle::Literal),
            "locale" => Ok(QuotingStyle::Locale),
            "shell" => Ok(QuotingStyle::Shell),
            "shell-always" => Ok(QuotingStyle::ShellAlways),
            "shell-escape" => Ok(QuotingStyle::ShellEscape),
            "shell-escape-always" => Ok(QuotingStyle::ShellEscapeAlways),
            "c" => Ok(QuotingStyle::C),
            "clocale" => Ok(QuotingStyle::CLocale),
            "escape" => Ok(QuotingStyle::Escape),
            _ => Err(Error::invalid_value("quoting-style", s)),
        }
    }
}

/// Quote a name per the quoting style
pub fn quote_name(name: &str, style: QuotingStyle) -> String {
    match style {
        QuotingStyle::Shell | QuotingStyle::ShellEscape if name.contains(' ') => {
            format!("'{}'", name)
        }
        QuotingStyle::Locale | QuotingStyle::ShellAlways | QuotingStyle::ShellEscapeAlways => {
            format!("'{}'", name)
        }
        QuotingStyle::C | QuotingStyle::CLocale => format!("\"{}\"", name),
        QuotingStyle::Escape => name.replace(' ', "\\ "),
        _ => name.to_string(),
    }
}

/// Suffix policies appended to entry names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorStyle {
    None,
    Slash,
    FileType,
    Classify,
}

impl FromStr for IndicatorStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(IndicatorStyle::None),
            "slash" => Ok(IndicatorStyle::Slash),
            "file-type" => Ok(IndicatorStyle::FileType),
            "classify" => Ok(IndicatorStyle::Classify),
            _ => Err(Error::invalid_value("indicator-style", s)),
        }
    }
}

impl fmt::Display for IndicatorStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndicatorStyle::None => "none",
            IndicatorStyle::Slash => "slash",
            IndicatorStyle::FileType => "file-type",
            IndicatorStyle::Classify => "classify",
        };
        f.write_str(name)
    }
}

/// Local `MMM dd HH:mm` timestamp
pub fn short_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("%b %d %H:%M").to_string()
}

/// UTC ISO-8601 timestamp at minute granularity
pub fn iso_time(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format("%Y-%m-%dT%H:%MZ").to_string()
}

/// Minutes since the epoch, the granularity time sorts compare at
pub fn minute_key(time: SystemTime) -> i64 {
    DateTime::<Utc>::from(time).timestamp().div_euclid(60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_degraded_permissions() {
        let record = FileRecord::file("a.txt", 10);
        assert_eq!(record.permissions(), "-rw.......");
    }

    #[test]
    fn test_unix_permissions() {
        let mut record = FileRecord::dir("src");
        record.mode = FileMode::from_unix(0o755);
        assert_eq!(record.permissions(), "drwxr-xr-x");
    }

    #[test]
    fn test_format_size() {
        let raw = SizeScale::default();
        assert_eq!(format_size(10, raw), "10");
        assert_eq!(format_size(1_048_576, raw), "1048576");

        let human = SizeScale { unit: None, divisor: 1024 };
        assert_eq!(format_size(1023, human), "1023");
        assert_eq!(format_size(1536, human), "1.5K");
        assert_eq!(format_size(1_048_576, human), "1.0M");

        let si = SizeScale { unit: None, divisor: 1000 };
        assert_eq!(format_size(1500, si), "1.5K");

        let mega = SizeScale { unit: Some(Unit::M), divisor: 1024 };
        assert_eq!(format_size(524_288, mega), "0.5M");
    }

    #[test]
    fn test_directory_size_is_zero() {
        let mut record = FileRecord::dir("docs");
        record.size = 4096;
        assert_eq!(record.formatted_size(SizeScale::default()), "0");
    }

    #[test]
    fn test_allocated_scale_minimum_is_k() {
        assert_eq!(SizeScale::default().allocated().unit, Some(Unit::K));
        let human = SizeScale { unit: None, divisor: 1000 };
        assert_eq!(human.allocated(), human);
    }

    #[test]
    fn test_unit_parse() {
        assert_eq!("M".parse::<Unit>().unwrap(), Unit::M);
        assert_eq!("kb".parse::<Unit>().unwrap(), Unit::K);
        assert_eq!("GiB".parse::<Unit>().unwrap(), Unit::G);
        assert!("X".parse::<Unit>().is_err());
        assert!("1024".parse::<Unit>().is_err());
    }

    #[test]
    fn test_quoting_styles() {
        assert_eq!(quote_name("my file.txt", QuotingStyle::C), "\"my file.txt\"");
        assert_eq!(quote_name("my file.txt", QuotingStyle::Shell), "'my file.txt'");
        assert_eq!(quote_name("plain.txt", QuotingStyle::Shell), "plain.txt");
        assert_eq!(quote_name("plain.txt", QuotingStyle::ShellAlways), "'plain.txt'");
        assert_eq!(quote_name("my file", QuotingStyle::Escape), "my\\ file");
        assert_eq!(quote_name("my file", QuotingStyle::Literal), "my file");
    }

    #[test]
    fn test_indicators() {
        let dir = FileRecord::dir("src");
        let mut exe = FileRecord::file("run.sh", 5);
        exe.is_executable = true;
        let mut link = FileRecord::file("latest", 0);
        link.is_symlink = true;

        assert_eq!(dir.indicator(IndicatorStyle::Slash), "/");
        assert_eq!(exe.indicator(IndicatorStyle::Slash), "");
        assert_eq!(exe.indicator(IndicatorStyle::FileType), "");
        assert_eq!(exe.indicator(IndicatorStyle::Classify), "*");
        assert_eq!(link.indicator(IndicatorStyle::FileType), "@");
        assert_eq!(dir.indicator(IndicatorStyle::None), "");
    }

    #[test]
    fn test_extension() {
        assert_eq!(FileRecord::file("archive.tar.gz", 1).extension(), "gz");
        assert_eq!(FileRecord::file("Makefile", 1).extension(), "Makefile");
        assert_eq!(FileRecord::file("a.", 1).extension(), "a");
        assert_eq!(FileRecord::file(".bashrc", 1).extension(), "bashrc");
        assert_eq!(FileRecord::dir("v1.2").extension(), "");
    }

    #[test]
    fn test_iso_time_and_minute_key() {
        let time = UNIX_EPOCH + Duration::from_secs(86_400 + 3_725);
        assert_eq!(iso_time(time), "1970-01-02T01:02Z");
        assert_eq!(minute_key(time), minute_key(time + Duration::from_secs(30)));
    }
}
