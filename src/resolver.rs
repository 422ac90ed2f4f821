//! Option resolution
//!
//! Turns the raw [`OptionTable`] into one consistent [`EffectiveConfig`].
//! Resolution is a fixed, ordered list of rules. Each rule reads the working
//! copy of the table, may force other flags on or off, and writes its derived
//! fields; a later rule that touches the same field wins.

use crate::config::DisplayConfig;
use crate::options::{FlagValue, OptionTable};
use crate::record::{IndicatorStyle, QuotingStyle, SizeScale, Unit};
use crate::tokenizer::PathHints;
use crate::{Error, Result};

/// Active sort comparator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Keep enumeration order
    DirectoryOrder,
    /// Largest first
    Size,
    /// Alphabetical by extension
    Extension,
    /// Newest modification first
    ModificationTime,
    /// Newest access first
    AccessTime,
}

/// Which dot-entries survive filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HiddenPolicy {
    /// Everything, including `.` and `..`
    ShowAll,
    /// Hidden entries, but not `.` and `..`
    AlmostAll,
    /// Nothing starting with `.`
    HideDotFiles,
}

/// Output layout strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Long,
    SingleColumn,
    Horizontal,
    Comma,
    Vertical,
}

/// Grid geometry for the vertical and horizontal views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub columns: usize,
    pub padding: usize,
    /// Explicit cell width overriding the computed one
    pub fixed_width: Option<usize>,
}

/// The fully resolved display, sort and filter parameters of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub help: bool,
    pub directory_only: bool,
    pub ignore_backups: bool,
    pub hidden: HiddenPolicy,
    pub glob: Option<String>,
    pub sort: SortKey,
    pub reverse: bool,
    pub directories_first: bool,
    pub dereference: bool,
    pub full_time: bool,
    pub scale: SizeScale,
    pub indicator: IndicatorStyle,
    pub quoting: QuotingStyle,
    pub show_owner: bool,
    pub show_group: bool,
    pub show_author: bool,
    pub allocated_size: bool,
    pub access_time: bool,
    pub expand_subdirs: bool,
    pub color: bool,
    pub layout: Layout,
    pub view: View,
}

impl EffectiveConfig {
    fn initial(hints: &PathHints, display: &DisplayConfig) -> Self {
        Self {
            help: false,
            directory_only: false,
            ignore_backups: false,
            hidden: HiddenPolicy::ShowAll,
            glob: hints.glob.clone(),
            sort: SortKey::DirectoryOrder,
            reverse: false,
            directories_first: false,
            dereference: false,
            full_time: false,
            scale: SizeScale::default(),
            indicator: IndicatorStyle::None,
            quoting: QuotingStyle::Shell,
            show_owner: true,
            show_group: true,
            show_author: false,
            allocated_size: false,
            access_time: false,
            expand_subdirs: false,
            color: display.color,
            layout: Layout {
                columns: display.columns.max(1),
                padding: display.column_padding,
                fixed_width: None,
            },
            view: View::Vertical,
        }
    }

    /// Copy used for nested listings under wildcard expansion
    pub fn without_expansion(&self) -> Self {
        Self {
            expand_subdirs: false,
            ..self.clone()
        }
    }
}

/// Working state threaded through the rules
struct Resolution<'a> {
    table: OptionTable,
    hints: &'a PathHints,
    config: EffectiveConfig,
}

type Rule = fn(&mut Resolution<'_>) -> Result<()>;

/// The rule table, evaluated top to bottom exactly once
const RULES: &[(&str, Rule)] = &[
    ("help", help),
    ("no-sort", no_sort),
    ("directory-only", directory_only),
    ("ignore-backups", ignore_backups),
    ("almost-all", almost_all),
    ("hide-dot-files", hide_dot_files),
    ("sort-cancellation", sort_cancellation),
    ("ctime-without-long", ctime_without_long),
    ("sort-key", sort_key),
    ("access-time-display", access_time_display),
    ("access-time-sort", access_time_sort),
    ("reverse", reverse),
    ("directories-first", directories_first),
    ("time-style", time_style),
    ("size-scale", size_scale),
    ("indicator-style", indicator_style),
    ("quoting-style", quoting_style),
    ("column-visibility", column_visibility),
    ("allocated-size", allocated_size),
    ("dereference", dereference),
    ("fixed-width", fixed_width),
    ("view", view),
];

/// Resolve parsed options and positional hints into an effective configuration
pub fn resolve(
    table: &OptionTable,
    hints: &PathHints,
    display: &DisplayConfig,
) -> Result<EffectiveConfig> {
    let mut resolution = Resolution {
        table: table.clone(),
        hints,
        config: EffectiveConfig::initial(hints, display),
    };

    for (name, rule) in RULES {
        rule(&mut resolution)?;
        log::trace!("rule {} applied", name);
    }

    log::debug!("Effective configuration: {:?}", resolution.config);
    Ok(resolution.config)
}

fn help(r: &mut Resolution<'_>) -> Result<()> {
    r.config.help = r.table.is_true("help");
    Ok(())
}

/// `-f`: show everything in directory order, no long format, no sizes, no color
fn no_sort(r: &mut Resolution<'_>) -> Result<()> {
    if r.table.is_true("f") {
        r.table.force("a", true);
        r.table.force("U", true);
        r.table.force("l", false);
        r.table.force("s", false);
        r.table.force("size", false);
        if r.table.value_is("format", "long") || r.table.value_is("format", "verbose") {
            r.table.force("format", false);
        }
        r.config.color = false;
    }
    Ok(())
}

fn directory_only(r: &mut Resolution<'_>) -> Result<()> {
    r.config.directory_only =
        r.table.any_true(&["d", "directory"]) && !r.hints.mark_directories;
    Ok(())
}

fn ignore_backups(r: &mut Resolution<'_>) -> Result<()> {
    r.config.ignore_backups = r.table.any_true(&["B", "ignore-backups"]);
    Ok(())
}

fn almost_all(r: &mut Resolution<'_>) -> Result<()> {
    if r.table.any_true(&["A", "almost-all"]) && !r.table.any_set(&["a", "all"]) {
        r.config.hidden = HiddenPolicy::AlmostAll;
    }
    Ok(())
}

fn hide_dot_files(r: &mut Resolution<'_>) -> Result<()> {
    if !r.table.any_set(&["a", "all", "A", "almost-all"]) {
        r.config.hidden = HiddenPolicy::HideDotFiles;
    }
    Ok(())
}

/// `--sort=none` / `-U` drop every size, time and extension sort flag
fn sort_cancellation(r: &mut Resolution<'_>) -> Result<()> {
    if r.table.value_is("sort", "none") || r.table.is_true("U") {
        r.table.force("S", false);
        r.table.force("t", false);
        r.table.force("X", false);
        r.config.sort = SortKey::DirectoryOrder;
    }
    Ok(())
}

fn ctime_requested(table: &OptionTable) -> bool {
    table.is_true("c") || table.value_is("time", "ctime") || table.value_is("time", "status")
}

fn atime_requested(table: &OptionTable) -> bool {
    table.is_true("u")
        || table.value_is("time", "atime")
        || table.value_is("time", "access")
        || table.value_is("time", "use")
}

/// `-c` outside long format sorts by time
fn ctime_without_long(r: &mut Resolution<'_>) -> Result<()> {
    if let Some(value) = r.table.get("time").value() {
        if !matches!(value, "atime" | "access" | "use" | "ctime" | "status") {
            return Err(Error::invalid_value("time", value));
        }
    }
    if ctime_requested(&r.table) && !r.table.is_true("l") {
        r.table.force("t", true);
    }
    Ok(())
}

/// Size, then extension, then modification time; the last match wins
fn sort_key(r: &mut Resolution<'_>) -> Result<()> {
    if let Some(value) = r.table.get("sort").value() {
        if !matches!(value, "none" | "size" | "extension" | "time") {
            return Err(Error::invalid_value("sort", value));
        }
    }
    if r.table.is_true("S") || r.table.value_is("sort", "size") {
        r.config.sort = SortKey::Size;
    }
    if r.table.is_true("X") || r.table.value_is("sort", "extension") {
        r.config.sort = SortKey::Extension;
    }
    if r.table.is_true("t") || r.table.value_is("sort", "time") {
        r.config.sort = SortKey::ModificationTime;
    }
    Ok(())
}

fn access_time_display(r: &mut Resolution<'_>) -> Result<()> {
    r.config.access_time = atime_requested(&r.table);
    Ok(())
}

/// Access time replaces the sort key with `-t`, or whenever the format is not long
fn access_time_sort(r: &mut Resolution<'_>) -> Result<()> {
    if r.config.access_time
        && (r.config.sort == SortKey::ModificationTime || !r.table.is_true("l"))
    {
        r.config.sort = SortKey::AccessTime;
    }
    Ok(())
}

fn reverse(r: &mut Resolution<'_>) -> Result<()> {
    r.config.reverse = r.table.any_true(&["r", "reverse"]);
    Ok(())
}

fn directories_first(r: &mut Resolution<'_>) -> Result<()> {
    r.config.directories_first = r.table.is_true("group-directories-first");
    Ok(())
}

fn time_style(r: &mut Resolution<'_>) -> Result<()> {
    let iso_style = ["full-iso", "long-iso", "iso"]
        .iter()
        .any(|style| r.table.value_is("time-style", style));
    r.config.full_time = iso_style || r.table.is_true("full-time");
    Ok(())
}

/// Block size, then human-readable, then SI; the last match wins
fn size_scale(r: &mut Resolution<'_>) -> Result<()> {
    match r.table.get("block-size") {
        FlagValue::Value(value) => {
            let unit: Unit = value.parse()?;
            r.config.scale = SizeScale {
                unit: Some(unit),
                divisor: 1024,
            };
        }
        FlagValue::Bool(true) => {
            return Err(Error::invalid_value("block-size", ""));
        }
        _ => {}
    }
    if r.table.any_true(&["h", "human-readable"]) {
        r.config.scale = SizeScale {
            unit: None,
            divisor: 1024,
        };
    }
    if r.table.is_true("si") {
        r.config.scale = SizeScale {
            unit: None,
            divisor: 1000,
        };
    }
    Ok(())
}

/// Marked directories, slash, file-type, classify; the last match wins
fn indicator_style(r: &mut Resolution<'_>) -> Result<()> {
    let requested = match r.table.get("indicator-style").value() {
        Some(value) => Some(value.parse::<IndicatorStyle>()?),
        None => None,
    };

    if r.table.any_true(&["d", "directory"]) && r.hints.mark_directories {
        r.config.indicator = IndicatorStyle::Slash;
    }
    if r.table.is_true("p") || requested == Some(IndicatorStyle::Slash) {
        r.config.indicator = IndicatorStyle::Slash;
    }
    if r.table.is_true("file-type") || requested == Some(IndicatorStyle::FileType) {
        r.config.indicator = IndicatorStyle::FileType;
    }
    if r.table.any_true(&["F", "classify"]) || requested == Some(IndicatorStyle::Classify) {
        r.config.indicator = IndicatorStyle::Classify;
    }
    Ok(())
}

/// Quote-name, explicit style, literal; the last match wins
fn quoting_style(r: &mut Resolution<'_>) -> Result<()> {
    if r.table.any_true(&["Q", "quote-name"]) {
        r.config.quoting = QuotingStyle::C;
    }
    match r.table.get("quoting-style") {
        FlagValue::Value(value) => r.config.quoting = value.parse()?,
        FlagValue::Bool(true) => {
            return Err(Error::invalid_value("quoting-style", ""));
        }
        _ => {}
    }
    if r.table.any_true(&["N", "literal"]) {
        r.config.quoting = QuotingStyle::Literal;
    }
    Ok(())
}

fn column_visibility(r: &mut Resolution<'_>) -> Result<()> {
    r.config.show_owner = !r.table.is_true("g");
    r.config.show_group = !r.table.any_true(&["G", "no-group", "o"]);
    r.config.show_author = r.table.is_true("author");
    Ok(())
}

fn allocated_size(r: &mut Resolution<'_>) -> Result<()> {
    r.config.allocated_size = r.table.any_true(&["s", "size"]);
    r.config.expand_subdirs = r.hints.expand_subdirs;
    Ok(())
}

fn dereference(r: &mut Resolution<'_>) -> Result<()> {
    r.config.dereference = r.table.any_true(&["L", "dereference"]);
    Ok(())
}

fn fixed_width(r: &mut Resolution<'_>) -> Result<()> {
    for name in ["w", "width"] {
        let width = match r.table.get(name) {
            FlagValue::Value(value) => value
                .parse::<usize>()
                .ok()
                .filter(|w| *w > 0)
                .ok_or_else(|| Error::invalid_value("width", value.as_str()))?,
            FlagValue::Bool(true) => return Err(Error::invalid_value("width", "")),
            _ => continue,
        };
        r.config.layout.fixed_width = Some(width);
    }
    Ok(())
}

/// Long > single-column > horizontal > commas > vertical
fn view(r: &mut Resolution<'_>) -> Result<()> {
    let t = &r.table;
    if let Some(value) = t.get("format").value() {
        if !matches!(
            value,
            "long" | "verbose" | "single-column" | "across" | "horizontal" | "commas" | "vertical"
        ) {
            return Err(Error::invalid_value("format", value));
        }
    }

    r.config.view = if t.is_true("l")
        || t.value_is("format", "long")
        || t.value_is("format", "verbose")
    {
        View::Long
    } else if t.is_true("1") || t.value_is("format", "single-column") {
        View::SingleColumn
    } else if t.is_true("x")
        || t.value_is("format", "across")
        || t.value_is("format", "horizontal")
    {
        View::Horizontal
    } else if t.is_true("m") || t.value_is("format", "commas") {
        View::Comma
    } else {
        View::Vertical
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_with(options: &[&str], hints: PathHints) -> Result<EffectiveConfig> {
        let table = OptionTable::from_options(options)?;
        resolve(&table, &hints, &DisplayConfig::default())
    }

    fn resolve_opts(options: &[&str]) -> EffectiveConfig {
        resolve_with(options, PathHints::default()).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = resolve_opts(&[]);
        assert_eq!(config.view, View::Vertical);
        assert_eq!(config.hidden, HiddenPolicy::HideDotFiles);
        assert_eq!(config.sort, SortKey::DirectoryOrder);
        assert_eq!(config.quoting, QuotingStyle::Shell);
        assert_eq!(config.scale, SizeScale::default());
        assert!(config.show_owner && config.show_group && !config.show_author);
    }

    #[test]
    fn test_short_and_long_forms_agree() {
        assert_eq!(resolve_opts(&["l", "A"]), resolve_opts(&["format=long", "almost-all"]));
    }

    #[test]
    fn test_hidden_policies() {
        assert_eq!(resolve_opts(&["a"]).hidden, HiddenPolicy::ShowAll);
        assert_eq!(resolve_opts(&["A"]).hidden, HiddenPolicy::AlmostAll);
        assert_eq!(resolve_opts(&["A", "all"]).hidden, HiddenPolicy::ShowAll);
    }

    #[test]
    fn test_no_sort_flag() {
        let config = resolve_opts(&["f", "l", "s", "t"]);
        assert_eq!(config.hidden, HiddenPolicy::ShowAll);
        assert_eq!(config.sort, SortKey::DirectoryOrder);
        assert_eq!(config.view, View::Vertical);
        assert!(!config.allocated_size);
        assert!(!config.color);
    }

    #[test]
    fn test_directory_only_and_marking() {
        assert!(resolve_opts(&["d"]).directory_only);

        let hints = PathHints {
            mark_directories: true,
            ..Default::default()
        };
        let config = resolve_with(&["d"], hints).unwrap();
        assert!(!config.directory_only);
        assert_eq!(config.indicator, IndicatorStyle::Slash);
    }

    #[test]
    fn test_time_sort_wins_over_size_and_extension() {
        assert_eq!(resolve_opts(&["S"]).sort, SortKey::Size);
        assert_eq!(resolve_opts(&["S", "X"]).sort, SortKey::Extension);
        assert_eq!(resolve_opts(&["X", "t", "S"]).sort, SortKey::ModificationTime);
        assert_eq!(resolve_opts(&["sort=extension"]).sort, SortKey::Extension);
    }

    #[test]
    fn test_sort_cancellation() {
        assert_eq!(resolve_opts(&["S", "t", "U"]).sort, SortKey::DirectoryOrder);
        let config = resolve_opts(&["sort=none", "r"]);
        assert_eq!(config.sort, SortKey::DirectoryOrder);
        assert!(config.reverse);
    }

    #[test]
    fn test_ctime_without_long_sorts_by_time() {
        assert_eq!(resolve_opts(&["c"]).sort, SortKey::ModificationTime);
        assert_eq!(resolve_opts(&["c", "l"]).sort, SortKey::DirectoryOrder);
        assert_eq!(resolve_opts(&["time=ctime"]).sort, SortKey::ModificationTime);
    }

    #[test]
    fn test_access_time() {
        let config = resolve_opts(&["u"]);
        assert!(config.access_time);
        assert_eq!(config.sort, SortKey::AccessTime);

        let config = resolve_opts(&["l", "u"]);
        assert!(config.access_time);
        assert_eq!(config.sort, SortKey::DirectoryOrder);

        assert_eq!(resolve_opts(&["l", "t", "u"]).sort, SortKey::AccessTime);
    }

    #[test]
    fn test_size_scale_order() {
        let config = resolve_opts(&["block-size=M"]);
        assert_eq!(config.scale, SizeScale { unit: Some(Unit::M), divisor: 1024 });

        let config = resolve_opts(&["block-size=M", "h"]);
        assert_eq!(config.scale, SizeScale { unit: None, divisor: 1024 });

        let config = resolve_opts(&["h", "si"]);
        assert_eq!(config.scale, SizeScale { unit: None, divisor: 1000 });
    }

    #[test]
    fn test_indicator_order() {
        assert_eq!(resolve_opts(&["p"]).indicator, IndicatorStyle::Slash);
        assert_eq!(resolve_opts(&["p", "file-type"]).indicator, IndicatorStyle::FileType);
        assert_eq!(resolve_opts(&["F", "p"]).indicator, IndicatorStyle::Classify);
        assert_eq!(
            resolve_opts(&["indicator-style=classify"]).indicator,
            IndicatorStyle::Classify
        );
    }

    #[test]
    fn test_quoting_order() {
        assert_eq!(resolve_opts(&["Q"]).quoting, QuotingStyle::C);
        assert_eq!(resolve_opts(&["Q", "quoting-style=escape"]).quoting, QuotingStyle::Escape);
        assert_eq!(resolve_opts(&["Q", "N"]).quoting, QuotingStyle::Literal);
    }

    #[test]
    fn test_column_visibility() {
        let config = resolve_opts(&["g", "o", "author"]);
        assert!(!config.show_owner);
        assert!(!config.show_group);
        assert!(config.show_author);
        assert!(!resolve_opts(&["G"]).show_group);
    }

    #[test]
    fn test_time_style_implies_full_time() {
        assert!(resolve_opts(&["time-style=long-iso"]).full_time);
        assert!(resolve_opts(&["full-time"]).full_time);
        assert!(!resolve_opts(&["time-style=locale"]).full_time);
    }

    #[test]
    fn test_view_priority() {
        assert_eq!(resolve_opts(&["m", "x", "1", "l"]).view, View::Long);
        assert_eq!(resolve_opts(&["m", "x", "1"]).view, View::SingleColumn);
        assert_eq!(resolve_opts(&["m", "x"]).view, View::Horizontal);
        assert_eq!(resolve_opts(&["m"]).view, View::Comma);
        assert_eq!(resolve_opts(&["C"]).view, View::Vertical);
        assert_eq!(resolve_opts(&["format=verbose"]).view, View::Long);
    }

    #[test]
    fn test_invalid_values() {
        for option in [
            "format=grid",
            "sort=color",
            "time=birth",
            "quoting-style=fancy",
            "indicator-style=emoji",
            "block-size=Q",
            "width=zero",
        ] {
            assert!(
                matches!(
                    resolve_with(&[option], PathHints::default()),
                    Err(Error::InvalidOptionValue { .. })
                ),
                "{} should be rejected",
                option
            );
        }
    }

    #[test]
    fn test_expansion_and_width() {
        let hints = PathHints {
            expand_subdirs: true,
            ..Default::default()
        };
        let config = resolve_with(&["l", "width=12"], hints).unwrap();
        assert!(config.expand_subdirs);
        assert_eq!(config.layout.fixed_width, Some(12));
        assert!(!config.without_expansion().expand_subdirs);
    }

    #[test]
    fn test_short_width_alias() {
        assert_eq!(resolve_opts(&["w=8"]).layout.fixed_width, Some(8));
        assert_eq!(resolve_opts(&["w=8", "width=3"]).layout.fixed_width, Some(3));
        assert!(matches!(
            resolve_with(&["w=0"], PathHints::default()),
            Err(Error::InvalidOptionValue { .. })
        ));
        assert!(matches!(
            resolve_with(&["w"], PathHints::default()),
            Err(Error::InvalidOptionValue { .. })
        ));
        assert!(matches!(
            resolve_with(&["width"], PathHints::default()),
            Err(Error::InvalidOptionValue { .. })
        ));
    }
}
