//! Output rendering
//!
//! Five layout strategies turn a filtered, sorted sequence of records into
//! text: long, single-column, vertical grid, horizontal grid and comma
//! separated. All of them write to any `Write` so the caller decides between
//! the console and a redirect file.

use crate::record::{iso_time, short_time, FileRecord};
use crate::resolver::{EffectiveConfig, Layout, View};
use crate::Result;
use colored::*;
use std::io::Write;

/// Render a listing with the configured non-recursive view
pub fn render(
    out: &mut dyn Write,
    header: &str,
    entries: &[FileRecord],
    config: &EffectiveConfig,
) -> Result<()> {
    match config.view {
        View::Long => {
            print_long_header(out, header)?;
            for entry in entries {
                print_detailed_line(out, entry, config)?;
            }
            Ok(())
        }
        View::SingleColumn => print_single_column(out, entries, config),
        View::Vertical => print_vertical(out, entries, config),
        View::Horizontal => print_horizontal(out, entries, config),
        View::Comma => print_comma(out, entries, config),
    }
}

/// `<name>:` followed by a blank line
pub fn print_long_header(out: &mut dyn Write, header: &str) -> Result<()> {
    writeln!(out, "{}:", header)?;
    writeln!(out)?;
    Ok(())
}

/// One line of the long listing
pub fn print_detailed_line(
    out: &mut dyn Write,
    entry: &FileRecord,
    config: &EffectiveConfig,
) -> Result<()> {
    if config.allocated_size {
        write!(out, "{:>15.15} ", entry.formatted_size(config.scale.allocated()))?;
    }

    write!(out, "{:<12.12} ", entry.permissions())?;

    if config.show_owner {
        write!(out, "{:<20.20} ", entry.owner)?;
    }
    if config.show_group {
        write!(out, "{:<8.8} ", entry.group)?;
    }
    if config.show_author {
        write!(out, "{:<20.20} ", entry.owner)?;
    }

    write!(out, "{:>15.15} ", entry.formatted_size(config.scale))?;

    if config.access_time {
        write!(out, "{:>14.14} ", short_time(entry.accessed))?;
    } else if config.full_time {
        write!(out, "{:>20.20} ", iso_time(entry.modified))?;
    } else {
        write!(out, "{:>14.14} ", short_time(entry.modified))?;
    }

    let name = entry.display_name(config.quoting, config.indicator);
    write!(out, "{}", paint(entry, name, config.color))?;

    if entry.is_symlink {
        if let Some(target) = &entry.link_target {
            write!(out, " -> {}", target.display())?;
        }
    }

    writeln!(out)?;
    Ok(())
}

/// One entry per line
pub fn print_single_column(
    out: &mut dyn Write,
    entries: &[FileRecord],
    config: &EffectiveConfig,
) -> Result<()> {
    for entry in entries {
        write_allocated_prefix(out, entry, config)?;
        let name = entry.display_name(config.quoting, config.indicator);
        writeln!(out, "{}", paint(entry, name, config.color))?;
    }
    Ok(())
}

/// Column-major grid
pub fn print_vertical(
    out: &mut dyn Write,
    entries: &[FileRecord],
    config: &EffectiveConfig,
) -> Result<()> {
    let names = display_names(entries, config);
    let widths = vertical_widths(&names, &config.layout);
    let columns = config.layout.columns;
    let rows = names.len().div_ceil(columns);

    for row in 0..rows {
        for (col, width) in widths.iter().enumerate() {
            let idx = row + rows * col;
            if idx >= entries.len() {
                break;
            }
            write_cell(out, &entries[idx], &names[idx], *width, config)?;
        }
        writeln!(out)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Row-major grid
pub fn print_horizontal(
    out: &mut dyn Write,
    entries: &[FileRecord],
    config: &EffectiveConfig,
) -> Result<()> {
    let names = display_names(entries, config);
    let widths = horizontal_widths(&names, &config.layout);
    let columns = config.layout.columns;

    for (idx, entry) in entries.iter().enumerate() {
        write_cell(out, entry, &names[idx], widths[idx % columns], config)?;
        if idx % columns == columns - 1 {
            writeln!(out)?;
        }
    }
    writeln!(out)?;
    Ok(())
}

/// Everything on one line, comma separated
pub fn print_comma(
    out: &mut dyn Write,
    entries: &[FileRecord],
    config: &EffectiveConfig,
) -> Result<()> {
    for (idx, entry) in entries.iter().enumerate() {
        if config.allocated_size {
            write!(out, "{} ", entry.formatted_size(config.scale.allocated()))?;
        }
        let name = entry.display_name(config.quoting, config.indicator);
        write!(out, "{}", paint(entry, name, config.color))?;
        if idx + 1 < entries.len() {
            write!(out, ", ")?;
        }
    }
    writeln!(out)?;
    Ok(())
}

/// Per-column widths for the column-major grid
pub fn vertical_widths(names: &[String], layout: &Layout) -> Vec<usize> {
    let columns = layout.columns;
    let rows = names.len().div_ceil(columns);
    let mut widths = vec![0; columns];

    for (idx, name) in names.iter().enumerate() {
        let col = idx / rows.max(1);
        widths[col] = widths[col].max(name.chars().count());
    }

    finish_widths(widths, layout)
}

/// Per-column widths for the row-major grid
pub fn horizontal_widths(names: &[String], layout: &Layout) -> Vec<usize> {
    let columns = layout.columns;
    let mut widths = vec![0; columns];

    for (idx, name) in names.iter().enumerate() {
        let col = idx % columns;
        widths[col] = widths[col].max(name.chars().count());
    }

    finish_widths(widths, layout)
}

fn finish_widths(widths: Vec<usize>, layout: &Layout) -> Vec<usize> {
    match layout.fixed_width {
        Some(fixed) => vec![fixed; widths.len()],
        None => widths.into_iter().map(|w| w + layout.padding).collect(),
    }
}

fn display_names(entries: &[FileRecord], config: &EffectiveConfig) -> Vec<String> {
    entries
        .iter()
        .map(|e| e.display_name(config.quoting, config.indicator))
        .collect()
}

fn write_allocated_prefix(
    out: &mut dyn Write,
    entry: &FileRecord,
    config: &EffectiveConfig,
) -> Result<()> {
    if config.allocated_size {
        write!(out, "{:>15.15} ", entry.formatted_size(config.scale.allocated()))?;
    }
    Ok(())
}

fn write_cell(
    out: &mut dyn Write,
    entry: &FileRecord,
    name: &str,
    width: usize,
    config: &EffectiveConfig,
) -> Result<()> {
    write_allocated_prefix(out, entry, config)?;
    let cell = format!("{:<width$.width$}", name, width = width);
    write!(out, "{}", paint(entry, cell, config.color))?;
    Ok(())
}

/// Colorize a name by entry type
fn paint(entry: &FileRecord, text: String, color: bool) -> String {
    if !color {
        text
    } else if entry.is_symlink {
        text.cyan().to_string()
    } else if entry.is_dir {
        text.blue().bold().to_string()
    } else if entry.is_executable {
        text.green().to_string()
    } else {
        text
    }
}

/// Static usage document printed by `ls --help`
pub const USAGE: &str = "\
Usage: ls [OPTION]... [FILE]...
List information about the FILEs (the current directory by default).
Entries are listed in directory order unless one of -cStuX or --sort is given.

Mandatory arguments to long options are mandatory for short options too.
  -a, --all                  do not ignore entries starting with .
  -A, --almost-all           do not list implied . and ..
      --author               with -l, print the author of each file
      --block-size=SIZE      scale sizes by SIZE before printing them; e.g.,
                               '--block-size=M' prints sizes in units of
                               1,048,576 bytes; see SIZE format below
  -B, --ignore-backups       do not list implied entries ending with ~
  -c                         with -l: show ctime and sort by name;
                               otherwise: sort by ctime, newest first
  -C                         list entries by columns
  -d, --directory            list directories themselves, not their contents
  -f                         do not sort, enable -aU, disable -ls --color
  -F, --classify             append indicator (one of */@) to entries
      --file-type            likewise, except do not append '*'
      --format=WORD          across -x, commas -m, horizontal -x, long -l,
                               single-column -1, verbose -l, vertical -C
      --full-time            show times as ISO-8601 UTC
  -g                         in a long listing, don't print owner names
      --group-directories-first
                             group directories before files
  -G, --no-group             in a long listing, don't print group names
  -h, --human-readable       with -l and/or -s, print human readable sizes
                               (e.g., 1.0K 234.0M 2.0G)
      --si                   likewise, but use powers of 1000 not 1024
      --indicator-style=WORD  append indicator with style WORD to entry names:
                               none (default), slash (-p),
                               file-type (--file-type), classify (-F)
  -l                         use a long listing format
  -L, --dereference          when showing file information for a symbolic
                               link, show information for the file the link
                               references rather than for the link itself
  -m                         fill width with a comma separated list of entries
  -N, --literal              print entry names without quoting
  -o                         in a long listing, don't print group names
  -p, --indicator-style=slash
                             append / indicator to directories
  -Q, --quote-name           enclose entry names in double quotes
      --quoting-style=WORD   use quoting style WORD for entry names:
                               literal, locale, shell, shell-always,
                               shell-escape, shell-escape-always, c, clocale,
                               escape
  -r, --reverse              reverse order while sorting
  -s, --size                 print the allocated size of each file
  -S                         sort by file size, largest first
      --sort=WORD            sort by WORD: none (-U), size (-S),
                               time (-t), extension (-X)
      --time=WORD            with -l, show time as WORD instead of default
                               modification time: atime or access or use (-u);
                               ctime or status (-c)
      --time-style=STYLE     with -l, show times using style STYLE:
                               full-iso, long-iso, iso, locale
  -t                         sort by modification time, newest first
  -u                         with -lt: sort by, and show, access time;
                               with -l: show access time;
                               otherwise: sort by access time, newest first
  -U                         do not sort; list entries in directory order
      --width=COLS           use a fixed grid cell width of COLS
  -x                         list entries by lines instead of by columns
  -X                         sort alphabetically by entry extension
  -1                         list one file per line
      --help     display this help and exit

Targets: '*' lists every subdirectory one level deep with -l, '*/' marks
directories with -d, any other word containing '*' filters names.
'> FILE' writes the listing to FILE in the current directory.

The SIZE argument is a unit: K,M,G,T (powers of 1024).
";

/// Print the usage document
pub fn print_help(out: &mut dyn Write) -> Result<()> {
    out.write_all(USAGE.as_bytes())?;
    Ok(())
}
