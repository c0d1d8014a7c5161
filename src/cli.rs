//! Command-line interface definitions.
//!
//! A single command: fix (or, with `--check`, only report) the given files.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Replace unwanted characters in text files.
///
/// Files are read from stdin, one path per line, when none are given.
/// Exits 1 when any file was changed, needs changing, or could not be
/// checked.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Files to check.
    pub files: Vec<PathBuf>,

    /// Report files that need changes without modifying them.
    #[arg(long)]
    pub check: bool,

    /// Print a diff of the changed lines for each file.
    #[arg(long)]
    pub show_changes: bool,

    /// When to color output.
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// TOML file with additional replacements.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Start from an empty table instead of the built-in replacements.
    #[arg(long)]
    pub no_default_map: bool,

    /// Extra replacement in `SRC=DST` form. Characters may be written as `U+2013`.
    #[arg(long = "map", value_parser = parse_map_entry)]
    pub map: Vec<(char, char)>,

    /// Glob patterns for files to skip (e.g., "*.lock", "vendor/**").
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Enable debug logging and print a run summary to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

fn parse_map_entry(s: &str) -> Result<(char, char), String> {
    replace_chars::replacements::parse_entry(s).map_err(|e| e.to_string())
}
