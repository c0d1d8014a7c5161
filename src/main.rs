//! replace-chars: replace unwanted characters in text files.
//!
//! Intended as a pre-commit hook. Each file is fixed line by line using the
//! replacement table; changed files are rewritten (or only reported with
//! `--check`) and the exit status tells the hook runner whether the tree
//! needed modification.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Args, ColorChoice};
use colored::Colorize;
use replace_chars::{Mode, ReplacementMap, recorder, replacements, report, scanner};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    apply_color_choice(args.color);

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn apply_color_choice(choice: ColorChoice) {
    match choice {
        ColorChoice::Auto => {}
        ColorChoice::Always => colored::control::set_override(true),
        ColorChoice::Never => colored::control::set_override(false),
    }
}

/// Runs the whole pipeline. Returns whether the run was clean.
fn run(args: Args) -> Result<bool> {
    let map = build_map(&args)?;
    if !map.is_idempotent() {
        let chained: Vec<_> = map
            .chained_keys()
            .into_iter()
            .map(replace_chars::error::codepoint)
            .collect();
        log::warn!(
            "replacement targets are themselves replaced ({}); a second run may find more changes",
            chained.join(", ")
        );
    }
    for line in replacements::describe(&map) {
        log::debug!("map {line}");
    }

    let excludes = scanner::compile_excludes(&args.exclude).context("Invalid --exclude pattern")?;
    let files = scanner::collect_files(args.files, std::io::stdin().lock(), excludes)
        .context("Failed to read file list from stdin")?;

    let mode = if args.check { Mode::Check } else { Mode::Fix };
    let result = recorder::record_all(&map, files, mode);

    print!("{}", report::render_changes(&result, args.show_changes));
    eprint!("{}", report::render_errors(result.errors()));
    if args.verbose {
        eprintln!("{}", report::render_summary(&result));
    }

    Ok(result.is_success())
}

/// Layers the built-in table, the config file and `--map` entries.
fn build_map(args: &Args) -> Result<ReplacementMap> {
    let mut map = if args.no_default_map {
        ReplacementMap::new()
    } else {
        ReplacementMap::builtin()
    };

    if let Some(path) = &args.config {
        let config = replacements::load_config(path)?;
        map.extend_from_config(&config)?;
    }
    for &(source, dest) in &args.map {
        map.insert(source, dest).context("Invalid --map entry")?;
    }

    if map.is_empty() {
        log::warn!("replacement table is empty; no file will change");
    }
    Ok(map)
}
