//! # mdseek
//!
//! A terminal markdown reader with live in-document find and highlight.
//!
//! ## Usage
//!
//! Read a document:
//! ```sh
//! mdseek README.md
//! ```
//!
//! Find from a script:
//! ```sh
//! mdseek --find install README.md
//! mdseek --find install --count README.md
//! ```

mod cli;

use clap::Parser as ClapParser;
use cli::Cli;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use mdseek::{App, Config, parser};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process;

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    let mut config = Config::load();
    if let Some(ref theme_name) = args.theme {
        config.ui.theme = theme_name.clone();
    }

    match mdseek::logging::init(&config.logging) {
        Ok(Some(path)) => tracing::debug!(log = %path.display(), "logging started"),
        Ok(None) => {}
        Err(e) => eprintln!("Warning: logging disabled: {:#}", e),
    }

    let (content, file_path) = match read_input(args.file.as_deref()) {
        Ok(Some(input)) => input,
        Ok(None) => {
            eprintln!("Error: markdown file argument is required");
            eprintln!("\nUsage: mdseek [OPTIONS] <FILE>");
            eprintln!("       mdseek [OPTIONS] -");
            eprintln!("       cat doc.md | mdseek [OPTIONS]");
            process::exit(2);
        }
        Err(e) => {
            eprintln!("Error reading input: {:#}", e);
            process::exit(1);
        }
    };

    let mut doc = parser::parse_markdown(&content, &config.content);

    if let Some(ref query) = args.find {
        let report = cli::find::find(&mut doc, query);
        cli::find::print_report(&report, args.output, args.count);
        if report.count == 0 {
            process::exit(1);
        }
        return Ok(());
    }

    if args.list {
        cli::find::print_headings(&doc, args.output);
        return Ok(());
    }

    let filename = file_path
        .as_deref()
        .and_then(Path::file_name)
        .and_then(|n| n.to_str())
        .unwrap_or("stdin")
        .to_string();

    let mut terminal = mdseek::tui::init_terminal().inspect_err(|e| {
        eprintln!("Failed to start the terminal UI: {}", e);
        eprintln!("Note: When piping input, ensure you have a controlling terminal.");
    })?;

    let app = App::new(doc, filename, file_path, config);
    let result = mdseek::tui::run(&mut terminal, app);
    mdseek::tui::restore_terminal();
    result
}

/// Document text and, for real files, the canonical path to watch.
///
/// `None` when there is nothing to read: no file argument and stdin is a
/// terminal.
fn read_input(file: Option<&Path>) -> Result<Option<(String, Option<PathBuf>)>> {
    match file {
        Some(path) if path == Path::new("-") => read_stdin().map(|c| Some((c, None))),
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("cannot read {}", path.display()))?;
            let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
            Ok(Some((content, Some(canonical))))
        }
        None if std::io::stdin().is_terminal() => Ok(None),
        None => read_stdin().map(|c| Some((c, None))),
    }
}

fn read_stdin() -> Result<String> {
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .wrap_err("cannot read stdin")?;
    Ok(content)
}
