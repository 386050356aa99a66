use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mdseek")]
#[command(version)]
#[command(about = "A terminal markdown reader with live in-document find")]
#[command(
    long_about = "mdseek - A terminal markdown reader with live in-document find and highlight.\n\n\
    Launch without flags to read a document with an outline pane and a find bar\n\
    (press / or Ctrl+F). Use flags to search or list headings from scripts.\n\n\
    Examples:\n  \
    mdseek README.md                  # Interactive reader\n  \
    mdseek --find install README.md   # Print every match with its section\n  \
    mdseek --find api -o json doc.md  # Same, as JSON\n  \
    cat doc.md | mdseek -l            # List headings from stdin"
)]
pub struct Cli {
    /// Markdown file to read, or '-' for stdin
    ///
    /// If no file is given and stdin is piped, input is read from stdin.
    pub file: Option<PathBuf>,

    /// Find every occurrence of QUERY (case-insensitive, non-interactive)
    ///
    /// Prints each match with the heading of the section it is in.
    /// Exits with status 1 when nothing matches.
    #[arg(short = 'f', long = "find", value_name = "QUERY")]
    pub find: Option<String>,

    /// With --find, print only the number of matches
    #[arg(short = 'c', long = "count", requires = "find")]
    pub count: bool,

    /// List all headings in the document (non-interactive)
    #[arg(short = 'l', long = "list", conflicts_with = "find")]
    pub list: bool,

    /// Output format for --find and --list
    #[arg(short = 'o', long = "output", default_value = "plain")]
    pub output: OutputFormat,

    /// Set theme for the reader, overriding the saved preference
    ///
    /// Available themes: OceanDark, Nord, Dracula, Gruvbox
    #[arg(long = "theme", value_name = "THEME")]
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Plain,
    /// JSON for scripting
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_find_with_json_output() {
        let cli = Cli::parse_from(["mdseek", "--find", "alpha", "-o", "json", "doc.md"]);
        assert_eq!(cli.find.as_deref(), Some("alpha"));
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.file, Some(PathBuf::from("doc.md")));
    }

    #[test]
    fn test_count_requires_find() {
        assert!(Cli::try_parse_from(["mdseek", "--count", "doc.md"]).is_err());
    }

    #[test]
    fn test_no_flags_opens_reader() {
        let cli = Cli::parse_from(["mdseek", "-"]);
        assert!(cli.find.is_none() && !cli.list);
        assert_eq!(cli.file, Some(PathBuf::from("-")));
    }
}
