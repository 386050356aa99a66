//! # mdseek
//!
//! A terminal markdown reader with live, debounced in-document find.
//!
//! Documents are parsed into an arena tree ([`tree::DocTree`]). The find
//! engine in [`search`] wraps every case-insensitive occurrence of the query
//! in a highlight marker, in place, without changing the text the reader
//! shows, and keeps one marker current for next/previous navigation.
//!
//! ## Example
//!
//! ```rust
//! use mdseek::config::ContentConfig;
//! use mdseek::parse_markdown;
//! use mdseek::search::{SearchState, SearchSurface, run_search};
//!
//! let mut doc = parse_markdown("# Pets\n\nThe cat and the other cat.\n", &ContentConfig::default());
//! let mut state = SearchState::default();
//! let scope = doc.tree.search_scope();
//! let count = run_search(&mut doc.tree, scope, "CAT", &mut state, &mut ());
//!
//! assert_eq!(count, 2);
//! assert_eq!(state.indicator().as_deref(), Some("1/2"));
//! ```

/// Configuration module for persisting user preferences.
///
/// Provides configuration management for theme choices, find behaviour,
/// keybindings and logging.
pub mod config;

/// Keybindings module for customizable keyboard shortcuts.
pub mod keybindings;

/// File logging through `tracing`; the terminal UI owns stdout.
pub mod logging;

/// Parser module for markdown documents.
///
/// Turns markdown into a [`Document`] with its outline and tree.
pub mod parser;

/// In-document find: match scanning, in-place highlighting, navigation and
/// the debounced find bar controller.
pub mod search;

/// The document tree the reader draws and the find engine searches.
pub mod tree;

/// TUI module for the interactive reader.
pub mod tui;

pub use config::Config;
pub use parser::{Document, Heading, parse_file, parse_markdown};
pub use tui::App;
