//! In-document find engine.
//!
//! A query is matched case-insensitively against every visible text unit of
//! a [`TextTree`], each occurrence is wrapped in a highlight marker without
//! changing the rendered text, and one marker at a time is current.
//!
//! The pipeline, leaves first:
//!
//! - [`extract`] yields the searchable text units in document order
//! - [`matcher`] finds literal occurrences in one unit
//! - [`apply`] wraps them, last occurrence first, so offsets stay valid
//! - [`remove`] unwraps them again and re-merges the text
//! - [`navigate`] moves the current marker with wraparound
//! - [`controller`] owns the find bar and debounces query edits

pub mod apply;
pub mod controller;
pub mod debounce;
mod error;
pub mod extract;
pub mod matcher;
pub mod navigate;
pub mod remove;
mod state;
mod tree;

pub use apply::{AppliedUnit, Fragment, apply_all, apply_unit};
pub use controller::{
    DEFAULT_DEBOUNCE, DEFAULT_MAX_QUERY_LEN, Phase, QueryInput, SearchController, run_search,
};
pub use debounce::Debouncer;
pub use error::WrapError;
pub use extract::{SearchScope, text_units};
pub use matcher::{MatchRange, Matcher};
pub use remove::{purge_markers, remove_highlights};
pub use state::{Highlight, SearchState};
pub use tree::{
    ComputedVisibility, ScrollBehavior, ScrollBlock, ScrollIntoView, ScrollOptions, SearchSurface,
    TextTree, Wrapped,
};
