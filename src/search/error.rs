use thiserror::Error;

/// Why a match range could not be turned into a highlight.
///
/// These never reach the caller of the engine: the applier logs and skips the
/// offending range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WrapError {
    #[error("node is not a live text unit")]
    NotText,
    #[error("range {start}..{end} is empty")]
    EmptyRange { start: usize, end: usize },
    #[error("range {start}..{end} exceeds unit length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },
    #[error("range {start}..{end} splits a character")]
    NotCharBoundary { start: usize, end: usize },
}
