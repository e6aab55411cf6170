//! Source regions attached to AST nodes, used solely in error construction.

/// A region in the original source text. Parsing happens upstream of this
/// crate; we only need enough of its output to point an error back at
/// user code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceMeta {
    pub start: u32,
    pub end: u32,
}

impl SourceMeta {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Used when re-wrapping a standard-library error under the enclosing
    /// operator's region; see [`crate::error::PqlError::rewrap`].
    pub fn or(self, fallback: Option<SourceMeta>) -> SourceMeta {
        if self == SourceMeta::default() {
            fallback.unwrap_or(self)
        } else {
            self
        }
    }
}
