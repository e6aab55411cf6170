//! Error types for the compiler core.
//!
//! A flat, `thiserror`-derived error enum: one `Result` alias for the
//! whole crate, each variant carrying the offending source region.

use thiserror::Error;

use crate::meta::SourceMeta;

/// Result type for compiler operations.
pub type Result<T> = core::result::Result<T, PqlError>;

/// Core error type for the compiler.
#[derive(Debug, Error)]
pub enum PqlError {
    /// Type mismatches, illegal operand kinds, duplicate projection names,
    /// generic application against a non-container, etc.
    #[error("type error: {message}")]
    Type {
        message: String,
        meta: Option<SourceMeta>,
    },

    /// Named or out-of-position ellipsis.
    #[error("syntax error: {message}")]
    Syntax {
        message: String,
        meta: Option<SourceMeta>,
    },

    /// Unreachable states and invariant violations during lowering.
    #[error("compile error: {message}")]
    Compile {
        message: String,
        meta: Option<SourceMeta>,
    },

    /// A compile-time parameter was referenced while the caller requested
    /// evaluation of a live value. The orchestrator outside this crate is
    /// expected to retry at a higher access level.
    #[error("insufficient access level: {message}")]
    InsufficientAccessLevel {
        message: String,
        meta: Option<SourceMeta>,
    },

    /// An error raised by a Preql standard-library function invoked
    /// through [`crate::stdlib::PqlFunction::call`], re-stamped with the
    /// enclosing operator's source region while the original cause is
    /// preserved.
    #[error("{message}")]
    Wrapped {
        message: String,
        meta: Option<SourceMeta>,
        #[source]
        cause: Box<PqlError>,
    },
}

impl PqlError {
    pub fn type_error(meta: Option<SourceMeta>, message: impl Into<String>) -> Self {
        PqlError::Type {
            message: message.into(),
            meta,
        }
    }

    pub fn syntax_error(meta: Option<SourceMeta>, message: impl Into<String>) -> Self {
        PqlError::Syntax {
            message: message.into(),
            meta,
        }
    }

    pub fn compile_error(meta: Option<SourceMeta>, message: impl Into<String>) -> Self {
        PqlError::Compile {
            message: message.into(),
            meta,
        }
    }

    pub fn insufficient_access_level(meta: Option<SourceMeta>, message: impl Into<String>) -> Self {
        PqlError::InsufficientAccessLevel {
            message: message.into(),
            meta,
        }
    }

    pub fn meta(&self) -> Option<SourceMeta> {
        match self {
            PqlError::Type { meta, .. }
            | PqlError::Syntax { meta, .. }
            | PqlError::Compile { meta, .. }
            | PqlError::InsufficientAccessLevel { meta, .. }
            | PqlError::Wrapped { meta, .. } => *meta,
        }
    }

    /// Re-stamp the source region of this error with the enclosing
    /// operator's meta, keeping the original error as the cause. Used when
    /// Arith dispatches to a table-level stdlib function.
    pub fn rewrap(self, meta: Option<SourceMeta>) -> Self {
        let message = self.to_string();
        PqlError::Wrapped {
            message,
            meta,
            cause: Box::new(self),
        }
    }
}
