// ── Central error types ───────────────────────────────────────────────────────
//
// Loading returns `error::Result<T>`; rendering returns
// `std::result::Result<T, RenderError>`.  No panics in production paths.
// Strategy-level failures inside the loader never surface here: they are
// logged at debug level and turned into "try the next strategy".

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::loader::PlatformTag;

/// Every error the native-module loader can produce.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Neither the embedded resource nor any filesystem candidate could be
    /// loaded for this platform.
    #[error("native vectorcanvas library unresolved for platform {tag}")]
    Unresolved { tag: PlatformTag },

    /// The host's dynamic loader rejected the artifact.
    #[error("failed to load native library {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    /// A Win32 API call returned a failure code.
    #[error("{function} failed (error {code:#010x})")]
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },

    /// The loaded module does not export a required entry point.
    #[error("native library does not export `{0}`")]
    MissingSymbol(&'static str),

    /// A standard I/O error (temp file creation, copy, …).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Failures of a single `render` call.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The native module could not be resolved or lacks the render ABI.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The document contains an interior NUL and cannot cross the C ABI.
    #[error("document contains an interior NUL byte at offset {0}")]
    InteriorNul(usize),

    /// The native renderer returned a nonzero status (usually a parse error).
    #[error("native renderer rejected the document (status {0})")]
    Rejected(i32),

    /// The native renderer reported success but produced an unusable bitmap.
    #[error("native renderer returned a malformed {width}x{height} bitmap")]
    Malformed { width: u32, height: u32 },
}

/// Convenience alias used throughout the loader.
pub type Result<T> = std::result::Result<T, LoadError>;
