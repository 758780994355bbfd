//! Error taxonomy for the Aeon core.
//!
//! `spec.md` §7 enumerates "invalid argument / I/O failure / numeric
//! degeneracy". Because `AeonCore` is an owned Rust value rather than a
//! pointer handed across an FFI boundary (`spec.md` §9's "raw-pointer
//! aggregate → owned value type" redesign), the "invalid handle" and
//! "invalid buffer" error kinds have no representable state here and are
//! dropped; numeric degeneracy stays silent per §7 and is never surfaced as
//! an `AeonError`. What remains is exactly `train`'s sample-count precondition
//! and `save`/`load`'s I/O failures.

use thiserror::Error;

/// Errors surfaced by `AeonCore` operations.
#[derive(Debug, Error)]
pub enum AeonError {
    /// `train` was called with `samples <= washout` (`spec.md` §4.6/§7).
    #[error("train requires more samples ({samples}) than washout ({washout})")]
    InsufficientSamples {
        /// Number of samples supplied.
        samples: usize,
        /// Washout length requested.
        washout: usize,
    },

    /// `save`/`load` failed to open, read, or write the snapshot file.
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// `load` read fewer bytes than the fixed snapshot layout requires.
    #[error("snapshot truncated: expected {expected} bytes, got {actual}")]
    ShortRead {
        /// Bytes the fixed layout requires.
        expected: usize,
        /// Bytes actually read.
        actual: usize,
    },
}
