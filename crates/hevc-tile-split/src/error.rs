//! Error type for the split controller.

use thiserror::Error;

/// Errors surfaced by [`crate::SplitController`].
///
/// `configure`-time variants are fatal for the PID; `process_access_unit`-time
/// variants are logged and the offending access unit is dropped rather than
/// propagated, per the controller's failure semantics.
#[derive(Error, Debug)]
pub enum SplitError {
    /// The decoder configuration record failed to parse, a referenced SPS/PPS
    /// was absent, or a NAL unit carried a non-zero `nuh_layer_id`.
    #[error("non-compliant HEVC bitstream: {0}")]
    NonCompliantBitstream(String),

    /// The input does not match the filter's declared capability (non-HEVC
    /// input, or a capability the host offered that this filter doesn't take).
    #[error("not supported: {0}")]
    NotSupported(String),

    /// A bitstream read ran past the end of the buffer while rewriting a
    /// parameter set or slice header.
    #[error("truncated bitstream while rewriting {context}")]
    Truncated {
        /// What the reader was doing when it ran out of bits, for the log line.
        context: &'static str,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Allocation failure. Never constructed by this crate directly — Rust's
    /// global allocator aborts on exhaustion — but kept so an embedder with
    /// its own allocation budget has a slot to report into.
    #[error("out of memory")]
    OutOfMemory,
}

impl SplitError {
    /// Wraps an I/O error encountered while rewriting `context`, classifying
    /// it as [`SplitError::Truncated`] for an unexpected end of buffer and
    /// [`SplitError::NonCompliantBitstream`] for any other malformed-bitstream
    /// condition (e.g. a fixed-pattern bit that didn't match).
    pub fn from_io(context: &'static str, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::UnexpectedEof => SplitError::Truncated { context, source },
            _ => SplitError::NonCompliantBitstream(format!("{context}: {source}")),
        }
    }
}
