//! # Error Types
//!
//! This module defines error types used throughout the rastro library.
//!
//! ## Recoverable vs. fatal
//!
//! Printer command streams are stateful: a half-written escape sequence
//! desynchronizes the device in a way only a printer-level reset can fix.
//! Errors therefore fall into two classes:
//!
//! - **Recoverable**: the caller can fix its configuration and retry the
//!   page. Nothing has been written to the output sink yet.
//! - **Fatal**: the page was aborted mid-stream. The output is not
//!   resumable and the caller should discard it (or reset the printer).
//!
//! Use [`RastroError::is_fatal`] to distinguish the two. Whether a fatal
//! error should abort the whole process is the embedding application's
//! decision, not this library's.

use thiserror::Error;

/// Main error type for rastro operations
#[derive(Debug, Error)]
pub enum RastroError {
    /// Invalid page or device configuration (page wider than the platen,
    /// unsupported resolution pair, margins below the safety minimum,
    /// paper bin out of range). Detected before any byte is written;
    /// always recoverable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A working buffer could not be sized (arithmetic overflow while
    /// computing band dimensions). Recoverable by aborting the page.
    #[error("Allocation error: {0}")]
    Allocation(String),

    /// I/O error from the output sink. Fatal for the current page.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The sink accepted fewer bytes than the command length. Partial
    /// commands are never retried; the stream is already corrupt.
    #[error("Short write: {written} of {expected} bytes accepted by the sink")]
    ShortWrite { expected: usize, written: usize },

    /// Internal consistency failure: the descriptor is incompatible with
    /// the pipeline in a way validation did not catch. Always fatal.
    #[error("Protocol invariant violated: {0}")]
    ProtocolInvariant(String),
}

impl RastroError {
    /// Whether the error left the output stream in an unrecoverable state.
    ///
    /// Fatal errors mean escape-code bytes may already have been written;
    /// the partial output must not be sent to a printer. Recoverable
    /// errors guarantee zero bytes reached the sink.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Config(_) | Self::Allocation(_) => false,
            Self::Io(_) | Self::ShortWrite { .. } | Self::ProtocolInvariant(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_is_recoverable() {
        let err = RastroError::Config("page too wide".into());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_short_write_is_fatal() {
        let err = RastroError::ShortWrite {
            expected: 4,
            written: 2,
        };
        assert!(err.is_fatal());
    }

    #[test]
    fn test_io_is_fatal() {
        let err = RastroError::Io(std::io::Error::other("sink closed"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_display_short_write() {
        let err = RastroError::ShortWrite {
            expected: 9,
            written: 3,
        };
        assert_eq!(
            err.to_string(),
            "Short write: 3 of 9 bytes accepted by the sink"
        );
    }
}
