//! Error types for open-afx-core.

use thiserror::Error;

/// Core library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// OS device-class enumeration could not start at all.
    #[error("device enumeration unavailable: {0}")]
    Enumeration(String),

    /// A single interface failed to open or answer a capability query.
    ///
    /// Discovery logs this and skips the interface; it never aborts a scan.
    #[error("interface unusable: {path}: {reason}")]
    Interface { path: String, reason: String },

    /// A report I/O control call returned failure.
    #[error("command send failed: {0}")]
    CommandSend(String),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
