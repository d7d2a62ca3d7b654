use std::path::PathBuf;

use thiserror::Error;

/// The error type for touchbridge operations.
#[derive(Error, Debug)]
pub enum TouchBridgeError {
    /// The touch device could not be opened. Fatal to the reader task;
    /// the contact stays idle until a later start succeeds.
    #[error("failed to open touch device {path:?}: {source}")]
    DeviceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record shorter than the fixed wire size was observed. Treated the
    /// same as a failed read by the reader loop.
    #[error("short input record: expected {expected} bytes, got {actual}")]
    ShortRecord { expected: usize, actual: usize },

    /// Settings could not be read, parsed or written.
    #[error("settings error: {message}")]
    Settings { message: String },
}

/// Standard Result type for touchbridge operations.
pub type Result<T> = std::result::Result<T, TouchBridgeError>;

impl TouchBridgeError {
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings {
            message: message.into(),
        }
    }
}
