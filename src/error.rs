//! Error types for monitor operations

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Unable to lock channel {channel}")]
    LockFailed { channel: String },

    #[error("Cannot start monitoring {channel}, already monitored")]
    AlreadyMonitoring { channel: String },

    #[error("Could not create file {path:?}: {source}")]
    FileCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Channel {channel} is not being monitored")]
    NotMonitoring { channel: String },

    #[error("Cannot change monitor filename of channel {channel} to null")]
    EmptyFilename { channel: String },

    #[error("Monitor filename {name:?} would leave the monitor directory")]
    InvalidFilename { name: String },

    #[error("Unknown recording format: {0}")]
    UnknownFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

impl MonitorError {
    /// Integer status reported to dial-plan callers.
    pub fn status(&self) -> i32 {
        -1
    }
}

pub type MonitorResult<T> = Result<T, MonitorError>;
