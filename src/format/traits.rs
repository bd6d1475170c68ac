use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::MonitorResult;

/// A recording stream opened by the format layer.
///
/// Samples are signed-linear 16-bit mono. `close` flushes and finalizes the
/// file so it is safe to rename; dropping an unclosed stream finalizes it on a
/// best-effort basis.
pub trait MonitorStream: Send {
    fn write_samples(&mut self, samples: &[i16]) -> MonitorResult<()>;
    fn close(self: Box<Self>) -> MonitorResult<RecordingInfo>;
    fn path(&self) -> &Path;
}

/// Metadata for a completed recording
#[derive(Debug, Clone)]
pub struct RecordingInfo {
    pub file_path: PathBuf,
    pub duration_seconds: f64,
    pub file_size_bytes: u64,
    pub sample_rate: u32,
    pub channels: u16,
}

impl RecordingInfo {
    pub fn log_summary(&self) {
        info!(
            "Recording closed: {:?} ({:.2}s, {} bytes, {} Hz x{})",
            self.file_path,
            self.duration_seconds,
            self.file_size_bytes,
            self.sample_rate,
            self.channels
        );
    }
}
