use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::error;

use super::traits::{MonitorStream, RecordingInfo};
use crate::error::{MonitorError, MonitorResult};

/// Headerless signed-linear stream (16-bit little endian, mono)
pub struct RawStream {
    file: Option<BufWriter<File>>,
    path: PathBuf,
    sample_count: u64,
    sample_rate: u32,
}

impl RawStream {
    pub fn create(path: impl Into<PathBuf>, sample_rate: u32) -> MonitorResult<Self> {
        let path = path.into();
        let file = File::create(&path).map_err(|source| MonitorError::FileCreate {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            file: Some(BufWriter::new(file)),
            path,
            sample_count: 0,
            sample_rate,
        })
    }
}

impl MonitorStream for RawStream {
    fn write_samples(&mut self, samples: &[i16]) -> MonitorResult<()> {
        if let Some(ref mut file) = self.file {
            for sample in samples {
                file.write_all(&sample.to_le_bytes())?;
            }
            self.sample_count += samples.len() as u64;
        }
        Ok(())
    }

    fn close(mut self: Box<Self>) -> MonitorResult<RecordingInfo> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        let file_size_bytes = fs::metadata(&self.path)?.len();
        Ok(RecordingInfo {
            file_path: self.path.clone(),
            duration_seconds: self.sample_count as f64 / self.sample_rate as f64,
            file_size_bytes,
            sample_rate: self.sample_rate,
            channels: 1,
        })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RawStream {
    fn drop(&mut self) {
        if let Some(mut file) = self.file.take() {
            if let Err(e) = file.flush() {
                error!("Error flushing {:?} on drop: {}", self.path, e);
            }
        }
    }
}
