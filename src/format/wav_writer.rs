use hound::{WavSpec, WavWriter};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::error;

use super::traits::{MonitorStream, RecordingInfo};
use crate::error::{MonitorError, MonitorResult};

/// WAV recording stream, 16-bit PCM mono
pub struct WavStream {
    /// Wrapped in Option so close and drop can take it exactly once
    writer: Option<WavWriter<BufWriter<File>>>,
    path: PathBuf,
    sample_count: u64,
    sample_rate: u32,
}

impl WavStream {
    /// Create (or truncate) the file at `path` and write the WAV header
    pub fn create(path: impl Into<PathBuf>, sample_rate: u32) -> MonitorResult<Self> {
        let path = path.into();
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let writer = WavWriter::create(&path, spec).map_err(|e| match e {
            hound::Error::IoError(source) => MonitorError::FileCreate {
                path: path.clone(),
                source,
            },
            other => MonitorError::Wav(other),
        })?;

        Ok(Self {
            writer: Some(writer),
            path,
            sample_count: 0,
            sample_rate,
        })
    }
}

impl MonitorStream for WavStream {
    fn write_samples(&mut self, samples: &[i16]) -> MonitorResult<()> {
        if let Some(ref mut writer) = self.writer {
            for &sample in samples {
                writer.write_sample(sample)?;
            }
            self.sample_count += samples.len() as u64;
        }
        Ok(())
    }

    fn close(mut self: Box<Self>) -> MonitorResult<RecordingInfo> {
        if let Some(writer) = self.writer.take() {
            writer.finalize()?;
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

impl Drop for WavStream {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            if let Err(e) = writer.finalize() {
                error!("Error finalizing WAV file {:?} on drop: {}", self.path, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_produces_readable_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("call.wav");

        let mut stream = Box::new(WavStream::create(&path, 8000).unwrap());
        stream.write_samples(&[0, 100, -100, i16::MAX]).unwrap();
        stream.write_samples(&[1; 3996]).unwrap();
        let info = stream.close().unwrap();

        assert_eq!(info.file_path, path);
        assert!((info.duration_seconds - 0.5).abs() < 1e-9);
        assert_eq!(info.sample_rate, 8000);
        assert_eq!(info.channels, 1);

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 8000);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len(), 4000);
    }

    #[test]
    fn test_drop_finalizes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dropped.wav");
        {
            let mut stream = WavStream::create(&path, 16000).unwrap();
            stream.write_samples(&[7; 160]).unwrap();
        }
        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.len(), 160);
    }

    #[test]
    fn test_create_in_missing_dir_is_file_create_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("x.wav");
        match WavStream::create(&path, 8000) {
            Err(MonitorError::FileCreate { path: p, .. }) => assert_eq!(p, path),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected failure"),
        }
    }
}
