//! Per-channel monitor record
//!
//! A `MonitorState` only ever lives inside a channel's locked state, so it
//! carries no synchronization of its own.

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::format::MonitorStream;

pub struct MonitorState {
    read_stream: Option<Box<dyn MonitorStream>>,
    write_stream: Option<Box<dyn MonitorStream>>,
    /// Working filename stems, without the format extension
    read_filename: PathBuf,
    write_filename: PathBuf,
    /// Final filenames on stop are `{base}-in` / `{base}-out`; None means the
    /// working files are already final
    filename_base: Option<PathBuf>,
    format: String,
    started_at: DateTime<Utc>,
}

impl MonitorState {
    pub(crate) fn new(
        read_stream: Box<dyn MonitorStream>,
        write_stream: Box<dyn MonitorStream>,
        read_filename: PathBuf,
        write_filename: PathBuf,
        filename_base: Option<PathBuf>,
        format: String,
    ) -> Self {
        debug_assert!(!format.is_empty());
        Self {
            read_stream: Some(read_stream),
            write_stream: Some(write_stream),
            read_filename,
            write_filename,
            filename_base,
            format,
            started_at: Utc::now(),
        }
    }

    pub fn read_filename(&self) -> &Path {
        &self.read_filename
    }

    pub fn write_filename(&self) -> &Path {
        &self.write_filename
    }

    pub fn filename_base(&self) -> Option<&Path> {
        self.filename_base.as_deref()
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub(crate) fn set_filename_base(&mut self, base: PathBuf) {
        self.filename_base = Some(base);
    }

    /// Append inbound audio
    pub(crate) fn write_read(&mut self, samples: &[i16]) {
        if let Some(ref mut stream) = self.read_stream {
            if let Err(e) = stream.write_samples(samples) {
                warn!("Failed to write monitored read frame to {:?}: {}", stream.path(), e);
            }
        }
    }

    /// Append outbound audio
    pub(crate) fn write_write(&mut self, samples: &[i16]) {
        if let Some(ref mut stream) = self.write_stream {
            if let Err(e) = stream.write_samples(samples) {
                warn!("Failed to write monitored write frame to {:?}: {}", stream.path(), e);
            }
        }
    }

    /// Close both streams so their files are finalized and safe to rename
    pub(crate) fn close_streams(&mut self) {
        for stream in [self.read_stream.take(), self.write_stream.take()]
            .into_iter()
            .flatten()
        {
            let path = stream.path().to_path_buf();
            match stream.close() {
                Ok(info) => info.log_summary(),
                Err(e) => warn!("Error closing monitor stream {:?}: {}", path, e),
            }
        }
    }
}

impl fmt::Debug for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorState")
            .field("read_open", &self.read_stream.is_some())
            .field("write_open", &self.write_stream.is_some())
            .field("read_filename", &self.read_filename)
            .field("write_filename", &self.write_filename)
            .field("filename_base", &self.filename_base)
            .field("format", &self.format)
            .field("started_at", &self.started_at)
            .finish()
    }
}

/// Replace every path separator in a channel name with '-', so the name can
/// be used as a single file name component.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if std::path::is_separator(c) { '-' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_separators() {
        assert_eq!(sanitize("Foo/1"), "Foo-1");
        assert_eq!(sanitize("SIP/alice-0001/2"), "SIP-alice-0001-2");
        assert_eq!(sanitize("Local@ctx"), "Local@ctx");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_sanitize_never_leaves_a_slash() {
        let names = ["/", "//", "a/b/c", "Zap/1-1/", "/leading", "IAX2/peer/12345"];
        for name in names {
            let out = sanitize(name);
            assert!(!out.contains('/'), "{name:?} -> {out:?}");
            assert_eq!(out.chars().count(), name.chars().count());
        }
    }
}
