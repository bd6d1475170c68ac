//! Format tag resolution and file operations keyed by stem + format
//!
//! Monitor code deals in filename stems (`.../audio-in-7`). The registry owns
//! the mapping from a format tag to the on-disk extension and writer, so
//! `exists`/`delete`/`rename` all act on `{stem}.{extension}`.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::raw_writer::RawStream;
use super::traits::MonitorStream;
use super::wav_writer::WavStream;
use crate::error::{MonitorError, MonitorResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Wav { sample_rate: u32 },
    SignedLinear { sample_rate: u32 },
}

#[derive(Debug, Clone)]
pub struct FormatEntry {
    pub tag: &'static str,
    pub extension: &'static str,
    pub kind: FormatKind,
}

#[derive(Debug, Clone)]
pub struct FormatRegistry {
    entries: Vec<FormatEntry>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self {
            entries: vec![
                FormatEntry {
                    tag: "wav",
                    extension: "wav",
                    kind: FormatKind::Wav { sample_rate: 8000 },
                },
                FormatEntry {
                    tag: "wav16",
                    extension: "wav16",
                    kind: FormatKind::Wav { sample_rate: 16000 },
                },
                FormatEntry {
                    tag: "sln",
                    extension: "sln",
                    kind: FormatKind::SignedLinear { sample_rate: 8000 },
                },
                FormatEntry {
                    tag: "raw",
                    extension: "raw",
                    kind: FormatKind::SignedLinear { sample_rate: 8000 },
                },
            ],
        }
    }
}

impl FormatRegistry {
    /// Case-insensitive lookup of a format tag
    pub fn lookup(&self, tag: &str) -> MonitorResult<&FormatEntry> {
        self.entries
            .iter()
            .find(|e| e.tag.eq_ignore_ascii_case(tag))
            .ok_or_else(|| MonitorError::UnknownFormat(tag.to_string()))
    }

    /// On-disk path for `stem` in format `tag`
    pub fn file_path(&self, stem: &Path, tag: &str) -> MonitorResult<PathBuf> {
        let entry = self.lookup(tag)?;
        // Append rather than with_extension: stems may already contain dots
        let mut path = OsString::from(stem.as_os_str());
        path.push(".");
        path.push(entry.extension);
        Ok(PathBuf::from(path))
    }

    /// Create (truncating) a stream at `stem` in format `tag`
    pub fn open(&self, stem: &Path, tag: &str) -> MonitorResult<Box<dyn MonitorStream>> {
        let entry = self.lookup(tag)?;
        let path = self.file_path(stem, tag)?;
        let stream: Box<dyn MonitorStream> = match entry.kind {
            FormatKind::Wav { sample_rate } => Box::new(WavStream::create(path, sample_rate)?),
            FormatKind::SignedLinear { sample_rate } => {
                Box::new(RawStream::create(path, sample_rate)?)
            }
        };
        debug!("Opened {} stream {:?}", entry.tag, stream.path());
        Ok(stream)
    }

    pub fn exists(&self, stem: &Path, tag: &str) -> bool {
        self.file_path(stem, tag)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    pub fn delete(&self, stem: &Path, tag: &str) -> MonitorResult<()> {
        fs::remove_file(self.file_path(stem, tag)?)?;
        Ok(())
    }

    pub fn rename(&self, from: &Path, to: &Path, tag: &str) -> MonitorResult<()> {
        let src = self.file_path(from, tag)?;
        let dst = self.file_path(to, tag)?;
        fs::rename(&src, &dst)?;
        debug!("Renamed {:?} -> {:?}", src, dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let formats = FormatRegistry::default();
        assert_eq!(formats.lookup("WAV").unwrap().extension, "wav");
        assert!(matches!(
            formats.lookup("gsm"),
            Err(MonitorError::UnknownFormat(t)) if t == "gsm"
        ));
    }

    #[test]
    fn test_file_path_appends_extension() {
        let formats = FormatRegistry::default();
        let path = formats
            .file_path(Path::new("/mon/SIP-1.2-in"), "wav16")
            .unwrap();
        assert_eq!(path, PathBuf::from("/mon/SIP-1.2-in.wav16"));
    }

    #[test]
    fn test_open_exists_rename_delete() {
        let dir = tempfile::tempdir().unwrap();
        let formats = FormatRegistry::default();
        let from = dir.path().join("audio-in-0");
        let to = dir.path().join("final-in");

        let stream = formats.open(&from, "sln").unwrap();
        stream.close().unwrap();
        assert!(formats.exists(&from, "sln"));
        assert!(!formats.exists(&from, "wav"));

        formats.rename(&from, &to, "sln").unwrap();
        assert!(!formats.exists(&from, "sln"));
        assert!(dir.path().join("final-in.sln").is_file());

        formats.delete(&to, "sln").unwrap();
        assert!(!formats.exists(&to, "sln"));
    }

    #[test]
    fn test_open_unknown_format_fails() {
        let dir = tempfile::tempdir().unwrap();
        let formats = FormatRegistry::default();
        assert!(matches!(
            formats.open(&dir.path().join("x"), "mp3"),
            Err(MonitorError::UnknownFormat(_))
        ));
    }
}
