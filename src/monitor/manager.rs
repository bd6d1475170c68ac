//! Monitor lifecycle: start, stop and rename the recording on a channel.
//!
//! Each operation comes in two forms. The plain form takes a `&Channel` and
//! holds the channel lock for the whole operation. The `_locked` form takes a
//! `LockedChannel` for callers that already hold the lock (hangup teardown).

use std::ffi::OsString;
use std::fs::DirBuilder;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

use super::sequence::SequenceGenerator;
use super::state::{sanitize, MonitorState};
use crate::channel::{Channel, LockedChannel};
use crate::config::MonitorConfig;
use crate::error::{MonitorError, MonitorResult};
use crate::format::{FormatRegistry, MonitorStream};

pub struct MonitorManager {
    monitor_dir: PathBuf,
    default_format: String,
    sequence: SequenceGenerator,
    formats: FormatRegistry,
}

impl MonitorManager {
    pub fn new(config: &MonitorConfig) -> Self {
        Self::with_sequence(config, SequenceGenerator::new())
    }

    pub fn with_sequence(config: &MonitorConfig, sequence: SequenceGenerator) -> Self {
        let default_format = if config.default_format.is_empty() {
            crate::config::DEFAULT_FORMAT.to_string()
        } else {
            config.default_format.clone()
        };
        Self {
            monitor_dir: config.monitor_dir.clone(),
            default_format,
            sequence,
            formats: FormatRegistry::default(),
        }
    }

    pub fn monitor_dir(&self) -> &Path {
        &self.monitor_dir
    }

    /// Start monitoring `chan`, taking its lock
    pub fn start(
        &self,
        chan: &Channel,
        format: Option<&str>,
        fname_base: Option<&str>,
    ) -> MonitorResult<()> {
        let mut locked = chan.lock()?;
        self.start_locked(&mut locked, format, fname_base)
    }

    /// Start monitoring a channel whose lock the caller holds.
    ///
    /// With a non-empty `fname_base` the working files are already the final
    /// `{base}-in`/`{base}-out`. Otherwise they are `audio-in-{n}`/`audio-out-{n}`
    /// and stop renames them after the sanitized channel name.
    pub fn start_locked(
        &self,
        chan: &mut LockedChannel<'_>,
        format: Option<&str>,
        fname_base: Option<&str>,
    ) -> MonitorResult<()> {
        if chan.monitor().is_some() {
            debug!("Cannot start monitoring {}, already monitored", chan.name());
            return Err(MonitorError::AlreadyMonitoring {
                channel: chan.name().to_string(),
            });
        }

        self.ensure_monitor_dir();

        let (read_filename, write_filename, filename_base) =
            match fname_base.filter(|b| !b.is_empty()) {
                Some(base) => (
                    self.monitor_path(&format!("{base}-in"))?,
                    self.monitor_path(&format!("{base}-out"))?,
                    None,
                ),
                None => {
                    let n = self.sequence.next_id();
                    (
                        self.monitor_path(&format!("audio-in-{n}"))?,
                        self.monitor_path(&format!("audio-out-{n}"))?,
                        Some(self.monitor_path(&sanitize(chan.name()))?),
                    )
                }
            };

        let format = format
            .filter(|f| !f.is_empty())
            .unwrap_or(self.default_format.as_str())
            .to_string();

        // A failed write open drops the read stream, which closes its file
        let read_stream = self.open_stream(&read_filename, &format)?;
        let write_stream = self.open_stream(&write_filename, &format)?;

        info!(
            "Started monitoring {} ({}): {:?}, {:?}",
            chan.name(),
            format,
            read_filename,
            write_filename
        );
        chan.attach(MonitorState::new(
            read_stream,
            write_stream,
            read_filename,
            write_filename,
            filename_base,
            format,
        ));
        Ok(())
    }

    /// Stop monitoring `chan`, taking its lock. Not monitoring is a no-op.
    pub fn stop(&self, chan: &Channel) -> MonitorResult<()> {
        let mut locked = chan.lock()?;
        self.stop_locked(&mut locked)
    }

    /// Stop monitoring a channel whose lock the caller holds.
    ///
    /// Closes both streams, then moves the working files onto their final
    /// names if a base is set. A missing working file is logged and skipped;
    /// stop still succeeds.
    pub fn stop_locked(&self, chan: &mut LockedChannel<'_>) -> MonitorResult<()> {
        let Some(mut monitor) = chan.detach() else {
            return Ok(());
        };

        monitor.close_streams();

        if let Some(base) = monitor.filename_base() {
            self.finalize_file(monitor.read_filename(), &with_suffix(base, "-in"), monitor.format());
            self.finalize_file(monitor.write_filename(), &with_suffix(base, "-out"), monitor.format());
        }

        info!(
            "Stopped monitoring {} after {}s",
            chan.name(),
            (chrono::Utc::now() - monitor.started_at()).num_seconds()
        );
        Ok(())
    }

    /// Retarget where stop will place the final files, taking the lock.
    /// An empty base fails before the lock is touched.
    pub fn change_name(&self, chan: &Channel, fname_base: &str) -> MonitorResult<()> {
        if fname_base.is_empty() {
            return Err(empty_filename(chan.name()));
        }
        let mut locked = chan.lock()?;
        self.change_name_locked(&mut locked, fname_base)
    }

    /// Retarget where stop will place the final files. Files already open
    /// keep their working names until then.
    pub fn change_name_locked(
        &self,
        chan: &mut LockedChannel<'_>,
        fname_base: &str,
    ) -> MonitorResult<()> {
        if fname_base.is_empty() {
            return Err(empty_filename(chan.name()));
        }

        let base = self.monitor_path(fname_base)?;
        let name = chan.name().to_string();
        match chan.monitor_mut() {
            Some(monitor) => {
                info!("Monitor filename base of {} changed to {:?}", name, base);
                monitor.set_filename_base(base);
                Ok(())
            }
            None => {
                warn!(
                    "Cannot change monitor filename of channel {} to {}, monitoring not started",
                    name, fname_base
                );
                Err(MonitorError::NotMonitoring { channel: name })
            }
        }
    }

    /// Start monitoring, or if the channel is already monitored, retarget it
    /// to `fname_base`. Both steps run under one acquisition of the lock.
    pub fn start_or_change(
        &self,
        chan: &Channel,
        format: Option<&str>,
        fname_base: Option<&str>,
    ) -> MonitorResult<()> {
        let mut locked = chan.lock()?;
        match self.start_locked(&mut locked, format, fname_base) {
            Err(MonitorError::AlreadyMonitoring { .. }) => {
                self.change_name_locked(&mut locked, fname_base.unwrap_or(""))
            }
            other => other,
        }
    }

    /// `{monitor_dir}/{name}`. A leading separator is dropped and `..` is
    /// rejected, so the result always stays under the monitor dir.
    fn monitor_path(&self, name: &str) -> MonitorResult<PathBuf> {
        let relative = Path::new(name.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            warn!("Rejecting monitor filename {:?} outside {:?}", name, self.monitor_dir);
            return Err(MonitorError::InvalidFilename {
                name: name.to_string(),
            });
        }
        Ok(self.monitor_dir.join(relative))
    }

    fn ensure_monitor_dir(&self) {
        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o770);
        }
        if let Err(e) = builder.create(&self.monitor_dir) {
            // Open failure below is the error that counts
            if e.kind() != ErrorKind::AlreadyExists {
                warn!("Unable to create audio monitor directory {:?}: {}", self.monitor_dir, e);
            }
        }
    }

    /// Open a fresh stream at `stem`, removing whatever was there first
    fn open_stream(&self, stem: &Path, format: &str) -> MonitorResult<Box<dyn MonitorStream>> {
        if self.formats.exists(stem, format) {
            if let Err(e) = self.formats.delete(stem, format) {
                warn!("Unable to remove stale file {:?}: {}", stem, e);
            }
        }
        self.formats.open(stem, format).map_err(|e| {
            warn!("Could not create file {:?}: {}", stem, e);
            e
        })
    }

    fn finalize_file(&self, working: &Path, dest: &Path, format: &str) {
        if !self.formats.exists(working, format) {
            warn!("File {:?} not found", working);
            return;
        }
        // Already at its final name; deleting the destination would delete the recording
        if working == dest {
            debug!("{:?} already at final name", working);
            return;
        }
        if self.formats.exists(dest, format) {
            if let Err(e) = self.formats.delete(dest, format) {
                warn!("Unable to remove existing {:?}: {}", dest, e);
            }
        }
        if let Err(e) = self.formats.rename(working, dest, format) {
            warn!("Unable to rename {:?} to {:?}: {}", working, dest, e);
        }
    }
}

fn empty_filename(channel: &str) -> MonitorError {
    warn!("Cannot change monitor filename of channel {} to null", channel);
    MonitorError::EmptyFilename {
        channel: channel.to_string(),
    }
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(suffix);
    PathBuf::from(path)
}
