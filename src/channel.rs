//! Channel boundary: the lock that guards a channel's monitor attachment,
//! the proof-of-lock handle, and the registry admin requests look channels up in.

use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use tracing::{debug, warn};

use crate::error::{MonitorError, MonitorResult};
use crate::monitor::{MonitorManager, MonitorState};

/// State guarded by the channel lock
#[derive(Debug, Default)]
pub struct ChannelState {
    monitor: Option<MonitorState>,
}

/// One communication session. Its name is fixed for its lifetime.
#[derive(Debug)]
pub struct Channel {
    name: String,
    state: Mutex<ChannelState>,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(ChannelState::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Take the channel lock. A poisoned lock is reported as a lock failure.
    pub fn lock(&self) -> MonitorResult<LockedChannel<'_>> {
        match self.state.lock() {
            Ok(guard) => Ok(LockedChannel {
                name: &self.name,
                guard,
            }),
            Err(_) => {
                warn!("Unable to lock channel {}", self.name);
                Err(MonitorError::LockFailed {
                    channel: self.name.clone(),
                })
            }
        }
    }

    pub fn is_monitored(&self) -> MonitorResult<bool> {
        Ok(self.lock()?.monitor().is_some())
    }

    /// Hangup teardown: stop any monitor while holding the lock once
    pub fn hangup(&self, manager: &MonitorManager) -> MonitorResult<()> {
        let mut locked = self.lock()?;
        debug!("Hanging up {}", self.name);
        manager.stop_locked(&mut locked)
    }
}

/// Exclusive access to a channel's state. Holding one is the proof that the
/// caller owns the channel lock; it is released on drop.
pub struct LockedChannel<'a> {
    name: &'a str,
    guard: MutexGuard<'a, ChannelState>,
}

impl LockedChannel<'_> {
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn monitor(&self) -> Option<&MonitorState> {
        self.guard.monitor.as_ref()
    }

    pub(crate) fn monitor_mut(&mut self) -> Option<&mut MonitorState> {
        self.guard.monitor.as_mut()
    }

    pub(crate) fn attach(&mut self, monitor: MonitorState) {
        debug_assert!(self.guard.monitor.is_none());
        self.guard.monitor = Some(monitor);
    }

    pub(crate) fn detach(&mut self) -> Option<MonitorState> {
        self.guard.monitor.take()
    }

    /// Feed inbound audio to the monitor, if any
    pub fn record_read(&mut self, samples: &[i16]) {
        if let Some(monitor) = self.monitor_mut() {
            monitor.write_read(samples);
        }
    }

    /// Feed outbound audio to the monitor, if any
    pub fn record_write(&mut self, samples: &[i16]) {
        if let Some(monitor) = self.monitor_mut() {
            monitor.write_write(samples);
        }
    }
}

/// Source of live channels for name-based lookup
pub trait ChannelRegistry: Send + Sync {
    fn channels(&self) -> Vec<Arc<Channel>>;
}

/// In-process registry
#[derive(Debug, Default)]
pub struct ChannelList {
    channels: RwLock<Vec<Arc<Channel>>>,
}

impl ChannelList {
    pub fn add(&self, channel: Arc<Channel>) {
        self.channels
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(channel);
    }

    /// Remove by exact name
    pub fn remove(&self, name: &str) -> Option<Arc<Channel>> {
        let mut channels = self.channels.write().unwrap_or_else(|e| e.into_inner());
        let idx = channels.iter().position(|c| c.name() == name)?;
        Some(channels.remove(idx))
    }
}

impl ChannelRegistry for ChannelList {
    fn channels(&self) -> Vec<Arc<Channel>> {
        self.channels
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// First channel whose name matches `name`, ignoring ASCII case
pub fn find_channel(registry: &dyn ChannelRegistry, name: &str) -> Option<Arc<Channel>> {
    registry
        .channels()
        .into_iter()
        .find(|c| c.name().eq_ignore_ascii_case(name))
}
