//! Dial-plan applications: `Monitor`, `StopMonitor`, `ChangeMonitor`.
//!
//! Each returns the integer status dial-plan execution branches on:
//! 0 on success, -1 on failure.

use tracing::debug;

use crate::channel::Channel;
use crate::error::MonitorResult;
use crate::monitor::MonitorManager;

#[derive(Debug, Clone, Copy)]
pub struct Application {
    pub name: &'static str,
    pub synopsis: &'static str,
    pub description: &'static str,
}

pub const APPLICATIONS: &[Application] = &[
    Application {
        name: "Monitor",
        synopsis: "Monitor a channel",
        description: "Monitor([file_format][|fname_base]): start recording the channel's \
            inbound and outbound audio until hangup or StopMonitor. file_format defaults \
            to \"wav\". If the channel is already monitored and fname_base is set, the \
            recording is retargeted to fname_base instead.",
    },
    Application {
        name: "StopMonitor",
        synopsis: "Stop monitoring a channel",
        description: "StopMonitor(): stop recording the channel. Has no effect if the \
            channel is not monitored.",
    },
    Application {
        name: "ChangeMonitor",
        synopsis: "Change monitoring filename of a channel",
        description: "ChangeMonitor(fname_base): set the base name the recording is \
            moved to when monitoring stops. Fails if the channel is not monitored.",
    },
];

/// `Monitor(format|fname_base)`
pub fn monitor_exec(manager: &MonitorManager, chan: &Channel, data: &str) -> i32 {
    let (format, fname_base) = parse_monitor_args(data);
    status(manager.start_or_change(chan, format, fname_base))
}

/// `StopMonitor()`
pub fn stop_monitor_exec(manager: &MonitorManager, chan: &Channel, _data: &str) -> i32 {
    status(manager.stop(chan))
}

/// `ChangeMonitor(fname_base)`
pub fn change_monitor_exec(manager: &MonitorManager, chan: &Channel, data: &str) -> i32 {
    status(manager.change_name(chan, data))
}

/// Run an application by name (case-insensitive). None if no such application.
pub fn exec(name: &str, manager: &MonitorManager, chan: &Channel, data: &str) -> Option<i32> {
    let app = APPLICATIONS
        .iter()
        .find(|app| app.name.eq_ignore_ascii_case(name))?;
    let res = match app.name {
        "Monitor" => monitor_exec(manager, chan, data),
        "StopMonitor" => stop_monitor_exec(manager, chan, data),
        _ => change_monitor_exec(manager, chan, data),
    };
    Some(res)
}

/// Split `format|fname_base`. Empty segments mean "not given".
fn parse_monitor_args(data: &str) -> (Option<&str>, Option<&str>) {
    fn non_empty(s: &str) -> Option<&str> {
        Some(s).filter(|s| !s.is_empty())
    }
    match data.split_once('|') {
        Some((format, base)) => (non_empty(format), non_empty(base)),
        None => (non_empty(data), None),
    }
}

fn status(res: MonitorResult<()>) -> i32 {
    match res {
        Ok(()) => 0,
        Err(e) => {
            debug!("Dial-plan monitor application failed: {}", e);
            e.status()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonitorConfig;

    #[test]
    fn test_parse_monitor_args() {
        assert_eq!(parse_monitor_args(""), (None, None));
        assert_eq!(parse_monitor_args("gsm"), (Some("gsm"), None));
        assert_eq!(parse_monitor_args("wav|conf-12"), (Some("wav"), Some("conf-12")));
        assert_eq!(parse_monitor_args("|conf-12"), (None, Some("conf-12")));
        assert_eq!(parse_monitor_args("sln|"), (Some("sln"), None));
        // only the first pipe splits
        assert_eq!(parse_monitor_args("wav|a|b"), (Some("wav"), Some("a|b")));
    }

    #[test]
    fn test_monitor_then_change_via_monitor_app() {
        let dir = tempfile::tempdir().unwrap();
        let manager = MonitorManager::new(&MonitorConfig::with_dir(dir.path()));
        let chan = Channel::new("SIP/jane-10");

        assert_eq!(monitor_exec(&manager, &chan, ""), 0);
        assert_eq!(monitor_exec(&manager, &chan, "wav|callback"), 0);
        assert_eq!(stop_monitor_exec(&manager, &chan, ""), 0);

        assert!(dir.path().join("callback-in.wav").is_file());
        assert!(dir.path().join("callback-out.wav").is_file());
    }

    #[test]
    fn test_failure_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let manager = MonitorManager::new(&MonitorConfig::with_dir(dir.path()));
        let chan = Channel::new("SIP/kim-11");

        assert_eq!(change_monitor_exec(&manager, &chan, "x"), -1);
        assert_eq!(change_monitor_exec(&manager, &chan, ""), -1);
        assert_eq!(stop_monitor_exec(&manager, &chan, ""), 0);

        assert_eq!(monitor_exec(&manager, &chan, "sln"), 0);
        // already monitored, no base to retarget to
        assert_eq!(monitor_exec(&manager, &chan, "sln"), -1);
    }

    #[test]
    fn test_exec_dispatches_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let manager = MonitorManager::new(&MonitorConfig::with_dir(dir.path()));
        let chan = Channel::new("SIP/lee-12");

        assert_eq!(exec("monitor", &manager, &chan, "|lee"), Some(0));
        assert_eq!(exec("CHANGEMONITOR", &manager, &chan, "lee2"), Some(0));
        assert_eq!(exec("StopMonitor", &manager, &chan, ""), Some(0));
        assert_eq!(exec("Playback", &manager, &chan, "hello"), None);
    }
}
