//! Management action handlers.
//!
//! Channel resolution happens here, before the lifecycle manager is called:
//! a missing channel field and an unknown channel are distinct errors.

use std::sync::Arc;
use tracing::debug;

use super::protocol::{ManagerAction, ManagerRequest, ManagerResponse};
use crate::channel::{find_channel, Channel, ChannelRegistry};
use crate::monitor::MonitorManager;

pub fn handle_request(
    manager: &MonitorManager,
    registry: &dyn ChannelRegistry,
    request: ManagerRequest,
) -> ManagerResponse {
    handle_action(manager, registry, &request.action).with_action_id(request.action_id)
}

pub fn handle_action(
    manager: &MonitorManager,
    registry: &dyn ChannelRegistry,
    action: &ManagerAction,
) -> ManagerResponse {
    debug!("Manager action: {:?}", action);
    match action {
        ManagerAction::Monitor {
            channel,
            file,
            format,
        } => {
            let chan = match resolve(registry, channel.as_deref()) {
                Ok(c) => c,
                Err(reply) => return reply,
            };
            match manager.start_or_change(&chan, format.as_deref(), file.as_deref()) {
                Ok(()) => ManagerResponse::ack("Started monitoring channel"),
                Err(_) => ManagerResponse::error("Could not start monitoring channel"),
            }
        }
        ManagerAction::StopMonitor { channel } => {
            let chan = match resolve(registry, channel.as_deref()) {
                Ok(c) => c,
                Err(reply) => return reply,
            };
            match manager.stop(&chan) {
                Ok(()) => ManagerResponse::ack("Stopped monitoring channel"),
                Err(_) => ManagerResponse::error("Could not stop monitoring channel"),
            }
        }
        ManagerAction::ChangeMonitor { channel, file } => {
            if is_blank(channel.as_deref()) {
                return ManagerResponse::error("No channel specified");
            }
            let Some(file) = file.as_deref().filter(|f| !f.is_empty()) else {
                return ManagerResponse::error("No filename specified");
            };
            let chan = match resolve(registry, channel.as_deref()) {
                Ok(c) => c,
                Err(reply) => return reply,
            };
            match manager.change_name(&chan, file) {
                Ok(()) => ManagerResponse::ack("Changed monitoring filename of channel"),
                Err(_) => ManagerResponse::error("Could not change monitored filename of channel"),
            }
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}

fn resolve(
    registry: &dyn ChannelRegistry,
    name: Option<&str>,
) -> Result<Arc<Channel>, ManagerResponse> {
    let name = match name {
        Some(n) if !n.is_empty() => n,
        _ => return Err(ManagerResponse::error("No channel specified")),
    };
    find_channel(registry, name).ok_or_else(|| ManagerResponse::error("No such channel"))
}
