//! Management action and reply messages, JSON with manager-style field names

use serde::{Deserialize, Serialize};

/// One request: the action plus an optional correlation id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerRequest {
    #[serde(rename = "ActionID", default, skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,
    #[serde(flatten)]
    pub action: ManagerAction,
}

/// Missing fields deserialize as None so the handler can report them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Action")]
pub enum ManagerAction {
    Monitor {
        #[serde(rename = "Channel", default)]
        channel: Option<String>,
        #[serde(rename = "File", default)]
        file: Option<String>,
        #[serde(rename = "Format", default)]
        format: Option<String>,
    },
    StopMonitor {
        #[serde(rename = "Channel", default)]
        channel: Option<String>,
    },
    ChangeMonitor {
        #[serde(rename = "Channel", default)]
        channel: Option<String>,
        #[serde(rename = "File", default)]
        file: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerResponse {
    #[serde(rename = "Response")]
    pub response: ResponseKind,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "ActionID", default, skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,
}

impl ManagerResponse {
    pub fn ack(message: impl Into<String>) -> Self {
        Self {
            response: ResponseKind::Success,
            message: message.into(),
            action_id: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            response: ResponseKind::Error,
            message: message.into(),
            action_id: None,
        }
    }

    pub fn with_action_id(mut self, action_id: Option<String>) -> Self {
        self.action_id = action_id;
        self
    }

    pub fn is_success(&self) -> bool {
        self.response == ResponseKind::Success
    }
}

/// Unsolicited messages from the bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Event")]
pub enum BridgeEvent {
    Connected {
        #[serde(rename = "ServerVersion")]
        server_version: String,
        #[serde(rename = "SessionID")]
        session_id: String,
    },
}
