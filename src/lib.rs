pub mod admin;
pub mod channel;
pub mod config;
pub mod dialplan;
pub mod error;
pub mod format;
pub mod monitor;

pub use admin::{AdminBridgeServer, ManagerAction, ManagerRequest, ManagerResponse};
pub use channel::{find_channel, Channel, ChannelList, ChannelRegistry, LockedChannel};
pub use config::MonitorConfig;
pub use error::{MonitorError, MonitorResult};
pub use format::{FormatRegistry, MonitorStream, RecordingInfo};
pub use monitor::{sanitize, MonitorManager, MonitorState, SequenceGenerator};
