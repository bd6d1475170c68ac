pub mod actions;
pub mod bridge;
pub mod protocol;

pub use actions::{handle_action, handle_request};
pub use bridge::AdminBridgeServer;
pub use protocol::{BridgeEvent, ManagerAction, ManagerRequest, ManagerResponse, ResponseKind};
