pub mod manager;
pub mod sequence;
pub mod state;

pub use manager::MonitorManager;
pub use sequence::SequenceGenerator;
pub use state::{sanitize, MonitorState};
