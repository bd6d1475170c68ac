pub mod raw_writer;
pub mod registry;
pub mod traits;
pub mod wav_writer;

pub use raw_writer::RawStream;
pub use registry::{FormatEntry, FormatKind, FormatRegistry};
pub use traits::{MonitorStream, RecordingInfo};
pub use wav_writer::WavStream;
