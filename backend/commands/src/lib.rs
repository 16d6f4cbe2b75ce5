pub mod detection;
pub mod processor;
pub mod reply;

pub use detection::{detect_command, Detection, DEFAULT_COMMAND_PREFIX};
pub use processor::{CommandOutcome, CommandProcessor, IgnoreReason, ProcessorSettings};
