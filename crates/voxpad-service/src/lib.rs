pub mod host;
pub mod service;
pub mod sink;

pub use host::{SessionHost, SessionShared};
pub use service::{TranscriptionService, MISSING_INPUT_PROMPT, PROCESSING_ERROR_PREFIX};
pub use sink::TranscriptSink;
