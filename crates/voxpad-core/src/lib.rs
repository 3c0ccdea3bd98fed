pub mod config;
pub mod error;
pub mod types;
pub mod ui_types;

pub use config::AppConfig;
pub use error::{AudioError, ConfigError, ModelError, RecognitionError};
pub use types::{AudioClip, AudioSource, Transcript};
pub use ui_types::{CaptureStatus, SessionState, UiCommand};
