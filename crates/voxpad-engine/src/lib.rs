pub mod models;
pub mod null;
pub mod recognizer;
pub mod registry;
#[cfg(feature = "whisper")]
pub mod whisper;

pub use null::NullRecognizer;
pub use recognizer::Recognizer;
pub use registry::RecognizerRegistry;
#[cfg(feature = "whisper")]
pub use whisper::WhisperRecognizer;
