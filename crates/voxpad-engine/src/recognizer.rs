use async_trait::async_trait;
use voxpad_core::{AudioClip, RecognitionError, Transcript};

/// A speech-recognition capability: one operation, audio in, transcript out.
///
/// Implementations are created through [`RecognizerRegistry`](crate::RecognizerRegistry),
/// initialized exactly once at startup with engine-specific TOML configuration,
/// and then used read-only for the rest of the process lifetime.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Returns the engine name (e.g. `"whisper"`, `"null"`).
    fn name(&self) -> &str;
    /// One-time initialization: load the model, validate configuration.
    async fn initialize(&mut self, config: toml::Value) -> Result<(), RecognitionError>;
    /// Recognize a prepared clip (16 kHz mono f32) into a transcript.
    async fn recognize(&self, clip: &AudioClip) -> Result<Transcript, RecognitionError>;
    /// Release resources on process exit.
    async fn shutdown(&self) -> Result<(), RecognitionError>;
}
