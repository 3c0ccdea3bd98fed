use voxpad_core::{AudioSource, RecognitionError};
use voxpad_engine::Recognizer;

/// Fixed response when no audio resource was supplied. Terminal, not an error.
pub const MISSING_INPUT_PROMPT: &str = "Please upload an audio file.";

/// Prefix of the flattened failure channel.
pub const PROCESSING_ERROR_PREFIX: &str = "Error processing audio: ";

/// The transcription service: one audio source in, one display string out.
/// Holds the recognizer for the process lifetime; the recognizer must be
/// initialized before the service is constructed.
pub struct TranscriptionService {
    recognizer: Box<dyn Recognizer>,
}

impl TranscriptionService {
    pub fn new(recognizer: Box<dyn Recognizer>) -> Self {
        Self { recognizer }
    }

    pub fn engine_name(&self) -> &str {
        self.recognizer.name()
    }

    /// Turn an audio source into display text. Never fails: missing input
    /// yields a fixed prompt, and every processing failure is flattened into
    /// the same text channel as a successful transcription. Recognized text
    /// is returned verbatim.
    pub async fn transcribe(&self, source: Option<AudioSource>) -> String {
        let Some(source) = source else {
            return MISSING_INPUT_PROMPT.to_string();
        };

        match self.process(source).await {
            Ok(text) => text,
            Err(desc) => {
                tracing::warn!("transcription failed: {desc}");
                format!("{PROCESSING_ERROR_PREFIX}{desc}")
            }
        }
    }

    async fn process(&self, source: AudioSource) -> Result<String, String> {
        let clip = match source {
            AudioSource::File(path) => {
                voxpad_audio::decode_wav(&path).map_err(|e| e.to_string())?
            }
            AudioSource::Clip(clip) => clip,
        };
        let clip = voxpad_audio::prepare_clip(clip).map_err(|e| e.to_string())?;
        let transcript = self
            .recognizer
            .recognize(&clip)
            .await
            .map_err(failure_description)?;
        Ok(transcript.text)
    }

    pub async fn shutdown(&self) {
        if let Err(e) = self.recognizer.shutdown().await {
            tracing::warn!("recognizer shutdown failed: {e}");
        }
    }
}

/// The user-visible description of a recognition failure. `ProcessingFailed`
/// carries the description directly; anything else falls back to its display
/// form.
fn failure_description(err: RecognitionError) -> String {
    match err {
        RecognitionError::ProcessingFailed(desc) => desc,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use voxpad_core::{AudioClip, Transcript};

    /// Recognizer double that always returns the same text.
    struct FixedRecognizer {
        text: String,
    }

    #[async_trait]
    impl Recognizer for FixedRecognizer {
        fn name(&self) -> &str {
            "fixed"
        }
        async fn initialize(&mut self, _config: toml::Value) -> Result<(), RecognitionError> {
            Ok(())
        }
        async fn recognize(&self, _clip: &AudioClip) -> Result<Transcript, RecognitionError> {
            Ok(Transcript {
                text: self.text.clone(),
            })
        }
        async fn shutdown(&self) -> Result<(), RecognitionError> {
            Ok(())
        }
    }

    /// Recognizer double that always fails with the given description.
    struct FailingRecognizer {
        description: String,
    }

    #[async_trait]
    impl Recognizer for FailingRecognizer {
        fn name(&self) -> &str {
            "failing"
        }
        async fn initialize(&mut self, _config: toml::Value) -> Result<(), RecognitionError> {
            Ok(())
        }
        async fn recognize(&self, _clip: &AudioClip) -> Result<Transcript, RecognitionError> {
            Err(RecognitionError::ProcessingFailed(self.description.clone()))
        }
        async fn shutdown(&self) -> Result<(), RecognitionError> {
            Ok(())
        }
    }

    fn fixed(text: &str) -> TranscriptionService {
        TranscriptionService::new(Box::new(FixedRecognizer {
            text: text.to_string(),
        }))
    }

    fn failing(description: &str) -> TranscriptionService {
        TranscriptionService::new(Box::new(FailingRecognizer {
            description: description.to_string(),
        }))
    }

    fn clip() -> AudioClip {
        AudioClip {
            samples: vec![0.1; 1600],
            sample_rate: 16000,
            channels: 1,
        }
    }

    #[tokio::test]
    async fn test_absent_input_returns_guidance_string() {
        let service = fixed("should never appear");
        let result = service.transcribe(None).await;
        assert_eq!(result, "Please upload an audio file.");
    }

    #[tokio::test]
    async fn test_recognized_text_is_returned_verbatim() {
        let service = fixed("hello world");
        let result = service
            .transcribe(Some(AudioSource::Clip(clip())))
            .await;
        assert_eq!(result, "hello world");
    }

    #[tokio::test]
    async fn test_no_trimming_or_casing_is_applied() {
        let service = fixed("  Mixed CASE with  spaces  ");
        let result = service
            .transcribe(Some(AudioSource::Clip(clip())))
            .await;
        assert_eq!(result, "  Mixed CASE with  spaces  ");
    }

    #[tokio::test]
    async fn test_recognizer_failure_is_flattened_into_error_string() {
        let service = failing("bad codec");
        let result = service
            .transcribe(Some(AudioSource::Clip(clip())))
            .await;
        assert_eq!(result, "Error processing audio: bad codec");
    }

    #[tokio::test]
    async fn test_transcribe_is_idempotent() {
        let service = fixed("same answer");
        let source = AudioSource::Clip(clip());
        let first = service.transcribe(Some(source.clone())).await;
        let second = service.transcribe(Some(source)).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_file_rides_the_error_channel() {
        let service = fixed("unreachable");
        let result = service
            .transcribe(Some(AudioSource::File("/nonexistent/clip.wav".into())))
            .await;
        assert!(
            result.starts_with(PROCESSING_ERROR_PREFIX),
            "got: {result}"
        );
    }

    #[tokio::test]
    async fn test_degenerate_clip_rides_the_error_channel() {
        let service = fixed("unreachable");
        let broken = AudioClip {
            samples: vec![0.0; 16],
            sample_rate: 0,
            channels: 1,
        };
        let result = service.transcribe(Some(AudioSource::Clip(broken))).await;
        assert!(
            result.starts_with(PROCESSING_ERROR_PREFIX),
            "got: {result}"
        );
    }

    #[tokio::test]
    async fn test_non_conformant_clip_is_prepared_before_recognition() {
        // Stereo clip at the recognizer rate: the service downmixes it.
        let service = fixed("prepared fine");
        let stereo = AudioClip {
            samples: vec![0.2; 3200],
            sample_rate: 16000,
            channels: 2,
        };
        let result = service.transcribe(Some(AudioSource::Clip(stereo))).await;
        assert_eq!(result, "prepared fine");
    }

    #[test]
    fn test_failure_description_unwraps_processing_failed() {
        let desc = failure_description(RecognitionError::ProcessingFailed("bad codec".into()));
        assert_eq!(desc, "bad codec");
    }

    #[test]
    fn test_failure_description_displays_other_kinds() {
        let desc = failure_description(RecognitionError::EngineNotFound("ghost".into()));
        assert!(desc.contains("ghost"));
    }
}
