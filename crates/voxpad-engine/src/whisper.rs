use crate::recognizer::Recognizer;
use async_trait::async_trait;
use voxpad_core::{AudioClip, RecognitionError, Transcript};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Whisper-backed recognizer. Loads a ggml model once at initialization and
/// creates a fresh inference state per request, so concurrent read-only use
/// of the context is safe.
pub struct WhisperRecognizer {
    ctx: Option<WhisperContext>,
    language: Option<String>,
}

impl WhisperRecognizer {
    pub fn new() -> Self {
        Self {
            ctx: None,
            language: None,
        }
    }
}

impl Default for WhisperRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Recognizer for WhisperRecognizer {
    fn name(&self) -> &str {
        "whisper"
    }

    async fn initialize(&mut self, config: toml::Value) -> Result<(), RecognitionError> {
        let model_path = config
            .get("model_path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                RecognitionError::InitializationFailed(
                    "missing 'model_path' in whisper config".to_string(),
                )
            })?;

        self.language = config
            .get("language")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let ctx = WhisperContext::new_with_params(model_path, WhisperContextParameters::default())
            .map_err(|e| {
                RecognitionError::InitializationFailed(format!(
                    "failed to load model '{model_path}': {e}"
                ))
            })?;
        self.ctx = Some(ctx);

        tracing::info!(
            model_path = %model_path,
            language = ?self.language,
            "whisper model loaded"
        );
        Ok(())
    }

    async fn recognize(&self, clip: &AudioClip) -> Result<Transcript, RecognitionError> {
        let ctx = self.ctx.as_ref().ok_or_else(|| {
            RecognitionError::ProcessingFailed("recognizer not initialized".to_string())
        })?;

        if clip.sample_rate != WHISPER_SAMPLE_RATE || clip.channels != 1 {
            return Err(RecognitionError::ProcessingFailed(format!(
                "expected {} Hz mono input, got {} Hz {} ch",
                WHISPER_SAMPLE_RATE, clip.sample_rate, clip.channels
            )));
        }

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        if let Some(lang) = self.language.as_deref() {
            params.set_language(Some(lang));
        }
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_translate(false);

        let mut state = ctx
            .create_state()
            .map_err(|e| RecognitionError::ProcessingFailed(e.to_string()))?;
        state
            .full(params, &clip.samples)
            .map_err(|e| RecognitionError::ProcessingFailed(e.to_string()))?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| RecognitionError::ProcessingFailed(e.to_string()))?;
        let mut text = String::new();
        for i in 0..num_segments {
            if let Ok(segment) = state.full_get_segment_text(i) {
                text.push_str(&segment);
                text.push(' ');
            }
        }

        Ok(Transcript {
            text: text.trim().to_string(),
        })
    }

    async fn shutdown(&self) -> Result<(), RecognitionError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whisper_recognizer_name() {
        let recognizer = WhisperRecognizer::new();
        assert_eq!(recognizer.name(), "whisper");
    }

    #[tokio::test]
    async fn test_whisper_initialize_missing_model_path_fails() {
        let mut recognizer = WhisperRecognizer::new();
        let result = recognizer
            .initialize(toml::Value::Table(Default::default()))
            .await;
        match result {
            Err(RecognitionError::InitializationFailed(msg)) => {
                assert!(msg.contains("model_path"));
            }
            _ => panic!("expected InitializationFailed"),
        }
    }

    #[tokio::test]
    async fn test_whisper_initialize_nonexistent_model_fails() {
        let mut recognizer = WhisperRecognizer::new();
        let mut table = toml::map::Map::new();
        table.insert(
            "model_path".to_string(),
            toml::Value::String("/nonexistent/ggml-void.bin".to_string()),
        );
        let result = recognizer.initialize(toml::Value::Table(table)).await;
        assert!(matches!(
            result,
            Err(RecognitionError::InitializationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_whisper_recognize_before_initialize_fails() {
        let recognizer = WhisperRecognizer::new();
        let clip = AudioClip {
            samples: vec![0.0; 16000],
            sample_rate: 16000,
            channels: 1,
        };
        match recognizer.recognize(&clip).await {
            Err(RecognitionError::ProcessingFailed(msg)) => {
                assert!(msg.contains("not initialized"));
            }
            _ => panic!("expected ProcessingFailed"),
        }
    }

    #[test]
    fn test_whisper_recognizer_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WhisperRecognizer>();
    }
}
