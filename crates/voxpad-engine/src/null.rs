use crate::recognizer::Recognizer;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use voxpad_core::{AudioClip, RecognitionError, Transcript};

/// Diagnostic recognizer that describes the clip instead of transcribing it.
/// Deterministic, so it doubles as the test engine.
pub struct NullRecognizer {
    recognize_count: AtomicUsize,
}

impl NullRecognizer {
    pub fn new() -> Self {
        Self {
            recognize_count: AtomicUsize::new(0),
        }
    }

    pub fn recognize_count(&self) -> usize {
        self.recognize_count.load(Ordering::Relaxed)
    }
}

impl Default for NullRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Recognizer for NullRecognizer {
    fn name(&self) -> &str {
        "null"
    }

    async fn initialize(&mut self, _config: toml::Value) -> Result<(), RecognitionError> {
        Ok(())
    }

    async fn recognize(&self, clip: &AudioClip) -> Result<Transcript, RecognitionError> {
        let count = self.recognize_count.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::trace!(
            "NullRecognizer request #{count}, {} samples @ {} Hz",
            clip.samples.len(),
            clip.sample_rate,
        );
        Ok(Transcript {
            text: format!(
                "[null] {} samples @ {} Hz",
                clip.samples.len(),
                clip.sample_rate
            ),
        })
    }

    async fn shutdown(&self) -> Result<(), RecognitionError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(samples: usize, sample_rate: u32) -> AudioClip {
        AudioClip {
            samples: vec![0.0; samples],
            sample_rate,
            channels: 1,
        }
    }

    #[test]
    fn test_null_recognizer_name() {
        let recognizer = NullRecognizer::new();
        assert_eq!(recognizer.name(), "null");
    }

    #[tokio::test]
    async fn test_null_recognizer_initialize_succeeds() {
        let mut recognizer = NullRecognizer::new();
        let result = recognizer
            .initialize(toml::Value::Table(Default::default()))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_null_recognizer_describes_clip() {
        let recognizer = NullRecognizer::new();
        let transcript = recognizer.recognize(&clip(480, 16000)).await.unwrap();
        assert_eq!(transcript.text, "[null] 480 samples @ 16000 Hz");
    }

    #[tokio::test]
    async fn test_null_recognizer_is_deterministic() {
        let recognizer = NullRecognizer::new();
        let c = clip(100, 16000);
        let first = recognizer.recognize(&c).await.unwrap();
        let second = recognizer.recognize(&c).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_null_recognizer_count_increments() {
        let recognizer = NullRecognizer::new();
        for _ in 0..3 {
            recognizer.recognize(&clip(480, 16000)).await.unwrap();
        }
        assert_eq!(recognizer.recognize_count(), 3);
    }

    #[tokio::test]
    async fn test_null_recognizer_shutdown_succeeds() {
        let recognizer = NullRecognizer::new();
        assert!(recognizer.shutdown().await.is_ok());
    }

    #[test]
    fn test_null_recognizer_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NullRecognizer>();
    }
}
