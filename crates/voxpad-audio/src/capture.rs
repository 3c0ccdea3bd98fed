use cpal::traits::DeviceTrait;
use cpal::{Device, SampleRate, Stream, StreamConfig};
use ringbuf::traits::{Consumer, Producer};
use ringbuf::HeapCons;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use voxpad_core::{AudioClip, AudioError, CaptureStatus};

// ── RecorderHandle ────────────────────────────────────────────

/// Shared control surface for microphone recording. Cloneable and Send;
/// the capture stream itself stays on the thread that created it.
#[derive(Clone)]
pub struct RecorderHandle {
    recording: Arc<AtomicBool>,
    status: Arc<AtomicU8>,
    peak: Arc<AtomicU32>,
    buffer: Arc<Mutex<Vec<f32>>>,
    sample_rate: u32,
}

impl RecorderHandle {
    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::Relaxed)
    }

    /// Begin a fresh take. Discards whatever the previous take left behind.
    pub fn start(&self) {
        self.buffer.lock().unwrap().clear();
        self.peak.store(0.0f32.to_bits(), Ordering::Relaxed);
        self.recording.store(true, Ordering::Relaxed);
    }

    pub fn stop(&self) {
        self.recording.store(false, Ordering::Relaxed);
        self.peak.store(0.0f32.to_bits(), Ordering::Relaxed);
    }

    /// Current RMS level, normalized to 0.0–1.0 for display.
    pub fn peak_level(&self) -> f32 {
        f32::from_bits(self.peak.load(Ordering::Relaxed))
    }

    pub fn status(&self) -> CaptureStatus {
        match self.status.load(Ordering::Relaxed) {
            1 => CaptureStatus::Error,
            2 => CaptureStatus::Disabled,
            _ => CaptureStatus::Ok,
        }
    }

    pub fn set_status(&self, s: CaptureStatus) {
        let v = match s {
            CaptureStatus::Ok => 0,
            CaptureStatus::Error => 1,
            CaptureStatus::Disabled => 2,
        };
        self.status.store(v, Ordering::Relaxed);
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Take the recorded samples as a mono clip at the capture rate.
    /// Returns `None` when nothing was captured.
    pub fn take_clip(&self) -> Option<AudioClip> {
        let mut buf = self.buffer.lock().unwrap();
        if buf.is_empty() {
            return None;
        }
        let samples = std::mem::take(&mut *buf);
        Some(AudioClip {
            samples,
            sample_rate: self.sample_rate,
            channels: 1,
        })
    }
}

// ── CaptureNode ───────────────────────────────────────────────

/// Owns the cpal input stream and the drain thread that moves samples from
/// the lock-free ring into the recording buffer off the audio thread.
pub struct CaptureNode {
    _stream: Stream,
    drain_stop: Arc<AtomicBool>,
    drain: Option<std::thread::JoinHandle<()>>,
}

impl CaptureNode {
    pub fn new(
        device: &Device,
        sample_rate: u32,
        channels: u16,
        buffer_size: u32,
    ) -> Result<(Self, RecorderHandle), AudioError> {
        let config = StreamConfig {
            channels,
            sample_rate: SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Fixed(buffer_size),
        };

        // ~2 seconds of headroom between the audio callback and the drain thread.
        let ring_capacity = sample_rate as usize * 2;
        let (mut producer, consumer) = crate::create_ring_buffer(ring_capacity);

        let recording = Arc::new(AtomicBool::new(false));
        let status = Arc::new(AtomicU8::new(0));
        let peak = Arc::new(AtomicU32::new(0));

        let rec_flag = Arc::clone(&recording);
        let peak_cell = Arc::clone(&peak);
        let status_flag = Arc::clone(&status);

        let err_callback = move |err: cpal::StreamError| {
            tracing::error!("capture stream error: {}", err);
            status_flag.store(1, Ordering::Relaxed); // Error
        };

        let ch = channels as usize;
        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if !rec_flag.load(Ordering::Relaxed) {
                        return;
                    }
                    // Downmix in place, no allocation on the audio thread.
                    // Ring overflow is silently dropped.
                    let mut sum_squares = 0.0f32;
                    let mut frames = 0usize;
                    if ch > 1 {
                        for frame in data.chunks(ch) {
                            let s = frame.iter().sum::<f32>() / ch as f32;
                            sum_squares += s * s;
                            frames += 1;
                            let _ = producer.try_push(s);
                        }
                    } else {
                        sum_squares = data.iter().map(|s| s * s).sum();
                        frames = data.len();
                        producer.push_slice(data);
                    }
                    if frames > 0 {
                        let rms = (sum_squares / frames as f32).sqrt();
                        // Typical speech sits around 0.1–0.3 RMS.
                        let level = (rms * 3.0).min(1.0);
                        peak_cell.store(level.to_bits(), Ordering::Relaxed);
                    }
                },
                err_callback,
                None,
            )
            .map_err(|e| AudioError::StreamBuild(e.to_string()))?;

        let buffer = Arc::new(Mutex::new(Vec::new()));
        let drain_stop = Arc::new(AtomicBool::new(false));
        let drain = spawn_drain(consumer, Arc::clone(&buffer), Arc::clone(&drain_stop));

        let handle = RecorderHandle {
            recording,
            status,
            peak,
            buffer,
            sample_rate,
        };

        Ok((
            Self {
                _stream: stream,
                drain_stop,
                drain: Some(drain),
            },
            handle,
        ))
    }
}

impl Drop for CaptureNode {
    fn drop(&mut self) {
        self.drain_stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.drain.take() {
            let _ = handle.join();
        }
    }
}

fn spawn_drain(
    mut consumer: HeapCons<f32>,
    buffer: Arc<Mutex<Vec<f32>>>,
    stop: Arc<AtomicBool>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let mut scratch = vec![0.0f32; 4096];
        while !stop.load(Ordering::Relaxed) {
            let n = consumer.pop_slice(&mut scratch);
            if n > 0 {
                buffer.lock().unwrap().extend_from_slice(&scratch[..n]);
            } else {
                std::thread::sleep(Duration::from_millis(10));
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_recorder_handle(sample_rate: u32) -> RecorderHandle {
        RecorderHandle {
            recording: Arc::new(AtomicBool::new(false)),
            status: Arc::new(AtomicU8::new(0)),
            peak: Arc::new(AtomicU32::new(0)),
            buffer: Arc::new(Mutex::new(Vec::new())),
            sample_rate,
        }
    }

    #[test]
    fn test_recorder_handle_default_not_recording() {
        let handle = make_recorder_handle(48000);
        assert!(!handle.is_recording());
    }

    #[test]
    fn test_recorder_handle_start_stop() {
        let handle = make_recorder_handle(48000);
        handle.start();
        assert!(handle.is_recording());
        handle.stop();
        assert!(!handle.is_recording());
    }

    #[test]
    fn test_recorder_handle_start_clears_previous_take() {
        let handle = make_recorder_handle(48000);
        handle.buffer.lock().unwrap().extend_from_slice(&[0.1, 0.2]);
        handle.start();
        assert!(handle.buffer.lock().unwrap().is_empty());
    }

    #[test]
    fn test_recorder_handle_take_clip_empty_is_none() {
        let handle = make_recorder_handle(48000);
        assert!(handle.take_clip().is_none());
    }

    #[test]
    fn test_recorder_handle_take_clip_drains_buffer() {
        let handle = make_recorder_handle(44100);
        handle
            .buffer
            .lock()
            .unwrap()
            .extend_from_slice(&[0.1, 0.2, 0.3]);

        let clip = handle.take_clip().unwrap();
        assert_eq!(clip.samples, vec![0.1, 0.2, 0.3]);
        assert_eq!(clip.sample_rate, 44100);
        assert_eq!(clip.channels, 1);
        // A second take has nothing left
        assert!(handle.take_clip().is_none());
    }

    #[test]
    fn test_recorder_handle_clone_shares_state() {
        let h1 = make_recorder_handle(48000);
        let h2 = h1.clone();
        h1.start();
        assert!(h2.is_recording());
        h2.stop();
        assert!(!h1.is_recording());
    }

    #[test]
    fn test_recorder_handle_status_roundtrip() {
        let handle = make_recorder_handle(48000);
        assert_eq!(handle.status(), CaptureStatus::Ok);
        handle.set_status(CaptureStatus::Error);
        assert_eq!(handle.status(), CaptureStatus::Error);
        handle.set_status(CaptureStatus::Disabled);
        assert_eq!(handle.status(), CaptureStatus::Disabled);
    }

    #[test]
    fn test_recorder_handle_peak_level_roundtrip() {
        let handle = make_recorder_handle(48000);
        assert_eq!(handle.peak_level(), 0.0);
        handle.peak.store(0.5f32.to_bits(), Ordering::Relaxed);
        assert!((handle.peak_level() - 0.5).abs() < 1e-6);
        handle.stop();
        assert_eq!(handle.peak_level(), 0.0);
    }

    #[test]
    fn test_drain_thread_moves_samples_into_buffer() {
        let (mut producer, consumer) = crate::create_ring_buffer(1024);
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let stop = Arc::new(AtomicBool::new(false));
        let drain = spawn_drain(consumer, Arc::clone(&buffer), Arc::clone(&stop));

        producer.push_slice(&[0.1, 0.2, 0.3, 0.4]);

        // Wait for the drain thread to pick the samples up
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        loop {
            if buffer.lock().unwrap().len() == 4 {
                break;
            }
            assert!(
                std::time::Instant::now() < deadline,
                "drain thread never flushed the ring"
            );
            std::thread::sleep(Duration::from_millis(5));
        }

        stop.store(true, Ordering::Relaxed);
        drain.join().unwrap();

        assert_eq!(*buffer.lock().unwrap(), vec![0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_recorder_handle_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RecorderHandle>();
    }
}
