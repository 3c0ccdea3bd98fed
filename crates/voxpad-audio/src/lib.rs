pub mod capture;
pub mod decode;
pub mod device;

pub use capture::{CaptureNode, RecorderHandle};
pub use decode::{decode_wav, prepare_clip, resample, RECOGNIZER_SAMPLE_RATE};
pub use device::DeviceManager;

use ringbuf::traits::Split;
use ringbuf::{HeapCons, HeapProd, HeapRb};

/// Create a ring buffer split into producer and consumer halves.
pub fn create_ring_buffer(capacity: usize) -> (HeapProd<f32>, HeapCons<f32>) {
    HeapRb::<f32>::new(capacity).split()
}
