use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use std::path::Path;
use voxpad_core::{AudioClip, AudioError};

/// Sample rate the recognizer consumes.
pub const RECOGNIZER_SAMPLE_RATE: u32 = 16_000;

const RESAMPLER_CHUNK: usize = 1024;

/// Decode a WAV file into an `AudioClip` at its native rate and channel count.
pub fn decode_wav(path: &Path) -> Result<AudioClip, AudioError> {
    let reader = hound::WavReader::open(path).map_err(|e| match e {
        hound::Error::IoError(io) => AudioError::FileRead(format!("{}: {io}", path.display())),
        other => AudioError::Decode(other.to_string()),
    })?;
    let spec = reader.spec();

    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AudioError::Decode(e.to_string()))?,
        (hound::SampleFormat::Int, bits @ 1..=32) => {
            let scale = (1u32 << (bits - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| AudioError::Decode(e.to_string()))?
        }
        (fmt, bits) => {
            return Err(AudioError::UnsupportedFormat(format!(
                "{bits}-bit {fmt:?} WAV"
            )))
        }
    };

    Ok(AudioClip {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

/// Conform a clip to what the recognizer expects: mono at 16 kHz.
/// Already-conformant clips pass through untouched.
pub fn prepare_clip(clip: AudioClip) -> Result<AudioClip, AudioError> {
    if clip.sample_rate == 0 || clip.channels == 0 {
        return Err(AudioError::UnsupportedFormat(format!(
            "{} Hz, {} channel audio",
            clip.sample_rate, clip.channels
        )));
    }

    let mono = if clip.channels > 1 {
        downmix_to_mono(&clip.samples, clip.channels as usize)
    } else {
        clip.samples
    };

    let samples = resample(&mono, clip.sample_rate, RECOGNIZER_SAMPLE_RATE)?;

    Ok(AudioClip {
        samples,
        sample_rate: RECOGNIZER_SAMPLE_RATE,
        channels: 1,
    })
}

fn downmix_to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Sinc resample a mono signal. Returns the input unchanged when the rates
/// already match.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, AudioError> {
    if from_rate == to_rate {
        return Ok(samples.to_vec());
    }
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, RESAMPLER_CHUNK, 1)
        .map_err(|e| AudioError::Resample(e.to_string()))?;

    let mut out = Vec::with_capacity((samples.len() as f64 * ratio) as usize + RESAMPLER_CHUNK);
    for chunk in samples.chunks(RESAMPLER_CHUNK) {
        let input_frames = resampler.input_frames_next();
        if chunk.len() == input_frames {
            let output = resampler
                .process(&[chunk.to_vec()], None)
                .map_err(|e| AudioError::Resample(e.to_string()))?;
            out.extend_from_slice(&output[0]);
        } else {
            // Final short chunk: pad with silence, keep the proportional output.
            let mut padded = chunk.to_vec();
            padded.resize(input_frames, 0.0);
            let expected = resampler.output_frames_next();
            let output = resampler
                .process(&[padded], None)
                .map_err(|e| AudioError::Resample(e.to_string()))?;
            let keep = ((chunk.len() as f64 / input_frames as f64) * expected as f64) as usize;
            out.extend_from_slice(&output[0][..keep.min(output[0].len())]);
        }
    }

    Ok(out)
}
