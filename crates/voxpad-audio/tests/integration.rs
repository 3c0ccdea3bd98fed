use std::path::Path;
use voxpad_audio::{decode_wav, prepare_clip, RECOGNIZER_SAMPLE_RATE};

fn write_sine_wav(path: &Path, sample_rate: u32, channels: u16, seconds: f32) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    let frames = (sample_rate as f32 * seconds) as usize;
    for i in 0..frames {
        let v = ((i as f32 * 440.0 * 2.0 * std::f32::consts::PI / sample_rate as f32).sin()
            * 0.5
            * i16::MAX as f32) as i16;
        for _ in 0..channels {
            writer.write_sample(v).unwrap();
        }
    }
    writer.finalize().unwrap();
}

#[test]
fn test_decode_and_prepare_stereo_44100() {
    let dir = std::env::temp_dir().join("voxpad_audio_e2e_stereo");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("tone.wav");
    write_sine_wav(&path, 44100, 2, 0.5);

    let clip = decode_wav(&path).unwrap();
    assert_eq!(clip.sample_rate, 44100);
    assert_eq!(clip.channels, 2);

    let prepared = prepare_clip(clip).unwrap();
    assert_eq!(prepared.sample_rate, RECOGNIZER_SAMPLE_RATE);
    assert_eq!(prepared.channels, 1);

    // 0.5 s of audio should still be ~0.5 s after resampling
    let expected = (RECOGNIZER_SAMPLE_RATE as f32 * 0.5) as i64;
    let got = prepared.samples.len() as i64;
    assert!(
        (got - expected).abs() < expected / 10,
        "expected ~{expected} frames, got {got}"
    );

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_decode_and_prepare_already_conformant() {
    let dir = std::env::temp_dir().join("voxpad_audio_e2e_16k");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("tone.wav");
    write_sine_wav(&path, RECOGNIZER_SAMPLE_RATE, 1, 0.25);

    let clip = decode_wav(&path).unwrap();
    let frames = clip.samples.len();
    let prepared = prepare_clip(clip).unwrap();

    // No resampling, no downmix: frame count unchanged
    assert_eq!(prepared.samples.len(), frames);
    assert_eq!(prepared.sample_rate, RECOGNIZER_SAMPLE_RATE);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_decode_rejects_non_wav_payload() {
    let dir = std::env::temp_dir().join("voxpad_audio_e2e_badfile");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("clip.wav");
    std::fs::write(&path, b"<html>not audio</html>").unwrap();

    assert!(decode_wav(&path).is_err());

    std::fs::remove_dir_all(&dir).unwrap();
}
