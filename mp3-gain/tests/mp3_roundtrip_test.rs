// cargo test -p mp3-gain --test mp3_roundtrip_test

use anyhow::Result;
use audio_utils::{AudioCodec, AudioConfig, Mp3Codec, audio, loader::load_audio_file};
use mp3_gain::{BatchConfig, BatchGainApplier, Gain};
use std::{f32::consts::PI, fs, path::Path};

fn write_tone(path: &Path, amplitude: f32) -> Result<()> {
    let sample_rate = 44_100;
    let samples = (0..sample_rate)
        .flat_map(|i| {
            let v = amplitude * (2.0 * PI * 440.0 * i as f32 / sample_rate as f32).sin();
            [v, v]
        })
        .collect();

    let mp3 = Mp3Codec::default().encode(&AudioConfig::new(sample_rate, 2, samples))?;
    fs::write(path, mp3)?;
    Ok(())
}

fn rms_ratio(dir: &Path, name: &str) -> Result<f32> {
    let source = load_audio_file(dir.join(name))?;
    let output = load_audio_file(dir.join("output").join(name))?;

    assert_eq!(source.sample_rate, output.sample_rate);
    assert_eq!(source.channel, output.channel);

    Ok(audio::rms(&output.samples) / audio::rms(&source.samples))
}

#[test]
fn test_gain_on_real_mp3() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_tone(&dir.path().join("tone.mp3"), 0.2)?;
    fs::write(dir.path().join("corrupt.mp3"), b"not audio at all")?;

    let applier = BatchGainApplier::new(dir.path(), Mp3Codec::default(), BatchConfig::default());

    let report = applier.run(Gain::from_db(6.0), &mut Vec::new())?;
    assert_eq!(report.processed_count(), 1);
    assert_eq!(report.failed_count(), 1);

    let ratio = rms_ratio(dir.path(), "tone.mp3")?;
    assert!((ratio - 1.995).abs() < 0.1, "6 dB ratio = {ratio}");

    applier.run(Gain::from_db(0.0), &mut Vec::new())?;
    let ratio = rms_ratio(dir.path(), "tone.mp3")?;
    assert!((ratio - 1.0).abs() < 0.05, "0 dB ratio = {ratio}");
    Ok(())
}

#[test]
fn test_output_length_matches_source() -> Result<()> {
    let first = tempfile::tempdir()?;
    write_tone(&first.path().join("tone.mp3"), 0.2)?;
    BatchGainApplier::new(first.path(), Mp3Codec::default(), BatchConfig::default())
        .run(Gain::from_db(0.0), &mut Vec::new())?;

    // Process the output once more, as a user re-running the tool on it would
    let second = tempfile::tempdir()?;
    fs::copy(
        first.path().join("output/tone.mp3"),
        second.path().join("tone.mp3"),
    )?;
    BatchGainApplier::new(second.path(), Mp3Codec::default(), BatchConfig::default())
        .run(Gain::from_db(0.0), &mut Vec::new())?;

    let source = load_audio_file(first.path().join("tone.mp3"))?.frames();
    for output in [
        first.path().join("output/tone.mp3"),
        second.path().join("output/tone.mp3"),
    ] {
        let frames = load_audio_file(&output)?.frames();
        assert!(
            frames.abs_diff(source) <= 1152,
            "{} has {frames} frames, source has {source}",
            output.display()
        );
    }
    Ok(())
}
