use crate::{AudioProcessError, Result};
use derivative::Derivative;
use derive_setters::Setters;
use std::{fs, io::Cursor, path::Path, time::Duration};
use symphonia::{
    core::{
        audio::{AudioBuffer, AudioBufferRef, Signal},
        codecs::DecoderOptions,
        errors::Error as SymphoniaError,
        formats::FormatOptions,
        io::MediaSourceStream,
        meta::MetadataOptions,
        probe::Hint,
        sample::Sample,
    },
    default,
};

/// Decoded PCM audio. `samples` are interleaved `f32` in nominal `[-1.0, 1.0]`.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct AudioConfig {
    #[derivative(Default(value = "44_100"))]
    pub sample_rate: u32,

    #[derivative(Default(value = "2"))]
    pub channel: u16,

    pub duration: Duration,
    pub samples: Vec<f32>,
}

impl AudioConfig {
    pub fn new(sample_rate: u32, channel: u16, samples: Vec<f32>) -> Self {
        let frames = samples.len() / channel.max(1) as usize;
        let duration = if sample_rate == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(frames as f64 / sample_rate as f64)
        };

        Self {
            sample_rate,
            channel,
            duration,
            samples,
        }
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channel.max(1) as usize
    }
}

fn convert_planar<S, F>(buf: &AudioBuffer<S>, mut convert_fn: F) -> Vec<f32>
where
    S: Sample + Copy,
    F: FnMut(S) -> f32,
{
    let spec = *buf.spec();
    let channels = spec.channels.count();
    let frames = buf.frames();
    let mut samples = Vec::with_capacity(frames * channels);

    for frame in 0..frames {
        for channel in 0..channels {
            samples.push(convert_fn(buf.chan(channel)[frame]));
        }
    }
    samples
}

fn convert_audio_buffer_to_f32(audio_buffer: AudioBufferRef) -> Vec<f32> {
    match audio_buffer {
        AudioBufferRef::S8(buf) => convert_planar(&buf, |s| s as f32 / i8::MAX as f32),
        AudioBufferRef::U8(buf) => convert_planar(&buf, |s| {
            let half = (u8::MAX / 2 + 1) as f32;
            (s as f32 - half) / half
        }),
        AudioBufferRef::S16(buf) => convert_planar(&buf, |s| s as f32 / i16::MAX as f32),
        AudioBufferRef::U16(buf) => convert_planar(&buf, |s| {
            let half = (u16::MAX / 2 + 1) as f32;
            (s as f32 - half) / half
        }),
        AudioBufferRef::S24(buf) => {
            convert_planar(&buf, |s| s.inner() as f32 / (i32::MAX >> 8) as f32)
        }
        AudioBufferRef::U24(buf) => convert_planar(&buf, |s| {
            let half = ((1u32 << 24) / 2 + 1) as f32;
            (s.inner() as f32 - half) / half
        }),
        AudioBufferRef::S32(buf) => convert_planar(&buf, |s| s as f32 / i32::MAX as f32),
        AudioBufferRef::U32(buf) => convert_planar(&buf, |s| {
            let half = (u32::MAX / 2 + 1) as f32;
            (s as f32 - half) / half
        }),
        AudioBufferRef::F32(buf) => convert_planar(&buf, |s| s),
        AudioBufferRef::F64(buf) => convert_planar(&buf, |s| s as f32),
    }
}

/// Decode an in-memory audio file. `extension` is only a probe hint.
pub fn decode_audio_bytes(bytes: &[u8], extension: Option<&str>) -> Result<AudioConfig> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(&ext.to_lowercase());
    }

    let meta_opts: MetadataOptions = Default::default();
    // Trim encoder delay and end padding announced by the Xing/LAME tag
    let fmt_opts = FormatOptions {
        enable_gapless: true,
        ..Default::default()
    };
    let probed = default::get_probe()
        .format(&hint, mss, &fmt_opts, &meta_opts)
        .map_err(|e| AudioProcessError::Decode(format!("Failed to probe format: {e}")))?;

    let mut format = probed.format;

    // Find the first audio track by checking for sample_rate (audio-specific property)
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.sample_rate.is_some())
        .ok_or_else(|| AudioProcessError::Decode("No audio track found".to_string()))?;

    let mut decoder = default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AudioProcessError::Decode(format!("Failed to create decoder: {e}")))?;

    let track_id = track.id;
    let mut all_samples = Vec::new();
    let mut format_info: Option<(u32, usize)> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => continue,
            Err(e) => {
                return Err(AudioProcessError::Decode(format!(
                    "Failed to get packet: {e}"
                )));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(audio_buffer) => {
                if format_info.is_none() {
                    let spec = *audio_buffer.spec();
                    log::debug!(
                        "Detected audio format: {} Hz, {} channels",
                        spec.rate,
                        spec.channels.count()
                    );
                    format_info = Some((spec.rate, spec.channels.count()));
                }

                all_samples.extend_from_slice(&convert_audio_buffer_to_f32(audio_buffer));
            }
            Err(SymphoniaError::IoError(_)) | Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => {
                return Err(AudioProcessError::Decode(format!(
                    "Failed to decode audio: {e}"
                )));
            }
        }
    }

    let (sample_rate, channel_count) = format_info
        .ok_or_else(|| AudioProcessError::Decode("No audio packets found".to_string()))?;

    let audio = AudioConfig::new(sample_rate, channel_count as u16, all_samples);

    log::debug!(
        "Decoded audio: {} Hz, {} channels, {} frames, duration: {:.2}s",
        audio.sample_rate,
        audio.channel,
        audio.frames(),
        audio.duration.as_secs_f64()
    );

    Ok(audio)
}

pub fn load_audio_file(path: impl AsRef<Path>) -> Result<AudioConfig> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let extension = path.extension().and_then(|ext| ext.to_str());

    decode_audio_bytes(&bytes, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_config_duration() {
        let audio = AudioConfig::new(8_000, 2, vec![0.0; 16_000]);
        assert_eq!(audio.frames(), 8_000);
        assert_eq!(audio.duration, Duration::from_secs(1));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let bytes = b"this is plain text, not an mp3 stream".repeat(16);
        let result = decode_audio_bytes(&bytes, Some("mp3"));
        assert!(matches!(result, Err(AudioProcessError::Decode(_))));
    }

    #[test]
    fn test_decode_empty_fails() {
        assert!(decode_audio_bytes(&[], Some("mp3")).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_audio_file("definitely-not-here.mp3");
        assert!(matches!(result, Err(AudioProcessError::Io(_))));
    }
}
