use crate::{
    Result, audio,
    encoder::{Mp3Encoder, Mp3EncoderConfig},
    loader::{self, AudioConfig},
};
use derivative::Derivative;
use derive_setters::Setters;

/// Minimal capability set the batch pipeline needs from an audio codec.
pub trait AudioCodec {
    fn decode(&self, bytes: &[u8]) -> Result<AudioConfig>;
    fn apply_gain(&self, audio: AudioConfig, gain_db: f64) -> Result<AudioConfig>;
    fn encode(&self, audio: &AudioConfig) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
pub struct Mp3Codec {
    #[derivative(Default(value = "128"))]
    pub bitrate: u32,

    #[derivative(Default(value = "2"))]
    pub quality: u8,
}

impl AudioCodec for Mp3Codec {
    fn decode(&self, bytes: &[u8]) -> Result<AudioConfig> {
        loader::decode_audio_bytes(bytes, Some("mp3"))
    }

    fn apply_gain(&self, audio: AudioConfig, gain_db: f64) -> Result<AudioConfig> {
        Ok(audio::apply_gain(audio, gain_db))
    }

    /// MP3 carries one or two channels, wider sources are rejected with
    /// `InvalidChannels`.
    fn encode(&self, audio: &AudioConfig) -> Result<Vec<u8>> {
        let config = Mp3EncoderConfig::new(audio.sample_rate, audio.channel)?
            .with_bitrate(self.bitrate)
            .with_quality(self.quality);

        let mut encoder = Mp3Encoder::new(config)?;
        encoder.encode(&audio.samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AudioProcessError;
    use std::f32::consts::PI;

    fn sine(sample_rate: u32, channels: u16, seconds: f32, amplitude: f32) -> AudioConfig {
        let frames = (sample_rate as f32 * seconds) as usize;
        let samples = (0..frames)
            .flat_map(|i| {
                let v = amplitude * (2.0 * PI * 440.0 * i as f32 / sample_rate as f32).sin();
                std::iter::repeat_n(v, channels as usize)
            })
            .collect();

        AudioConfig::new(sample_rate, channels, samples)
    }

    #[test]
    fn test_encode_decode_keeps_format() -> anyhow::Result<()> {
        let codec = Mp3Codec::default();
        let mp3 = codec.encode(&sine(44100, 2, 1.0, 0.25))?;
        let decoded = codec.decode(&mp3)?;

        assert_eq!(decoded.sample_rate, 44100);
        assert_eq!(decoded.channel, 2);
        assert!(
            decoded.frames().abs_diff(44100) <= 1152,
            "frames = {}",
            decoded.frames()
        );
        Ok(())
    }

    #[test]
    fn test_reencode_does_not_grow() -> anyhow::Result<()> {
        let codec = Mp3Codec::default();
        let first = codec.decode(&codec.encode(&sine(22050, 1, 0.5, 0.25))?)?;
        let second = codec.decode(&codec.encode(&first)?)?;

        assert!(
            second.frames().abs_diff(first.frames()) <= 576,
            "{} -> {}",
            first.frames(),
            second.frames()
        );
        Ok(())
    }

    #[test]
    fn test_encode_rejects_surround() {
        let codec = Mp3Codec::default();
        assert!(matches!(
            codec.encode(&sine(48000, 6, 0.1, 0.1)),
            Err(AudioProcessError::InvalidChannels(6))
        ));
    }

    #[test]
    fn test_six_db_gain_roughly_doubles_amplitude() -> anyhow::Result<()> {
        let codec = Mp3Codec::default().with_bitrate(192);
        let source = codec.decode(&codec.encode(&sine(44100, 1, 1.0, 0.2))?)?;

        let louder = codec.apply_gain(source.clone(), 6.0)?;
        let louder = codec.decode(&codec.encode(&louder)?)?;

        let ratio = audio::rms(&louder.samples) / audio::rms(&source.samples);
        assert!((ratio - 1.995).abs() < 0.1, "ratio = {ratio}");
        Ok(())
    }
}
