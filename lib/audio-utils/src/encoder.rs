use crate::{AudioProcessError, Result, info_tag};
use derivative::Derivative;
use derive_setters::Setters;
use mp3lame_encoder::{Bitrate, Builder, Encoder, FlushNoGap, InterleavedPcm, MonoPcm, Quality};

const VALID_SAMPLE_RATES: [u32; 9] = [
    8000, 11025, 12000, 16000, 22050, 24000, 32000, 44100, 48000,
];

#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct Mp3EncoderConfig {
    /// Sample rate (e.g., 44100, 48000)
    #[derivative(Default(value = "44100"))]
    pub sample_rate: u32,

    /// Number of audio channels (1 = mono, 2 = stereo)
    #[derivative(Default(value = "2"))]
    pub channels: u16,

    /// Constant bitrate in kbps
    #[derivative(Default(value = "128"))]
    pub bitrate: u32,

    /// LAME quality preset, 0 is best and 9 is worst
    #[derivative(Default(value = "2"))]
    pub quality: u8,
}

impl Mp3EncoderConfig {
    pub fn new(sample_rate: u32, channels: u16) -> Result<Self> {
        let config = Self {
            sample_rate,
            channels,
            ..Default::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// MP3 supports the nine MPEG-1/2/2.5 sample rates and at most two channels.
    pub fn validate(&self) -> Result<()> {
        if !VALID_SAMPLE_RATES.contains(&self.sample_rate) {
            return Err(AudioProcessError::InvalidSampleRate(self.sample_rate));
        }

        if !(1..=2).contains(&self.channels) {
            return Err(AudioProcessError::InvalidChannels(self.channels));
        }

        Ok(())
    }
}

fn to_lame_bitrate(kbps: u32) -> Result<Bitrate> {
    let bitrate = match kbps {
        8 => Bitrate::Kbps8,
        16 => Bitrate::Kbps16,
        24 => Bitrate::Kbps24,
        32 => Bitrate::Kbps32,
        40 => Bitrate::Kbps40,
        48 => Bitrate::Kbps48,
        64 => Bitrate::Kbps64,
        80 => Bitrate::Kbps80,
        96 => Bitrate::Kbps96,
        112 => Bitrate::Kbps112,
        128 => Bitrate::Kbps128,
        160 => Bitrate::Kbps160,
        192 => Bitrate::Kbps192,
        224 => Bitrate::Kbps224,
        256 => Bitrate::Kbps256,
        320 => Bitrate::Kbps320,
        _ => return Err(AudioProcessError::InvalidBitrate(kbps)),
    };

    Ok(bitrate)
}

fn to_lame_quality(quality: u8) -> Quality {
    match quality {
        0 => Quality::Best,
        1 => Quality::SecondBest,
        2 => Quality::NearBest,
        3 => Quality::VeryNice,
        4 => Quality::Nice,
        5 => Quality::Good,
        6 => Quality::Decent,
        7 => Quality::Ok,
        8 => Quality::SecondWorst,
        _ => Quality::Worst,
    }
}

pub struct Mp3Encoder {
    config: Mp3EncoderConfig,
    encoder: Encoder,
}

impl Mp3Encoder {
    pub fn new(config: Mp3EncoderConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Builder::new().ok_or_else(|| {
            AudioProcessError::Encode("Failed to allocate LAME encoder".to_string())
        })?;

        builder
            .set_num_channels(config.channels as u8)
            .map_err(|e| AudioProcessError::Encode(format!("Set channels failed: {e:?}")))?;
        builder
            .set_sample_rate(config.sample_rate)
            .map_err(|e| AudioProcessError::Encode(format!("Set sample rate failed: {e:?}")))?;
        builder
            .set_brate(to_lame_bitrate(config.bitrate)?)
            .map_err(|e| AudioProcessError::Encode(format!("Set bitrate failed: {e:?}")))?;
        builder
            .set_quality(to_lame_quality(config.quality))
            .map_err(|e| AudioProcessError::Encode(format!("Set quality failed: {e:?}")))?;

        let encoder = builder
            .build()
            .map_err(|e| AudioProcessError::Encode(format!("LAME initialization failed: {e:?}")))?;

        log::debug!(
            "MP3 encoder initialized: {} channels, sample_rate={}, bitrate={}kbps",
            config.channels,
            config.sample_rate,
            config.bitrate
        );

        Ok(Self { config, encoder })
    }

    /// Encode interleaved f32 samples and flush, producing a complete MP3 stream
    /// whose Info tag records the encoder delay and padding.
    pub fn encode(&mut self, pcm_data: &[f32]) -> Result<Vec<u8>> {
        let pcm_i16: Vec<i16> = pcm_data
            .iter()
            .map(|&sample| {
                let clamped = sample.clamp(-1.0, 1.0);
                (clamped * i16::MAX as f32) as i16
            })
            .collect();

        let mut output = Vec::new();

        let written = if self.config.channels == 1 {
            self.encoder.encode_to_vec(MonoPcm(pcm_i16.as_slice()), &mut output)
        } else {
            self.encoder
                .encode_to_vec(InterleavedPcm(pcm_i16.as_slice()), &mut output)
        }
        .map_err(|e| AudioProcessError::Encode(format!("Encoding failed: {e:?}")))?;

        let flushed = self
            .encoder
            .flush_to_vec::<FlushNoGap>(&mut output)
            .map_err(|e| AudioProcessError::Encode(format!("Flush failed: {e:?}")))?;

        log::trace!("MP3 encoder wrote {written} bytes, flushed {flushed} bytes");

        let samples = pcm_data.len() / self.config.channels as usize;
        Ok(info_tag::write_info_tag(output, samples))
    }

    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }
}
