pub mod audio;
pub mod codec;
pub mod encoder;
pub mod loader;

mod info_tag;

pub use codec::{AudioCodec, Mp3Codec};
pub use encoder::{Mp3Encoder, Mp3EncoderConfig};
pub use loader::AudioConfig;

pub type Result<T> = std::result::Result<T, AudioProcessError>;

#[derive(thiserror::Error, Debug)]
pub enum AudioProcessError {
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Invalid channel count: {0}")]
    InvalidChannels(u16),

    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(u32),

    #[error("Unsupported bitrate: {0} kbps")]
    InvalidBitrate(u32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
