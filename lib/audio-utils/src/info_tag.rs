//! Xing/Info frame with the LAME extension. Decoders read the encoder delay
//! and end padding from it and trim them, so a decoded stream has the same
//! length as the PCM that was encoded.

/// Samples LAME inserts before the first input sample.
pub const ENCODER_DELAY: u32 = 576;

const ENCODER_NAME: &[u8; 9] = b"LAME3.100";

/// "Info" id, flags, frame count, byte count, TOC and quality.
const XING_LEN: usize = 120;

/// LAME extension including its trailing CRC.
const LAME_EXT_LEN: usize = 36;

const MPEG1_BITRATES: [u32; 15] = [
    0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320,
];

const MPEG2_BITRATES: [u32; 15] = [
    0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpegVersion {
    Mpeg1,
    Mpeg2,
    Mpeg25,
}

/// Layer III frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: MpegVersion,
    pub bitrate: u32,
    pub sample_rate: u32,
    pub padding: bool,
    pub mono: bool,
    pub protected: bool,
}

impl FrameHeader {
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let header = u32::from_be_bytes(bytes.get(..4)?.try_into().ok()?);

        if header >> 21 != 0x7FF {
            return None;
        }

        let version = match (header >> 19) & 0b11 {
            0b00 => MpegVersion::Mpeg25,
            0b10 => MpegVersion::Mpeg2,
            0b11 => MpegVersion::Mpeg1,
            _ => return None,
        };

        // Layer III only
        if (header >> 17) & 0b11 != 0b01 {
            return None;
        }

        let bitrate_index = ((header >> 12) & 0xF) as usize;
        let sample_rate_index = ((header >> 10) & 0b11) as usize;
        if bitrate_index == 0 || bitrate_index == 15 || sample_rate_index == 3 {
            return None;
        }

        let (bitrate, sample_rate) = match version {
            MpegVersion::Mpeg1 => (
                MPEG1_BITRATES[bitrate_index],
                [44100, 48000, 32000][sample_rate_index],
            ),
            MpegVersion::Mpeg2 => (
                MPEG2_BITRATES[bitrate_index],
                [22050, 24000, 16000][sample_rate_index],
            ),
            MpegVersion::Mpeg25 => (
                MPEG2_BITRATES[bitrate_index],
                [11025, 12000, 8000][sample_rate_index],
            ),
        };

        Some(Self {
            version,
            bitrate,
            sample_rate,
            padding: (header >> 9) & 1 == 1,
            mono: (header >> 6) & 0b11 == 0b11,
            protected: (header >> 16) & 1 == 0,
        })
    }

    pub fn frame_len(&self) -> usize {
        let coefficient = match self.version {
            MpegVersion::Mpeg1 => 144,
            _ => 72,
        };

        (coefficient * self.bitrate as usize * 1000) / self.sample_rate as usize
            + self.padding as usize
    }

    pub fn samples_per_frame(&self) -> u32 {
        match self.version {
            MpegVersion::Mpeg1 => 1152,
            _ => 576,
        }
    }

    pub fn side_info_len(&self) -> usize {
        match (self.version, self.mono) {
            (MpegVersion::Mpeg1, true) => 17,
            (MpegVersion::Mpeg1, false) => 32,
            (_, true) => 9,
            (_, false) => 17,
        }
    }
}

/// CRC-16 (polynomial 0x8005, reflected, zero init) as used by the LAME tag.
pub fn crc16(bytes: &[u8]) -> u16 {
    bytes.iter().fold(0u16, |crc, &byte| {
        (0..8).fold(crc ^ byte as u16, |crc, _| {
            if crc & 1 != 0 {
                (crc >> 1) ^ 0xA001
            } else {
                crc >> 1
            }
        })
    })
}

fn id3v2_len(stream: &[u8]) -> usize {
    if stream.len() < 10 || &stream[..3] != b"ID3" {
        return 0;
    }

    let size = stream[6..10]
        .iter()
        .fold(0usize, |size, &b| (size << 7) | (b & 0x7F) as usize);
    let footer = if stream[5] & 0x10 != 0 { 10 } else { 0 };

    (10 + size + footer).min(stream.len())
}

/// Fill the leading Info frame of a freshly encoded CBR stream holding
/// `samples` samples per channel.
///
/// LAME reserves a blank first frame for this. When there is none, a blank
/// frame cloned from the first audio frame header is inserted. Streams that
/// cannot carry the tag are returned unchanged.
pub fn write_info_tag(mut stream: Vec<u8>, samples: usize) -> Vec<u8> {
    let start = id3v2_len(&stream);

    let Some(first) = FrameHeader::parse(&stream[start..]) else {
        log::debug!("no MP3 frame at offset {start}, skip Info tag");
        return stream;
    };

    let first_len = first.frame_len();
    let reserved = stream.len() >= start + first_len
        && stream[start + 4..start + first_len].iter().all(|&b| b == 0);

    let header = if reserved {
        first
    } else {
        FrameHeader {
            padding: false,
            ..first
        }
    };

    let tag_offset = start + 4 + header.side_info_len();
    if header.protected || start + header.frame_len() < tag_offset + XING_LEN + LAME_EXT_LEN {
        log::debug!(
            "MP3 frame of {} bytes cannot carry the Info tag",
            header.frame_len()
        );
        return stream;
    }

    if !reserved {
        let mut blank = vec![0u8; header.frame_len()];
        blank[..4].copy_from_slice(&stream[start..start + 4]);
        blank[2] &= !0x02; // clear padding bit
        stream.splice(start..start, blank);
    }

    let mut frames = 0u32;
    let mut pos = start + header.frame_len();
    while let Some(h) = stream.get(pos..).and_then(FrameHeader::parse) {
        if pos + h.frame_len() > stream.len() {
            break;
        }
        frames += 1;
        pos += h.frame_len();
    }

    let encoded = frames as u64 * header.samples_per_frame() as u64;
    let padding = encoded
        .saturating_sub(ENCODER_DELAY as u64 + samples as u64)
        .min(0xFFF) as u32;
    let stream_len = (pos - start) as u32;

    let mut tag = Vec::with_capacity(XING_LEN + LAME_EXT_LEN);
    tag.extend_from_slice(b"Info");
    tag.extend_from_slice(&0x0Fu32.to_be_bytes()); // frames, bytes, TOC and quality present
    tag.extend_from_slice(&frames.to_be_bytes());
    tag.extend_from_slice(&stream_len.to_be_bytes());
    tag.extend((0..100u32).map(|i| (i * 256 / 100) as u8)); // linear TOC for CBR
    tag.extend_from_slice(&0u32.to_be_bytes()); // quality

    tag.extend_from_slice(ENCODER_NAME);
    tag.push(0x01); // revision 0, CBR
    tag.push(0); // lowpass
    tag.extend_from_slice(&[0; 4]); // peak
    tag.extend_from_slice(&[0; 4]); // radio and audiophile replay gain
    tag.push(0); // encoding flags and ATH type
    tag.push(header.bitrate.min(255) as u8);
    tag.extend_from_slice(&((ENCODER_DELAY << 12) | padding).to_be_bytes()[1..]);
    tag.push(0); // misc
    tag.push(0); // mp3 gain
    tag.extend_from_slice(&[0; 2]); // preset and surround
    tag.extend_from_slice(&stream_len.to_be_bytes());
    tag.extend_from_slice(&[0; 2]); // music CRC, not checked by decoders

    let crc_offset = tag_offset + tag.len();
    stream[tag_offset..crc_offset].copy_from_slice(&tag);
    let crc = crc16(&stream[start..crc_offset]);
    stream[crc_offset..crc_offset + 2].copy_from_slice(&crc.to_be_bytes());

    log::debug!(
        "Info tag: {frames} frames, delay={ENCODER_DELAY}, padding={padding}, {stream_len} bytes"
    );

    stream
}
