use crate::loader::AudioConfig;

pub fn db_to_linear(db: f64) -> f64 {
    10.0f64.powf(db / 20.0)
}

pub fn linear_to_db(linear: f64) -> f64 {
    if linear <= 0.0 {
        return f64::NEG_INFINITY;
    }

    20.0 * linear.log10()
}

/// Scale every sample by `10^(gain_db / 20)`. Samples are not clamped here,
/// out-of-range values are left for the encoder's PCM conversion.
pub fn apply_gain(mut audio: AudioConfig, gain_db: f64) -> AudioConfig {
    let factor = db_to_linear(gain_db) as f32;

    if factor != 1.0 {
        audio.samples.iter_mut().for_each(|s| *s *= factor);
    }

    audio
}

pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|&sample| sample * sample).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

pub fn peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0f32, |a, b| a.max(b))
}
