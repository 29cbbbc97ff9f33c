use std::{fmt, num::ParseFloatError, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GainParseError {
    #[error("empty input")]
    Empty,

    #[error("`{0}` is not a number: {1}")]
    NotANumber(String, ParseFloatError),

    #[error("`{0}` is not a finite number")]
    NotFinite(String),
}

/// Decibel offset applied uniformly to every sample.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Gain(f64);

impl Gain {
    pub fn from_db(db: f64) -> Self {
        Self(db)
    }

    pub fn db(&self) -> f64 {
        self.0
    }
}

impl FromStr for Gain {
    type Err = GainParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(GainParseError::Empty);
        }

        let db = text
            .parse::<f64>()
            .map_err(|e| GainParseError::NotANumber(text.to_string(), e))?;

        if !db.is_finite() {
            return Err(GainParseError::NotFinite(text.to_string()));
        }

        Ok(Self(db))
    }
}

impl fmt::Display for Gain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+} dB", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!("3".parse::<Gain>().unwrap().db(), 3.0);
        assert_eq!("-2.5".parse::<Gain>().unwrap().db(), -2.5);
        assert_eq!("0".parse::<Gain>().unwrap().db(), 0.0);
        assert_eq!(" 4\n".parse::<Gain>().unwrap().db(), 4.0);
        assert_eq!("+1e1".parse::<Gain>().unwrap().db(), 10.0);
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!("".parse::<Gain>(), Err(GainParseError::Empty));
        assert_eq!("  \r\n".parse::<Gain>(), Err(GainParseError::Empty));
        assert!(matches!(
            "abc".parse::<Gain>(),
            Err(GainParseError::NotANumber(..))
        ));
        assert!(matches!(
            "3dB".parse::<Gain>(),
            Err(GainParseError::NotANumber(..))
        ));
        assert!(matches!(
            "inf".parse::<Gain>(),
            Err(GainParseError::NotFinite(_))
        ));
        assert!(matches!(
            "NaN".parse::<Gain>(),
            Err(GainParseError::NotFinite(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Gain::from_db(-3.0).to_string(), "-3 dB");
        assert_eq!(Gain::from_db(2.5).to_string(), "+2.5 dB");
    }
}
