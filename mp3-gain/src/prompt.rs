use crate::gain::{Gain, GainParseError};
use std::io::{BufRead, Write};
use thiserror::Error;

pub const GAIN_PROMPT: &str = "Enter the volume gain in dB (e.g. 3 or -2): ";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input, please enter a number ({0})")]
    InvalidGain(#[from] GainParseError),
}

/// Print the prompt and read a single line as a gain.
pub fn read_gain<R, W>(input: &mut R, output: &mut W) -> Result<Gain, PromptError>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{GAIN_PROMPT}")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let gain = line.parse::<Gain>()?;
    log::debug!("gain: {gain}");

    Ok(gain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_gain() {
        let mut output = Vec::new();
        let gain = read_gain(&mut Cursor::new("-2.5\n"), &mut output).unwrap();

        assert_eq!(gain.db(), -2.5);
        assert_eq!(String::from_utf8(output).unwrap(), GAIN_PROMPT);
    }

    #[test]
    fn test_read_gain_only_first_line() {
        let gain = read_gain(&mut Cursor::new("6\nabc\n"), &mut Vec::new()).unwrap();
        assert_eq!(gain.db(), 6.0);
    }

    #[test]
    fn test_read_gain_invalid() {
        let err = read_gain(&mut Cursor::new("abc\n"), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, PromptError::InvalidGain(_)));
        assert!(err.to_string().starts_with("Invalid input, please enter a number"));
    }

    #[test]
    fn test_read_gain_eof() {
        let err = read_gain(&mut Cursor::new(""), &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            PromptError::InvalidGain(GainParseError::Empty)
        ));
    }
}
