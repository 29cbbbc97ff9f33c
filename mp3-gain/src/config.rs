use derivative::Derivative;
use derive_setters::Setters;
use std::path::PathBuf;

#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct BatchConfig {
    /// Output directory, relative to the working directory
    #[derivative(Default(value = "PathBuf::from(\"output\")"))]
    #[setters(into)]
    pub output_dir: PathBuf,

    /// File extension to select, matched case-insensitively
    #[derivative(Default(value = "\"mp3\".to_string()"))]
    #[setters(into)]
    pub extension: String,
}

impl BatchConfig {
    /// Lower-cased `.ext` suffix used when matching file names.
    pub fn suffix(&self) -> String {
        format!(".{}", self.extension.trim_start_matches('.').to_lowercase())
    }

    pub fn matches(&self, file_name: &str) -> bool {
        file_name.to_lowercase().ends_with(&self.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BatchConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.suffix(), ".mp3");
    }

    #[test]
    fn test_matches_case_insensitive() {
        let config = BatchConfig::default();
        assert!(config.matches("a.mp3"));
        assert!(config.matches("b.MP3"));
        assert!(config.matches("Song.Mp3"));
        assert!(!config.matches("c.txt"));
        assert!(!config.matches("mp3"));
        assert!(!config.matches("a.mp3.bak"));
    }

    #[test]
    fn test_custom_extension() {
        let config = BatchConfig::default().with_extension(".WAV");
        assert_eq!(config.suffix(), ".wav");
        assert!(config.matches("take1.wav"));
    }
}
