use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Runtime configuration for termrank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned for candidate documents
    pub target_dir: PathBuf,
    /// Directory receiving the extracted text and word list
    pub save_dir: PathBuf,

    /// Tagger process (mecab-ko with a Korean dictionary)
    pub mecab_command: String,
    pub mecab_args: Vec<String>,

    /// PDF text extractor, invoked as `<command> <file> -`
    pub pdftotext_command: String,

    /// Binary-to-markup converter for .hwp files; prints HWPML on stdout.
    /// The input path is appended after `converter_args`.
    pub converter_command: Option<String>,
    pub converter_args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            target_dir: PathBuf::from("targets"),
            save_dir: PathBuf::from("results"),
            mecab_command: "mecab".to_string(),
            mecab_args: Vec::new(),
            pdftotext_command: "pdftotext".to_string(),
            converter_command: None,
            converter_args: Vec::new(),
        }
    }
}

impl Config {
    /// Load config from the config directory
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::get_config_path() {
            if config_path.exists() {
                let content = fs::read_to_string(&config_path)?;
                return Self::from_toml(&content);
            }
        }

        // Return defaults if no config found
        Ok(Config::default())
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save config to the config directory
    pub fn save(&self) -> Result<Option<PathBuf>> {
        let Some(config_path) = Self::get_config_path() else {
            return Ok(None);
        };

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;
        Ok(Some(config_path))
    }

    /// Get the path to the config file
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("termrank").join("config.toml"))
    }

    /// Initialize default config file
    pub fn init_default() -> Result<Option<PathBuf>> {
        Config::default().save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_toml() {
        let config = Config::default();
        let content = toml::to_string_pretty(&config).unwrap();
        assert_eq!(Config::from_toml(&content).unwrap(), config);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::from_toml(
            r#"
save_dir = "out"
mecab_args = ["-d", "/usr/local/lib/mecab/dic/mecab-ko-dic"]
"#,
        )
        .unwrap();
        assert_eq!(config.save_dir, PathBuf::from("out"));
        assert_eq!(config.target_dir, PathBuf::from("targets"));
        assert_eq!(config.mecab_args.len(), 2);
        assert!(config.converter_command.is_none());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(Config::from_toml("save_dir = [").is_err());
    }
}
