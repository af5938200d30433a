//! Wiki configuration from wiki.toml

use crate::markup::BlankLines;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file at the wiki root
pub const CONFIG_FILE: &str = "wiki.toml";

/// Where page revisions come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryBackend {
    /// No version management
    #[default]
    #[serde(rename = "none")]
    Off,
    /// `rlog` and `rcsdiff` on the page files
    Rcs,
}

/// Wiki configuration from wiki.toml
///
/// Every field has a default, so an empty or missing file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    /// Display name shown by `[WikiName]` and the feed
    pub wiki_name: String,

    /// Feed channel description
    pub description: String,

    /// Host name used in absolute links
    pub host: String,

    pub port: u16,

    /// Directory of the `.wik` and `.met` files, relative to the wiki root
    pub pages_dir: PathBuf,

    /// Directory of the `[image]` PNG files, relative to the wiki root
    pub image_dir: PathBuf,

    /// Users allowed to reset passwords
    pub admins: Vec<String>,

    pub blank_lines: BlankLines,

    /// Pages changed within this many hours appear in the feed
    pub feed_hours: u32,

    pub history: HistoryBackend,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            wiki_name: "CuteWiki".to_string(),
            description: "Latest changes".to_string(),
            host: "localhost".to_string(),
            port: 8080,
            pages_dir: PathBuf::from("pages"),
            image_dir: PathBuf::from("images"),
            admins: vec!["WikiAdmin".to_string()],
            blank_lines: BlankLines::default(),
            feed_hours: 12,
            history: HistoryBackend::default(),
        }
    }
}

impl WikiConfig {
    /// Load configuration from a wiki.toml file
    ///
    /// # Parameters
    /// * `path` - Path to the wiki.toml configuration file
    ///
    /// # Returns
    /// * `Ok(WikiConfig)` - Parsed configuration
    /// * `Err(WikiConfigError)` - Error reading or parsing the configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, WikiConfigError> {
        let content = fs::read_to_string(&path).map_err(WikiConfigError::IoError)?;
        let config: WikiConfig = toml::from_str(&content).map_err(WikiConfigError::ParseError)?;
        Ok(config)
    }

    /// Load `wiki.toml` from a wiki root, or use defaults when there is none
    pub fn load_or_default(root: &Path) -> Result<Self, WikiConfigError> {
        let path = root.join(CONFIG_FILE);
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("No {} in {}, using defaults", CONFIG_FILE, root.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to a wiki.toml file
    ///
    /// # Parameters
    /// * `path` - Path to the wiki.toml configuration file
    ///
    /// # Returns
    /// * `Ok(())` - Configuration saved successfully
    /// * `Err(WikiConfigError)` - Error serializing or writing the configuration file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), WikiConfigError> {
        let content = toml::to_string_pretty(self).map_err(WikiConfigError::SerializeError)?;
        fs::write(&path, content).map_err(WikiConfigError::IoError)?;
        Ok(())
    }

    /// The pages directory below a wiki root
    pub fn pages_path(&self, root: &Path) -> PathBuf {
        root.join(&self.pages_dir)
    }

    /// The image directory below a wiki root
    pub fn image_path(&self, root: &Path) -> PathBuf {
        root.join(&self.image_dir)
    }
}

/// Errors that can occur when loading or saving wiki configuration
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum WikiConfigError {
    /// IO error when reading or writing file
    IoError(std::io::Error),

    /// Error parsing TOML
    ParseError(toml::de::Error),

    /// Error serializing to TOML
    SerializeError(toml::ser::Error),
}

impl std::fmt::Display for WikiConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WikiConfigError::IoError(e) => write!(f, "IO error: {}", e),
            WikiConfigError::ParseError(e) => write!(f, "TOML parse error: {}", e),
            WikiConfigError::SerializeError(e) => write!(f, "TOML serialize error: {}", e),
        }
    }
}

impl std::error::Error for WikiConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: WikiConfig = toml::from_str("").unwrap();

        assert_eq!(config, WikiConfig::default());
        assert_eq!(config.port, 8080);
        assert_eq!(config.admins, vec!["WikiAdmin"]);
        assert_eq!(config.blank_lines, BlankLines::Preserve);
        assert_eq!(config.history, HistoryBackend::Off);
    }

    #[test]
    fn test_parse_example_toml() {
        let toml_content = r#"
wiki_name = "Team Wiki"
host = "wiki.example.org"
port = 80
admins = ["WikiAdmin", "JohnDoe"]
blank_lines = "reset"
feed_hours = 24
history = "rcs"
"#;

        let config: WikiConfig = toml::from_str(toml_content).unwrap();

        assert_eq!(config.wiki_name, "Team Wiki");
        assert_eq!(config.port, 80);
        assert_eq!(config.admins.len(), 2);
        assert_eq!(config.blank_lines, BlankLines::Reset);
        assert_eq!(config.history, HistoryBackend::Rcs);
        assert_eq!(config.pages_dir, PathBuf::from("pages"));
    }

    #[test]
    fn test_history_none_keyword() {
        let config: WikiConfig = toml::from_str("history = \"none\"").unwrap();
        assert_eq!(config.history, HistoryBackend::Off);

        assert!(toml::from_str::<WikiConfig>("history = \"git\"").is_err());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = WikiConfig {
            wiki_name: "Roundtrip".to_string(),
            feed_hours: 6,
            ..Default::default()
        };

        // Serialize to TOML
        let toml_str = toml::to_string_pretty(&config).unwrap();

        // Deserialize back
        let parsed: WikiConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_paths_below_root() {
        let config = WikiConfig::default();
        let root = Path::new("/srv/wiki");

        assert_eq!(config.pages_path(root), PathBuf::from("/srv/wiki/pages"));
        assert_eq!(config.image_path(root), PathBuf::from("/srv/wiki/images"));
    }
}
