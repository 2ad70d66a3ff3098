//! Configuration for the content library and server.
//!
//! Settings live in `sikumnik.json` next to the content. Every key is
//! optional; a missing file yields the defaults.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ContentError, Result};
use crate::library::is_valid_identifier;
use crate::render::WidgetRegistry;

/// The default config file name.
const CONFIG_FILE_NAME: &str = "sikumnik.json";

/// Default content root.
fn default_content_dir() -> String {
    "content".to_string()
}

/// Default per-document size limit (512 KiB).
const fn default_max_document_bytes() -> u64 {
    512 * 1024
}

/// Default bind host.
fn default_host() -> String {
    "127.0.0.1".to_string()
}

/// Default bind port.
const fn default_port() -> u16 {
    3000
}

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Root of the `<course>/<chapter>.json` tree.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Documents larger than this are refused.
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: u64,

    /// Warn about titles and introductions without Hebrew text.
    #[serde(default)]
    pub strict_hebrew: bool,

    /// Address the server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Interactive widgets, keyed by the id used in `interactiveElement.id`.
    #[serde(default)]
    pub widgets: BTreeMap<String, WidgetConfig>,
}

/// A widget the host application knows how to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Name of the front-end component.
    pub component: String,

    /// Heading shown when the chapter has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            max_document_bytes: default_max_document_bytes(),
            strict_hebrew: false,
            host: default_host(),
            port: default_port(),
            widgets: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Loads `sikumnik.json` from the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is unreadable or invalid.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            ContentError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads `sikumnik.json` from the given directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is unreadable or invalid.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a file, falling back to defaults if it is absent.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::ConfigParseError` for unreadable files or bad
    /// JSON, and `ContentError::ConfigValidationError` for bad values.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(ContentError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ContentError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges and widget ids.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::ConfigValidationError` on the first bad value.
    pub fn validate(&self) -> Result<()> {
        if self.content_dir.trim().is_empty() {
            return Err(ContentError::config_validation(
                "contentDir must not be empty",
                "Point contentDir at the directory holding your course folders",
            ));
        }

        if self.max_document_bytes == 0 {
            return Err(ContentError::config_validation(
                "maxDocumentBytes must be greater than 0",
                "Remove maxDocumentBytes to use the 512KB default",
            ));
        }

        if self.host.trim().is_empty() {
            return Err(ContentError::config_validation(
                "host must not be empty",
                "Use 127.0.0.1 for local access or 0.0.0.0 to listen on all interfaces",
            ));
        }

        if self.port == 0 {
            return Err(ContentError::config_validation(
                "port must be greater than 0",
                "Set port to a free TCP port such as 3000",
            ));
        }

        for (id, widget) in &self.widgets {
            if !is_valid_identifier(id) {
                return Err(ContentError::config_validation(
                    format!("widget id '{id}' is not a valid identifier"),
                    "Widget ids use lowercase letters, digits and dashes only",
                ));
            }
            if widget.component.trim().is_empty() {
                return Err(ContentError::config_validation(
                    format!("widgets.{id}.component must not be empty"),
                    "Name the front-end component that draws this widget",
                ));
            }
        }

        Ok(())
    }

    /// Returns `host:port`.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Builds the widget registry used when rendering chapters.
    #[must_use]
    pub fn widget_registry(&self) -> WidgetRegistry<WidgetConfig> {
        self.widgets
            .iter()
            .map(|(id, widget)| (id.clone(), widget.clone()))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = Config::default();
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.max_document_bytes, 512 * 1024);
        assert!(!config.strict_hebrew);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert!(config.widgets.is_empty());
    }

    #[test]
    fn test_config_deserialization_with_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_deserialization_with_overrides() {
        let config: Config = serde_json::from_str(
            r#"{
                "contentDir": "courses",
                "strictHebrew": true,
                "port": 8080,
                "widgets": {
                    "goods-sorter": { "component": "ClassificationGame", "title": "מיון" }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.content_dir, "courses");
        assert!(config.strict_hebrew);
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");

        let registry = config.widget_registry();
        assert_eq!(
            registry.get("goods-sorter").map(|w| w.component.as_str()),
            Some("ClassificationGame")
        );
    }

    #[test]
    fn test_load_from_file_nonexistent_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from_file(&dir.path().join("missing.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_dir_finds_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sikumnik.json"), r#"{ "port": 4000 }"#).unwrap();

        let config = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.port, 4000);
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sikumnik.json");
        std::fs::write(&path, "{ port: }").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ContentError::ConfigParseError { .. }));
        assert!(err.to_string().contains("Suggestion"));
    }

    #[test]
    fn test_load_from_file_validates_after_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sikumnik.json");
        std::fs::write(&path, r#"{ "maxDocumentBytes": 0 }"#).unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ContentError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_validation_empty_content_dir() {
        let config = Config {
            content_dir: "  ".to_string(),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("contentDir"));
    }

    #[test]
    fn test_config_validation_zero_port() {
        let config = Config {
            port: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_widget_id() {
        let mut config = Config::default();
        config.widgets.insert(
            "Goods Sorter".to_string(),
            WidgetConfig {
                component: "X".to_string(),
                title: None,
            },
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Goods Sorter"));
    }

    #[test]
    fn test_config_validation_empty_component() {
        let mut config = Config::default();
        config.widgets.insert(
            "sorter".to_string(),
            WidgetConfig {
                component: String::new(),
                title: None,
            },
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let config: Config = serde_json::from_str(r#"{ "theme": "dark" }"#).unwrap();
        assert_eq!(config.port, 3000);
    }
}
