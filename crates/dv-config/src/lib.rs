//! Configuration management for docview.
//!
//! Parses `docview.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! The file has two parts: `[viewer]` settings and the `[projects.*]`
//! registry of documentation sources.
//!
//! ```toml
//! [viewer]
//! default_project = "Intern"
//!
//! [projects.Intern]
//! repository_url = "https://github.com/theintern/intern"
//! latest_version = "4"
//!
//! [projects.Intern.versions.4]
//! branch = "4.x"
//! api_data_path = "docs/api.json"
//! pages = ["README.md", "docs/getting_started.md"]
//! ```
//!
//! CLI settings can be applied during load via [`CliSettings`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docview.toml";

/// Deepest heading level a menu can show.
const MAX_HEADING_LEVEL: u8 = 6;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub default_project: Option<String>,
    pub menu_depth: Option<u8>,
    pub api_menu_depth: Option<u8>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub viewer: ViewerConfig,
    /// Registry of documentation sources keyed by project name.
    pub projects: BTreeMap<String, ProjectConfig>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Viewer behaviour settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Project shown for an empty fragment. Defaults to the first project.
    pub default_project: Option<String>,
    /// Deepest heading level listed in the docs menu.
    pub menu_depth: u8,
    /// Deepest heading level listed in the API menu.
    pub api_menu_depth: u8,
    /// Quiet period before a scroll updates the fragment.
    pub scroll_debounce_ms: u64,
    /// Quiet period before search input runs a search.
    pub search_debounce_ms: u64,
    /// Shorter search terms clear the results instead of searching.
    pub search_min_length: usize,
    /// Column at which long API signatures are wrapped.
    pub signature_width: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            default_project: None,
            menu_depth: 3,
            api_menu_depth: 2,
            scroll_debounce_ms: 50,
            search_debounce_ms: 300,
            search_min_length: 2,
            signature_width: 60,
        }
    }
}

/// A documented project and its versions.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Repository home, e.g. `https://github.com/theintern/intern`.
    pub repository_url: String,
    /// Version key treated as latest. Falls back to the highest key.
    #[serde(default)]
    pub latest_version: Option<String>,
    /// Version key treated as upcoming. Falls back to the key after latest.
    #[serde(default)]
    pub next_version: Option<String>,
    #[serde(default)]
    pub versions: BTreeMap<String, VersionConfig>,
}

/// Content location of one project version.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VersionConfig {
    /// Explicit base URL for content, overriding the repository URL.
    pub content_base_url: Option<String>,
    /// Branch or tag to read content from.
    pub branch: Option<String>,
    /// Path of the API reflection JSON, relative to the content base.
    pub api_data_path: Option<String>,
    /// Markdown pages in menu order, relative to the content base.
    pub pages: Vec<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

fn require_heading_level(level: u8, field: &str) -> Result<(), ConfigError> {
    if !(1..=MAX_HEADING_LEVEL).contains(&level) {
        return Err(ConfigError::Validation(format!(
            "{field} must be between 1 and {MAX_HEADING_LEVEL}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docview.toml` in current directory and parents.
    /// Without any file the configuration is empty.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the result does not validate.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(project) = &settings.default_project {
            self.viewer.default_project = Some(project.clone());
        }
        if let Some(depth) = settings.menu_depth {
            self.viewer.menu_depth = depth;
        }
        if let Some(depth) = settings.api_menu_depth {
            self.viewer.api_menu_depth = depth;
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Project shown when the fragment names none.
    #[must_use]
    pub fn default_project(&self) -> Option<&str> {
        self.viewer
            .default_project
            .as_deref()
            .or_else(|| self.projects.keys().next().map(String::as_str))
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_viewer()?;
        for (name, project) in &self.projects {
            Self::validate_project(name, project)?;
        }
        Ok(())
    }

    fn validate_viewer(&self) -> Result<(), ConfigError> {
        require_heading_level(self.viewer.menu_depth, "viewer.menu_depth")?;
        require_heading_level(self.viewer.api_menu_depth, "viewer.api_menu_depth")?;
        if self.viewer.signature_width == 0 {
            return Err(ConfigError::Validation(
                "viewer.signature_width must be greater than 0".into(),
            ));
        }
        if let Some(project) = &self.viewer.default_project
            && !self.projects.contains_key(project)
        {
            return Err(ConfigError::Validation(format!(
                "viewer.default_project names unknown project '{project}'"
            )));
        }
        Ok(())
    }

    fn validate_project(name: &str, project: &ProjectConfig) -> Result<(), ConfigError> {
        require_http_url(
            &project.repository_url,
            &format!("projects.{name}.repository_url"),
        )?;
        if project.versions.is_empty() {
            return Err(ConfigError::Validation(format!(
                "projects.{name} must define at least one version"
            )));
        }
        for (field, key) in [
            ("latest_version", &project.latest_version),
            ("next_version", &project.next_version),
        ] {
            if let Some(key) = key
                && !project.versions.contains_key(key)
            {
                return Err(ConfigError::Validation(format!(
                    "projects.{name}.{field} names unknown version '{key}'"
                )));
            }
        }
        for (key, version) in &project.versions {
            if version.pages.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "projects.{name}.versions.{key}.pages cannot be empty"
                )));
            }
            if let Some(url) = &version.content_base_url {
                require_http_url(url, &format!("projects.{name}.versions.{key}.content_base_url"))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const INTERN: &str = r#"
[viewer]
default_project = "Intern"
menu_depth = 4

[projects.Intern]
repository_url = "https://github.com/theintern/intern"
latest_version = "4"

[projects.Intern.versions.3]
branch = "3.4"
pages = ["README.md"]

[projects.Intern.versions.4]
branch = "4.x"
api_data_path = "docs/api.json"
pages = ["README.md", "docs/getting_started.md"]

[projects.Leadfoot]
repository_url = "https://github.com/theintern/leadfoot"

[projects.Leadfoot.versions."2"]
content_base_url = "https://docs.example.com/leadfoot/2/"
pages = ["README.md"]
"#;

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(toml: &str, expected_substrings: &[&str]) {
        let err = Config::from_toml(toml).unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.viewer.menu_depth, 3);
        assert_eq!(config.viewer.api_menu_depth, 2);
        assert_eq!(config.viewer.scroll_debounce_ms, 50);
        assert_eq!(config.viewer.search_min_length, 2);
        assert_eq!(config.viewer.signature_width, 60);
        assert!(config.projects.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.default_project(), None);
    }

    #[test]
    fn test_parse_registry() {
        let config = Config::from_toml(INTERN).unwrap();
        assert_eq!(config.viewer.menu_depth, 4);
        assert_eq!(config.default_project(), Some("Intern"));

        let intern = &config.projects["Intern"];
        assert_eq!(intern.latest_version.as_deref(), Some("4"));
        assert_eq!(intern.next_version, None);
        assert_eq!(
            intern.versions["4"],
            VersionConfig {
                content_base_url: None,
                branch: Some("4.x".to_owned()),
                api_data_path: Some("docs/api.json".to_owned()),
                pages: vec!["README.md".to_owned(), "docs/getting_started.md".to_owned()],
            }
        );
        assert_eq!(
            config.projects["Leadfoot"].versions["2"].content_base_url.as_deref(),
            Some("https://docs.example.com/leadfoot/2/")
        );
    }

    #[test]
    fn test_default_project_falls_back_to_first() {
        let toml = INTERN.replace("default_project = \"Intern\"\n", "");
        let config = Config::from_toml(&toml).unwrap();
        assert_eq!(config.default_project(), Some("Intern"));
    }

    #[test]
    fn test_validate_unknown_default_project() {
        let toml = INTERN.replace("default_project = \"Intern\"", "default_project = \"Dojo\"");
        assert_validation_error(&toml, &["default_project", "Dojo"]);
    }

    #[test]
    fn test_validate_unknown_latest_version() {
        let toml = INTERN.replace("latest_version = \"4\"", "latest_version = \"9\"");
        assert_validation_error(&toml, &["projects.Intern.latest_version", "'9'"]);
    }

    #[test]
    fn test_validate_empty_pages() {
        let toml = r#"
[projects.Empty]
repository_url = "https://github.com/example/empty"

[projects.Empty.versions.1]
pages = []
"#;
        assert_validation_error(toml, &["projects.Empty.versions.1.pages"]);
    }

    #[test]
    fn test_validate_project_without_versions() {
        let toml = r#"
[projects.Bare]
repository_url = "https://github.com/example/bare"
"#;
        assert_validation_error(toml, &["projects.Bare", "at least one version"]);
    }

    #[test]
    fn test_validate_repository_url_scheme() {
        let toml = INTERN.replace(
            "https://github.com/theintern/intern",
            "git@github.com:theintern/intern",
        );
        assert_validation_error(&toml, &["repository_url", "http://"]);
    }

    #[test]
    fn test_validate_menu_depth_range() {
        assert_validation_error("[viewer]\nmenu_depth = 0", &["viewer.menu_depth"]);
        assert_validation_error("[viewer]\napi_menu_depth = 7", &["viewer.api_menu_depth"]);
    }

    #[test]
    fn test_parse_error() {
        let err = Config::from_toml("[viewer\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, INTERN).unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.projects.len(), 2);
    }

    #[test]
    fn test_load_missing_path() {
        let err = Config::load(Some(Path::new("/nonexistent/docview.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_applies_cli_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, INTERN).unwrap();

        let settings = CliSettings {
            default_project: Some("Leadfoot".to_owned()),
            menu_depth: Some(2),
            api_menu_depth: None,
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(config.default_project(), Some("Leadfoot"));
        assert_eq!(config.viewer.menu_depth, 2);
        assert_eq!(config.viewer.api_menu_depth, 2);
    }

    #[test]
    fn test_cli_settings_are_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, INTERN).unwrap();

        let settings = CliSettings {
            default_project: Some("Dojo".to_owned()),
            ..CliSettings::default()
        };
        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_discover_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_from(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILENAME));
    }
}
