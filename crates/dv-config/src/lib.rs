//! Configuration management for dv.
//!
//! Parses `dv.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `site.root`
//! - `site.not_found_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override site root (directory or http(s) base URL).
    pub root: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "dv.toml";

/// Placeholder the versioned catalog template must contain.
const VERSION_PLACEHOLDER: &str = "{version}";

/// Longest accepted fade transition.
const MAX_FADE_MS: u64 = 5000;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Site layout configuration (raw strings from TOML).
    site: SiteConfigRaw,
    /// Content transition configuration.
    pub transition: TransitionConfig,
    /// Mobile menu configuration.
    pub menu: MenuConfig,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7878,
        }
    }
}

/// Raw site configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    root: Option<String>,
    versions_manifest: Option<String>,
    catalog: Option<String>,
    docs_root: Option<String>,
    not_found: Option<NotFoundMode>,
    not_found_url: Option<String>,
}

/// Where the site is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteRoot {
    /// Local directory.
    Dir(PathBuf),
    /// Remote base URL.
    Url(String),
}

impl SiteRoot {
    /// Interpret `value`, resolving relative directories against `base`.
    #[must_use]
    pub fn parse(value: &str, base: &Path) -> Self {
        if value.contains("://") {
            Self::Url(value.to_owned())
        } else {
            Self::Dir(base.join(value))
        }
    }
}

/// Unknown-slug behaviour, as named in the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotFoundMode {
    /// Rewrite the hash to the first page.
    #[default]
    Rewrite,
    /// Display the first page in place.
    Fallback,
    /// Redirect to `site.not_found_url`.
    Redirect,
}

/// Resolved site configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Site root.
    pub root: SiteRoot,
    /// Version manifest path; `None` for an unversioned site.
    pub versions_manifest: Option<String>,
    /// Catalog path (template containing `{version}` when versioned).
    pub catalog: String,
    /// Documents directory.
    pub docs_root: String,
    /// Unknown-slug behaviour.
    pub not_found: NotFoundMode,
    /// Redirect target for [`NotFoundMode::Redirect`].
    pub not_found_url: Option<String>,
}

impl SiteConfig {
    fn default_with_base(base: &Path) -> Self {
        Self {
            root: SiteRoot::Dir(base.join("site")),
            versions_manifest: Some("versions.json".to_owned()),
            catalog: "docs/{version}/pages.json".to_owned(),
            docs_root: "docs".to_owned(),
            not_found: NotFoundMode::default(),
            not_found_url: None,
        }
    }

    /// Whether the site has a version manifest.
    #[must_use]
    pub fn is_versioned(&self) -> bool {
        self.versions_manifest.is_some()
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Content transition configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Fade-out time in milliseconds before content is swapped.
    pub fade_ms: u64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self { fade_ms: 250 }
    }
}

/// Mobile menu configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Viewport width (px) at or below which the sidebar is a drawer.
    pub breakpoint: u32,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self { breakpoint: 768 }
    }
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
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.root`").
        field: String,
        /// Error message (e.g., "${`DV_SITE`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
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

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `dv.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the result is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(root) = &settings.root {
            let cwd = std::env::current_dir().unwrap_or_default();
            self.site_resolved.root = SiteRoot::parse(root, &cwd);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
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

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            site: SiteConfigRaw::default(),
            transition: TransitionConfig::default(),
            menu: MenuConfig::default(),
            site_resolved: SiteConfig::default_with_base(base),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_site(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI settings
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_site()?;
        self.validate_transition()?;
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 lets the OS pick; never what a config file means
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate site configuration.
    fn validate_site(&self) -> Result<(), ConfigError> {
        let site = &self.site_resolved;

        if let SiteRoot::Url(url) = &site.root {
            require_http_url(url, "site.root")?;
        }
        require_non_empty(&site.catalog, "site.catalog")?;
        if site.is_versioned() && !site.catalog.contains(VERSION_PLACEHOLDER) {
            return Err(ConfigError::Validation(format!(
                "site.catalog must contain {VERSION_PLACEHOLDER} when versions_manifest is set"
            )));
        }
        if site.not_found == NotFoundMode::Redirect {
            let url = site.not_found_url.as_deref().unwrap_or_default();
            require_non_empty(url, "site.not_found_url")?;
        }

        Ok(())
    }

    /// Validate transition configuration.
    fn validate_transition(&self) -> Result<(), ConfigError> {
        if self.transition.fade_ms > MAX_FADE_MS {
            return Err(ConfigError::Validation(format!(
                "transition.fade_ms cannot exceed {MAX_FADE_MS}"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref root) = self.site.root {
            self.site.root = Some(expand::expand_env(root, "site.root")?);
        }
        if let Some(ref url) = self.site.not_found_url {
            self.site.not_found_url = Some(expand::expand_env(url, "site.not_found_url")?);
        }

        Ok(())
    }

    /// Resolve the raw site section against the config directory.
    ///
    /// An empty `versions_manifest` selects the unversioned layout, whose
    /// default catalog has no version directory.
    fn resolve_site(&mut self, config_dir: &Path) {
        let raw = &self.site;
        let versions_manifest = match raw.versions_manifest.as_deref() {
            None => Some("versions.json".to_owned()),
            Some("") => None,
            Some(path) => Some(path.to_owned()),
        };
        let default_catalog = if versions_manifest.is_some() {
            "docs/{version}/pages.json"
        } else {
            "docs/pages.json"
        };

        self.site_resolved = SiteConfig {
            root: SiteRoot::parse(raw.root.as_deref().unwrap_or("site"), config_dir),
            versions_manifest,
            catalog: raw
                .catalog
                .clone()
                .unwrap_or_else(|| default_catalog.to_owned()),
            docs_root: raw.docs_root.clone().unwrap_or_else(|| "docs".to_owned()),
            not_found: raw.not_found.unwrap_or_default(),
            not_found_url: raw.not_found_url.clone().filter(|url| !url.is_empty()),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7878);
        assert_eq!(
            config.site_resolved.root,
            SiteRoot::Dir(PathBuf::from("/test/site"))
        );
        assert!(config.site_resolved.is_versioned());
        assert_eq!(config.site_resolved.catalog, "docs/{version}/pages.json");
        assert_eq!(config.site_resolved.not_found, NotFoundMode::Rewrite);
        assert_eq!(config.transition.fade_ms, 250);
        assert_eq!(config.menu.breakpoint, 768);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7878);
    }

    #[test]
    fn test_parse_server_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_parse_transition_and_menu() {
        let toml = r"
[transition]
fade_ms = 100

[menu]
breakpoint = 640
";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.transition.fade_ms, 100);
        assert_eq!(config.menu.breakpoint, 640);
    }

    #[test]
    fn test_parse_unknown_not_found_mode_fails() {
        let toml = r#"
[site]
not_found = "explode"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_resolve_site_versioned() {
        let toml = r#"
[site]
root = "public"
catalog = "content/{version}/index.json"
docs_root = "content"
not_found = "redirect"
not_found_url = "404.html"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_site(Path::new("/project"));

        assert_eq!(
            config.site_resolved,
            SiteConfig {
                root: SiteRoot::Dir(PathBuf::from("/project/public")),
                versions_manifest: Some("versions.json".to_owned()),
                catalog: "content/{version}/index.json".to_owned(),
                docs_root: "content".to_owned(),
                not_found: NotFoundMode::Redirect,
                not_found_url: Some("404.html".to_owned()),
            }
        );
    }

    #[test]
    fn test_resolve_site_unversioned() {
        let toml = r#"
[site]
versions_manifest = ""
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_site(Path::new("/project"));

        assert!(!config.site_resolved.is_versioned());
        assert_eq!(config.site_resolved.catalog, "docs/pages.json");
    }

    #[test]
    fn test_resolve_site_url_root() {
        let toml = r#"
[site]
root = "https://docs.example.com/"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_site(Path::new("/project"));

        assert_eq!(
            config.site_resolved.root,
            SiteRoot::Url("https://docs.example.com/".to_owned())
        );
    }

    #[test]
    fn test_apply_cli_settings_host_and_port() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(9000),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.site_resolved.root,
            SiteRoot::Dir(PathBuf::from("/test/site"))
        ); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_root() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            root: Some("/srv/docs".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.site_resolved.root,
            SiteRoot::Dir(PathBuf::from("/srv/docs"))
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7878);
    }

    #[test]
    fn test_expand_env_vars_site() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TEST_DV_SITE", "/var/www/docs");
        }

        let toml = r#"
[site]
root = "${TEST_DV_SITE}"
not_found_url = "${TEST_DV_404:-missing.html}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_site(Path::new("/project"));

        assert_eq!(
            config.site_resolved.root,
            SiteRoot::Dir(PathBuf::from("/var/www/docs"))
        );
        assert_eq!(
            config.site_resolved.not_found_url.as_deref(),
            Some("missing.html")
        );

        unsafe {
            std::env::remove_var("TEST_DV_SITE");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MISSING_VAR_DV_CONFIG_TEST");
        }

        let toml = r#"
[server]
host = "${MISSING_VAR_DV_CONFIG_TEST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MISSING_VAR_DV_CONFIG_TEST"));
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dv.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 8080

[site]
root = "out"
not_found = "fallback"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.site_resolved.root, SiteRoot::Dir(dir.path().join("out")));
        assert_eq!(config.site_resolved.not_found, NotFoundMode::Fallback);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/dv.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dv.toml");
        std::fs::write(&path, "[site]\nnot_found = \"redirect\"\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(err.to_string().contains("not_found_url"));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
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
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_server_host_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.host = String::new();
        assert_validation_error(&config, &["server.host", "empty"]);
    }

    #[test]
    fn test_validate_server_port_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 0;
        assert_validation_error(&config, &["server.port"]);
    }

    #[test]
    fn test_validate_catalog_needs_placeholder() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site_resolved.catalog = "docs/pages.json".to_owned();
        assert_validation_error(&config, &["site.catalog", "{version}"]);
    }

    #[test]
    fn test_validate_unversioned_catalog_without_placeholder() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site_resolved.versions_manifest = None;
        config.site_resolved.catalog = "docs/pages.json".to_owned();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_redirect_needs_url() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site_resolved.not_found = NotFoundMode::Redirect;
        assert_validation_error(&config, &["site.not_found_url", "empty"]);

        config.site_resolved.not_found_url = Some("404.html".to_owned());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_url_root_scheme() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site_resolved.root = SiteRoot::Url("ftp://docs.example.com".to_owned());
        assert_validation_error(&config, &["site.root", "http"]);
    }

    #[test]
    fn test_validate_fade_too_long() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.transition.fade_ms = 10_000;
        assert_validation_error(&config, &["fade_ms", "5000"]);
    }
}
