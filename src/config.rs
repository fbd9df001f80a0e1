//! Layered settings: defaults < YAML settings file < environment variables.
//!
//! [`Settings`] is the provider of the three external strings the
//! application descriptor is built from. It is read-only once built; the
//! only ways to get one are the loaders below and [`SettingsBuilder`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::constants::{
    APP_VERSION, CONFIG_DIR_NAME, DEFAULT_ASSET_ROOT, ENV_ASSET_ROOT, ENV_AWS_API_GATEWAY_KEY,
    ENV_BACKEND_API_URL, ENV_DEBUG_MODE, ENV_DUMP_DEFAULTS, ENV_OPENAI_EXAMPLES_URL,
    SETTINGS_FILE_NAME,
};
use crate::error::{ConfigError, Result};
use crate::secret::Secret;

/// On-disk settings file. Every key is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    backend_api_url: Option<String>,
    aws_api_gateway_key: Option<String>,
    openai_examples_url: Option<String>,
    asset_root: Option<PathBuf>,
    debug_mode: Option<bool>,
    dump_defaults: Option<bool>,
}

/// Effective runtime settings
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    backend_api_url: String,
    aws_api_gateway_key: Secret,
    openai_examples_url: String,
    asset_root: PathBuf,
    debug_mode: bool,
    dump_defaults: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            backend_api_url: String::new(),
            aws_api_gateway_key: Secret::default(),
            openai_examples_url: String::new(),
            asset_root: PathBuf::from(DEFAULT_ASSET_ROOT),
            debug_mode: false,
            dump_defaults: false,
        }
    }
}

impl Settings {
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// Defaults overlaid with whatever `lookup` returns for each env var name.
    ///
    /// A blank value counts as unset, so `FOO=` keeps the default or file value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Settings::default().apply_lookup(lookup)
    }

    /// Defaults overlaid with the process environment
    pub fn from_env() -> Result<Self> {
        Settings::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file = parse_settings_file(content, Path::new("<inline>"))?;
        Ok(Settings::default().apply_file(file))
    }

    /// Defaults overlaid with a YAML settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = read_settings_file(path)?;
        Ok(Settings::default().apply_file(file))
    }

    /// `~/.app-descriptor/settings.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    /// Full layering against the process environment.
    ///
    /// An explicit `path` must exist. Without one, the default settings file
    /// is read only if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Settings::load_with(path, |key| std::env::var(key).ok())
    }

    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Settings::default_path().filter(|p| p.exists()),
        };

        let mut settings = Settings::default();
        if let Some(file_path) = file_path {
            tracing::debug!(path = %file_path.display(), "Loading settings file");
            settings = settings.apply_file(read_settings_file(&file_path)?);
        }
        settings.apply_lookup(lookup)
    }

    fn apply_file(self, file: SettingsFile) -> Self {
        Settings {
            backend_api_url: file.backend_api_url.unwrap_or(self.backend_api_url),
            aws_api_gateway_key: file
                .aws_api_gateway_key
                .map(Secret::from)
                .unwrap_or(self.aws_api_gateway_key),
            openai_examples_url: file.openai_examples_url.unwrap_or(self.openai_examples_url),
            asset_root: file.asset_root.unwrap_or(self.asset_root),
            debug_mode: file.debug_mode.unwrap_or(self.debug_mode),
            dump_defaults: file.dump_defaults.unwrap_or(self.dump_defaults),
        }
    }

    fn apply_lookup<F>(self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let debug_mode = match lookup(ENV_DEBUG_MODE) {
            Some(value) => parse_bool(ENV_DEBUG_MODE, &value)?,
            None => self.debug_mode,
        };
        let dump_defaults = match lookup(ENV_DUMP_DEFAULTS) {
            Some(value) => parse_bool(ENV_DUMP_DEFAULTS, &value)?,
            None => self.dump_defaults,
        };

        Ok(Settings {
            backend_api_url: lookup(ENV_BACKEND_API_URL).unwrap_or(self.backend_api_url),
            aws_api_gateway_key: lookup(ENV_AWS_API_GATEWAY_KEY)
                .map(Secret::from)
                .unwrap_or(self.aws_api_gateway_key),
            openai_examples_url: lookup(ENV_OPENAI_EXAMPLES_URL)
                .unwrap_or(self.openai_examples_url),
            asset_root: lookup(ENV_ASSET_ROOT)
                .map(PathBuf::from)
                .unwrap_or(self.asset_root),
            debug_mode,
            dump_defaults,
        })
    }

    pub fn backend_api_url(&self) -> &str {
        &self.backend_api_url
    }

    pub fn aws_api_gateway_key(&self) -> &Secret {
        &self.aws_api_gateway_key
    }

    pub fn openai_examples_url(&self) -> &str {
        &self.openai_examples_url
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn dump_defaults(&self) -> bool {
        self.dump_defaults
    }

    /// Fail-fast check of the required values, in declaration order.
    pub fn validate(&self) -> Result<()> {
        require_url(ENV_BACKEND_API_URL, &self.backend_api_url)?;
        if self.aws_api_gateway_key.is_empty() {
            return Err(ConfigError::Missing {
                field: ENV_AWS_API_GATEWAY_KEY,
            });
        }
        require_url(ENV_OPENAI_EXAMPLES_URL, &self.openai_examples_url)?;
        Ok(())
    }

    /// Settings grouped by concern, with the gateway key masked
    pub fn dump(&self) -> serde_json::Value {
        json!({
            "environment": {
                "debug_mode": self.debug_mode,
                "dump_defaults": self.dump_defaults,
                "os": std::env::consts::OS,
                "version": APP_VERSION,
                "asset_root": self.asset_root.display().to_string(),
            },
            "backend": {
                "backend_api_url": self.backend_api_url,
                "openai_examples_url": self.openai_examples_url,
                "aws_api_gateway_key": self.aws_api_gateway_key.masked(),
            },
        })
    }
}

/// Explicit construction, for embedding and tests
#[derive(Clone, Debug, Default)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    pub fn backend_api_url(mut self, url: impl Into<String>) -> Self {
        self.settings.backend_api_url = url.into();
        self
    }

    pub fn aws_api_gateway_key(mut self, key: impl Into<Secret>) -> Self {
        self.settings.aws_api_gateway_key = key.into();
        self
    }

    pub fn openai_examples_url(mut self, url: impl Into<String>) -> Self {
        self.settings.openai_examples_url = url.into();
        self
    }

    pub fn asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.settings.asset_root = root.into();
        self
    }

    pub fn debug_mode(mut self, enabled: bool) -> Self {
        self.settings.debug_mode = enabled;
        self
    }

    pub fn dump_defaults(mut self, enabled: bool) -> Self {
        self.settings.dump_defaults = enabled;
        self
    }

    pub fn build(self) -> Settings {
        self.settings
    }
}

fn read_settings_file(path: &Path) -> Result<SettingsFile> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings_file(&content, path)
}

fn parse_settings_file(content: &str, path: &Path) -> Result<SettingsFile> {
    // An empty file deserializes to null
    if content.trim().is_empty() {
        return Ok(SettingsFile::default());
    }
    serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_bool(field: &'static str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field,
            value: value.to_string(),
        }),
    }
}

fn require_url(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ConfigError::Missing { field });
    }
    let url = Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        source,
    })?;
    // The slug is appended verbatim; check the raw text since parsing adds a root path
    if !value.ends_with('/') || url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::MissingTrailingSlash {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
