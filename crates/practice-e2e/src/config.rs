// Settings for the end-to-end suite
//
// Read from a TOML file with a `[DEFAULT]` table:
//
//     [DEFAULT]
//     User = "practice"
//     Password = "SuperSecretPassword!"
//     ApplicationURL = "https://practice.expandtesting.com"
//
// Each key can be overridden through the environment.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the settings file
pub const CONFIG_PATH_ENV: &str = "PRACTICE_CONFIG";

/// Settings file used when `PRACTICE_CONFIG` is not set
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

pub const USER_ENV: &str = "PRACTICE_USER";
pub const PASSWORD_ENV: &str = "PRACTICE_PASSWORD";
pub const APPLICATION_URL_ENV: &str = "PRACTICE_APPLICATION_URL";

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(rename = "DEFAULT", default)]
    default: RawSettings,
}

#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    #[serde(rename = "User")]
    user: Option<String>,
    #[serde(rename = "Password")]
    password: Option<String>,
    #[serde(rename = "ApplicationURL")]
    application_url: Option<String>,
}

/// Credentials and target of the suite.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub user: String,
    pub password: String,
    /// Base URL without a trailing slash
    pub application_url: String,
}

impl Settings {
    /// Loads settings from `$PRACTICE_CONFIG` (or `config.toml`) plus
    /// environment overrides.
    ///
    /// A missing file is fine as long as the environment supplies every key.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        let raw = if path.exists() {
            read_file(&path)?
        } else {
            tracing::debug!("No settings file at {}, using environment", path.display());
            RawSettings::default()
        };
        resolve(raw, |key| std::env::var(key).ok())
    }

    /// Loads settings from `path` only, ignoring the environment.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        resolve(read_file(path.as_ref())?, |_| None)
    }

    /// Parses settings from TOML text, ignoring the environment.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        resolve(parse(text)?, |_| None)
    }

    /// Parses settings from TOML text, letting `env` override keys.
    pub fn from_toml_str_with_env(
        text: &str,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        resolve(parse(text)?, env)
    }

    /// Joins `path` onto the application URL: `url("login")` → `{base}/login`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.application_url, path.trim_start_matches('/'))
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("user", &self.user)
            .field("password", &"***")
            .field("application_url", &self.application_url)
            .finish()
    }
}

fn read_file(path: &Path) -> Result<RawSettings> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::from(e).context(format!("reading {}", path.display())))?;
    parse(&text)
}

fn parse(text: &str) -> Result<RawSettings> {
    let file: ConfigFile =
        toml::from_str(text).map_err(|e| Error::Config(format!("invalid settings: {}", e)))?;
    Ok(file.default)
}

fn resolve(raw: RawSettings, env: impl Fn(&str) -> Option<String>) -> Result<Settings> {
    let pick = |key: &str, env_key: &str, value: Option<String>| {
        env(env_key)
            .or(value)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::Config(format!("missing '{}' (or ${})", key, env_key)))
    };

    let user = pick("User", USER_ENV, raw.user)?;
    let password = pick("Password", PASSWORD_ENV, raw.password)?;
    let application_url = pick("ApplicationURL", APPLICATION_URL_ENV, raw.application_url)?;

    url::Url::parse(&application_url).map_err(|e| {
        Error::Config(format!("invalid ApplicationURL '{}': {}", application_url, e))
    })?;

    Ok(Settings {
        user,
        password,
        application_url: application_url.trim_end_matches('/').to_string(),
    })
}
