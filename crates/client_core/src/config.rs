use std::{fs, io::ErrorKind, path::Path, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "paklex.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub api_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".into(),
            request_timeout_secs: 120,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Loads settings from defaults, then the config file, then the environment.
///
/// An explicitly named file must exist; the default `paklex.toml` is optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<ClientSettings> {
    let mut settings = match config_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?;
            parse_settings(&raw)
                .with_context(|| format!("invalid config file '{}'", path.display()))?
        }
        None => read_optional_settings(Path::new(DEFAULT_CONFIG_FILE))?,
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings.api_url = validate_api_url(&settings.api_url)?;
    validate_request_timeout(settings.request_timeout_secs)?;
    Ok(settings)
}

/// Falls back to defaults only when `path` does not exist. Any other read
/// failure is an error.
fn read_optional_settings(path: &Path) -> anyhow::Result<ClientSettings> {
    match fs::read_to_string(path) {
        Ok(raw) => {
            parse_settings(&raw).with_context(|| format!("invalid config file '{}'", path.display()))
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(ClientSettings::default()),
        Err(err) => Err(err)
            .with_context(|| format!("failed to read config file '{}'", path.display())),
    }
}

pub fn parse_settings(raw: &str) -> anyhow::Result<ClientSettings> {
    Ok(toml::from_str::<ClientSettings>(raw)?)
}

pub fn apply_env_overrides<F>(settings: &mut ClientSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("PAKLEX_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = lookup("APP__API_URL") {
        settings.api_url = v;
    }

    for key in ["PAKLEX_REQUEST_TIMEOUT_SECS", "APP__REQUEST_TIMEOUT_SECS"] {
        if let Some(v) = lookup(key) {
            match v.trim().parse::<u64>() {
                Ok(parsed) => settings.request_timeout_secs = parsed,
                Err(_) => tracing::warn!(key, value = %v, "ignoring non-numeric timeout override"),
            }
        }
    }
}

/// Checks that `raw` is an absolute http(s) URL and strips trailing slashes.
pub fn validate_api_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).with_context(|| format!("invalid api url '{trimmed}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!(
            "api url '{trimmed}' must use http or https, not '{}'",
            parsed.scheme()
        );
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// A zero timeout would fail every request before it is sent.
pub fn validate_request_timeout(secs: u64) -> anyhow::Result<u64> {
    if secs == 0 {
        bail!("request timeout must be at least one second");
    }
    Ok(secs)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
