use std::{fs, io::ErrorKind, path::Path, time::Duration};

use anyhow::Context;
use client_core::{normalize_server_url, HttpClientOptions};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "inventory.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub request_timeout_secs: u64,
    pub api_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".into(),
            request_timeout_secs: 10,
            api_token: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    request_timeout_secs: Option<u64>,
    api_token: Option<String>,
}

/// Overrides given on the command line. They win over file and environment.
#[derive(Debug, Default)]
pub struct Overrides {
    pub server_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub api_token: Option<String>,
}

impl Settings {
    pub fn http_options(&self) -> HttpClientOptions {
        HttpClientOptions {
            timeout: Some(Duration::from_secs(self.request_timeout_secs)).filter(|t| !t.is_zero()),
            api_token: self.api_token.clone(),
        }
    }

    fn apply_file(&mut self, raw: &str) -> anyhow::Result<()> {
        let file: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file.server_url {
            self.server_url = v;
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file.api_token {
            self.api_token = Some(v);
        }
        Ok(())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("INVENTORY_SERVER_URL") {
            self.server_url = v;
        }
        if let Some(v) = var("APP__SERVER_URL") {
            self.server_url = v;
        }

        if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
            if let Ok(parsed) = v.trim().parse::<u64>() {
                self.request_timeout_secs = parsed;
            }
        }

        if let Some(v) = var("APP__API_TOKEN") {
            self.api_token = Some(v);
        }
    }

    fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(v) = overrides.server_url {
            self.server_url = v;
        }
        if let Some(v) = overrides.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = overrides.api_token {
            self.api_token = Some(v);
        }
    }
}

/// Defaults, then the config file if present, then the environment, then
/// command-line overrides.
pub fn load_settings(config_path: &Path, overrides: Overrides) -> anyhow::Result<Settings> {
    let file = match fs::read_to_string(config_path) {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == ErrorKind::NotFound => None,
        Err(err) => {
            return Err(err).with_context(|| {
                format!("failed to read config file '{}'", config_path.display())
            })
        }
    };
    resolve_settings(file.as_deref(), |name| std::env::var(name).ok(), overrides)
        .with_context(|| format!("invalid configuration (config file '{}')", config_path.display()))
}

fn resolve_settings(
    file: Option<&str>,
    var: impl Fn(&str) -> Option<String>,
    overrides: Overrides,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();
    if let Some(raw) = file {
        settings.apply_file(raw).context("failed to parse config file")?;
    }
    settings.apply_env(var);
    settings.apply_overrides(overrides);

    settings.server_url = normalize_server_url(&settings.server_url)?;
    settings.api_token = settings.api_token.filter(|token| !token.trim().is_empty());
    debug!(
        server_url = %settings.server_url,
        timeout_secs = settings.request_timeout_secs,
        has_token = settings.api_token.is_some(),
        "config: settings resolved"
    );
    Ok(settings)
}
