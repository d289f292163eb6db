use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    cli::{Cli, DEFAULT_REFRESH_SECS, UnitsArg},
    domain::weather::Units,
};

pub const MAX_RECENT_LOCATIONS: usize = 5;
pub const CONFIG_DIR_ENV: &str = "WEATHERWISE_CONFIG_DIR";

const SEED_LOCATIONS: [&str; MAX_RECENT_LOCATIONS] =
    ["San Francisco", "New York", "London", "Tokyo", "Sydney"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    pub units: Units,
    pub auto_refresh: bool,
    pub refresh_interval_secs: u64,
    pub recent_locations: Vec<String>,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            units: Units::Celsius,
            auto_refresh: true,
            refresh_interval_secs: DEFAULT_REFRESH_SECS,
            recent_locations: SEED_LOCATIONS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl RuntimeSettings {
    pub fn from_cli_defaults(cli: &Cli) -> Self {
        let mut settings = Self::default();
        settings.apply_cli_overrides(cli);
        settings
    }

    /// CLI flags only override the file when they differ from their defaults.
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if cli.units != UnitsArg::Celsius {
            self.units = cli.units.into();
        }
        if cli.no_auto_refresh {
            self.auto_refresh = false;
        }
        if cli.refresh_interval != DEFAULT_REFRESH_SECS {
            self.refresh_interval_secs = cli.refresh_interval;
        }
    }

    /// Most recent first, case-insensitively unique, capped.
    pub fn push_recent_location(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        let folded = name.to_lowercase();
        self.recent_locations
            .retain(|existing| existing.to_lowercase() != folded);
        self.recent_locations.insert(0, name.to_string());
        self.recent_locations.truncate(MAX_RECENT_LOCATIONS);
    }

    #[must_use]
    pub fn refresh_enabled(&self) -> bool {
        self.auto_refresh && self.refresh_interval_secs > 0
    }
}

pub fn load_runtime_settings(cli: &Cli, enable_disk: bool) -> (RuntimeSettings, Option<PathBuf>) {
    if !enable_disk {
        return (RuntimeSettings::from_cli_defaults(cli), None);
    }
    let Some(path) = settings_path() else {
        return (RuntimeSettings::from_cli_defaults(cli), None);
    };
    let settings = load_runtime_settings_from(cli, &path);
    (settings, Some(path))
}

/// A missing or unreadable file falls back to defaults.
pub fn load_runtime_settings_from(cli: &Cli, path: &Path) -> RuntimeSettings {
    let mut settings = match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str::<RuntimeSettings>(&content).unwrap_or_else(|err| {
            warn!(path = %path.display(), %err, "ignoring unreadable settings file");
            RuntimeSettings::default()
        }),
        Err(_) => RuntimeSettings::default(),
    };
    settings.apply_cli_overrides(cli);
    settings
}

pub fn save_runtime_settings(path: &Path, settings: &RuntimeSettings) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("creating settings directory failed")?;
    }
    let payload =
        serde_json::to_string_pretty(settings).context("serializing settings payload failed")?;
    fs::write(path, payload).context("writing settings file failed")
}

fn settings_path() -> Option<PathBuf> {
    if let Some(base) = std::env::var_os(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(base).join("settings.json"));
    }

    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("weatherwise")
            .join("settings.json"),
    )
}
