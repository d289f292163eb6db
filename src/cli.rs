#![allow(clippy::missing_errors_doc)]

use clap::{Parser, ValueEnum};

use crate::domain::weather::Units;

pub const DEFAULT_CITY: &str = "San Francisco";
pub const DEFAULT_REFRESH_SECS: u64 = 600;
const MIN_REFRESH_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum UnitsArg {
    Celsius,
    Fahrenheit,
}

impl From<UnitsArg> for Units {
    fn from(value: UnitsArg) -> Self {
        match value {
            UnitsArg::Celsius => Units::Celsius,
            UnitsArg::Fahrenheit => Units::Fahrenheit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconMode {
    Ascii,
    Emoji,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Parser, Clone)]
#[command(
    name = "weatherwise",
    version,
    about = "Current conditions, forecast and activity ideas for any location"
)]
pub struct Cli {
    /// Location to look up (default: San Francisco)
    pub city: Option<String>,

    /// Display units
    #[arg(long, value_enum, default_value_t = UnitsArg::Celsius)]
    pub units: UnitsArg,

    /// Weather provider API key (default: $OPENWEATHER_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Geocode bias (ISO2)
    #[arg(long)]
    pub country_code: Option<String>,

    /// Override the geocoding endpoint
    #[arg(long)]
    pub geocode_url: Option<String>,

    /// Override the weather API base URL
    #[arg(long)]
    pub weather_url: Option<String>,

    /// Refresh interval in seconds (0 disables)
    #[arg(long, default_value_t = DEFAULT_REFRESH_SECS)]
    pub refresh_interval: u64,

    /// Disable periodic refresh
    #[arg(long)]
    pub no_auto_refresh: bool,

    /// Force ASCII condition icons
    #[arg(long)]
    pub ascii_icons: bool,

    /// Fetch once, print the report and exit
    #[arg(long)]
    pub one_shot: bool,

    /// Print the snapshot as JSON (with --one-shot)
    #[arg(long, requires = "one_shot")]
    pub json: bool,

    /// Tracing filter, e.g. `debug` or `weatherwise=trace`
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    #[must_use]
    pub fn default_city(&self) -> String {
        self.city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
            .unwrap_or(DEFAULT_CITY)
            .to_string()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self
            .api_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty())
        {
            anyhow::bail!("--api-key must not be empty");
        }
        if (1..MIN_REFRESH_SECS).contains(&self.refresh_interval) {
            anyhow::bail!(
                "--refresh-interval must be 0 (off) or at least {MIN_REFRESH_SECS} seconds"
            );
        }
        Ok(())
    }

    #[must_use]
    pub fn icon_mode(&self) -> IconMode {
        if self.ascii_icons {
            IconMode::Ascii
        } else {
            IconMode::Emoji
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, IconMode, UnitsArg};

    #[test]
    fn defaults_to_san_francisco() {
        let cli = Cli::parse_from(["weatherwise"]);
        assert_eq!(cli.default_city(), "San Francisco");
        assert_eq!(cli.units, UnitsArg::Celsius);
        assert_eq!(cli.refresh_interval, 600);
        assert_eq!(cli.icon_mode(), IconMode::Emoji);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn blank_city_falls_back_to_default() {
        let cli = Cli::parse_from(["weatherwise", "   "]);
        assert_eq!(cli.default_city(), "San Francisco");
    }

    #[test]
    fn parses_units_and_city() {
        let cli = Cli::parse_from(["weatherwise", "Tokyo", "--units", "fahrenheit"]);
        assert_eq!(cli.default_city(), "Tokyo");
        assert_eq!(cli.units, UnitsArg::Fahrenheit);
    }

    #[test]
    fn rejects_blank_api_key() {
        let cli = Cli::parse_from(["weatherwise", "--api-key", "  "]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn rejects_tiny_refresh_interval_but_allows_zero() {
        let cli = Cli::parse_from(["weatherwise", "--refresh-interval", "5"]);
        assert!(cli.validate().is_err());

        let cli = Cli::parse_from(["weatherwise", "--refresh-interval", "0"]);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn json_requires_one_shot() {
        let err = Cli::try_parse_from(["weatherwise", "--json"]).expect_err("expected conflict");
        assert!(err.to_string().contains("--one-shot"));

        let cli = Cli::parse_from(["weatherwise", "--one-shot", "--json"]);
        assert!(cli.json);
    }
}
