use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::parser::FrameworkKind;

/// Runtime settings for the command-line tool.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Pretty-print JSON output.
    pub pretty: bool,
    /// Framework used when `--framework` is omitted.
    pub default_framework: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            log_level: "warn".to_string(),
            pretty: true,
            default_framework: None,
        }
    }
}

impl Settings {
    /// Defaults, then `stairs.toml` in the working directory if present, then
    /// `STAIRS_*` environment variables.
    pub fn load() -> Result<Self> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("stairs").required(false))
                .add_source(Environment::with_prefix("STAIRS")),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        let defaults = Settings::default();
        let settings = Config::builder()
            .set_default("log_level", defaults.log_level)?
            .set_default("pretty", defaults.pretty)?
            .add_source(builder.build()?)
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// `explicit` wins over the configured default; neither set is `Ok(None)`.
    pub fn framework(&self, explicit: Option<&str>) -> Result<Option<FrameworkKind>> {
        explicit
            .or(self.default_framework.as_deref())
            .map(str::parse)
            .transpose()
    }
}

// ── Tests ──
