//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "ponte";

/// Command-line arguments for the ponte binary.
#[derive(Debug, Parser)]
#[command(name = "ponte", version, about = "Component render bridge")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "PONTE_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the line-oriented render loop over stdin/stdout.
    Serve(ServeArgs),
    /// Render a single component and print its envelope.
    Render(Box<RenderArgs>),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: Overrides,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub overrides: Overrides,

    /// Path of the component to render.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub component: String,

    /// Component properties as inline JSON.
    #[arg(long, value_name = "JSON")]
    pub props: Option<String>,

    /// Read component properties from a JSON file instead.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath, conflicts_with = "props")]
    pub props_file: Option<PathBuf>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct Overrides {
    /// Override the cache-eviction mode (`production` disables reloads).
    #[arg(long = "mode", value_name = "MODE")]
    pub mode: Option<String>,

    /// Override the root directory for relative component identifiers.
    #[arg(long = "components-directory", value_name = "PATH")]
    pub components_directory: Option<PathBuf>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub mode: Mode,
    pub components: ComponentSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ComponentSettings {
    /// Relative component identifiers resolve against this directory when
    /// set; absolute identifiers always stand alone.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

/// Cache-eviction policy switch. Only the literal `production` selects
/// production; every other value (and absence) is development.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    Production,
    #[default]
    Development,
}

impl Mode {
    pub fn is_production(self) -> bool {
        matches!(self, Mode::Production)
    }
}

impl From<&str> for Mode {
    fn from(value: &str) -> Self {
        if value == "production" {
            Mode::Production
        } else {
            Mode::Development
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("PONTE").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_overrides(&args.overrides),
        Some(Command::Render(args)) => raw.apply_overrides(&args.overrides),
        None => {}
    }

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    mode: Option<String>,
    components: RawComponentSettings,
    logging: RawLoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawComponentSettings {
    directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(mode) = overrides.mode.as_ref() {
            self.mode = Some(mode.clone());
        }
        if let Some(directory) = overrides.components_directory.as_ref() {
            self.components.directory = Some(directory.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let mode = raw.mode.as_deref().map(Mode::from).unwrap_or_default();

        let level = match raw.logging.level.as_deref() {
            Some(value) => LevelFilter::from_str(value).map_err(|_| {
                LoadError::invalid("logging.level", format!("`{value}` is not a log level"))
            })?,
            None => LevelFilter::INFO,
        };
        let format = if raw.logging.json.unwrap_or(false) {
            LogFormat::Json
        } else {
            LogFormat::Compact
        };

        Ok(Settings {
            mode,
            components: ComponentSettings {
                directory: raw.components.directory,
            },
            logging: LoggingSettings { level, format },
        })
    }
}

#[cfg(test)]
mod tests;
