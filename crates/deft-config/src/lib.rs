use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};

use thiserror::Error;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::fmt::MakeWriter;

mod diagnostics;
mod schema;

pub use diagnostics::{ConfigDiagnostics, ConfigValidationError};
pub use schema::json_schema;

/// Conventional config file name looked up next to the inputs.
pub const CONFIG_FILE_NAME: &str = "deft.toml";

/// How `char` defaults are spelled in synthesized calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CharLiteralStyle {
    /// A character literal: `'\t'`.
    #[default]
    Char,
    /// An int literal narrowed to `char`: `(char) 9`.
    IntCast,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct SynthesisConfig {
    /// Parameter markers whose methods get a trailing-defaults overload plus a
    /// `paramsMap` carrier overload.
    #[serde(default = "SynthesisConfig::default_split_pair_markers")]
    pub split_pair_markers: Vec<String>,

    /// Parameter markers whose methods get one overload per arity. The same
    /// markers placed on a method strip every wrapper-typed parameter instead.
    #[serde(default = "SynthesisConfig::default_pyramid_markers")]
    pub pyramid_markers: Vec<String>,

    /// Types treated as "value present or absent" wrappers. Matched by simple
    /// name as well, so `Optional` matches `java.util.Optional`.
    #[serde(default = "SynthesisConfig::default_wrapper_types")]
    pub wrapper_types: Vec<String>,

    #[serde(default)]
    pub char_literal: CharLiteralStyle,
}

impl SynthesisConfig {
    fn default_split_pair_markers() -> Vec<String> {
        vec!["lombok.Def".to_owned()]
    }

    fn default_pyramid_markers() -> Vec<String> {
        vec!["lombok.Opt".to_owned()]
    }

    fn default_wrapper_types() -> Vec<String> {
        vec!["java.util.Optional".to_owned()]
    }

    /// Every marker, regardless of strategy.
    pub fn all_markers(&self) -> impl Iterator<Item = &str> {
        self.split_pair_markers
            .iter()
            .chain(self.pyramid_markers.iter())
            .map(String::as_str)
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            split_pair_markers: Self::default_split_pair_markers(),
            pyramid_markers: Self::default_pyramid_markers(),
            wrapper_types: Self::default_wrapper_types(),
            char_literal: CharLiteralStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level for all deft crates.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,

    /// Mirror logs to stderr.
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,

    /// Append logs to the given file path (in addition to stderr).
    ///
    /// If the file cannot be opened, file logging is disabled while other sinks
    /// remain active.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    fn default_level() -> String {
        "warn".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            // Anything else is treated as an `EnvFilter` directive string.
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        })
    }

    /// Create the effective `EnvFilter`.
    ///
    /// `level` may be either a simple level (`info`, `debug`, ...) or a full
    /// `EnvFilter` directive string. If `RUST_LOG` is set, it is merged in.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let config_directives = Self::normalize_level_directives(&self.level);

        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
            file: None,
        }
    }
}

/// Top-level `deft.toml`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[schemars(deny_unknown_fields)]
pub struct DeftConfig {
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
    #[error("invalid config: {}", format_validation_errors(.0))]
    Invalid(Vec<ConfigValidationError>),
}

fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` includes a source snippet; keep just the message.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl DeftConfig {
    /// Load a config file from TOML, rejecting semantically invalid configs.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let (config, diagnostics) = Self::load_from_path_with_diagnostics(path)?;
        diagnostics.into_result().map(|()| config)
    }

    /// Load a config file from TOML and return diagnostics (unknown keys and
    /// semantic validation failures).
    pub fn load_from_path_with_diagnostics(
        path: impl AsRef<Path>,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str_with_diagnostics(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let (config, diagnostics) = Self::load_from_str_with_diagnostics(text)?;
        diagnostics.into_result().map(|()| config)
    }

    pub fn load_from_str_with_diagnostics(
        text: &str,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let (config, unknown_keys) =
            diagnostics::deserialize_toml_with_unknown_keys::<DeftConfig>(text)?;

        for key in &unknown_keys {
            tracing::warn!(target: "deft.config", key = %key, "ignoring unknown config key");
        }

        let diagnostics = ConfigDiagnostics {
            unknown_keys,
            errors: config.validate(),
        };
        Ok((config, diagnostics))
    }

    /// Find `deft.toml` in `dir` or any of its ancestors.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        dir.ancestors()
            .map(|ancestor| ancestor.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let synthesis = &self.synthesis;
        let mut errors = Vec::new();

        for (path, values) in [
            ("synthesis.split_pair_markers", &synthesis.split_pair_markers),
            ("synthesis.pyramid_markers", &synthesis.pyramid_markers),
            ("synthesis.wrapper_types", &synthesis.wrapper_types),
        ] {
            if values.iter().any(|v| v.trim().is_empty()) {
                errors.push(ConfigValidationError::EmptyName {
                    toml_path: path.to_owned(),
                });
            }
        }

        if synthesis.split_pair_markers.is_empty() && synthesis.pyramid_markers.is_empty() {
            errors.push(ConfigValidationError::NoMarkers);
        }

        for marker in &synthesis.split_pair_markers {
            let simple = simple_name(marker);
            if synthesis
                .pyramid_markers
                .iter()
                .any(|other| simple_name(other) == simple)
            {
                errors.push(ConfigValidationError::MarkerInBothStrategies {
                    marker: marker.clone(),
                });
            }
        }

        errors
    }
}

fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

struct MutexFileMakeWriter {
    file: Arc<Mutex<std::fs::File>>,
}

impl<'a> MakeWriter<'a> for MutexFileMakeWriter {
    type Writer = MutexFileWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        MutexFileWriter {
            guard: self
                .file
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        }
    }
}

struct MutexFileWriter<'a> {
    guard: std::sync::MutexGuard<'a, std::fs::File>,
}

impl Write for MutexFileWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.guard.flush()
    }
}

static TRACING_INIT: Once = Once::new();

/// Initializes structured `tracing` logging.
///
/// Safe to call multiple times; only the first call installs a global
/// subscriber.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();

        let file = config
            .file
            .as_ref()
            .and_then(|path| {
                std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .ok()
            })
            .map(|file| Arc::new(Mutex::new(file)));
        let file_open_failed = config.file.is_some() && file.is_none();

        let mut make_writer = BoxMakeWriter::new(io::sink);
        if config.stderr {
            make_writer = BoxMakeWriter::new(make_writer.and(io::stderr));
        }
        if let Some(file) = file {
            make_writer = BoxMakeWriter::new(make_writer.and(MutexFileMakeWriter { file }));
        }

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(make_writer)
            .with_ansi(false);
        let installed = if config.json {
            builder.json().try_init().is_ok()
        } else {
            builder.try_init().is_ok()
        };

        if installed && file_open_failed {
            if let Some(path) = config.file.as_ref() {
                tracing::warn!(
                    target: "deft.config",
                    path = %path.display(),
                    "failed to open log file; file logging disabled"
                );
            }
        }
    });
}
