use std::fmt;

use serde::de::DeserializeOwned;

use crate::ConfigError;

/// Diagnostics produced while loading and validating a deft config.
///
/// Loading is best effort: callers always get a `DeftConfig` when
/// deserialization succeeds, plus what was wrong with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDiagnostics {
    /// Keys present in the input TOML that the schema does not know, as full
    /// dotted paths (`synthesis.wrapper_typez`).
    pub unknown_keys: Vec<String>,
    /// Semantic validation failures.
    pub errors: Vec<ConfigValidationError>,
}

impl ConfigDiagnostics {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn into_result(self) -> Result<(), ConfigError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(self.errors))
        }
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    EmptyName { toml_path: String },
    NoMarkers,
    MarkerInBothStrategies { marker: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValidationError::EmptyName { toml_path } => {
                write!(f, "`{toml_path}` contains an empty name")
            }
            ConfigValidationError::NoMarkers => {
                f.write_str("no parameter markers configured for either strategy")
            }
            ConfigValidationError::MarkerInBothStrategies { marker } => write!(
                f,
                "marker `{marker}` is configured for both split-pair and pyramid synthesis"
            ),
        }
    }
}

pub(crate) fn deserialize_toml_with_unknown_keys<T: DeserializeOwned>(
    text: &str,
) -> Result<(T, Vec<String>), toml::de::Error> {
    let mut unknown = Vec::<String>::new();
    let deserializer = toml::de::Deserializer::new(text);
    let value = serde_ignored::deserialize(deserializer, |path| {
        unknown.push(normalize_serde_ignored_path(path));
    })?;
    unknown.sort();
    unknown.dedup();
    Ok((value, unknown))
}

fn normalize_serde_ignored_path(path: serde_ignored::Path) -> String {
    // `serde_ignored::Path` renders with a leading `.` for root paths.
    let raw = path.to_string();
    let raw = raw.trim_start_matches('.');
    // Sequence indices render as `.0` segments; TOML users expect `a[0].b`.
    raw.split('.')
        .enumerate()
        .fold(String::new(), |mut out, (idx, segment)| {
            let is_index =
                idx > 0 && !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());
            if is_index {
                out.push('[');
                out.push_str(segment);
                out.push(']');
                return out;
            }

            if !out.is_empty() {
                out.push('.');
            }
            out.push_str(segment);
            out
        })
}
