//! Export configuration.
//!
//! Values come from the environment (the binary loads `.env` first with
//! `dotenvy`); command-line flags override them.
//!
//! | Variable                        | Default          |
//! |---------------------------------|------------------|
//! | `DATAEXPORT_LANGUAGE`           | `en`             |
//! | `DATAEXPORT_FALLBACK_LANGUAGE`  | `en`             |
//! | `DATAEXPORT_OUTPUT_DIR`         | system temp dir  |

use std::env;
use std::path::PathBuf;

use crate::error::{ConfigError, ConfigResult};
use crate::models::Locale;

pub const LANGUAGE_VAR: &str = "DATAEXPORT_LANGUAGE";
pub const FALLBACK_LANGUAGE_VAR: &str = "DATAEXPORT_FALLBACK_LANGUAGE";
pub const OUTPUT_DIR_VAR: &str = "DATAEXPORT_OUTPUT_DIR";

const DEFAULT_LANGUAGE: &str = "en";

/// Settings for one exporter.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Language used for display names
    pub language: String,
    /// Language used when a name has no translation in `language`
    pub fallback_language: String,
    /// Where export files are created, `None` for the system temp dir
    pub output_dir: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            fallback_language: DEFAULT_LANGUAGE.to_string(),
            output_dir: None,
        }
    }
}

impl ExportConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(language) = lookup(LANGUAGE_VAR) {
            config.language = non_empty(LANGUAGE_VAR, language)?;
        }
        if let Some(fallback) = lookup(FALLBACK_LANGUAGE_VAR) {
            config.fallback_language = non_empty(FALLBACK_LANGUAGE_VAR, fallback)?;
        }
        if let Some(dir) = lookup(OUTPUT_DIR_VAR) {
            config.output_dir = Some(PathBuf::from(non_empty(OUTPUT_DIR_VAR, dir)?));
        }

        Ok(config)
    }

    /// Override the display language; blank values are rejected like in the environment.
    pub fn with_language(mut self, language: impl Into<String>) -> ConfigResult<Self> {
        self.language = non_empty(LANGUAGE_VAR, language.into())?;
        Ok(self)
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn locale(&self) -> Locale {
        Locale::new(&self.language, &self.fallback_language)
    }

    /// Directory export files are created in.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(env::temp_dir)
    }
}

fn non_empty(name: &'static str, value: String) -> ConfigResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ConfigError::InvalidValue {
            name,
            message: "must not be empty".to_string(),
        })
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = ExportConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ExportConfig::default());
        assert_eq!(config.locale(), Locale::new("en", "en"));
        assert_eq!(config.output_dir(), env::temp_dir());
    }

    #[test]
    fn test_variables_override_defaults() {
        let config = ExportConfig::from_lookup(lookup(&[
            (LANGUAGE_VAR, "fr"),
            (OUTPUT_DIR_VAR, "/var/exports"),
        ]))
        .unwrap();

        assert_eq!(config.locale(), Locale::new("fr", "en"));
        assert_eq!(config.output_dir(), PathBuf::from("/var/exports"));
    }

    #[test]
    fn test_empty_language_rejected() {
        let err = ExportConfig::from_lookup(lookup(&[(LANGUAGE_VAR, "  ")])).unwrap_err();
        assert!(err.to_string().contains(LANGUAGE_VAR));
    }

    #[test]
    fn test_language_override() {
        let config = ExportConfig::from_lookup(lookup(&[(LANGUAGE_VAR, "fr")]))
            .unwrap()
            .with_language(" rw ")
            .unwrap();
        assert_eq!(config.locale(), Locale::new("rw", "en"));
    }

    #[test]
    fn test_empty_language_override_rejected() {
        let config = ExportConfig::from_lookup(lookup(&[])).unwrap();
        assert!(matches!(
            config.clone().with_language(""),
            Err(ConfigError::InvalidValue { name: LANGUAGE_VAR, .. })
        ));
        assert!(config.with_language("   ").is_err());
    }
}
