//! Session settings, loaded from an optional `config.toml` and `ATTENDANCE_*` environment
//! variables.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::export::DEFAULT_EXPORT_FILE;

/// The border style used when printing tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStyle {
    #[default]
    Modern,
    Ascii,
    Markdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where `export` writes the CSV when no path is given.
    pub export_path: PathBuf,
    /// Default log level for the `attendance` target; `RUST_LOG` takes precedence.
    pub log_level: String,
    pub table_style: TableStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            export_path: PathBuf::from(DEFAULT_EXPORT_FILE),
            log_level: "info".to_string(),
            table_style: TableStyle::default(),
        }
    }
}

impl Settings {
    /// Loads settings from `path` if given, or from `config.toml` in the working directory if it
    /// exists. Environment variables such as `ATTENDANCE_EXPORT_PATH` override file values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("config").required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("ATTENDANCE"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
