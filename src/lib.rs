use anyhow::{Context, Result};
use std::path::Path;

pub mod cli;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod session;
pub mod settings;
pub mod store;

pub use crate::error::AttendanceError;
pub use crate::models::{AttendanceRow, Status, Student, StudentId, Year};
pub use crate::store::AttendanceStore;

use crate::settings::Settings;

/// Loads `.env`, then the session settings from `config_path` or `config.toml`.
pub fn load_default_settings(config_path: Option<&Path>) -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load(config_path).with_context(|| match config_path {
        Some(path) => format!("failed to load settings from {}", path.display()),
        None => "failed to load settings".to_string(),
    })
}
