//! Runtime configuration
//!
//! Settings come from environment variables, falling back to defaults under
//! the user's config directory.

use std::env;
use std::path::PathBuf;

use crate::error::{ContactsError, ContactsResult};

// Environment variable names
pub const ENV_DB: &str = "SIMPLECONTACTS_DB";
pub const ENV_COUNTRY_CODE: &str = "SIMPLECONTACTS_COUNTRY_CODE";
pub const ENV_LOG: &str = "SIMPLECONTACTS_LOG";

pub const DEFAULT_COUNTRY_CODE: &str = "1";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    /// Calling code prepended to national numbers during normalization.
    pub country_code: String,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> ContactsResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> ContactsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_path = match get(ENV_DB) {
            Some(path) => PathBuf::from(path),
            None => Self::default_database_path()?,
        };

        let country_code = get(ENV_COUNTRY_CODE)
            .map(|cc| cc.trim().trim_start_matches('+').to_string())
            .unwrap_or_else(|| DEFAULT_COUNTRY_CODE.to_string());
        if !country_code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ContactsError::Other(format!(
                "{} must be digits, got {:?}",
                ENV_COUNTRY_CODE, country_code
            )));
        }

        Ok(Self {
            database_path,
            country_code,
            log_filter: get(ENV_LOG).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }

    pub fn default_database_path() -> ContactsResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ContactsError::Other("Could not find config directory".into()))?;
        Ok(config_dir.join("simplecontacts").join("contacts.db"))
    }
}
