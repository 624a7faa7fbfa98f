//! Settings resolution for the fetcher.
//!
//! The bearer credential is looked up in a key-value view built from two
//! sources: an optional local settings file of `KEY=VALUE` lines (usually
//! `.env`), and a snapshot of the process environment. Environment values take
//! precedence and are never overwritten by the file.
//!
//! Resolution is a pure function of (file contents, environment snapshot); the
//! process environment itself is never mutated.
//!
//! # Example
//!
//! ```
//! use strava_export::config::{ACCESS_TOKEN_KEY, Settings};
//!
//! let env = [(ACCESS_TOKEN_KEY.to_string(), "abc123".to_string())];
//! let settings = Settings::resolve(None, env).unwrap();
//! assert_eq!(settings.access_token().unwrap(), "abc123");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument};

/// Settings key holding the Strava bearer token.
pub const ACCESS_TOKEN_KEY: &str = "STRAVA_ACCESS_TOKEN";

/// Settings key overriding the API base URL (mainly for testing against a mock).
pub const API_BASE_KEY: &str = "STRAVA_API_BASE";

/// Default settings file name, resolved relative to the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = ".env";

/// Errors produced while resolving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file exists but could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Io {
        /// The settings file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The bearer credential is absent or blank.
    #[error("missing {key}. Put it in .env or set it in your environment.")]
    MissingCredential {
        /// The settings key that was looked up.
        key: &'static str,
    },
}

/// Resolved key-value settings.
///
/// `Debug` prints key names only so credentials never reach log output.
#[derive(Clone, Default)]
pub struct Settings {
    values: HashMap<String, String>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("Settings").field("keys", &keys).finish()
    }
}

impl Settings {
    /// Builds settings from an environment snapshot and an optional settings file.
    ///
    /// A missing settings file is not an error. Entries from the file are added
    /// only for keys the environment does not already define; within the file
    /// the first occurrence of a key wins.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file exists but cannot be read.
    #[instrument(skip(env))]
    pub fn resolve<I, K, V>(path: Option<&Path>, env: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values: HashMap<String, String> = env
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();

        let Some(path) = path.filter(|p| p.is_file()) else {
            debug!("no settings file, using environment only");
            return Ok(Self { values });
        };

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut added = 0_usize;
        for (key, value) in parse_settings_str(&raw) {
            if !values.contains_key(&key) {
                values.insert(key, value);
                added += 1;
            }
        }
        debug!(added, "merged settings file");

        Ok(Self { values })
    }

    /// Returns the raw value for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the trimmed bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] when the token is unset or blank.
    pub fn access_token(&self) -> Result<&str, ConfigError> {
        self.get(ACCESS_TOKEN_KEY)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingCredential {
                key: ACCESS_TOKEN_KEY,
            })
    }

    /// Returns the API base URL override, if set and non-blank.
    #[must_use]
    pub fn api_base(&self) -> Option<&str> {
        self.get(API_BASE_KEY)
            .map(str::trim)
            .filter(|base| !base.is_empty())
    }
}

/// Parses `KEY=VALUE` lines in file order.
///
/// Blank lines, `#` comments and lines without `=` are skipped. Keys and values
/// are trimmed, and surrounding double then single quotes are stripped from
/// values. Lines with an empty key are dropped.
#[must_use]
pub fn parse_settings_str(raw: &str) -> Vec<(String, String)> {
    raw.lines()
        .filter_map(|raw_line| {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            let value = value.trim().trim_matches('"').trim_matches('\'');
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}
