//! Run configuration.
//!
//! Credentials come from the environment (`KEY_ID`, `ISSUER_ID`,
//! `PATH_TO_KEY`); everything else has a default that the CLI may override.

use std::path::{Path, PathBuf};

use chrono::TimeDelta;

use crate::{error::Error, kind::LocalizationKind, merge::DuplicatePolicy};

pub const DEFAULT_BASE_URL: &str = "https://api.appstoreconnect.apple.com";
pub const DEFAULT_DATA_DIR: &str = "data/applications";
pub const DEFAULT_MERGED_FILE: &str = "merged_file.json";
pub const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 20;

pub const KEY_ID_VAR: &str = "KEY_ID";
pub const ISSUER_ID_VAR: &str = "ISSUER_ID";
pub const KEY_PATH_VAR: &str = "PATH_TO_KEY";
pub const BASE_URL_VAR: &str = "ASC_BASE_URL";

/// API key identity and the path of its private key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key_id: String,
    pub issuer_id: String,
    pub key_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub key_id: Option<String>,
    pub issuer_id: Option<String>,
    pub key_path: Option<PathBuf>,
    pub base_url: String,
    /// Root of the snapshot tree.
    pub data_dir: PathBuf,
    /// Where the merged batch is written.
    pub merged_file: PathBuf,
    pub token_lifetime: TimeDelta,
    /// Overrides the kind's default spreadsheet file.
    pub spreadsheet: Option<PathBuf>,
    pub duplicate_policy: DuplicatePolicy,
    /// Skip the confirmation before uploading.
    pub assume_yes: bool,
    /// Merge but never upload.
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Creates a configuration with defaults and no credentials.
    pub fn new() -> Self {
        Config {
            key_id: None,
            issuer_id: None,
            key_path: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            merged_file: PathBuf::from(DEFAULT_MERGED_FILE),
            token_lifetime: TimeDelta::minutes(DEFAULT_TOKEN_LIFETIME_MINUTES),
            spreadsheet: None,
            duplicate_policy: DuplicatePolicy::default(),
            assume_yes: false,
            dry_run: false,
        }
    }

    /// Reads credentials and the base URL from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`Config::from_env`] with a custom variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Config::new();
        config.key_id = var(KEY_ID_VAR);
        config.issuer_id = var(ISSUER_ID_VAR);
        config.key_path = var(KEY_PATH_VAR).map(PathBuf::from);
        if let Some(base_url) = var(BASE_URL_VAR) {
            config.base_url = base_url;
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_merged_file(mut self, merged_file: impl Into<PathBuf>) -> Self {
        self.merged_file = merged_file.into();
        self
    }

    pub fn with_token_lifetime(mut self, token_lifetime: TimeDelta) -> Self {
        self.token_lifetime = token_lifetime;
        self
    }

    pub fn with_spreadsheet(mut self, spreadsheet: Option<PathBuf>) -> Self {
        self.spreadsheet = spreadsheet;
        self
    }

    pub fn with_duplicate_policy(mut self, duplicate_policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = duplicate_policy;
        self
    }

    pub fn with_assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns complete credentials or names every missing variable.
    pub fn credentials(&self) -> Result<Credentials, Error> {
        match (&self.key_id, &self.issuer_id, &self.key_path) {
            (Some(key_id), Some(issuer_id), Some(key_path)) => Ok(Credentials {
                key_id: key_id.clone(),
                issuer_id: issuer_id.clone(),
                key_path: key_path.clone(),
            }),
            _ => {
                let missing: Vec<&str> = [
                    (KEY_ID_VAR, self.key_id.is_none()),
                    (ISSUER_ID_VAR, self.issuer_id.is_none()),
                    (KEY_PATH_VAR, self.key_path.is_none()),
                ]
                .iter()
                .filter(|(_, missing)| *missing)
                .map(|(name, _)| *name)
                .collect();
                Err(Error::config_error(format!(
                    "missing environment variable(s): {}",
                    missing.join(", ")
                )))
            }
        }
    }

    /// Spreadsheet to read for `kind`.
    pub fn spreadsheet_for(&self, kind: &LocalizationKind) -> PathBuf {
        self.spreadsheet
            .clone()
            .unwrap_or_else(|| PathBuf::from(kind.default_spreadsheet))
    }

    pub fn merged_file(&self) -> &Path {
        &self.merged_file
    }
}
