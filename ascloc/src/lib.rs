#![forbid(unsafe_code)]
//! Spreadsheet-driven localization sync for App Store Connect.
//!
//! Fetches apps, versions, in-app events and their localizations, joins
//! locally edited spreadsheet rows to the server's localization records by
//! locale, and patches each record back one at a time.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ascloc::{DuplicatePolicy, VERSION_LOCALIZATIONS, merge_spreadsheet};
//! use ascloc::fetch::localization_list;
//! use ascloc::traits::JsonFile;
//!
//! // Join a saved localization snapshot with an edited spreadsheet
//! let snapshot = serde_json::Value::read_from("data/applications/SKU/version_localizations.json")?;
//! let server = localization_list(&snapshot)?;
//! let batch = merge_spreadsheet(
//!     &server,
//!     "TestLocalization.xlsx",
//!     &VERSION_LOCALIZATIONS,
//!     "merged_file.json",
//!     DuplicatePolicy::Reject,
//! )?;
//! println!("{} of {} rows matched", batch.report.matched, batch.report.rows);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Localization kinds
//!
//! - **App Store version localizations**: `locale, promotionalText, whatsNew`
//! - **In-app event localizations**: `locale, name, short, long`

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod kind;
pub mod merge;
pub mod pipeline;
pub mod select;
pub mod snapshot;
pub mod spreadsheet;
pub mod traits;
pub mod types;
pub mod upload;

// Re-export most used types for easy consumption
pub use crate::{
    auth::{JwtTokenProvider, StaticToken, TokenSource},
    client::{ApiClient, ApiResponse, Transport},
    config::Config,
    error::Error,
    kind::{ALL_KINDS, EVENT_LOCALIZATIONS, LocalizationKind, VERSION_LOCALIZATIONS},
    merge::{DuplicatePolicy, MergeReport, MergedBatch, merge_records, merge_spreadsheet},
    pipeline::{Outcome, Pipeline},
    select::{Prompt, Selector},
    types::{Document, LocalizationRecord, ResourceObject},
    upload::{FailureCause, UploadReport, upload},
};
