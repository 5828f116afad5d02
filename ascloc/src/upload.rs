//! Sequential upload of a merged batch.
//!
//! Each record is sent as its own partial update, in batch order. The first
//! record that fails stops the run: later records are never sent and records
//! already applied stay applied.

use std::fmt::Display;

use serde_json::json;
use tracing::{error, info};

use crate::{client::Transport, kind::LocalizationKind, types::LocalizationRecord};

/// Why a record could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// The record's locale matched no server localization, so there is no
    /// identifier to address it by. Nothing was sent.
    MissingId,
    /// The server answered with a non-2xx status.
    Status { status: u16, body: String },
    /// No response was received.
    Transport(String),
}

impl Display for FailureCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureCause::MissingId => write!(f, "record has no server identifier"),
            FailureCause::Status { status, body } => write!(f, "HTTP {}: {}", status, body),
            FailureCause::Transport(message) => write!(f, "transport error: {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    /// Zero-based position in the batch.
    pub index: usize,
    pub id: Option<String>,
    pub cause: FailureCause,
}

impl Display for UploadFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "record {} (id {}): {}",
            self.index + 1,
            self.id.as_deref().unwrap_or("<none>"),
            self.cause
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadReport {
    pub total: usize,
    /// Identifiers of records the server accepted, in order.
    pub succeeded: Vec<String>,
    pub failure: Option<UploadFailure>,
}

impl UploadReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none() && self.succeeded.len() == self.total
    }

    /// Records that were never attempted because an earlier one failed.
    pub fn skipped(&self) -> usize {
        let attempted = self.succeeded.len() + usize::from(self.failure.is_some());
        self.total - attempted
    }
}

/// Uploads every record of `batch`, stopping at the first failure.
///
/// `on_success` is called after each accepted record with its position and
/// identifier.
pub fn upload<T, F>(
    transport: &T,
    kind: &LocalizationKind,
    batch: &[LocalizationRecord],
    mut on_success: F,
) -> UploadReport
where
    T: Transport + ?Sized,
    F: FnMut(usize, &str),
{
    let mut report = UploadReport {
        total: batch.len(),
        ..UploadReport::default()
    };

    for (index, record) in batch.iter().enumerate() {
        let Some(id) = record.id.as_deref() else {
            error!(index, "refusing to send localization without id");
            report.failure = Some(UploadFailure {
                index,
                id: None,
                cause: FailureCause::MissingId,
            });
            break;
        };

        let body = json!({ "data": record });
        let cause = match transport.patch(&kind.patch_path(id), &body) {
            Ok(response) if response.is_success() => {
                info!(index, id, "localization updated");
                report.succeeded.push(id.to_string());
                on_success(index, id);
                continue;
            }
            Ok(response) => FailureCause::Status {
                status: response.status,
                body: response.body,
            },
            Err(e) => FailureCause::Transport(e.to_string()),
        };

        error!(index, id, cause = %cause, "localization update failed, stopping");
        report.failure = Some(UploadFailure {
            index,
            id: Some(id.to_string()),
            cause,
        });
        break;
    }

    report
}
