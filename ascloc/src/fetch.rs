//! Read requests whose responses are persisted as snapshots.
//!
//! Every read stores whatever body came back, error documents included, and
//! then hands the parsed document to the caller. Non-2xx responses are logged
//! but not turned into errors here; callers decide via [`data_list`].

use serde_json::Value;
use tracing::{error, info};

use crate::{
    client::Transport,
    error::Error,
    kind::LocalizationKind,
    snapshot::{APPS_SNAPSHOT, SnapshotStore},
    types::{LocalizationRecord, ResourceObject, data_list},
};

pub const APPS_ENDPOINT: &str = "/v1/apps";

pub struct Fetcher<'a, T: Transport + ?Sized> {
    transport: &'a T,
    store: &'a SnapshotStore,
}

impl<'a, T: Transport + ?Sized> Fetcher<'a, T> {
    pub fn new(transport: &'a T, store: &'a SnapshotStore) -> Self {
        Fetcher { transport, store }
    }

    /// `GET /v1/apps`, stored as `apps.json`.
    pub fn apps(&self) -> Result<Value, Error> {
        let document = self.read(APPS_ENDPOINT)?;
        self.store.write_root(APPS_SNAPSHOT, &document)?;
        Ok(document)
    }

    /// Versions or events of an app, depending on `kind`.
    pub fn parents(&self, kind: &LocalizationKind, app_id: &str, sku: &str) -> Result<Value, Error> {
        let document = self.read(&kind.parents_path(app_id))?;
        self.store.write_app(sku, kind.parents_snapshot, &document)?;
        Ok(document)
    }

    /// Localizations of a version or event.
    pub fn localizations(
        &self,
        kind: &LocalizationKind,
        parent_id: &str,
        sku: &str,
    ) -> Result<Value, Error> {
        let document = self.read(&kind.localizations_path(parent_id))?;
        self.store.write_app(sku, kind.localizations_snapshot, &document)?;
        Ok(document)
    }

    fn read(&self, path: &str) -> Result<Value, Error> {
        let response = self.transport.get(path)?;
        if response.is_success() {
            info!(path, status = response.status, "fetched");
        } else {
            error!(path, status = response.status, body = %response.body, "request failed");
        }
        Ok(response.json())
    }
}

/// Parses a listing of apps, versions or events.
pub fn resource_list(document: &Value) -> Result<Vec<ResourceObject>, Error> {
    data_list(document)
}

/// Parses a listing of localizations.
pub fn localization_list(document: &Value) -> Result<Vec<LocalizationRecord>, Error> {
    data_list(document)
}
