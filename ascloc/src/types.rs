//! Core JSON:API shaped types for ascloc.
//! Spreadsheet rows decode into these; the merge engine and uploader consume them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// Name of the attribute that carries the join key.
pub const LOCALE_ATTRIBUTE: &str = "locale";

/// Free-form attribute bag of a resource object.
pub type Attributes = Map<String, Value>;

/// The `{"data": ...}` envelope used by every request and response body,
/// and by the merged output file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Document<T> {
    pub data: T,
}

impl<T> Document<T> {
    pub fn new(data: T) -> Self {
        Document { data }
    }
}

/// One locale's editable text fields for an app version or an in-app event.
///
/// `id` is absent on records read from a spreadsheet and present on records
/// returned by the server. It is omitted from the JSON output when absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LocalizationRecord {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,

    /// JSON:API `type` tag, e.g. `appStoreVersionLocalizations`.
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub attributes: Attributes,
}

impl LocalizationRecord {
    /// Creates a record with no identifier.
    pub fn new(kind: impl Into<String>, attributes: Attributes) -> Self {
        LocalizationRecord {
            id: None,
            kind: kind.into(),
            attributes,
        }
    }

    /// Returns the locale when it is present and a string.
    pub fn locale(&self) -> Option<&str> {
        self.attributes
            .get(LOCALE_ATTRIBUTE)
            .and_then(Value::as_str)
    }

    /// Removes the locale attribute, returning it if it was a string.
    pub fn take_locale(&mut self) -> Option<String> {
        match self.attributes.remove(LOCALE_ATTRIBUTE) {
            Some(Value::String(locale)) => Some(locale),
            _ => None,
        }
    }

    /// Returns a string attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(Value::as_str)
    }
}

/// An app, app store version or app event as returned by a listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceObject {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub attributes: Attributes,
}

impl ResourceObject {
    /// Returns a string attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(Value::as_str)
    }

    /// Returns a string attribute, or `"?"` when it is missing.
    pub fn attribute_or_placeholder(&self, name: &str) -> &str {
        self.attribute(name).unwrap_or("?")
    }
}

/// Summarises the `errors` array of an API error document, if there is one.
pub fn error_summary(document: &Value) -> Option<String> {
    let errors = document.get("errors")?.as_array()?;
    let parts: Vec<String> = errors
        .iter()
        .map(|e| {
            let status = e.get("status").and_then(Value::as_str).unwrap_or("?");
            let detail = e
                .get("detail")
                .or_else(|| e.get("title"))
                .and_then(Value::as_str)
                .unwrap_or("no detail");
            format!("[{}] {}", status, detail)
        })
        .collect();
    Some(parts.join("; "))
}

/// Extracts the `data` array of a listing response.
///
/// Error documents are turned into [`Error::ApiErrors`].
pub fn data_list<T: serde::de::DeserializeOwned>(document: &Value) -> Result<Vec<T>, Error> {
    if let Some(summary) = error_summary(document) {
        return Err(Error::ApiErrors(summary));
    }
    let data = document
        .get("data")
        .ok_or_else(|| Error::InvalidResource("response has no `data` member".to_string()))?;
    Ok(serde_json::from_value(data.clone())?)
}
