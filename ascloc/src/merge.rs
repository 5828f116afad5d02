//! Locale-keyed join of spreadsheet rows against server localizations.
//!
//! Every spreadsheet row becomes exactly one output record, in row order. A
//! row whose locale matches a server record receives that record's `id`; the
//! `locale` attribute is removed from every output record whether it matched
//! or not.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::{
    error::Error,
    kind::LocalizationKind,
    spreadsheet::read_spreadsheet,
    traits::write_json_file,
    types::{Document, LocalizationRecord},
};

/// How to treat a locale that appears more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail the merge and name the duplicated locale (default).
    #[default]
    Reject,
    /// Keep the first server record for a locale.
    First,
    /// Keep the last server record for a locale.
    Last,
}

/// A spreadsheet row whose locale matched no server record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedRow {
    /// Zero-based data row index.
    pub row: usize,
    pub locale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergeReport {
    pub rows: usize,
    pub matched: usize,
    pub unmatched: Vec<UnmatchedRow>,
    /// Where the merged batch was written, when it was.
    pub output: Option<PathBuf>,
}

impl MergeReport {
    pub fn all_matched(&self) -> bool {
        self.unmatched.is_empty()
    }
}

/// Records ready for upload, plus what happened while merging them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergedBatch {
    pub records: Vec<LocalizationRecord>,
    pub report: MergeReport,
}

impl MergedBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Writes `{"data": [...]}` to `path`, replacing its content.
    pub fn write_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        write_json_file(path, &Document::new(&self.records))?;
        self.report.output = Some(path.to_path_buf());
        Ok(())
    }
}

/// Builds the `locale -> id` index over server records.
///
/// Records without an `id` or a string locale cannot be targeted and are
/// skipped.
pub fn build_locale_index(
    server: &[LocalizationRecord],
    policy: DuplicatePolicy,
) -> Result<HashMap<String, String>, Error> {
    let mut index = HashMap::with_capacity(server.len());
    for record in server {
        let (Some(id), Some(locale)) = (record.id.as_ref(), record.locale()) else {
            warn!(id = ?record.id, "server localization without id or locale, skipping");
            continue;
        };
        match policy {
            DuplicatePolicy::Reject if index.contains_key(locale) => {
                return Err(Error::DuplicateLocale {
                    locale: locale.to_string(),
                    source_name: "server localizations",
                });
            }
            DuplicatePolicy::First => {
                index.entry(locale.to_string()).or_insert_with(|| id.clone());
            }
            DuplicatePolicy::Reject | DuplicatePolicy::Last => {
                index.insert(locale.to_string(), id.clone());
            }
        }
    }
    Ok(index)
}

/// Joins spreadsheet rows against server records without touching the disk.
pub fn merge_records(
    server: &[LocalizationRecord],
    rows: Vec<LocalizationRecord>,
    policy: DuplicatePolicy,
) -> Result<MergedBatch, Error> {
    let index = build_locale_index(server, policy)?;

    if policy == DuplicatePolicy::Reject {
        let mut seen = HashSet::new();
        for locale in rows.iter().filter_map(LocalizationRecord::locale) {
            if !seen.insert(locale) {
                return Err(Error::DuplicateLocale {
                    locale: locale.to_string(),
                    source_name: "spreadsheet",
                });
            }
        }
    }

    let mut report = MergeReport {
        rows: rows.len(),
        ..MergeReport::default()
    };
    let mut records = Vec::with_capacity(rows.len());
    for (row, mut record) in rows.into_iter().enumerate() {
        let locale = record.take_locale();
        match locale.as_ref().and_then(|l| index.get(l)) {
            Some(id) => {
                debug!(row, locale = ?locale, id = %id, "matched localization");
                record.id = Some(id.clone());
                report.matched += 1;
            }
            None => {
                warn!(row, locale = ?locale, "no server localization for locale");
                report.unmatched.push(UnmatchedRow { row, locale });
            }
        }
        records.push(record);
    }

    Ok(MergedBatch { records, report })
}

/// Reads `spreadsheet`, joins it against `server` and writes the merged batch
/// to `output`.
pub fn merge_spreadsheet<P: AsRef<Path>, Q: AsRef<Path>>(
    server: &[LocalizationRecord],
    spreadsheet: P,
    kind: &LocalizationKind,
    output: Q,
    policy: DuplicatePolicy,
) -> Result<MergedBatch, Error> {
    let rows = read_spreadsheet(spreadsheet.as_ref(), kind)?;
    let mut batch = merge_records(server, rows, policy)?;
    batch.write_to_file(output.as_ref())?;
    info!(
        rows = batch.report.rows,
        matched = batch.report.matched,
        output = %output.as_ref().display(),
        "merged localizations"
    );
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Attributes;
    use serde_json::{Value, json};

    fn server(id: &str, locale: &str) -> LocalizationRecord {
        serde_json::from_value(json!({
            "id": id,
            "type": "appStoreVersionLocalizations",
            "attributes": {"locale": locale, "whatsNew": "old"}
        }))
        .unwrap()
    }

    fn row(locale: Option<&str>, whats_new: &str) -> LocalizationRecord {
        let mut attributes = Attributes::new();
        attributes.insert(
            "locale".to_string(),
            locale.map(|l| Value::String(l.to_string())).unwrap_or(Value::Null),
        );
        attributes.insert("whatsNew".to_string(), json!(whats_new));
        LocalizationRecord::new("appStoreVersionLocalizations", attributes)
    }

    #[test]
    fn test_matched_and_unmatched_rows() {
        let server = vec![server("a1", "en-US"), server("a2", "fr-FR")];
        let rows = vec![row(Some("en-US"), "Fixed bugs"), row(Some("de-DE"), "Neu")];
        let batch = merge_records(&server, rows, DuplicatePolicy::Reject).unwrap();

        assert_eq!(
            serde_json::to_value(&batch.records).unwrap(),
            json!([
                {"id": "a1", "type": "appStoreVersionLocalizations", "attributes": {"whatsNew": "Fixed bugs"}},
                {"type": "appStoreVersionLocalizations", "attributes": {"whatsNew": "Neu"}}
            ])
        );
        assert_eq!(batch.report.rows, 2);
        assert_eq!(batch.report.matched, 1);
        assert_eq!(
            batch.report.unmatched,
            vec![UnmatchedRow {
                row: 1,
                locale: Some("de-DE".to_string())
            }]
        );
        assert!(!batch.report.all_matched());
    }

    #[test]
    fn test_locale_never_survives_merge() {
        let server = vec![server("a1", "en-US")];
        let rows = vec![row(Some("en-US"), "x"), row(None, "y"), row(Some("ja"), "z")];
        let batch = merge_records(&server, rows, DuplicatePolicy::Reject).unwrap();
        assert_eq!(batch.len(), 3);
        assert!(batch.records.iter().all(|r| !r.attributes.contains_key("locale")));
        assert_eq!(batch.report.unmatched[0].locale, None);
    }

    #[test]
    fn test_empty_spreadsheet_gives_empty_batch() {
        let batch = merge_records(&[server("a1", "en-US")], Vec::new(), DuplicatePolicy::Reject)
            .unwrap();
        assert!(batch.is_empty());
        assert!(batch.report.all_matched());
    }

    #[test]
    fn test_duplicate_server_locale_policies() {
        let server = vec![server("a1", "en-US"), server("a2", "en-US")];

        let err = build_locale_index(&server, DuplicatePolicy::Reject).unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateLocale { ref locale, source_name: "server localizations" } if locale == "en-US"
        ));

        let first = build_locale_index(&server, DuplicatePolicy::First).unwrap();
        assert_eq!(first["en-US"], "a1");

        let last = build_locale_index(&server, DuplicatePolicy::Last).unwrap();
        assert_eq!(last["en-US"], "a2");
    }

    #[test]
    fn test_duplicate_spreadsheet_locale() {
        let server = vec![server("a1", "en-US")];
        let rows = || vec![row(Some("en-US"), "one"), row(Some("en-US"), "two")];

        let err = merge_records(&server, rows(), DuplicatePolicy::Reject).unwrap_err();
        assert!(matches!(err, Error::DuplicateLocale { source_name: "spreadsheet", .. }));

        let batch = merge_records(&server, rows(), DuplicatePolicy::Last).unwrap();
        assert_eq!(batch.len(), 2);
        assert!(batch.records.iter().all(|r| r.id.as_deref() == Some("a1")));
    }

    #[test]
    fn test_null_locales_are_not_duplicates() {
        let rows = vec![row(None, "one"), row(None, "two")];
        let batch = merge_records(&[], rows, DuplicatePolicy::Reject).unwrap();
        assert_eq!(batch.report.unmatched.len(), 2);
    }

    #[test]
    fn test_server_records_without_id_are_skipped() {
        let mut anonymous = server("x", "en-US");
        anonymous.id = None;
        let index = build_locale_index(&[anonymous, server("a2", "fr-FR")], DuplicatePolicy::Reject)
            .unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index["fr-FR"], "a2");
    }
}
