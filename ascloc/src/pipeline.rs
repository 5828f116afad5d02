//! The interactive fetch, merge and upload flow for one localization kind.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::{
    client::Transport,
    config::Config,
    error::Error,
    fetch::{Fetcher, localization_list, resource_list},
    kind::LocalizationKind,
    merge::{MergedBatch, merge_spreadsheet},
    select::Prompt,
    snapshot::SnapshotStore,
    types::ResourceObject,
    upload::{UploadReport, upload},
};

/// How a pipeline run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user left a menu without choosing.
    Cancelled,
    /// The spreadsheet was not found; nothing was merged or uploaded.
    MissingSpreadsheet(PathBuf),
    /// Merged and written, but not uploaded (dry run or declined).
    Merged(MergedBatch),
    Uploaded {
        batch: MergedBatch,
        report: UploadReport,
    },
}

pub struct Pipeline<'a, T: Transport + ?Sized, P: Prompt> {
    config: &'a Config,
    transport: &'a T,
    prompt: &'a mut P,
    store: SnapshotStore,
}

impl<'a, T: Transport + ?Sized, P: Prompt> Pipeline<'a, T, P> {
    pub fn new(config: &'a Config, transport: &'a T, prompt: &'a mut P) -> Self {
        Pipeline {
            config,
            transport,
            prompt,
            store: SnapshotStore::new(config.data_dir.clone()),
        }
    }

    /// Fetches the app list. An error document aborts with
    /// [`Error::ApiErrors`].
    pub fn apps(&self) -> Result<Vec<ResourceObject>, Error> {
        let document = Fetcher::new(self.transport, &self.store).apps()?;
        resource_list(&document)
    }

    /// Lets the user pick a kind, then runs it.
    pub fn run_menu(&mut self, kinds: &[LocalizationKind]) -> Result<Outcome, Error> {
        let labels: Vec<String> = kinds.iter().map(|k| k.label.to_string()).collect();
        match self.prompt.choose("Select action", &labels)? {
            Some(choice) => self.run(&kinds[choice - 1]),
            None => Ok(Outcome::Cancelled),
        }
    }

    pub fn run(&mut self, kind: &LocalizationKind) -> Result<Outcome, Error> {
        let apps = self.apps()?;
        let labels: Vec<String> = apps
            .iter()
            .map(|app| app.attribute_or_placeholder("name").to_string())
            .collect();
        let Some(choice) = self.prompt.choose("Select application", &labels)? else {
            return Ok(Outcome::Cancelled);
        };
        let app = &apps[choice - 1];
        let app_name = app.attribute_or_placeholder("name");
        let sku = app.attribute("sku").unwrap_or(&app.id);
        self.prompt.notify(&format!("You chose {}", app_name))?;

        let fetcher = Fetcher::new(self.transport, &self.store);
        let parents = resource_list(&fetcher.parents(kind, &app.id, sku)?)?;
        let shown = kind
            .parent_menu_limit
            .map_or(parents.len(), |limit| limit.min(parents.len()));
        let labels: Vec<String> = parents[..shown]
            .iter()
            .map(|parent| kind.parent_label(parent))
            .collect();
        let title = format!("--  Select {} for ({})  --", kind.parent_noun, app_name);
        let Some(choice) = self.prompt.choose(&title, &labels)? else {
            return Ok(Outcome::Cancelled);
        };
        let parent = &parents[choice - 1];
        let parent_label = kind.parent_label(parent);
        self.prompt
            .notify(&format!("You chose {} {}", kind.parent_noun, parent_label))?;

        let server = localization_list(&fetcher.localizations(kind, &parent.id, sku)?)?;
        self.prompt.notify(&format!(
            "-- Found {} localization(s) for {} --",
            server.len(),
            parent_label
        ))?;

        let spreadsheet = self.config.spreadsheet_for(kind);
        if !spreadsheet.is_file() {
            warn!(path = %spreadsheet.display(), "spreadsheet not found");
            self.prompt.notify(&format!(
                "❌ Can't find file: {}",
                spreadsheet.display()
            ))?;
            return Ok(Outcome::MissingSpreadsheet(spreadsheet));
        }

        let batch = merge_spreadsheet(
            &server,
            &spreadsheet,
            kind,
            &self.config.merged_file,
            self.config.duplicate_policy,
        )?;
        self.report_merge(&batch)?;

        if self.config.dry_run {
            self.prompt.notify("Dry-run mode: nothing was uploaded")?;
            return Ok(Outcome::Merged(batch));
        }
        if !self.config.assume_yes {
            let question = format!(
                "Upload {} localization(s) to App Store for {} and {}: {}?",
                batch.len(),
                app_name,
                kind.parent_noun,
                parent_label
            );
            if !self.prompt.confirm(&question, Some(true))? {
                self.prompt.notify("Upload skipped")?;
                return Ok(Outcome::Merged(batch));
            }
        }

        let prompt = &mut *self.prompt;
        let report = upload(self.transport, kind, &batch.records, |index, id| {
            let message = format!("✅ Localization {} (id {}) sent", index + 1, id);
            if let Err(e) = prompt.notify(&message) {
                warn!(index, id, error = %e, "could not report upload progress");
            }
        });
        self.report_upload(&report)?;
        info!(success = report.is_success(), "upload finished");

        Ok(Outcome::Uploaded { batch, report })
    }

    fn report_merge(&mut self, batch: &MergedBatch) -> Result<(), Error> {
        let report = &batch.report;
        let output = report
            .output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.prompt.notify(&format!(
            "Merged {} row(s), {} matched, written to '{}'",
            report.rows, report.matched, output
        ))?;
        for unmatched in &report.unmatched {
            self.prompt.notify(&format!(
                "  row {}: no server localization for locale {}",
                unmatched.row + 1,
                unmatched.locale.as_deref().unwrap_or("<empty>")
            ))?;
        }
        Ok(())
    }

    fn report_upload(&mut self, report: &UploadReport) -> Result<(), Error> {
        match &report.failure {
            None => self
                .prompt
                .notify(&format!("✅ All {} localization(s) sent", report.total)),
            Some(failure) => {
                self.prompt.notify(&format!("❌ Upload failed: {}", failure))?;
                self.prompt.notify(&format!(
                    "Stopped: {} sent, {} not attempted",
                    report.succeeded.len(),
                    report.skipped()
                ))
            }
        }
    }
}
