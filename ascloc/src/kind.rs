//! Descriptors for the localization resources ascloc can sync.
//!
//! App version localizations and in-app event localizations only differ in
//! data: endpoints, snapshot names and the spreadsheet columns they read. The
//! pipeline is written once against [`LocalizationKind`].

use std::{fmt::Display, str::FromStr};

use crate::{error::Error, types::ResourceObject};

/// Placeholder substituted by the endpoint templates.
const ID_PLACEHOLDER: &str = "{id}";

/// Maps one spreadsheet column header to an API attribute name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub attribute: &'static str,
}

impl Column {
    pub const fn same(name: &'static str) -> Self {
        Column {
            header: name,
            attribute: name,
        }
    }

    pub const fn renamed(header: &'static str, attribute: &'static str) -> Self {
        Column { header, attribute }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalizationKind {
    /// Short name used on the command line.
    pub name: &'static str,
    /// Human label used in menus.
    pub label: &'static str,
    /// JSON:API `type` of the localization resource.
    pub resource_type: &'static str,
    /// Spreadsheet column holding the locale.
    pub locale_column: &'static str,
    /// Editable columns, excluding the locale.
    pub columns: &'static [Column],
    /// Noun for the parent resource ("version", "event").
    pub parent_noun: &'static str,
    /// Lists parents of an app; `{id}` is the app id.
    pub parents_endpoint: &'static str,
    pub parents_snapshot: &'static str,
    /// Attributes rendered as `"{0}, status:{1}"` in the parent menu.
    pub parent_label_attributes: (&'static str, &'static str),
    /// Number of parents offered in the menu, newest first.
    pub parent_menu_limit: Option<usize>,
    /// Lists localizations of a parent; `{id}` is the parent id.
    pub localizations_endpoint: &'static str,
    pub localizations_snapshot: &'static str,
    /// Partial update of one localization; `{id}` is the localization id.
    pub patch_endpoint: &'static str,
    pub default_spreadsheet: &'static str,
}

pub const VERSION_LOCALIZATIONS: LocalizationKind = LocalizationKind {
    name: "version",
    label: "App Store version localizations",
    resource_type: "appStoreVersionLocalizations",
    locale_column: "locale",
    columns: &[Column::same("promotionalText"), Column::same("whatsNew")],
    parent_noun: "version",
    parents_endpoint: "/v1/apps/{id}/appStoreVersions",
    parents_snapshot: "versions.json",
    parent_label_attributes: ("versionString", "appStoreState"),
    parent_menu_limit: Some(5),
    localizations_endpoint: "/v1/appStoreVersions/{id}/appStoreVersionLocalizations",
    localizations_snapshot: "version_localizations.json",
    patch_endpoint: "/v1/appStoreVersionLocalizations/{id}",
    default_spreadsheet: "TestLocalization.xlsx",
};

pub const EVENT_LOCALIZATIONS: LocalizationKind = LocalizationKind {
    name: "event",
    label: "In-app event localizations",
    resource_type: "appEventLocalizations",
    locale_column: "locale",
    columns: &[
        Column::same("name"),
        Column::renamed("short", "shortDescription"),
        Column::renamed("long", "longDescription"),
    ],
    parent_noun: "event",
    parents_endpoint: "/v1/apps/{id}/appEvents",
    parents_snapshot: "events.json",
    parent_label_attributes: ("referenceName", "eventState"),
    parent_menu_limit: None,
    localizations_endpoint: "/v1/appEvents/{id}/localizations",
    localizations_snapshot: "event_localizations.json",
    patch_endpoint: "/v1/appEventLocalizations/{id}",
    default_spreadsheet: "EventLocalization.xlsx",
};

/// Every kind, in top-level menu order.
pub const ALL_KINDS: [LocalizationKind; 2] = [VERSION_LOCALIZATIONS, EVENT_LOCALIZATIONS];

impl LocalizationKind {
    pub fn parents_path(&self, app_id: &str) -> String {
        expand(self.parents_endpoint, app_id)
    }

    pub fn localizations_path(&self, parent_id: &str) -> String {
        expand(self.localizations_endpoint, parent_id)
    }

    pub fn patch_path(&self, localization_id: &str) -> String {
        expand(self.patch_endpoint, localization_id)
    }

    /// Menu label for a version or event.
    pub fn parent_label(&self, parent: &ResourceObject) -> String {
        let (title, status) = self.parent_label_attributes;
        format!(
            "{}, status:{}",
            parent.attribute_or_placeholder(title),
            parent.attribute_or_placeholder(status)
        )
    }
}

impl Display for LocalizationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

impl FromStr for LocalizationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ALL_KINDS
            .iter()
            .find(|kind| kind.name == normalized || kind.resource_type.eq_ignore_ascii_case(&normalized))
            .copied()
            .ok_or_else(|| {
                Error::config_error(format!(
                    "unknown localization kind `{}` (expected one of: {})",
                    s,
                    ALL_KINDS.map(|k| k.name).join(", ")
                ))
            })
    }
}

fn expand(template: &str, id: &str) -> String {
    template.replace(ID_PLACEHOLDER, id)
}
