//! Data model types for the homebrew catalog.
//!
//! [`Entry`] is a finished, validated catalog row. Entries are built through
//! [`EntryDraft`], which holds every field as optional until [`EntryDraft::finalize`]
//! checks that the fields required for the entry's type are present.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::CatalogError;
use crate::id::synthesize_id;
use crate::record::{NONE_VALUE, Record};

// ── Field names ─────────────────────────────────────────────────────────────

/// Column names used by the catalog file.
pub mod field {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const CREDITS: &str = "credits";
    pub const TYPE: &str = "type";
    pub const DOWNLOAD_URL: &str = "download_url";
    pub const DOWNLOAD_SRC: &str = "download_src";
    pub const DOWNLOAD_README: &str = "download_readme";
    pub const DOWNLOAD_ICON0: &str = "download_icon0";
    pub const CONFIG_TYPE: &str = "config_type";
    pub const OPTIONS: &str = "options";
    pub const VISIBLE: &str = "visible";
    pub const TIME_ADDED: &str = "time_added";
}

/// Fields every entry must have, regardless of type.
const BASE_REQUIRED: &[&str] = &[
    field::ID,
    field::TITLE,
    field::CREDITS,
    field::DOWNLOAD_URL,
    field::VISIBLE,
    field::TYPE,
    field::TIME_ADDED,
];

// ── Entry type ──────────────────────────────────────────────────────────────

/// Kind of downloadable artifact an entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    /// Installable application package (`.vpk`)
    Vpk,
    /// Kernel or user plugin (`.suprx` / `.skprx`)
    Plugin,
    /// Data files extracted to a path on the device
    Data,
}

impl EntryType {
    pub const ALL: [EntryType; 3] = [EntryType::Vpk, EntryType::Plugin, EntryType::Data];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vpk => "VPK",
            Self::Plugin => "PLUGIN",
            Self::Data => "DATA",
        }
    }

    /// Guess the type from the download URL's extension.
    pub fn from_download_url(url: &str) -> Self {
        let ext = url.rsplit('.').next().unwrap_or("");
        if ext.eq_ignore_ascii_case("vpk") {
            Self::Vpk
        } else if ext.eq_ignore_ascii_case("suprx") || ext.eq_ignore_ascii_case("skprx") {
            Self::Plugin
        } else {
            Self::Data
        }
    }

    /// Release asset name suffix expected for this type.
    ///
    /// Plugins match both `.suprx` and `.skprx`; data entries accept any file.
    pub fn asset_suffix(&self) -> &'static str {
        match self {
            Self::Vpk => ".vpk",
            Self::Plugin => "prx",
            Self::Data => "",
        }
    }

    /// Fields required in addition to the base set.
    fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Vpk => &[field::DOWNLOAD_ICON0],
            Self::Plugin => &[field::CONFIG_TYPE, field::OPTIONS],
            Self::Data => &[field::OPTIONS],
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::UnknownEntryType(s.to_string()))
    }
}

// ── Plugin config type ──────────────────────────────────────────────────────

/// How a plugin is registered on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigType {
    /// Listed in taiHEN's `config.txt` under one or more title sections
    Tai,
    /// Loaded at boot
    Boot,
}

impl ConfigType {
    pub const ALL: [ConfigType; 2] = [ConfigType::Tai, ConfigType::Boot];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tai => "TAI",
            Self::Boot => "BOOT",
        }
    }
}

impl std::fmt::Display for ConfigType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::invalid_value(field::CONFIG_TYPE, s))
    }
}

// ── Entry ───────────────────────────────────────────────────────────────────

/// A validated catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: String,
    pub title: String,
    pub entry_type: EntryType,
    pub download_url: String,
    pub download_src: Option<String>,
    pub download_readme: Option<String>,
    pub download_icon0: Option<String>,
    pub credits: String,
    pub config_type: Option<ConfigType>,
    pub options: Option<String>,
    pub visible: bool,
    time_added: i64,
    /// Columns present in the catalog file that the model does not know about
    pub extra: BTreeMap<String, String>,
}

impl Entry {
    /// Unix timestamp of creation. Never changes after the entry is built.
    pub fn time_added(&self) -> i64 {
        self.time_added
    }

    /// Convert to a catalog row, writing `None` for every absent value.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        for (name, value) in &self.extra {
            record.set(name.as_str(), normalize(Some(value.as_str())));
        }
        record.set(field::ID, normalize(Some(&self.id)));
        record.set(field::TITLE, normalize(Some(&self.title)));
        record.set(field::CREDITS, normalize(Some(&self.credits)));
        record.set(field::TYPE, self.entry_type.as_str());
        record.set(field::DOWNLOAD_URL, normalize(Some(&self.download_url)));
        record.set(field::DOWNLOAD_SRC, normalize(self.download_src.as_deref()));
        record.set(field::DOWNLOAD_README, normalize(self.download_readme.as_deref()));
        record.set(field::DOWNLOAD_ICON0, normalize(self.download_icon0.as_deref()));
        record.set(
            field::CONFIG_TYPE,
            normalize(self.config_type.as_ref().map(ConfigType::as_str)),
        );
        record.set(field::OPTIONS, normalize(self.options.as_deref()));
        record.set(field::VISIBLE, format_bool(self.visible));
        record.set(field::TIME_ADDED, self.time_added.to_string());
        record
    }
}

/// Trim a value, substituting the `None` token when it is absent or blank.
fn normalize(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NONE_VALUE.to_string(),
    }
}

fn format_bool(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

// ── Draft ───────────────────────────────────────────────────────────────────

/// A partially populated entry.
///
/// Fields are filled in as information becomes available (source host,
/// package metadata, user input) and checked once by [`finalize`](Self::finalize).
#[derive(Debug, Clone, Default)]
pub struct EntryDraft {
    pub id: Option<String>,
    pub title: Option<String>,
    pub entry_type: Option<EntryType>,
    pub download_url: Option<String>,
    pub download_src: Option<String>,
    pub download_readme: Option<String>,
    pub download_icon0: Option<String>,
    pub credits: Option<String>,
    pub config_type: Option<ConfigType>,
    pub options: Option<String>,
    pub visible: Option<bool>,
    pub time_added: Option<i64>,
    pub extra: BTreeMap<String, String>,
}

impl EntryDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `time_added` to the current time unless already set.
    pub fn stamp_time_added(&mut self) {
        if self.time_added.is_none() {
            self.time_added = Some(chrono::Utc::now().timestamp());
        }
    }

    /// Identifier to suggest when the package did not provide one.
    pub fn default_id(&self) -> Option<String> {
        self.title.as_deref().map(synthesize_id)
    }

    /// Every field this draft needs before it can be finalized.
    pub fn required_fields(&self) -> Vec<&'static str> {
        let mut fields = BASE_REQUIRED.to_vec();
        if let Some(t) = self.entry_type {
            fields.extend_from_slice(t.required_fields());
        }
        fields
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required_fields().contains(&name)
    }

    /// Required fields that are still unset.
    pub fn missing_required(&self) -> Vec<&'static str> {
        self.required_fields()
            .into_iter()
            .filter(|f| self.get_field(f).is_none())
            .collect()
    }

    /// Current value of a column, formatted as it would be written.
    pub fn get_field(&self, name: &str) -> Option<String> {
        let value = match name {
            field::ID => self.id.clone(),
            field::TITLE => self.title.clone(),
            field::CREDITS => self.credits.clone(),
            field::TYPE => self.entry_type.map(|t| t.as_str().to_string()),
            field::DOWNLOAD_URL => self.download_url.clone(),
            field::DOWNLOAD_SRC => self.download_src.clone(),
            field::DOWNLOAD_README => self.download_readme.clone(),
            field::DOWNLOAD_ICON0 => self.download_icon0.clone(),
            field::CONFIG_TYPE => self.config_type.map(|c| c.as_str().to_string()),
            field::OPTIONS => self.options.clone(),
            field::VISIBLE => self.visible.map(|v| format_bool(v).to_string()),
            field::TIME_ADDED => self.time_added.map(|t| t.to_string()),
            other => self.extra.get(other).cloned(),
        };
        value.filter(|v| !v.trim().is_empty() && v != NONE_VALUE)
    }

    /// Set a column from text. Blank input leaves the field unset.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), CatalogError> {
        let value = value.trim();
        if value.is_empty() || value == NONE_VALUE {
            return Ok(());
        }
        let text = Some(value.to_string());
        match name {
            field::ID => self.id = text,
            field::TITLE => self.title = text,
            field::CREDITS => self.credits = text,
            field::TYPE => self.entry_type = Some(value.parse()?),
            field::DOWNLOAD_URL => self.download_url = text,
            field::DOWNLOAD_SRC => self.download_src = text,
            field::DOWNLOAD_README => self.download_readme = text,
            field::DOWNLOAD_ICON0 => self.download_icon0 = text,
            field::CONFIG_TYPE => self.config_type = Some(value.parse()?),
            field::OPTIONS => self.options = text,
            field::VISIBLE => {
                self.visible = Some(
                    parse_bool(value)
                        .ok_or_else(|| CatalogError::invalid_value(field::VISIBLE, value))?,
                )
            }
            field::TIME_ADDED => {
                self.time_added = Some(
                    value
                        .parse()
                        .map_err(|_| CatalogError::invalid_value(field::TIME_ADDED, value))?,
                )
            }
            other => {
                self.extra.insert(other.to_string(), value.to_string());
            }
        }
        Ok(())
    }

    /// Validate the draft and build the entry.
    pub fn finalize(self) -> Result<Entry, CatalogError> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(CatalogError::MissingFields(missing));
        }

        let trimmed = |v: Option<String>| {
            v.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty() && s != NONE_VALUE)
        };

        // missing_required() guarantees these are present.
        let (
            Some(id),
            Some(title),
            Some(entry_type),
            Some(download_url),
            Some(credits),
            Some(visible),
            Some(time_added),
        ) = (
            trimmed(self.id),
            trimmed(self.title),
            self.entry_type,
            trimmed(self.download_url),
            trimmed(self.credits),
            self.visible,
            self.time_added,
        )
        else {
            return Err(CatalogError::MissingFields(BASE_REQUIRED.to_vec()));
        };

        Ok(Entry {
            id,
            title,
            entry_type,
            download_url,
            download_src: trimmed(self.download_src),
            download_readme: trimmed(self.download_readme),
            download_icon0: trimmed(self.download_icon0),
            credits,
            config_type: self.config_type,
            options: trimmed(self.options),
            visible,
            time_added,
            extra: self.extra,
        })
    }
}
