//! Raw catalog rows.
//!
//! A [`Record`] holds a row exactly as it appears in the catalog file, keyed
//! by column name. Passing rows through as text (rather than through
//! [`Entry`](crate::Entry)) keeps untouched rows byte-identical on rewrite.

use std::collections::BTreeMap;

use crate::error::CatalogError;
use crate::types::{EntryType, field};

/// Token written for any field without a value.
pub const NONE_VALUE: &str = "None";

/// One catalog row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    values: BTreeMap<String, String>,
}

/// A field whose value differs between two records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: String,
    pub old: Option<String>,
    pub new: Option<String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw text of a column, if the row has it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Column value with blanks and the `None` token treated as absent.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name)
            .filter(|v| !v.trim().is_empty() && *v != NONE_VALUE)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn id(&self) -> &str {
        self.get(field::ID).unwrap_or("")
    }

    pub fn title(&self) -> &str {
        self.get(field::TITLE).unwrap_or("")
    }

    pub fn download_url(&self) -> Option<&str> {
        self.value(field::DOWNLOAD_URL)
    }

    pub fn download_src(&self) -> Option<&str> {
        self.value(field::DOWNLOAD_SRC)
    }

    pub fn entry_type(&self) -> Result<EntryType, CatalogError> {
        let raw = self
            .value(field::TYPE)
            .ok_or_else(|| CatalogError::UnknownEntryType(String::new()))?;
        raw.parse()
    }

    /// Fields whose values differ from `other`, in column-name order.
    pub fn diff(&self, other: &Record) -> Vec<FieldChange> {
        let mut names: Vec<&String> = self.values.keys().chain(other.values.keys()).collect();
        names.sort();
        names.dedup();

        names
            .into_iter()
            .filter_map(|name| {
                let old = self.values.get(name);
                let new = other.values.get(name);
                (old != new).then(|| FieldChange {
                    field: name.clone(),
                    old: old.cloned(),
                    new: new.cloned(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_hides_none_token() {
        let mut r = Record::new();
        r.set(field::DOWNLOAD_SRC, "None");
        r.set(field::DOWNLOAD_README, "");
        r.set(field::DOWNLOAD_URL, "https://example.com/a.vpk");

        assert_eq!(r.get(field::DOWNLOAD_SRC), Some("None"));
        assert_eq!(r.download_src(), None);
        assert_eq!(r.value(field::DOWNLOAD_README), None);
        assert_eq!(r.download_url(), Some("https://example.com/a.vpk"));
    }

    #[test]
    fn test_entry_type() {
        let mut r = Record::new();
        assert!(r.entry_type().is_err());
        r.set(field::TYPE, "PLUGIN");
        assert_eq!(r.entry_type().unwrap(), EntryType::Plugin);
        r.set(field::TYPE, "SKIN");
        assert!(matches!(r.entry_type(), Err(CatalogError::UnknownEntryType(t)) if t == "SKIN"));
    }

    #[test]
    fn test_diff() {
        let mut a = Record::new();
        a.set(field::TITLE, "Same");
        a.set(field::ID, "OLD00001");
        a.set(field::CREDITS, "x");

        let mut b = a.clone();
        b.set(field::ID, "NEW00001");
        b.set(field::OPTIONS, "ux0:data");

        let changes = a.diff(&b);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].field, field::ID);
        assert_eq!(changes[0].old.as_deref(), Some("OLD00001"));
        assert_eq!(changes[0].new.as_deref(), Some("NEW00001"));
        assert_eq!(changes[1].field, field::OPTIONS);
        assert_eq!(changes[1].old, None);
        assert!(a.diff(&a).is_empty());
    }
}
