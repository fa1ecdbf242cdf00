//! The catalog file.
//!
//! A comma-separated file whose first row names the columns. The column
//! order is taken from the file itself, and every write rewrites the whole
//! file: header first, then one row per entry.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::CatalogError;
use crate::id::resolve_id_collision;
use crate::record::{NONE_VALUE, Record};
use crate::types::field;

/// Where [`Catalog::insert`] places a new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Top,
    Bottom,
}

/// All catalog rows, held in memory for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    schema: Vec<String>,
    records: Vec<Record>,
}

impl Catalog {
    /// An empty catalog with the given column order.
    pub fn new(schema: Vec<String>) -> Self {
        Self {
            schema,
            records: Vec::new(),
        }
    }

    /// Load a catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let file = File::open(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let catalog = Self::from_reader(file)?;
        log::debug!(
            "Loaded {} entries ({} columns) from {}",
            catalog.records.len(),
            catalog.schema.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parse catalog text. The first row is the column list.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let schema: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if schema.is_empty() || schema.iter().all(|h| h.is_empty()) {
            return Err(CatalogError::MissingHeader);
        }

        let mut records = Vec::new();
        for (line, row) in reader.records().enumerate() {
            let row = row?;
            if row.len() > schema.len() {
                log::warn!(
                    "Row {} has {} fields, header has {}; extra fields dropped",
                    line + 2,
                    row.len(),
                    schema.len()
                );
            }
            let mut record = Record::new();
            for (name, value) in schema.iter().zip(row.iter()) {
                record.set(name.as_str(), value);
            }
            records.push(record);
        }

        Ok(Self { schema, records })
    }

    /// Write the header and every row.
    ///
    /// Rows end in CRLF and fields are quoted only when they contain a
    /// delimiter, quote, or line break. Missing fields are written as `None`.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), CatalogError> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(writer);

        writer.write_record(&self.schema)?;
        for record in &self.records {
            writer.write_record(
                self.schema
                    .iter()
                    .map(|name| record.get(name).unwrap_or(NONE_VALUE)),
            )?;
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Rewrite the catalog file in full.
    ///
    /// The file handle is closed when this returns, on success or failure.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let file = File::create(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        self.write_to(file)?;
        log::debug!("Wrote {} entries to {}", self.records.len(), path.display());
        Ok(())
    }

    pub fn schema(&self) -> &[String] {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find_by_title(&self, title: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.title() == title)
    }

    /// Add a record before or after all existing rows.
    ///
    /// No duplicate check is done; callers check titles first.
    pub fn insert(&mut self, record: Record, position: Position) {
        match position {
            Position::Top => self.records.insert(0, record),
            Position::Bottom => self.records.push(record),
        }
    }

    /// Drop every row with the record's title and insert it at the top.
    ///
    /// `time_added` is carried over from the replaced row, so it keeps the
    /// value it was first given.
    pub fn replace_by_title(&mut self, mut record: Record) {
        let title = record.title().to_string();
        let original_time = self
            .records
            .iter()
            .filter(|r| r.title() == title)
            .filter_map(|r| r.value(field::TIME_ADDED))
            .filter_map(|t| t.parse::<i64>().ok().map(|v| (v, t.to_string())))
            .min_by_key(|(v, _)| *v)
            .map(|(_, t)| t);
        if let Some(time) = original_time {
            record.set(field::TIME_ADDED, time);
        }

        let before = self.records.len();
        self.records.retain(|r| r.title() != title);
        log::debug!(
            "Replacing {} row(s) titled {:?}",
            before - self.records.len(),
            title
        );
        self.insert(record, Position::Top);
    }

    /// See [`resolve_id_collision`].
    pub fn resolve_id_collision(&self, candidate: &str, title: &str) -> String {
        resolve_id_collision(&self.records, candidate, title)
    }
}
