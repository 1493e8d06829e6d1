// Client-side cache of folders and their sequences, with field search.
//
// The catalog is filled from one `GET folders` call. Every sequence summary
// is tagged with the id of the folder it was listed in, so searches can
// filter on `folder` as well as `name` or `id`.

use log::warn;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

use crate::api::{Benchling, Transport};
use crate::error::{BenchlingError, Result};
use crate::models::{Folder, Sequence, SequenceSummary};

/// How a field value is compared against the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// The field's text equals the query.
    #[default]
    Exact,
    /// The query is a regular expression found anywhere in the field.
    Regex,
}

enum Matcher {
    Exact(String),
    Pattern(Regex),
}

impl Matcher {
    fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::Exact(expected) => text == expected,
            Matcher::Pattern(re) => re.is_match(text),
        }
    }
}

/// Text form of a JSON field: strings as-is, everything else as JSON.
fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Keep the records whose every listed field matches, in input order.
///
/// Fields are looked up on the record's JSON form, so any field the API
/// returned can be searched. A field missing from a record is an error.
pub fn filter_records<'a, R: Serialize>(
    records: &'a [R],
    fields: &[(&str, &str)],
    mode: MatchMode,
) -> Result<Vec<&'a R>> {
    let mut matchers = Vec::with_capacity(fields.len());
    for &(field, query) in fields {
        let m = match mode {
            MatchMode::Exact => Matcher::Exact(query.to_string()),
            MatchMode::Regex => Matcher::Pattern(Regex::new(query)?),
        };
        matchers.push((field, m));
    }

    let mut found = Vec::new();
    for record in records {
        let json = serde_json::to_value(record)?;
        let mut keep = true;
        for (field, matcher) in &matchers {
            let value = json
                .get(field)
                .ok_or_else(|| BenchlingError::UnknownField(field.to_string()))?;
            if !matcher.is_match(&field_text(value)) {
                keep = false;
                break;
            }
        }
        if keep {
            found.push(record);
        }
    }
    Ok(found)
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    folders: Vec<Folder>,
    sequences: Vec<SequenceSummary>,
}

impl Catalog {
    pub fn load<T: Transport>(api: &Benchling<T>) -> Result<Self> {
        Ok(Self::from_folders(api.folders().list()?))
    }

    /// Build a catalog from already fetched folders.
    pub fn from_folders(folders: Vec<Folder>) -> Self {
        let mut seen = HashSet::new();
        let mut sequences = Vec::new();
        for folder in &folders {
            for s in &folder.sequences {
                if seen.insert(s.id.clone()) {
                    let mut s = s.clone();
                    s.folder = Some(folder.id.clone());
                    sequences.push(s);
                }
            }
        }
        Catalog { folders, sequences }
    }

    /// Drop the cached lists and reload them from the API.
    pub fn refresh<T: Transport>(&mut self, api: &Benchling<T>) -> Result<()> {
        *self = Self::load(api)?;
        Ok(())
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn sequences(&self) -> &[SequenceSummary] {
        &self.sequences
    }

    pub fn filter_sequences(
        &self,
        fields: &[(&str, &str)],
        mode: MatchMode,
    ) -> Result<Vec<&SequenceSummary>> {
        filter_records(&self.sequences, fields, mode)
    }

    pub fn filter_folders(&self, fields: &[(&str, &str)], mode: MatchMode) -> Result<Vec<&Folder>> {
        filter_records(&self.folders, fields, mode)
    }

    pub fn sequence_exists(&self, field: &str, value: &str, mode: MatchMode) -> Result<bool> {
        Ok(!self.filter_sequences(&[(field, value)], mode)?.is_empty())
    }

    pub fn folder_exists(&self, field: &str, value: &str, mode: MatchMode) -> Result<bool> {
        Ok(!self.filter_folders(&[(field, value)], mode)?.is_empty())
    }

    /// Fetch the full record of the first cached sequence matching the query.
    pub fn find_sequence<T: Transport>(
        &self,
        api: &Benchling<T>,
        field: &str,
        value: &str,
        mode: MatchMode,
    ) -> Result<Sequence> {
        let hits = self.filter_sequences(&[(field, value)], mode)?;
        let first = first_hit(hits, field, value)?;
        api.sequences().get(&first.id)
    }

    pub fn find_folder<T: Transport>(
        &self,
        api: &Benchling<T>,
        field: &str,
        value: &str,
        mode: MatchMode,
    ) -> Result<Folder> {
        let hits = self.filter_folders(&[(field, value)], mode)?;
        let first = first_hit(hits, field, value)?;
        api.folders().get(&first.id)
    }
}

fn first_hit<'a, R>(hits: Vec<&'a R>, field: &str, value: &str) -> Result<&'a R> {
    if hits.len() > 1 {
        warn!(
            "{} items found with {} '{}', returning the first",
            hits.len(),
            field,
            value
        );
    }
    hits.into_iter().next().ok_or_else(|| BenchlingError::NoMatch {
        field: field.to_string(),
        value: value.to_string(),
    })
}
