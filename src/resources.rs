// Resource accessors: one thin handle per REST collection. Each call checks
// its required identifiers, builds the endpoint path and lets the client do
// the HTTP and JSON work.

use log::info;
use serde::de::Error as _;
use serde_json::{json, Value};
use std::collections::HashSet;

use crate::api::{require_id, Benchling, Transport};
use crate::error::{BenchlingError, Result};
use crate::models::{
    Entity, Folder, FolderList, FolderPatch, NewFolder, NewSequence, Sequence, SequencePatch,
};

impl<T: Transport> Benchling<T> {
    /// Accessor for the `sequences` collection.
    pub fn sequences(&self) -> Sequences<'_, T> {
        Sequences { api: self }
    }

    /// Accessor for the `folders` collection.
    pub fn folders(&self) -> Folders<'_, T> {
        Folders { api: self }
    }

    /// The entity that owns the API key.
    pub fn me(&self) -> Result<Entity> {
        self.get("entities/me")
    }

    /// One page of the server-side search endpoint.
    pub fn search(&self, query: &SearchQuery) -> Result<Vec<Value>> {
        if query.query.trim().is_empty() {
            return Err(BenchlingError::InvalidInput("search query is empty".into()));
        }
        let body = json!({
            "query": query.query,
            "queryType": query.query_type,
            "limit": query.limit,
            "offset": query.offset,
        });
        let value: Value = self.post("search", &body)?;
        match value {
            Value::Array(items) => Ok(items),
            Value::Object(mut map) => match map.remove("results") {
                Some(Value::Array(items)) => Ok(items),
                Some(Value::Null) | None => Ok(Vec::new()),
                Some(other) => Err(serde_json::Error::custom(format!(
                    "search results should be a list, got {}",
                    other
                ))
                .into()),
            },
            other => Err(serde_json::Error::custom(format!(
                "unexpected search response {}",
                other
            ))
            .into()),
        }
    }

    /// Walk the search endpoint page by page, advancing `offset` by `limit`
    /// until a short or empty page comes back.
    pub fn search_pages(&self, query: SearchQuery) -> Result<SearchPages<'_, T>> {
        if query.limit == 0 {
            return Err(BenchlingError::InvalidInput("search limit must be positive".into()));
        }
        Ok(SearchPages {
            api: self,
            query,
            done: false,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub query: String,
    pub query_type: String,
    pub limit: usize,
    pub offset: usize,
}

impl SearchQuery {
    pub fn text(query: impl Into<String>) -> Self {
        SearchQuery {
            query: query.into(),
            query_type: "text".into(),
            limit: 10,
            offset: 0,
        }
    }
}

pub struct SearchPages<'a, T: Transport> {
    api: &'a Benchling<T>,
    query: SearchQuery,
    done: bool,
}

impl<T: Transport> Iterator for SearchPages<'_, T> {
    type Item = Result<Vec<Value>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.api.search(&self.query) {
            Ok(page) => {
                if page.len() < self.query.limit {
                    self.done = true;
                }
                if page.is_empty() {
                    return None;
                }
                self.query.offset += self.query.limit;
                Some(Ok(page))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

pub struct Sequences<'a, T: Transport> {
    api: &'a Benchling<T>,
}

impl<T: Transport> Sequences<'_, T> {
    /// Fetch one sequence. Annotations ending at 0 are extended to the
    /// sequence length.
    pub fn get(&self, id: &str) -> Result<Sequence> {
        let id = require_id("sequence", id)?;
        let mut seq: Sequence = self.api.get(&format!("sequences/{}", id))?;
        seq.normalize_annotations();
        Ok(seq)
    }

    /// Create a sequence and return the full record the server stored.
    ///
    /// The API does not echo the new id, so the target folder is listed
    /// before and after the post and the new same-named entry is picked.
    /// With `overwrite`, existing sequences of the same name in the folder
    /// are deleted first.
    pub fn create(&self, new: &NewSequence, overwrite: bool) -> Result<Sequence> {
        if new.name.trim().is_empty() {
            return Err(BenchlingError::InvalidInput("sequence name is required".into()));
        }
        let folders = self.api.folders();
        let before = folders.get(&new.folder)?;
        let previous: HashSet<&str> = before.sequences.iter().map(|s| s.id.as_str()).collect();
        if overwrite {
            for old in before.sequences.iter().filter(|s| s.name == new.name) {
                info!("overwrite on: deleting sequence {}", old.id);
                self.delete(&old.id)?;
            }
        }

        let _: Value = self.api.post("sequences", new)?;
        info!("created sequence '{}' in folder {}", new.name, new.folder);

        let after = folders.get(&new.folder)?;
        let created = after
            .sequences
            .iter()
            .find(|s| s.name == new.name && !previous.contains(s.id.as_str()))
            .ok_or_else(|| BenchlingError::Creation(new.name.clone()))?;
        self.get(&created.id)
    }

    pub fn patch(&self, id: &str, patch: &SequencePatch) -> Result<Sequence> {
        let id = require_id("sequence", id)?;
        let mut seq: Sequence = self.api.patch(&format!("sequences/{}", id), patch)?;
        seq.normalize_annotations();
        Ok(seq)
    }

    pub fn delete(&self, id: &str) -> Result<Value> {
        let id = require_id("sequence", id)?;
        info!("deleting sequence {}", id);
        self.api.delete(&format!("sequences/{}", id))
    }
}

pub struct Folders<'a, T: Transport> {
    api: &'a Benchling<T>,
}

impl<T: Transport> Folders<'_, T> {
    /// All folders visible to the API key, each with its sequence summaries.
    pub fn list(&self) -> Result<Vec<Folder>> {
        let value: Value = self.api.get("folders")?;
        if let Some(err) = value.get("error") {
            return Err(BenchlingError::Login(err.to_string()));
        }
        let list: FolderList = serde_json::from_value(value)?;
        Ok(list.folders)
    }

    pub fn get(&self, id: &str) -> Result<Folder> {
        let id = require_id("folder", id)?;
        self.api.get(&format!("folders/{}", id))
    }

    /// Create a folder; an unset owner becomes the API key's own entity.
    pub fn create(&self, new: &NewFolder) -> Result<Folder> {
        if new.name.trim().is_empty() {
            return Err(BenchlingError::InvalidInput("folder name is required".into()));
        }
        let mut payload = new.clone();
        if payload.owner.is_none() {
            payload.owner = Some(self.api.me()?.id);
        }
        let folder: Folder = self.api.post("folders", &payload)?;
        info!("created folder '{}' ({})", folder.name, folder.id);
        Ok(folder)
    }

    pub fn patch(&self, id: &str, patch: &FolderPatch) -> Result<Folder> {
        let id = require_id("folder", id)?;
        self.api.patch(&format!("folders/{}", id), patch)
    }

    pub fn delete(&self, id: &str) -> Result<Value> {
        let id = require_id("folder", id)?;
        info!("deleting folder {}", id);
        self.api.delete(&format!("folders/{}", id))
    }
}
