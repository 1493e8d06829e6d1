// Data shapes exchanged with the Benchling v1 API. Field names follow the
// API's camelCase JSON; fields the client does not model are kept in `extra`
// so searches can still reach them.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::BenchlingError;

/// A DNA sequence with its annotations, as returned by `GET sequences/{id}`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sequence {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bases: String,
    #[serde(default)]
    pub circular: bool,
    /// Owning folder id. The API sends either the bare id or a folder object.
    #[serde(
        default,
        deserialize_with = "id_or_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub tags: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub primers: Vec<Primer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
    #[serde(rename = "editURL", default, skip_serializing_if = "Option::is_none")]
    pub edit_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Sequence {
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// The API reports an annotation running to the end of the sequence with
    /// `end == 0`; rewrite those ends to the sequence length.
    pub fn normalize_annotations(&mut self) {
        let len = self.bases.len();
        for a in self.annotations.iter_mut().filter(|a| a.end == 0) {
            a.end = len;
        }
    }
}

/// Annotated feature on a sequence. Positions are 0-based, end-exclusive.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(default)]
    pub name: String,
    pub start: usize,
    pub end: usize,
    #[serde(default = "forward")]
    pub strand: i8,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub feature_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn forward() -> i8 {
    1
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Primer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub bases: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_position: Option<i64>,
    pub start: usize,
    pub end: usize,
    #[serde(default = "forward")]
    pub strand: i8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overhang_length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Short form of a sequence listed inside a folder.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SequenceSummary {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Filled in by the catalog from the enclosing folder.
    #[serde(
        default,
        deserialize_with = "id_or_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub folder: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Folder {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Kept as raw JSON: older responses send an id, newer ones an object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Value>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub folder_type: Option<String>,
    #[serde(default)]
    pub sequences: Vec<SequenceSummary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Folder {
    pub fn sequence_ids(&self) -> Vec<&str> {
        self.sequences.iter().map(|s| s.id.as_str()).collect()
    }
}

/// `GET folders` wraps the list in an object.
#[derive(Deserialize, Debug)]
pub(crate) struct FolderList {
    #[serde(default)]
    pub folders: Vec<Folder>,
}

/// The user (or bot) the API key belongs to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FolderType {
    #[default]
    Inventory,
    Notebook,
    All,
}

impl fmt::Display for FolderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FolderType::Inventory => "INVENTORY",
            FolderType::Notebook => "NOTEBOOK",
            FolderType::All => "ALL",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for FolderType {
    type Err = BenchlingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INVENTORY" => Ok(FolderType::Inventory),
            "NOTEBOOK" => Ok(FolderType::Notebook),
            "ALL" => Ok(FolderType::All),
            other => Err(BenchlingError::InvalidInput(format!(
                "folder type '{}' is not one of INVENTORY, NOTEBOOK, ALL",
                other
            ))),
        }
    }
}

/// Payload for `POST sequences`.
#[derive(Serialize, Debug, Clone, Default)]
pub struct NewSequence {
    pub name: String,
    pub bases: String,
    pub circular: bool,
    pub folder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Payload for `PATCH sequences/{id}`; unset fields are left unchanged.
#[derive(Serialize, Debug, Clone, Default)]
pub struct SequencePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Only honoured by the API for oligos.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bases: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circular: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,
}

/// Payload for `POST folders`.
#[derive(Serialize, Debug, Clone, Default)]
pub struct NewFolder {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Defaults to the API key's own entity when left empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(rename = "type")]
    pub folder_type: FolderType,
}

#[derive(Serialize, Debug, Clone, Default)]
pub struct FolderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub folder_type: Option<FolderType>,
}

/// Asynchronous job (alignments run as tasks).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Alignment {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Accept `"fol_123"` or `{"id": "fol_123", ...}`.
fn id_or_object<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(id)) => Some(id),
        Some(Value::Object(map)) => map.get("id").and_then(Value::as_str).map(str::to_string),
        _ => None,
    })
}
