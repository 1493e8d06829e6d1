// Alignment submission: align query sequences against a template sequence
// with MAFFT or Clustal Omega. Alignments run server-side as tasks.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

use crate::api::{require_id, Benchling, Transport};
use crate::error::Result;
use crate::models::{Alignment, Task};

/// One query to align against the template.
#[derive(Debug, Clone, PartialEq)]
pub enum AlignmentQuery {
    /// A sequence already stored in Benchling.
    SequenceId(String),
    /// A local FASTA or AB1 file, uploaded base64-encoded.
    File(PathBuf),
    /// Pre-encoded data. Unnamed entries become `untitled_<n>`.
    Encoded { name: Option<String>, data: String },
}

impl AlignmentQuery {
    /// Interpret a free-form argument: `seq...` is an id, an existing path is
    /// a file, anything else is already-encoded data.
    pub fn parse(arg: &str) -> Self {
        if arg.starts_with("seq") {
            AlignmentQuery::SequenceId(arg.to_string())
        } else if Path::new(arg).exists() {
            AlignmentQuery::File(PathBuf::from(arg))
        } else {
            AlignmentQuery::Encoded {
                name: None,
                data: arg.to_string(),
            }
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MafftOptions {
    pub adjust_direction: String,
    pub max_iterations: u32,
    pub retree: u32,
    pub gap_open_penalty: f64,
    pub gap_extension_penalty: f64,
}

impl Default for MafftOptions {
    fn default() -> Self {
        MafftOptions {
            adjust_direction: "no".into(),
            max_iterations: 0,
            retree: 2,
            gap_open_penalty: 1.53,
            gap_extension_penalty: 0.0,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ClustaloOptions {
    pub max_guidetree_iterations: u32,
    pub max_hmm_iterations: u32,
    pub mbed_guide_tree: String,
    pub mbed_iteration: String,
    pub num_combined_iterations: u32,
}

impl Default for ClustaloOptions {
    fn default() -> Self {
        ClustaloOptions {
            max_guidetree_iterations: 10,
            max_hmm_iterations: 25,
            mbed_guide_tree: "yes".into(),
            mbed_iteration: "yes".into(),
            num_combined_iterations: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Algorithm {
    Mafft(MafftOptions),
    Clustalo(ClustaloOptions),
}

impl Algorithm {
    fn name(&self) -> &'static str {
        match self {
            Algorithm::Mafft(_) => "mafft",
            Algorithm::Clustalo(_) => "clustalo",
        }
    }

    fn options(&self) -> Result<Value> {
        Ok(match self {
            Algorithm::Mafft(o) => serde_json::to_value(o)?,
            Algorithm::Clustalo(o) => serde_json::to_value(o)?,
        })
    }
}

/// Build the `files` list: the template first, then each query.
fn alignment_files(template_id: &str, queries: &[AlignmentQuery]) -> Result<Vec<Value>> {
    let mut files = vec![json!({ "id": template_id })];
    let mut untitled = 0;
    for q in queries {
        let entry = match q {
            AlignmentQuery::SequenceId(id) => json!({ "id": id }),
            AlignmentQuery::File(path) => {
                let data = STANDARD.encode(std::fs::read(path)?);
                let name = path
                    .file_name()
                    .and_then(|s| s.to_str())
                    .unwrap_or("untitled")
                    .to_string();
                json!({ "name": name, "data": data })
            }
            AlignmentQuery::Encoded { name: Some(name), data } => {
                json!({ "name": name, "data": data })
            }
            AlignmentQuery::Encoded { name: None, data } => {
                let name = format!("untitled_{}", untitled);
                untitled += 1;
                json!({ "name": name, "data": data })
            }
        };
        files.push(entry);
    }
    Ok(files)
}

impl<T: Transport> Benchling<T> {
    /// Submit an alignment; the response names the task to poll.
    pub fn submit_alignment(
        &self,
        template_id: &str,
        queries: &[AlignmentQuery],
        algorithm: &Algorithm,
    ) -> Result<Value> {
        let template_id = require_id("template sequence", template_id)?;
        let body = json!({
            "algorithm": algorithm.name(),
            "algorithmOptions": algorithm.options()?,
            "files": alignment_files(template_id, queries)?,
        });
        self.post("alignments", &body)
    }

    pub fn get_alignment(&self, id: &str) -> Result<Alignment> {
        let id = require_id("alignment", id)?;
        self.get(&format!("alignments/{}", id))
    }

    pub fn get_task(&self, id: &str) -> Result<Task> {
        let id = require_id("task", id)?;
        self.get(&format!("tasks/{}", id))
    }
}
