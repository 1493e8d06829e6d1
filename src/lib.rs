// Library root
// -----------
// A thin client for the Benchling v1 REST API. The binary (`main.rs`)
// uses these modules to implement the command line and interactive menu.
//
// Module responsibilities:
// - `api`: the transport seam and the `Benchling` client (auth, status
//   checks, JSON parsing).
// - `resources`: sequence and folder accessors, `entities/me`, server search.
// - `alignment`: MAFFT / Clustal Omega alignment submission and task lookup.
// - `catalog`: cached folder/sequence listing with exact or regex search.
// - `format`: GenBank and FASTA output.
// - `share`: share-link resolution.
// - `config`: API key and base URL lookup.
// - `ui`: the dialoguer menu used by `benchling menu`.
pub mod alignment;
pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod resources;
pub mod share;
pub mod ui;

pub use api::{Benchling, HttpTransport, Method, RawResponse, Request, Transport};
pub use catalog::{Catalog, MatchMode};
pub use config::Config;
pub use error::{BenchlingError, Result};
pub use format::Format;
pub use models::{Annotation, Entity, Folder, FolderType, Primer, Sequence, SequenceSummary};
