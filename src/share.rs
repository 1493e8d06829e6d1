// Share-link resolution. A share link (`https://benchling.com/s/<token>`)
// points at a public page that mentions the sequence id; folder-style URLs
// carry the id in their path instead.

use log::debug;
use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

use crate::api::{Benchling, Transport};
use crate::error::{BenchlingError, Result};
use crate::models::Sequence;

const SEQUENCE_ID_PATTERN: &str = r"seq_\w+";

static SHARE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://benchling\.com/s/(\w+)").expect("share link pattern compiles")
});
static SEQUENCE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SEQUENCE_ID_PATTERN).expect("sequence id pattern compiles"));
static FOLDER_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"benchling\.com/(?P<user>\w+)/f/(?P<folder_id>\w+)-(?P<folder_name>\w+)/seq-(?P<seq_id>\w+)-(?P<seq_name>[a-zA-Z0-9_-]+)",
    )
    .expect("folder url pattern compiles")
});

/// Pieces of a folder-style sequence URL,
/// `benchling.com/<user>/f/<folder_id>-<folder_name>/seq-<id>-<name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceUrl {
    pub user: String,
    pub folder_id: String,
    pub folder_name: String,
    /// Full API id, `seq_` prefix included.
    pub sequence_id: String,
    pub sequence_name: String,
}

pub fn parse_sequence_url(url: &str) -> Option<SequenceUrl> {
    let caps = FOLDER_URL.captures(url)?;
    Some(SequenceUrl {
        user: caps["user"].to_string(),
        folder_id: caps["folder_id"].to_string(),
        folder_name: caps["folder_name"].to_string(),
        sequence_id: format!("seq_{}", &caps["seq_id"]),
        sequence_name: caps["seq_name"].to_string(),
    })
}

/// Check that `link` looks like `https://benchling.com/s/<token>`.
pub fn verify_share_link(link: &str) -> Result<()> {
    if SHARE_LINK.is_match(link) {
        Ok(())
    } else {
        Err(BenchlingError::ShareLink(format!(
            "share link incorrectly formatted, expected https://benchling.com/s/<token>, found {}",
            link
        )))
    }
}

/// Visible text of an HTML page: text nodes only, without tags, attribute
/// values, scripts or styles.
pub fn page_text(page: &str) -> String {
    let doc = Html::parse_document(page);
    let mut text = String::new();
    for node in doc.root_element().descendants() {
        let Some(t) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element().map(|e| e.name()))
            .is_some_and(|name| matches!(name, "script" | "style" | "noscript" | "template"));
        if !hidden {
            text.push_str(t);
            text.push(' ');
        }
    }
    text
}

/// Distinct `seq_...` ids in the visible text of a page, in order of
/// first appearance.
pub fn sequence_ids_in_page(page: &str) -> Vec<String> {
    let text = page_text(page);
    let mut ids: Vec<String> = Vec::new();
    for m in SEQUENCE_ID.find_iter(&text) {
        if !ids.iter().any(|id| id == m.as_str()) {
            ids.push(m.as_str().to_string());
        }
    }
    ids
}

impl<T: Transport> Benchling<T> {
    fn sequence_id_from_page(&self, link: &str) -> Result<String> {
        verify_share_link(link)?;
        let page = self.fetch_page(link)?;
        let mut ids = sequence_ids_in_page(&page);
        match ids.len() {
            0 => Err(BenchlingError::ShareLink(format!(
                "no sequence ids found in share link page using pattern {}",
                SEQUENCE_ID_PATTERN
            ))),
            1 => Ok(ids.remove(0)),
            n => Err(BenchlingError::ShareLink(format!(
                "{} possible sequence ids found in share link page using pattern {}",
                n, SEQUENCE_ID_PATTERN
            ))),
        }
    }

    /// Work out which sequence a link refers to. The share page is read
    /// first; if the link is not a share link or the page does not name
    /// exactly one sequence, the link is parsed as a folder-style URL.
    pub fn sequence_id_from_share_link(&self, link: &str) -> Result<String> {
        match self.sequence_id_from_page(link) {
            Ok(id) => Ok(id),
            Err(BenchlingError::ShareLink(reason)) => {
                debug!("{}; trying to read the id from the url", reason);
                parse_sequence_url(link)
                    .map(|parts| parts.sequence_id)
                    .ok_or_else(|| {
                        BenchlingError::ShareLink(format!(
                            "could not find a sequence id in the share link body or url ({})",
                            reason
                        ))
                    })
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve a share link and fetch the sequence it points at.
    pub fn sequence_from_share_link(&self, link: &str) -> Result<Sequence> {
        let id = self.sequence_id_from_share_link(link)?;
        self.sequences().get(&id)
    }
}
