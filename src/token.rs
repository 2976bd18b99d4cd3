use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Label describing the edit that produced a token revision.
///
/// The well-known augmentation labels get their own variants; anything
/// else a strategy invents rides in [`EditAction::Other`] so the label set
/// stays open, matching the free-form tags used upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditAction {
    Original,
    Insert,
    Substitute,
    Swap,
    Delete,
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for EditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditAction::Original => f.write_str("original"),
            EditAction::Insert => f.write_str("insert"),
            EditAction::Substitute => f.write_str("substitute"),
            EditAction::Swap => f.write_str("swap"),
            EditAction::Delete => f.write_str("delete"),
            EditAction::Other(label) => f.write_str(label),
        }
    }
}

impl FromStr for EditAction {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "original" => EditAction::Original,
            "insert" => EditAction::Insert,
            "substitute" => EditAction::Substitute,
            "swap" => EditAction::Swap,
            "delete" => EditAction::Delete,
            other => EditAction::Other(other.to_string()),
        })
    }
}

/// One revision of a token: its text plus the provenance of the edit that
/// produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// The token text. Empty means the token was deleted; its slot is kept
    /// so the change report can still reference the original.
    pub text: String,
    /// UTF-8 byte offset of this revision in the document, or `None` if
    /// the revision has not been positioned yet.
    pub start: Option<usize>,
    /// Edit label that produced this revision.
    pub action: EditAction,
    /// Externally assigned global ordering key. `None` only on original,
    /// unedited revisions.
    pub change_seq: Option<u64>,
}

impl Token {
    /// An `original` revision, as produced at ingestion.
    pub fn original(text: impl Into<String>, start: usize) -> Self {
        Self {
            text: text.into(),
            start: Some(start),
            action: EditAction::Original,
            change_seq: None,
        }
    }

    /// A revision produced by an edit. It carries no position until the
    /// next reconciliation pass stamps one.
    pub fn edited(text: impl Into<String>, action: EditAction, change_seq: u64) -> Self {
        Self {
            text: text.into(),
            start: None,
            action,
            change_seq: Some(change_seq),
        }
    }

    /// Byte length of the token text.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// True when this revision represents a deletion.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.text.as_str()
    }
}
