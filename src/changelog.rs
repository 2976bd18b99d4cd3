//! Per-slot revision history.
//!
//! A [`ChangeLog`] owns the ordered list of [`Token`] revisions for one
//! token slot. The seed revision is fixed at construction; edits either
//! append a new revision or rewrite an existing one in place. The dirty
//! flag flips on the first mutation and never clears.

use serde::{Deserialize, Serialize};

use crate::error::AuditError;
use crate::token::{EditAction, Token};

/// Field-level update for [`ChangeLog::patch`].
///
/// `None` leaves the corresponding field untouched; `Some` overwrites it.
/// `Some(String::new())` really does clear a revision's text; there is no
/// implicit "empty means unset" rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevisionPatch {
    pub text: Option<String>,
    pub action: Option<EditAction>,
    pub change_seq: Option<u64>,
}

/// Flattened before/after snapshot of one slot, as emitted by
/// [`Document::reconcile`](crate::Document::reconcile).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeRecord {
    /// Text of the seed revision.
    pub original_text: String,
    /// Offset of the seed revision.
    pub original_start: Option<usize>,
    /// Text of the latest revision.
    pub new_text: String,
    /// Reconciled offset of the latest revision.
    pub new_start: Option<usize>,
    /// Change sequence of the latest revision.
    pub change_seq: Option<u64>,
    /// Edit label of the latest revision.
    pub action: EditAction,
}

/// Ordered revision history for a single token slot.
///
/// Revision 0 is always the seed token the log was constructed with;
/// [`append`](Self::append) grows the history by one revision and
/// [`patch`](Self::patch) rewrites one in place. Storing the seed apart
/// from the appended edits makes "revision 0 is the seed" hold by
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeLog {
    original: Token,
    edits: Vec<Token>,
    dirty: bool,
}

impl ChangeLog {
    /// Build a log seeded with `original`.
    ///
    /// The log starts clean no matter what `original.action` says: the
    /// dirty flag is only ever flipped by [`append`](Self::append) and
    /// [`patch`](Self::patch), never derived from the seed. A slot
    /// inserted mid-document therefore stays out of the change report
    /// until an explicit edit lands on it.
    pub fn new(original: Token) -> Self {
        Self {
            original,
            edits: Vec::new(),
            dirty: false,
        }
    }

    /// The seed revision.
    pub fn original(&self) -> &Token {
        &self.original
    }

    /// The most recent revision, or the seed while no edit has been applied.
    pub fn latest(&self) -> &Token {
        self.edits.last().unwrap_or(&self.original)
    }

    fn latest_mut(&mut self) -> &mut Token {
        if let Some(last) = self.edits.last_mut() {
            last
        } else {
            &mut self.original
        }
    }

    /// Number of edits applied, excluding the seed revision.
    pub fn edit_count(&self) -> usize {
        self.edits.len()
    }

    /// Total number of revisions, including the seed.
    pub fn revision_count(&self) -> usize {
        1 + self.edits.len()
    }

    /// True once any edit has been applied.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Iterate over all revisions in order, seed first.
    pub fn revisions(&self) -> impl Iterator<Item = &Token> {
        std::iter::once(&self.original).chain(self.edits.iter())
    }

    /// Append a new revision produced by an edit and mark the log dirty.
    ///
    /// The revision carries no position; the next reconciliation pass
    /// stamps one.
    pub fn append(&mut self, text: impl Into<String>, action: EditAction, change_seq: u64) {
        self.edits.push(Token::edited(text, action, change_seq));
        self.dirty = true;
    }

    /// Rewrite the revision at `revision_index` in place (0 targets the
    /// seed) and mark the log dirty.
    ///
    /// Patch always marks the log dirty, even when every field of `patch`
    /// is `None`.
    pub fn patch(&mut self, revision_index: usize, patch: RevisionPatch) -> Result<(), AuditError> {
        let len = self.revision_count();
        let revision = match revision_index {
            0 => &mut self.original,
            i if i < len => &mut self.edits[i - 1],
            i => return Err(AuditError::RevisionOutOfRange { index: i, len }),
        };
        if let Some(text) = patch.text {
            revision.text = text;
        }
        if let Some(action) = patch.action {
            revision.action = action;
        }
        if let Some(change_seq) = patch.change_seq {
            revision.change_seq = Some(change_seq);
        }
        self.dirty = true;
        Ok(())
    }

    /// Stamp the latest revision with its reconciled document offset.
    ///
    /// Only the positional field is touched; dirtiness is unaffected. This
    /// runs during document-wide offset reconciliation, not during editing.
    pub fn update_offset(&mut self, new_offset: usize) {
        self.latest_mut().start = Some(new_offset);
    }

    /// Snapshot combining the seed revision with the latest one.
    ///
    /// Meaningful on dirty logs; on a clean log the two sides coincide.
    pub fn to_change_record(&self) -> ChangeRecord {
        let latest = self.latest();
        ChangeRecord {
            original_text: self.original.text.clone(),
            original_start: self.original.start,
            new_text: latest.text.clone(),
            new_start: latest.start,
            change_seq: latest.change_seq,
            action: latest.action.clone(),
        }
    }
}
