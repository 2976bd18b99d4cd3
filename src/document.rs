//! Document-level audit: slot collection, mutation surface, and offset
//! reconciliation.

use serde::{Deserialize, Serialize};
use tracing::{debug, Level};

use crate::changelog::{ChangeLog, ChangeRecord, RevisionPatch};
use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::token::{EditAction, Token};

/// A tokenized document with one [`ChangeLog`] per token slot.
///
/// Slot order is document order. Slots are only ever added (at ingestion
/// or via [`insert_token`](Self::insert_token)), never removed: a deleted
/// token keeps its slot with an empty-text revision so the change report
/// can always point back at the original.
///
/// The expected call sequence is single-threaded and synchronous:
/// ingest, then zero or more edits chosen by external augmentation logic,
/// then [`reconcile`](Self::reconcile) to produce the change report.
///
/// # Examples
///
/// ```rust
/// use audit::{AuditConfig, Document, EditAction};
///
/// let cfg = AuditConfig::default();
/// let mut doc = Document::ingest("hello world foo", ["hello", "world", "foo"], &cfg)?;
///
/// doc.append_edit(0, "hi", EditAction::Substitute, 1)?;
/// let report = doc.reconcile(0)?;
///
/// assert_eq!(report.len(), 1);
/// assert_eq!(report[0].original_text, "hello");
/// assert_eq!(report[0].new_text, "hi");
/// # Ok::<(), audit::AuditError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    raw_text: String,
    slots: Vec<ChangeLog>,
    total_edit_count: u64,
    config: AuditConfig,
}

impl Document {
    /// Empty document over `raw_text`: no slots until tokens are inserted.
    pub fn new(raw_text: impl Into<String>, config: &AuditConfig) -> Self {
        Self {
            raw_text: raw_text.into(),
            slots: Vec::new(),
            total_edit_count: 0,
            config: config.clone(),
        }
    }

    /// Ingest a tokenized document, deriving each token's original byte
    /// offset by scanning `raw_text` left to right.
    ///
    /// After each token the scan cursor advances by the token length plus
    /// [`separator_width`](AuditConfig::separator_width), which assumes
    /// single-separator tokenization. Offsets drift when the raw text used
    /// variable whitespace; use
    /// [`ingest_with_offsets`](Self::ingest_with_offsets) when the
    /// tokenizer can supply exact positions.
    ///
    /// A token that cannot be found from the current cursor is a
    /// caller-contract violation and fails with
    /// [`AuditError::TokenNotFound`].
    pub fn ingest<I, S>(
        raw_text: impl Into<String>,
        tokens: I,
        config: &AuditConfig,
    ) -> Result<Self, AuditError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let raw_text = raw_text.into();
        let mut slots = Vec::new();
        let mut cursor = 0usize;

        for (index, token) in tokens.into_iter().enumerate() {
            let text: String = token.into();
            let found = raw_text
                .get(cursor..)
                .and_then(|tail| tail.find(&text))
                .ok_or_else(|| AuditError::TokenNotFound {
                    index,
                    text: text.clone(),
                    cursor,
                })?;
            let start = cursor + found;
            cursor += text.len() + config.separator_width;
            slots.push(ChangeLog::new(Token::original(text, start)));
        }

        debug!(slots = slots.len(), raw_len = raw_text.len(), "ingest");
        Ok(Self {
            raw_text,
            slots,
            total_edit_count: 0,
            config: config.clone(),
        })
    }

    /// Ingest from tokenizer-supplied `(text, start)` pairs, bypassing the
    /// single-separator scan approximation of [`ingest`](Self::ingest).
    ///
    /// Starts must be non-decreasing and each token must fit inside
    /// `raw_text`.
    pub fn ingest_with_offsets<I, S>(
        raw_text: impl Into<String>,
        tokens: I,
        config: &AuditConfig,
    ) -> Result<Self, AuditError>
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let raw_text = raw_text.into();
        let mut slots: Vec<ChangeLog> = Vec::new();
        let mut previous = 0usize;

        for (index, (token, start)) in tokens.into_iter().enumerate() {
            let text: String = token.into();
            if start + text.len() > raw_text.len() {
                return Err(AuditError::OffsetOutOfRange {
                    index,
                    start,
                    len: raw_text.len(),
                });
            }
            if start < previous {
                return Err(AuditError::NonMonotonicOffset {
                    index,
                    start,
                    previous,
                });
            }
            previous = start;
            slots.push(ChangeLog::new(Token::original(text, start)));
        }

        debug!(slots = slots.len(), raw_len = raw_text.len(), "ingest_with_offsets");
        Ok(Self {
            raw_text,
            slots,
            total_edit_count: 0,
            config: config.clone(),
        })
    }

    /// Insert a brand-new slot at `index`, shifting subsequent slots right.
    ///
    /// The inserted token has no position until the next reconciliation
    /// pass, and it seeds its own [`ChangeLog`], which starts clean, so
    /// the slot stays out of the change report until an explicit edit
    /// lands on it. Does not count toward
    /// [`total_edit_count`](Self::total_edit_count).
    pub fn insert_token(
        &mut self,
        index: usize,
        text: impl Into<String>,
        action: EditAction,
        change_seq: u64,
    ) -> Result<(), AuditError> {
        if index > self.slots.len() {
            return Err(AuditError::SlotOutOfRange {
                index,
                len: self.slots.len(),
            });
        }
        let text = text.into();
        debug!(index, text = %text, action = %action, change_seq, "insert_token");
        self.slots
            .insert(index, ChangeLog::new(Token::edited(text, action, change_seq)));
        Ok(())
    }

    /// Append a new revision to the slot at `slot_index`.
    pub fn append_edit(
        &mut self,
        slot_index: usize,
        text: impl Into<String>,
        action: EditAction,
        change_seq: u64,
    ) -> Result<(), AuditError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(slot_index)
            .ok_or(AuditError::SlotOutOfRange {
                index: slot_index,
                len,
            })?;
        let text = text.into();
        debug!(slot_index, text = %text, action = %action, change_seq, "append_edit");
        slot.append(text, action, change_seq);
        self.total_edit_count += 1;
        Ok(())
    }

    /// Rewrite an existing revision of the slot at `slot_index` in place.
    ///
    /// With `revision_index` omitted the patch targets the most recent
    /// edit. While the slot has no edits yet that default is revision 0,
    /// the seed; callers overwrite the original label only on purpose.
    pub fn patch_edit(
        &mut self,
        slot_index: usize,
        revision_index: Option<usize>,
        patch: RevisionPatch,
    ) -> Result<(), AuditError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(slot_index)
            .ok_or(AuditError::SlotOutOfRange {
                index: slot_index,
                len,
            })?;
        let revision_index = revision_index.unwrap_or_else(|| slot.edit_count());
        debug!(slot_index, revision_index, "patch_edit");
        slot.patch(revision_index, patch)
    }

    /// The slot at `index`, if any.
    pub fn slot(&self, index: usize) -> Option<&ChangeLog> {
        self.slots.get(index)
    }

    /// Number of slots, including inserted and deleted ones.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// The raw text the document was ingested from.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Number of [`append_edit`](Self::append_edit) calls accepted so far.
    pub fn total_edit_count(&self) -> u64 {
        self.total_edit_count
    }

    /// The configuration snapshot taken at construction.
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Seed texts of all slots, in document order.
    pub fn original_token_texts(&self) -> Vec<String> {
        self.slots
            .iter()
            .map(|slot| slot.original().text.clone())
            .collect()
    }

    /// Latest texts of all slots, in document order, with deleted
    /// (empty-text) slots dropped.
    pub fn current_token_texts(&self) -> Vec<String> {
        self.slots
            .iter()
            .map(ChangeLog::latest)
            .filter(|token| !token.is_empty())
            .map(|token| token.text.clone())
            .collect()
    }

    /// The current document text: latest non-empty token texts joined by
    /// the configured separator width.
    pub fn current_text(&self) -> String {
        self.current_token_texts()
            .join(&" ".repeat(self.config.separator_width))
    }

    /// Re-derive every slot's offset from the current token lengths and
    /// emit the dirty slots as a change report ordered by change sequence.
    ///
    /// The walk stamps the latest revision of every slot, clean ones
    /// included, with its reconciled position starting at `start_offset`;
    /// only the final layout matters for the report, so whatever offset a
    /// revision carried before is overwritten. A deleted token contributes
    /// zero width and no separator, so the gap it leaves collapses.
    ///
    /// The sort is stable: slots sharing a change sequence keep document
    /// order. Under
    /// [`require_change_sequence`](AuditConfig::require_change_sequence)
    /// a dirty slot without a sequence fails the pass with
    /// [`AuditError::MissingChangeSequence`]; in lenient mode such slots
    /// order before all sequenced ones.
    pub fn reconcile(&mut self, start_offset: usize) -> Result<Vec<ChangeRecord>, AuditError> {
        let span = tracing::span!(Level::DEBUG, "audit.reconcile", slots = self.slots.len());
        let _guard = span.enter();

        let mut cursor = start_offset;
        for slot in &mut self.slots {
            slot.update_offset(cursor);
            let width = slot.latest().len();
            cursor += width;
            if width > 0 {
                cursor += self.config.separator_width;
            }
        }

        let mut dirty: Vec<(usize, &ChangeLog)> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_dirty())
            .collect();

        if self.config.require_change_sequence {
            if let Some((slot, _)) = dirty
                .iter()
                .find(|(_, slot)| slot.latest().change_seq.is_none())
            {
                return Err(AuditError::MissingChangeSequence { slot: *slot });
            }
        }

        dirty.sort_by_key(|(_, slot)| slot.latest().change_seq);

        let records: Vec<ChangeRecord> = dirty
            .into_iter()
            .map(|(_, slot)| slot.to_change_record())
            .collect();
        debug!(changed = records.len(), end_offset = cursor, "reconcile_complete");
        Ok(records)
    }

    /// Full-fidelity structured dump of the document and every revision
    /// history, for downstream reporting and serialization.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
