//! Token-level change tracking for augmented text documents.
//!
//! An external augmentation strategy decides *what* to edit; this crate
//! keeps the audit trail. Each token slot owns an ordered revision
//! history, a one-way dirty flag marks slots that have been edited, and a
//! reconciliation pass re-derives every slot's offset from the current
//! token lengths before emitting the dirty slots as a change report
//! ordered by change sequence.
//!
//! ## What we do
//!
//! - Ingest a tokenized document and derive original byte offsets
//! - Record append/patch/insert edits against individual token slots
//! - Re-derive document offsets after edits change token lengths
//! - Emit a sequence-ordered report of every changed slot
//!
//! ## Invariants worth knowing
//!
//! - A slot's first revision is always its seed; edits append or rewrite
//!   in place, never remove
//! - Dirty is one-way: once a slot has seen an edit it stays dirty
//! - Deletion is an empty-text revision, not slot removal: deleted slots
//!   keep their identity and collapse their separator at reconciliation
//! - Change sequences are assigned by the caller; this crate only stores
//!   and sorts by them
//!
//! No I/O, no clock calls, no hidden counters. Same document and same
//! edit stream, same report on any machine.

mod changelog;
mod config;
mod document;
mod error;
mod token;

pub use crate::changelog::{ChangeLog, ChangeRecord, RevisionPatch};
pub use crate::config::AuditConfig;
pub use crate::document::Document;
pub use crate::error::AuditError;
pub use crate::token::{EditAction, Token};

#[cfg(test)]
mod tests {
    use super::*;

    fn three_token_doc() -> Document {
        Document::ingest("hello world foo", ["hello", "world", "foo"], &AuditConfig::default())
            .expect("ingest succeeds")
    }

    #[test]
    fn ingest_derives_original_offsets() {
        let doc = three_token_doc();

        assert_eq!(
            doc.original_token_texts(),
            vec!["hello", "world", "foo"]
        );
        let starts: Vec<Option<usize>> = (0..doc.slot_count())
            .map(|i| doc.slot(i).expect("slot exists").original().start)
            .collect();
        assert_eq!(starts, vec![Some(0), Some(6), Some(12)]);
        assert_eq!(doc.total_edit_count(), 0);
    }

    #[test]
    fn substitute_then_reconcile_shifts_following_slots() {
        let mut doc = three_token_doc();
        doc.append_edit(0, "hi", EditAction::Substitute, 1)
            .expect("slot 0 exists");

        let report = doc.reconcile(0).expect("reconcile succeeds");

        assert_eq!(report.len(), 1);
        let record = &report[0];
        assert_eq!(record.original_text, "hello");
        assert_eq!(record.original_start, Some(0));
        assert_eq!(record.new_text, "hi");
        assert_eq!(record.new_start, Some(0));
        assert_eq!(record.change_seq, Some(1));
        assert_eq!(record.action, EditAction::Substitute);

        // "world" moves from byte 6 to byte 3 (len("hi") + separator).
        let world = doc.slot(1).expect("slot 1 exists");
        assert_eq!(world.latest().start, Some(3));
    }

    #[test]
    fn inserted_slot_stays_clean_until_edited() {
        let mut doc = three_token_doc();
        doc.insert_token(1, "brand", EditAction::Insert, 1)
            .expect("index 1 is valid");

        assert_eq!(
            doc.original_token_texts(),
            vec!["hello", "brand", "world", "foo"]
        );
        // Inserting does not count as an edit and does not dirty the slot.
        assert_eq!(doc.total_edit_count(), 0);
        assert!(!doc.slot(1).expect("slot 1 exists").is_dirty());
        assert!(doc.reconcile(0).expect("reconcile succeeds").is_empty());

        // Only an explicit edit brings the slot into the report.
        doc.append_edit(1, "brand", EditAction::Insert, 2)
            .expect("slot 1 exists");
        let report = doc.reconcile(0).expect("reconcile succeeds");
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].new_text, "brand");
        assert_eq!(report[0].new_start, Some(6));
    }

    #[test]
    fn deletion_collapses_separator() {
        let cfg = AuditConfig::default();
        let mut doc = Document::ingest("a b c", ["a", "b", "c"], &cfg).expect("ingest succeeds");
        doc.append_edit(1, "", EditAction::Delete, 1).expect("slot 1 exists");

        let report = doc.reconcile(0).expect("reconcile succeeds");
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].new_text, "");

        // The deleted slot contributes zero width and zero separator, so
        // "c" lands right after "a ".
        assert_eq!(doc.slot(2).expect("slot 2 exists").latest().start, Some(2));
        assert_eq!(doc.current_token_texts(), vec!["a", "c"]);
        assert_eq!(doc.current_text(), "a c");
    }

    #[test]
    fn append_is_idempotently_dirtying() {
        let mut doc = three_token_doc();
        doc.append_edit(2, "bar", EditAction::Substitute, 1).expect("slot 2");
        let slot = doc.slot(2).expect("slot 2 exists");
        assert!(slot.is_dirty());
        assert_eq!(slot.edit_count(), 1);

        for seq in 2..5 {
            doc.append_edit(2, "baz", EditAction::Substitute, seq).expect("slot 2");
        }
        let slot = doc.slot(2).expect("slot 2 exists");
        assert!(slot.is_dirty());
        assert_eq!(slot.edit_count(), 4);
        assert_eq!(slot.revision_count(), 5);
        assert_eq!(doc.total_edit_count(), 4);
    }

    #[test]
    fn patch_can_clear_text_to_empty() {
        let mut doc = three_token_doc();
        doc.append_edit(0, "x", EditAction::Substitute, 1).expect("slot 0");

        // Explicit Some("") really clears the text; there is no implicit
        // "empty means unset" rule.
        doc.patch_edit(
            0,
            None,
            RevisionPatch {
                text: Some(String::new()),
                ..Default::default()
            },
        )
        .expect("patch succeeds");

        assert_eq!(doc.slot(0).expect("slot 0 exists").latest().text, "");
    }

    #[test]
    fn patch_defaults_to_latest_edit() {
        let mut doc = three_token_doc();
        doc.append_edit(0, "first", EditAction::Substitute, 1).expect("slot 0");
        doc.append_edit(0, "second", EditAction::Substitute, 2).expect("slot 0");

        doc.patch_edit(
            0,
            None,
            RevisionPatch {
                text: Some("patched".into()),
                ..Default::default()
            },
        )
        .expect("patch succeeds");

        let slot = doc.slot(0).expect("slot 0 exists");
        assert_eq!(slot.latest().text, "patched");
        // The earlier edit is untouched.
        let texts: Vec<&str> = slot.revisions().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["hello", "first", "patched"]);
    }

    #[test]
    fn patch_with_no_fields_still_marks_dirty() {
        let mut doc = three_token_doc();
        doc.patch_edit(1, Some(0), RevisionPatch::default()).expect("patch succeeds");
        assert!(doc.slot(1).expect("slot 1 exists").is_dirty());
    }

    #[test]
    fn clean_document_reconciles_to_empty_report() {
        let mut doc = three_token_doc();
        let report = doc.reconcile(0).expect("reconcile succeeds");
        assert!(report.is_empty());

        // The walk still stamps reconciled offsets on every slot.
        let starts: Vec<Option<usize>> = (0..doc.slot_count())
            .map(|i| doc.slot(i).expect("slot exists").latest().start)
            .collect();
        assert_eq!(starts, vec![Some(0), Some(6), Some(12)]);
    }

    #[test]
    fn reconcile_honors_start_offset() {
        let mut doc = three_token_doc();
        doc.reconcile(100).expect("reconcile succeeds");
        assert_eq!(doc.slot(0).expect("slot 0 exists").latest().start, Some(100));
        assert_eq!(doc.slot(1).expect("slot 1 exists").latest().start, Some(106));
    }

    #[test]
    fn edit_action_labels_round_trip() {
        let action: EditAction = "substitute".parse().expect("infallible");
        assert_eq!(action, EditAction::Substitute);
        assert_eq!(action.to_string(), "substitute");

        let custom: EditAction = "back_translate".parse().expect("infallible");
        assert_eq!(custom, EditAction::Other("back_translate".into()));
        assert_eq!(
            serde_json::to_string(&custom).expect("serialize"),
            "\"back_translate\""
        );
        assert_eq!(
            serde_json::from_str::<EditAction>("\"delete\"").expect("deserialize"),
            EditAction::Delete
        );
    }

    #[test]
    fn ingest_with_offsets_uses_supplied_positions() {
        let cfg = AuditConfig::default();
        // Double-spaced text the cursor-scan approximation would mis-place.
        let doc = Document::ingest_with_offsets(
            "hello  world",
            [("hello".to_string(), 0), ("world".to_string(), 7)],
            &cfg,
        )
        .expect("ingest succeeds");

        assert_eq!(doc.slot(1).expect("slot 1 exists").original().start, Some(7));
    }
}
