use thiserror::Error;

/// Errors that can occur while building or reconciling a document audit.
///
/// Every variant is a caller-contract violation (bad index, untracked
/// token, missing sequence), not an environmental failure; they surface
/// immediately and synchronously.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditError {
    #[error("token {index} ({text:?}) not found in raw text from byte {cursor}")]
    TokenNotFound {
        index: usize,
        text: String,
        cursor: usize,
    },
    #[error("token {index} start {start} exceeds raw text length {len}")]
    OffsetOutOfRange {
        index: usize,
        start: usize,
        len: usize,
    },
    #[error("token {index} start {start} precedes previous token start {previous}")]
    NonMonotonicOffset {
        index: usize,
        start: usize,
        previous: usize,
    },
    #[error("slot index {index} out of range for document with {len} slots")]
    SlotOutOfRange { index: usize, len: usize },
    #[error("revision index {index} out of range for change log with {len} revisions")]
    RevisionOutOfRange { index: usize, len: usize },
    #[error("slot {slot} is dirty but its latest revision has no change sequence")]
    MissingChangeSequence { slot: usize },
}
