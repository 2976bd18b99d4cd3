//! Configuration for document ingestion and reconciliation.

use serde::{Deserialize, Serialize};

/// Controls how a [`Document`](crate::Document) derives and reconciles
/// token offsets.
///
/// The defaults reproduce the classic behavior of the augmentation
/// pipelines this library serves: tokens separated by a single space, and
/// a hard requirement that every edit carries a change sequence number.
///
/// # Examples
///
/// ```rust
/// use audit::AuditConfig;
///
/// let cfg = AuditConfig::default();
/// assert_eq!(cfg.separator_width, 1);
/// assert!(cfg.require_change_sequence);
///
/// // Lenient mode: sequence-less edits sort before all sequenced ones
/// // instead of failing the reconciliation pass.
/// let lenient = AuditConfig {
///     require_change_sequence: false,
///     ..Default::default()
/// };
/// # let _ = lenient;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditConfig {
    /// Byte width of the separator assumed between consecutive tokens.
    ///
    /// Used both when deriving original offsets at ingestion and when
    /// re-deriving offsets during reconciliation. This is an approximation:
    /// if the raw text used variable whitespace, derived offsets drift.
    /// Callers that need exact fidelity should use
    /// [`Document::ingest_with_offsets`](crate::Document::ingest_with_offsets)
    /// instead.
    pub separator_width: usize,

    /// If true, [`Document::reconcile`](crate::Document::reconcile) fails
    /// fast when a dirty slot reaches it without a change sequence on its
    /// latest revision. If false, sequence-less slots order before all
    /// sequenced ones in the change report.
    pub require_change_sequence: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            separator_width: 1,
            require_change_sequence: true,
        }
    }
}
