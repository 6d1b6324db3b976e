//! Change records produced by the reconciliation engine.
//!
//! A reconciliation run yields a [`ReconcilePlan`]: the executable
//! change records plus everything that was classified as removable
//! but deliberately suppressed.

use serde::{Deserialize, Serialize};

use crate::snapshot::Entry;

/// A single attribute-level mutation inside a `ModifyEntry` record.
///
/// `values` is never empty; the engine drops ops with nothing to
/// carry. There is intentionally no value-removal op: differences
/// that would require one are classified as [`DeleteCandidate`]s
/// instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum AttributeOp {
    /// Replace every value of `attribute` with `values`.
    Replace {
        attribute: String,
        values: Vec<String>,
    },

    /// Add `values` to `attribute`, keeping the target's existing values.
    Add {
        attribute: String,
        values: Vec<String>,
    },
}

impl AttributeOp {
    /// The attribute this op touches.
    pub fn attribute(&self) -> &str {
        match self {
            AttributeOp::Replace { attribute, .. } | AttributeOp::Add { attribute, .. } => {
                attribute
            }
        }
    }

    /// The values this op carries.
    pub fn values(&self) -> &[String] {
        match self {
            AttributeOp::Replace { values, .. } | AttributeOp::Add { values, .. } => values,
        }
    }

    /// Op kind label, as rendered in change-log output.
    pub fn kind(&self) -> &'static str {
        match self {
            AttributeOp::Replace { .. } => "replace",
            AttributeOp::Add { .. } => "add",
        }
    }
}

/// A unit of intended mutation against the target store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum ChangeRecord {
    /// Create `dn` with the given attributes, copied verbatim from
    /// the source.
    AddEntry { dn: String, attributes: Entry },

    /// Apply attribute ops to the existing `dn`. All ops for a DN are
    /// batched into one record.
    ModifyEntry { dn: String, ops: Vec<AttributeOp> },

    /// Remove `dn`. Classification-only: the engine constructs this
    /// for target-only entries but never places it in the executable
    /// change list, and the applier refuses it. Whole-entry removal
    /// is never automated.
    DeleteEntry { dn: String },
}

impl ChangeRecord {
    /// The DN this record targets.
    pub fn dn(&self) -> &str {
        match self {
            ChangeRecord::AddEntry { dn, .. }
            | ChangeRecord::ModifyEntry { dn, .. }
            | ChangeRecord::DeleteEntry { dn } => dn,
        }
    }

    /// Whether the applier may execute this record.
    pub fn is_executable(&self) -> bool {
        !matches!(self, ChangeRecord::DeleteEntry { .. })
    }
}

/// A difference the engine detected but will not act on: something
/// that exists only on the target side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeleteCandidate {
    /// A DN present only in the target.
    Entry { dn: String },

    /// An attribute present only in the target's copy of a shared DN.
    Attribute {
        dn: String,
        attribute: String,
        values: Vec<String>,
    },

    /// Values present only on the target side of a shared attribute.
    Values {
        dn: String,
        attribute: String,
        values: Vec<String>,
    },
}

impl DeleteCandidate {
    /// The DN the candidate belongs to.
    pub fn dn(&self) -> &str {
        match self {
            DeleteCandidate::Entry { dn }
            | DeleteCandidate::Attribute { dn, .. }
            | DeleteCandidate::Values { dn, .. } => dn,
        }
    }
}

/// Outcome of one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilePlan {
    /// Executable changes, ordered by DN.
    pub changes: Vec<ChangeRecord>,

    /// Target-only entries, attributes, and values: detected, logged,
    /// and skipped.
    pub delete_candidates: Vec<DeleteCandidate>,

    /// Entries present in both snapshots that matched exactly.
    pub unchanged: usize,
}

impl ReconcilePlan {
    /// Create a new empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any executable change was produced.
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Number of executable changes.
    pub fn total_changes(&self) -> usize {
        self.changes.len()
    }

    /// Number of entry additions.
    pub fn add_count(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, ChangeRecord::AddEntry { .. }))
            .count()
    }

    /// Number of entry modifications.
    pub fn modify_count(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, ChangeRecord::ModifyEntry { .. }))
            .count()
    }

    /// Diagnostic delete records for the suppressed target-only
    /// entries. Never part of [`ReconcilePlan::changes`].
    pub fn delete_records(&self) -> Vec<ChangeRecord> {
        self.delete_candidates
            .iter()
            .filter_map(|c| match c {
                DeleteCandidate::Entry { dn } => Some(ChangeRecord::DeleteEntry { dn: dn.clone() }),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn push_change(&mut self, record: ChangeRecord) {
        self.changes.push(record);
    }

    pub(crate) fn push_candidate(&mut self, candidate: DeleteCandidate) {
        self.delete_candidates.push(candidate);
    }

    pub(crate) fn add_unchanged(&mut self) {
        self.unchanged += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_op_accessors() {
        let op = AttributeOp::Replace {
            attribute: "mail".to_string(),
            values: vec!["a@x".to_string()],
        };
        assert_eq!(op.attribute(), "mail");
        assert_eq!(op.values(), &["a@x".to_string()][..]);
        assert_eq!(op.kind(), "replace");

        let op = AttributeOp::Add {
            attribute: "member".to_string(),
            values: vec!["cn=a".to_string(), "cn=b".to_string()],
        };
        assert_eq!(op.kind(), "add");
        assert_eq!(op.values().len(), 2);
    }

    #[test]
    fn test_change_record_dn() {
        let add = ChangeRecord::AddEntry {
            dn: "cn=x,dc=example".to_string(),
            attributes: Entry::new(),
        };
        let modify = ChangeRecord::ModifyEntry {
            dn: "cn=y,dc=example".to_string(),
            ops: vec![],
        };
        let delete = ChangeRecord::DeleteEntry {
            dn: "cn=z,dc=example".to_string(),
        };

        assert_eq!(add.dn(), "cn=x,dc=example");
        assert_eq!(modify.dn(), "cn=y,dc=example");
        assert_eq!(delete.dn(), "cn=z,dc=example");
    }

    #[test]
    fn test_delete_record_is_not_executable() {
        let delete = ChangeRecord::DeleteEntry {
            dn: "cn=z,dc=example".to_string(),
        };
        assert!(!delete.is_executable());

        let add = ChangeRecord::AddEntry {
            dn: "cn=x,dc=example".to_string(),
            attributes: Entry::new(),
        };
        assert!(add.is_executable());
    }

    #[test]
    fn test_plan_counts() {
        let mut plan = ReconcilePlan::new();
        plan.push_change(ChangeRecord::AddEntry {
            dn: "cn=a".to_string(),
            attributes: Entry::new(),
        });
        plan.push_change(ChangeRecord::ModifyEntry {
            dn: "cn=b".to_string(),
            ops: vec![AttributeOp::Add {
                attribute: "mail".to_string(),
                values: vec!["a@x".to_string()],
            }],
        });
        plan.push_candidate(DeleteCandidate::Entry {
            dn: "cn=c".to_string(),
        });
        plan.add_unchanged();

        assert!(plan.has_changes());
        assert_eq!(plan.total_changes(), 2);
        assert_eq!(plan.add_count(), 1);
        assert_eq!(plan.modify_count(), 1);
        assert_eq!(plan.unchanged, 1);
        assert_eq!(plan.delete_candidates.len(), 1);
    }

    #[test]
    fn test_plan_delete_records_from_entry_candidates_only() {
        let mut plan = ReconcilePlan::new();
        plan.push_candidate(DeleteCandidate::Entry {
            dn: "cn=gone".to_string(),
        });
        plan.push_candidate(DeleteCandidate::Attribute {
            dn: "cn=kept".to_string(),
            attribute: "description".to_string(),
            values: vec!["stale".to_string()],
        });

        let records = plan.delete_records();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            ChangeRecord::DeleteEntry {
                dn: "cn=gone".to_string()
            }
        );
        assert!(records.iter().all(|r| !r.is_executable()));
    }

    #[test]
    fn test_change_record_serialization() {
        let record = ChangeRecord::ModifyEntry {
            dn: "cn=x,dc=example".to_string(),
            ops: vec![AttributeOp::Replace {
                attribute: "mail".to_string(),
                values: vec!["a@x".to_string()],
            }],
        };

        let json = serde_json::to_string(&record).unwrap();
        let parsed: ChangeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
