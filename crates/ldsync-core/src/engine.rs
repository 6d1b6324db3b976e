//! Reconciliation engine.
//!
//! Compares two snapshots entry-by-entry and attribute-by-attribute
//! and produces the ordered change plan that makes the target match
//! the source. Additions and modifications are emitted; entries,
//! attributes, and values that exist only on the target side are
//! classified as delete candidates and never acted on.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, trace};

use crate::change::{AttributeOp, ChangeRecord, DeleteCandidate, ReconcilePlan};
use crate::error::{ReconcileError, ReconcileResult};
use crate::snapshot::{Entry, Snapshot};

/// Compute the changes that make `target` match `source`.
///
/// Pure function of its two inputs. DNs are processed in sorted order
/// and each DN's attributes in sorted name order, so identical inputs
/// always produce an identical plan.
pub fn reconcile(source: &Snapshot, target: &Snapshot) -> ReconcileResult<ReconcilePlan> {
    let mut plan = ReconcilePlan::new();

    let dns: BTreeSet<&str> = source.dns().chain(target.dns()).collect();

    for dn in dns {
        match (source.get(dn), target.get(dn)) {
            (Some(entry), None) => {
                debug!(dn = %dn, attributes = entry.len(), "entry missing from target");
                plan.push_change(ChangeRecord::AddEntry {
                    dn: dn.to_string(),
                    attributes: entry.clone(),
                });
            }
            (None, Some(_)) => {
                // Detected and logged, never executed: whole-entry
                // removal is not automated.
                debug!(dn = %dn, "entry exists only in target, delete suppressed");
                plan.push_candidate(DeleteCandidate::Entry { dn: dn.to_string() });
            }
            (Some(src), Some(tgt)) => {
                let ops = diff_entry(dn, src, tgt, &mut plan)?;
                if ops.is_empty() {
                    trace!(dn = %dn, "entry unchanged");
                    plan.add_unchanged();
                } else {
                    debug!(dn = %dn, ops = ops.len(), "entry differs");
                    plan.push_change(ChangeRecord::ModifyEntry {
                        dn: dn.to_string(),
                        ops,
                    });
                }
            }
            (None, None) => {
                return Err(ReconcileError::UnknownDn { dn: dn.to_string() });
            }
        }
    }

    Ok(plan)
}

/// Classify one shared DN attribute-by-attribute.
///
/// Returns the ops to batch into a `ModifyEntry` record; target-only
/// attributes and values are recorded on the plan as delete
/// candidates.
fn diff_entry(
    dn: &str,
    source: &Entry,
    target: &Entry,
    plan: &mut ReconcilePlan,
) -> ReconcileResult<Vec<AttributeOp>> {
    let mut ops = Vec::new();

    let names: BTreeSet<&str> = source.names().chain(target.names()).collect();

    for name in names {
        match (source.get(name), target.get(name)) {
            (Some(values), None) => {
                // An attribute with no values has nothing to carry.
                if !values.is_empty() {
                    trace!(dn = %dn, attribute = %name, "attribute missing from target");
                    ops.push(AttributeOp::Add {
                        attribute: name.to_string(),
                        values: values.to_vec(),
                    });
                }
            }
            (None, Some(values)) => {
                trace!(dn = %dn, attribute = %name, "attribute exists only in target, delete suppressed");
                plan.push_candidate(DeleteCandidate::Attribute {
                    dn: dn.to_string(),
                    attribute: name.to_string(),
                    values: values.to_vec(),
                });
            }
            (Some(src), Some(tgt)) if src.len() == 1 && tgt.len() == 1 => {
                if src.first() != tgt.first() {
                    trace!(dn = %dn, attribute = %name, "single value differs");
                    ops.push(AttributeOp::Replace {
                        attribute: name.to_string(),
                        values: src.to_vec(),
                    });
                }
            }
            (Some(src), Some(tgt)) => {
                let tally = ValueTally::over(src, tgt);

                let stale = tally.target_only();
                if !stale.is_empty() {
                    trace!(
                        dn = %dn,
                        attribute = %name,
                        values = stale.len(),
                        "values exist only in target, delete suppressed"
                    );
                    plan.push_candidate(DeleteCandidate::Values {
                        dn: dn.to_string(),
                        attribute: name.to_string(),
                        values: stale,
                    });
                }

                let missing = tally.source_only();
                if !missing.is_empty() {
                    trace!(dn = %dn, attribute = %name, values = missing.len(), "values missing from target");
                    ops.push(AttributeOp::Add {
                        attribute: name.to_string(),
                        values: missing,
                    });
                }
            }
            (None, None) => {
                return Err(ReconcileError::UnknownAttribute {
                    dn: dn.to_string(),
                    attribute: name.to_string(),
                });
            }
        }
    }

    Ok(ops)
}

/// Per-side occurrence tally for one attribute's values.
///
/// A value is attributable to a side when that side contributed it at
/// least once. Duplicates within one side therefore count once per
/// side and cannot masquerade as presence on both sides; only a value
/// contributed by both lists is "shared".
#[derive(Debug, Default)]
pub struct ValueTally<'a> {
    counts: HashMap<&'a str, SideCount>,
    /// First-seen order, source values before target values, so the
    /// classification lists come out in the order the stores
    /// presented them.
    order: Vec<&'a str>,
}

#[derive(Debug, Default, Clone, Copy)]
struct SideCount {
    source: usize,
    target: usize,
}

impl<'a> ValueTally<'a> {
    /// Tally both sides' value lists.
    pub fn over(source: &'a [String], target: &'a [String]) -> Self {
        let mut tally = Self::default();
        for value in source {
            tally.entry(value).source += 1;
        }
        for value in target {
            tally.entry(value).target += 1;
        }
        tally
    }

    fn entry(&mut self, value: &'a str) -> &mut SideCount {
        let order = &mut self.order;
        self.counts.entry(value).or_insert_with(|| {
            order.push(value);
            SideCount::default()
        })
    }

    /// Distinct values contributed only by the source side, in source
    /// order.
    pub fn source_only(&self) -> Vec<String> {
        self.select(|count| count.source > 0 && count.target == 0)
    }

    /// Distinct values contributed only by the target side, in target
    /// order.
    pub fn target_only(&self) -> Vec<String> {
        self.select(|count| count.target > 0 && count.source == 0)
    }

    fn select(&self, keep: impl Fn(&SideCount) -> bool) -> Vec<String> {
        self.order
            .iter()
            .filter(|&&value| self.counts.get(value).map(&keep).unwrap_or(false))
            .map(|&value| value.to_string())
            .collect()
    }
}
