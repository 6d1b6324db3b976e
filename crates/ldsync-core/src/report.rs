//! Dry-run rendering of change records.
//!
//! Turns the engine's output into LDIF-style text blocks. Pure
//! formatting; the only consumer-visible contract is the block shape:
//! a `dn:` line, a `changetype:` line, then `attribute: value` lines,
//! with `-` separators between the attribute ops of one entry.

use std::fmt::Write;

use crate::change::{AttributeOp, ChangeRecord, ReconcilePlan};

/// Render one change record as an LDIF-style block.
pub fn render_record(record: &ChangeRecord) -> String {
    match record {
        ChangeRecord::AddEntry { dn, attributes } => {
            let mut out = String::new();
            let _ = writeln!(out, "dn: {dn}");
            out.push_str("changetype: add\n");
            for name in attributes.sorted_names() {
                if let Some(values) = attributes.get(name) {
                    for value in values {
                        let _ = writeln!(out, "{name}: {value}");
                    }
                }
            }
            out
        }
        ChangeRecord::ModifyEntry { dn, ops } => {
            let mut out = String::new();
            let _ = writeln!(out, "dn: {dn}");
            out.push_str("changetype: modify\n");
            let blocks: Vec<String> = ops.iter().map(render_op).collect();
            out.push_str(&blocks.join("-\n"));
            out
        }
        ChangeRecord::DeleteEntry { dn } => {
            format!("dn: {dn}\nchangetype: delete\n")
        }
    }
}

fn render_op(op: &AttributeOp) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: {}", op.kind(), op.attribute());
    for value in op.values() {
        let _ = writeln!(out, "{}: {}", op.attribute(), value);
    }
    out
}

/// Render a plan's executable records, separated by blank lines.
pub fn render_plan(plan: &ReconcilePlan) -> String {
    plan.changes
        .iter()
        .map(render_record)
        .collect::<Vec<_>>()
        .join("\n")
}
