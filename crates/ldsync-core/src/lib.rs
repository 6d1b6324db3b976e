//! # ldsync core
//!
//! Pure reconciliation engine for one-way directory synchronization.
//!
//! Given two fully materialized snapshots, [`reconcile`] computes the
//! ordered change plan that makes the target match the source:
//! entries missing from the target become adds, differing entries
//! become attribute-level modifications, and anything that exists
//! only on the target side is classified as a delete candidate and
//! never acted on.
//!
//! This crate performs no I/O. Fetching snapshots and applying change
//! records are the job of connection collaborators layered on top.
//!
//! ## Example
//!
//! ```
//! use ldsync_core::{reconcile, Entry, Snapshot};
//!
//! let source = Snapshot::new().with(
//!     "cn=x,dc=example,dc=com",
//!     Entry::new().with("cn", ["x"]),
//! );
//! let target = Snapshot::new();
//!
//! let plan = reconcile(&source, &target)?;
//! assert_eq!(plan.add_count(), 1);
//! # Ok::<(), ldsync_core::ReconcileError>(())
//! ```

pub mod change;
pub mod engine;
pub mod error;
pub mod report;
pub mod snapshot;

// Re-exports
pub use change::{AttributeOp, ChangeRecord, DeleteCandidate, ReconcilePlan};
pub use engine::reconcile;
pub use error::{ReconcileError, ReconcileResult};
pub use report::{render_plan, render_record};
pub use snapshot::{Entry, Snapshot};
