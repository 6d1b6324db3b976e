//! Collaborator seams for the reconciliation flow.
//!
//! The engine itself is pure; these traits are the two roles the
//! surrounding run plays against a live endpoint.

use async_trait::async_trait;

use ldsync_core::{ChangeRecord, Snapshot};

use crate::error::DirectoryResult;

/// Produces the fully materialized snapshot the engine diffs.
#[async_trait]
pub trait SnapshotSource {
    /// Fetch every entry visible under the configured base and
    /// filter. Called once per run per endpoint, before diffing
    /// begins.
    async fn fetch_snapshot(&mut self) -> DirectoryResult<Snapshot>;
}

/// Applies engine output to the target store.
#[async_trait]
pub trait ChangeApplier {
    /// Apply a single change record. Records are applied strictly in
    /// plan order and the caller stops on the first error; there is
    /// no retry and no rollback.
    async fn apply(&mut self, record: &ChangeRecord) -> DirectoryResult<()>;
}
