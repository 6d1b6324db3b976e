//! Engine error types.

use thiserror::Error;

/// Result type for reconciliation.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// A programming-logic fault inside the reconciliation engine.
///
/// These never represent store-side conditions; collaborator failures
/// are surfaced before or after the engine runs, not through it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    /// A DN taken from the union of both key sets resolved to neither
    /// snapshot during classification.
    #[error("dn '{dn}' present in neither snapshot during classification")]
    UnknownDn { dn: String },

    /// An attribute taken from the union of both entries resolved to
    /// neither side during classification.
    #[error("attribute '{attribute}' of '{dn}' present in neither entry during classification")]
    UnknownAttribute { dn: String, attribute: String },
}
