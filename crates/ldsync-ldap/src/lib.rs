//! # ldsync LDAP collaborators
//!
//! Directory endpoint plumbing for one-way synchronization: the
//! snapshot search that feeds the reconciliation engine and the
//! applier that executes its change plan.
//!
//! ## Features
//!
//! - LDAP v3 over `ldap://` and `ldaps://`
//! - STARTTLS upgrade on plain connections
//! - Simple bind or anonymous access
//! - One-shot snapshot search per endpoint
//! - Sequential, fail-fast change application
//!
//! ## Example
//!
//! ```ignore
//! use ldsync_ldap::{DirectoryConnection, EndpointConfig, SnapshotSource};
//!
//! let config = EndpointConfig::new("ldap://ldap.example.com:389")
//!     .with_bind_dn("cn=admin,dc=example,dc=com")
//!     .with_password("secret")
//!     .with_base_dn("dc=example,dc=com");
//!
//! let mut conn = DirectoryConnection::connect(config).await?;
//! let snapshot = conn.fetch_snapshot().await?;
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod scope;
pub mod traits;

// Re-exports
pub use config::EndpointConfig;
pub use connection::DirectoryConnection;
pub use error::{DirectoryError, DirectoryResult};
pub use scope::SearchScope;
pub use traits::{ChangeApplier, SnapshotSource};
