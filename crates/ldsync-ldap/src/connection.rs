//! Directory endpoint connection.
//!
//! Connects and binds per the endpoint configuration, materializes
//! snapshots, and applies change records. One connection serves one
//! endpoint for the duration of a run.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, Mod, SearchEntry};
use tracing::{debug, info, warn};

use ldsync_core::{AttributeOp, ChangeRecord, Entry, Snapshot};

use crate::config::EndpointConfig;
use crate::error::{DirectoryError, DirectoryResult};
use crate::traits::{ChangeApplier, SnapshotSource};

/// A bound connection to one directory endpoint.
pub struct DirectoryConnection {
    config: EndpointConfig,
    ldap: Ldap,
}

impl DirectoryConnection {
    /// Connect and bind according to the endpoint configuration.
    pub async fn connect(config: EndpointConfig) -> DirectoryResult<Self> {
        config.validate()?;

        let settings = LdapConnSettings::new()
            .set_conn_timeout(Duration::from_secs(config.timeout_secs))
            .set_starttls(config.starttls);

        debug!(url = %config.url, starttls = config.starttls, "connecting to directory");

        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &config.url)
            .await
            .map_err(|e| {
                DirectoryError::connection_failed_with_source(
                    format!("failed to connect to {}", config.url),
                    e,
                )
            })?;

        // Drive the connection until it closes.
        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "connection driver error");
            }
        });

        if let Some(bind_dn) = &config.bind_dn {
            let password = config.bind_password.as_deref().unwrap_or("");

            debug!(bind_dn = %bind_dn, "performing simple bind");

            let result = ldap.simple_bind(bind_dn, password).await.map_err(|e| {
                DirectoryError::connection_failed_with_source(
                    format!("bind failed for {bind_dn}"),
                    e,
                )
            })?;

            if result.rc == 49 {
                return Err(DirectoryError::AuthenticationFailed);
            }
            if result.rc != 0 {
                return Err(DirectoryError::connection_failed(format!(
                    "bind failed with code {}: {}",
                    result.rc, result.text
                )));
            }
        }

        info!(url = %config.url, "directory connection established");

        Ok(Self { config, ldap })
    }

    /// The configuration this connection was built from.
    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Unbind and drop the connection.
    pub async fn close(mut self) {
        if let Err(e) = self.ldap.unbind().await {
            warn!(error = %e, "error during unbind");
        }
    }

    /// Convert a raw search entry into the snapshot model.
    ///
    /// Binary attribute values are carried as lossy UTF-8; the
    /// comparison model is string-typed.
    fn entry_from_search(entry: SearchEntry) -> (String, Entry) {
        let mut attrs = Entry::new();

        for (name, values) in entry.attrs {
            attrs.set(name, values);
        }

        for (name, values) in entry.bin_attrs {
            let decoded = values
                .into_iter()
                .map(|v| String::from_utf8_lossy(&v).into_owned())
                .collect();
            attrs.set(name, decoded);
        }

        (entry.dn, attrs)
    }
}

#[async_trait]
impl SnapshotSource for DirectoryConnection {
    async fn fetch_snapshot(&mut self) -> DirectoryResult<Snapshot> {
        let base = self.config.search_base().to_string();
        let filter = self.config.filter.clone();
        let scope = self.config.scope;

        debug!(base = %base, filter = %filter, scope = %scope, "searching for snapshot");

        let result = self
            .ldap
            .search(&base, scope.to_ldap(), &filter, vec!["*"])
            .await
            .map_err(|e| DirectoryError::search_failed_with_source("search request failed", e))?;

        let (entries, _res) = result
            .success()
            .map_err(|e| DirectoryError::search_failed(format!("search failed: {e}")))?;

        let mut snapshot = Snapshot::new();
        for raw in entries {
            let (dn, entry) = Self::entry_from_search(SearchEntry::construct(raw));
            snapshot.insert(dn, entry);
        }

        info!(url = %self.config.url, entries = snapshot.len(), "snapshot materialized");

        Ok(snapshot)
    }
}

#[async_trait]
impl ChangeApplier for DirectoryConnection {
    async fn apply(&mut self, record: &ChangeRecord) -> DirectoryResult<()> {
        match record {
            ChangeRecord::AddEntry { dn, attributes } => {
                debug!(dn = %dn, attributes = attributes.len(), "adding entry");

                let attrs: Vec<(String, HashSet<String>)> = attributes
                    .iter()
                    .map(|(name, values)| (name.clone(), values.iter().cloned().collect()))
                    .collect();

                let result = self.ldap.add(dn, attrs).await.map_err(|e| {
                    DirectoryError::operation_failed_with_source(format!("add failed for {dn}"), e)
                })?;
                check_result_code(dn, result.rc, &result.text)?;

                info!(dn = %dn, "entry added");
                Ok(())
            }
            ChangeRecord::ModifyEntry { dn, ops } => {
                debug!(dn = %dn, ops = ops.len(), "modifying entry");

                let mods: Vec<Mod<String>> = ops.iter().map(op_to_mod).collect();

                let result = self.ldap.modify(dn, mods).await.map_err(|e| {
                    DirectoryError::operation_failed_with_source(
                        format!("modify failed for {dn}"),
                        e,
                    )
                })?;
                check_result_code(dn, result.rc, &result.text)?;

                info!(dn = %dn, "entry modified");
                Ok(())
            }
            // Classification-only records never reach the wire.
            ChangeRecord::DeleteEntry { dn } => Err(DirectoryError::NotExecutable {
                dn: dn.clone(),
            }),
        }
    }
}

/// Convert one attribute op into the wire modification.
fn op_to_mod(op: &AttributeOp) -> Mod<String> {
    match op {
        AttributeOp::Replace { attribute, values } => {
            Mod::Replace(attribute.clone(), values.iter().cloned().collect())
        }
        AttributeOp::Add { attribute, values } => {
            Mod::Add(attribute.clone(), values.iter().cloned().collect())
        }
    }
}

/// Map an operation result code onto the error taxonomy.
fn check_result_code(dn: &str, rc: u32, text: &str) -> DirectoryResult<()> {
    match rc {
        0 => Ok(()),
        19 => Err(DirectoryError::ConstraintViolation {
            dn: dn.to_string(),
            message: text.to_string(),
        }),
        32 => Err(DirectoryError::NoSuchEntry { dn: dn.to_string() }),
        68 => Err(DirectoryError::EntryAlreadyExists { dn: dn.to_string() }),
        _ => Err(DirectoryError::operation_failed(format!(
            "operation on {dn} failed with code {rc}: {text}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_entry_from_search_preserves_values() {
        let mut attrs = HashMap::new();
        attrs.insert("cn".to_string(), vec!["x".to_string()]);
        attrs.insert(
            "mail".to_string(),
            vec!["a@x".to_string(), "b@x".to_string()],
        );

        let entry = SearchEntry {
            dn: "cn=x,dc=example,dc=com".to_string(),
            attrs,
            bin_attrs: HashMap::new(),
        };

        let (dn, converted) = DirectoryConnection::entry_from_search(entry);

        assert_eq!(dn, "cn=x,dc=example,dc=com");
        assert_eq!(converted.get("cn"), Some(&["x".to_string()][..]));
        assert_eq!(
            converted.get("mail"),
            Some(&["a@x".to_string(), "b@x".to_string()][..])
        );
    }

    #[test]
    fn test_entry_from_search_decodes_binary_values() {
        let mut bin_attrs = HashMap::new();
        bin_attrs.insert("description".to_string(), vec![b"caf\xc3\xa9".to_vec()]);

        let entry = SearchEntry {
            dn: "cn=x".to_string(),
            attrs: HashMap::new(),
            bin_attrs,
        };

        let (_, converted) = DirectoryConnection::entry_from_search(entry);
        assert_eq!(
            converted.get("description"),
            Some(&["café".to_string()][..])
        );
    }

    #[test]
    fn test_op_to_mod() {
        let replace = op_to_mod(&AttributeOp::Replace {
            attribute: "mail".to_string(),
            values: vec!["a@x".to_string()],
        });
        match replace {
            Mod::Replace(attr, values) => {
                assert_eq!(attr, "mail");
                assert!(values.contains("a@x"));
            }
            _ => panic!("expected Mod::Replace"),
        }

        let add = op_to_mod(&AttributeOp::Add {
            attribute: "member".to_string(),
            values: vec!["cn=a".to_string(), "cn=b".to_string()],
        });
        match add {
            Mod::Add(attr, values) => {
                assert_eq!(attr, "member");
                assert_eq!(values.len(), 2);
            }
            _ => panic!("expected Mod::Add"),
        }
    }

    #[test]
    fn test_check_result_code_mapping() {
        assert!(check_result_code("cn=x", 0, "").is_ok());

        assert!(matches!(
            check_result_code("cn=x", 68, "entry exists"),
            Err(DirectoryError::EntryAlreadyExists { .. })
        ));
        assert!(matches!(
            check_result_code("cn=x", 32, "no such object"),
            Err(DirectoryError::NoSuchEntry { .. })
        ));
        assert!(matches!(
            check_result_code("cn=x", 19, "constraint"),
            Err(DirectoryError::ConstraintViolation { .. })
        ));
        assert!(matches!(
            check_result_code("cn=x", 50, "insufficient access"),
            Err(DirectoryError::OperationFailed { .. })
        ));
    }
}
