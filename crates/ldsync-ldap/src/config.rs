//! Endpoint configuration.
//!
//! Connection descriptor for one directory endpoint: where to
//! connect, how to bind, and what to search.

use serde::{Deserialize, Serialize};

use crate::error::{DirectoryError, DirectoryResult};
use crate::scope::SearchScope;

/// Connection descriptor for one directory endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Endpoint URL (`ldap://host:port` or `ldaps://host:port`).
    pub url: String,

    /// Bind DN; the connection binds anonymously when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind_dn: Option<String>,

    /// Bind password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind_password: Option<String>,

    /// Search base. An empty base searches from the server's root
    /// context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dn: Option<String>,

    /// Search filter.
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Search scope.
    #[serde(default)]
    pub scope: SearchScope,

    /// Upgrade the plain connection with STARTTLS before binding.
    #[serde(default)]
    pub starttls: bool,

    /// Connection timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_filter() -> String {
    "(objectClass=*)".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl EndpointConfig {
    /// Create a new endpoint config for the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            bind_dn: None,
            bind_password: None,
            base_dn: None,
            filter: default_filter(),
            scope: SearchScope::default(),
            starttls: false,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Set the bind DN.
    pub fn with_bind_dn(mut self, dn: impl Into<String>) -> Self {
        self.bind_dn = Some(dn.into());
        self
    }

    /// Set the bind password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.bind_password = Some(password.into());
        self
    }

    /// Set the search base.
    pub fn with_base_dn(mut self, base: impl Into<String>) -> Self {
        self.base_dn = Some(base.into());
        self
    }

    /// Set the search filter.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Set the search scope.
    #[must_use]
    pub fn with_scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }

    /// Enable STARTTLS.
    #[must_use]
    pub fn with_starttls(mut self) -> Self {
        self.starttls = true;
        self
    }

    /// Whether the URL selects TLS from the start.
    #[must_use]
    pub fn is_ldaps(&self) -> bool {
        self.url.starts_with("ldaps://")
    }

    /// The search base to send, empty when none was configured.
    #[must_use]
    pub fn search_base(&self) -> &str {
        self.base_dn.as_deref().unwrap_or("")
    }

    /// Validate the descriptor before any connection attempt.
    pub fn validate(&self) -> DirectoryResult<()> {
        if self.url.is_empty() {
            return Err(DirectoryError::invalid_configuration("url is required"));
        }

        if !self.url.starts_with("ldap://") && !self.url.starts_with("ldaps://") {
            return Err(DirectoryError::invalid_configuration(format!(
                "url '{}' must use the ldap:// or ldaps:// scheme",
                self.url
            )));
        }

        if self.is_ldaps() && self.starttls {
            return Err(DirectoryError::invalid_configuration(
                "cannot use STARTTLS on an ldaps:// url",
            ));
        }

        if self.bind_password.is_some() && self.bind_dn.is_none() {
            return Err(DirectoryError::invalid_configuration(
                "bind password given without a bind dn",
            ));
        }

        if self.filter.is_empty() {
            return Err(DirectoryError::invalid_configuration(
                "filter must not be empty",
            ));
        }

        Ok(())
    }

    /// Copy with the password masked, for logging.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.bind_password.is_some() {
            config.bind_password = Some("***REDACTED***".to_string());
        }
        config
    }
}

impl std::fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("url", &self.url)
            .field("bind_dn", &self.bind_dn)
            .field(
                "bind_password",
                &self.bind_password.as_ref().map(|_| "***REDACTED***"),
            )
            .field("base_dn", &self.base_dn)
            .field("filter", &self.filter)
            .field("scope", &self.scope)
            .field("starttls", &self.starttls)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = EndpointConfig::new("ldap://ldap.example.com:389");

        assert_eq!(config.filter, "(objectClass=*)");
        assert_eq!(config.scope, SearchScope::Sub);
        assert_eq!(config.search_base(), "");
        assert!(!config.starttls);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builders() {
        let config = EndpointConfig::new("ldaps://ldap.example.com:636")
            .with_bind_dn("cn=admin,dc=example,dc=com")
            .with_password("secret")
            .with_base_dn("ou=people,dc=example,dc=com")
            .with_filter("(objectClass=inetOrgPerson)")
            .with_scope(SearchScope::One);

        assert!(config.is_ldaps());
        assert_eq!(config.search_base(), "ou=people,dc=example,dc=com");
        assert_eq!(config.scope, SearchScope::One);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_scheme() {
        assert!(EndpointConfig::new("http://example.com").validate().is_err());
        assert!(EndpointConfig::new("").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_starttls_over_ldaps() {
        let config = EndpointConfig::new("ldaps://ldap.example.com").with_starttls();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_password_without_bind_dn() {
        let config = EndpointConfig::new("ldap://ldap.example.com").with_password("secret");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_filter() {
        let mut config = EndpointConfig::new("ldap://ldap.example.com");
        config.filter = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_redacted_masks_password() {
        let config = EndpointConfig::new("ldap://ldap.example.com")
            .with_bind_dn("cn=admin")
            .with_password("super-secret");

        let redacted = config.redacted();
        assert_eq!(redacted.bind_password, Some("***REDACTED***".to_string()));

        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("***REDACTED***"));
    }

    #[test]
    fn test_config_serialization() {
        let config = EndpointConfig::new("ldap://ldap.example.com")
            .with_bind_dn("cn=admin,dc=example,dc=com")
            .with_base_dn("dc=example,dc=com");

        let json = serde_json::to_string(&config).unwrap();
        let parsed: EndpointConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.url, "ldap://ldap.example.com");
        assert_eq!(parsed.base_dn, Some("dc=example,dc=com".to_string()));
        assert_eq!(parsed.scope, SearchScope::Sub);
    }
}
