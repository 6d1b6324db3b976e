//! Command-line argument model.
//!
//! Two endpoint descriptors built from per-endpoint options, with a
//! single bind identity or credential broadcast to both endpoints
//! when only one is given.

use std::path::{Path, PathBuf};

use clap::Parser;

use ldsync_ldap::{EndpointConfig, SearchScope};

use crate::error::{CliError, CliResult};

/// One-way synchronization between two LDAP directories.
///
/// Compares every entry below the configured search bases and applies
/// the additions and modifications needed to make the target match
/// the source. Entries, attributes, and values that exist only in the
/// target are reported but never removed.
#[derive(Debug, Parser)]
#[command(name = "ldsync", version, about)]
pub struct Args {
    /// Source directory URL (ldap:// or ldaps://).
    #[arg(value_name = "SOURCE_URL")]
    pub source_url: String,

    /// Target directory URL (ldap:// or ldaps://).
    #[arg(value_name = "TARGET_URL")]
    pub target_url: String,

    /// Bind DN for the source directory.
    #[arg(long, value_name = "DN")]
    pub source_bind_dn: Option<String>,

    /// Bind DN for the target directory.
    #[arg(long, value_name = "DN")]
    pub target_bind_dn: Option<String>,

    /// Bind password for the source directory.
    #[arg(long, value_name = "PASSWORD")]
    pub source_password: Option<String>,

    /// Bind password for the target directory.
    #[arg(long, value_name = "PASSWORD")]
    pub target_password: Option<String>,

    /// Read the source bind password from the first line of a file.
    #[arg(long, value_name = "FILE", conflicts_with = "source_password")]
    pub source_password_file: Option<PathBuf>,

    /// Read the target bind password from the first line of a file.
    #[arg(long, value_name = "FILE", conflicts_with = "target_password")]
    pub target_password_file: Option<PathBuf>,

    /// Search base for the source directory.
    #[arg(long, value_name = "DN")]
    pub source_base: Option<String>,

    /// Search base for the target directory.
    #[arg(long, value_name = "DN")]
    pub target_base: Option<String>,

    /// Search filter for the source directory.
    #[arg(long, value_name = "FILTER")]
    pub source_filter: Option<String>,

    /// Search filter for the target directory.
    #[arg(long, value_name = "FILTER")]
    pub target_filter: Option<String>,

    /// Search scope used on both directories (base, one, or sub).
    #[arg(long, value_name = "SCOPE", default_value_t = SearchScope::Sub)]
    pub scope: SearchScope,

    /// Upgrade both connections with STARTTLS before binding.
    #[arg(short = 'Z', long)]
    pub starttls: bool,

    /// Compute and print the change plan without applying it.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Increase diagnostic output (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Resolve both endpoint configurations.
    pub fn endpoints(&self) -> CliResult<(EndpointConfig, EndpointConfig)> {
        let (source_bind, target_bind) = broadcast(
            self.source_bind_dn.clone(),
            self.target_bind_dn.clone(),
        );

        let source_password = resolve_password(
            self.source_password.as_deref(),
            self.source_password_file.as_deref(),
        )?;
        let target_password = resolve_password(
            self.target_password.as_deref(),
            self.target_password_file.as_deref(),
        )?;
        let (source_password, target_password) = broadcast(source_password, target_password);

        let source = self.endpoint(
            &self.source_url,
            source_bind,
            source_password,
            self.source_base.as_deref(),
            self.source_filter.as_deref(),
        );
        let target = self.endpoint(
            &self.target_url,
            target_bind,
            target_password,
            self.target_base.as_deref(),
            self.target_filter.as_deref(),
        );

        source.validate().map_err(CliError::from)?;
        target.validate().map_err(CliError::from)?;

        Ok((source, target))
    }

    fn endpoint(
        &self,
        url: &str,
        bind_dn: Option<String>,
        password: Option<String>,
        base: Option<&str>,
        filter: Option<&str>,
    ) -> EndpointConfig {
        let mut config = EndpointConfig::new(url).with_scope(self.scope);
        if let Some(dn) = bind_dn {
            config = config.with_bind_dn(dn);
        }
        if let Some(password) = password {
            config = config.with_password(password);
        }
        if let Some(base) = base {
            config = config.with_base_dn(base);
        }
        if let Some(filter) = filter {
            config = config.with_filter(filter);
        }
        if self.starttls {
            config = config.with_starttls();
        }
        config
    }
}

/// Broadcast a single value to both endpoints when only one is given.
fn broadcast<T: Clone>(source: Option<T>, target: Option<T>) -> (Option<T>, Option<T>) {
    match (source, target) {
        (Some(value), None) => (Some(value.clone()), Some(value)),
        (None, Some(value)) => (Some(value.clone()), Some(value)),
        other => other,
    }
}

/// Pick the inline password or load it from the first line of a file.
fn resolve_password(inline: Option<&str>, file: Option<&Path>) -> CliResult<Option<String>> {
    match (inline, file) {
        (Some(password), _) => Ok(Some(password.to_string())),
        (None, Some(path)) => Ok(Some(load_password(path)?)),
        (None, None) => Ok(None),
    }
}

fn load_password(path: &Path) -> CliResult<String> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        CliError::Config(format!("cannot read password file {}: {e}", path.display()))
    })?;
    Ok(contents.lines().next().unwrap_or("").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut full = vec!["ldsync"];
        full.extend_from_slice(args);
        full.extend_from_slice(&["ldap://source.example.com", "ldap://target.example.com"]);
        Args::parse_from(full)
    }

    #[test]
    fn test_broadcast_single_value_fills_both_sides() {
        let (a, b) = broadcast(Some("x"), None);
        assert_eq!(a, Some("x"));
        assert_eq!(b, Some("x"));

        let (a, b) = broadcast(None, Some("y"));
        assert_eq!(a, Some("y"));
        assert_eq!(b, Some("y"));
    }

    #[test]
    fn test_broadcast_keeps_distinct_values() {
        let (a, b) = broadcast(Some("x"), Some("y"));
        assert_eq!(a, Some("x"));
        assert_eq!(b, Some("y"));

        let (a, b): (Option<&str>, Option<&str>) = broadcast(None, None);
        assert_eq!(a, None);
        assert_eq!(b, None);
    }

    #[test]
    fn test_endpoints_broadcast_bind_identity() {
        let args = parse(&[
            "--source-bind-dn",
            "cn=admin,dc=example,dc=com",
            "--source-password",
            "secret",
        ]);

        let (source, target) = args.endpoints().unwrap();

        assert_eq!(source.bind_dn, Some("cn=admin,dc=example,dc=com".to_string()));
        assert_eq!(target.bind_dn, Some("cn=admin,dc=example,dc=com".to_string()));
        assert_eq!(source.bind_password, Some("secret".to_string()));
        assert_eq!(target.bind_password, Some("secret".to_string()));
    }

    #[test]
    fn test_endpoints_keep_per_endpoint_overrides() {
        let args = parse(&[
            "--source-bind-dn",
            "cn=reader,dc=example,dc=com",
            "--target-bind-dn",
            "cn=writer,dc=example,dc=com",
            "--source-password",
            "read",
            "--target-password",
            "write",
            "--source-base",
            "ou=people,dc=example,dc=com",
            "--target-base",
            "ou=mirror,dc=example,dc=com",
            "--source-filter",
            "(objectClass=inetOrgPerson)",
        ]);

        let (source, target) = args.endpoints().unwrap();

        assert_eq!(source.bind_dn, Some("cn=reader,dc=example,dc=com".to_string()));
        assert_eq!(target.bind_dn, Some("cn=writer,dc=example,dc=com".to_string()));
        assert_eq!(source.search_base(), "ou=people,dc=example,dc=com");
        assert_eq!(target.search_base(), "ou=mirror,dc=example,dc=com");
        assert_eq!(source.filter, "(objectClass=inetOrgPerson)");
        assert_eq!(target.filter, "(objectClass=*)");
    }

    #[test]
    fn test_endpoints_share_scope_and_starttls() {
        let args = parse(&["--scope", "one", "-Z"]);

        let (source, target) = args.endpoints().unwrap();

        assert_eq!(source.scope, SearchScope::One);
        assert_eq!(target.scope, SearchScope::One);
        assert!(source.starttls);
        assert!(target.starttls);
    }

    #[test]
    fn test_endpoints_reject_invalid_url() {
        let args = Args::parse_from([
            "ldsync",
            "http://not-ldap.example.com",
            "ldap://target.example.com",
        ]);

        let err = args.endpoints().unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_password_file_first_line_only() {
        let path = std::env::temp_dir().join(format!("ldsync-pw-{}", std::process::id()));
        std::fs::write(&path, "hunter2\ntrailing junk\n").unwrap();

        let args = parse(&[
            "--source-bind-dn",
            "cn=admin",
            "--source-password-file",
            path.to_str().unwrap(),
        ]);
        let (source, target) = args.endpoints().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(source.bind_password, Some("hunter2".to_string()));
        // Broadcast applies to file-loaded credentials too.
        assert_eq!(target.bind_password, Some("hunter2".to_string()));
    }

    #[test]
    fn test_missing_password_file_is_config_error() {
        let args = parse(&[
            "--source-bind-dn",
            "cn=admin",
            "--source-password-file",
            "/nonexistent/ldsync-password",
        ]);

        let err = args.endpoints().unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_dry_run_and_verbosity_flags() {
        let args = parse(&["-n", "-vv"]);
        assert!(args.dry_run);
        assert_eq!(args.verbose, 2);
    }
}
