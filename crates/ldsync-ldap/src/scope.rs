//! Search scope selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DirectoryError;

/// How far below the search base a snapshot search descends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    /// The base entry itself.
    Base,

    /// Direct children of the base.
    One,

    /// The base and its whole subtree.
    #[default]
    Sub,
}

impl SearchScope {
    /// Convert to the wire-level scope.
    pub fn to_ldap(self) -> ldap3::Scope {
        match self {
            SearchScope::Base => ldap3::Scope::Base,
            SearchScope::One => ldap3::Scope::OneLevel,
            SearchScope::Sub => ldap3::Scope::Subtree,
        }
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SearchScope::Base => "base",
            SearchScope::One => "one",
            SearchScope::Sub => "sub",
        };
        write!(f, "{label}")
    }
}

impl FromStr for SearchScope {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(SearchScope::Base),
            "one" | "onelevel" => Ok(SearchScope::One),
            "sub" | "subtree" => Ok(SearchScope::Sub),
            other => Err(DirectoryError::invalid_configuration(format!(
                "unknown search scope '{other}' (expected base, one, or sub)"
            ))),
        }
    }
}
