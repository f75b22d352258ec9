//! Partition key for one analyst's memory records.

use std::fmt;

/// Partition key under which all records for one logical user live.
///
/// Every read and write names exactly one scope; records never cross
/// scopes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserScope(String);

impl UserScope {
    /// Scope for the analyst persona of a Reddit username.
    pub fn for_username(username: &str) -> Self {
        Self(format!("reddit_analyst_{username}"))
    }

    /// Use a raw identifier verbatim.
    pub fn from_raw(scope: impl Into<String>) -> Self {
        Self(scope.into())
    }

    /// The wire value sent as `user_id`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::UserScope;

    #[test]
    fn username_scope_uses_analyst_prefix() {
        let scope = UserScope::for_username("spez");
        assert_eq!(scope.as_str(), "reddit_analyst_spez");
        assert_eq!(scope.to_string(), "reddit_analyst_spez");
    }

    #[test]
    fn raw_scope_is_kept_verbatim() {
        let scope = UserScope::from_raw("u1");
        assert_eq!(scope.as_str(), "u1");
    }
}
