//! Trusted identity types.
//!
//! A [`TrustedIdentity`] is the bundle of identity attributes one
//! trust-header family yields after the reverse proxy confirmed the caller.
//! The auth stage extracts a whole bundle from a single family (service or
//! plain headers), never mixing the two, so a confirmed context always
//! carries a consistent set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identity attributes extracted from one confirmed trust-header family.
///
/// All attribute fields are optional: the reverse proxy is the exclusive
/// writer of the trust headers and guarantees their presence for confirmed
/// callers, but the pipeline reads them as-is and never invents values.
/// Roles are the exception: a confirmed caller without a roles header is a
/// proxy misconfiguration and the auth stage refuses the request rather
/// than constructing an identity at all.
///
/// # Example
///
/// ```
/// use armada_core::TrustedIdentity;
///
/// let identity = TrustedIdentity {
///     user: Some("alice".to_string()),
///     user_id: Some("u1".to_string()),
///     ..TrustedIdentity::default()
/// };
/// assert_eq!(identity.log_id(), "alice");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedIdentity {
    /// User name (`X-SERVICE-USER-NAME` / `X-USER-NAME`).
    pub user: Option<String>,

    /// User ID (`X-SERVICE-USER-ID` / `X-USER-ID`).
    pub user_id: Option<String>,

    /// User domain ID (`X-SERVICE-USER-DOMAIN-ID` / `X-USER-DOMAIN-ID`).
    pub user_domain_id: Option<String>,

    /// Project ID (`X-SERVICE-PROJECT-ID` / `X-PROJECT-ID`).
    pub project_id: Option<String>,

    /// Project domain ID (`X-SERVICE-PROJECT-DOMAIN-ID` for service calls,
    /// `X-PROJECT-DOMAIN-NAME` for direct calls; the proxy's header
    /// contract is asymmetric here and is preserved as observed).
    pub project_domain_id: Option<String>,

    /// Role names split from the roles header, duplicates collapsed.
    pub roles: BTreeSet<String>,
}

impl TrustedIdentity {
    /// Returns a string identifier suitable for logging.
    ///
    /// Never returns sensitive material; falls back to the user ID and then
    /// to `-` when the user name is absent.
    #[must_use]
    pub fn log_id(&self) -> &str {
        self.user
            .as_deref()
            .or(self.user_id.as_deref())
            .unwrap_or("-")
    }

    /// Returns the roles joined with commas, for diagnostics.
    #[must_use]
    pub fn joined_roles(&self) -> String {
        self.roles
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let identity = TrustedIdentity::default();
        assert!(identity.user.is_none());
        assert!(identity.roles.is_empty());
        assert_eq!(identity.log_id(), "-");
    }

    #[test]
    fn test_log_id_prefers_user_name() {
        let identity = TrustedIdentity {
            user: Some("alice".to_string()),
            user_id: Some("u1".to_string()),
            ..TrustedIdentity::default()
        };
        assert_eq!(identity.log_id(), "alice");
    }

    #[test]
    fn test_log_id_falls_back_to_user_id() {
        let identity = TrustedIdentity {
            user_id: Some("u1".to_string()),
            ..TrustedIdentity::default()
        };
        assert_eq!(identity.log_id(), "u1");
    }

    #[test]
    fn test_joined_roles_are_sorted_and_deduplicated() {
        let identity = TrustedIdentity {
            roles: ["viewer", "admin", "admin"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            ..TrustedIdentity::default()
        };
        assert_eq!(identity.joined_roles(), "admin,viewer");
    }

    #[test]
    fn test_serialization_round_trip() {
        let identity = TrustedIdentity {
            user: Some("alice".to_string()),
            user_id: Some("u1".to_string()),
            project_id: Some("p1".to_string()),
            roles: ["admin"].iter().map(ToString::to_string).collect(),
            ..TrustedIdentity::default()
        };
        let json = serde_json::to_string(&identity).expect("serialization should work");
        let parsed: TrustedIdentity =
            serde_json::from_str(&json).expect("deserialization should work");
        assert_eq!(identity, parsed);
    }
}
