use std::fmt;

use subtle::ConstantTimeEq;

use crate::error::CommissionError;

/// Request header carrying the admin shared secret.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Capability check for administrative operations, chosen once at startup.
#[derive(Clone, PartialEq, Eq)]
pub enum AdminPolicy {
    /// Requests must present exactly this secret.
    Enforced { secret: String },
    /// No secret configured; every request is admitted.
    Disabled,
}

impl AdminPolicy {
    /// `Enforced` for a non-blank secret, `Disabled` otherwise.
    pub fn from_secret(secret: Option<String>) -> Self {
        match secret {
            Some(secret) if !secret.trim().is_empty() => AdminPolicy::Enforced { secret },
            _ => AdminPolicy::Disabled,
        }
    }

    pub fn is_enforced(&self) -> bool {
        matches!(self, AdminPolicy::Enforced { .. })
    }

    /// Check the value of the [`ADMIN_KEY_HEADER`] header. The comparison
    /// runs in constant time for keys of the secret's length.
    pub fn authorize(&self, presented: Option<&str>) -> Result<(), CommissionError> {
        match self {
            AdminPolicy::Disabled => Ok(()),
            AdminPolicy::Enforced { secret } => match presented {
                Some(key) if bool::from(key.as_bytes().ct_eq(secret.as_bytes())) => Ok(()),
                _ => Err(CommissionError::Unauthorized),
            },
        }
    }
}

impl fmt::Debug for AdminPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminPolicy::Enforced { .. } => f.write_str("Enforced { secret: <redacted> }"),
            AdminPolicy::Disabled => f.write_str("Disabled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enforced_requires_exact_secret() {
        let policy = AdminPolicy::from_secret(Some("s3cret".to_string()));
        assert!(policy.is_enforced());
        assert!(policy.authorize(Some("s3cret")).is_ok());
        assert!(matches!(
            policy.authorize(Some("S3CRET")),
            Err(CommissionError::Unauthorized)
        ));
        assert!(policy.authorize(None).is_err());
    }

    #[test]
    fn prefixes_and_extensions_are_rejected() {
        let policy = AdminPolicy::from_secret(Some("s3cret".to_string()));
        for key in ["", "s3cre", "s3cret ", "s3cret-extra", "x3cret"] {
            assert!(
                matches!(policy.authorize(Some(key)), Err(CommissionError::Unauthorized)),
                "{key:?} was accepted"
            );
        }
    }

    #[test]
    fn blank_secret_disables() {
        for secret in [None, Some(String::new()), Some("  ".to_string())] {
            let policy = AdminPolicy::from_secret(secret);
            assert_eq!(policy, AdminPolicy::Disabled);
            assert!(policy.authorize(None).is_ok());
        }
    }

    #[test]
    fn debug_hides_secret() {
        let policy = AdminPolicy::from_secret(Some("s3cret".to_string()));
        assert!(!format!("{policy:?}").contains("s3cret"));
    }
}
