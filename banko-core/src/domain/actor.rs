//! Authenticated actors and the access rules between them

use serde::Serialize;

use super::admin::AdminRole;
use super::result::Error;

/// Whoever is performing an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Actor {
    Admin { username: String, role: AdminRole },
    Customer { account_no: String },
}

impl Actor {
    /// Name written to `performed_by` and to the audit trail
    pub fn name(&self) -> &str {
        match self {
            Actor::Admin { username, .. } => username,
            Actor::Customer { account_no } => account_no,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Actor::Admin { .. })
    }

    pub fn require_admin(&self) -> Result<(), Error> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::permission_denied("admin access required"))
        }
    }

    pub fn require_superadmin(&self) -> Result<(), Error> {
        match self {
            Actor::Admin { role: AdminRole::Superadmin, .. } => Ok(()),
            _ => Err(Error::permission_denied("superadmin access required")),
        }
    }

    /// Admins reach every account, customers only their own
    pub fn require_access(&self, account_no: &str) -> Result<(), Error> {
        match self {
            Actor::Admin { .. } => Ok(()),
            Actor::Customer { account_no: own } if own == account_no => Ok(()),
            Actor::Customer { .. } => Err(Error::permission_denied(format!(
                "no access to account {}",
                account_no
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clerk() -> Actor {
        Actor::Admin { username: "maria".to_string(), role: AdminRole::Clerk }
    }

    fn customer(no: &str) -> Actor {
        Actor::Customer { account_no: no.to_string() }
    }

    #[test]
    fn test_customer_reaches_only_own_account() {
        let actor = customer("AC11111111");
        assert!(actor.require_access("AC11111111").is_ok());
        assert!(matches!(
            actor.require_access("AC22222222"),
            Err(Error::PermissionDenied(_))
        ));
        assert!(actor.require_admin().is_err());
    }

    #[test]
    fn test_clerk_is_admin_but_not_superadmin() {
        let actor = clerk();
        assert!(actor.require_admin().is_ok());
        assert!(actor.require_access("AC22222222").is_ok());
        assert!(actor.require_superadmin().is_err());
        assert_eq!(actor.name(), "maria");
    }
}
