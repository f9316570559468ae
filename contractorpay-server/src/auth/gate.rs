//! Capability gate
//!
//! Authorization happens here, before an action touches any data, and
//! yields a tagged decision instead of failing somewhere mid-handler.

use super::Session;

/// What a caller is asking to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Worker/client/transaction CRUD and dashboard reads
    ManageLedger,
    /// Listing, creating, and deleting user accounts
    ManageUsers,
}

/// Tagged authorization outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Authorized,
    Unauthorized,
}

impl Decision {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized)
    }
}

/// Decide whether a session may exercise a capability.
pub fn check(session: &Session, capability: Capability) -> Decision {
    match capability {
        Capability::ManageLedger => Decision::Authorized,
        Capability::ManageUsers => {
            if session.role.is_admin() {
                Decision::Authorized
            } else {
                Decision::Unauthorized
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contractorpay_core::models::Role;
    use uuid::Uuid;

    fn session(role: Role) -> Session {
        Session {
            user_id: Uuid::new_v4(),
            username: "someone".into(),
            role,
        }
    }

    #[test]
    fn any_session_may_manage_the_ledger() {
        assert!(check(&session(Role::Partner), Capability::ManageLedger).is_authorized());
        assert!(check(&session(Role::Admin), Capability::ManageLedger).is_authorized());
    }

    #[test]
    fn only_admins_manage_users() {
        assert_eq!(
            check(&session(Role::Partner), Capability::ManageUsers),
            Decision::Unauthorized
        );
        assert!(check(&session(Role::Admin), Capability::ManageUsers).is_authorized());
    }
}
