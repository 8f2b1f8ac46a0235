//! Who may change what on an issue.
//!
//! Checks run before any write, so a denial never leaves partial effects.

use crate::features::auth::model::AuthenticatedUser;
use crate::features::issues::models::Issue;

/// Owners may edit their own issues; admins may edit any issue
pub fn can_mutate(user: &AuthenticatedUser, issue: &Issue) -> bool {
    user.is_admin() || user.id == issue.reporter_id
}

/// Only admins move an issue through its lifecycle
pub fn can_set_status(user: &AuthenticatedUser) -> bool {
    user.is_admin()
}

pub fn can_delete(user: &AuthenticatedUser) -> bool {
    user.is_admin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::UserRole;
    use crate::shared::test_helpers::{authenticated, sample_issue};

    #[test]
    fn test_owner_can_mutate_but_not_set_status() {
        let owner = authenticated(1, UserRole::User);
        let issue = sample_issue(10, owner.id);

        assert!(can_mutate(&owner, &issue));
        assert!(!can_set_status(&owner));
        assert!(!can_delete(&owner));
    }

    #[test]
    fn test_stranger_cannot_mutate() {
        let stranger = authenticated(2, UserRole::User);
        let issue = sample_issue(10, 1);

        assert!(!can_mutate(&stranger, &issue));
    }

    #[test]
    fn test_admin_can_do_everything() {
        let admin = authenticated(3, UserRole::Admin);
        let issue = sample_issue(10, 1);

        assert!(can_mutate(&admin, &issue));
        assert!(can_set_status(&admin));
        assert!(can_delete(&admin));
    }
}
