//! Ownership checks for mutating owned resources
//!
//! Only the owner may change or remove a resource. There are no roles and
//! no administrative override.

use crate::error::ApiError;
use tracing::warn;
use uuid::Uuid;

/// Decides whether a caller may mutate a resource owned by someone
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnershipGuard;

impl OwnershipGuard {
    pub fn new() -> Self {
        Self
    }

    /// Permit iff the caller is the owner
    #[inline]
    pub fn is_allowed_to_edit(&self, caller_id: Uuid, owner_id: Uuid) -> bool {
        caller_id == owner_id
    }

    /// Like `is_allowed_to_edit`, but as a client-visible `Forbidden` error
    pub fn ensure_can_edit(&self, caller_id: Uuid, owner_id: Uuid) -> Result<(), ApiError> {
        if self.is_allowed_to_edit(caller_id, owner_id) {
            return Ok(());
        }

        warn!(caller = %caller_id, owner = %owner_id, "Ownership check denied");
        metrics::counter!("ownership_denied_total").increment(1);
        Err(ApiError::Forbidden(
            "You do not have permission to modify this resource".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_owner_is_allowed() {
        let guard = OwnershipGuard::new();
        let user = Uuid::new_v4();

        assert!(guard.is_allowed_to_edit(user, user));
        assert!(guard.ensure_can_edit(user, user).is_ok());
    }

    #[test]
    fn test_non_owner_is_forbidden() {
        let guard = OwnershipGuard::new();
        let owner = Uuid::new_v4();
        let caller = Uuid::new_v4();

        assert!(!guard.is_allowed_to_edit(caller, owner));
        assert!(matches!(
            guard.ensure_can_edit(caller, owner),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn test_nil_ids_only_match_each_other() {
        let guard = OwnershipGuard::new();
        assert!(guard.is_allowed_to_edit(Uuid::nil(), Uuid::nil()));
        assert!(!guard.is_allowed_to_edit(Uuid::nil(), Uuid::new_v4()));
    }

    proptest! {
        #[test]
        fn prop_guard_is_identity_equality(a in any::<[u8; 16]>(), b in any::<[u8; 16]>()) {
            let guard = OwnershipGuard::new();
            let (a, b) = (Uuid::from_bytes(a), Uuid::from_bytes(b));

            prop_assert!(guard.is_allowed_to_edit(a, a));
            prop_assert_eq!(guard.is_allowed_to_edit(a, b), a == b);
            prop_assert_eq!(guard.is_allowed_to_edit(a, b), guard.is_allowed_to_edit(b, a));
        }
    }
}
