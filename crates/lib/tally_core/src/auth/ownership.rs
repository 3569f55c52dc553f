//! Resource ownership enforcement.

use thiserror::Error;

/// A resource was addressed by an identity other than its owner.
#[derive(Debug, Error)]
#[error("resource belongs to user {owner_id}, not user {requester_id}")]
pub struct OwnershipViolation {
    pub owner_id: i64,
    pub requester_id: i64,
}

/// Check that `requester_id` owns the resource.
///
/// Pure comparison, no I/O. Callers must have already confirmed the
/// resource exists: a missing resource is reported as not-found before
/// ownership is ever evaluated, so a lookup miss never leaks who owns
/// what.
pub fn check_ownership(owner_id: i64, requester_id: i64) -> Result<(), OwnershipViolation> {
    if owner_id == requester_id {
        Ok(())
    } else {
        Err(OwnershipViolation {
            owner_id,
            requester_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_passes() {
        assert!(check_ownership(3, 3).is_ok());
    }

    #[test]
    fn non_owner_is_rejected_in_both_directions() {
        let violation = check_ownership(1, 2).unwrap_err();
        assert_eq!(violation.owner_id, 1);
        assert_eq!(violation.requester_id, 2);
        assert!(check_ownership(2, 1).is_err());
    }
}
