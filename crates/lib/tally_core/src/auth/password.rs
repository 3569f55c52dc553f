//! Password hashing via bcrypt.
//!
//! The rest of the core only ever sees the opaque hash; plaintext
//! comparison is never used anywhere.

use super::AuthError;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Check a supplied password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::Internal(format!("bcrypt verify: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert_ne!(hash, "hunter2hunter2");
        assert!(verify_password("hunter2hunter2", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }
}
