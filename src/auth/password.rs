use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

/// Hash a plain-text password for storage.
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Verify a plain-text password against a stored hash.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, BcryptError> {
    verify(password, password_hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        // Low cost keeps the test fast; production paths use DEFAULT_COST
        let hashed = hash("hunter2", 4).unwrap();
        assert!(verify_password("hunter2", &hashed).unwrap());
        assert!(!verify_password("hunter3", &hashed).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify_password("hunter2", "not-a-bcrypt-hash").is_err());
    }
}
