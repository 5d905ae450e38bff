/// Password hashing and verification using Argon2id
use crate::error::{AppError, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password with a fresh random salt
///
/// Returns a PHC-formatted string that embeds algorithm, parameters and salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a PHC-formatted hash
///
/// `Ok(false)` means the password does not match; `Err` means the stored hash
/// itself is unusable.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash format: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Internal(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").expect("should hash password");
        assert!(verify_password("correct horse", &hash).expect("should verify"));
        assert!(!verify_password("wrong horse", &hash).expect("should verify"));
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let hash1 = hash_password("correct horse").expect("should hash");
        let hash2 = hash_password("correct horse").expect("should hash");
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_garbage_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
