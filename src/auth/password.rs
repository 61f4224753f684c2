use argon2::{
    password_hash::{
        rand_core::OsRng,
        Error::{self, Password},
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};

/// Hash a password with Argon2 and a fresh random salt.
///
/// The returned PHC string embeds the salt and parameters.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);

    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Verifies a password against a stored PHC hash string
pub fn verify_password(password: &str, hash: &str) -> Result<bool, Error> {
    let parsed_hash = PasswordHash::new(hash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(Password) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing_and_verification() {
        let hash = hash_password("password123").expect("Failed to hash password");

        assert!(verify_password("password123", &hash).expect("Failed to verify password"));
        assert!(!verify_password("password124", &hash).expect("Failed to verify password"));
    }

    #[test]
    fn test_same_password_gets_different_hashes() {
        let first = hash_password("same_password").expect("Failed to hash password");
        let second = hash_password("same_password").expect("Failed to hash password");

        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
