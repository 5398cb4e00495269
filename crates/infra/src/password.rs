//! Argon2 password hashing.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};

use gatehouse_auth::{AuthError, AuthResult, PasswordHasher};

/// Argon2id hasher producing PHC-format strings.
///
/// `identify` accepts any parseable PHC hash, so records hashed under an
/// older scheme still validate as "hashed" and can be migrated gradually.
#[derive(Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::internal(format!("password hashing failed: {e}")))
    }

    fn verify(&self, plaintext: &str, hashed: &str) -> bool {
        match PasswordHash::new(hashed) {
            Ok(parsed) => self
                .argon2
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    fn identify(&self, hashed: &str) -> bool {
        PasswordHash::new(hashed).is_ok()
    }
}
