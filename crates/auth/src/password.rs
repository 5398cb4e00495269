//! Password hashing seam.

use crate::error::AuthResult;

/// Collaborator that hashes and verifies credentials.
///
/// The domain never sees plaintext beyond these calls: stored passwords are
/// opaque hash strings, and `identify` is the validation hook that checks a
/// stored value actually is one.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into an opaque, self-describing string.
    fn hash(&self, plaintext: &str) -> AuthResult<String>;

    /// Verify a plaintext password against a stored hash. Must be
    /// constant-time with respect to the hash comparison.
    fn verify(&self, plaintext: &str, hashed: &str) -> bool;

    /// Is this string a recognized hash format?
    fn identify(&self, hashed: &str) -> bool;
}
