//! Token codec seam.

use crate::claims::TokenClaims;
use crate::error::AuthResult;

/// Signs and verifies the session token carrying the access map and expiry.
///
/// `decode` must fail with [`crate::AuthError::Forbidden`] for anything wrong
/// with a presented token — expired, bad signature, wrong shape — so callers
/// can map every decode failure to a definite deny.
pub trait TokenCodec: Send + Sync {
    fn encode(&self, claims: &TokenClaims) -> AuthResult<String>;

    fn decode(&self, token: &str) -> AuthResult<TokenClaims>;
}
