//! HS256 session token codec.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use gatehouse_auth::{AuthError, AuthResult, TokenClaims, TokenCodec};

/// Signs and verifies session tokens with a shared HS256 secret.
pub struct JwtCodec {
    header: Header,
    validation: Validation,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtCodec {
    pub fn hs256(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            header: Header::new(Algorithm::HS256),
            validation,
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

impl TokenCodec for JwtCodec {
    fn encode(&self, claims: &TokenClaims) -> AuthResult<String> {
        jsonwebtoken::encode(&self.header, claims, &self.encoding)
            .map_err(|e| AuthError::internal(format!("token signing failed: {e}")))
    }

    fn decode(&self, token: &str) -> AuthResult<TokenClaims> {
        jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::forbidden(format!("invalid token: {e}")))
    }
}
