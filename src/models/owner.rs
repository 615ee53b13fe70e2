//! Venue owner identity claims

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for a venue owner session.
///
/// Tokens are issued by the platform's auth service; this server only
/// validates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerClaims {
    /// Subject, the owner's account email
    pub sub: String,
    /// Owner account id, compared against `venues.owner_id`
    pub owner_id: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl OwnerClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}
