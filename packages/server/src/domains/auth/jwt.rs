use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::UserId;

/// JWT Claims - data stored in the token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,     // Subject (user_id as string)
    pub user_id: Uuid,   // User UUID
    pub email: String,   // Account e-mail (for logging/debugging)
    pub is_admin: bool,  // Admin flag
    pub exp: i64,        // Expiration timestamp
    pub iat: i64,        // Issued at timestamp
    pub iss: String,     // Issuer
    pub jti: String,     // JWT ID (unique token identifier)
}

impl Claims {
    pub fn user_id(&self) -> UserId {
        UserId::from_uuid(self.user_id)
    }
}

/// JWT Service - creates and verifies JWT tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    /// Create new JWT service with secret and issuer
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Create a new JWT token for a user
    ///
    /// Token expires after 30 days, matching the frontend session length
    pub fn create_token(&self, user_id: UserId, email: String, is_admin: bool) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::days(30);

        let claims = Claims {
            sub: user_id.to_string(),
            user_id: user_id.into_uuid(),
            email,
            is_admin,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify and decode a JWT token
    ///
    /// Returns claims if token is valid and not expired
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_verify_token() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        let user_id = UserId::new();

        let token = service
            .create_token(user_id, "koch@example.com".to_string(), true)
            .unwrap();

        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "koch@example.com");
        assert!(claims.is_admin);
        assert_eq!(claims.iss, "test_issuer");
    }

    #[test]
    fn test_invalid_token() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        assert!(service.verify_token("invalid_token").is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let service1 = JwtService::new("secret1", "test_issuer".to_string());
        let service2 = JwtService::new("secret2", "test_issuer".to_string());

        let token = service1
            .create_token(UserId::new(), "koch@example.com".to_string(), false)
            .unwrap();

        assert!(service2.verify_token(&token).is_err());
    }

    #[test]
    fn test_wrong_issuer() {
        let service1 = JwtService::new("secret", "frontend".to_string());
        let service2 = JwtService::new("secret", "rezeptbuch".to_string());

        let token = service1
            .create_token(UserId::new(), "koch@example.com".to_string(), false)
            .unwrap();

        assert!(service2.verify_token(&token).is_err());
    }

    #[test]
    fn test_expiry_is_thirty_days() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        let token = service
            .create_token(UserId::new(), "koch@example.com".to_string(), false)
            .unwrap();

        let claims = service.verify_token(&token).unwrap();
        let expires_in = claims.exp - chrono::Utc::now().timestamp();
        assert!(expires_in > 29 * 24 * 3600);
        assert!(expires_in <= 30 * 24 * 3600);
    }
}
