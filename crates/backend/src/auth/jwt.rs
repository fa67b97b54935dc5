//! JWT token creation and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::error::AuthError;
use super::types::{AuthUser, Claims};

/// The only algorithm tokens are signed with or accepted under.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Signs identity claims into compact tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Create a token for a user that expires `ttl` from now.
    pub fn issue(&self, username: &str, user_id: i32, ttl: Duration) -> Result<String, AuthError> {
        let exp = Utc::now()
            .checked_add_signed(ttl)
            .ok_or(AuthError::TokenLifetime)?;

        let claims = Claims {
            sub: Some(username.to_string()),
            id: Some(user_id),
            exp: exp.timestamp(),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.key).map_err(AuthError::Signing)
    }
}

/// Checks token signatures and expiry and extracts the caller identity.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is exact; a token is dead the second its `exp` passes.
        validation.leeway = 0;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Validate a token and return the identity it asserts.
    ///
    /// Trusts the claims alone; the user is not looked up again.
    pub fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        let token_data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!("Rejected token: {}", e);
            AuthError::Unauthenticated
        })?;

        match token_data.claims {
            Claims {
                sub: Some(username),
                id: Some(user_id),
                ..
            } => Ok(AuthUser { username, user_id }),
            _ => Err(AuthError::Unauthenticated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    const SECRET: &str = "test-secret-key-for-testing-only";

    fn sign_raw(header: &Header, payload: serde_json::Value, secret: &str) -> String {
        encode(header, &payload, &EncodingKey::from_secret(secret.as_bytes()))
            .expect("should encode")
    }

    fn future_exp() -> i64 {
        (Utc::now() + Duration::minutes(5)).timestamp()
    }

    #[test]
    fn test_issue_and_verify() {
        let token = TokenIssuer::new(SECRET)
            .issue("alice", 7, Duration::minutes(20))
            .expect("should create token");

        let user = TokenVerifier::new(SECRET)
            .verify(&token)
            .expect("should validate token");
        assert_eq!(
            user,
            AuthUser {
                username: "alice".to_string(),
                user_id: 7
            }
        );
    }

    #[test]
    fn test_token_is_three_part_hs256() {
        let token = TokenIssuer::new(SECRET)
            .issue("alice", 7, Duration::minutes(20))
            .expect("should create token");
        assert_eq!(token.split('.').count(), 3);

        let header = jsonwebtoken::decode_header(&token).expect("should decode header");
        assert_eq!(header.alg, Algorithm::HS256);

        let payload = token.split('.').nth(1).expect("payload segment");
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(payload)
            .expect("payload is base64url");
        let claims: serde_json::Value = serde_json::from_slice(&bytes).expect("payload is json");
        assert_eq!(claims["sub"], "alice");
        assert_eq!(claims["id"], 7);
        assert!(claims["exp"].is_i64());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = TokenIssuer::new(SECRET)
            .issue("alice", 7, Duration::seconds(-1))
            .expect("should create token");

        let result = TokenVerifier::new(SECRET).verify(&token);
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[test]
    fn test_unrepresentable_ttl_is_an_error() {
        let issuer = TokenIssuer::new(SECRET);
        assert!(matches!(
            issuer.issue("alice", 7, Duration::MAX),
            Err(AuthError::TokenLifetime)
        ));
        assert!(matches!(
            issuer.issue("alice", 7, Duration::MIN),
            Err(AuthError::TokenLifetime)
        ));
    }

    #[test]
    fn test_invalid_token_rejected() {
        let result = TokenVerifier::new(SECRET).verify("not-a-jwt");
        assert!(matches!(result, Err(AuthError::Unauthenticated)));

        let result = TokenVerifier::new(SECRET).verify("");
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = TokenIssuer::new(SECRET)
            .issue("alice", 7, Duration::minutes(20))
            .expect("should create token");

        let result = TokenVerifier::new("wrong-secret").verify(&token);
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let token = TokenIssuer::new(SECRET)
            .issue("alice", 7, Duration::minutes(20))
            .expect("should create token");
        let (unsigned, _) = token.rsplit_once('.').expect("signature segment");
        let forged = format!("{}.{}", unsigned, "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");

        let result = TokenVerifier::new(SECRET).verify(&forged);
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[test]
    fn test_algorithm_mismatch_rejected() {
        let token = sign_raw(
            &Header::new(Algorithm::HS384),
            serde_json::json!({"sub": "alice", "id": 7, "exp": future_exp()}),
            SECRET,
        );

        let result = TokenVerifier::new(SECRET).verify(&token);
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[test]
    fn test_missing_claims_rejected() {
        let verifier = TokenVerifier::new(SECRET);
        let header = Header::new(Algorithm::HS256);

        let no_id = sign_raw(
            &header,
            serde_json::json!({"sub": "alice", "exp": future_exp()}),
            SECRET,
        );
        assert!(matches!(verifier.verify(&no_id), Err(AuthError::Unauthenticated)));

        let null_sub = sign_raw(
            &header,
            serde_json::json!({"sub": null, "id": 7, "exp": future_exp()}),
            SECRET,
        );
        assert!(matches!(verifier.verify(&null_sub), Err(AuthError::Unauthenticated)));

        let no_exp = sign_raw(&header, serde_json::json!({"sub": "alice", "id": 7}), SECRET);
        assert!(matches!(verifier.verify(&no_exp), Err(AuthError::Unauthenticated)));
    }

    #[test]
    fn test_foreign_token_with_same_secret_accepted() {
        // Any HS256 JWT library with the shared secret produces interoperable tokens.
        let token = sign_raw(
            &Header::new(Algorithm::HS256),
            serde_json::json!({"sub": "bob", "id": 42, "exp": future_exp()}),
            SECRET,
        );

        let user = TokenVerifier::new(SECRET).verify(&token).expect("should validate");
        assert_eq!(user.username, "bob");
        assert_eq!(user.user_id, 42);
    }
}
