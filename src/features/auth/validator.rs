use super::model::{AuthenticatedUser, Claims};
use crate::core::config::AuthConfig;
use crate::core::error::AppError;
use crate::features::users::UserRepository;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use std::sync::Arc;

pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
    users: Arc<dyn UserRepository>,
}

impl JwtValidator {
    pub fn new(config: &AuthConfig, users: Arc<dyn UserRepository>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.jwt_leeway.as_secs();
        validation.validate_nbf = true;

        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }

        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            users,
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        if header.alg != Algorithm::HS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only HS256 is allowed",
                header.alg
            )));
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let user_id = token_data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::Auth("Invalid subject claim".to_string()))?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::UserRole;
    use crate::shared::test_helpers::MemoryDatabase;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::Duration;

    const SECRET: &str = "test-secret";

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: SECRET.to_string(),
            issuer: None,
            audience: None,
            jwt_leeway: Duration::from_secs(0),
        }
    }

    fn token_for(sub: &str, exp_offset: i64, secret: &str) -> String {
        let exp = (chrono::Utc::now().timestamp() + exp_offset) as u64;
        let claims = Claims {
            sub: sub.to_string(),
            exp,
            iat: None,
            iss: None,
            aud: None,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_valid_token_resolves_user() {
        let db = Arc::new(MemoryDatabase::new());
        let admin = db.add_user("Ada", UserRole::Admin);
        let validator = JwtValidator::new(&config(), db);

        let user = validator
            .validate_token(&token_for(&admin.id.to_string(), 3600, SECRET))
            .await
            .unwrap();

        assert_eq!(user.id, admin.id);
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn test_rejects_bad_signature() {
        let db = Arc::new(MemoryDatabase::new());
        let user = db.add_user("Bob", UserRole::User);
        let validator = JwtValidator::new(&config(), db);

        let result = validator
            .validate_token(&token_for(&user.id.to_string(), 3600, "other-secret"))
            .await;

        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[tokio::test]
    async fn test_rejects_expired_token() {
        let db = Arc::new(MemoryDatabase::new());
        let user = db.add_user("Bob", UserRole::User);
        let validator = JwtValidator::new(&config(), db);

        let result = validator
            .validate_token(&token_for(&user.id.to_string(), -3600, SECRET))
            .await;

        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[tokio::test]
    async fn test_rejects_unknown_user() {
        let db = Arc::new(MemoryDatabase::new());
        let validator = JwtValidator::new(&config(), db);

        let result = validator
            .validate_token(&token_for("9999", 3600, SECRET))
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_rejects_non_numeric_subject() {
        let db = Arc::new(MemoryDatabase::new());
        let validator = JwtValidator::new(&config(), db);

        let result = validator
            .validate_token(&token_for("not-a-number", 3600, SECRET))
            .await;

        assert!(matches!(result, Err(AppError::Auth(_))));
    }
}
