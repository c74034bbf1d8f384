//! Authentication service for user registration, login, and token management

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::{Role, User};
use shared::validation::{validate_email, validate_password, validate_username};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
    admin_code: Option<String>,
    staff_code: Option<String>,
}

/// Input for registering a new account
#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Optional role-unlock code; without one the account is a plain user.
    pub role_code: Option<String>,
}

/// Input for logging in
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Response after successful registration or login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    #[serde(flatten)]
    pub tokens: AuthTokens,
}

/// User row with the password hash, never serialized out
#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    pub id: Uuid,
    pub role: Role,
    pub password_hash: String,
    pub is_active: bool,
}

const USER_COLUMNS: &str =
    "id, username, email, role, first_name, last_name, is_active, created_at, updated_at";

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            refresh_token_expiry: config.jwt.refresh_token_expiry,
            admin_code: config.auth.admin_code.clone(),
            staff_code: config.auth.staff_code.clone(),
        }
    }

    /// Register a new account. The role is decided by the optional unlock
    /// code; a wrong code is rejected rather than silently downgraded.
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthResponse> {
        validate_username(&input.username)
            .map_err(|msg| AppError::validation("username", msg))?;
        validate_email(&input.email).map_err(|msg| AppError::validation("email", msg))?;
        validate_password(&input.password)
            .map_err(|msg| AppError::validation("password", msg))?;

        let role = self.resolve_role(input.role_code.as_deref())?;

        // Check username/email uniqueness
        let taken = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE username = $1 OR email = $2",
        )
        .bind(&input.username)
        .bind(&input.email)
        .fetch_one(&self.db)
        .await?;

        if taken > 0 {
            return Err(AppError::Conflict(
                "Username or email already registered".to_string(),
            ));
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password_hash, role, first_name, last_name) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {USER_COLUMNS}",
        ))
        .bind(&input.username)
        .bind(&input.email)
        .bind(&password_hash)
        .bind(role)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .fetch_one(&self.db)
        .await?;

        let tokens = self.generate_tokens(user.id, user.role)?;
        self.store_refresh_token(user.id, &tokens.refresh_token).await?;

        Ok(AuthResponse { user, tokens })
    }

    /// Authenticate with username and password. Failures are reported with
    /// one generic message so callers cannot probe which part was wrong.
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthResponse> {
        let credentials = sqlx::query_as::<_, CredentialRow>(
            "SELECT id, role, password_hash, is_active FROM users WHERE username = $1",
        )
        .bind(&input.username)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| {
            AppError::Unauthenticated("Invalid username or password".to_string())
        })?;

        let valid = verify(&input.password, &credentials.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::Unauthenticated(
                "Invalid username or password".to_string(),
            ));
        }

        if !credentials.is_active {
            return Err(AppError::Unauthenticated(
                "Account is disabled".to_string(),
            ));
        }

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1",
        ))
        .bind(credentials.id)
        .fetch_one(&self.db)
        .await?;

        let tokens = self.generate_tokens(user.id, user.role)?;
        self.store_refresh_token(user.id, &tokens.refresh_token).await?;

        Ok(AuthResponse { user, tokens })
    }

    /// Rotate a refresh token: the presented token is revoked and a fresh
    /// pair is issued.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthTokens> {
        let token_hash = Self::hash_token(refresh_token);

        let record = sqlx::query_as::<_, (Uuid, Role)>(
            r#"
            SELECT rt.user_id, u.role
            FROM refresh_tokens rt
            JOIN users u ON u.id = rt.user_id
            WHERE rt.token_hash = $1
              AND rt.expires_at > NOW()
              AND rt.revoked_at IS NULL
              AND u.is_active = true
            "#,
        )
        .bind(&token_hash)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| {
            AppError::Unauthenticated("Invalid or expired refresh token".to_string())
        })?;

        let (user_id, role) = record;

        sqlx::query("UPDATE refresh_tokens SET revoked_at = NOW() WHERE token_hash = $1")
            .bind(&token_hash)
            .execute(&self.db)
            .await?;

        let tokens = self.generate_tokens(user_id, role)?;
        self.store_refresh_token(user_id, &tokens.refresh_token).await?;

        Ok(tokens)
    }

    /// Revoke every refresh token the user holds.
    pub async fn logout(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW() WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    /// Map a role-unlock code to the role it grants.
    fn resolve_role(&self, code: Option<&str>) -> AppResult<Role> {
        let code = match code {
            None | Some("") => return Ok(Role::User),
            Some(code) => code,
        };
        if self.admin_code.as_deref() == Some(code) {
            return Ok(Role::Admin);
        }
        if self.staff_code.as_deref() == Some(code) {
            return Ok(Role::Staff);
        }
        Err(AppError::validation("role_code", "Unknown role code"))
    }

    /// Generate access and refresh tokens
    fn generate_tokens(&self, user_id: Uuid, role: Role) -> AppResult<AuthTokens> {
        let now = Utc::now();
        let access_exp = now + Duration::seconds(self.access_token_expiry);

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.as_str().to_string(),
            exp: access_exp.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        // Refresh token (simple random token)
        let refresh_token = Uuid::new_v4().to_string();

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    /// Store refresh token in database
    async fn store_refresh_token(&self, user_id: Uuid, token: &str) -> AppResult<()> {
        let token_hash = Self::hash_token(token);
        let expires_at = Utc::now() + Duration::seconds(self.refresh_token_expiry);

        sqlx::query(
            "INSERT INTO refresh_tokens (user_id, token_hash, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(&token_hash)
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Hash a token for storage
    fn hash_token(token: &str) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        format!("{:x}", hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_codes(admin: Option<&str>, staff: Option<&str>) -> AuthService {
        AuthService {
            db: PgPool::connect_lazy("postgres://localhost/unused").unwrap(),
            jwt_secret: "test-secret".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 604800,
            admin_code: admin.map(String::from),
            staff_code: staff.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_no_code_registers_plain_user() {
        let service = service_with_codes(Some("ADM"), Some("STF"));
        assert_eq!(service.resolve_role(None).unwrap(), Role::User);
        assert_eq!(service.resolve_role(Some("")).unwrap(), Role::User);
    }

    #[tokio::test]
    async fn test_codes_unlock_roles() {
        let service = service_with_codes(Some("ADM"), Some("STF"));
        assert_eq!(service.resolve_role(Some("ADM")).unwrap(), Role::Admin);
        assert_eq!(service.resolve_role(Some("STF")).unwrap(), Role::Staff);
    }

    #[tokio::test]
    async fn test_unknown_code_rejected() {
        let service = service_with_codes(Some("ADM"), None);
        assert!(service.resolve_role(Some("STF")).is_err());
        assert!(service.resolve_role(Some("wrong")).is_err());
    }

    #[tokio::test]
    async fn test_tokens_carry_role_and_expiry() {
        let service = service_with_codes(None, None);
        let tokens = service.generate_tokens(Uuid::new_v4(), Role::Staff).unwrap();
        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 3600);
        assert!(!tokens.access_token.is_empty());
        assert_ne!(tokens.access_token, tokens.refresh_token);
    }

    #[test]
    fn test_hash_token_is_stable() {
        assert_eq!(
            AuthService::hash_token("abc"),
            AuthService::hash_token("abc")
        );
        assert_ne!(
            AuthService::hash_token("abc"),
            AuthService::hash_token("abd")
        );
    }
}
