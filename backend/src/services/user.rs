//! User administration service
//!
//! Listing, profile updates, and account removal. Role and activation
//! changes are gated to admins in the handler layer; this service only
//! applies them. Deleting a user keeps their purchase and sell history;
//! those rows surface under sentinel names in analytics.

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::{Role, User};
use shared::validation::validate_email;

use crate::error::{AppError, AppResult};
use crate::services::ListParams;

/// User service
#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

/// Partial-field update for a user account
#[derive(Debug, Deserialize)]
pub struct UpdateUserInput {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl UpdateUserInput {
    /// Whether this update touches fields only admins may change.
    pub fn touches_privileged_fields(&self) -> bool {
        self.role.is_some() || self.is_active.is_some()
    }
}

const USER_COLUMNS: &str =
    "id, username, email, role, first_name, last_name, is_active, created_at, updated_at";

impl UserService {
    /// Create a new UserService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get a single user
    pub async fn get(&self, user_id: Uuid) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1",
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    /// List users, optionally scoped to a single account (self-scoped
    /// roles only ever see themselves).
    pub async fn list(&self, scope: Option<Uuid>, params: &ListParams) -> AppResult<Vec<User>> {
        let (limit, offset) = params.limit_offset();
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE ($1::uuid IS NULL OR id = $1) \
             ORDER BY username ASC LIMIT $2 OFFSET $3",
        ))
        .bind(scope)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(users)
    }

    /// Apply a partial update.
    pub async fn update(&self, user_id: Uuid, input: UpdateUserInput) -> AppResult<User> {
        let existing = self.get(user_id).await?;

        let email = match input.email {
            Some(email) => {
                validate_email(&email).map_err(|msg| AppError::validation("email", msg))?;
                let taken = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM users WHERE email = $1 AND id <> $2",
                )
                .bind(&email)
                .bind(user_id)
                .fetch_one(&self.db)
                .await?;
                if taken > 0 {
                    return Err(AppError::Conflict("Email already registered".to_string()));
                }
                email
            }
            None => existing.email,
        };

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET email = $2, first_name = $3, last_name = $4, role = $5, \
             is_active = $6, updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}",
        ))
        .bind(user_id)
        .bind(&email)
        .bind(input.first_name.or(existing.first_name))
        .bind(input.last_name.or(existing.last_name))
        .bind(input.role.unwrap_or(existing.role))
        .bind(input.is_active.unwrap_or(existing.is_active))
        .fetch_one(&self.db)
        .await?;

        Ok(user)
    }

    /// Delete an account. Refresh tokens go with it; trade history stays.
    pub async fn delete(&self, user_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privileged_field_detection() {
        let plain = UpdateUserInput {
            email: Some("a@b.com".to_string()),
            first_name: None,
            last_name: None,
            role: None,
            is_active: None,
        };
        assert!(!plain.touches_privileged_fields());

        let role_change = UpdateUserInput {
            email: None,
            first_name: None,
            last_name: None,
            role: Some(Role::Staff),
            is_active: None,
        };
        assert!(role_change.touches_privileged_fields());

        let deactivation = UpdateUserInput {
            email: None,
            first_name: None,
            last_name: None,
            role: None,
            is_active: Some(false),
        };
        assert!(deactivation.touches_privileged_fields());
    }
}
