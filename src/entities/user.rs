//! User record and authentication payloads

use crate::core::entity::Record;
use crate::core::field::FieldValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A registered user. The password is stored as an argon2 hash only.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

impl Record for User {
    fn record_type() -> &'static str {
        "user"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(self.id.into()),
            "username" => Some(self.username.clone().into()),
            "email" => Some(self.email.clone().into()),
            "created_at" => Some(self.created_at.into()),
            _ => None,
        }
    }
}

/// Public projection of a user embedded in posts and comments
#[derive(Debug, Clone, Serialize)]
pub struct UserPublic {
    pub id: Uuid,
    pub username: String,
}

impl From<&User> for UserPublic {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Signup payload. The username character class is checked separately via
/// [`crate::core::validation::validate_username`].
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Username must not be empty."))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long."))]
    pub password: String,
    #[validate(email(message = "Invalid email address."))]
    pub email: String,
}

/// Login payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username must not be empty."))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long."))]
    pub password: String,
}

/// Response for successful signup/login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub session_id: Uuid,
    pub username: String,
    pub message: String,
}
