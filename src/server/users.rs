//! Signup, login and logout handlers

use crate::core::error::{ApiError, EntityError, SessionError};
use crate::core::validation::validate_username;
use crate::entities::{AuthResponse, LoginRequest, SignupRequest, User};
use crate::server::AppState;
use crate::server::extract::SESSION_HEADER;
use crate::storage::Filter;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::password_hash::rand_core::OsRng;
use argon2::Argon2;
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use uuid::Uuid;
use validator::Validate;

/// Hash a password with argon2 and a fresh salt
fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {}", e)))
}

/// Compare a candidate password against a stored argon2 hash
fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

async fn open_session(
    state: &AppState,
    user: &User,
    message: &str,
) -> Result<AuthResponse, ApiError> {
    let session = state.sessions.create(user.id).await?;
    Ok(AuthResponse {
        session_id: session.id,
        username: user.username.clone(),
        message: message.to_string(),
    })
}

/// `POST /user/signup`
///
/// Creates an account and logs it in. Username and email must both be
/// unused.
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    body.validate()?;
    validate_username(&body.username)?;

    let username_taken = !state
        .users
        .find(&Filter::new().eq("username", body.username.clone()))
        .await?
        .is_empty();
    let email_taken = !state
        .users
        .find(&Filter::new().eq("email", body.email.clone()))
        .await?
        .is_empty();
    if username_taken || email_taken {
        return Err(EntityError::Conflict {
            record_type: "user".to_string(),
            message: "The username or email already exists".to_string(),
        }
        .into());
    }

    let user = User::new(body.username, body.email, hash_password(&body.password)?);
    let user = state.users.insert(user).await?;
    tracing::info!(user_id = %user.id, "account created");

    let response = open_session(&state, &user, "Account created.").await?;
    Ok(Json(response))
}

/// `POST /user/login`
///
/// Unknown usernames and wrong passwords produce the same response.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    body.validate()?;

    let user = state
        .users
        .find(&Filter::new().eq("username", body.username.clone()))
        .await?
        .into_iter()
        .next();

    // same outcome for unknown username and wrong password
    let Some(user) = user.filter(|u| verify_password(&body.password, &u.password_hash)) else {
        return Err(EntityError::not_found("account").into());
    };

    let response = open_session(&state, &user, "Successfully logged in.").await?;
    Ok(Json(response))
}

/// `POST /user/logout`
///
/// Revokes the presented session. The token must still be valid.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let token = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(SessionError::Invalid)?;
    let Ok(session_id) = Uuid::parse_str(token) else {
        return Err(SessionError::Invalid.into());
    };

    if !state.sessions.revoke(&session_id).await? {
        return Err(SessionError::Invalid.into());
    }
    Ok(Json(serde_json::json!({ "message": "Logged out." })))
}
