//! The credential service.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- signed access tokens.
//!
//! [`authenticate`] and [`resolve_token`] tie both to the user store.

pub mod jwt;
pub mod password;

use course_platform_core::{CoursePlatformStore, NewUser, User};
use tracing::info;

use crate::config::AdminBootstrap;
use crate::error::ApiError;
use jwt::JwtConfig;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Not authenticated")]
    MissingToken,
    #[error("Incorrect email or password")]
    InvalidCredentials,
    #[error("Could not validate credentials")]
    InvalidToken,
    #[error("Token has expired")]
    TokenExpired,
    #[error("User no longer exists")]
    PrincipalNotFound,
    #[error("Inactive user")]
    InactiveUser,
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

/// Checks an email/password pair and returns the matching active user.
pub async fn authenticate(
    store: &dyn CoursePlatformStore,
    email: &str,
    password: &str,
) -> Result<User, ApiError> {
    let user = store
        .find_user_by_email(email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !password::verify_password(password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }
    if !user.is_active {
        return Err(AuthError::InactiveUser.into());
    }
    Ok(user)
}

/// Maps a bearer token back to the user it was issued for.
pub async fn resolve_token(
    store: &dyn CoursePlatformStore,
    config: &JwtConfig,
    token: &str,
) -> Result<User, ApiError> {
    let claims = jwt::decode_token(token, config)?;
    let user = store
        .find_user_by_email(&claims.sub)
        .await?
        .ok_or(AuthError::PrincipalNotFound)?;

    if !user.is_active {
        return Err(AuthError::InactiveUser.into());
    }
    Ok(user)
}

/// Creates the configured administrator unless the email is already registered.
pub async fn bootstrap_admin(
    store: &dyn CoursePlatformStore,
    admin: &AdminBootstrap,
) -> Result<(), ApiError> {
    if store.find_user_by_email(&admin.email).await?.is_some() {
        return Ok(());
    }

    let user = store
        .create_user(NewUser {
            full_name: admin.full_name.clone(),
            email: admin.email.clone(),
            password_hash: password::hash_password(&admin.password)?,
            is_active: true,
            is_admin: true,
        })
        .await?;
    info!(user_id = user.id, "Bootstrap administrator created");
    Ok(())
}
