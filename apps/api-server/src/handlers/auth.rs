//! Authentication handlers - registration, login, and the password-reset
//! flow.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use chrono::Utc;

use quill_core::domain::User;
use quill_core::ports::{
    BaseRepository, PasswordService, ResetTokenService, SessionTokenService, UserRepository,
};
use quill_core::validation;
use quill_shared::ApiResponse;
use quill_shared::dto::{
    AuthResponse, ConfirmPasswordResetRequest, LoginRequest, RegisterRequest,
    RequestPasswordResetRequest,
};

use crate::handlers::ensure_unique;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn auth_response(sessions: &dyn SessionTokenService, user: &User) -> AppResult<AuthResponse> {
    let token = sessions.issue(user.id)?;
    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: sessions.expiration_seconds() as u64,
    })
}

/// POST /api/auth/register
///
/// Self-registration. Always creates a regular account.
pub async fn register(
    state: web::Data<AppState>,
    sessions: web::Data<Arc<dyn SessionTokenService>>,
    passwords: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    validation::validate_name(&req.name)?;
    validation::validate_nickname(&req.nickname)?;
    validation::validate_email(&req.email)?;
    validation::validate_password(&req.password)?;

    ensure_unique(state.users.as_ref(), &req.name, &req.nickname, &req.email).await?;

    let password_hash = passwords.hash(&req.password)?;
    let user = User::new(req.name, req.nickname, req.email, password_hash);
    let saved = state.users.insert(user).await?;

    tracing::info!(nickname = %saved.nickname, "User registered");

    Ok(HttpResponse::Created().json(auth_response(sessions.get_ref().as_ref(), &saved)?))
}

/// POST /api/auth/login
///
/// Login is by name. The response never reveals which of name and
/// password was wrong.
pub async fn login(
    state: web::Data<AppState>,
    sessions: web::Data<Arc<dyn SessionTokenService>>,
    passwords: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_name(&req.name)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = passwords.verify(&req.password, &user.password_hash)?;
    if !valid {
        return Err(AppError::Unauthorized);
    }

    Ok(HttpResponse::Ok().json(auth_response(sessions.get_ref().as_ref(), &user)?))
}

/// POST /api/auth/logout
///
/// Sessions are stateless bearer tokens; there is nothing to invalidate
/// server-side. The client discards the token.
pub async fn logout(_identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::ok(())))
}

/// POST /api/auth/password-reset/request
///
/// Issues a reset token and hands it to the mailer. Works for logged-in
/// and anonymous callers alike - the flow depends only on the token.
pub async fn request_password_reset(
    state: web::Data<AppState>,
    reset_tokens: web::Data<Arc<dyn ResetTokenService>>,
    body: web::Json<RequestPasswordResetRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    validation::validate_email(&req.email)?;

    let user = state.users.find_by_email(&req.email).await?.ok_or_else(|| {
        AppError::Validation("there is no account with that email".to_string())
    })?;

    let token = reset_tokens.issue(user.id)?;
    state.mailer.send_reset_email(&user, &token).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        (),
        "An email has been sent with instructions to reset your password.",
    )))
}

/// POST /api/auth/password-reset/confirm
///
/// Consumes a reset token and sets a new password.
pub async fn confirm_password_reset(
    state: web::Data<AppState>,
    reset_tokens: web::Data<Arc<dyn ResetTokenService>>,
    passwords: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<ConfirmPasswordResetRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    validation::validate_password(&req.password)?;
    validation::validate_password_confirmation(&req.password, &req.confirm_password)?;

    let user_id = reset_tokens
        .verify(&req.token)
        .ok_or(AppError::InvalidToken)?;

    // A token for a since-deleted account is the same outcome as a bad token.
    let mut user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::InvalidToken)?;

    user.password_hash = passwords.hash(&req.password)?;
    user.updated_at = Utc::now();
    state.users.update(user).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        (),
        "Your password has been updated! You are now able to log in.",
    )))
}
