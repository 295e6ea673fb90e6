//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;
mod users;

use actix_web::web;
use serde::Deserialize;

use quill_core::domain::{Post, User};
use quill_core::policy::Principal;
use quill_core::ports::{BaseRepository, UserRepository};
use quill_shared::dto::{PostResponse, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Posts per page, everywhere a post list is served.
pub const POSTS_PER_PAGE: u64 = 5;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/logout", web::post().to(auth::logout))
                    .route(
                        "/password-reset/request",
                        web::post().to(auth::request_password_reset),
                    )
                    .route(
                        "/password-reset/confirm",
                        web::post().to(auth::confirm_password_reset),
                    ),
            )
            // Post routes
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::put().to(posts::update_post))
                    .route("/{id}", web::delete().to(posts::delete_post)),
            )
            // User routes
            .service(
                web::scope("/users")
                    .route("", web::post().to(users::create_user))
                    .route("/{nickname}", web::get().to(users::get_user_posts))
                    .route("/{nickname}", web::put().to(users::update_user))
                    .route("/{nickname}", web::delete().to(users::delete_user))
                    .route("/{nickname}/avatar", web::put().to(users::upload_avatar)),
            ),
    );
}

/// `?page=` query parameter, 1-based like the original UI.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

impl PageQuery {
    /// Zero-based page index for the repositories.
    pub fn index(&self) -> u64 {
        self.page.unwrap_or(1).max(1) - 1
    }
}

/// Re-fetch the session's user. A token that outlived its account is an
/// authentication failure, not a server error.
pub async fn require_user(state: &AppState, identity: &Identity) -> AppResult<User> {
    state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// The acting principal behind a valid session.
pub async fn resolve_principal(state: &AppState, identity: &Identity) -> AppResult<Principal> {
    Ok(Principal::Authenticated(
        require_user(state, identity).await?,
    ))
}

/// Field-level duplicate checks before a write. The store's unique
/// constraints remain the backstop against racing registrations.
pub async fn ensure_unique(
    users: &dyn UserRepository,
    name: &str,
    nickname: &str,
    email: &str,
) -> AppResult<()> {
    if users.find_by_name(name).await?.is_some() {
        return Err(AppError::Conflict("that name is taken".to_string()));
    }
    if users.find_by_nickname(nickname).await?.is_some() {
        return Err(AppError::Conflict(
            "that nickname is taken, please choose a different one".to_string(),
        ));
    }
    if users.find_by_email(email).await?.is_some() {
        return Err(AppError::Conflict(
            "that email is taken, please choose a different one".to_string(),
        ));
    }
    Ok(())
}

pub fn post_response(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        author_id: post.author_id.to_string(),
        content: post.content.clone(),
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
    }
}

pub fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        name: user.name.clone(),
        nickname: user.nickname.clone(),
        email: user.email.clone(),
        avatar_filename: user.avatar_filename.clone(),
        is_admin: user.is_admin,
        created_at: user.created_at.to_rfc3339(),
    }
}
