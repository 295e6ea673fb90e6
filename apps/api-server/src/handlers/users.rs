//! User handlers - public profiles, admin-driven account management, and
//! profile pictures.

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, http::header, web};
use chrono::Utc;

use quill_core::domain::User;
use quill_core::policy;
use quill_core::ports::{BaseRepository, PasswordService, PostRepository, UserRepository};
use quill_core::validation;
use quill_shared::ApiResponse;
use quill_shared::dto::{AvatarResponse, CreateUserRequest, UpdateUserRequest, UserPostsResponse};

use crate::handlers::{
    POSTS_PER_PAGE, PageQuery, ensure_unique, post_response, resolve_principal, user_response,
};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn find_user_by_nickname(state: &AppState, nickname: &str) -> AppResult<User> {
    state
        .users
        .find_by_nickname(nickname)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))
}

/// GET /api/users/{nickname}?page=N - public; a user and their posts,
/// newest first.
pub async fn get_user_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let user = find_user_by_nickname(&state, &path.into_inner()).await?;

    let page = query.index();
    let posts = state
        .posts
        .find_by_author(user.id, page, POSTS_PER_PAGE)
        .await?;

    Ok(HttpResponse::Ok().json(UserPostsResponse {
        user: user_response(&user),
        posts: posts.iter().map(post_response).collect(),
        page: page + 1,
    }))
}

/// POST /api/users - admin only; creates a regular account.
pub async fn create_user(
    state: web::Data<AppState>,
    identity: Identity,
    passwords: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<CreateUserRequest>,
) -> AppResult<HttpResponse> {
    let principal = resolve_principal(&state, &identity).await?;
    if !policy::can_manage_users(&principal) {
        return Err(AppError::Forbidden);
    }

    let req = body.into_inner();

    validation::validate_name(&req.name)?;
    validation::validate_nickname(&req.nickname)?;
    validation::validate_email(&req.email)?;
    validation::validate_password(&req.password)?;

    ensure_unique(state.users.as_ref(), &req.name, &req.nickname, &req.email).await?;

    let password_hash = passwords.hash(&req.password)?;
    let user = User::new(req.name, req.nickname, req.email, password_hash);
    let saved = state.users.insert(user).await?;

    tracing::info!(nickname = %saved.nickname, "User created by admin");

    Ok(HttpResponse::Created().json(user_response(&saved)))
}

/// PUT /api/users/{nickname} - admin only.
///
/// Uniqueness is checked only for values that actually change, so an
/// unchanged name/nickname/email never trips over itself.
pub async fn update_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<UpdateUserRequest>,
) -> AppResult<HttpResponse> {
    let principal = resolve_principal(&state, &identity).await?;
    if !policy::can_manage_users(&principal) {
        return Err(AppError::Forbidden);
    }

    let mut target = find_user_by_nickname(&state, &path.into_inner()).await?;
    let req = body.into_inner();

    validation::validate_name(&req.name)?;
    validation::validate_nickname(&req.nickname)?;
    validation::validate_email(&req.email)?;

    if req.name != target.name && state.users.find_by_name(&req.name).await?.is_some() {
        return Err(AppError::Conflict("that name is taken".to_string()));
    }
    if req.nickname != target.nickname
        && state.users.find_by_nickname(&req.nickname).await?.is_some()
    {
        return Err(AppError::Conflict(
            "that nickname is taken, please choose a different one".to_string(),
        ));
    }
    if req.email != target.email && state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict(
            "that email is taken, please choose a different one".to_string(),
        ));
    }

    target.name = req.name;
    target.nickname = req.nickname;
    target.email = req.email;
    target.updated_at = Utc::now();
    let saved = state.users.update(target).await?;

    tracing::info!(nickname = %saved.nickname, "User updated by admin");

    Ok(HttpResponse::Ok().json(user_response(&saved)))
}

/// DELETE /api/users/{nickname} - admin only, never an admin target.
///
/// Cascades to the user's posts and removes a non-default avatar file
/// before the record goes away.
pub async fn delete_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let principal = resolve_principal(&state, &identity).await?;
    let target = find_user_by_nickname(&state, &path.into_inner()).await?;

    if !policy::can_delete_user(&principal, &target) {
        return Err(AppError::Forbidden);
    }

    let removed_posts = state.posts.delete_by_author(target.id).await?;
    if !target.has_default_avatar() {
        state.avatars.delete(&target.avatar_filename).await?;
    }
    state.users.delete(target.id).await?;

    tracing::info!(
        nickname = %target.nickname,
        posts_removed = removed_posts,
        "User deleted"
    );

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message((), "User was deleted!")))
}

/// PUT /api/users/{nickname}/avatar - owner or admin.
///
/// Raw image body; png and jpeg only, mirroring the original upload
/// filter. Replacing a non-default picture deletes the old file.
pub async fn upload_avatar(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    req: HttpRequest,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let principal = resolve_principal(&state, &identity).await?;
    let mut target = find_user_by_nickname(&state, &path.into_inner()).await?;

    if !policy::can_update_avatar(&principal, &target) {
        return Err(AppError::Forbidden);
    }

    let extension = match req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    {
        Some("image/png") => "png",
        Some("image/jpeg") => "jpg",
        _ => {
            return Err(AppError::Validation(
                "profile pictures must be png or jpeg".to_string(),
            ));
        }
    };

    if body.is_empty() {
        return Err(AppError::Validation("empty upload".to_string()));
    }

    if !target.has_default_avatar() {
        state.avatars.delete(&target.avatar_filename).await?;
    }

    let filename = state.avatars.save(&body, &target.name, extension).await?;

    target.avatar_filename = filename.clone();
    target.updated_at = Utc::now();
    state.users.update(target).await?;

    Ok(HttpResponse::Ok().json(AvatarResponse { filename }))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test, web};

    use quill_shared::dto::{UserPostsResponse, UserResponse};

    use crate::handlers::testutil::{
        bearer, password_service, reset_service, seed_user, session_service, test_state,
    };

    use super::*;

    macro_rules! test_app {
        ($state:expr, $sessions:expr, $passwords:expr, $reset:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .app_data(web::Data::new($sessions.clone()))
                    .app_data(web::Data::new($passwords.clone()))
                    .app_data(web::Data::new($reset.clone()))
                    .configure(crate::handlers::configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_create_user_is_admin_only() {
        let (state, _dir) = test_state();
        let (sessions, passwords, reset) = (session_service(), password_service(), reset_service());
        let alice = seed_user(&state, passwords.as_ref(), "alice", "alice-pass", false).await;
        let admin = seed_user(&state, passwords.as_ref(), "admin", "admin-pass", true).await;
        let app = test_app!(state, sessions, passwords, reset);

        let payload = CreateUserRequest {
            name: "carol".to_string(),
            nickname: "carol-nick".to_string(),
            email: "carol@example.com".to_string(),
            password: "carol-pass".to_string(),
        };

        let req = test::TestRequest::post()
            .uri("/api/users")
            .insert_header(bearer(&sessions, &alice))
            .set_json(payload.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/api/users")
            .insert_header(bearer(&sessions, &admin))
            .set_json(payload)
            .to_request();
        let created: UserResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created.nickname, "carol-nick");
        assert!(!created.is_admin);
    }

    #[actix_web::test]
    async fn test_update_user_keeps_unchanged_unique_fields() {
        let (state, _dir) = test_state();
        let (sessions, passwords, reset) = (session_service(), password_service(), reset_service());
        let alice = seed_user(&state, passwords.as_ref(), "alice", "alice-pass", false).await;
        seed_user(&state, passwords.as_ref(), "bob", "bob-pass", false).await;
        let admin = seed_user(&state, passwords.as_ref(), "admin", "admin-pass", true).await;
        let app = test_app!(state, sessions, passwords, reset);

        // Same nickname and email as before - only the name changes.
        let req = test::TestRequest::put()
            .uri(&format!("/api/users/{}", alice.nickname))
            .insert_header(bearer(&sessions, &admin))
            .set_json(UpdateUserRequest {
                name: "alice-renamed".to_string(),
                nickname: alice.nickname.clone(),
                email: alice.email.clone(),
            })
            .to_request();
        let updated: UserResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.name, "alice-renamed");

        // Taking bob's nickname must conflict.
        let req = test::TestRequest::put()
            .uri(&format!("/api/users/{}", alice.nickname))
            .insert_header(bearer(&sessions, &admin))
            .set_json(UpdateUserRequest {
                name: "alice-renamed".to_string(),
                nickname: "bob-nick".to_string(),
                email: alice.email.clone(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_delete_user_cascades_posts() {
        let (state, _dir) = test_state();
        let (sessions, passwords, reset) = (session_service(), password_service(), reset_service());
        let alice = seed_user(&state, passwords.as_ref(), "alice", "alice-pass", false).await;
        let admin = seed_user(&state, passwords.as_ref(), "admin", "admin-pass", true).await;

        let p1 = state
            .posts
            .insert(quill_core::domain::Post::new(alice.id, "p1".to_string()))
            .await
            .unwrap();
        let p2 = state
            .posts
            .insert(quill_core::domain::Post::new(alice.id, "p2".to_string()))
            .await
            .unwrap();

        let app = test_app!(state, sessions, passwords, reset);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/users/{}", alice.nickname))
            .insert_header(bearer(&sessions, &admin))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        assert!(state.users.find_by_id(alice.id).await.unwrap().is_none());
        assert!(state.posts.find_by_id(p1.id).await.unwrap().is_none());
        assert!(state.posts.find_by_id(p2.id).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_admin_account_is_never_deletable() {
        let (state, _dir) = test_state();
        let (sessions, passwords, reset) = (session_service(), password_service(), reset_service());
        let alice = seed_user(&state, passwords.as_ref(), "alice", "alice-pass", false).await;
        let admin = seed_user(&state, passwords.as_ref(), "admin", "admin-pass", true).await;
        let app = test_app!(state, sessions, passwords, reset);

        // Not even the admin may delete the admin account.
        let req = test::TestRequest::delete()
            .uri(&format!("/api/users/{}", admin.nickname))
            .insert_header(bearer(&sessions, &admin))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // Non-admins may delete nobody.
        let req = test::TestRequest::delete()
            .uri(&format!("/api/users/{}", admin.nickname))
            .insert_header(bearer(&sessions, &alice))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_profile_lists_posts_newest_first() {
        let (state, _dir) = test_state();
        let (sessions, passwords, reset) = (session_service(), password_service(), reset_service());
        let alice = seed_user(&state, passwords.as_ref(), "alice", "alice-pass", false).await;

        let mut early = quill_core::domain::Post::new(alice.id, "early".to_string());
        early.created_at = chrono::Utc::now() - chrono::Duration::minutes(5);
        state.posts.insert(early).await.unwrap();
        state
            .posts
            .insert(quill_core::domain::Post::new(alice.id, "late".to_string()))
            .await
            .unwrap();

        let app = test_app!(state, sessions, passwords, reset);

        let req = test::TestRequest::get()
            .uri("/api/users/alice-nick")
            .to_request();
        let body: UserPostsResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.user.nickname, "alice-nick");
        assert_eq!(body.posts.len(), 2);
        assert_eq!(body.posts[0].content, "late");
        assert_eq!(body.posts[1].content, "early");
    }

    #[actix_web::test]
    async fn test_avatar_owner_or_admin_only() {
        let (state, dir) = test_state();
        let (sessions, passwords, reset) = (session_service(), password_service(), reset_service());
        let alice = seed_user(&state, passwords.as_ref(), "alice", "alice-pass", false).await;
        let bob = seed_user(&state, passwords.as_ref(), "bob", "bob-pass", false).await;
        let app = test_app!(state, sessions, passwords, reset);

        let uri = format!("/api/users/{}/avatar", alice.nickname);

        // bob may not touch alice's picture
        let req = test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&sessions, &bob))
            .insert_header(("Content-Type", "image/png"))
            .set_payload("png-bytes")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // wrong content type is rejected
        let req = test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&sessions, &alice))
            .insert_header(("Content-Type", "image/gif"))
            .set_payload("gif-bytes")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        // the owner may upload
        let req = test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&sessions, &alice))
            .insert_header(("Content-Type", "image/png"))
            .set_payload("png-bytes")
            .to_request();
        let body: AvatarResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.filename, "alice.png");
        assert!(dir.path().join("alice.png").exists());

        let stored = state.users.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(stored.avatar_filename, "alice.png");
    }
}
