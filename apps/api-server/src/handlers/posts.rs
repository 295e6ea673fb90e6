//! Post handlers - the public feed and authorial CRUD.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use quill_core::domain::Post;
use quill_core::policy;
use quill_core::ports::{BaseRepository, PostRepository};
use quill_core::validation;
use quill_shared::ApiResponse;
use quill_shared::dto::{CreatePostRequest, PostListResponse, UpdatePostRequest};

use crate::handlers::{POSTS_PER_PAGE, PageQuery, post_response, require_user, resolve_principal};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn find_post(state: &AppState, id: Uuid) -> AppResult<Post> {
    state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))
}

/// GET /api/posts?page=N - public feed, newest first.
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = query.index();
    let posts = state.posts.find_recent(page, POSTS_PER_PAGE).await?;

    Ok(HttpResponse::Ok().json(PostListResponse {
        posts: posts.iter().map(post_response).collect(),
        page: page + 1,
    }))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    validation::validate_post_content(&req.content)?;

    let author = require_user(&state, &identity).await?;
    let post = Post::new(author.id, req.content);
    let saved = state.posts.insert(post).await?;

    tracing::info!(post_id = %saved.id, author = %author.nickname, "Post created");

    Ok(HttpResponse::Created().json(post_response(&saved)))
}

/// GET /api/posts/{id} - public.
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(post_response(&post)))
}

/// PUT /api/posts/{id} - author or admin; content only.
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    validation::validate_post_content(&req.content)?;

    let principal = resolve_principal(&state, &identity).await?;
    let mut post = find_post(&state, path.into_inner()).await?;

    if !policy::can_modify_post(&principal, &post) {
        return Err(AppError::Forbidden);
    }

    post.content = req.content;
    post.updated_at = Utc::now();
    let saved = state.posts.update(post).await?;

    Ok(HttpResponse::Ok().json(post_response(&saved)))
}

/// DELETE /api/posts/{id} - author or admin.
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let principal = resolve_principal(&state, &identity).await?;
    let post = find_post(&state, path.into_inner()).await?;

    if !policy::can_delete_post(&principal, &post) {
        return Err(AppError::Forbidden);
    }

    state.posts.delete(post.id).await?;

    tracing::info!(post_id = %post.id, "Post deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message((), "Your post has been deleted!")))
}
