//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub nickname: String,
    pub email: String,
    pub password: String,
}

/// Request to login. Login is by name, not email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

/// Response containing a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Request a password-reset email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestPasswordResetRequest {
    pub email: String,
}

/// Consume a reset token and set a new password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmPasswordResetRequest {
    pub token: String,
    pub password: String,
    pub confirm_password: String,
}

/// Request to create a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
}

/// Request to edit a post. Only the content is mutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub content: String,
}

/// A post, as shown to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub author_id: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

/// One page of posts, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub page: u64,
}

/// Admin request to create a user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub nickname: String,
    pub email: String,
    pub password: String,
}

/// Admin request to update a user account.
///
/// Unchanged values are accepted without tripping their own uniqueness
/// checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub nickname: String,
    pub email: String,
}

/// A user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub nickname: String,
    pub email: String,
    pub avatar_filename: String,
    pub is_admin: bool,
    pub created_at: String,
}

/// A user together with one page of their posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPostsResponse {
    pub user: UserResponse,
    pub posts: Vec<PostResponse>,
    pub page: u64,
}

/// Response after storing a profile picture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarResponse {
    pub filename: String,
}
