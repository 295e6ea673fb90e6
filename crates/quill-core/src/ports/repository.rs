use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
///
/// Uniqueness enforcement happens inside the store at write time; a
/// duplicate insert or update fails with `RepoError::Constraint`.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Persist changes to an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with a lookup per unique column.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their login name.
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, RepoError>;

    /// Find a user by the nickname used in public URLs.
    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, RepoError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Newest posts first, one trivial page slice at a time.
    async fn find_recent(&self, page: u64, per_page: u64) -> Result<Vec<Post>, RepoError>;

    /// A single author's posts, newest first.
    async fn find_by_author(
        &self,
        author_id: Uuid,
        page: u64,
        per_page: u64,
    ) -> Result<Vec<Post>, RepoError>;

    /// Remove every post authored by the given user, returning the count.
    async fn delete_by_author(&self, author_id: Uuid) -> Result<u64, RepoError>;
}
