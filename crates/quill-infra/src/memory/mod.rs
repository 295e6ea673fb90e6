//! In-memory repositories - used as the fallback when no database is
//! configured, and as test doubles for handler tests.
//!
//! Note: Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository, UserRepository};

/// In-memory user store using a HashMap behind an async RwLock.
///
/// The write lock is held across the uniqueness check and the mutation,
/// so check-plus-write is atomic per record - the same guarantee the
/// database gives through its unique constraints.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn unique_conflict<'a>(
        mut existing: impl Iterator<Item = &'a User>,
        candidate: &User,
    ) -> Option<&'static str> {
        existing.find_map(|other| {
            if other.id == candidate.id {
                None
            } else if other.name == candidate.name {
                Some("name")
            } else if other.nickname == candidate.nickname {
                Some("nickname")
            } else if other.email == candidate.email {
                Some("email")
            } else {
                None
            }
        })
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, entity: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;

        if let Some(field) = Self::unique_conflict(store.values(), &entity) {
            return Err(RepoError::Constraint(format!("duplicate {field}")));
        }

        store.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;

        if !store.contains_key(&entity.id) {
            return Err(RepoError::NotFound);
        }
        if let Some(field) = Self::unique_conflict(store.values(), &entity) {
            return Err(RepoError::Constraint(format!("duplicate {field}")));
        }

        store.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|u| u.name == name).cloned())
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|u| u.nickname == nickname).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|u| u.email == email).cloned())
    }
}

/// In-memory post store.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn page_newest_first(mut posts: Vec<Post>, page: u64, per_page: u64) -> Vec<Post> {
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
            .into_iter()
            .skip((page * per_page) as usize)
            .take(per_page as usize)
            .collect()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, entity: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        store.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;

        if !store.contains_key(&entity.id) {
            return Err(RepoError::NotFound);
        }

        store.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_recent(&self, page: u64, per_page: u64) -> Result<Vec<Post>, RepoError> {
        let posts: Vec<Post> = self.store.read().await.values().cloned().collect();
        Ok(Self::page_newest_first(posts, page, per_page))
    }

    async fn find_by_author(
        &self,
        author_id: Uuid,
        page: u64,
        per_page: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let posts: Vec<Post> = self
            .store
            .read()
            .await
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        Ok(Self::page_newest_first(posts, page, per_page))
    }

    async fn delete_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        let mut store = self.store.write().await;
        let before = store.len();
        store.retain(|_, p| p.author_id != author_id);
        Ok((before - store.len()) as u64)
    }
}
