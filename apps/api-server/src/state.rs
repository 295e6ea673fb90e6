//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::domain::User;
use quill_core::ports::{
    AvatarStore, BaseRepository, Mailer, PasswordService, PostRepository, UserRepository,
};
use quill_infra::database;
use quill_infra::{
    FsAvatarStore, InMemoryPostRepository, InMemoryUserRepository, LogMailer,
    PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub mailer: Arc<dyn Mailer>,
    pub avatars: Arc<dyn AvatarStore>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (users, posts): (Arc<dyn UserRepository>, Arc<dyn PostRepository>) =
            match &config.database {
                Some(db_config) => match database::connect(db_config).await {
                    Ok(db) => (
                        Arc::new(PostgresUserRepository::new(db.clone())),
                        Arc::new(PostgresPostRepository::new(db)),
                    ),
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                        (
                            Arc::new(InMemoryUserRepository::new()),
                            Arc::new(InMemoryPostRepository::new()),
                        )
                    }
                },
                None => {
                    tracing::warn!(
                        "DATABASE_URL not set. Running without database (in-memory mode)."
                    );
                    (
                        Arc::new(InMemoryUserRepository::new()),
                        Arc::new(InMemoryPostRepository::new()),
                    )
                }
            };

        let mailer: Arc<dyn Mailer> = Arc::new(LogMailer::new(config.public_base_url.clone()));
        let avatars: Arc<dyn AvatarStore> = Arc::new(FsAvatarStore::new(config.avatar_dir.clone()));

        tracing::info!("Application state initialized");

        Self {
            users,
            posts,
            mailer,
            avatars,
        }
    }

    /// Provision the admin account from configuration if it is missing.
    ///
    /// Self-registration can never mint an admin, so without this (or a
    /// pre-seeded database) no admin exists.
    pub async fn bootstrap_admin(&self, config: &AppConfig, passwords: &dyn PasswordService) {
        let Some(admin) = &config.admin else {
            tracing::warn!("ADMIN_NAME not set; no admin account will be provisioned");
            return;
        };

        match self.users.find_by_name(&admin.name).await {
            Ok(Some(_)) => tracing::debug!("Admin account already present"),
            Ok(None) => {
                let hash = match passwords.hash(&admin.password) {
                    Ok(hash) => hash,
                    Err(e) => {
                        tracing::error!("Failed to hash admin password: {e}");
                        return;
                    }
                };

                let mut user = User::new(
                    admin.name.clone(),
                    admin.nickname.clone(),
                    admin.email.clone(),
                    hash,
                );
                user.is_admin = true;

                match self.users.insert(user).await {
                    Ok(_) => tracing::info!(name = %admin.name, "Admin account provisioned"),
                    Err(e) => tracing::error!("Failed to provision admin account: {e}"),
                }
            }
            Err(e) => tracing::error!("Failed to look up admin account: {e}"),
        }
    }
}
