//! Authorization policy - pure decision functions over the acting principal.
//!
//! Every handler consults these before mutating anything; a `false` answer
//! surfaces as a uniform Forbidden response. The functions never touch the
//! store themselves.

use crate::domain::{Post, User};

/// The identity on whose behalf a request is evaluated.
///
/// Anonymous principals can read public content but fail every check that
/// requires ownership or admin rights.
#[derive(Debug, Clone)]
pub enum Principal {
    Anonymous,
    Authenticated(User),
}

impl Principal {
    pub fn user(&self) -> Option<&User> {
        match self {
            Principal::Anonymous => None,
            Principal::Authenticated(user) => Some(user),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|u| u.is_admin)
    }
}

/// A post may be edited by its author or by the admin.
pub fn can_modify_post(principal: &Principal, post: &Post) -> bool {
    match principal.user() {
        Some(user) => user.is_admin || user.id == post.author_id,
        None => false,
    }
}

/// Deletion follows the same rule as modification.
pub fn can_delete_post(principal: &Principal, post: &Post) -> bool {
    can_modify_post(principal, post)
}

/// Only the admin may create or update user accounts.
pub fn can_manage_users(principal: &Principal) -> bool {
    principal.is_admin()
}

/// Only the admin may delete users, and admin accounts are never deletable.
pub fn can_delete_user(principal: &Principal, target: &User) -> bool {
    principal.is_admin() && !target.is_admin
}

/// A profile picture may be replaced by the account owner or the admin.
pub fn can_update_avatar(principal: &Principal, target: &User) -> bool {
    match principal.user() {
        Some(user) => user.is_admin || user.id == target.id,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, is_admin: bool) -> User {
        let mut u = User::new(
            name.to_string(),
            format!("{name}-nick"),
            format!("{name}@example.com"),
            "hash".to_string(),
        );
        u.is_admin = is_admin;
        u
    }

    #[test]
    fn test_author_can_modify_own_post() {
        let alice = user("alice", false);
        let post = Post::new(alice.id, "hello".to_string());

        assert!(can_modify_post(&Principal::Authenticated(alice), &post));
    }

    #[test]
    fn test_other_user_cannot_modify_post() {
        let alice = user("alice", false);
        let bob = user("bob", false);
        let post = Post::new(alice.id, "hello".to_string());

        assert!(!can_modify_post(&Principal::Authenticated(bob), &post));
    }

    #[test]
    fn test_admin_can_modify_any_post() {
        let alice = user("alice", false);
        let admin = user("admin", true);
        let post = Post::new(alice.id, "hello".to_string());

        assert!(can_modify_post(&Principal::Authenticated(admin), &post));
    }

    #[test]
    fn test_anonymous_fails_every_ownership_check() {
        let alice = user("alice", false);
        let post = Post::new(alice.id, "hello".to_string());

        assert!(!can_modify_post(&Principal::Anonymous, &post));
        assert!(!can_delete_post(&Principal::Anonymous, &post));
        assert!(!can_manage_users(&Principal::Anonymous));
        assert!(!can_delete_user(&Principal::Anonymous, &alice));
        assert!(!can_update_avatar(&Principal::Anonymous, &alice));
    }

    #[test]
    fn test_delete_post_follows_modify_rule() {
        let alice = user("alice", false);
        let bob = user("bob", false);
        let admin = user("admin", true);
        let post = Post::new(alice.id, "hello".to_string());

        assert!(can_delete_post(&Principal::Authenticated(alice), &post));
        assert!(!can_delete_post(&Principal::Authenticated(bob), &post));
        assert!(can_delete_post(&Principal::Authenticated(admin), &post));
    }

    #[test]
    fn test_only_admin_manages_users() {
        let alice = user("alice", false);
        let admin = user("admin", true);

        assert!(!can_manage_users(&Principal::Authenticated(alice)));
        assert!(can_manage_users(&Principal::Authenticated(admin)));
    }

    #[test]
    fn test_admin_cannot_delete_admin() {
        let admin = user("admin", true);
        let other = user("alice", false);

        let principal = Principal::Authenticated(admin.clone());
        assert!(!can_delete_user(&principal, &admin));
        assert!(can_delete_user(&principal, &other));
    }

    #[test]
    fn test_non_admin_cannot_delete_anyone() {
        let alice = user("alice", false);
        let bob = user("bob", false);
        let admin = user("admin", true);

        let principal = Principal::Authenticated(alice.clone());
        assert!(!can_delete_user(&principal, &bob));
        assert!(!can_delete_user(&principal, &admin));
        assert!(!can_delete_user(&principal, &alice));
    }

    #[test]
    fn test_avatar_owner_or_admin() {
        let alice = user("alice", false);
        let bob = user("bob", false);
        let admin = user("admin", true);

        assert!(can_update_avatar(
            &Principal::Authenticated(alice.clone()),
            &alice
        ));
        assert!(!can_update_avatar(&Principal::Authenticated(bob), &alice));
        assert!(can_update_avatar(&Principal::Authenticated(admin), &alice));
    }
}
