//! Minimal user directory.
//!
//! Authentication lives outside this system; these are the identities that
//! ownership checks, moderation, and the vendor registry need.

use soko_core::prelude::*;
use soko_core::SokoError;
use soko_store::Collection;

/// Service over users.
#[derive(Clone)]
pub struct UserService {
    users: Collection<User>,
}

impl UserService {
    pub fn new(users: Collection<User>) -> Self {
        Self { users }
    }

    /// Create a user; email is unique (case-insensitive).
    pub async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        phone: &str,
    ) -> Result<User, SokoError> {
        let email_lower = email.to_lowercase();
        if self
            .users
            .find_one(|u| u.email == email_lower)
            .await
            .is_some()
        {
            return Err(SokoError::Conflict(format!("email {email} already in use")));
        }

        let user = User::new(first_name, last_name, email, phone);
        self.users
            .insert(user.clone())
            .await
            .map_err(|e| SokoError::Store(e.to_string()))?;
        Ok(user)
    }

    pub async fn get(&self, id: &UserId) -> Result<User, SokoError> {
        self.users
            .get(id.as_str())
            .await
            .ok_or_else(|| SokoError::UserNotFound(id.to_string()))
    }

    /// Whether this user may take admin actions.
    pub async fn require_admin(&self, id: &UserId) -> Result<User, SokoError> {
        let user = self.get(id).await?;
        if !user.is_admin() {
            return Err(SokoError::Forbidden("admin role required".into()));
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let svc = UserService::new(Collection::new());
        svc.create("Ada", "Obi", "ada@example.com", "+2348000000001")
            .await
            .unwrap();
        assert!(matches!(
            svc.create("Other", "Person", "ADA@example.com", "+2348000000002")
                .await,
            Err(SokoError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_require_admin() {
        let svc = UserService::new(Collection::new());
        let user = svc
            .create("Ada", "Obi", "ada@example.com", "+2348000000001")
            .await
            .unwrap();
        assert!(matches!(
            svc.require_admin(&user.id).await,
            Err(SokoError::Forbidden(_))
        ));

        svc.users
            .update(user.id.as_str(), |u| u.role = Role::Admin)
            .await
            .unwrap();
        assert!(svc.require_admin(&user.id).await.is_ok());
    }
}
