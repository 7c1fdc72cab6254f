// src/services/permission_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PermissionRepository, UserRepository},
    models::permission::{TabGrant, TabPermission},
};

#[derive(Clone)]
pub struct PermissionService {
    repo: PermissionRepository,
    user_repo: UserRepository,
}

impl PermissionService {
    pub fn new(repo: PermissionRepository, user_repo: UserRepository) -> Self {
        Self { repo, user_repo }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<TabPermission>, AppError> {
        self.ensure_user(user_id).await?;
        self.repo.list_for_user(user_id).await
    }

    pub async fn replace(
        &self,
        user_id: Uuid,
        grants: Vec<TabGrant>,
    ) -> Result<Vec<TabPermission>, AppError> {
        self.ensure_user(user_id).await?;
        self.repo.replace_for_user(user_id, &grants).await
    }

    async fn ensure_user(&self, user_id: Uuid) -> Result<(), AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;
        Ok(())
    }
}
