// src/db/permission_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::permission::{TabGrant, TabPermission},
};

#[derive(Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<TabPermission>, AppError> {
        let permissions = sqlx::query_as::<_, TabPermission>(
            "SELECT * FROM tab_permissions WHERE user_id = $1 ORDER BY tab ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(permissions)
    }

    // Substitui o conjunto de abas do usuário em uma transação.
    pub async fn replace_for_user(
        &self,
        user_id: Uuid,
        grants: &[TabGrant],
    ) -> Result<Vec<TabPermission>, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM tab_permissions WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        for grant in grants {
            sqlx::query(
                r#"
                INSERT INTO tab_permissions (user_id, tab, allowed)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id, tab)
                DO UPDATE SET allowed = EXCLUDED.allowed, updated_at = NOW()
                "#,
            )
            .bind(user_id)
            .bind(&grant.tab)
            .bind(grant.allowed)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.list_for_user(user_id).await
    }
}
