//! Invitation repository.

use std::sync::Arc;

use galerie_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::entities::{Invitation, invitation};

/// Repository for invitation operations.
#[derive(Clone)]
pub struct InvitationRepository {
    db: Arc<DatabaseConnection>,
}

impl InvitationRepository {
    /// Create a new invitation repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Delete every invitation of a galerie.
    pub async fn delete_by_galerie(&self, galerie_id: &str) -> AppResult<u64> {
        let result = Invitation::delete_many()
            .filter(invitation::Column::GalerieId.eq(galerie_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Delete every invitation a user created.
    pub async fn delete_by_user(&self, user_id: &str) -> AppResult<u64> {
        let result = Invitation::delete_many()
            .filter(invitation::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_delete_by_galerie() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 3,
                }])
                .into_connection(),
        );

        let repo = InvitationRepository::new(db);
        assert_eq!(repo.delete_by_galerie("g1").await.unwrap(), 3);
    }
}
