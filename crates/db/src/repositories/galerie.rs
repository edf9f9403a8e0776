//! Galerie repository.

use std::sync::Arc;

use chrono::Utc;
use galerie_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, QueryTrait, sea_query::Expr,
};

use crate::entities::galerie_user::GalerieRole;
use crate::entities::{Galerie, GalerieUser, galerie, galerie_user};

/// Repository for galeries and their memberships.
#[derive(Clone)]
pub struct GalerieRepository {
    db: Arc<DatabaseConnection>,
}

impl GalerieRepository {
    /// Create a new galerie repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // ==================== Galerie Operations ====================

    /// Find galerie by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<galerie::Model>> {
        Galerie::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get galerie by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<galerie::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("galerie not found".to_string()))
    }

    /// Mark a galerie as archived.
    pub async fn archive(&self, id: &str) -> AppResult<u64> {
        let result = Galerie::update_many()
            .col_expr(galerie::Column::Archived, Expr::value(true))
            .col_expr(
                galerie::Column::UpdatedAt,
                Expr::value(chrono::DateTime::<chrono::FixedOffset>::from(Utc::now())),
            )
            .filter(galerie::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Find galeries created before `older_than` that have no member left.
    pub async fn find_without_members(
        &self,
        older_than: chrono::DateTime<chrono::FixedOffset>,
        limit: u64,
    ) -> AppResult<Vec<galerie::Model>> {
        let with_members = GalerieUser::find()
            .select_only()
            .column(galerie_user::Column::GalerieId)
            .into_query();

        Galerie::find()
            .filter(galerie::Column::CreatedAt.lt(older_than))
            .filter(galerie::Column::Id.not_in_subquery(with_members))
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a galerie row. Returns the number of rows removed.
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        let result = Galerie::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    // ==================== Member Operations ====================

    /// Get the membership of a user in a galerie.
    pub async fn get_member(
        &self,
        galerie_id: &str,
        user_id: &str,
    ) -> AppResult<Option<galerie_user::Model>> {
        GalerieUser::find_by_id((galerie_id.to_string(), user_id.to_string()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List every membership held by a user.
    pub async fn find_memberships_of_user(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<galerie_user::Model>> {
        GalerieUser::find()
            .filter(galerie_user::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List members of a galerie.
    pub async fn list_members(&self, galerie_id: &str) -> AppResult<Vec<galerie_user::Model>> {
        GalerieUser::find()
            .filter(galerie_user::Column::GalerieId.eq(galerie_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count members of a galerie other than `user_id`.
    pub async fn count_members_excluding(&self, galerie_id: &str, user_id: &str) -> AppResult<u64> {
        GalerieUser::find()
            .filter(galerie_user::Column::GalerieId.eq(galerie_id))
            .filter(galerie_user::Column::UserId.ne(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count creator memberships of a galerie.
    pub async fn count_creators(&self, galerie_id: &str) -> AppResult<u64> {
        GalerieUser::find()
            .filter(galerie_user::Column::GalerieId.eq(galerie_id))
            .filter(galerie_user::Column::Role.eq(GalerieRole::Creator))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove one member from a galerie.
    pub async fn remove_member(&self, galerie_id: &str, user_id: &str) -> AppResult<u64> {
        let result = GalerieUser::delete_many()
            .filter(galerie_user::Column::GalerieId.eq(galerie_id))
            .filter(galerie_user::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Remove every member of a galerie.
    pub async fn remove_all_members(&self, galerie_id: &str) -> AppResult<u64> {
        let result = GalerieUser::delete_many()
            .filter(galerie_user::Column::GalerieId.eq(galerie_id))
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

    fn create_test_galerie(id: &str) -> galerie::Model {
        galerie::Model {
            id: id.to_string(),
            name: "Holidays".to_string(),
            description: None,
            archived: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_member(galerie_id: &str, user_id: &str, role: GalerieRole) -> galerie_user::Model {
        galerie_user::Model {
            galerie_id: galerie_id.to_string(),
            user_id: user_id.to_string(),
            role,
            has_new_frames: false,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<galerie::Model>::new()])
                .into_connection(),
        );

        let repo = GalerieRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let galerie = create_test_galerie("g1");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[galerie.clone()]])
                .into_connection(),
        );

        let repo = GalerieRepository::new(db);
        assert_eq!(repo.find_by_id("g1").await.unwrap(), Some(galerie));
    }

    #[tokio::test]
    async fn test_get_member_returns_role() {
        let member = create_test_member("g1", "u1", GalerieRole::Creator);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[member]])
                .into_connection(),
        );

        let repo = GalerieRepository::new(db);
        let found = repo.get_member("g1", "u1").await.unwrap().unwrap();

        assert_eq!(found.role, GalerieRole::Creator);
    }

    #[tokio::test]
    async fn test_count_members_excluding() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(2))
                }]])
                .into_connection(),
        );

        let repo = GalerieRepository::new(db);
        assert_eq!(repo.count_members_excluding("g1", "u1").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_archive_and_delete() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let repo = GalerieRepository::new(db);
        assert_eq!(repo.archive("g1").await.unwrap(), 1);
        assert_eq!(repo.delete("g1").await.unwrap(), 1);
    }
}
