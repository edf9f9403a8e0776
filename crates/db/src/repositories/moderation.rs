//! Moderation repository.
//!
//! Black lists and support tickets.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use galerie_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    TransactionTrait, sea_query::Expr,
};

use crate::entities::{BlackList, Ticket, black_list, ticket};

/// Outcome of detaching a user from the black list table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlackListDetach {
    /// Bans placed on the user, now deleted.
    pub deleted: u64,
    /// Bans placed or edited by the user, now anonymized.
    pub nulled: u64,
}

/// Repository for moderation operations.
#[derive(Clone)]
pub struct ModerationRepository {
    db: Arc<DatabaseConnection>,
}

impl ModerationRepository {
    /// Create a new moderation repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // ==================== Black Lists ====================

    /// Create a black list entry.
    pub async fn create_black_list(
        &self,
        model: black_list::ActiveModel,
    ) -> AppResult<black_list::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find every black list entry placed on a user.
    pub async fn find_black_lists_of_user(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<black_list::Model>> {
        BlackList::find()
            .filter(black_list::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete one black list entry.
    pub async fn delete_black_list(&self, id: &str) -> AppResult<u64> {
        let result = BlackList::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Delete bans whose duration ran out. Returns the number removed.
    pub async fn delete_expired_black_lists(&self, now: DateTime<FixedOffset>) -> AppResult<u64> {
        let expired: Vec<String> = BlackList::find()
            .filter(black_list::Column::Time.is_not_null())
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .filter(|entry| entry.is_expired(now))
            .map(|entry| entry.id)
            .collect();

        if expired.is_empty() {
            return Ok(0);
        }

        let result = BlackList::delete_many()
            .filter(black_list::Column::Id.is_in(expired))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Remove every trace of a user from the black list table.
    ///
    /// Bans on the user are deleted; bans the user placed or edited keep
    /// existing with the moderator reference cleared. Runs in one
    /// transaction.
    pub async fn detach_user_from_black_lists(&self, user_id: &str) -> AppResult<BlackListDetach> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let deleted = BlackList::delete_many()
            .filter(black_list::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let admin = BlackList::update_many()
            .col_expr(black_list::Column::AdminId, Expr::value(Option::<String>::None))
            .filter(black_list::Column::AdminId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let updated_by = BlackList::update_many()
            .col_expr(
                black_list::Column::UpdatedById,
                Expr::value(Option::<String>::None),
            )
            .filter(black_list::Column::UpdatedById.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(BlackListDetach {
            deleted: deleted.rows_affected,
            nulled: admin.rows_affected + updated_by.rows_affected,
        })
    }

    // ==================== Tickets ====================

    /// Delete a ticket.
    pub async fn delete_ticket(&self, id: &str) -> AppResult<u64> {
        let result = Ticket::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Clear the author of every ticket a user wrote.
    pub async fn detach_user_from_tickets(&self, user_id: &str) -> AppResult<u64> {
        let result = Ticket::update_many()
            .col_expr(ticket::Column::UserId, Expr::value(Option::<String>::None))
            .filter(ticket::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}
