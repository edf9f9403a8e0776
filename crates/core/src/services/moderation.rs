//! Moderation service for black lists and support tickets.

use chrono::Utc;
use galerie_common::{AppError, AppResult, IdGenerator};
use galerie_db::{
    entities::black_list,
    repositories::{ModerationRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use tracing::{debug, info};
use validator::Validate;

use crate::services::authorization::{Action, Actor, GateRequest, authorize};

/// Input for black listing a user.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BlackListInput {
    #[validate(length(min = 10, max = 200))]
    pub reason: String,
    /// Duration in milliseconds, None for permanent. Between ten minutes
    /// and one year.
    #[validate(range(min = 600_000, max = 31_536_000_000_i64))]
    pub time: Option<i64>,
}

/// Moderation service.
#[derive(Clone)]
pub struct ModerationService {
    moderation_repo: ModerationRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub const fn new(moderation_repo: ModerationRepository, user_repo: UserRepository) -> Self {
        Self {
            moderation_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    // ========== Black Lists ==========

    /// Ban a user.
    pub async fn black_list_user(
        &self,
        actor: &Actor,
        target_user_id: &str,
        input: BlackListInput,
    ) -> AppResult<black_list::Model> {
        let input = BlackListInput {
            reason: input.reason.trim().to_string(),
            time: input.time,
        };
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let target = self
            .user_repo
            .find_by_id(target_user_id)
            .await?
            .filter(|user| user.confirmed)
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

        authorize(
            &GateRequest::new(Action::BlackListUser, actor.role)
                .target_role(target.role)
                .targets_self(actor.id == target.id),
        )?;

        if self.is_black_listed(&target.id).await? {
            return Err(AppError::BadRequest(
                "this user is already black listed".to_string(),
            ));
        }

        let model = black_list::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(target.id.clone()),
            admin_id: Set(Some(actor.id.clone())),
            updated_by_id: Set(None),
            reason: Set(input.reason),
            time: Set(input.time),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let entry = self.moderation_repo.create_black_list(model).await?;
        info!(user_id = %target.id, admin_id = %actor.id, time = ?entry.time, "User black listed");
        Ok(entry)
    }

    /// Check if a user is banned. Bans that ran out are destroyed on the
    /// way.
    pub async fn is_black_listed(&self, user_id: &str) -> AppResult<bool> {
        let now = Utc::now().into();
        let mut banned = false;

        for entry in self.moderation_repo.find_black_lists_of_user(user_id).await? {
            if entry.is_expired(now) {
                debug!(black_list_id = %entry.id, user_id = %user_id, "Black list expired");
                self.moderation_repo.delete_black_list(&entry.id).await?;
            } else {
                banned = true;
            }
        }

        Ok(banned)
    }

    /// Destroy every ban that ran out. Returns the number removed.
    pub async fn purge_expired_black_lists(&self) -> AppResult<u64> {
        let removed = self
            .moderation_repo
            .delete_expired_black_lists(Utc::now().into())
            .await?;
        if removed > 0 {
            info!(removed, "Purged expired black lists");
        }
        Ok(removed)
    }

    // ========== Tickets ==========

    /// Delete a ticket. Returns whether a row was removed.
    pub async fn delete_ticket(&self, actor: &Actor, ticket_id: &str) -> AppResult<bool> {
        authorize(&GateRequest::new(Action::DeleteTicket, actor.role))?;

        let removed = self.moderation_repo.delete_ticket(ticket_id).await? > 0;
        if removed {
            info!(ticket_id = %ticket_id, actor_id = %actor.id, "Ticket deleted");
        }
        Ok(removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use galerie_db::entities::user::UserRole;
    use galerie_db::entities::{BlackList, Ticket};
    use galerie_db::test_utils::TestDatabase;
    use sea_orm::EntityTrait;

    fn service(db: &TestDatabase) -> ModerationService {
        ModerationService::new(
            ModerationRepository::new(db.conn.clone()),
            UserRepository::new(db.conn.clone()),
        )
    }

    fn actor(user: &galerie_db::entities::user::Model) -> Actor {
        Actor::new(&user.id, user.role)
    }

    fn input(reason: &str, time: Option<i64>) -> BlackListInput {
        BlackListInput {
            reason: reason.to_string(),
            time,
        }
    }

    #[tokio::test]
    async fn test_admin_black_lists_user() {
        let db = TestDatabase::new().await.unwrap();
        let admin = db.seeder().user("admin", UserRole::Admin).await.unwrap();
        let user = db.seeder().user("troll", UserRole::User).await.unwrap();
        let service = service(&db);

        let entry = service
            .black_list_user(&actor(&admin), &user.id, input("  spamming every galerie  ", Some(3_600_000)))
            .await
            .unwrap();

        assert_eq!(entry.reason, "spamming every galerie");
        assert_eq!(entry.admin_id.as_deref(), Some(admin.id.as_str()));
        assert!(service.is_black_listed(&user.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_admin_cannot_black_list_admin() {
        let db = TestDatabase::new().await.unwrap();
        let admin = db.seeder().user("admin", UserRole::Admin).await.unwrap();
        let other = db.seeder().user("other", UserRole::Admin).await.unwrap();

        let err = service(&db)
            .black_list_user(&actor(&admin), &other.id, input("abusing moderation", None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(db.count(BlackList).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_black_list_rejects_bad_input() {
        let db = TestDatabase::new().await.unwrap();
        let admin = db.seeder().user("admin", UserRole::SuperAdmin).await.unwrap();
        let user = db.seeder().user("troll", UserRole::User).await.unwrap();
        let service = service(&db);

        let short = service
            .black_list_user(&actor(&admin), &user.id, input("   spam    ", None))
            .await
            .unwrap_err();
        assert!(matches!(short, AppError::Validation(_)));

        let brief = service
            .black_list_user(&actor(&admin), &user.id, input("posting spam again", Some(60_000)))
            .await
            .unwrap_err();
        assert!(matches!(brief, AppError::Validation(_)));

        assert_eq!(db.count(BlackList).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cannot_black_list_twice() {
        let db = TestDatabase::new().await.unwrap();
        let admin = db.seeder().user("admin", UserRole::SuperAdmin).await.unwrap();
        let user = db.seeder().user("troll", UserRole::User).await.unwrap();
        db.seeder().black_list(&user.id, Some(admin.id.as_str()), None).await.unwrap();

        let err = service(&db)
            .black_list_user(&actor(&admin), &user.id, input("still posting spam", None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(db.count(BlackList).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_expired_ban_does_not_block_new_one() {
        let db = TestDatabase::new().await.unwrap();
        let admin = db.seeder().user("admin", UserRole::SuperAdmin).await.unwrap();
        let user = db.seeder().user("troll", UserRole::User).await.unwrap();
        let expired = db.seeder().black_list(&user.id, None, Some(0)).await.unwrap();

        let entry = service(&db)
            .black_list_user(&actor(&admin), &user.id, input("back to posting spam", None))
            .await
            .unwrap();

        let bans = BlackList::find().all(db.conn.as_ref()).await.unwrap();
        assert_eq!(bans.len(), 1);
        assert_eq!(bans[0].id, entry.id);
        assert_ne!(bans[0].id, expired.id);
    }

    #[tokio::test]
    async fn test_black_list_missing_user() {
        let db = TestDatabase::new().await.unwrap();
        let admin = db.seeder().user("admin", UserRole::SuperAdmin).await.unwrap();

        let err = service(&db)
            .black_list_user(&actor(&admin), "01missing", input("posting spam again", None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_expired_ban_is_destroyed() {
        let db = TestDatabase::new().await.unwrap();
        let user = db.seeder().user("troll", UserRole::User).await.unwrap();
        db.seeder().black_list(&user.id, None, Some(0)).await.unwrap();
        let service = service(&db);

        assert!(!service.is_black_listed(&user.id).await.unwrap());
        assert_eq!(db.count(BlackList).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_purge_expired_keeps_permanent_bans() {
        let db = TestDatabase::new().await.unwrap();
        let first = db.seeder().user("first", UserRole::User).await.unwrap();
        let second = db.seeder().user("second", UserRole::User).await.unwrap();
        db.seeder().black_list(&first.id, None, Some(0)).await.unwrap();
        db.seeder().black_list(&second.id, None, None).await.unwrap();

        assert_eq!(service(&db).purge_expired_black_lists().await.unwrap(), 1);
        assert_eq!(db.count(BlackList).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_only_super_admin_deletes_tickets() {
        let db = TestDatabase::new().await.unwrap();
        let admin = db.seeder().user("admin", UserRole::Admin).await.unwrap();
        let root = db.seeder().user("root", UserRole::SuperAdmin).await.unwrap();
        let ticket = db.seeder().ticket(&admin.id).await.unwrap();
        let service = service(&db);

        let err = service.delete_ticket(&actor(&admin), &ticket.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        assert!(service.delete_ticket(&actor(&root), &ticket.id).await.unwrap());
        assert!(!service.delete_ticket(&actor(&root), &ticket.id).await.unwrap());
        assert_eq!(db.count(Ticket).await.unwrap(), 0);
    }
}
