//! Test utilities for database operations.
//!
//! Provides an in-memory `SQLite` database migrated with the production
//! [`Migrator`](crate::migrations::Migrator), and a [`Seeder`] that inserts
//! consistent graphs of rows.

use std::sync::Arc;

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use chrono::Utc;
use galerie_common::IdGenerator;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, Set,
};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::entities::galerie_user::GalerieRole;
use crate::entities::user::UserRole;
use crate::entities::{
    black_list, frame, galerie, galerie_picture, galerie_user, image, invitation, like,
    profile_picture, ticket, user,
};
use crate::migrations::Migrator;

/// Bucket used for galerie picture images.
pub const GALERIE_BUCKET: &str = "galerie-pictures";
/// Bucket used for profile picture images.
pub const PROFILE_BUCKET: &str = "profile-pictures";

/// A migrated in-memory database.
pub struct TestDatabase {
    /// Database connection.
    pub conn: Arc<DatabaseConnection>,
}

impl TestDatabase {
    /// Create a fresh in-memory database and run every migration.
    ///
    /// The pool holds a single connection: each `SQLite` memory connection
    /// is its own database.
    pub async fn new() -> Result<Self, DbErr> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;
        conn.execute_unprepared("PRAGMA foreign_keys = ON").await?;
        Migrator::up(&conn, None).await?;

        info!("Created in-memory test database");

        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    /// Get a seeder writing into this database.
    #[must_use]
    pub fn seeder(&self) -> Seeder {
        Seeder::new(self.conn.clone())
    }

    /// Count the rows of an entity.
    pub async fn count<E>(&self, entity: E) -> Result<u64, DbErr>
    where
        E: EntityTrait,
        E::Model: Sync,
    {
        let _ = entity;
        E::find().count(self.conn.as_ref()).await
    }
}

/// Hash a password the way stored accounts are hashed.
///
/// Uses a fixed salt so tests stay deterministic.
pub fn hash_password(password: &str) -> Result<String, DbErr> {
    let salt = SaltString::from_b64("c29tZXNhbHRzb21lc2FsdA")
        .map_err(|e| DbErr::Custom(e.to_string()))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbErr::Custom(e.to_string()))
}

/// Inserts rows for tests.
#[derive(Clone)]
pub struct Seeder {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl Seeder {
    /// Create a seeder for a connection.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Insert a confirmed user without password.
    pub async fn user(&self, name: &str, role: UserRole) -> Result<user::Model, DbErr> {
        self.insert_user(name, role, None, None).await
    }

    /// Insert a confirmed user with an argon2-hashed password.
    pub async fn user_with_password(
        &self,
        name: &str,
        role: UserRole,
        password: &str,
    ) -> Result<user::Model, DbErr> {
        let hash = hash_password(password)?;
        self.insert_user(name, role, Some(hash), None).await
    }

    /// Insert a user created through a Google login.
    pub async fn social_user(&self, name: &str) -> Result<user::Model, DbErr> {
        self.insert_user(name, UserRole::User, None, Some(format!("google-{name}")))
            .await
    }

    async fn insert_user(
        &self,
        name: &str,
        role: UserRole,
        password: Option<String>,
        google_id: Option<String>,
    ) -> Result<user::Model, DbErr> {
        let email = google_id.is_none().then(|| format!("{name}@example.com"));

        user::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_name: Set(format!("@{name}")),
            email: Set(email),
            password: Set(password),
            pseudonym: Set(name.to_string()),
            role: Set(role),
            confirmed: Set(true),
            facebook_id: Set(None),
            google_id: Set(google_id),
            auth_token_version: Set(0),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        }
        .insert(self.db.as_ref())
        .await
    }

    /// Insert a galerie and its creator membership.
    pub async fn galerie(&self, name: &str, creator_id: &str) -> Result<galerie::Model, DbErr> {
        let galerie = galerie::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name.to_string()),
            description: Set(None),
            archived: Set(false),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        }
        .insert(self.db.as_ref())
        .await?;

        self.member(&galerie.id, creator_id, GalerieRole::Creator)
            .await?;

        Ok(galerie)
    }

    /// Insert a membership.
    pub async fn member(
        &self,
        galerie_id: &str,
        user_id: &str,
        role: GalerieRole,
    ) -> Result<galerie_user::Model, DbErr> {
        galerie_user::ActiveModel {
            galerie_id: Set(galerie_id.to_string()),
            user_id: Set(user_id.to_string()),
            role: Set(role),
            has_new_frames: Set(false),
            created_at: Set(Utc::now().into()),
        }
        .insert(self.db.as_ref())
        .await
    }

    /// Insert a frame with `pictures` galerie pictures.
    ///
    /// Returns the frame and the images its pictures own.
    pub async fn frame(
        &self,
        galerie_id: &str,
        user_id: &str,
        pictures: usize,
    ) -> Result<(frame::Model, Vec<image::Model>), DbErr> {
        let frame = frame::ActiveModel {
            id: Set(self.id_gen.generate()),
            galerie_id: Set(galerie_id.to_string()),
            user_id: Set(user_id.to_string()),
            description: Set(None),
            num_of_likes: Set(0),
            created_at: Set(Utc::now().into()),
        }
        .insert(self.db.as_ref())
        .await?;

        let mut images = Vec::with_capacity(pictures * 3);
        for position in 0..pictures {
            let [original, cropped, pending] = self.image_triple(GALERIE_BUCKET).await?;
            galerie_picture::ActiveModel {
                id: Set(self.id_gen.generate()),
                frame_id: Set(frame.id.clone()),
                original_image_id: Set(original.id.clone()),
                cropped_image_id: Set(cropped.id.clone()),
                pending_image_id: Set(pending.id.clone()),
                position: Set(position as i32),
                current: Set(false),
                created_at: Set(Utc::now().into()),
            }
            .insert(self.db.as_ref())
            .await?;
            images.extend([original, cropped, pending]);
        }

        Ok((frame, images))
    }

    /// Insert a profile picture and the images it owns.
    pub async fn profile_picture(
        &self,
        user_id: &str,
        current: bool,
    ) -> Result<(profile_picture::Model, Vec<image::Model>), DbErr> {
        let [original, cropped, pending] = self.image_triple(PROFILE_BUCKET).await?;
        let picture = profile_picture::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            original_image_id: Set(original.id.clone()),
            cropped_image_id: Set(cropped.id.clone()),
            pending_image_id: Set(pending.id.clone()),
            current: Set(current),
            created_at: Set(Utc::now().into()),
        }
        .insert(self.db.as_ref())
        .await?;

        Ok((picture, vec![original, cropped, pending]))
    }

    /// Insert an image row that no picture references.
    pub async fn image(&self, bucket: &str) -> Result<image::Model, DbErr> {
        image::ActiveModel {
            id: Set(self.id_gen.generate()),
            bucket_name: Set(bucket.to_string()),
            file_name: Set(self.id_gen.generate_blob_key("jpeg")),
            format: Set("jpeg".to_string()),
            width: Set(640),
            height: Set(480),
            size: Set(2048),
            created_at: Set((Utc::now() - chrono::Duration::days(1)).into()),
        }
        .insert(self.db.as_ref())
        .await
    }

    async fn image_triple(&self, bucket: &str) -> Result<[image::Model; 3], DbErr> {
        Ok([
            self.image(bucket).await?,
            self.image(bucket).await?,
            self.image(bucket).await?,
        ])
    }

    /// Insert a like and bump the frame counter.
    pub async fn like(&self, user_id: &str, frame_id: &str) -> Result<like::Model, DbErr> {
        use sea_orm::{ColumnTrait, QueryFilter, sea_query::Expr};

        let like = like::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            frame_id: Set(frame_id.to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(self.db.as_ref())
        .await?;

        crate::entities::Frame::update_many()
            .col_expr(
                frame::Column::NumOfLikes,
                Expr::col(frame::Column::NumOfLikes).add(1),
            )
            .filter(frame::Column::Id.eq(frame_id))
            .exec(self.db.as_ref())
            .await?;

        Ok(like)
    }

    /// Insert an unlimited invitation.
    pub async fn invitation(
        &self,
        galerie_id: &str,
        user_id: &str,
    ) -> Result<invitation::Model, DbErr> {
        invitation::ActiveModel {
            id: Set(self.id_gen.generate()),
            galerie_id: Set(galerie_id.to_string()),
            user_id: Set(user_id.to_string()),
            code: Set(self.id_gen.generate_code()),
            time: Set(None),
            num_of_invits: Set(None),
            created_at: Set(Utc::now().into()),
        }
        .insert(self.db.as_ref())
        .await
    }

    /// Insert a ban on `user_id`.
    pub async fn black_list(
        &self,
        user_id: &str,
        admin_id: Option<&str>,
        time: Option<i64>,
    ) -> Result<black_list::Model, DbErr> {
        black_list::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            admin_id: Set(admin_id.map(str::to_string)),
            updated_by_id: Set(None),
            reason: Set("posted unrelated pictures".to_string()),
            time: Set(time),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        }
        .insert(self.db.as_ref())
        .await
    }

    /// Insert a support ticket.
    pub async fn ticket(&self, user_id: &str) -> Result<ticket::Model, DbErr> {
        ticket::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(Some(user_id.to_string())),
            header: Set("cannot upload".to_string()),
            body: Set("the upload button does nothing".to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(self.db.as_ref())
        .await
    }
}
