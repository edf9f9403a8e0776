//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Platform-wide role of a user.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "camelCase")]
pub enum UserRole {
    /// Regular account.
    #[default]
    #[sea_orm(string_value = "user")]
    User,
    /// Moderator - can black-list regular users.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Site owner - can black-list admins and close tickets.
    #[sea_orm(string_value = "superAdmin")]
    SuperAdmin,
}

impl UserRole {
    /// Check if the role may moderate other accounts.
    #[must_use]
    pub const fn is_moderator(self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }

    /// Check if this is the super admin role.
    #[must_use]
    pub const fn is_super_admin(self) -> bool {
        matches!(self, Self::SuperAdmin)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Handle, always stored with a leading `@`.
    #[sea_orm(unique)]
    pub user_name: String,

    /// NULL for accounts created through a social login.
    #[sea_orm(unique, nullable)]
    pub email: Option<String>,

    /// Argon2 PHC string. NULL for social-login accounts.
    #[sea_orm(nullable)]
    #[serde(skip_serializing)]
    pub password: Option<String>,

    /// Display name.
    pub pseudonym: String,

    pub role: UserRole,

    /// Whether the email address was confirmed.
    #[sea_orm(default_value = false)]
    pub confirmed: bool,

    #[sea_orm(nullable)]
    pub facebook_id: Option<String>,

    #[sea_orm(nullable)]
    pub google_id: Option<String>,

    /// Bumped to revoke every issued token.
    #[sea_orm(default_value = 0)]
    pub auth_token_version: i32,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Whether the account was created through Facebook or Google.
    #[must_use]
    pub const fn is_social_account(&self) -> bool {
        self.facebook_id.is_some() || self.google_id.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::galerie_user::Entity")]
    GalerieUser,
    #[sea_orm(has_many = "super::frame::Entity")]
    Frame,
    #[sea_orm(has_many = "super::profile_picture::Entity")]
    ProfilePicture,
}

impl Related<super::galerie_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GalerieUser.def()
    }
}

impl Related<super::frame::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Frame.def()
    }
}

impl Related<super::profile_picture::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProfilePicture.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
