//! Deletion orchestrator.
//!
//! Every destructive entry point of the application goes through
//! [`DeletionService`]. A trigger first resolves the rows it needs, asks the
//! authorization gate and checks confirmations; nothing is mutated before
//! all of that passed. The cascade then walks the dependency table of
//! [`cascade_graph`](crate::services::cascade_graph) children first and
//! removes the root row last, so an interrupted run leaves a smaller but
//! consistent graph behind and can simply be re-run.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{Duration, Utc};
use futures::stream::{self, StreamExt};
use galerie_common::config::CascadeConfig;
use galerie_common::{AppError, AppResult, StorageService};
use galerie_db::entities::{frame, galerie_picture, galerie_user::GalerieRole, like, profile_picture};
use galerie_db::repositories::{
    FrameRepository, GalerieRepository, ImageRepository, InvitationRepository, LikeRepository,
    ModerationRepository, PictureRepository, UserRepository,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::services::archive_policy::{DepartureOutcome, on_creator_departure};
use crate::services::authorization::{Action, Actor, GateRequest, authorize};
use crate::services::blob_cleanup::BlobCleanupCoordinator;
use crate::services::cascade_graph::{EntityKind, node};
use crate::services::report::{CascadeReport, MembershipRef};

/// Sentence a user must type to delete their account.
pub const DELETE_ACCOUNT_SENTENCE: &str = "delete my account";

/// Galeries younger than this are left alone by the sweep; their creator
/// membership may not be written yet.
const EMPTY_GALERIE_GRACE_MINUTES: i64 = 60;

/// Confirmation fields for deleting an account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserInput {
    pub delete_account_sentence: String,
    pub password: String,
    /// Email, or user name without its leading `@`.
    pub user_name_or_email: String,
}

/// Confirmation fields for deleting a galerie.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteGalerieInput {
    pub name: String,
    pub password: String,
}

/// Deletion orchestrator.
#[derive(Clone)]
pub struct DeletionService {
    users: UserRepository,
    galeries: GalerieRepository,
    frames: FrameRepository,
    likes: LikeRepository,
    pictures: PictureRepository,
    invitations: InvitationRepository,
    moderation: ModerationRepository,
    blobs: BlobCleanupCoordinator,
    frame_concurrency: usize,
}

impl DeletionService {
    /// Create a new deletion service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, storage: StorageService, cascade: &CascadeConfig) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            galeries: GalerieRepository::new(db.clone()),
            frames: FrameRepository::new(db.clone()),
            likes: LikeRepository::new(db.clone()),
            pictures: PictureRepository::new(db.clone()),
            invitations: InvitationRepository::new(db.clone()),
            moderation: ModerationRepository::new(db.clone()),
            blobs: BlobCleanupCoordinator::new(
                ImageRepository::new(db),
                storage,
                cascade.blob_concurrency,
            ),
            frame_concurrency: cascade.frame_concurrency.max(1),
        }
    }

    // ==================== Triggers ====================

    /// Delete an account and everything it owns.
    ///
    /// Galeries the user created are archived when other members remain and
    /// destroyed otherwise. Tickets and moderation records the user wrote
    /// survive anonymized.
    pub async fn delete_user(
        &self,
        actor: &Actor,
        target_user_id: &str,
        input: &DeleteUserInput,
    ) -> AppResult<CascadeReport> {
        authorize(
            &GateRequest::new(Action::DeleteUser, actor.role)
                .targets_self(actor.id == target_user_id),
        )?;

        let Some(user) = self.users.find_by_id(target_user_id).await? else {
            debug!(user_id = %target_user_id, "User already gone");
            return Ok(CascadeReport::default());
        };

        if user.is_social_account() {
            return Err(AppError::Forbidden(
                "you can't delete an account created with Facebook or Google".to_string(),
            ));
        }

        let mut errors = BTreeMap::new();
        if input.delete_account_sentence != DELETE_ACCOUNT_SENTENCE {
            errors.insert("deleteAccountSentence".to_string(), "wrong sentence".to_string());
        }
        if !password_matches(&input.password, user.password.as_deref())? {
            errors.insert("password".to_string(), "wrong password".to_string());
        }
        let by_email = user.email.as_deref() == Some(input.user_name_or_email.as_str());
        let by_name = format!("@{}", input.user_name_or_email) == user.user_name;
        if !by_email && !by_name {
            errors.insert(
                "userNameOrEmail".to_string(),
                "wrong user name or email".to_string(),
            );
        }
        if !errors.is_empty() {
            return Err(AppError::Confirmation(errors));
        }

        let memberships = self.galeries.find_memberships_of_user(&user.id).await?;
        for membership in memberships.iter().filter(|m| m.role.is_creator()) {
            self.ensure_single_creator(&membership.galerie_id).await?;
        }

        info!(user_id = %user.id, "Deleting user");
        let report = self.purge_user(&user.id).await?;
        info!(
            user_id = %user.id,
            galeries = report.galeries.len(),
            archived = report.archived_galeries.len(),
            frames = report.frames.len(),
            images = report.images.len(),
            blob_failures = report.blob_failures.len(),
            "User deleted"
        );

        Ok(report)
    }

    /// Delete a galerie. Only its creator may, after retyping its name and
    /// their password.
    pub async fn delete_galerie(
        &self,
        actor: &Actor,
        galerie_id: &str,
        input: &DeleteGalerieInput,
    ) -> AppResult<CascadeReport> {
        let Some(galerie) = self.galeries.find_by_id(galerie_id).await? else {
            debug!(galerie_id = %galerie_id, "Galerie already gone");
            return Ok(CascadeReport::default());
        };

        let membership = self
            .galeries
            .get_member(galerie_id, &actor.id)
            .await?
            .ok_or_else(|| AppError::NotFound("galerie not found".to_string()))?;

        authorize(
            &GateRequest::new(Action::DeleteGalerie, actor.role)
                .actor_membership(Some(membership.role)),
        )?;

        let actor_user = self.users.get_by_id(&actor.id).await?;
        let mut errors = BTreeMap::new();
        if input.name != galerie.name {
            errors.insert("name".to_string(), "wrong galerie name".to_string());
        }
        if !password_matches(&input.password, actor_user.password.as_deref())? {
            errors.insert("password".to_string(), "wrong password".to_string());
        }
        if !errors.is_empty() {
            return Err(AppError::Confirmation(errors));
        }

        info!(galerie_id = %galerie.id, actor_id = %actor.id, "Deleting galerie");
        let report = self.purge_galerie(&galerie.id).await?;
        info!(
            galerie_id = %galerie.id,
            frames = report.frames.len(),
            images = report.images.len(),
            blob_failures = report.blob_failures.len(),
            "Galerie deleted"
        );

        Ok(report)
    }

    /// Remove a member from a galerie along with the frames and likes they
    /// left in it. Invitations they created stay.
    pub async fn remove_member(
        &self,
        actor: &Actor,
        galerie_id: &str,
        target_user_id: &str,
    ) -> AppResult<CascadeReport> {
        if actor.id == target_user_id {
            authorize(
                &GateRequest::new(Action::RemoveMember, actor.role).targets_self(true),
            )?;
        }

        self.galeries.get_by_id(galerie_id).await?;
        let actor_membership = self
            .galeries
            .get_member(galerie_id, &actor.id)
            .await?
            .ok_or_else(|| AppError::NotFound("galerie not found".to_string()))?;

        let Some(target_membership) = self.galeries.get_member(galerie_id, target_user_id).await?
        else {
            debug!(galerie_id = %galerie_id, user_id = %target_user_id, "Membership already gone");
            return Ok(CascadeReport::default());
        };

        authorize(
            &GateRequest::new(Action::RemoveMember, actor.role)
                .actor_membership(Some(actor_membership.role))
                .target_membership(target_membership.role),
        )?;

        info!(galerie_id = %galerie_id, user_id = %target_user_id, actor_id = %actor.id, "Removing member");
        self.purge_membership(galerie_id, target_user_id).await
    }

    /// Delete a frame with its likes, pictures and images.
    pub async fn delete_frame(
        &self,
        actor: &Actor,
        galerie_id: &str,
        frame_id: &str,
    ) -> AppResult<CascadeReport> {
        self.galeries.get_by_id(galerie_id).await?;
        let membership = self
            .galeries
            .get_member(galerie_id, &actor.id)
            .await?
            .ok_or_else(|| AppError::NotFound("galerie not found".to_string()))?;

        authorize(
            &GateRequest::new(Action::DeleteFrame, actor.role)
                .actor_membership(Some(membership.role)),
        )?;

        let Some(frame) = self.frames.find_by_id(frame_id).await? else {
            debug!(frame_id = %frame_id, "Frame already gone");
            return Ok(CascadeReport::default());
        };
        if frame.galerie_id != galerie_id {
            return Err(AppError::NotFound("frame not found".to_string()));
        }

        info!(frame_id = %frame.id, galerie_id = %galerie_id, actor_id = %actor.id, "Deleting frame");
        self.purge_frame(&frame).await
    }

    /// Delete one of the actor's profile pictures and its images.
    ///
    /// No other picture is promoted when the current one goes.
    pub async fn delete_profile_picture(
        &self,
        actor: &Actor,
        profile_picture_id: &str,
    ) -> AppResult<CascadeReport> {
        let Some(picture) = self.pictures.find_profile_picture(profile_picture_id).await? else {
            debug!(profile_picture_id = %profile_picture_id, "Profile picture already gone");
            return Ok(CascadeReport::default());
        };
        // Someone else's picture is reported as missing.
        authorize(
            &GateRequest::new(Action::DeleteProfilePicture, actor.role)
                .targets_self(picture.user_id == actor.id),
        )
        .map_err(|_| AppError::NotFound("profile picture not found".to_string()))?;

        info!(profile_picture_id = %picture.id, user_id = %actor.id, "Deleting profile picture");
        self.purge_profile_picture(&picture).await
    }

    /// Destroy galeries nobody belongs to any more, then image rows no
    /// picture references. Each pass handles at most `batch` of each.
    pub async fn sweep(&self, batch: u64) -> AppResult<CascadeReport> {
        let cutoff = Utc::now() - Duration::minutes(EMPTY_GALERIE_GRACE_MINUTES);
        let mut report = CascadeReport::default();

        for galerie in self.galeries.find_without_members(cutoff.into(), batch).await? {
            warn!(galerie_id = %galerie.id, "Destroying galerie without members");
            report.merge(self.purge_galerie(&galerie.id).await?);
        }
        report.merge(self.blobs.sweep_orphans(batch).await?);

        if !report.is_empty() {
            info!(
                galeries = report.galeries.len(),
                images = report.images.len(),
                "Sweep finished"
            );
        }

        Ok(report)
    }

    // ==================== Subtrees ====================

    async fn purge_user(&self, user_id: &str) -> AppResult<CascadeReport> {
        let user_node = node(EntityKind::User);
        let mut report = CascadeReport::default();

        for dependent in user_node.dependents {
            match dependent {
                EntityKind::ProfilePicture => {
                    for picture in self.pictures.find_profile_pictures_of_user(user_id).await? {
                        report.merge(self.purge_profile_picture(&picture).await?);
                    }
                }
                EntityKind::BlackList => {
                    let detached = self.moderation.detach_user_from_black_lists(user_id).await?;
                    report.black_lists += detached.deleted;
                    report.nulled_black_lists += detached.nulled;
                }
                EntityKind::Frame => {
                    let frames = self.frames.find_by_user(user_id).await?;
                    report.merge(self.purge_frames(frames).await?);
                }
                EntityKind::Like => {
                    let likes = self.likes.find_by_user(user_id).await?;
                    report.merge(self.destroy_likes(likes).await?);
                }
                EntityKind::Membership => {
                    for membership in self.galeries.find_memberships_of_user(user_id).await? {
                        report.merge(self.leave_galerie(&membership.galerie_id, user_id, membership.role).await?);
                    }
                }
                EntityKind::Invitation => {
                    report.invitations += self.invitations.delete_by_user(user_id).await?;
                }
                other => return Err(unhandled(EntityKind::User, *other)),
            }
        }

        for nulled in user_node.nulled {
            match nulled.kind {
                EntityKind::Ticket => {
                    report.nulled_tickets += self.moderation.detach_user_from_tickets(user_id).await?;
                }
                // Cleared together with the bans on the user.
                EntityKind::BlackList => {}
                other => return Err(unhandled(EntityKind::User, other)),
            }
        }

        if self.users.delete(user_id).await? > 0 {
            report.users.push(user_id.to_string());
        }
        Ok(report)
    }

    async fn leave_galerie(
        &self,
        galerie_id: &str,
        user_id: &str,
        role: GalerieRole,
    ) -> AppResult<CascadeReport> {
        if role.is_creator() {
            return self.depart_creator(galerie_id, user_id).await;
        }

        let mut report = self.purge_membership(galerie_id, user_id).await?;

        // An archived galerie has no creator left to look after it.
        if let Some(galerie) = self.galeries.find_by_id(galerie_id).await? {
            if galerie.archived && self.galeries.count_members_excluding(galerie_id, user_id).await? == 0 {
                debug!(galerie_id = %galerie_id, "Last member left archived galerie");
                report.merge(self.purge_galerie(galerie_id).await?);
            }
        }
        Ok(report)
    }

    async fn depart_creator(&self, galerie_id: &str, creator_id: &str) -> AppResult<CascadeReport> {
        let mut report = CascadeReport::default();
        report.invitations += self.invitations.delete_by_galerie(galerie_id).await?;

        let remaining = self
            .galeries
            .count_members_excluding(galerie_id, creator_id)
            .await?;

        match on_creator_departure(remaining) {
            DepartureOutcome::Delete => {
                debug!(galerie_id = %galerie_id, "Creator was the last member");
                report.merge(self.purge_galerie(galerie_id).await?);
            }
            DepartureOutcome::Archive => {
                debug!(galerie_id = %galerie_id, remaining, "Archiving galerie");
                if self.galeries.archive(galerie_id).await? > 0 {
                    report.archived_galeries.push(galerie_id.to_string());
                }
                report.merge(self.purge_membership(galerie_id, creator_id).await?);
            }
        }
        Ok(report)
    }

    async fn purge_galerie(&self, galerie_id: &str) -> AppResult<CascadeReport> {
        let mut report = CascadeReport::default();

        for dependent in node(EntityKind::Galerie).dependents {
            match dependent {
                EntityKind::Frame => {
                    let frames = self.frames.find_by_galerie(galerie_id).await?;
                    report.merge(self.purge_frames(frames).await?);
                }
                EntityKind::Invitation => {
                    report.invitations += self.invitations.delete_by_galerie(galerie_id).await?;
                }
                EntityKind::Membership => {
                    let members = self.galeries.list_members(galerie_id).await?;
                    self.galeries.remove_all_members(galerie_id).await?;
                    report
                        .memberships
                        .extend(members.into_iter().map(|m| MembershipRef {
                            galerie_id: m.galerie_id,
                            user_id: m.user_id,
                        }));
                }
                other => return Err(unhandled(EntityKind::Galerie, *other)),
            }
        }

        if self.galeries.delete(galerie_id).await? > 0 {
            report.galeries.push(galerie_id.to_string());
        }
        Ok(report)
    }

    async fn purge_membership(&self, galerie_id: &str, user_id: &str) -> AppResult<CascadeReport> {
        let mut report = CascadeReport::default();

        for dependent in node(EntityKind::Membership).dependents {
            match dependent {
                EntityKind::Frame => {
                    let frames = self.frames.find_by_galerie_and_user(galerie_id, user_id).await?;
                    report.merge(self.purge_frames(frames).await?);
                }
                EntityKind::Like => {
                    let likes = self.likes.find_by_user_in_galerie(user_id, galerie_id).await?;
                    report.merge(self.destroy_likes(likes).await?);
                }
                other => return Err(unhandled(EntityKind::Membership, *other)),
            }
        }

        if self.galeries.remove_member(galerie_id, user_id).await? > 0 {
            report.memberships.push(MembershipRef {
                galerie_id: galerie_id.to_string(),
                user_id: user_id.to_string(),
            });
        }
        Ok(report)
    }

    /// Purge frames concurrently. Every subtree settles before the first
    /// failure is returned.
    async fn purge_frames(&self, frames: Vec<frame::Model>) -> AppResult<CascadeReport> {
        if frames.is_empty() {
            return Ok(CascadeReport::default());
        }

        let results: Vec<AppResult<CascadeReport>> = stream::iter(frames)
            .map(|frame| async move { self.purge_frame(&frame).await })
            .buffer_unordered(self.frame_concurrency)
            .collect()
            .await;

        let mut report = CascadeReport::default();
        let mut first_error = None;
        for result in results {
            match result {
                Ok(partial) => report.merge(partial),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }

    async fn purge_frame(&self, frame: &frame::Model) -> AppResult<CascadeReport> {
        let mut report = CascadeReport::default();

        for dependent in node(EntityKind::Frame).dependents {
            match dependent {
                EntityKind::Like => {
                    let likes = self.likes.find_by_frame(&frame.id).await?;
                    self.likes.delete_by_frame(&frame.id).await?;
                    report.likes.extend(likes.into_iter().map(|like| like.id));
                }
                EntityKind::GaleriePicture => {
                    for picture in self.pictures.find_galerie_pictures_by_frame(&frame.id).await? {
                        report.merge(self.purge_galerie_picture(&picture).await?);
                    }
                }
                other => return Err(unhandled(EntityKind::Frame, *other)),
            }
        }

        if self.frames.delete(&frame.id).await? > 0 {
            report.frames.push(frame.id.clone());
        }
        Ok(report)
    }

    async fn purge_galerie_picture(
        &self,
        picture: &galerie_picture::Model,
    ) -> AppResult<CascadeReport> {
        let mut report = CascadeReport::default();
        if self.pictures.delete_galerie_picture(&picture.id).await? > 0 {
            report.galerie_pictures.push(picture.id.clone());
        }
        if node(EntityKind::GaleriePicture).owns_images {
            report.merge(self.blobs.destroy_images(&picture.image_ids()).await?);
        }
        Ok(report)
    }

    async fn purge_profile_picture(
        &self,
        picture: &profile_picture::Model,
    ) -> AppResult<CascadeReport> {
        let mut report = CascadeReport::default();
        if self.pictures.delete_profile_picture(&picture.id).await? > 0 {
            report.profile_pictures.push(picture.id.clone());
        }
        if node(EntityKind::ProfilePicture).owns_images {
            report.merge(self.blobs.destroy_images(&picture.image_ids()).await?);
        }
        Ok(report)
    }

    /// Delete likes and recompute the counter of every frame they were on.
    async fn destroy_likes(&self, likes: Vec<like::Model>) -> AppResult<CascadeReport> {
        let mut report = CascadeReport::default();
        let mut frames = BTreeSet::new();

        for like in likes {
            if self.likes.delete(&like.id).await? > 0 {
                report.likes.push(like.id);
            }
            frames.insert(like.frame_id);
        }

        for frame_id in frames {
            self.frames.resync_likes(&frame_id).await?;
            report.resynced_frames.push(frame_id);
        }
        Ok(report)
    }

    async fn ensure_single_creator(&self, galerie_id: &str) -> AppResult<()> {
        let creators = self.galeries.count_creators(galerie_id).await?;
        if creators > 1 {
            return Err(AppError::InvariantViolation(format!(
                "galerie {galerie_id} has {creators} creators"
            )));
        }
        Ok(())
    }
}

fn unhandled(parent: EntityKind, dependent: EntityKind) -> AppError {
    AppError::InvariantViolation(format!(
        "no cascade step for {dependent:?} under {parent:?}"
    ))
}

/// Check a password against a stored hash. Accounts without a password
/// never match.
fn password_matches(password: &str, hash: Option<&str>) -> AppResult<bool> {
    match hash {
        Some(hash) => verify_password(password, hash),
        None => Ok(false),
    }
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    use argon2::{Argon2, PasswordVerifier, password_hash::PasswordHash};

    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
