//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use galerie_common::config::CascadeConfig;
use galerie_common::{AppError, AppResult, StorageService};
use galerie_core::{Actor, DeletionService, ModerationService};
use galerie_db::repositories::{ModerationRepository, UserRepository};
use sea_orm::DatabaseConnection;
use tracing::debug;

use crate::auth;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub deletion_service: DeletionService,
    pub moderation_service: ModerationService,
    pub user_repo: UserRepository,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        storage: StorageService,
        cascade: &CascadeConfig,
        jwt_secret: &str,
    ) -> Self {
        Self {
            deletion_service: DeletionService::new(db.clone(), storage, cascade),
            moderation_service: ModerationService::new(
                ModerationRepository::new(db.clone()),
                UserRepository::new(db.clone()),
            ),
            user_repo: UserRepository::new(db),
            jwt_secret: Arc::from(jwt_secret),
        }
    }

    /// Resolve a bearer token to the actor it was issued to.
    ///
    /// A token signed before the user's last token version bump is stale.
    pub async fn authenticate(&self, token: &str) -> AppResult<Actor> {
        let claims = auth::verify(self.jwt_secret.as_bytes(), token)?;
        let user = self
            .user_repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if user.auth_token_version != claims.auth_token_version {
            return Err(AppError::Unauthorized);
        }

        Ok(Actor::new(user.id, user.role))
    }
}

/// Authentication middleware.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.authenticate(token).await {
            Ok(actor) => {
                req.extensions_mut().insert(actor);
            }
            Err(e) => debug!(error = %e, "Rejected bearer token"),
        }
    }

    next.run(req).await
}
