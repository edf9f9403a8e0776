//! Account endpoints.

use axum::{Router, extract::State, routing::delete};
use galerie_common::AppResult;
use galerie_core::DeleteUserInput;
use serde::Serialize;

use crate::{
    extractors::{AuthUser, JsonBody},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedUser {
    pub user_id: String,
}

/// Delete the caller's own account.
async fn delete_me(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<DeleteUserInput>,
) -> AppResult<ApiResponse<DeletedUser>> {
    state
        .deletion_service
        .delete_user(&actor, &actor.id, &input)
        .await?;

    Ok(ApiResponse::delete(DeletedUser { user_id: actor.id }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/me", delete(delete_me))
}
