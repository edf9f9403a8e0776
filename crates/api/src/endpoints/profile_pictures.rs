//! Profile picture endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::delete,
};
use galerie_common::AppResult;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedProfilePicture {
    pub profile_picture_id: String,
}

/// Delete one of the caller's profile pictures.
async fn delete_profile_picture(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(profile_picture_id): Path<String>,
) -> AppResult<ApiResponse<DeletedProfilePicture>> {
    state
        .deletion_service
        .delete_profile_picture(&actor, &profile_picture_id)
        .await?;

    Ok(ApiResponse::delete(DeletedProfilePicture {
        profile_picture_id,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{profile_picture_id}", delete(delete_profile_picture))
}
