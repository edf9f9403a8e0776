//! Galerie endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::delete,
};
use galerie_common::AppResult;
use galerie_core::DeleteGalerieInput;
use serde::Serialize;

use crate::{
    extractors::{AuthUser, JsonBody},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedGalerie {
    pub galerie_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedMember {
    pub galerie_id: String,
    pub user_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedFrame {
    pub galerie_id: String,
    pub frame_id: String,
}

/// Delete a galerie.
async fn delete_galerie(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(galerie_id): Path<String>,
    JsonBody(input): JsonBody<DeleteGalerieInput>,
) -> AppResult<ApiResponse<DeletedGalerie>> {
    state
        .deletion_service
        .delete_galerie(&actor, &galerie_id, &input)
        .await?;

    Ok(ApiResponse::delete(DeletedGalerie { galerie_id }))
}

/// Remove a user from a galerie.
async fn remove_member(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path((galerie_id, user_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<RemovedMember>> {
    state
        .deletion_service
        .remove_member(&actor, &galerie_id, &user_id)
        .await?;

    Ok(ApiResponse::delete(RemovedMember {
        galerie_id,
        user_id,
    }))
}

/// Delete a frame.
async fn delete_frame(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path((galerie_id, frame_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<DeletedFrame>> {
    state
        .deletion_service
        .delete_frame(&actor, &galerie_id, &frame_id)
        .await?;

    Ok(ApiResponse::delete(DeletedFrame {
        galerie_id,
        frame_id,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{galerie_id}", delete(delete_galerie))
        .route("/{galerie_id}/users/{user_id}", delete(remove_member))
        .route("/{galerie_id}/frames/{frame_id}", delete(delete_frame))
}
