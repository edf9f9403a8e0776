//! Black list endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::post,
};
use galerie_common::AppResult;
use galerie_core::BlackListInput;
use galerie_db::entities::black_list::Model as BlackListModel;
use serde::Serialize;

use crate::{
    extractors::{AuthUser, JsonBody},
    middleware::AppState,
    response::ApiResponse,
};

/// Black list response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlackListResponse {
    pub id: String,
    pub user_id: String,
    pub admin_id: Option<String>,
    pub reason: String,
    pub time: Option<i64>,
    pub created_at: String,
}

impl From<BlackListModel> for BlackListResponse {
    fn from(b: BlackListModel) -> Self {
        Self {
            id: b.id,
            user_id: b.user_id,
            admin_id: b.admin_id,
            reason: b.reason,
            time: b.time,
            created_at: b.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBlackList {
    pub black_list: BlackListResponse,
}

/// Black list a user.
async fn black_list_user(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    JsonBody(input): JsonBody<BlackListInput>,
) -> AppResult<ApiResponse<CreatedBlackList>> {
    let black_list = state
        .moderation_service
        .black_list_user(&actor, &user_id, input)
        .await?;

    Ok(ApiResponse::post(CreatedBlackList {
        black_list: black_list.into(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{user_id}", post(black_list_user))
}
