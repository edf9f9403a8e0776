//! Ticket endpoints.

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
pub struct DeletedTicket {
    pub ticket_id: String,
}

/// Delete a ticket.
async fn delete_ticket(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
) -> AppResult<ApiResponse<DeletedTicket>> {
    state
        .moderation_service
        .delete_ticket(&actor, &ticket_id)
        .await?;

    Ok(ApiResponse::delete(DeletedTicket { ticket_id }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{ticket_id}", delete(delete_ticket))
}
