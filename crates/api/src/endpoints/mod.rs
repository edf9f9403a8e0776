//! API endpoints.

mod black_lists;
mod galeries;
mod profile_pictures;
mod tickets;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/galeries", galeries::router())
        .nest("/profilePictures", profile_pictures::router())
        .nest("/blackLists", black_lists::router())
        .nest("/tickets", tickets::router())
}
