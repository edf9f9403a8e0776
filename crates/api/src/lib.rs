//! HTTP API layer for galerie-rs.
//!
//! This crate exposes the destructive endpoints of the backend:
//!
//! - **Endpoints**: account, galerie, membership, frame, profile picture,
//!   black list and ticket removal
//! - **Extractors**: the authenticated [`Actor`](galerie_core::Actor)
//! - **Middleware**: bearer token authentication
//!
//! Built on Axum 0.8.

pub mod auth;
pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
