//! HTTP API definitions.

pub mod enquiry;
pub mod listing;
pub mod user;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;

/// Builds the [`Router`] of the whole HTTP API.
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route(
            "/api/properties",
            get(listing::list).post(listing::create),
        )
        .route(
            "/api/properties/:id",
            get(listing::find)
                .put(listing::update)
                .delete(listing::delete),
        )
        .route("/api/my-properties", get(listing::mine))
        .route("/api/enquiries", post(enquiry::create))
        .route("/api/notifications", get(enquiry::list))
        .route("/api/notifications/:id/read", post(enquiry::mark_read))
        .route("/api/profile", get(user::find).put(user::upsert))
        .route("/api/profile-photo", post(user::upload_photo))
}

/// Confirmation body of a mutation response.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct MessageBody {
    /// Human-readable confirmation.
    pub message: &'static str,
}

/// Confirmation body of a creation response.
#[derive(Clone, Debug, Serialize)]
pub struct CreatedBody {
    /// Human-readable confirmation.
    pub message: &'static str,

    /// ID of the created document.
    pub id: String,
}
