// Library crate for the server notices service
// This file exposes the public API for integration tests

pub mod config;
pub mod event;
pub mod membership;
pub mod notices;
pub mod room;
pub mod shared;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

// Re-export commonly used types for easier access in tests
pub use config::{AppConfig, ServerNoticesConfig};
pub use event::{CreatedEvent, EventCreator, EventDraft};
pub use membership::{Membership, MembershipRecord, MembershipStore};
pub use notices::{NoticeDispatcher, NoticeEvent, NoticeRoomResolver};
pub use room::{JoinProfile, RoomCreationConfig, RoomCreator};
pub use shared::{AppError, AppState, Requester, RoomId, UserId};

/// Builds the admin HTTP router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/admin/v1/send_server_notice",
            post(notices::send_server_notice),
        )
        .route(
            "/admin/v1/server_notices/rooms/:user_id",
            get(notices::get_notice_room),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
