use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::{
    dispatcher::NoticeEvent,
    types::{NoticeRoomResponse, SendNoticeRequest, SendNoticeResponse},
};
use crate::event::MESSAGE_EVENT_TYPE;
use crate::shared::{AppError, AppState, UserId};

/// HTTP handler for sending a server notice
///
/// POST /admin/v1/send_server_notice
/// Returns the created event ID and the notice room it landed in
#[instrument(name = "send_server_notice", skip(state, request))]
pub async fn send_server_notice(
    State(state): State<AppState>,
    Json(request): Json<SendNoticeRequest>,
) -> Result<Json<SendNoticeResponse>, AppError> {
    if !state.dispatcher.is_enabled() {
        return Err(AppError::NotEnabled);
    }
    if request.user_id.trim().is_empty() {
        return Err(AppError::BadRequest("user_id must not be empty".to_string()));
    }
    info!(user_id = %request.user_id, "Sending server notice via admin API");

    let notice = NoticeEvent {
        event_type: request
            .event_type
            .unwrap_or_else(|| MESSAGE_EVENT_TYPE.to_string()),
        content: request.content,
        state_key: request.state_key,
    };
    let event = state
        .dispatcher
        .send_event(&UserId::new(request.user_id), notice)
        .await?;

    info!(event_id = %event.event_id, room_id = %event.room_id, "Server notice sent");

    Ok(Json(SendNoticeResponse {
        event_id: event.event_id,
        room_id: event.room_id,
    }))
}

/// HTTP handler for looking up a user's notice room without creating it
///
/// GET /admin/v1/server_notices/rooms/:user_id
#[instrument(name = "get_notice_room", skip(state))]
pub async fn get_notice_room(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<NoticeRoomResponse>, AppError> {
    let user_id = UserId::new(user_id);
    let room_id = state
        .dispatcher
        .resolver()
        .find_existing(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No notice room for {}", user_id)))?;

    Ok(Json(NoticeRoomResponse { room_id }))
}
