use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::RoomId;

/// Request payload for sending a server notice
#[derive(Debug, Deserialize)]
pub struct SendNoticeRequest {
    pub user_id: String,
    pub content: Value,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub state_key: Option<String>,
}

/// Response for a sent server notice
#[derive(Debug, Serialize, Deserialize)]
pub struct SendNoticeResponse {
    pub event_id: String,
    pub room_id: RoomId,
}

/// Response for a notice room lookup
#[derive(Debug, Serialize, Deserialize)]
pub struct NoticeRoomResponse {
    pub room_id: RoomId,
}
