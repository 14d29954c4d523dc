use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::{RoomId, UserId};

/// Event type of a plain room message
pub const MESSAGE_EVENT_TYPE: &str = "m.room.message";

/// An event to be created and sent. Built per send, never stored by the notices core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    #[serde(rename = "type")]
    pub event_type: String,
    pub room_id: RoomId,
    pub sender: UserId,
    pub content: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_key: Option<String>,
}

impl EventDraft {
    /// A `m.room.message` draft
    pub fn message(room_id: RoomId, sender: UserId, content: Value) -> Self {
        Self {
            event_type: MESSAGE_EVENT_TYPE.to_string(),
            room_id,
            sender,
            content,
            state_key: None,
        }
    }
}

/// Event as persisted by the event creator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedEvent {
    pub event_id: String,
    pub room_id: RoomId,
    pub sender: UserId,
    #[serde(rename = "type")]
    pub event_type: String,
    pub content: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_key: Option<String>,
    pub origin_server_ts: i64,
}
