use serde::{Deserialize, Serialize};

use crate::shared::UserId;

/// Preset applied when a room is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomPreset {
    PrivateChat,
    PublicChat,
    TrustedPrivateChat,
}

/// Fields overriding the default power-level content of a new room
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerLevelOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users_default: Option<i64>,
}

/// Room configuration handed to the room creator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCreationConfig {
    pub preset: RoomPreset,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub power_level_content_override: PowerLevelOverride,
    pub invite: Vec<UserId>,
}

/// Profile the creator joins the new room with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displayname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}
