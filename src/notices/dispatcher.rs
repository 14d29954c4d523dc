use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

use super::resolver::NoticeRoomResolver;
use crate::{
    config::ServerNoticesConfig,
    event::{CreatedEvent, EventCreator, EventDraft, MESSAGE_EVENT_TYPE},
    shared::{AppError, Requester, UserId},
};

/// A notice to deliver: event type, content and optional state key
#[derive(Debug, Clone, PartialEq)]
pub struct NoticeEvent {
    pub event_type: String,
    pub content: Value,
    pub state_key: Option<String>,
}

impl NoticeEvent {
    pub fn message(content: Value) -> Self {
        Self {
            event_type: MESSAGE_EVENT_TYPE.to_string(),
            content,
            state_key: None,
        }
    }
}

/// Sends server notices into each user's notice room as the system account
pub struct NoticeDispatcher {
    config: Arc<ServerNoticesConfig>,
    resolver: Arc<NoticeRoomResolver>,
    event_creator: Arc<dyn EventCreator>,
}

impl NoticeDispatcher {
    pub fn new(
        config: Arc<ServerNoticesConfig>,
        resolver: Arc<NoticeRoomResolver>,
        event_creator: Arc<dyn EventCreator>,
    ) -> Self {
        Self {
            config,
            resolver,
            event_creator,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    pub fn resolver(&self) -> &Arc<NoticeRoomResolver> {
        &self.resolver
    }

    /// Sends a `m.room.message` notice with the given content to `user_id`
    pub async fn send(&self, user_id: &UserId, content: Value) -> Result<CreatedEvent, AppError> {
        self.send_event(user_id, NoticeEvent::message(content)).await
    }

    /// Sends an arbitrary notice event to `user_id`, rate limiting disabled
    #[instrument(skip(self, notice), fields(event_type = %notice.event_type))]
    pub async fn send_event(
        &self,
        user_id: &UserId,
        notice: NoticeEvent,
    ) -> Result<CreatedEvent, AppError> {
        let system_user_id = self
            .config
            .system_user_id
            .clone()
            .ok_or(AppError::NotEnabled)?;

        let room_id = self.resolver.resolve(user_id).await?;

        info!(user_id = %user_id, room_id = %room_id, "Sending server notice");

        let draft = EventDraft {
            event_type: notice.event_type,
            room_id,
            sender: system_user_id.clone(),
            content: notice.content,
            state_key: notice.state_key,
        };

        self.event_creator
            .create_and_send_event(&Requester::for_user(system_user_id), draft, false)
            .await
    }
}
