use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::events::{CreatedEvent, EventDraft};
use crate::membership::{InMemoryMembershipStore, Membership};
use crate::shared::{AppError, Requester, RoomId};

/// Creates events and distributes them to a room
#[async_trait]
pub trait EventCreator: Send + Sync {
    async fn create_and_send_event(
        &self,
        requester: &Requester,
        draft: EventDraft,
        ratelimit: bool,
    ) -> Result<CreatedEvent, AppError>;
}

/// In-memory event creator keeping a per-room timeline
pub struct InMemoryEventCreator {
    membership_store: Arc<InMemoryMembershipStore>,
    timelines: RwLock<HashMap<RoomId, Vec<CreatedEvent>>>,
}

impl InMemoryEventCreator {
    pub fn new(membership_store: Arc<InMemoryMembershipStore>) -> Self {
        Self {
            membership_store,
            timelines: RwLock::new(HashMap::new()),
        }
    }

    /// Events sent to `room_id`, oldest first
    pub async fn events_in_room(&self, room_id: &RoomId) -> Vec<CreatedEvent> {
        self.timelines
            .read()
            .await
            .get(room_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl EventCreator for InMemoryEventCreator {
    #[instrument(skip(self, draft), fields(room_id = %draft.room_id, event_type = %draft.event_type))]
    async fn create_and_send_event(
        &self,
        requester: &Requester,
        draft: EventDraft,
        ratelimit: bool,
    ) -> Result<CreatedEvent, AppError> {
        if draft.sender != requester.user_id {
            warn!(sender = %draft.sender, requester = %requester.user_id, "Sender does not match requester");
            return Err(AppError::EventCreation(
                "Event sender must match the requester".to_string(),
            ));
        }

        let membership = self
            .membership_store
            .membership_of(&draft.room_id, &draft.sender)
            .await;
        if membership != Some(Membership::Join) {
            warn!(sender = %draft.sender, "Sender is not joined to the room");
            return Err(AppError::EventCreation(format!(
                "{} is not in room {}",
                draft.sender, draft.room_id
            )));
        }

        let event = CreatedEvent {
            event_id: format!("${}", Uuid::new_v4().simple()),
            room_id: draft.room_id,
            sender: draft.sender,
            event_type: draft.event_type,
            content: draft.content,
            state_key: draft.state_key,
            origin_server_ts: Utc::now().timestamp_millis(),
        };
        debug!(event_id = %event.event_id, ratelimit, "Event created");

        self.timelines
            .write()
            .await
            .entry(event.room_id.clone())
            .or_default()
            .push(event.clone());

        info!(event_id = %event.event_id, "Event sent to room");
        Ok(event)
    }
}
