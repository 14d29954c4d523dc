use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::types::{JoinProfile, RoomCreationConfig};
use crate::membership::{InMemoryMembershipStore, Membership};
use crate::shared::{AppError, Requester, RoomId, UserId};

/// Creates rooms on behalf of a requester
#[async_trait]
pub trait RoomCreator: Send + Sync {
    async fn create_room(
        &self,
        requester: &Requester,
        config: RoomCreationConfig,
        ratelimit: bool,
        creator_join_profile: JoinProfile,
    ) -> Result<RoomId, AppError>;
}

/// A room created by [`InMemoryRoomCreator`] along with the inputs it was created from
#[derive(Debug, Clone)]
pub struct CreatedRoom {
    pub room_id: RoomId,
    pub creator: UserId,
    pub config: RoomCreationConfig,
    pub ratelimit: bool,
    pub creator_join_profile: JoinProfile,
}

/// In-memory room creator that records memberships in an [`InMemoryMembershipStore`]
///
/// The creator joins the room and every invitee is invited.
pub struct InMemoryRoomCreator {
    membership_store: Arc<InMemoryMembershipStore>,
    created: RwLock<Vec<CreatedRoom>>,
}

impl InMemoryRoomCreator {
    pub fn new(membership_store: Arc<InMemoryMembershipStore>) -> Self {
        Self {
            membership_store,
            created: RwLock::new(Vec::new()),
        }
    }

    /// Every room created so far, oldest first
    pub async fn created_rooms(&self) -> Vec<CreatedRoom> {
        self.created.read().await.clone()
    }

    fn generate_room_id() -> RoomId {
        RoomId::new(format!("!{}", Uuid::new_v4().simple()))
    }
}

#[async_trait]
impl RoomCreator for InMemoryRoomCreator {
    #[instrument(skip(self, config, creator_join_profile))]
    async fn create_room(
        &self,
        requester: &Requester,
        config: RoomCreationConfig,
        ratelimit: bool,
        creator_join_profile: JoinProfile,
    ) -> Result<RoomId, AppError> {
        if config.name.trim().is_empty() {
            return Err(AppError::RoomCreation("Room name must not be empty".to_string()));
        }

        let room_id = Self::generate_room_id();
        debug!(room_id = %room_id, "Generated room ID");

        self.membership_store
            .set_membership(&room_id, &requester.user_id, Membership::Join)
            .await;
        for invitee in &config.invite {
            self.membership_store
                .set_membership(&room_id, invitee, Membership::Invite)
                .await;
        }

        info!(
            room_id = %room_id,
            creator = %requester.user_id,
            invite_count = config.invite.len(),
            "Room created in memory"
        );

        self.created.write().await.push(CreatedRoom {
            room_id: room_id.clone(),
            creator: requester.user_id.clone(),
            config,
            ratelimit,
            creator_join_profile,
        });

        Ok(room_id)
    }
}
