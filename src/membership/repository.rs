use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::models::{Membership, MembershipRecord};
use crate::shared::{AppError, RoomId, UserId};

/// Read access to room membership
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Rooms where the user currently holds one of `states`, in storage order
    async fn rooms_for_user_with_membership(
        &self,
        user_id: &UserId,
        states: &[Membership],
    ) -> Result<Vec<MembershipRecord>, AppError>;

    /// Users currently joined to the room
    async fn users_in_room(&self, room_id: &RoomId) -> Result<HashSet<UserId>, AppError>;
}

struct RoomMembers {
    room_id: RoomId,
    members: HashMap<UserId, Membership>,
}

/// In-memory implementation of MembershipStore for development and testing
///
/// Rooms are kept in the order they were first seen, which is the order
/// `rooms_for_user_with_membership` reports them in.
pub struct InMemoryMembershipStore {
    rooms: RwLock<Vec<RoomMembers>>,
}

impl Default for InMemoryMembershipStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(Vec::new()),
        }
    }

    /// Records `user_id`'s membership in `room_id`, creating the room entry if needed
    #[instrument(skip(self))]
    pub async fn set_membership(&self, room_id: &RoomId, user_id: &UserId, membership: Membership) {
        let mut rooms = self.rooms.write().await;

        match rooms.iter_mut().find(|room| &room.room_id == room_id) {
            Some(room) => {
                room.members.insert(user_id.clone(), membership);
            }
            None => {
                debug!(room_id = %room_id, "Tracking new room");
                rooms.push(RoomMembers {
                    room_id: room_id.clone(),
                    members: HashMap::from([(user_id.clone(), membership)]),
                });
            }
        }
    }

    pub async fn membership_of(&self, room_id: &RoomId, user_id: &UserId) -> Option<Membership> {
        let rooms = self.rooms.read().await;
        rooms
            .iter()
            .find(|room| &room.room_id == room_id)
            .and_then(|room| room.members.get(user_id).copied())
    }
}

#[async_trait]
impl MembershipStore for InMemoryMembershipStore {
    #[instrument(skip(self))]
    async fn rooms_for_user_with_membership(
        &self,
        user_id: &UserId,
        states: &[Membership],
    ) -> Result<Vec<MembershipRecord>, AppError> {
        let rooms = self.rooms.read().await;

        let records: Vec<MembershipRecord> = rooms
            .iter()
            .filter_map(|room| {
                room.members
                    .get(user_id)
                    .filter(|membership| states.contains(*membership))
                    .map(|membership| MembershipRecord {
                        room_id: room.room_id.clone(),
                        membership: *membership,
                    })
            })
            .collect();

        debug!(user_id = %user_id, room_count = records.len(), "Rooms for user fetched");
        Ok(records)
    }

    #[instrument(skip(self))]
    async fn users_in_room(&self, room_id: &RoomId) -> Result<HashSet<UserId>, AppError> {
        let rooms = self.rooms.read().await;

        let users = rooms
            .iter()
            .find(|room| &room.room_id == room_id)
            .map(|room| {
                room.members
                    .iter()
                    .filter(|(_, membership)| **membership == Membership::Join)
                    .map(|(user_id, _)| user_id.clone())
                    .collect()
            })
            .unwrap_or_default();

        Ok(users)
    }
}
