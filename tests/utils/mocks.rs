use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

use server_notices::{
    AppError, CreatedEvent, EventCreator, EventDraft, JoinProfile, Membership, MembershipRecord,
    MembershipStore, Requester, RoomCreationConfig, RoomCreator, RoomId, UserId,
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Scripted membership store that counts every query
#[derive(Default)]
pub struct MockMembershipStore {
    rooms_by_user: RwLock<HashMap<UserId, Vec<MembershipRecord>>>,
    joined_by_room: RwLock<HashMap<RoomId, HashSet<UserId>>>,
    failure: RwLock<Option<AppError>>,
    room_queries: AtomicUsize,
    member_queries: AtomicUsize,
}

impl MockMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives `user` the membership in `room` and optionally joins `joined` users to it
    pub async fn add_room(&self, user: &str, room: &str, membership: Membership, joined: &[&str]) {
        self.rooms_by_user
            .write()
            .await
            .entry(UserId::from(user))
            .or_default()
            .push(MembershipRecord {
                room_id: RoomId::from(room),
                membership,
            });
        self.joined_by_room
            .write()
            .await
            .entry(RoomId::from(room))
            .or_default()
            .extend(joined.iter().map(|u| UserId::from(*u)));
    }

    pub async fn fail_with(&self, error: AppError) {
        *self.failure.write().await = Some(error);
    }

    pub fn room_queries(&self) -> usize {
        self.room_queries.load(Ordering::SeqCst)
    }

    pub fn member_queries(&self) -> usize {
        self.member_queries.load(Ordering::SeqCst)
    }

    pub fn total_queries(&self) -> usize {
        self.room_queries() + self.member_queries()
    }
}

#[async_trait]
impl MembershipStore for MockMembershipStore {
    async fn rooms_for_user_with_membership(
        &self,
        user_id: &UserId,
        states: &[Membership],
    ) -> Result<Vec<MembershipRecord>, AppError> {
        self.room_queries.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.failure.read().await.clone() {
            return Err(error);
        }

        Ok(self
            .rooms_by_user
            .read()
            .await
            .get(user_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| states.contains(&record.membership))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn users_in_room(&self, room_id: &RoomId) -> Result<HashSet<UserId>, AppError> {
        self.member_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .joined_by_room
            .read()
            .await
            .get(room_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// One recorded `create_room` call
#[derive(Debug, Clone)]
pub struct RoomCreationCall {
    pub requester: Requester,
    pub config: RoomCreationConfig,
    pub ratelimit: bool,
    pub creator_join_profile: JoinProfile,
}

/// Room creator that records calls, hands out queued IDs and can fail or stall
#[derive(Default)]
pub struct MockRoomCreator {
    calls: RwLock<Vec<RoomCreationCall>>,
    room_ids: RwLock<VecDeque<String>>,
    failures_remaining: AtomicUsize,
    delay: RwLock<Option<Duration>>,
}

impl MockRoomCreator {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_room_ids(self, ids: &[&str]) -> Self {
        self.room_ids
            .write()
            .await
            .extend(ids.iter().map(|id| id.to_string()));
        self
    }

    pub async fn with_delay(self, delay: Duration) -> Self {
        *self.delay.write().await = Some(delay);
        self
    }

    /// Makes the next `count` calls fail
    pub fn fail_next(&self, count: usize) {
        self.failures_remaining.store(count, Ordering::SeqCst);
    }

    pub async fn calls(&self) -> Vec<RoomCreationCall> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl RoomCreator for MockRoomCreator {
    async fn create_room(
        &self,
        requester: &Requester,
        config: RoomCreationConfig,
        ratelimit: bool,
        creator_join_profile: JoinProfile,
    ) -> Result<RoomId, AppError> {
        let call_index = {
            let mut calls = self.calls.write().await;
            calls.push(RoomCreationCall {
                requester: requester.clone(),
                config,
                ratelimit,
                creator_join_profile,
            });
            calls.len()
        };

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let should_fail = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(AppError::RoomCreation("room creation rejected".to_string()));
        }

        let room_id = self
            .room_ids
            .write()
            .await
            .pop_front()
            .unwrap_or_else(|| format!("!room-{}", call_index));
        Ok(RoomId::new(room_id))
    }
}

/// One recorded `create_and_send_event` call
#[derive(Debug, Clone)]
pub struct EventCreationCall {
    pub requester: Requester,
    pub draft: EventDraft,
    pub ratelimit: bool,
}

/// Event creator that records every draft it receives
#[derive(Default)]
pub struct MockEventCreator {
    calls: RwLock<Vec<EventCreationCall>>,
    failure: RwLock<Option<AppError>>,
}

impl MockEventCreator {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail_with(&self, error: AppError) {
        *self.failure.write().await = Some(error);
    }

    pub async fn calls(&self) -> Vec<EventCreationCall> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl EventCreator for MockEventCreator {
    async fn create_and_send_event(
        &self,
        requester: &Requester,
        draft: EventDraft,
        ratelimit: bool,
    ) -> Result<CreatedEvent, AppError> {
        if let Some(error) = self.failure.read().await.clone() {
            return Err(error);
        }

        let mut calls = self.calls.write().await;
        calls.push(EventCreationCall {
            requester: requester.clone(),
            draft: draft.clone(),
            ratelimit,
        });

        Ok(CreatedEvent {
            event_id: format!("$event-{}", calls.len()),
            room_id: draft.room_id,
            sender: draft.sender,
            event_type: draft.event_type,
            content: draft.content,
            state_key: draft.state_key,
            origin_server_ts: 0,
        })
    }
}
