use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::cache::SingleFlightCache;
use crate::{
    config::ServerNoticesConfig,
    membership::{Membership, MembershipStore},
    room::{JoinProfile, PowerLevelOverride, RoomCreationConfig, RoomCreator, RoomPreset},
    shared::{AppError, Requester, RoomId, UserId},
};

/// Power level given to everyone without an explicit level in a notice room
pub const NOTICE_ROOM_USERS_DEFAULT: i64 = -10;

const NOTICE_ROOM_MEMBERSHIPS: [Membership; 2] = [Membership::Invite, Membership::Join];

/// Collaborators needed to find or create a notice room.
///
/// Cloned into each cache fill so the computation owns everything it touches.
#[derive(Clone)]
struct RoomLookup {
    config: Arc<ServerNoticesConfig>,
    membership_store: Arc<dyn MembershipStore>,
    room_creator: Arc<dyn RoomCreator>,
}

impl RoomLookup {
    /// First room the user is invited to or joined that the system account has joined
    async fn find_shared_room(
        &self,
        system_user_id: &UserId,
        user_id: &UserId,
    ) -> Result<Option<RoomId>, AppError> {
        let rooms = self
            .membership_store
            .rooms_for_user_with_membership(user_id, &NOTICE_ROOM_MEMBERSHIPS)
            .await?;
        debug!(user_id = %user_id, candidate_count = rooms.len(), "Searching for existing notice room");

        for room in rooms {
            let members = self.membership_store.users_in_room(&room.room_id).await?;
            if members.contains(system_user_id) {
                info!(room_id = %room.room_id, user_id = %user_id, "Using existing notice room");
                return Ok(Some(room.room_id));
            }
        }

        Ok(None)
    }

    async fn create_notice_room(
        &self,
        system_user_id: &UserId,
        user_id: &UserId,
    ) -> Result<RoomId, AppError> {
        info!(user_id = %user_id, "Creating server notices room");

        let room_config = RoomCreationConfig {
            preset: RoomPreset::PrivateChat,
            name: self.config.room_name.clone(),
            topic: self.config.room_topic.clone(),
            power_level_content_override: PowerLevelOverride {
                users_default: Some(NOTICE_ROOM_USERS_DEFAULT),
            },
            invite: vec![user_id.clone()],
        };
        let join_profile = JoinProfile {
            displayname: self.config.display_name.clone(),
            avatar_url: self.config.avatar_url.clone(),
        };

        let room_id = self
            .room_creator
            .create_room(
                &Requester::for_user(system_user_id.clone()),
                room_config,
                false,
                join_profile,
            )
            .await?;

        info!(room_id = %room_id, user_id = %user_id, "Created server notices room");
        Ok(room_id)
    }

    /// Search completes before creation is attempted
    async fn find_or_create(self, system_user_id: UserId, user_id: UserId) -> Result<RoomId, AppError> {
        if let Some(room_id) = self.find_shared_room(&system_user_id, &user_id).await? {
            return Ok(room_id);
        }
        self.create_notice_room(&system_user_id, &user_id).await
    }
}

/// Resolves, creating when absent, the private room used to deliver
/// server notices to a user.
///
/// Resolutions are memoized per user for the lifetime of the resolver and
/// concurrent first-time resolutions for one user share a single lookup.
/// Cached rooms are never re-verified: if either party later leaves, the
/// stale room id keeps being returned.
pub struct NoticeRoomResolver {
    lookup: RoomLookup,
    cache: SingleFlightCache<UserId, RoomId>,
}

impl NoticeRoomResolver {
    pub fn new(
        config: Arc<ServerNoticesConfig>,
        membership_store: Arc<dyn MembershipStore>,
        room_creator: Arc<dyn RoomCreator>,
    ) -> Self {
        Self {
            lookup: RoomLookup {
                config,
                membership_store,
                room_creator,
            },
            cache: SingleFlightCache::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.lookup.config.is_enabled()
    }

    fn system_user_id(&self) -> Result<&UserId, AppError> {
        self.lookup
            .config
            .system_user_id
            .as_ref()
            .ok_or(AppError::NotEnabled)
    }

    /// Returns the notice room for `user_id`, creating one if none exists
    #[instrument(skip(self))]
    pub async fn resolve(&self, user_id: &UserId) -> Result<RoomId, AppError> {
        let system_user_id = self.system_user_id()?.clone();

        let lookup = self.lookup.clone();
        let target = user_id.clone();
        self.cache
            .get_or_try_init(user_id.clone(), move || {
                lookup.find_or_create(system_user_id, target)
            })
            .await
    }

    /// Returns the notice room for `user_id` if one exists, never creating one.
    ///
    /// A room found by searching is not cached; only [`Self::resolve`] fills the cache.
    #[instrument(skip(self))]
    pub async fn find_existing(&self, user_id: &UserId) -> Result<Option<RoomId>, AppError> {
        let system_user_id = self.system_user_id()?;

        if let Some(room_id) = self.cache.get(user_id).await {
            debug!(room_id = %room_id, "Notice room found in cache");
            return Ok(Some(room_id));
        }

        self.lookup.find_shared_room(system_user_id, user_id).await
    }
}
