use std::sync::Arc;

use server_notices::{NoticeDispatcher, NoticeRoomResolver, ServerNoticesConfig};

use super::mocks::{MockEventCreator, MockMembershipStore, MockRoomCreator};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const SYSTEM_USER: &str = "@notices:example.org";

pub struct TestSetup {
    pub store: Arc<MockMembershipStore>,
    pub room_creator: Arc<MockRoomCreator>,
    pub event_creator: Arc<MockEventCreator>,
    pub resolver: Arc<NoticeRoomResolver>,
    pub dispatcher: NoticeDispatcher,
}

pub struct TestSetupBuilder {
    config: ServerNoticesConfig,
    store: MockMembershipStore,
    room_creator: MockRoomCreator,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        let mut config = ServerNoticesConfig::enabled(SYSTEM_USER);
        config.display_name = Some("Server Notices Bot".to_string());

        Self {
            config,
            store: MockMembershipStore::new(),
            room_creator: MockRoomCreator::new(),
        }
    }

    pub fn disabled(mut self) -> Self {
        self.config.system_user_id = None;
        self
    }

    pub fn with_store(mut self, store: MockMembershipStore) -> Self {
        self.store = store;
        self
    }

    pub fn with_room_creator(mut self, room_creator: MockRoomCreator) -> Self {
        self.room_creator = room_creator;
        self
    }

    pub fn build(self) -> TestSetup {
        let config = Arc::new(self.config);
        let store = Arc::new(self.store);
        let room_creator = Arc::new(self.room_creator);
        let event_creator = Arc::new(MockEventCreator::new());

        let resolver = Arc::new(NoticeRoomResolver::new(
            config.clone(),
            store.clone(),
            room_creator.clone(),
        ));
        let dispatcher = NoticeDispatcher::new(config, resolver.clone(), event_creator.clone());

        TestSetup {
            store,
            room_creator,
            event_creator,
            resolver,
            dispatcher,
        }
    }
}
