// Public API - what other modules can use
pub use creator::{CreatedRoom, InMemoryRoomCreator, RoomCreator};
pub use types::{JoinProfile, PowerLevelOverride, RoomCreationConfig, RoomPreset};

pub mod creator;
pub mod types;
