// Public API - what other modules can use
pub use cache::SingleFlightCache;
pub use dispatcher::{NoticeDispatcher, NoticeEvent};
pub use handlers::{get_notice_room, send_server_notice};
pub use resolver::{NoticeRoomResolver, NOTICE_ROOM_USERS_DEFAULT};

// Internal modules
mod cache;
mod dispatcher;
mod handlers;
mod resolver;
pub mod types;
