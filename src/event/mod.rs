// Public API - what other modules can use
pub use creator::{EventCreator, InMemoryEventCreator};
pub use events::{CreatedEvent, EventDraft, MESSAGE_EVENT_TYPE};

pub mod creator;
pub mod events;
