// Public API - what other modules can use
pub use models::{Membership, MembershipRecord};
pub use repository::{InMemoryMembershipStore, MembershipStore};

pub mod models;
pub mod repository;
