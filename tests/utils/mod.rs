pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use mocks::{MockEventCreator, MockMembershipStore, MockRoomCreator};
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder, SYSTEM_USER};
