//! Room lifecycle and player membership

pub mod manager;
pub mod registry;

pub use manager::{RoomError, RoomManager};
pub use registry::RoomRegistry;
