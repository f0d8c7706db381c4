//! Shared types for the clinic workspace.

pub mod types;

pub use types::EntityId;
