//! Clipdrop Storage Library
//!
//! In-memory, token-addressed storage for processed videos. Every payload is
//! reachable through an unguessable token, handed out at most once, and evicted
//! by a background sweep once it outlives the configured TTL.

pub mod ephemeral;
pub mod evictor;
pub mod token;

// Re-export commonly used types
pub use ephemeral::{EphemeralStore, StoreConfig, TakenEntry};
pub use token::{generate_token, token_prefix};
