//! OPR Store - Persistence ports and adapters
//!
//! This crate defines the key-value persistence port, provides in-memory and
//! file-backed adapters, and a typed facade over the persisted editor state.

pub mod file;
pub mod memory;
pub mod ports;
pub mod state;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use ports::KeyValueStore;
pub use state::StateStore;
