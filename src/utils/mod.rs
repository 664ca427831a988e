// Shared utilities

pub mod storage;
pub mod spawner;

pub use storage::{MemoryTokenStorage, TokenStorage};
pub use spawner::{LocalTask, QueuedSpawner, TaskSpawner};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalTokenStorage;
#[cfg(target_arch = "wasm32")]
pub use spawner::LocalSpawner;
