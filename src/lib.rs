//! Line-detection and reading-position engine for paged documents

pub mod cursor;
pub mod debounce;
pub mod gesture;
pub mod geometry;
pub mod hitbox;
pub mod lines;
pub mod progress;
pub mod render;
pub mod session;
pub mod settings;
pub mod store;
pub mod zoom;

pub mod test_utils;

// Re-export the session surface most hosts drive
pub use session::{Command, Effect, ReaderSession};
