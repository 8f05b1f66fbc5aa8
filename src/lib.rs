pub mod api;
pub mod board;
pub mod config;
pub mod ui;

// Re-export the working set so main.rs and integration tests stay short.
pub use api::{ApiError, HttpTaskApi, TaskApi};
pub use board::store::{Effect, TaskStore};
pub use board::{BoardState, ProgressTier, Task, ToggleOutcome};
pub use config::BoardConfig;
