pub mod app;
pub mod completions;
pub mod config;
pub mod dates;
pub mod errors;
pub mod habits;
pub mod handlers;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod suggestions;

pub use app::router;
pub use config::AppConfig;
pub use state::AppState;
pub use storage::{JsonFileStore, RecordStore};
