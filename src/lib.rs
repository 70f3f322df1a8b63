pub mod app;
pub mod clock;
pub mod config;
pub mod engine;
pub mod errors;
pub mod handlers;
pub mod milestone;
pub mod models;
pub mod notify;
pub mod preferences;
pub mod state;
pub mod storage;
pub mod store;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use engine::StreakEngine;
pub use state::AppState;
pub use storage::{load_store, persist_store};
