use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/checkin", post(handlers::check_in_form))
        .route("/reset", post(handlers::reset_form))
        .route("/theme", post(handlers::theme_form))
        .route("/api/streak", get(handlers::get_streak))
        .route("/api/checkin", post(handlers::check_in))
        .route("/api/reset", post(handlers::reset))
        .route("/api/name", post(handlers::save_name))
        .route("/api/theme/toggle", post(handlers::toggle_theme))
        .route("/api/reminders/enable", post(handlers::enable_reminders))
        .route("/api/reminders/time", post(handlers::save_reminder_time))
        .with_state(state)
}
