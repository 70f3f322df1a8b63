use crate::clock::{CalendarDay, format_day};
use crate::errors::AppError;
use crate::milestone::celebration_label;
use crate::models::{
    CheckInResponse, CheckInResult, NameRequest, NotificationResponse, ReminderTimeRequest,
    StatusResponse, StreakState, StreakView,
};
use crate::notify::{NotifyError, permission_message};
use crate::preferences;
use crate::state::AppState;
use crate::storage::persist_store;
use crate::store::MemoryStore;
use crate::ui::render_index;
use axum::{
    Json,
    extract::State,
    response::{Html, Redirect},
};
use tracing::{info, warn};

const RESET_MESSAGE: &str = "Reset done.";

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let store = state.store.lock().await;
    let view = build_view(&store, state.clock.today());
    Html(render_index(&view))
}

pub async fn get_streak(State(state): State<AppState>) -> Json<StreakView> {
    let store = state.store.lock().await;
    Json(build_view(&store, state.clock.today()))
}

pub async fn check_in(State(state): State<AppState>) -> Result<Json<CheckInResponse>, AppError> {
    let (result, view) = apply_check_in(&state).await?;
    Ok(Json(CheckInResponse {
        outcome: result.outcome,
        count: result.count,
        milestone_reached: result.milestone_reached,
        celebration: result.milestone_reached.map(celebration_label),
        message: result.outcome.status_message().to_string(),
        view,
    }))
}

pub async fn check_in_form(State(state): State<AppState>) -> Result<Redirect, AppError> {
    apply_check_in(&state).await?;
    Ok(Redirect::to("/"))
}

pub async fn reset(State(state): State<AppState>) -> Result<Json<StatusResponse>, AppError> {
    let view = apply_reset(&state).await?;
    Ok(Json(StatusResponse {
        message: RESET_MESSAGE.to_string(),
        view,
    }))
}

pub async fn reset_form(State(state): State<AppState>) -> Result<Redirect, AppError> {
    apply_reset(&state).await?;
    Ok(Redirect::to("/"))
}

pub async fn save_name(
    State(state): State<AppState>,
    Json(payload): Json<NameRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    let mut store = state.store.lock().await;
    let snapshot = store.clone();
    let name = preferences::save_name(&mut *store, &payload.name)?;
    commit(&state, &mut store, snapshot).await?;
    info!(%name, "name saved");

    Ok(Json(StatusResponse {
        message: "Name saved ✅".to_string(),
        view: build_view(&store, state.clock.today()),
    }))
}

pub async fn toggle_theme(State(state): State<AppState>) -> Result<Json<StatusResponse>, AppError> {
    let view = apply_theme_toggle(&state).await?;
    Ok(Json(StatusResponse {
        message: String::new(),
        view,
    }))
}

pub async fn theme_form(State(state): State<AppState>) -> Result<Redirect, AppError> {
    apply_theme_toggle(&state).await?;
    Ok(Redirect::to("/"))
}

pub async fn enable_reminders(
    State(state): State<AppState>,
) -> Result<Json<NotificationResponse>, AppError> {
    match state.notifier.enable().await {
        Ok(permission) => Ok(Json(NotificationResponse {
            ok: true,
            message: permission_message(permission).to_string(),
        })),
        Err(NotifyError::Unavailable) => Ok(Json(unavailable_response(None))),
        Err(err) => Err(err.into()),
    }
}

pub async fn save_reminder_time(
    State(state): State<AppState>,
    Json(payload): Json<ReminderTimeRequest>,
) -> Result<Json<NotificationResponse>, AppError> {
    // The device copy is written first so the choice survives even when the
    // collaborator is missing.
    let time = {
        let mut store = state.store.lock().await;
        let snapshot = store.clone();
        let time = preferences::save_reminder_time(&mut *store, &payload.time)?;
        commit(&state, &mut store, snapshot).await?;
        time
    };

    match state.notifier.forward_reminder_time(time).await {
        Ok(()) => Ok(Json(NotificationResponse {
            ok: true,
            message: format!("Reminder time saved: {time} ✅"),
        })),
        Err(NotifyError::Unavailable) => {
            warn!(%time, "reminder time kept locally, notifier unavailable");
            Ok(Json(unavailable_response(Some("Saved on this device."))))
        }
        Err(err) => Err(err.into()),
    }
}

async fn apply_check_in(state: &AppState) -> Result<(CheckInResult, StreakView), AppError> {
    let mut store = state.store.lock().await;
    let snapshot = store.clone();
    let result = state.engine(&mut store).check_in();
    commit(state, &mut store, snapshot).await?;

    Ok((result, build_view(&store, state.clock.today())))
}

async fn apply_reset(state: &AppState) -> Result<StreakView, AppError> {
    let mut store = state.store.lock().await;
    let snapshot = store.clone();
    state.engine(&mut store).reset();
    commit(state, &mut store, snapshot).await?;

    Ok(build_view(&store, state.clock.today()))
}

async fn apply_theme_toggle(state: &AppState) -> Result<StreakView, AppError> {
    let mut store = state.store.lock().await;
    let snapshot = store.clone();
    let theme = preferences::toggle_theme(&mut *store);
    commit(state, &mut store, snapshot).await?;
    info!(%theme, "theme changed");

    Ok(build_view(&store, state.clock.today()))
}

/// Writes the store to disk. On failure the in-memory copy is rolled back to
/// `snapshot` so it never runs ahead of the file.
async fn commit(
    state: &AppState,
    store: &mut MemoryStore,
    snapshot: MemoryStore,
) -> Result<(), AppError> {
    if let Err(err) = persist_store(&state.data_path, store).await {
        warn!("failed to persist store, rolling back: {}", err.message);
        *store = snapshot;
        return Err(err);
    }
    Ok(())
}

fn unavailable_response(prefix: Option<&str>) -> NotificationResponse {
    let reason = NotifyError::Unavailable.to_string();
    NotificationResponse {
        ok: false,
        message: match prefix {
            Some(prefix) => format!("{prefix} {reason}"),
            None => reason,
        },
    }
}

pub fn build_view(store: &MemoryStore, today: CalendarDay) -> StreakView {
    let streak = StreakState::load(store);
    let theme = preferences::theme(store);
    let checked_in_today = streak.last_check_in == Some(today);

    StreakView {
        name: preferences::name(store),
        theme: theme.to_string(),
        theme_icon: theme.toggle_icon().to_string(),
        count: streak.count,
        last_check_in: streak.last_check_in.map(|day| day.to_string()),
        last_checked_label: format!("Last checked: {}", format_day(streak.last_check_in)),
        checked_in_today,
        check_in_label: if checked_in_today {
            "Checked in ✅".to_string()
        } else {
            "Check in today".to_string()
        },
        remind_time: preferences::reminder_time(store).map(|time| time.to_string()),
        highest_milestone_acknowledged: streak.highest_milestone_acknowledged,
    }
}
