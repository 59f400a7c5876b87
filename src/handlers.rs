use crate::completions::is_completed;
use crate::dates::today;
use crate::errors::AppError;
use crate::models::{
    CreateHabitRequest, DeleteQuery, HabitId, HabitView, StatsResponse, ToggleResponse,
};
use crate::state::AppState;
use crate::stats::{build_stats, compute_streak};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

pub async fn health() -> &'static str {
    "ok"
}

pub async fn list_habits(State(state): State<AppState>) -> Json<Vec<HabitView>> {
    let date = today();
    let data = state.data.lock().await;
    let views = data
        .habits
        .iter()
        .map(|habit| HabitView {
            completed_today: is_completed(&data.completions, &habit.id, date),
            current_streak: compute_streak(&habit.id, &data.completions, date),
            habit: habit.clone(),
        })
        .collect();
    Json(views)
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(payload): Json<CreateHabitRequest>,
) -> Result<Response, AppError> {
    match state.create_habit(&payload.name).await? {
        Some(habit) => Ok((StatusCode::CREATED, Json(habit)).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, AppError> {
    if !query.confirm {
        return Err(AppError::bad_request(
            "deleting a habit is permanent; repeat with confirm=true",
        ));
    }

    let id = HabitId(id);
    if state.delete_habit(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("habit {id} not found")))
    }
}

pub async fn toggle_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ToggleResponse>, AppError> {
    Ok(Json(state.toggle_today(&HabitId(id)).await?))
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let data = state.data.lock().await;
    Json(build_stats(&data))
}
