use crate::completions::{is_completed, prune_orphans, toggle_completion};
use crate::dates::{date_key, today};
use crate::errors::AppError;
use crate::habits::{create_habit, delete_habit};
use crate::models::{AppData, Habit, HabitId, ToggleResponse};
use crate::stats::compute_streak;
use crate::storage::RecordStore;
use crate::suggestions::{StaticSuggestions, SuggestionLookup};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Owns the single mutable copy of the collections.
///
/// Commands hold the lock across their save, so writes never interleave.
/// Memory is only replaced once the matching record has been written.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub data: Arc<Mutex<AppData>>,
    suggestions: Arc<dyn SuggestionLookup>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, data: AppData) -> Self {
        Self::with_suggestions(store, data, Arc::new(StaticSuggestions))
    }

    pub fn with_suggestions(
        store: Arc<dyn RecordStore>,
        data: AppData,
        suggestions: Arc<dyn SuggestionLookup>,
    ) -> Self {
        Self {
            store,
            data: Arc::new(Mutex::new(data)),
            suggestions,
        }
    }

    pub async fn snapshot(&self) -> AppData {
        self.data.lock().await.clone()
    }

    /// `Ok(None)` when the name is blank.
    pub async fn create_habit(&self, name: &str) -> Result<Option<Habit>, AppError> {
        let mut data = self.data.lock().await;
        let Some(habit) = create_habit(name, &data.habits, self.suggestions.as_ref(), Utc::now())
        else {
            return Ok(None);
        };

        let mut habits = data.habits.clone();
        habits.push(habit.clone());
        self.store.save_habits(&habits).await?;
        data.habits = habits;

        info!(habit_id = %habit.id, name = %habit.name, "habit created");
        Ok(Some(habit))
    }

    /// Deletes the habit and its completions. `Ok(false)` for an unknown id.
    pub async fn delete_habit(&self, id: &HabitId) -> Result<bool, AppError> {
        let mut data = self.data.lock().await;
        if !data.has_habit(id) {
            return Ok(false);
        }

        let (habits, completions) = delete_habit(id, &data.habits, &data.completions);
        let completions = prune_orphans(completions, &habits);

        self.store.save_habits(&habits).await?;
        data.habits = habits;

        // Habits are durable at this point. If the completions write fails,
        // memory keeps the old completions to match disk. The orphans are
        // ignored by stats and dropped by the next completions write.
        if let Err(err) = self.store.save_completions(&completions).await {
            error!(habit_id = %id, "habit deleted but completions not rewritten: {err}");
            return Err(err.into());
        }
        data.completions = completions;

        info!(habit_id = %id, "habit deleted");
        Ok(true)
    }

    /// Flips today's completion for `id`.
    pub async fn toggle_today(&self, id: &HabitId) -> Result<ToggleResponse, AppError> {
        self.toggle_on(id, today()).await
    }

    /// Flips the completion on `day` and reports the resulting state, streak
    /// included, as seen under the same lock.
    pub async fn toggle_on(
        &self,
        id: &HabitId,
        day: NaiveDate,
    ) -> Result<ToggleResponse, AppError> {
        let mut data = self.data.lock().await;
        if !data.has_habit(id) {
            return Err(AppError::not_found(format!("habit {id} not found")));
        }

        let toggled = toggle_completion(&data.completions, id, day);
        let completions = prune_orphans(toggled, &data.habits);
        self.store.save_completions(&completions).await?;
        data.completions = completions;

        let completed = is_completed(&data.completions, id, day);
        let current_streak = compute_streak(id, &data.completions, day);
        info!(habit_id = %id, %day, completed, current_streak, "completion toggled");
        Ok(ToggleResponse {
            habit_id: id.clone(),
            date: date_key(day),
            completed,
            current_streak,
        })
    }
}
