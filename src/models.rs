use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(pub String);

impl HabitId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HabitId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A tracked habit. The suggestion fields are filled once at creation and
/// never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Completion {
    pub habit_id: HabitId,
    #[serde(deserialize_with = "crate::dates::deserialize_day")]
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppData {
    pub habits: Vec<Habit>,
    pub completions: Vec<Completion>,
}

impl AppData {
    pub fn has_habit(&self, id: &HabitId) -> bool {
        self.habits.iter().any(|habit| &habit.id == id)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateHabitRequest {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HabitView {
    #[serde(flatten)]
    pub habit: Habit,
    pub completed_today: bool,
    pub current_streak: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub habit_id: HabitId,
    pub date: String,
    pub completed: bool,
    pub current_streak: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DayMark {
    pub date: String,
    pub completed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HabitStats {
    pub id: HabitId,
    pub name: String,
    pub current_streak: u32,
    pub completed_today: bool,
    pub last_7_days: Vec<DayMark>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub date: String,
    pub total_habits: usize,
    pub completions_today: usize,
    pub best_streak: u32,
    pub habits: Vec<HabitStats>,
}
