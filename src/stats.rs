use crate::completions::{is_completed, retain_known};
use crate::dates::{date_key, days_back, today, window_ending};
use crate::models::{AppData, Completion, DayMark, Habit, HabitId, HabitStats, StatsResponse};
use chrono::NaiveDate;
use std::collections::HashSet;

/// How far back the streak walk looks.
pub const STREAK_HORIZON_DAYS: u32 = 365;

const HISTORY_DAYS: u32 = 7;

/// Consecutive completed days ending today or yesterday.
///
/// A missing completion today does not break the streak; any earlier gap
/// ends the walk.
pub fn compute_streak(habit_id: &HabitId, completions: &[Completion], today: NaiveDate) -> u32 {
    let done: HashSet<NaiveDate> = completions
        .iter()
        .filter(|c| &c.habit_id == habit_id)
        .map(|c| c.date)
        .collect();
    if done.is_empty() {
        return 0;
    }

    let mut streak = 0;
    for (offset, day) in days_back(today, STREAK_HORIZON_DAYS).enumerate() {
        if done.contains(&day) {
            streak += 1;
        } else if offset > 0 {
            break;
        }
    }
    streak
}

pub fn best_streak(habits: &[Habit], completions: &[Completion], today: NaiveDate) -> u32 {
    habits
        .iter()
        .map(|habit| compute_streak(&habit.id, completions, today))
        .max()
        .unwrap_or(0)
}

/// Number of existing habits completed on `today`. Orphaned entries are ignored.
pub fn completions_today(habits: &[Habit], completions: &[Completion], today: NaiveDate) -> usize {
    retain_known(completions, habits)
        .into_iter()
        .filter(|c| c.date == today)
        .count()
}

pub fn build_stats(data: &AppData) -> StatsResponse {
    build_stats_at(today(), data)
}

pub fn build_stats_at(today: NaiveDate, data: &AppData) -> StatsResponse {
    let window = window_ending(today, HISTORY_DAYS);

    let habits = data
        .habits
        .iter()
        .map(|habit| HabitStats {
            id: habit.id.clone(),
            name: habit.name.clone(),
            current_streak: compute_streak(&habit.id, &data.completions, today),
            completed_today: is_completed(&data.completions, &habit.id, today),
            last_7_days: window
                .iter()
                .map(|&day| DayMark {
                    date: date_key(day),
                    completed: is_completed(&data.completions, &habit.id, day),
                })
                .collect(),
        })
        .collect();

    StatsResponse {
        date: date_key(today),
        total_habits: data.habits.len(),
        completions_today: completions_today(&data.habits, &data.completions, today),
        best_streak: best_streak(&data.habits, &data.completions, today),
        habits,
    }
}
