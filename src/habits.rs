use crate::models::{Completion, Habit, HabitId};
use crate::suggestions::SuggestionLookup;
use chrono::{DateTime, Utc};

/// Build a new habit from user input.
///
/// Returns `None` when the trimmed name is empty. The suggestion lookup runs
/// exactly once, with the trimmed name, and its result is cached on the habit.
pub fn create_habit(
    name: &str,
    existing: &[Habit],
    lookup: &dyn SuggestionLookup,
    now: DateTime<Utc>,
) -> Option<Habit> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let id = unused_id(existing);
    let suggestion = lookup.suggest(name);

    Some(Habit {
        id,
        name: name.to_string(),
        created_at: now,
        video_id: Some(suggestion.video.id),
        video_title: Some(suggestion.video.title),
        playlist_id: Some(suggestion.playlist.id),
        playlist_title: Some(suggestion.playlist.title),
        playlist_category: suggestion.playlist.category,
        playlist_emoji: suggestion.playlist.emoji,
        playlist_color: suggestion.playlist.color,
    })
}

fn unused_id(existing: &[Habit]) -> HabitId {
    loop {
        let id = HabitId::generate();
        if !existing.iter().any(|habit| habit.id == id) {
            return id;
        }
    }
}

/// Remove a habit and every completion that references it.
pub fn delete_habit(
    id: &HabitId,
    habits: &[Habit],
    completions: &[Completion],
) -> (Vec<Habit>, Vec<Completion>) {
    let habits = habits.iter().filter(|h| &h.id != id).cloned().collect();
    let completions = completions
        .iter()
        .filter(|c| &c.habit_id != id)
        .cloned()
        .collect();
    (habits, completions)
}
