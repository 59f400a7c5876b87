use crate::models::{Completion, Habit, HabitId};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Flip the completion for `habit_id` on `today`.
///
/// Returns a new collection; the input is left untouched. An unknown habit id
/// is not rejected here.
pub fn toggle_completion(
    completions: &[Completion],
    habit_id: &HabitId,
    today: NaiveDate,
) -> Vec<Completion> {
    if is_completed(completions, habit_id, today) {
        completions
            .iter()
            .filter(|c| !(&c.habit_id == habit_id && c.date == today))
            .cloned()
            .collect()
    } else {
        let mut next = Vec::with_capacity(completions.len() + 1);
        next.extend_from_slice(completions);
        next.push(Completion {
            habit_id: habit_id.clone(),
            date: today,
        });
        next
    }
}

pub fn is_completed(completions: &[Completion], habit_id: &HabitId, day: NaiveDate) -> bool {
    completions
        .iter()
        .any(|c| &c.habit_id == habit_id && c.date == day)
}

/// Keep the first occurrence of each `(habit_id, date)` pair.
pub fn dedupe(completions: Vec<Completion>) -> Vec<Completion> {
    let mut seen = HashSet::with_capacity(completions.len());
    completions
        .into_iter()
        .filter(|c| seen.insert((c.habit_id.clone(), c.date)))
        .collect()
}

/// Drop completions whose habit no longer exists.
pub fn retain_known<'a>(completions: &'a [Completion], habits: &[Habit]) -> Vec<&'a Completion> {
    let known: HashSet<&HabitId> = habits.iter().map(|h| &h.id).collect();
    completions
        .iter()
        .filter(|c| known.contains(&c.habit_id))
        .collect()
}

/// Owned variant of [`retain_known`], used before a record is written or
/// after it is loaded so orphans do not outlive their habit.
pub fn prune_orphans(completions: Vec<Completion>, habits: &[Habit]) -> Vec<Completion> {
    let known: HashSet<&HabitId> = habits.iter().map(|h| &h.id).collect();
    completions
        .into_iter()
        .filter(|c| known.contains(&c.habit_id))
        .collect()
}
