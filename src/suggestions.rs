//! Keyword tables mapping a habit name to a video and a playlist.
//!
//! Tables are ordered: the first entry with a keyword contained in the
//! lowercased habit name wins, so earlier entries take priority when
//! keywords overlap. Each table has a fallback used when nothing matches.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSuggestion {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitSuggestion {
    pub video: MediaSuggestion,
    pub playlist: MediaSuggestion,
}

pub trait SuggestionLookup: Send + Sync {
    fn suggest(&self, habit_name: &str) -> HabitSuggestion;
}

struct Entry {
    keywords: &'static [&'static str],
    id: &'static str,
    title: &'static str,
    category: Option<&'static str>,
    emoji: Option<&'static str>,
    color: Option<&'static str>,
}

impl Entry {
    const fn video(
        keywords: &'static [&'static str],
        id: &'static str,
        title: &'static str,
    ) -> Self {
        Self {
            keywords,
            id,
            title,
            category: None,
            emoji: None,
            color: None,
        }
    }

    const fn playlist(
        keywords: &'static [&'static str],
        id: &'static str,
        title: &'static str,
        category: &'static str,
        emoji: &'static str,
        color: &'static str,
    ) -> Self {
        Self {
            keywords,
            id,
            title,
            category: Some(category),
            emoji: Some(emoji),
            color: Some(color),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered.contains(keyword))
    }

    fn to_suggestion(&self) -> MediaSuggestion {
        MediaSuggestion {
            id: self.id.to_string(),
            title: self.title.to_string(),
            category: self.category.map(str::to_string),
            emoji: self.emoji.map(str::to_string),
            color: self.color.map(str::to_string),
        }
    }
}

const VIDEOS: &[Entry] = &[
    Entry::video(&["run", "jog"], "vid-running-form", "Running form basics"),
    Entry::video(&["walk", "steps"], "vid-daily-walk", "Make the most of a daily walk"),
    Entry::video(&["yoga", "stretch"], "vid-yoga-20", "20 minute morning yoga"),
    Entry::video(
        &["meditat", "mindful", "breath"],
        "vid-meditation-10",
        "10 minute guided meditation",
    ),
    Entry::video(
        &["gym", "workout", "lift", "push", "exercise"],
        "vid-home-workout",
        "Full body home workout",
    ),
    Entry::video(&["read", "book"], "vid-reading-habit", "How to read more books"),
    Entry::video(&["water", "drink", "hydrat"], "vid-hydration", "Why hydration matters"),
    Entry::video(&["sleep", "bed"], "vid-sleep-hygiene", "Better sleep hygiene"),
    Entry::video(&["code", "program", "study", "learn"], "vid-deep-work", "Deep work sessions"),
    Entry::video(
        &["journal", "write", "gratitude"],
        "vid-journaling",
        "Start a journaling practice",
    ),
    Entry::video(&["morning", "wake"], "vid-morning-routine", "Build a morning routine"),
];

const VIDEO_FALLBACK: Entry =
    Entry::video(&[], "vid-habit-science", "The science of habit building");

const PLAYLISTS: &[Entry] = &[
    Entry::playlist(
        &["run", "jog"],
        "pl-running-beats",
        "Running Beats",
        "Cardio",
        "🏃",
        "#ef4444",
    ),
    Entry::playlist(
        &["walk", "steps"],
        "pl-easy-stroll",
        "Easy Stroll",
        "Outdoors",
        "🚶",
        "#22c55e",
    ),
    Entry::playlist(
        &["yoga", "stretch"],
        "pl-yoga-flow",
        "Yoga Flow",
        "Mobility",
        "🧘",
        "#a855f7",
    ),
    Entry::playlist(
        &["meditat", "mindful", "breath"],
        "pl-calm-mind",
        "Calm Mind",
        "Mindfulness",
        "🌿",
        "#14b8a6",
    ),
    Entry::playlist(
        &["gym", "workout", "lift", "push", "exercise"],
        "pl-power-hour",
        "Power Hour",
        "Strength",
        "💪",
        "#f97316",
    ),
    Entry::playlist(
        &["read", "book", "study", "learn"],
        "pl-focus-lofi",
        "Focus Lo-Fi",
        "Focus",
        "📚",
        "#3b82f6",
    ),
    Entry::playlist(
        &["code", "program"],
        "pl-deep-focus",
        "Deep Focus",
        "Focus",
        "💻",
        "#6366f1",
    ),
    Entry::playlist(
        &["sleep", "bed"],
        "pl-night-sounds",
        "Night Sounds",
        "Rest",
        "🌙",
        "#1e3a8a",
    ),
    Entry::playlist(
        &["journal", "write", "gratitude"],
        "pl-quiet-pages",
        "Quiet Pages",
        "Reflection",
        "✍️",
        "#eab308",
    ),
    Entry::playlist(&["morning", "wake"], "pl-sunrise", "Sunrise", "Energy", "🌅", "#f59e0b"),
];

const PLAYLIST_FALLBACK: Entry = Entry::playlist(
    &[],
    "pl-daily-motivation",
    "Daily Motivation",
    "General",
    "✨",
    "#64748b",
);

fn first_match(table: &[Entry], fallback: &Entry, lowered: &str) -> MediaSuggestion {
    table
        .iter()
        .find(|entry| entry.matches(lowered))
        .unwrap_or(fallback)
        .to_suggestion()
}

/// Built-in keyword tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSuggestions;

impl SuggestionLookup for StaticSuggestions {
    fn suggest(&self, habit_name: &str) -> HabitSuggestion {
        let lowered = habit_name.to_lowercase();
        HabitSuggestion {
            video: first_match(VIDEOS, &VIDEO_FALLBACK, &lowered),
            playlist: first_match(PLAYLISTS, &PLAYLIST_FALLBACK, &lowered),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earlier_entry_wins_on_overlap() {
        // "morning" also has an entry, but "run" is listed first.
        let suggestion = StaticSuggestions.suggest("Morning Run");
        assert_eq!(suggestion.video.id, "vid-running-form");
        assert_eq!(suggestion.playlist.id, "pl-running-beats");
        assert_eq!(suggestion.playlist.emoji.as_deref(), Some("🏃"));
    }

    #[test]
    fn matching_ignores_case() {
        let suggestion = StaticSuggestions.suggest("YOGA before work");
        assert_eq!(suggestion.video.id, "vid-yoga-20");
        assert_eq!(suggestion.playlist.category.as_deref(), Some("Mobility"));
    }

    #[test]
    fn unmatched_name_gets_fallback() {
        let suggestion = StaticSuggestions.suggest("Call grandma");
        assert_eq!(suggestion.video.id, "vid-habit-science");
        assert_eq!(suggestion.playlist.id, "pl-daily-motivation");
    }

    #[test]
    fn video_entries_carry_no_styling() {
        let suggestion = StaticSuggestions.suggest("Read 10 pages");
        assert_eq!(suggestion.video.id, "vid-reading-habit");
        assert!(suggestion.video.color.is_none());
        assert_eq!(suggestion.playlist.color.as_deref(), Some("#3b82f6"));
    }
}
