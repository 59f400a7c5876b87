use crate::completions::{dedupe, prune_orphans};
use crate::config::RetryPolicy;
use crate::errors::StorageError;
use crate::models::{AppData, Completion, Habit};
use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, warn};

pub const SCHEMA_VERSION: u32 = 1;

const HABITS_RECORD: &str = "habits.json";
const COMPLETIONS_RECORD: &str = "completions.json";

/// Durable home of the two collections. Every save replaces the whole record.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    async fn load(&self) -> Result<AppData, StorageError>;
    async fn save_habits(&self, habits: &[Habit]) -> Result<(), StorageError>;
    async fn save_completions(&self, completions: &[Completion]) -> Result<(), StorageError>;
}

#[derive(Serialize)]
struct RecordOut<'a, T> {
    version: u32,
    items: &'a [T],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordIn<T> {
    Versioned { version: u32, items: Vec<T> },
    Legacy(Vec<T>),
}

/// One JSON file per collection inside a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    retry: RetryPolicy,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>, retry: RetryPolicy) -> Self {
        Self {
            dir: dir.into(),
            retry,
        }
    }

    pub fn habits_path(&self) -> PathBuf {
        self.dir.join(HABITS_RECORD)
    }

    pub fn completions_path(&self) -> PathBuf {
        self.dir.join(COMPLETIONS_RECORD)
    }

    async fn save_with_retry<T: Serialize + Sync>(
        &self,
        path: &Path,
        items: &[T],
    ) -> Result<(), StorageError> {
        let payload = serde_json::to_vec_pretty(&RecordOut {
            version: SCHEMA_VERSION,
            items,
        })
        .map_err(|source| StorageError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        with_retry(self.retry, path, || write_record(path, &payload)).await
    }
}

/// Run `op` until it succeeds or `policy.attempts` tries have failed,
/// sleeping with backoff between tries.
async fn with_retry<F, Fut>(
    policy: RetryPolicy,
    path: &Path,
    mut op: F,
) -> Result<(), StorageError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), StorageError>>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(()) => return Ok(()),
            Err(err) if attempt < attempts => {
                let wait = policy.backoff(attempt);
                warn!(
                    "write {} failed (attempt {attempt}/{attempts}), retrying in {wait:?}: {err}",
                    path.display()
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
            Err(err) => {
                error!("giving up on {} after {attempts} attempts: {err}", path.display());
                return Err(err);
            }
        }
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn load(&self) -> Result<AppData, StorageError> {
        let habits = read_record(&self.habits_path()).await?;
        let completions = read_record(&self.completions_path()).await?;
        let completions = prune_orphans(dedupe(completions), &habits);
        Ok(AppData {
            habits,
            completions,
        })
    }

    async fn save_habits(&self, habits: &[Habit]) -> Result<(), StorageError> {
        self.save_with_retry(&self.habits_path(), habits).await
    }

    async fn save_completions(&self, completions: &[Completion]) -> Result<(), StorageError> {
        self.save_with_retry(&self.completions_path(), completions).await
    }
}

async fn read_record<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StorageError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let record: RecordIn<T> =
        serde_json::from_slice(&bytes).map_err(|source| StorageError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    match record {
        RecordIn::Versioned { version, .. } if version > SCHEMA_VERSION => {
            Err(StorageError::UnsupportedVersion {
                path: path.to_path_buf(),
                found: version,
                supported: SCHEMA_VERSION,
            })
        }
        RecordIn::Versioned { items, .. } | RecordIn::Legacy(items) => Ok(items),
    }
}

/// Write to a sibling temp file, then rename over the record.
async fn write_record(path: &Path, payload: &[u8]) -> Result<(), StorageError> {
    let io_err = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, payload).await.map_err(io_err)?;
    fs::rename(&tmp, path).await.map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HabitId;
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::io;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn store(dir: &Path) -> JsonFileStore {
        JsonFileStore::new(
            dir,
            RetryPolicy {
                attempts: 2,
                base_backoff: Duration::from_millis(1),
            },
        )
    }

    fn policy(attempts: u32) -> RetryPolicy {
        RetryPolicy {
            attempts,
            base_backoff: Duration::from_millis(1),
        }
    }

    fn io_failure(path: &Path) -> StorageError {
        StorageError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("disk full"),
        }
    }

    fn habit(id: &str) -> Habit {
        Habit {
            id: HabitId::from(id),
            name: format!("habit {id}"),
            created_at: Utc.with_ymd_and_hms(2026, 1, 2, 8, 30, 0).unwrap(),
            video_id: Some("vid-running-form".into()),
            video_title: Some("Running form basics".into()),
            playlist_id: Some("pl-running-beats".into()),
            playlist_title: Some("Running Beats".into()),
            playlist_category: Some("Cardio".into()),
            playlist_emoji: Some("🏃".into()),
            playlist_color: Some("#ef4444".into()),
        }
    }

    fn completion(id: &str, d: u32) -> Completion {
        Completion {
            habit_id: HabitId::from(id),
            date: NaiveDate::from_ymd_opt(2026, 1, d).unwrap(),
        }
    }

    #[tokio::test]
    async fn missing_records_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let data = store(dir.path()).load().await.unwrap();
        assert_eq!(data, AppData::default());
    }

    #[tokio::test]
    async fn saved_collections_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let habits = vec![habit("a"), habit("b")];
        let completions = vec![completion("a", 4), completion("b", 5)];

        store.save_habits(&habits).await.unwrap();
        store.save_completions(&completions).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.habits, habits);
        assert_eq!(loaded.completions, completions);
    }

    #[tokio::test]
    async fn records_carry_schema_version_and_day_strings() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.save_completions(&[completion("a", 4)]).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(store.completions_path()).unwrap()).unwrap();
        assert_eq!(raw["version"], 1);
        assert_eq!(raw["items"][0]["habit_id"], "a");
        assert_eq!(raw["items"][0]["date"], "2026-01-04");
        assert!(!dir.path().join("completions.json.tmp").exists());
    }

    #[tokio::test]
    async fn bare_arrays_load_as_legacy_records() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("habits.json"),
            r#"[{"id":"a","name":"Read","created_at":"2026-01-02T08:30:00Z"}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("completions.json"),
            r#"[{"habit_id":"a","date":"2026-01-04"},{"habit_id":"a","date":"2026-01-04"}]"#,
        )
        .unwrap();

        let data = store(dir.path()).load().await.unwrap();
        assert_eq!(data.habits.len(), 1);
        assert_eq!(data.habits[0].name, "Read");
        assert_eq!(data.habits[0].video_id, None);
        assert_eq!(data.completions, vec![completion("a", 4)]);
    }

    #[tokio::test]
    async fn load_drops_completions_without_a_habit() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.save_habits(&[habit("a")]).await.unwrap();
        store
            .save_completions(&[completion("a", 4), completion("gone", 4), completion("gone", 5)])
            .await
            .unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.completions, vec![completion("a", 4)]);
    }

    #[tokio::test]
    async fn loose_day_strings_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("completions.json"),
            r#"[{"habit_id":"a","date":"2026-1-4"},{"habit_id":"a","date":"2026-01-04"}]"#,
        )
        .unwrap();

        let err = store(dir.path()).load().await.unwrap_err();
        assert!(matches!(err, StorageError::Json { .. }));
    }

    #[tokio::test]
    async fn newer_schema_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("habits.json"), r#"{"version":9,"items":[]}"#).unwrap();

        let err = store(dir.path()).load().await.unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedVersion { found: 9, .. }));
    }

    #[tokio::test]
    async fn corrupt_record_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("habits.json"), b"{not json").unwrap();

        let err = store(dir.path()).load().await.unwrap_err();
        assert!(matches!(err, StorageError::Json { .. }));
    }

    #[tokio::test]
    async fn failed_write_is_reported_after_retries() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the record file should be makes every rename fail.
        std::fs::create_dir_all(dir.path().join("habits.json").join("blocker")).unwrap();

        let err = store(dir.path()).save_habits(&[habit("a")]).await.unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }

    #[tokio::test]
    async fn retry_recovers_from_transient_failures() {
        let path = Path::new("habits.json");
        let calls = AtomicU32::new(0);

        let result = with_retry(policy(3), path, || {
            let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if call < 3 {
                    Err(io_failure(path))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retry_stops_after_configured_attempts() {
        let path = Path::new("habits.json");
        let calls = AtomicU32::new(0);

        let result = with_retry(policy(3), path, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(io_failure(path)) }
        })
        .await;

        assert!(matches!(result, Err(StorageError::Io { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retry_policy_floor_is_one_attempt() {
        let path = Path::new("habits.json");
        let calls = AtomicU32::new(0);

        let result = with_retry(policy(0), path, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(io_failure(path)) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
