use std::{env, path::PathBuf, str::FromStr, time::Duration};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_SAVE_RETRIES: u32 = 3;
const DEFAULT_SAVE_BACKOFF_MS: u64 = 50;

/// Bounded retry for record writes. The wait doubles after each failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_backoff: Duration,
}

impl RetryPolicy {
    pub fn backoff(&self, failed_attempts: u32) -> Duration {
        let factor = 1u32 << failed_attempts.saturating_sub(1).min(16);
        self.base_backoff.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_SAVE_RETRIES,
            base_backoff: Duration::from_millis(DEFAULT_SAVE_BACKOFF_MS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub retry: RetryPolicy,
}

impl AppConfig {
    /// Reads `PORT`, `HABITS_DATA_DIR`, `HABITS_SAVE_RETRIES` and
    /// `HABITS_SAVE_BACKOFF_MS`. Missing or unparsable values use defaults.
    pub fn from_env() -> Self {
        let data_dir = env::var("HABITS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));
        let attempts = parse_var("HABITS_SAVE_RETRIES").unwrap_or(DEFAULT_SAVE_RETRIES).max(1);
        let backoff_ms = parse_var("HABITS_SAVE_BACKOFF_MS").unwrap_or(DEFAULT_SAVE_BACKOFF_MS);

        Self {
            port: parse_var("PORT").unwrap_or(DEFAULT_PORT),
            data_dir,
            retry: RetryPolicy {
                attempts,
                base_backoff: Duration::from_millis(backoff_ms),
            },
        }
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.trim().parse::<T>().ok())
}
