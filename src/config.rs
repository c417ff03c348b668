use std::env;
use std::path::PathBuf;
use std::time::Duration;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const CATALOG_PATH: &str = "data/tours.json";
const SUBMISSION_DELAY_MS: u64 = 2000;
const SESSION_IDLE_MINUTES: u64 = 30;
const MAX_OPEN_SESSIONS: usize = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub catalog_path: PathBuf,
    pub submission_delay: Duration,
    /// Booking sessions untouched for this long are dropped.
    pub session_idle_timeout: Duration,
    pub max_open_sessions: usize,
    /// Any origin is allowed when unset.
    pub cors_allowed_origin: Option<String>,
}

impl AppConfig {
    /// Reads the environment; malformed numbers fall back to the defaults.
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| HOST.to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(PORT);
        let catalog_path = env::var("TOUR_CATALOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(CATALOG_PATH));
        let delay_ms = env::var("SUBMISSION_DELAY_MS")
            .ok()
            .and_then(|ms| ms.parse().ok())
            .unwrap_or(SUBMISSION_DELAY_MS);
        let idle_minutes = env::var("SESSION_IDLE_MINUTES")
            .ok()
            .and_then(|minutes| minutes.parse().ok())
            .unwrap_or(SESSION_IDLE_MINUTES);
        let max_open_sessions = env::var("MAX_OPEN_SESSIONS")
            .ok()
            .and_then(|max| max.parse().ok())
            .filter(|max| *max > 0)
            .unwrap_or(MAX_OPEN_SESSIONS);
        let cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN")
            .ok()
            .filter(|origin| !origin.trim().is_empty());

        Self {
            host,
            port,
            catalog_path,
            submission_delay: Duration::from_millis(delay_ms),
            session_idle_timeout: Duration::from_secs(idle_minutes.saturating_mul(60)),
            max_open_sessions,
            cors_allowed_origin,
        }
    }
}
