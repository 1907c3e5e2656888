//! Application-level configuration constants.

use once_cell::sync::Lazy;

// Remote service
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const GENERATE_PATH: &str = "/api/v1/generate-playlist";
pub const PLAYLIST_PATH: &str = "/api/v1/playlist";

/// Base URL of the generation service, taken from `API_URL` at build time.
pub static API_BASE_URL: Lazy<String> =
    Lazy::new(|| normalize_base_url(option_env!("API_URL").unwrap_or(DEFAULT_API_URL)));

// Local persistence
pub const STORAGE_KEY: &str = "user_playlists";

// UI Behavior
pub const RECENT_PLAYLIST_COUNT: usize = 3;
pub const COPY_FEEDBACK_MS: u32 = 2000;
pub const FALLBACK_COVER_URL: &str =
    "https://via.placeholder.com/300x300.png?text=Playlist+Image";

pub const LOG_LEVEL: log::LevelFilter = if cfg!(debug_assertions) {
    log::LevelFilter::Debug
} else {
    log::LevelFilter::Info
};

/// Trim whitespace and trailing slashes; an empty value falls back to the default.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_normalization() {
        assert_eq!(normalize_base_url("https://api.example.com/"), "https://api.example.com");
        assert_eq!(normalize_base_url("  http://h:1//  "), "http://h:1");
        assert_eq!(normalize_base_url(""), DEFAULT_API_URL);
        assert!(!API_BASE_URL.ends_with('/'));
    }
}
