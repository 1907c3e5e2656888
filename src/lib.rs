//! Core types for the Nice Things playlist front end.
//!
//! Everything in the library half compiles natively as well as for
//! `wasm32`, so the cache, HTTP client and flows can be unit tested
//! without a browser.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

pub mod api;
pub mod cache;
pub mod config;
pub mod library;
pub mod logging;
pub mod route;
pub mod share;
pub mod store;
pub mod utils;

/// Bounds for the requested playlist length, in minutes.
pub mod defaults {
    pub const MIN_DURATION_MINUTES: u32 = 10;
    pub const MAX_DURATION_MINUTES: u32 = 1440;
    pub const DURATION_STEP_MINUTES: u32 = 5;
    pub const DEFAULT_DURATION_MINUTES: u32 = 30;

    /// Tags given to a shared playlist that arrives without its own.
    pub const SHARED_ACTIVITY: &str = "Shared Activity";
    pub const SHARED_VIBE: &str = "mixed";
}

/// Album artwork entry as returned by the generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// The backend has sent both a bare album name and a full album object,
/// so both shapes are accepted and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Album {
    Name(String),
    Details {
        name: String,
        #[serde(default)]
        images: Vec<AlbumImage>,
        /// Remaining album fields (`album_type`, `artists`, ...), kept so a
        /// stored track round-trips unchanged.
        #[serde(flatten)]
        extra: serde_json::Map<String, serde_json::Value>,
    },
}

impl Album {
    pub fn name(&self) -> &str {
        match self {
            Album::Name(name) => name,
            Album::Details { name, .. } => name,
        }
    }

    pub fn cover_url(&self) -> Option<&str> {
        match self {
            Album::Name(_) => None,
            Album::Details { images, .. } => images.first().map(|img| img.url.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub album: Album,
    /// Track length in milliseconds.
    pub duration: u32,
    pub spotify_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

/// A generated playlist. Stored whole and never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub activity: String,
    #[serde(default)]
    pub vibe: String,
    /// Requested length in minutes.
    pub duration: u32,
    #[serde(default)]
    pub tracks: Vec<Track>,
    pub created_at: String,
    pub spotify_url: String,
    #[serde(default)]
    pub image_url: String,
}

impl Playlist {
    /// Parsed `createdAt`, if it is a timestamp we understand.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Sum of the track lengths, in milliseconds.
    pub fn tracks_duration_ms(&self) -> u64 {
        self.tracks.iter().map(|t| u64::from(t.duration)).sum()
    }

    /// Case-insensitive match against name, activity and vibe.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [&self.name, &self.activity, &self.vibe]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }

    /// Stamp the request's activity and vibe onto a freshly generated
    /// playlist; the generator response does not carry them.
    pub fn tagged_with(mut self, request: &PlaylistRequest) -> Self {
        self.activity = request.activity.clone();
        self.vibe = request.vibe.clone();
        self
    }

    /// Fill in the tags a shared playlist may arrive without.
    pub fn with_shared_defaults(mut self) -> Self {
        if self.activity.trim().is_empty() {
            self.activity = defaults::SHARED_ACTIVITY.to_string();
        }
        if self.vibe.trim().is_empty() {
            self.vibe = defaults::SHARED_VIBE.to_string();
        }
        self
    }
}

/// Parse an ISO-8601 timestamp. Accepts RFC 3339 and the offset-less form
/// the generation backend emits, which is read as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Newest first; playlists with unreadable timestamps go last.
pub fn compare_newest_first(a: &Playlist, b: &Playlist) -> Ordering {
    match (a.created_at_utc(), b.created_at_utc()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Mood tag offered by the generator form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vibe {
    #[default]
    Ambient,
    Chill,
    Mellow,
    Focus,
    FeelGood,
    HighEnergy,
}

impl Vibe {
    pub const ALL: [Vibe; 6] = [
        Vibe::Ambient,
        Vibe::Chill,
        Vibe::Mellow,
        Vibe::Focus,
        Vibe::FeelGood,
        Vibe::HighEnergy,
    ];

    pub fn value(self) -> &'static str {
        match self {
            Vibe::Ambient => "ambient",
            Vibe::Chill => "chill",
            Vibe::Mellow => "mellow",
            Vibe::Focus => "focus",
            Vibe::FeelGood => "feel_good",
            Vibe::HighEnergy => "high_energy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Vibe::Ambient => "Ambient Flow: 30–50 BPM",
            Vibe::Chill => "Chill & Easy: 50–70 BPM",
            Vibe::Mellow => "Mellow Movement: 70–90 BPM",
            Vibe::Focus => "Steady Focus: 90–110 BPM",
            Vibe::FeelGood => "Feel Good Energy: 110–140 BPM",
            Vibe::HighEnergy => "High Intensity: 140+ BPM",
        }
    }

    pub fn from_value(value: &str) -> Option<Vibe> {
        let value = value.trim().to_lowercase();
        Vibe::ALL.into_iter().find(|v| v.value() == value)
    }

    /// CSS class for a vibe badge. Free-text vibes get the chill colours.
    pub fn badge_class(vibe: &str) -> &'static str {
        match Vibe::from_value(vibe).unwrap_or(Vibe::Chill) {
            Vibe::Ambient => "badge vibe-ambient",
            Vibe::Chill => "badge vibe-chill",
            Vibe::Mellow => "badge vibe-mellow",
            Vibe::Focus => "badge vibe-focus",
            Vibe::FeelGood => "badge vibe-feel-good",
            Vibe::HighEnergy => "badge vibe-high-energy",
        }
    }
}

impl fmt::Display for Vibe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Please enter an activity")]
    EmptyActivity,
    #[error("Please select a vibe")]
    EmptyVibe,
    #[error("Duration must be between {min} and {max} minutes (got {actual})")]
    DurationOutOfRange { min: u32, max: u32, actual: u32 },
}

/// Body of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistRequest {
    pub activity: String,
    pub duration: u32,
    pub vibe: String,
}

impl PlaylistRequest {
    /// Build a validated request. The activity is trimmed.
    pub fn new(
        activity: &str,
        duration: u32,
        vibe: impl Into<String>,
    ) -> Result<Self, RequestError> {
        let request = PlaylistRequest {
            activity: activity.trim().to_string(),
            duration,
            vibe: vibe.into(),
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        if self.activity.trim().is_empty() {
            return Err(RequestError::EmptyActivity);
        }
        if self.vibe.trim().is_empty() {
            return Err(RequestError::EmptyVibe);
        }
        let (min, max) = (
            defaults::MIN_DURATION_MINUTES,
            defaults::MAX_DURATION_MINUTES,
        );
        if !(min..=max).contains(&self.duration) {
            return Err(RequestError::DurationOutOfRange {
                min,
                max,
                actual: self.duration,
            });
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::playlist;
    use super::*;

    #[test]
    fn playlist_decodes_backend_response() {
        let body = r#"{
            "id": "37i9dQZF1",
            "name": "Running Vibes",
            "description": "A focus playlist for running",
            "spotifyUrl": "https://open.spotify.com/playlist/37i9dQZF1",
            "imageUrl": "https://i.scdn.co/image/abc",
            "duration": 45,
            "createdAt": "2024-03-05T10:15:30.123456",
            "tracks": [
                {"id": "t1", "name": "One", "artist": "A", "album": "Alb",
                 "duration": 200000, "spotifyUrl": "https://open.spotify.com/track/t1"},
                {"id": "t2", "name": "Two", "artist": "B",
                 "album": {"name": "Other", "images": [{"url": "https://img/1", "width": 640, "height": 640}]},
                 "duration": 180000, "spotifyUrl": "https://open.spotify.com/track/t2",
                 "previewUrl": "https://p/2.mp3"}
            ]
        }"#;

        let p: Playlist = serde_json::from_str(body).unwrap();
        assert_eq!(p.id, "37i9dQZF1");
        assert_eq!(p.activity, "");
        assert_eq!(p.track_count(), 2);
        assert_eq!(p.tracks[0].album.name(), "Alb");
        assert_eq!(p.tracks[1].album.cover_url(), Some("https://img/1"));
        assert_eq!(p.tracks_duration_ms(), 380_000);
        assert!(p.created_at_utc().is_some());
    }

    #[test]
    fn playlist_without_tracks_is_empty_sequence() {
        let body = r#"{"id":"x","name":"n","description":"d","duration":10,
            "createdAt":"2024-01-01T00:00:00Z","spotifyUrl":"s"}"#;
        let p: Playlist = serde_json::from_str(body).unwrap();
        assert!(p.tracks.is_empty());
        assert_eq!(p.image_url, "");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(playlist("p1", "2024-01-01T00:00:00Z")).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("spotifyUrl").is_some());
        assert!(json["tracks"][0].get("previewUrl").is_none());
    }

    #[test]
    fn timestamps_with_and_without_offset() {
        let zulu = parse_timestamp("2024-01-02T00:00:00Z").unwrap();
        let naive = parse_timestamp("2024-01-02T00:00:00").unwrap();
        let offset = parse_timestamp("2024-01-02T02:00:00+02:00").unwrap();
        assert_eq!(zulu, naive);
        assert_eq!(zulu, offset);
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn newest_first_puts_unparseable_last() {
        let mut items = vec![
            playlist("bad", "not a date"),
            playlist("old", "2024-01-01T00:00:00Z"),
            playlist("new", "2024-01-02T00:00:00Z"),
        ];
        items.sort_by(compare_newest_first);
        let ids: Vec<_> = items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["new", "old", "bad"]);
    }

    #[test]
    fn search_matches_name_activity_and_vibe() {
        let p = playlist("p1", "2024-01-01T00:00:00Z");
        assert!(p.matches("RUN"));
        assert!(p.matches("focus"));
        assert!(p.matches("playlist p1"));
        assert!(p.matches("  "));
        assert!(!p.matches("jazz"));
    }

    #[test]
    fn album_object_keeps_unknown_fields() {
        let body = r#"{"name":"Discovery","album_type":"album",
            "artists":[{"name":"Daft Punk"}],
            "images":[{"url":"https://img/d","width":300,"height":300}]}"#;
        let album: Album = serde_json::from_str(body).unwrap();
        assert_eq!(album.name(), "Discovery");
        assert_eq!(album.cover_url(), Some("https://img/d"));

        let written = serde_json::to_value(&album).unwrap();
        assert_eq!(written["album_type"], "album");
        assert_eq!(written["artists"][0]["name"], "Daft Punk");
        assert_eq!(
            written,
            serde_json::from_str::<serde_json::Value>(body).unwrap()
        );
    }

    #[test]
    fn generated_playlist_takes_request_tags() {
        let mut p = playlist("p1", "2024-01-01T00:00:00Z");
        p.activity.clear();
        p.vibe.clear();
        let request = PlaylistRequest::new("cooking with EDM", 40, "feel_good").unwrap();
        let p = p.tagged_with(&request);
        assert_eq!(p.activity, "cooking with EDM");
        assert_eq!(p.vibe, "feel_good");
        assert!(p.matches("cooking"));
    }

    #[test]
    fn shared_defaults_only_fill_blank_tags() {
        let mut p = playlist("p1", "2024-01-01T00:00:00Z");
        p.activity.clear();
        let p = p.with_shared_defaults();
        assert_eq!(p.activity, defaults::SHARED_ACTIVITY);
        assert_eq!(p.vibe, "focus");
    }

    #[test]
    fn request_validation() {
        let ok = PlaylistRequest::new("  coding with classical ", 60, "focus").unwrap();
        assert_eq!(ok.activity, "coding with classical");

        assert_eq!(
            PlaylistRequest::new("   ", 60, "focus"),
            Err(RequestError::EmptyActivity)
        );
        assert_eq!(
            PlaylistRequest::new("yoga", 60, ""),
            Err(RequestError::EmptyVibe)
        );
        assert_eq!(
            PlaylistRequest::new("yoga", 5, "chill"),
            Err(RequestError::DurationOutOfRange {
                min: 10,
                max: 1440,
                actual: 5
            })
        );
        assert!(PlaylistRequest::new("yoga", 1440, "chill").is_ok());
    }

    #[test]
    fn vibe_vocabulary() {
        assert_eq!(Vibe::default(), Vibe::Ambient);
        assert_eq!(Vibe::from_value("Feel_Good"), Some(Vibe::FeelGood));
        assert_eq!(Vibe::from_value("upbeat"), None);
        assert_eq!(Vibe::badge_class("upbeat"), "badge vibe-chill");
        assert_eq!(Vibe::badge_class("high_energy"), "badge vibe-high-energy");
        assert_eq!(
            serde_json::to_string(&Vibe::HighEnergy).unwrap(),
            "\"high_energy\""
        );
    }
}
