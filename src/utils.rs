use crate::defaults::{MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};
use crate::parse_timestamp;

/// Format a track length given in milliseconds as `m:ss`.
pub fn format_track_duration(ms: u32) -> String {
    let total_seconds = ms / 1000;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Format a playlist length in minutes, e.g. `45 min` or `2 h 30 min`.
pub fn format_minutes(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{} min", m),
        (h, 0) => format!("{} h", h),
        (h, m) => format!("{} h {} min", h, m),
    }
}

/// Short display date for a playlist's `createdAt`.
pub fn format_created_at(created_at: &str) -> String {
    match parse_timestamp(created_at) {
        Some(dt) => dt.format("%b %-d, %H:%M").to_string(),
        None => "Unknown date".to_string(),
    }
}

pub fn collection_summary(count: usize) -> String {
    match count {
        0 => "No playlists yet".to_string(),
        1 => "1 playlist in your collection".to_string(),
        n => format!("{} playlists in your collection", n),
    }
}

/// Generic numeric input validation
pub fn validate_numeric_input<T>(
    input: &str,
    min: Option<T>,
    max: Option<T>,
    field_name: &str,
) -> Result<T, String>
where
    T: std::str::FromStr + std::fmt::Display + PartialOrd,
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(format!("{} cannot be empty", field_name));
    }

    match trimmed.parse::<T>() {
        Ok(val) => {
            if let Some(min_val) = min {
                if val < min_val {
                    return Err(format!("{} must be at least {}", field_name, min_val));
                }
            }
            if let Some(max_val) = max {
                if val > max_val {
                    return Err(format!("{} cannot exceed {}", field_name, max_val));
                }
            }
            Ok(val)
        }
        Err(_) => Err(format!("{} must be a valid number", field_name)),
    }
}

/// Validate the duration text box (minutes).
pub fn validate_duration(input: &str) -> Result<u32, String> {
    validate_numeric_input(
        input,
        Some(MIN_DURATION_MINUTES),
        Some(MAX_DURATION_MINUTES),
        "Duration",
    )
}

/// Validate the activity field; returns the trimmed text.
pub fn validate_activity(input: &str) -> Result<String, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Err(crate::RequestError::EmptyActivity.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_durations() {
        assert_eq!(format_track_duration(210_000), "3:30");
        assert_eq!(format_track_duration(59_999), "0:59");
        assert_eq!(format_track_duration(3_605_000), "60:05");
    }

    #[test]
    fn playlist_minutes() {
        assert_eq!(format_minutes(45), "45 min");
        assert_eq!(format_minutes(120), "2 h");
        assert_eq!(format_minutes(150), "2 h 30 min");
    }

    #[test]
    fn created_at_display() {
        assert_eq!(format_created_at("2024-01-02T09:05:00Z"), "Jan 2, 09:05");
        assert_eq!(format_created_at("garbage"), "Unknown date");
    }

    #[test]
    fn summary_pluralises() {
        assert_eq!(collection_summary(0), "No playlists yet");
        assert_eq!(collection_summary(1), "1 playlist in your collection");
        assert_eq!(collection_summary(4), "4 playlists in your collection");
    }

    #[test]
    fn duration_bounds() {
        assert_eq!(validate_duration(" 90 "), Ok(90));
        assert_eq!(
            validate_duration("5"),
            Err("Duration must be at least 10".to_string())
        );
        assert_eq!(
            validate_duration("2000"),
            Err("Duration cannot exceed 1440".to_string())
        );
        assert_eq!(
            validate_duration("ten"),
            Err("Duration must be a valid number".to_string())
        );
    }

    #[test]
    fn activity_is_trimmed() {
        assert_eq!(validate_activity("  yoga "), Ok("yoga".to_string()));
        assert_eq!(
            validate_activity("   "),
            Err("Please enter an activity".to_string())
        );
    }
}
