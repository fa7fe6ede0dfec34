//! Human-readable time formatting for playback displays
//!
//! Durations render as `M:SS` below one hour and `H:MM:SS` above.
//! The textual progress bar is used by now-playing displays.

/// Filled/empty glyphs for the progress bar
const BAR_FILLED: char = '█';
const BAR_EMPTY: char = '░';

/// Format milliseconds as `M:SS` or `H:MM:SS`.
///
/// # Examples
///
/// ```
/// use cadence_common::human_time::format_duration;
///
/// assert_eq!(format_duration(65_000), "1:05");
/// assert_eq!(format_duration(3_723_000), "1:02:03");
/// assert_eq!(format_duration(0), "0:00");
/// ```
pub fn format_duration(ms: u64) -> String {
    let total_secs = ms / 1000;
    let seconds = total_secs % 60;
    let minutes = (total_secs / 60) % 60;
    let hours = total_secs / 3600;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Build a textual progress bar of `length` characters.
///
/// `filled = floor(length * position / duration)`; a zero duration
/// renders an empty bar.
///
/// # Examples
///
/// ```
/// use cadence_common::human_time::progress_bar;
///
/// assert_eq!(progress_bar(0, 100, 4), "░░░░");
/// assert_eq!(progress_bar(50, 100, 4), "██░░");
/// assert_eq!(progress_bar(100, 100, 4), "████");
/// ```
pub fn progress_bar(position_ms: u64, duration_ms: u64, length: usize) -> String {
    if duration_ms == 0 {
        return BAR_EMPTY.to_string().repeat(length);
    }

    let filled = ((length as u64 * position_ms.min(duration_ms)) / duration_ms) as usize;
    let mut bar = String::with_capacity(length * BAR_FILLED.len_utf8());
    for _ in 0..filled {
        bar.push(BAR_FILLED);
    }
    for _ in filled..length {
        bar.push(BAR_EMPTY);
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_minutes_seconds() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(5_000), "0:05");
        assert_eq!(format_duration(65_000), "1:05");
        assert_eq!(format_duration(599_000), "9:59");
        assert_eq!(format_duration(3_599_000), "59:59");
    }

    #[test]
    fn test_format_hours() {
        assert_eq!(format_duration(3_600_000), "1:00:00");
        assert_eq!(format_duration(3_723_000), "1:02:03");
        assert_eq!(format_duration(36_000_000), "10:00:00");
    }

    #[test]
    fn test_progress_bar_fill() {
        assert_eq!(progress_bar(0, 200_000, 10), "░".repeat(10));
        assert_eq!(progress_bar(100_000, 200_000, 10), format!("{}{}", "█".repeat(5), "░".repeat(5)));
        assert_eq!(progress_bar(200_000, 200_000, 10), "█".repeat(10));
    }

    #[test]
    fn test_progress_bar_edge_cases() {
        // Zero duration (live stream or unknown) renders empty
        assert_eq!(progress_bar(1_000, 0, 5), "░".repeat(5));
        // Position past duration clamps to full
        assert_eq!(progress_bar(300_000, 200_000, 5), "█".repeat(5));
        // Partial fill floors: 3 * 33 / 100 = 0 filled cells
        assert_eq!(progress_bar(33, 100, 3), "░░░");
    }
}
