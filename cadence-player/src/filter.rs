//! Track filter
//!
//! Pure validation of candidate tracks against duration, liveness, and
//! blocked-keyword rules. Total for any input: never panics, never
//! allocates beyond the rejection message.

use crate::config::Config;
use cadence_common::Track;
use std::collections::HashSet;

/// Why a track was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Live streams are never playable
    LiveStream,
    /// Track exceeds the configured maximum duration
    TooLong { minutes: u64, max_minutes: u64 },
    /// Title contains a blocked keyword
    BlockedKeyword(String),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::LiveStream => write!(f, "live streams are not supported"),
            Rejection::TooLong { minutes, max_minutes } => {
                write!(f, "track too long ({} min > {} min)", minutes, max_minutes)
            }
            Rejection::BlockedKeyword(keyword) => {
                write!(f, "title contains blocked keyword '{}'", keyword)
            }
        }
    }
}

/// Validates candidate tracks against configured rules
#[derive(Debug, Clone)]
pub struct TrackFilter {
    max_duration_ms: u64,
    blocked_keywords: Vec<String>,
}

impl TrackFilter {
    pub fn new(config: &Config) -> Self {
        Self {
            max_duration_ms: config.max_duration_ms(),
            blocked_keywords: config
                .blocked_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }

    /// Check one track against all rules.
    ///
    /// Rules apply in order: live stream, duration, blocked keywords.
    /// Keyword matching is a case-insensitive substring check.
    pub fn validate(&self, title: &str, duration_ms: u64, is_stream: bool) -> Result<(), Rejection> {
        if is_stream {
            return Err(Rejection::LiveStream);
        }

        if duration_ms > self.max_duration_ms {
            return Err(Rejection::TooLong {
                minutes: duration_ms / 60_000,
                max_minutes: self.max_duration_ms / 60_000,
            });
        }

        let title_lower = title.to_lowercase();
        for keyword in &self.blocked_keywords {
            if title_lower.contains(keyword.as_str()) {
                return Err(Rejection::BlockedKeyword(keyword.clone()));
            }
        }

        Ok(())
    }

    /// Convenience wrapper for a whole track
    pub fn validate_track(&self, track: &Track) -> Result<(), Rejection> {
        self.validate(&track.title, track.duration_ms, track.is_stream)
    }

    /// Drop recently played and invalid tracks from a candidate list.
    ///
    /// Preserves input order and does not mutate the input.
    pub fn filter_candidates(&self, tracks: &[Track], recent_ids: &HashSet<String>) -> Vec<Track> {
        tracks
            .iter()
            .filter(|t| !recent_ids.contains(&t.id))
            .filter(|t| self.validate_track(t).is_ok())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> TrackFilter {
        TrackFilter::new(&Config::default())
    }

    fn track(id: &str, title: &str, duration_ms: u64, is_stream: bool) -> Track {
        Track {
            id: id.into(),
            title: title.into(),
            author: "Artist".into(),
            duration_ms,
            is_stream,
            artwork_url: None,
        }
    }

    #[test]
    fn test_rejects_live_streams_unconditionally() {
        let f = filter();
        assert_eq!(f.validate("Anything", 0, true), Err(Rejection::LiveStream));
        assert_eq!(f.validate("", 1_000, true), Err(Rejection::LiveStream));
        // Stream check wins even when other rules would also fire
        assert_eq!(
            f.validate("full album", 100_000_000, true),
            Err(Rejection::LiveStream)
        );
    }

    #[test]
    fn test_rejects_over_duration() {
        let f = filter();
        // 90 minutes exactly is allowed; one ms over is not
        assert!(f.validate("Song", 5_400_000, false).is_ok());
        assert_eq!(
            f.validate("Song", 5_400_001, false),
            Err(Rejection::TooLong { minutes: 90, max_minutes: 90 })
        );
        let rejection = f.validate("Song", 7_200_000, false).unwrap_err();
        assert_eq!(rejection.to_string(), "track too long (120 min > 90 min)");
    }

    #[test]
    fn test_rejects_blocked_keywords_case_insensitive() {
        let f = filter();
        let rejection = f.validate("Best Of 2024 FULL ALBUM", 180_000, false);
        // "album" appears before "full album" in the keyword list
        assert!(matches!(rejection, Err(Rejection::BlockedKeyword(_))));

        assert!(matches!(
            f.validate("Chill MIX vol. 3", 180_000, false),
            Err(Rejection::BlockedKeyword(k)) if k == "mix"
        ));
    }

    #[test]
    fn test_accepts_normal_track_and_empty_title() {
        let f = filter();
        assert!(f.validate("Artist - Song (Official MV)", 240_000, false).is_ok());
        // Total function: empty title is simply valid
        assert!(f.validate("", 240_000, false).is_ok());
    }

    #[test]
    fn test_filter_candidates_order_and_anti_repeat() {
        let f = filter();
        let tracks = vec![
            track("a", "Song A", 200_000, false),
            track("b", "Song B live", 200_000, false),
            track("c", "Song C", 200_000, false),
            track("d", "Song D", 200_000, true),
            track("e", "Song E", 200_000, false),
        ];
        let recent: HashSet<String> = ["c".to_string()].into_iter().collect();

        let kept = f.filter_candidates(&tracks, &recent);
        let ids: Vec<&str> = kept.iter().map(|t| t.id.as_str()).collect();
        // "b" blocked keyword, "c" recent, "d" stream; order preserved
        assert_eq!(ids, vec!["a", "e"]);
        // Input untouched
        assert_eq!(tracks.len(), 5);
    }
}
