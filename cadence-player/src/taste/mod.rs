//! Taste model (genre recommender)
//!
//! Per-session rolling history of played tracks, inferred genre tags,
//! and genre frequency counts. Produces biased search queries and scores
//! autoplay candidates. All state is in-memory and dropped with the
//! session.
//!
//! Selection is intentionally non-deterministic: a weighted random pick
//! among the top 3 scored candidates keeps autoplay from converging on
//! a single loop. The random source is injected so tests can seed it.

pub mod genres;

use cadence_common::Track;
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

pub use genres::DEFAULT_GENRE;

/// Minimal track info kept in history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    pub id: String,
    pub title: String,
    pub author: String,
    pub duration_ms: u64,
}

impl From<&Track> for TrackInfo {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id.clone(),
            title: track.title.clone(),
            author: track.author.clone(),
            duration_ms: track.duration_ms,
        }
    }
}

/// Detect a genre tag from a title, if any keyword matches.
///
/// Each genre scores the sum of whitespace-token counts of its matching
/// keywords (longer keywords weigh more). Ties resolve to the genre
/// listed first in the table.
pub fn detect_genre_opt(title: &str) -> Option<&'static str> {
    let title_lower = title.to_lowercase();

    let mut best: Option<(&'static str, usize)> = None;
    for (genre, keywords) in genres::GENRE_KEYWORDS {
        let mut score = 0usize;
        for keyword in *keywords {
            if title_lower.contains(keyword) {
                score += keyword.split_whitespace().count();
            }
        }
        if score > 0 && best.map_or(true, |(_, s)| score > s) {
            best = Some((*genre, score));
        }
    }
    best.map(|(genre, _)| genre)
}

/// Detect a genre tag from a title; defaults to "pop" when nothing matches
pub fn detect_genre(title: &str) -> &'static str {
    detect_genre_opt(title).unwrap_or(genres::DEFAULT_GENRE)
}

/// Strip video-metadata noise from a title for use as a search query.
///
/// Removes bracketed/parenthesized segments, everything after a pipe,
/// hashtags, and common metadata tokens; caps at 6 whitespace tokens.
pub fn clean_title(title: &str) -> String {
    const NOISE_TOKENS: &[&str] = &[
        "official", "mv", "m/v", "video", "audio", "lyric", "lyrics",
        "visualizer", "hd", "4k", "8d", "ft", "ft.", "feat", "feat.",
    ];

    // Drop [..] and (..) segments and anything after a pipe
    let mut stripped = String::with_capacity(title.len());
    let mut depth = 0usize;
    for c in title.chars() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => break,
            _ if depth == 0 => stripped.push(c),
            _ => {}
        }
    }

    stripped
        .split_whitespace()
        .filter(|token| !token.starts_with('#'))
        .filter(|token| {
            let t = token.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
            !t.is_empty() && !NOISE_TOKENS.contains(&t.as_str())
        })
        .take(6)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Weighted random choice among the top 3 scored candidates.
///
/// Candidates are sorted by score descending (stable); each of the top 3
/// is weighted by its score (minimum weight 1). Returns `None` only for
/// an empty input.
pub fn select_weighted<T>(rng: &mut impl Rng, mut scored: Vec<(u32, T)>) -> Option<T> {
    if scored.is_empty() {
        return None;
    }

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(3);

    let weights: Vec<u32> = scored.iter().map(|(score, _)| (*score).max(1)).collect();
    // Weights are all >= 1, so WeightedIndex cannot fail
    let index = WeightedIndex::new(&weights).ok()?;
    let pick = index.sample(rng);
    Some(scored.swap_remove(pick).1)
}

/// Per-session taste state: bounded play history, anti-repeat ring, and
/// genre frequency counts (first-seen insertion order preserved)
#[derive(Debug)]
pub struct TasteProfile {
    history_limit: usize,
    anti_repeat_limit: usize,
    history: VecDeque<TrackInfo>,
    recent_ids: VecDeque<String>,
    genre_counts: Vec<(&'static str, u32)>,
}

impl TasteProfile {
    pub fn new(history_limit: usize, anti_repeat_limit: usize) -> Self {
        Self {
            history_limit,
            anti_repeat_limit,
            history: VecDeque::with_capacity(history_limit + 1),
            recent_ids: VecDeque::with_capacity(anti_repeat_limit + 1),
            genre_counts: Vec::new(),
        }
    }

    /// Record a played track: append to history (evicting the oldest
    /// past capacity), update the anti-repeat ring, and bump the genre
    /// count for the detected genre.
    pub fn learn(&mut self, track: &Track) {
        self.history.push_back(TrackInfo::from(track));
        if self.history.len() > self.history_limit {
            if let Some(evicted) = self.history.pop_front() {
                self.decrement_genre(detect_genre(&evicted.title));
            }
        }

        self.recent_ids.push_back(track.id.clone());
        if self.recent_ids.len() > self.anti_repeat_limit {
            self.recent_ids.pop_front();
        }

        let genre = detect_genre(&track.title);
        self.increment_genre(genre);
        debug!(genre, title = %track.title, "learned track");
    }

    fn increment_genre(&mut self, genre: &'static str) {
        match self.genre_counts.iter_mut().find(|(g, _)| *g == genre) {
            Some((_, count)) => *count += 1,
            None => self.genre_counts.push((genre, 1)),
        }
    }

    fn decrement_genre(&mut self, genre: &'static str) {
        if let Some(pos) = self.genre_counts.iter().position(|(g, _)| *g == genre) {
            let count = &mut self.genre_counts[pos].1;
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.genre_counts.remove(pos);
            }
        }
    }

    fn genre_count(&self, genre: &str) -> u32 {
        self.genre_counts
            .iter()
            .find(|(g, _)| *g == genre)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    fn total_plays(&self) -> u32 {
        self.genre_counts.iter().map(|(_, count)| count).sum()
    }

    /// Track ids to avoid repeating
    pub fn recent_ids(&self) -> HashSet<String> {
        self.recent_ids.iter().cloned().collect()
    }

    /// Most-frequent genres, highest count first; ties keep first-seen order
    pub fn top_genres(&self, n: usize) -> Vec<&'static str> {
        let mut sorted = self.genre_counts.clone();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.into_iter().take(n).map(|(genre, _)| genre).collect()
    }

    /// Build up to 3 search queries biased toward the session's taste.
    ///
    /// Takes the top 3 learned genres, prepends the seed track's own
    /// detected genre when absent, and picks one query template per
    /// genre at random. With no genre signal at all, falls back to a
    /// single cleaned version of the seed title.
    ///
    /// Seed detection runs on the cleaned title so hashtags and video
    /// metadata cannot fake a genre match.
    pub fn build_queries(&self, seed_title: &str, rng: &mut impl Rng) -> Vec<String> {
        let cleaned = clean_title(seed_title);
        let mut top = self.top_genres(3);
        if let Some(seed_genre) = detect_genre_opt(&cleaned) {
            if !top.contains(&seed_genre) {
                top.insert(0, seed_genre);
            }
        }

        let mut queries = Vec::new();
        for genre in top.iter().take(3) {
            if let Some(templates) = genres::queries_for(genre) {
                let template = templates[rng.gen_range(0..templates.len())];
                queries.push(template.to_string());
            }
        }

        if queries.is_empty() && !cleaned.is_empty() {
            queries.push(cleaned);
        }

        queries
    }

    /// Score an autoplay candidate by genre match against the session's
    /// history. Floor of 5 so unknown genres still get a nonzero weight.
    pub fn score_candidate(&self, title: &str, _author: &str) -> u32 {
        let genre = detect_genre(title);
        let count = self.genre_count(genre);
        let mut score = count * 15;

        if let Some(top) = self.top_genres(1).first() {
            if genre == *top {
                score += 20;
            }
        }

        // Diversity bonus keeps minority genres surfacing occasionally
        let total = self.total_plays();
        if total > 0 && (count as f64) / (total as f64) < 0.3 {
            score += 10;
        }

        score.max(5)
    }

    /// Number of learned tracks currently in history
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Genre → play count snapshot, first-seen order
    pub fn genre_stats(&self) -> Vec<(&'static str, u32)> {
        self.genre_counts.clone()
    }

    /// Drop all learned state. Idempotent.
    pub fn clear(&mut self) {
        self.history.clear();
        self.recent_ids.clear();
        self.genre_counts.clear();
    }
}
