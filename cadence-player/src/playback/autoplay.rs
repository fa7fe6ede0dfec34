//! Autoplay candidate selection
//!
//! Builds a short list of search queries from the track that just ended
//! and the session's taste profile, then picks one playable candidate by
//! weighted random choice among the top scorers. Search failures are
//! soft: a failed query is logged and the next one is tried.

use crate::playback::engine::PlaybackEngine;
use crate::session::SessionState;
use crate::taste::{clean_title, select_weighted};
use cadence_common::Track;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Maximum queries attempted per autoplay round
const MAX_QUERIES: usize = 5;

/// Candidates considered per query result
const MAX_CANDIDATES_PER_QUERY: usize = 10;

/// Find the next autoplay track for a session, or `None` when every
/// query comes up empty. Does not start playback.
pub(crate) async fn select_candidate(
    engine: &Arc<PlaybackEngine>,
    state: &mut SessionState,
    seed: &Track,
) -> Option<Track> {
    let mut queries: Vec<String> = Vec::new();
    // "Artist - Song" titles carry the artist before the dash; that is
    // the most specific query available
    if let Some((artist, _)) = seed.title.split_once(" - ") {
        let artist = artist.trim();
        if !artist.is_empty() {
            queries.push(artist.to_string());
        }
    }
    let cleaned = clean_title(&seed.title);
    if !cleaned.is_empty() {
        queries.push(format!("{} {}", cleaned, seed.author));
    }
    queries.push(format!("{} music", seed.author));
    queries.extend(state.taste.build_queries(&seed.title, &mut state.rng));

    let mut seen = HashSet::new();
    queries.retain(|q| seen.insert(q.to_lowercase()));
    queries.truncate(MAX_QUERIES);

    let recent = state.taste.recent_ids();

    for query in &queries {
        let result = match engine.media.search(query).await {
            Ok(result) => result,
            Err(e) => {
                warn!(%query, error = %e, "autoplay search failed");
                continue;
            }
        };

        let mut tracks = result.into_tracks();
        tracks.truncate(MAX_CANDIDATES_PER_QUERY);
        let candidates = engine.filter.filter_candidates(&tracks, &recent);
        if candidates.is_empty() {
            debug!(%query, "no playable autoplay candidates");
            continue;
        }

        let scored: Vec<(u32, Track)> = candidates
            .into_iter()
            .map(|t| (state.taste.score_candidate(&t.title, &t.author), t))
            .collect();

        if let Some(pick) = select_weighted(&mut state.rng, scored) {
            debug!(%query, title = %pick.title, "autoplay candidate selected");
            return Some(pick);
        }
    }

    debug!(seed = %seed.title, "autoplay found no candidate");
    None
}
