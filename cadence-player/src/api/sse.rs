//! Server-Sent Events stream
//!
//! Streams playback events to the chat gateway, which renders them as
//! user-visible notices. An optional `session_id` query parameter
//! narrows the stream to one voice session.

use crate::api::ApiContext;
use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    session_id: Option<u64>,
}

/// GET /events - SSE event stream
pub async fn event_stream(
    State(ctx): State<ApiContext>,
    Query(query): Query<EventsQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!(session_id = ?query.session_id, "new SSE client connected");

    let rx = ctx.engine.subscribe_events();
    let filter = query.session_id;

    let stream = BroadcastStream::new(rx).filter_map(move |result| async move {
        match result {
            Ok(event) => {
                if let Some(wanted) = filter {
                    if event.session_id().0 != wanted {
                        return None;
                    }
                }
                match serde_json::to_string(&event) {
                    Ok(json) => Some(Ok(Event::default().event(event.event_type()).data(json))),
                    Err(e) => {
                        warn!("failed to serialize event: {}", e);
                        None
                    }
                }
            }
            Err(e) => {
                // Lagged or closed receiver; drop and keep the stream alive
                warn!("SSE stream error: {:?}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
