//! Live progress feed — analysis events pushed to the browser over SSE.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_core::Stream;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::state::SharedState;

const KEEP_ALIVE_SECS: u64 = 15;

/// Subscribes the client to pipeline progress events. Each broadcast event
/// becomes one SSE frame carrying its JSON encoding.
pub async fn sse_handler(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Lagging subscribers skip frames rather than stalling the pipeline.
    let events = BroadcastStream::new(state.subscribe()).filter_map(|recv| {
        let event = recv.ok()?;
        let json = serde_json::to_string(&event).ok()?;
        Some(Ok(Event::default().data(json)))
    });

    let keep_alive = KeepAlive::new()
        .interval(Duration::from_secs(KEEP_ALIVE_SECS))
        .text("ping");
    Sse::new(events).keep_alive(keep_alive)
}
