//! Server-sent change feed
//!
//! Relays every store write to signed-in clients so open screens can
//! refresh. Browsers pass the token as `?access_token=`.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use edc_store::ChangeEvent;
use futures::stream::{self, Stream};
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::extractors::{AppState, AuthenticatedUser};

const KEEP_ALIVE_SECS: u64 = 15;

/// GET /api/v1/events
pub async fn change_feed(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!(user_id = %user.id, "change feed opened");
    let receiver = state.services.store().subscribe();
    Sse::new(change_stream(receiver))
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(KEEP_ALIVE_SECS)))
}

fn change_stream(
    receiver: broadcast::Receiver<ChangeEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(receiver, |mut receiver| async move {
        let event = match receiver.recv().await {
            Ok(change) => to_event(&change),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "change feed subscriber lagged");
                Event::default().event("resync").data(skipped.to_string())
            }
            Err(RecvError::Closed) => return None,
        };
        Some((Ok(event), receiver))
    })
}

fn to_event(change: &ChangeEvent) -> Event {
    match Event::default().event(change.collection.as_str()).json_data(change) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "unserializable change event");
            Event::default().event(change.collection.as_str()).data(change.id.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edc_store::ChangeKind;
    use futures::StreamExt;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_stream_yields_changes_then_ends() {
        let (tx, rx) = broadcast::channel(4);
        let mut stream = Box::pin(change_stream(rx));

        tx.send(ChangeEvent::new("marches", Uuid::new_v4(), ChangeKind::Upserted))
            .unwrap();
        drop(tx);

        assert!(stream.next().await.is_some());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_lagging_subscriber_gets_resync() {
        let (tx, rx) = broadcast::channel(1);
        let mut stream = Box::pin(change_stream(rx));

        for _ in 0..3 {
            tx.send(ChangeEvent::new("projects", Uuid::new_v4(), ChangeKind::Merged))
                .unwrap();
        }
        drop(tx);

        let mut count = 0;
        while stream.next().await.is_some() {
            count += 1;
        }
        // one resync marker plus the single retained change
        assert_eq!(count, 2);
    }
}
