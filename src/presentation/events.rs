// Server-sent session updates
use crate::domain::session::SessionState;
use crate::presentation::views::{SessionView, session_view};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use tokio::sync::watch;

/// Yield the current session view, then one view per state change until the
/// session goes away.
pub fn session_updates(mut rx: watch::Receiver<SessionState>) -> impl Stream<Item = SessionView> {
    async_stream::stream! {
        loop {
            let view = session_view(&rx.borrow_and_update());
            yield view;

            if rx.changed().await.is_err() {
                break;
            }
        }
    }
}

pub fn session_events(
    rx: watch::Receiver<SessionState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = session_updates(rx).map(|view| Event::default().event("session").json_data(&view));

    Sse::new(stream).keep_alive(KeepAlive::default())
}
