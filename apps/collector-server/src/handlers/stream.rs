//! Server-sent events stream of real-time collection updates.

use actix_web::{HttpResponse, web};
use tokio::sync::broadcast;

use crate::state::AppState;

/// Stream broadcaster events to the client as SSE.
///
/// GET /api/stream
pub async fn stream_updates(state: web::Data<AppState>) -> HttpResponse {
    let rx = state.broadcaster.subscribe();

    let stream = futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(msg) => {
                    let data = serde_json::to_string(&msg.payload).unwrap_or_default();
                    let chunk = format!("event: {}\ndata: {}\n\n", msg.event, data);
                    return Some((
                        Ok::<_, actix_web::Error>(web::Bytes::from(chunk)),
                        rx,
                    ));
                }
                // A slow client that lagged just misses the dropped events.
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(stream)
}
