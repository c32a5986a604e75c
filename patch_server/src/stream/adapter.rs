//! Bridge from a `StreamSession` to an HTTP response.
//!
//! The session runs on its own task and pushes encoded frames into a channel
//! with room for a single frame; the response body drains that channel. When
//! the client disconnects, hyper drops the body, the channel closes and the
//! session notices on its next send or while suspended.

use axum::body::Body;
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;

use crate::stream::session::{SessionReport, StreamSession};

/// Content type of every streaming response.
pub const EVENT_STREAM: &str = "text/event-stream";
/// Tells reverse proxies (nginx) not to buffer the response.
pub const X_ACCEL_BUFFERING: &str = "x-accel-buffering";

/// Frames buffered between the session task and the transport.
const FRAME_BUFFER: usize = 1;

/// Start `session` and return the streaming response it feeds.
pub fn serve(session: StreamSession) -> Response {
    spawn_session(session).0
}

/// Like [`serve`], also returning the handle of the session task.
pub fn spawn_session(session: StreamSession) -> (Response, JoinHandle<SessionReport>) {
    let (tx, rx) = mpsc::channel(FRAME_BUFFER);
    let handle = tokio::spawn(session.run(tx));

    let response = (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(EVENT_STREAM)),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
            (HeaderName::from_static(X_ACCEL_BUFFERING), HeaderValue::from_static("no")),
        ],
        Body::from_stream(ReceiverStream::new(rx)),
    )
        .into_response();
    (response, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::ticker::{TickerGenerator, UniformWalk};
    use crate::generator::typewriter::{CONTENT_SIGNAL, TypewriterGenerator};
    use crate::model::entity::default_seeds;
    use crate::stream::session::SessionOutcome;
    use axum::http::StatusCode;
    use futures::StreamExt;
    use patch_common::PatchEvent;
    use patch_common::sse::parse_frames;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn streaming_headers() {
        let generator = TypewriterGenerator::new(Arc::from("x"), 1, Duration::ZERO);
        let resp = serve(StreamSession::new(generator, CancellationToken::new()));

        assert_eq!(resp.status(), StatusCode::OK);
        let headers = resp.headers();
        assert_eq!(headers[header::CONTENT_TYPE], EVENT_STREAM);
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
        assert_eq!(headers[X_ACCEL_BUFFERING], "no");
    }

    #[tokio::test]
    async fn body_carries_every_frame_then_ends() {
        let generator = TypewriterGenerator::new(Arc::from("hey"), 1, Duration::ZERO);
        let resp = serve(StreamSession::new(generator, CancellationToken::new()));

        let body = axum::body::to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        let events: Vec<PatchEvent> = parse_frames(&text)
            .into_iter()
            .map(|frame| PatchEvent::try_from(frame).unwrap())
            .collect();

        assert_eq!(events.len(), 3);
        assert_eq!(events[2].signal_value(CONTENT_SIGNAL), Some(&json!("hey")));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_body_ends_the_session() {
        let session = StreamSession::new(
            TickerGenerator::new(&default_seeds(), UniformWalk::seeded(2.0, 5).unwrap(), Duration::from_secs(1)),
            CancellationToken::new(),
        );
        let (resp, handle) = spawn_session(session);

        let mut stream = resp.into_body().into_data_stream();
        let first = stream.next().await.unwrap().unwrap();
        assert!(first.starts_with(b"event: datastar-patch-signals\n"));
        drop(stream);

        let report = handle.await.unwrap();
        assert_eq!(report.outcome, SessionOutcome::Disconnected);
        assert_eq!(report.events_sent, 1);
    }
}
