//! Live-progress variant of the process endpoint, over Server-Sent Events.
//!
//! The job runs on its own task with a [`ChannelProgress`] sink. The response
//! stream drains progress messages until the sink is dropped, which happens only
//! after `process` returns, then emits exactly one terminal event.

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::process::{request_url, run_job, ProcessRequest, ProcessResponse};
use crate::state::AppState;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use clipdrop_core::AppError;
use clipdrop_processing::ChannelProgress;
use futures::stream::{self, Stream, StreamExt};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

pub const EVENT_PROGRESS: &str = "progress";
pub const EVENT_COMPLETE: &str = "complete";
pub const EVENT_FAILED: &str = "failed";

fn failed_event(error: &HttpAppError) -> Event {
    let body: ErrorResponse = error.body();
    Event::default()
        .event(EVENT_FAILED)
        .json_data(&body)
        .unwrap_or_else(|_| Event::default().event(EVENT_FAILED).data(body.error))
}

type JobOutcome = Result<ProcessResponse, HttpAppError>;

fn terminal_event(outcome: Result<JobOutcome, oneshot::error::RecvError>) -> Event {
    let outcome = outcome.unwrap_or_else(|_| {
        tracing::error!("Processing task ended without reporting a result");
        Err(HttpAppError(AppError::ProcessingFailed))
    });

    match outcome {
        Ok(response) => Event::default()
            .event(EVENT_COMPLETE)
            .json_data(&response)
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Failed to serialize completion event");
                failed_event(&HttpAppError(AppError::ProcessingFailed))
            }),
        Err(error) => failed_event(&error),
    }
}

#[utoipa::path(
    post,
    path = "/api/v0/process/stream",
    tag = "process",
    request_body = ProcessRequest,
    responses(
        (status = 200, description = "`progress` events followed by one `complete` or `failed` event", content_type = "text/event-stream"),
        (status = 400, description = "Invalid URL", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "process_video_stream"))]
pub async fn process_video_stream(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<ProcessRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, HttpAppError> {
    let url = request_url(&request)?;

    let (progress_tx, progress_rx) = mpsc::unbounded_channel::<String>();
    let (result_tx, result_rx) = oneshot::channel();

    tokio::spawn(async move {
        let sink = ChannelProgress::new(progress_tx);
        let outcome = run_job(&state, &url, &sink).await;
        // Close the progress channel before the result is published
        drop(sink);
        if result_tx.send(outcome).is_err() {
            tracing::debug!("Client disconnected before processing finished");
        }
    });

    let progress = stream::unfold(progress_rx, |mut rx| async move {
        rx.recv().await.map(|message| {
            let event = Event::default().event(EVENT_PROGRESS).data(message);
            (event, rx)
        })
    });
    let terminal = stream::once(async move { terminal_event(result_rx.await) });

    let events = progress.chain(terminal).map(Ok::<_, Infallible>);
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
