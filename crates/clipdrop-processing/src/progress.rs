//! Progress notifications from the coordinator to its caller.
//!
//! A sink receives short human-readable status strings. Delivery is
//! fire-and-forget: the coordinator never waits on a sink, and a sink that
//! panics or whose receiver is gone does not affect processing.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tokio::sync::mpsc::UnboundedSender;

/// Observer for status strings emitted during processing.
pub trait ProgressSink: Send + Sync {
    fn notify(&self, message: &str);
}

/// Sink that discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn notify(&self, _message: &str) {}
}

/// Sink backed by a plain closure.
pub struct FnProgress<F>(pub F);

impl<F> ProgressSink for FnProgress<F>
where
    F: Fn(&str) + Send + Sync,
{
    fn notify(&self, message: &str) {
        (self.0)(message)
    }
}

/// Sink that forwards messages into an unbounded channel.
///
/// Sends never block; once the receiver is dropped messages are discarded.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    sender: UnboundedSender<String>,
}

impl ChannelProgress {
    pub fn new(sender: UnboundedSender<String>) -> Self {
        Self { sender }
    }
}

impl ProgressSink for ChannelProgress {
    fn notify(&self, message: &str) {
        if self.sender.send(message.to_string()).is_err() {
            tracing::debug!(message, "Progress receiver dropped, discarding message");
        }
    }
}

/// Deliver one message, containing any panic raised by the sink.
pub(crate) fn emit(sink: &dyn ProgressSink, message: &str) {
    if catch_unwind(AssertUnwindSafe(|| sink.notify(message))).is_err() {
        tracing::warn!(message, "Progress callback panicked; continuing");
    }
}
