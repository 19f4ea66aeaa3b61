//! Test doubles shared by the unit tests

use std::fmt::{self, Write as _};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

use nexx_core::{Error, Result};

use crate::notice::NoticeSink;
use crate::transport::{OutboundRequest, Transport, TransportResponse};

#[derive(Debug, Clone)]
enum Reply {
    Body(u16, String),
    Fail(String),
    Hang,
}

/// Transport that records every request and answers with a canned reply
pub struct MockTransport {
    reply: Reply,
    calls: Mutex<Vec<OutboundRequest>>,
}

impl MockTransport {
    fn with_reply(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn json(body: &str) -> Arc<Self> {
        Self::with_reply(Reply::Body(200, body.to_string()))
    }

    pub fn status(status: u16, body: &str) -> Arc<Self> {
        Self::with_reply(Reply::Body(status, body.to_string()))
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Self::with_reply(Reply::Fail(message.to_string()))
    }

    pub fn hanging() -> Arc<Self> {
        Self::with_reply(Reply::Hang)
    }

    pub fn calls(&self) -> Vec<OutboundRequest> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, request: &OutboundRequest) -> Result<TransportResponse> {
        self.calls.lock().push(request.clone());

        match &self.reply {
            Reply::Body(status, body) => Ok(TransportResponse {
                status: *status,
                body: Bytes::from(body.clone()),
            }),
            Reply::Fail(message) => Err(Error::Transport(message.clone())),
            Reply::Hang => std::future::pending().await,
        }
    }
}

/// Notice sink that keeps what it was told
#[derive(Default)]
pub struct RecordingNotices {
    notices: Mutex<Vec<String>>,
}

impl RecordingNotices {
    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().clone()
    }
}

impl NoticeSink for RecordingNotices {
    fn notice(&self, message: &str) {
        self.notices.lock().push(message.to_string());
    }
}

/// A log event flattened to its level and rendered fields
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub text: String,
}

/// Tracing layer collecting events for assertions
#[derive(Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl LogCapture {
    /// Install a capturing subscriber for the current thread
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn at(&self, level: Level) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.level == level)
            .cloned()
            .collect()
    }
}

impl<S> Layer<S> for LogCapture
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        self.events.lock().push(CapturedEvent {
            level: *event.metadata().level(),
            text: visitor.text,
        });
    }
}

#[derive(Default)]
struct FieldVisitor {
    text: String,
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        if field.name() == "message" {
            let _ = write!(self.text, "{:?}", value);
        } else {
            let _ = write!(self.text, "{}={:?}", field.name(), value);
        }
    }
}
