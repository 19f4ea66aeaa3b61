//! Nexx Notify - CRUD event notifier for the Nexx video management API
//!
//! Whenever a local actor, channel, tag or video changes, the
//! [`NotificationDispatcher`] informs the remote manage API with one
//! authenticated POST and classifies the outcome:
//!
//! ```text
//! validate -> token + headers -> POST {base}v3/{id}/manage/{kind}/add/ -> classify
//! ```
//!
//! Delivery is best-effort and fire-once: no queue, no retry, no batching.

mod dispatcher;
mod notice;
pub mod token;
mod transport;

#[cfg(test)]
mod test_support;

pub use dispatcher::{NotificationDispatcher, Notifier};
pub use notice::{NoticeSink, SilentNotices};
pub use transport::{HttpTransport, OutboundRequest, Transport, TransportResponse};

pub use nexx_core::types::{
    Command, EntityKind, NotificationRequest, NotificationResult, RawPayload, Values,
};
pub use nexx_core::{Error, Result};
