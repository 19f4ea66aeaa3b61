//! User-facing notices
//!
//! Some dispatch failures are worth telling the person who triggered the
//! change about, not only the log. The dispatcher hands those messages to a
//! [`NoticeSink`].

pub trait NoticeSink: Send + Sync {
    fn notice(&self, message: &str);
}

/// Drops every notice
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotices;

impl NoticeSink for SilentNotices {
    fn notice(&self, _message: &str) {}
}
