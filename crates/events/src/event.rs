use chrono::{DateTime, Utc};

/// A domain event.
///
/// Events are immutable facts about something that already happened; they
/// are published after the mutation they describe has been committed.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "shop.order.approved").
    fn event_type(&self) -> &'static str;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
