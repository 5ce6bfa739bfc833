//! Order lifecycle events.
//!
//! State mutators return one of these; whoever commits the mutation
//! publishes it afterwards. This replaces implicit persistence hooks with
//! an explicit post-commit fact consumed by collaborators such as the SMS
//! notifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kahawa_events::Event;

use crate::order::OrderId;

/// What happened to the order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderEventKind {
    Created,
    Pending,
    Approved,
    Rejected,
    Canceled,
}

/// A committed order lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEvent {
    order: OrderId,
    kind: OrderEventKind,
    occurred_at: DateTime<Utc>,
}

impl OrderEvent {
    pub fn now(order: OrderId, kind: OrderEventKind) -> Self {
        Self {
            order,
            kind,
            occurred_at: Utc::now(),
        }
    }

    pub fn order(&self) -> OrderId {
        self.order
    }

    pub fn kind(&self) -> OrderEventKind {
        self.kind
    }
}

impl Event for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self.kind {
            OrderEventKind::Created => "shop.order.created",
            OrderEventKind::Pending => "shop.order.pending",
            OrderEventKind::Approved => "shop.order.approved",
            OrderEventKind::Rejected => "shop.order.rejected",
            OrderEventKind::Canceled => "shop.order.canceled",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
