use kahawa_events::Subscription;
use kahawa_orders::{OrderEvent, OrderEventKind, OrderId};

const NEW_ORDER_MSG: &str = "Dear customer, a new order with order no {order}, has been added.";

const ORDER_APPROVED_MSG: &str = "Dear customer, your order with order no {order}, has been \
                                  approved and will be delivered soon.";

const ORDER_CANCELED_MSG: &str =
    "Dear customer, your order with order no {order}, has been canceled.";

const ORDER_PENDING_MSG: &str = "Dear customer, your order with order no {order}, is now \
                                 awaiting review. You can still add, remove or update items \
                                 in the order before it is reviewed.";

const ORDER_REJECTED_MSG: &str = "Dear customer, we regret to inform you that your order with \
                                  order no {order}, was not accepted and thus will not be \
                                  delivered. Visit our site to get more details regarding the \
                                  order's rejection.";

/// Outbound SMS transport. Supplied by the hosting application.
pub trait SmsGateway {
    fn send(&self, phone_number: &str, message: &str) -> anyhow::Result<()>;
}

impl<G> SmsGateway for &G
where
    G: SmsGateway + ?Sized,
{
    fn send(&self, phone_number: &str, message: &str) -> anyhow::Result<()> {
        (**self).send(phone_number, message)
    }
}

/// Resolves the phone number of the customer behind an order.
pub trait CustomerDirectory {
    fn phone_for_order(&self, order: OrderId) -> Option<String>;
}

impl<D> CustomerDirectory for &D
where
    D: CustomerDirectory + ?Sized,
{
    fn phone_for_order(&self, order: OrderId) -> Option<String> {
        (**self).phone_for_order(order)
    }
}

/// Texts customers about order lifecycle transitions.
pub struct OrderSmsNotifier<G, D> {
    gateway: G,
    directory: D,
}

impl<G, D> OrderSmsNotifier<G, D>
where
    G: SmsGateway,
    D: CustomerDirectory,
{
    pub fn new(gateway: G, directory: D) -> Self {
        Self { gateway, directory }
    }

    /// Handle one event: render the message and send it.
    ///
    /// Lookup and transport failures are logged and swallowed; a missed
    /// text must never fail the order mutation that was already committed.
    pub fn handle(&self, event: &OrderEvent) {
        let order = event.order();
        let Some(phone_number) = self.directory.phone_for_order(order) else {
            tracing::error!(%order, "no customer phone number found, cannot send sms notification");
            return;
        };

        let message = render(event);
        if let Err(error) = self.gateway.send(&phone_number, &message) {
            tracing::error!(%order, %error, "unable to send sms notification");
        }
    }

    /// Drain a subscription until the bus is closed.
    pub fn run(&self, subscription: Subscription<OrderEvent>) {
        while let Ok(event) = subscription.recv() {
            self.handle(&event);
        }
    }
}

fn render(event: &OrderEvent) -> String {
    let template = match event.kind() {
        OrderEventKind::Created => NEW_ORDER_MSG,
        OrderEventKind::Pending => ORDER_PENDING_MSG,
        OrderEventKind::Approved => ORDER_APPROVED_MSG,
        OrderEventKind::Rejected => ORDER_REJECTED_MSG,
        OrderEventKind::Canceled => ORDER_CANCELED_MSG,
    };
    template.replace("{order}", &event.order().to_string())
}
