use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kahawa_core::{
    Audit, Audited, EntityId, UserRef, Validated, Validator, Violation, choices,
};
use kahawa_inventory::{Item, ItemId, Stockroom};
use kahawa_parties::{Customer, CustomerId, Employee, EmployeeId};

use crate::error::OrderError;
use crate::event::{OrderEvent, OrderEventKind};
use crate::order_item::{OrderItem, OrderItemChanges};

/// Order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub EntityId);

impl OrderId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

choices! {
    /// The states of an order.
    pub enum OrderState {
        Approved => ('A', "APPROVED"),
        Canceled => ('C', "CANCELED"),
        Created => ('N', "CREATED"),
        Pending => ('P', "PENDING"),
        Rejected => ('R', "REJECTED"),
    }
}

/// A customer order: a collection of line entries plus a lifecycle state.
///
/// The lifecycle is one-directional:
///
/// * `CREATED` - the initial state; the item list is open for edits.
/// * `PENDING` - complete and waiting for review by an employee; reachable
///   only from `CREATED`, and only with a non-empty item list. The item
///   list can still be edited.
/// * `APPROVED` - reviewed and okayed for delivery; reachable only from
///   `PENDING`. Approval deducts every line's quantity from the inventory
///   and is the only operation that adjusts stock.
/// * `REJECTED` - reviewed and declined; reachable only from `PENDING`.
/// * `CANCELED` - withdrawn from review; reachable from `CREATED` or
///   `PENDING`.
///
/// `APPROVED`, `REJECTED` and `CANCELED` are terminal. Any other attempted
/// transition, and any item-list edit outside `CREATED`/`PENDING`, fails
/// with an operation-forbidden error carrying the state names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    customer: CustomerId,
    /// The user account of the order's customer, captured at creation; the
    /// creator/modifier validation rules compare against it.
    customer_user: UserRef,
    state: OrderState,
    handler: Option<EmployeeId>,
    review_date: Option<DateTime<Utc>>,
    comments: Option<String>,
    items: Vec<OrderItem>,
    audit: Audit,
}

impl Order {
    /// Create a new, empty order for the given customer.
    pub fn for_customer(creator: Option<&UserRef>, customer: &Customer) -> Self {
        Self {
            id: OrderId::new(EntityId::new()),
            customer: customer.id(),
            customer_user: *customer.user(),
            state: OrderState::Created,
            handler: None,
            review_date: None,
            comments: None,
            items: Vec::new(),
            audit: Audit::new(creator),
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn customer(&self) -> CustomerId {
        self.customer
    }

    pub fn customer_user(&self) -> &UserRef {
        &self.customer_user
    }

    pub fn state(&self) -> OrderState {
        self.state
    }

    pub fn handler(&self) -> Option<EmployeeId> {
        self.handler
    }

    pub fn review_date(&self) -> Option<DateTime<Utc>> {
        self.review_date
    }

    pub fn comments(&self) -> Option<&str> {
        self.comments.as_deref()
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn is_approved(&self) -> bool {
        self.state == OrderState::Approved
    }

    pub fn is_canceled(&self) -> bool {
        self.state == OrderState::Canceled
    }

    pub fn is_created(&self) -> bool {
        self.state == OrderState::Created
    }

    pub fn is_pending(&self) -> bool {
        self.state == OrderState::Pending
    }

    pub fn is_rejected(&self) -> bool {
        self.state == OrderState::Rejected
    }

    /// Whether the item list is open for edits: only while the order is in
    /// the `CREATED` or `PENDING` state.
    pub fn can_update_order_items(&self) -> bool {
        self.is_created() || self.is_pending()
    }

    /// The total price of this order: the live sum over the current line
    /// entries, never cached.
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(OrderItem::total_price).sum()
    }

    ////////////////////////////////////////////////////////////////////////
    // Item list accessors
    ////////////////////////////////////////////////////////////////////////

    /// The line entry for the given item, if it is part of this order.
    pub fn get_item(&self, item: ItemId) -> Option<&OrderItem> {
        self.items.iter().find(|line| line.item() == item)
    }

    /// Whether the given item is part of this order's item list.
    pub fn has_item(&self, item: ItemId) -> bool {
        self.get_item(item).is_some()
    }

    ////////////////////////////////////////////////////////////////////////
    // Item list mutators
    ////////////////////////////////////////////////////////////////////////

    /// Add a line entry for `item` to this order.
    ///
    /// Fails with [`OrderError::OutOfStock`] if the item's stock is
    /// depleted. The unit price follows the staff-only pricing rule of
    /// [`OrderItem`]. Duplicate additions of the same item are caught by
    /// the order's whole-object validation, not here.
    pub fn add_item(
        &mut self,
        actor: Option<&UserRef>,
        item: &Item,
        quantity: u32,
        unit_price: Option<Decimal>,
    ) -> Result<OrderItem, OrderError> {
        self.ensure_item_list_open()?;

        if item.is_out_of_stock() {
            return Err(OrderError::OutOfStock {
                item: item.id(),
                name: item.beverage_name().to_string(),
            });
        }

        let line = OrderItem::new(actor, item, quantity, unit_price);
        self.items.push(line.clone());
        Ok(line)
    }

    /// Remove the line entry for `item`, returning it.
    pub fn remove_item(&mut self, item: ItemId) -> Result<OrderItem, OrderError> {
        self.ensure_item_list_open()?;

        match self.items.iter().position(|line| line.item() == item) {
            Some(index) => Ok(self.items.remove(index)),
            None => Err(OrderError::ItemNotInOrder {
                item,
                order: self.id,
            }),
        }
    }

    /// Update the line entry for `item` with the supplied changes.
    ///
    /// Unset fields retain their prior value; a `unit_price` change is
    /// silently dropped unless the actor is staff.
    pub fn update_item(
        &mut self,
        actor: Option<&UserRef>,
        item: ItemId,
        changes: OrderItemChanges,
    ) -> Result<&OrderItem, OrderError> {
        self.ensure_item_list_open()?;

        let order = self.id;
        let line = self
            .items
            .iter_mut()
            .find(|line| line.item() == item)
            .ok_or(OrderError::ItemNotInOrder { item, order })?;
        line.update(actor, changes);
        Ok(&*line)
    }

    fn ensure_item_list_open(&self) -> Result<(), OrderError> {
        if self.can_update_order_items() {
            Ok(())
        } else {
            Err(OrderError::ItemListForbidden {
                current: self.state,
            })
        }
    }

    ////////////////////////////////////////////////////////////////////////
    // State mutators
    ////////////////////////////////////////////////////////////////////////

    /// Mark this order as complete and waiting for review.
    ///
    /// Legal only from `CREATED`, and only with a non-empty item list.
    pub fn mark_ready_for_review(
        &mut self,
        actor: Option<&UserRef>,
    ) -> Result<OrderEvent, OrderError> {
        if !self.is_created() {
            return Err(OrderError::OperationForbidden {
                current: self.state,
                attempted: OrderState::Pending,
            });
        }
        if self.items.is_empty() {
            return Err(OrderError::OrderEmpty { order: self.id });
        }

        self.state = OrderState::Pending;
        self.audit.touch(actor);
        tracing::info!(order = %self.id, "order marked ready for review");

        Ok(OrderEvent::now(self.id, OrderEventKind::Pending))
    }

    /// Approve this order for delivery.
    ///
    /// Legal only from `PENDING` with a non-empty item list. Every line's
    /// quantity is deducted from the stockroom all-or-nothing: the first
    /// item with insufficient stock aborts the whole operation and no stock
    /// changes. On success the reviewing employee is recorded as handler,
    /// the review date is set and the comments (if any) are stored.
    ///
    /// This is the only operation that results in stock adjustments.
    pub fn approve(
        &mut self,
        employee: &Employee,
        comments: Option<String>,
        stock: &mut Stockroom,
    ) -> Result<OrderEvent, OrderError> {
        if !self.is_pending() {
            return Err(OrderError::OperationForbidden {
                current: self.state,
                attempted: OrderState::Approved,
            });
        }
        if self.items.is_empty() {
            return Err(OrderError::OrderEmpty { order: self.id });
        }

        let demands: Vec<(ItemId, i64)> = self
            .items
            .iter()
            .map(|line| (line.item(), i64::from(line.quantity())))
            .collect();
        stock.deduct_all(employee.user(), &demands)?;

        self.state = OrderState::Approved;
        self.handler = Some(employee.id());
        self.review_date = Some(Utc::now());
        self.comments = comments;
        self.audit.touch(Some(employee.user()));
        tracing::info!(order = %self.id, handler = %employee.id(), "order approved");

        Ok(OrderEvent::now(self.id, OrderEventKind::Approved))
    }

    /// Reject this order.
    ///
    /// Legal only from `PENDING`. The reviewing employee must explain the
    /// rejection: blank comments fail with [`OrderError::CommentsRequired`].
    pub fn reject(&mut self, employee: &Employee, comments: &str) -> Result<OrderEvent, OrderError> {
        if !self.is_pending() {
            return Err(OrderError::OperationForbidden {
                current: self.state,
                attempted: OrderState::Rejected,
            });
        }
        if comments.trim().is_empty() {
            return Err(OrderError::CommentsRequired);
        }

        self.state = OrderState::Rejected;
        self.handler = Some(employee.id());
        self.review_date = Some(Utc::now());
        self.comments = Some(comments.to_string());
        self.audit.touch(Some(employee.user()));
        tracing::info!(order = %self.id, handler = %employee.id(), "order rejected");

        Ok(OrderEvent::now(self.id, OrderEventKind::Rejected))
    }

    /// Cancel this order.
    ///
    /// Legal from `CREATED` or `PENDING`. Comments are stored if given.
    pub fn cancel(
        &mut self,
        actor: Option<&UserRef>,
        comments: Option<String>,
    ) -> Result<OrderEvent, OrderError> {
        if !(self.is_created() || self.is_pending()) {
            return Err(OrderError::OperationForbidden {
                current: self.state,
                attempted: OrderState::Canceled,
            });
        }

        self.state = OrderState::Canceled;
        if comments.is_some() {
            self.comments = comments;
        }
        self.audit.touch(actor);
        tracing::info!(order = %self.id, "order canceled");

        Ok(OrderEvent::now(self.id, OrderEventKind::Canceled))
    }
}

impl Audited for Order {
    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }
}

impl Validated for Order {
    fn validator() -> Validator<Self> {
        Validator::new()
            .non_editable_field("created_by", |order: &Order| {
                match order.audit.created_by() {
                    Some(creator)
                        if !creator.is_staff()
                            && creator.id() != order.customer_user.id() =>
                    {
                        Err(Violation::invalid(
                            "Only staff users or the customer to be associated with \
                             this order can add the order.",
                        ))
                    }
                    _ => Ok(()),
                }
            })
            .non_editable_field("updated_by", |order: &Order| {
                match order.audit.updated_by() {
                    Some(modifier)
                        if !modifier.is_staff()
                            && modifier.id() != order.customer_user.id() =>
                    {
                        Err(Violation::invalid(
                            "Only staff users or the user associated with an order's \
                             customer can modify the order's details.",
                        ))
                    }
                    _ => Ok(()),
                }
            })
            .object(|order: &Order| {
                let mut violations = Vec::new();
                let mut seen = std::collections::HashSet::new();

                for line in &order.items {
                    if !seen.insert(line.item()) {
                        violations.push(Violation::invalid(format!(
                            "the order already contains an entry for item {}; at most \
                             one order item per item is allowed",
                            line.item()
                        )));
                    }
                    if let Some(creator) = line.audit().created_by() {
                        if !creator.is_staff() && creator.id() != order.customer_user.id() {
                            violations.push(Violation::invalid(
                                "Only staff users or the customer to be associated with \
                                 an order-item's order can add the order-item.",
                            ));
                        }
                    }
                    if let Some(modifier) = line.audit().updated_by() {
                        if !modifier.is_staff() && modifier.id() != order.customer_user.id() {
                            violations.push(Violation::invalid(
                                "Only staff users or the customer associated with an \
                                 order-item's order can modify the order-item's details.",
                            ));
                        }
                    }
                }

                violations
            })
    }
}

impl core::fmt::Display for Order {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.customer, self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kahawa_core::{UserId, ValidationConfig};
    use kahawa_inventory::NewItem;
    use kahawa_parties::Gender;
    use proptest::prelude::*;

    fn customer() -> Customer {
        Customer::new(
            None,
            "Wanjiku",
            None,
            "+254700000001",
            UserRef::regular(UserId::new()),
        )
    }

    fn employee() -> Employee {
        Employee::new(
            None,
            "Otieno",
            Gender::Male,
            UserRef::staff(UserId::new()),
        )
    }

    fn stocked_item(name: &str, on_hand: i64, price: Decimal) -> Item {
        Item::new(
            Some(&UserRef::staff(UserId::new())),
            NewItem {
                beverage_name: name.into(),
                on_hand,
                price,
                warn_limit: 3,
                ..NewItem::default()
            },
        )
    }

    fn pending_order(customer: &Customer, item: &Item, quantity: u32) -> Order {
        let user = *customer.user();
        let mut order = Order::for_customer(Some(&user), customer);
        order.add_item(Some(&user), item, quantity, None).unwrap();
        order.mark_ready_for_review(Some(&user)).unwrap();
        order
    }

    #[test]
    fn new_orders_start_created_and_empty() {
        let customer = customer();
        let order = Order::for_customer(Some(customer.user()), &customer);

        assert!(order.is_created());
        assert!(order.items().is_empty());
        assert_eq!(order.total_price(), Decimal::ZERO);
        assert_eq!(order.handler(), None);
        assert_eq!(order.review_date(), None);
    }

    #[test]
    fn added_item_round_trips_through_get_item() {
        let customer = customer();
        let user = *customer.user();
        let item = stocked_item("Latte", 100, Decimal::new(450, 2));
        let mut order = Order::for_customer(Some(&user), &customer);

        order.add_item(Some(&user), &item, 2, None).unwrap();

        assert!(order.has_item(item.id()));
        let line = order.get_item(item.id()).unwrap();
        assert_eq!(line.item(), item.id());
        assert_eq!(line.quantity(), 2);
        assert_eq!(line.unit_price(), Decimal::new(450, 2));
    }

    #[test]
    fn add_item_fails_for_depleted_stock() {
        let customer = customer();
        let user = *customer.user();
        let item = stocked_item("Latte", 0, Decimal::new(450, 2));
        let mut order = Order::for_customer(Some(&user), &customer);

        let err = order.add_item(Some(&user), &item, 1, None).unwrap_err();

        assert!(matches!(err, OrderError::OutOfStock { .. }));
        assert!(order.items().is_empty());
    }

    #[test]
    fn remove_item_returns_the_deleted_line() {
        let customer = customer();
        let user = *customer.user();
        let item = stocked_item("Latte", 100, Decimal::new(450, 2));
        let mut order = Order::for_customer(Some(&user), &customer);
        order.add_item(Some(&user), &item, 2, None).unwrap();

        let removed = order.remove_item(item.id()).unwrap();

        assert_eq!(removed.item(), item.id());
        assert!(!order.has_item(item.id()));
    }

    #[test]
    fn removing_an_absent_item_fails() {
        let customer = customer();
        let mut order = Order::for_customer(Some(customer.user()), &customer);
        let ghost = ItemId::new(EntityId::new());

        let err = order.remove_item(ghost).unwrap_err();

        assert_eq!(
            err,
            OrderError::ItemNotInOrder {
                item: ghost,
                order: order.id(),
            }
        );
    }

    #[test]
    fn update_item_applies_only_supplied_fields() {
        let customer = customer();
        let user = *customer.user();
        let item = stocked_item("Latte", 100, Decimal::new(450, 2));
        let mut order = Order::for_customer(Some(&user), &customer);
        order.add_item(Some(&user), &item, 2, None).unwrap();

        let line = order
            .update_item(
                Some(&user),
                item.id(),
                OrderItemChanges {
                    quantity: Some(5),
                    unit_price: None,
                },
            )
            .unwrap();

        assert_eq!(line.quantity(), 5);
        assert_eq!(line.unit_price(), Decimal::new(450, 2));
    }

    #[test]
    fn total_price_is_the_live_sum_over_lines() {
        let customer = customer();
        let user = *customer.user();
        let latte = stocked_item("Latte", 100, Decimal::new(450, 2));
        let chai = stocked_item("Chai", 100, Decimal::new(200, 2));
        let mut order = Order::for_customer(Some(&user), &customer);

        order.add_item(Some(&user), &latte, 2, None).unwrap();
        order.add_item(Some(&user), &chai, 3, None).unwrap();
        assert_eq!(order.total_price(), Decimal::new(1500, 2));

        order.remove_item(chai.id()).unwrap();
        assert_eq!(order.total_price(), Decimal::new(900, 2));
    }

    #[test]
    fn marking_an_empty_order_ready_fails() {
        let customer = customer();
        let user = *customer.user();
        let mut order = Order::for_customer(Some(&user), &customer);

        let err = order.mark_ready_for_review(Some(&user)).unwrap_err();

        assert_eq!(
            err,
            OrderError::OrderEmpty {
                order: order.id()
            }
        );
        assert!(order.is_created());
    }

    #[test]
    fn mark_ready_transitions_to_pending_and_reports_it() {
        let customer = customer();
        let user = *customer.user();
        let item = stocked_item("Latte", 100, Decimal::new(450, 2));
        let mut order = Order::for_customer(Some(&user), &customer);
        order.add_item(Some(&user), &item, 1, None).unwrap();

        let event = order.mark_ready_for_review(Some(&user)).unwrap();

        assert!(order.is_pending());
        assert_eq!(event.order(), order.id());
        assert_eq!(event.kind(), OrderEventKind::Pending);
    }

    #[test]
    fn approve_deducts_stock_and_records_the_review() {
        let customer = customer();
        let employee = employee();
        let item = stocked_item("Latte", 1000, Decimal::new(450, 2));
        let mut stock = Stockroom::new();
        let item_id = stock.insert(item.clone());
        let mut order = pending_order(&customer, &item, 50);

        let event = order.approve(&employee, None, &mut stock).unwrap();

        assert!(order.is_approved());
        assert_eq!(stock.get(item_id).unwrap().on_hand(), 950);
        assert_eq!(order.handler(), Some(employee.id()));
        assert!(order.review_date().is_some());
        assert_eq!(event.kind(), OrderEventKind::Approved);
    }

    #[test]
    fn approve_is_all_or_nothing_across_lines() {
        let customer = customer();
        let user = *customer.user();
        let employee = employee();
        let latte = stocked_item("Latte", 100, Decimal::new(450, 2));
        let chai = stocked_item("Chai", 5, Decimal::new(200, 2));
        let mut stock = Stockroom::new();
        stock.insert(latte.clone());
        stock.insert(chai.clone());

        let mut order = Order::for_customer(Some(&user), &customer);
        order.add_item(Some(&user), &latte, 40, None).unwrap();
        order.add_item(Some(&user), &chai, 10, None).unwrap();
        order.mark_ready_for_review(Some(&user)).unwrap();

        let err = order.approve(&employee, None, &mut stock).unwrap_err();

        assert!(matches!(err, OrderError::Stock(_)));
        assert!(order.is_pending());
        assert_eq!(stock.get(latte.id()).unwrap().on_hand(), 100);
        assert_eq!(stock.get(chai.id()).unwrap().on_hand(), 5);
    }

    #[test]
    fn approve_fails_when_the_item_list_was_emptied_while_pending() {
        let customer = customer();
        let user = *customer.user();
        let employee = employee();
        let item = stocked_item("Latte", 100, Decimal::new(450, 2));
        let mut stock = Stockroom::new();
        stock.insert(item.clone());

        // The item list is still editable while pending, so an order can
        // arrive at review with no lines left.
        let mut order = pending_order(&customer, &item, 1);
        order.remove_item(item.id()).unwrap();

        let err = order.approve(&employee, None, &mut stock).unwrap_err();

        assert_eq!(
            err,
            OrderError::OrderEmpty {
                order: order.id()
            }
        );
        assert!(order.is_pending());
    }

    #[test]
    fn approve_requires_the_pending_state() {
        let customer = customer();
        let employee = employee();
        let mut stock = Stockroom::new();
        let mut order = Order::for_customer(Some(customer.user()), &customer);

        let err = order.approve(&employee, None, &mut stock).unwrap_err();

        assert_eq!(
            err,
            OrderError::OperationForbidden {
                current: OrderState::Created,
                attempted: OrderState::Approved,
            }
        );
    }

    #[test]
    fn reject_requires_comments() {
        let customer = customer();
        let employee = employee();
        let item = stocked_item("Latte", 100, Decimal::new(450, 2));
        let mut order = pending_order(&customer, &item, 1);

        assert_eq!(
            order.reject(&employee, "  ").unwrap_err(),
            OrderError::CommentsRequired
        );
        assert!(order.is_pending());

        let event = order.reject(&employee, "out of delivery range").unwrap();
        assert!(order.is_rejected());
        assert_eq!(order.comments(), Some("out of delivery range"));
        assert_eq!(order.handler(), Some(employee.id()));
        assert_eq!(event.kind(), OrderEventKind::Rejected);
    }

    #[test]
    fn cancel_works_from_created_and_pending_only() {
        let customer = customer();
        let user = *customer.user();
        let item = stocked_item("Latte", 100, Decimal::new(450, 2));

        let mut created = Order::for_customer(Some(&user), &customer);
        assert!(created.cancel(Some(&user), None).is_ok());

        let mut pending = pending_order(&customer, &item, 1);
        let event = pending
            .cancel(Some(&user), Some("changed my mind".into()))
            .unwrap();
        assert!(pending.is_canceled());
        assert_eq!(pending.comments(), Some("changed my mind"));
        assert_eq!(event.kind(), OrderEventKind::Canceled);
    }

    #[test]
    fn canceling_an_approved_order_is_forbidden() {
        let customer = customer();
        let user = *customer.user();
        let employee = employee();
        let item = stocked_item("Latte", 100, Decimal::new(450, 2));
        let mut stock = Stockroom::new();
        stock.insert(item.clone());
        let mut order = pending_order(&customer, &item, 1);
        order.approve(&employee, None, &mut stock).unwrap();

        let err = order.cancel(Some(&user), None).unwrap_err();

        assert_eq!(
            err,
            OrderError::OperationForbidden {
                current: OrderState::Approved,
                attempted: OrderState::Canceled,
            }
        );
        assert!(order.is_approved());
    }

    #[test]
    fn item_list_is_frozen_in_every_terminal_state() {
        let customer = customer();
        let user = *customer.user();
        let employee = employee();
        let item = stocked_item("Latte", 100, Decimal::new(450, 2));
        let mut stock = Stockroom::new();
        stock.insert(item.clone());

        let mut approved = pending_order(&customer, &item, 1);
        approved.approve(&employee, None, &mut stock).unwrap();
        let mut rejected = pending_order(&customer, &item, 1);
        rejected.reject(&employee, "no").unwrap();
        let mut canceled = pending_order(&customer, &item, 1);
        canceled.cancel(Some(&user), None).unwrap();

        for order in [&mut approved, &mut rejected, &mut canceled] {
            let state = order.state();
            assert!(!order.can_update_order_items());
            assert_eq!(
                order.add_item(Some(&user), &item, 1, None).unwrap_err(),
                OrderError::ItemListForbidden { current: state }
            );
            assert!(matches!(
                order.remove_item(item.id()).unwrap_err(),
                OrderError::ItemListForbidden { .. }
            ));
            assert!(matches!(
                order
                    .update_item(Some(&user), item.id(), OrderItemChanges::default())
                    .unwrap_err(),
                OrderError::ItemListForbidden { .. }
            ));
        }
    }

    #[test]
    fn duplicate_lines_fail_whole_object_validation() {
        let customer = customer();
        let user = *customer.user();
        let item = stocked_item("Latte", 100, Decimal::new(450, 2));
        let mut order = Order::for_customer(Some(&user), &customer);

        order.add_item(Some(&user), &item, 1, None).unwrap();
        order.add_item(Some(&user), &item, 2, None).unwrap();

        let errors = order
            .validate(&ValidationConfig::default(), &[])
            .unwrap_err();
        assert_eq!(errors.object_errors().len(), 1);
    }

    #[test]
    fn lines_added_by_a_stranger_fail_whole_object_validation() {
        let customer = customer();
        let stranger = UserRef::regular(UserId::new());
        let item = stocked_item("Latte", 100, Decimal::new(450, 2));
        let mut order = Order::for_customer(Some(customer.user()), &customer);

        order.add_item(Some(&stranger), &item, 1, None).unwrap();

        let errors = order
            .validate(&ValidationConfig::default(), &[])
            .unwrap_err();
        assert_eq!(errors.object_errors().len(), 1);
    }

    proptest! {
        /// Approval succeeds exactly when every line's quantity fits the
        /// matching item's stock; on failure nothing changes.
        #[test]
        fn approve_outcome_matches_stock_fit(
            on_hand_a in 0i64..50,
            on_hand_b in 0i64..50,
            qty_a in 1u32..50,
            qty_b in 1u32..50,
        ) {
            let customer = customer();
            let user = *customer.user();
            let employee = employee();
            let a = stocked_item("Latte", on_hand_a, Decimal::new(450, 2));
            let b = stocked_item("Chai", on_hand_b, Decimal::new(200, 2));
            let mut stock = Stockroom::new();
            stock.insert(a.clone());
            stock.insert(b.clone());

            let mut order = Order::for_customer(Some(&user), &customer);
            // Depleted items cannot even be added; skip those runs.
            prop_assume!(on_hand_a > 0 && on_hand_b > 0);
            order.add_item(Some(&user), &a, qty_a, None).unwrap();
            order.add_item(Some(&user), &b, qty_b, None).unwrap();
            order.mark_ready_for_review(Some(&user)).unwrap();

            let fits = i64::from(qty_a) <= on_hand_a && i64::from(qty_b) <= on_hand_b;
            match order.approve(&employee, None, &mut stock) {
                Ok(_) => {
                    prop_assert!(fits);
                    prop_assert!(order.is_approved());
                    prop_assert_eq!(
                        stock.get(a.id()).unwrap().on_hand(),
                        on_hand_a - i64::from(qty_a)
                    );
                    prop_assert_eq!(
                        stock.get(b.id()).unwrap().on_hand(),
                        on_hand_b - i64::from(qty_b)
                    );
                }
                Err(_) => {
                    prop_assert!(!fits);
                    prop_assert!(order.is_pending());
                    prop_assert_eq!(stock.get(a.id()).unwrap().on_hand(), on_hand_a);
                    prop_assert_eq!(stock.get(b.id()).unwrap().on_hand(), on_hand_b);
                }
            }
        }
    }
}
