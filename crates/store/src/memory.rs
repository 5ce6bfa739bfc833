use std::collections::HashMap;

use rust_decimal::Decimal;

use kahawa_core::{UserRef, Validated, ValidationConfig};
use kahawa_events::{EventBus, InMemoryEventBus, Subscription};
use kahawa_inventory::{Item, ItemChanges, ItemId, NewItem, Stockroom};
use kahawa_notify::CustomerDirectory;
use kahawa_orders::{Order, OrderEvent, OrderEventKind, OrderId, OrderItem, OrderItemChanges};
use kahawa_parties::{Customer, CustomerChanges, CustomerId, Employee, EmployeeId, Gender};

use crate::error::StoreError;

/// In-memory store for the whole shop.
///
/// Every mutation works on a clone of the touched entity, validates it
/// under the store's [`ValidationConfig`], and only then commits; an error
/// anywhere leaves the store untouched. Order approval additionally stages
/// the stockroom so the state transition and the stock deductions commit
/// together or not at all.
///
/// Mutations are serialized by `&mut self`; there is no finer-grained
/// locking. Lifecycle events are published to the embedded bus after the
/// commit, best-effort.
#[derive(Debug, Default)]
pub struct MemoryStore {
    validation: ValidationConfig,
    customers: HashMap<CustomerId, Customer>,
    employees: HashMap<EmployeeId, Employee>,
    stock: Stockroom,
    orders: HashMap<OrderId, Order>,
    bus: InMemoryEventBus<OrderEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validation(validation: ValidationConfig) -> Self {
        Self {
            validation,
            ..Self::default()
        }
    }

    /// Subscribe to order lifecycle events published by this store.
    pub fn subscribe(&self) -> Subscription<OrderEvent> {
        self.bus.subscribe()
    }

    ////////////////////////////////////////////////////////////////////////
    // Parties
    ////////////////////////////////////////////////////////////////////////

    pub fn create_customer(
        &mut self,
        creator: Option<&UserRef>,
        name: impl Into<String>,
        address: Option<String>,
        phone_number: impl Into<String>,
        user: UserRef,
    ) -> Result<CustomerId, StoreError> {
        let customer = Customer::new(creator, name, address, phone_number, user);
        customer.validate(&self.validation, &[])?;

        let id = customer.id();
        self.customers.insert(id, customer);
        Ok(id)
    }

    pub fn create_employee(
        &mut self,
        creator: Option<&UserRef>,
        name: impl Into<String>,
        gender: Gender,
        user: UserRef,
    ) -> Result<EmployeeId, StoreError> {
        let employee = Employee::new(creator, name, gender, user);
        employee.validate(&self.validation, &[])?;

        let id = employee.id();
        self.employees.insert(id, employee);
        Ok(id)
    }

    pub fn update_customer(
        &mut self,
        modifier: Option<&UserRef>,
        id: CustomerId,
        changes: CustomerChanges,
    ) -> Result<(), StoreError> {
        let mut customer = self
            .customers
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { entity: "customer" })?;

        customer.update(modifier, changes);
        customer.validate(&self.validation, &[])?;

        self.customers.insert(id, customer);
        Ok(())
    }

    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.get(&id)
    }

    pub fn employee(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.get(&id)
    }

    ////////////////////////////////////////////////////////////////////////
    // Inventory
    ////////////////////////////////////////////////////////////////////////

    pub fn create_item(
        &mut self,
        creator: Option<&UserRef>,
        props: NewItem,
    ) -> Result<ItemId, StoreError> {
        let item = Item::new(creator, props);
        item.validate(&self.validation, &[])?;

        Ok(self.stock.insert(item))
    }

    pub fn update_item(
        &mut self,
        modifier: Option<&UserRef>,
        id: ItemId,
        changes: ItemChanges,
    ) -> Result<(), StoreError> {
        let mut item = self
            .stock
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound { entity: "item" })?;

        item.update(modifier, changes);
        item.validate(&self.validation, &[])?;

        self.stock.insert(item);
        Ok(())
    }

    /// Delete an item that no order references.
    ///
    /// Items referenced by any order line are protected and cannot be
    /// deleted.
    pub fn delete_item(&mut self, id: ItemId) -> Result<Item, StoreError> {
        if self.orders.values().any(|order| order.has_item(id)) {
            return Err(StoreError::ItemInUse { item: id });
        }

        self.stock
            .remove(id)
            .ok_or(StoreError::NotFound { entity: "item" })
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.stock.get(id)
    }

    pub fn stockroom(&self) -> &Stockroom {
        &self.stock
    }

    ////////////////////////////////////////////////////////////////////////
    // Orders
    ////////////////////////////////////////////////////////////////////////

    /// Create a new, empty order for the given customer.
    pub fn place_order(
        &mut self,
        creator: Option<&UserRef>,
        customer: CustomerId,
    ) -> Result<OrderId, StoreError> {
        let customer = self
            .customers
            .get(&customer)
            .ok_or(StoreError::NotFound { entity: "customer" })?;

        let order = Order::for_customer(creator, customer);
        order.validate(&self.validation, &[])?;

        let id = order.id();
        self.orders.insert(id, order);
        self.publish(OrderEvent::now(id, OrderEventKind::Created));
        Ok(id)
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    /// Delete an order; its line entries go with it.
    pub fn delete_order(&mut self, id: OrderId) -> Result<Order, StoreError> {
        self.orders
            .remove(&id)
            .ok_or(StoreError::NotFound { entity: "order" })
    }

    pub fn add_order_item(
        &mut self,
        actor: Option<&UserRef>,
        order_id: OrderId,
        item_id: ItemId,
        quantity: u32,
        unit_price: Option<Decimal>,
    ) -> Result<OrderItem, StoreError> {
        let mut order = self.cloned_order(order_id)?;
        let item = self
            .stock
            .get(item_id)
            .ok_or(StoreError::NotFound { entity: "item" })?;

        let line = order.add_item(actor, item, quantity, unit_price)?;
        order.validate(&self.validation, &[])?;

        self.orders.insert(order_id, order);
        Ok(line)
    }

    pub fn update_order_item(
        &mut self,
        actor: Option<&UserRef>,
        order_id: OrderId,
        item_id: ItemId,
        changes: OrderItemChanges,
    ) -> Result<(), StoreError> {
        let mut order = self.cloned_order(order_id)?;

        order.update_item(actor, item_id, changes)?;
        order.validate(&self.validation, &[])?;

        self.orders.insert(order_id, order);
        Ok(())
    }

    pub fn remove_order_item(
        &mut self,
        order_id: OrderId,
        item_id: ItemId,
    ) -> Result<OrderItem, StoreError> {
        let mut order = self.cloned_order(order_id)?;

        let line = order.remove_item(item_id)?;
        order.validate(&self.validation, &[])?;

        self.orders.insert(order_id, order);
        Ok(line)
    }

    pub fn mark_order_ready(
        &mut self,
        actor: Option<&UserRef>,
        order_id: OrderId,
    ) -> Result<(), StoreError> {
        let mut order = self.cloned_order(order_id)?;

        let event = order.mark_ready_for_review(actor)?;
        order.validate(&self.validation, &[])?;

        self.orders.insert(order_id, order);
        self.publish(event);
        Ok(())
    }

    /// Approve an order within a single logical transaction.
    ///
    /// The order and the stockroom are staged together: the per-line stock
    /// deductions and the state transition commit as one, or not at all.
    pub fn approve_order(
        &mut self,
        employee: EmployeeId,
        order_id: OrderId,
        comments: Option<String>,
    ) -> Result<(), StoreError> {
        let employee = self
            .employees
            .get(&employee)
            .cloned()
            .ok_or(StoreError::NotFound { entity: "employee" })?;
        let mut order = self.cloned_order(order_id)?;
        let mut stock = self.stock.clone();

        let event = order.approve(&employee, comments, &mut stock)?;
        order.validate(&self.validation, &[])?;

        self.stock = stock;
        self.orders.insert(order_id, order);
        self.publish(event);
        Ok(())
    }

    pub fn reject_order(
        &mut self,
        employee: EmployeeId,
        order_id: OrderId,
        comments: &str,
    ) -> Result<(), StoreError> {
        let employee = self
            .employees
            .get(&employee)
            .cloned()
            .ok_or(StoreError::NotFound { entity: "employee" })?;
        let mut order = self.cloned_order(order_id)?;

        let event = order.reject(&employee, comments)?;
        order.validate(&self.validation, &[])?;

        self.orders.insert(order_id, order);
        self.publish(event);
        Ok(())
    }

    pub fn cancel_order(
        &mut self,
        actor: Option<&UserRef>,
        order_id: OrderId,
        comments: Option<String>,
    ) -> Result<(), StoreError> {
        let mut order = self.cloned_order(order_id)?;

        let event = order.cancel(actor, comments)?;
        order.validate(&self.validation, &[])?;

        self.orders.insert(order_id, order);
        self.publish(event);
        Ok(())
    }

    fn cloned_order(&self, id: OrderId) -> Result<Order, StoreError> {
        self.orders
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { entity: "order" })
    }

    fn publish(&self, event: OrderEvent) {
        if let Err(error) = self.bus.publish(event) {
            tracing::warn!(?error, "failed to publish order event");
        }
    }
}

impl CustomerDirectory for MemoryStore {
    fn phone_for_order(&self, order: OrderId) -> Option<String> {
        let order = self.orders.get(&order)?;
        let customer = self.customers.get(&order.customer())?;
        Some(customer.phone_number().to_string())
    }
}
