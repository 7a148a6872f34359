use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{NewOrder, Order, OrderId, OrderPatch, OrderStatus};
use crate::error::LedgerError;

impl Entity for Order {
    type Id = OrderId;
    type CreatePayload = NewOrder;
    type Patch = OrderPatch;
    type Action = (); // No custom actions for orders
    type ActionResult = ();
    type Error = LedgerError;

    fn id(&self) -> &OrderId {
        &self.id
    }

    /// Records a new order as `Pending`, stamping creation and update times.
    fn from_create(id: OrderId, payload: NewOrder) -> Result<Self, LedgerError> {
        let now = Utc::now();
        Ok(Self {
            id,
            customer: payload.customer,
            delivery: payload.delivery,
            items: payload.items,
            total: payload.total,
            note: payload.note,
            status: OrderStatus::Pending,
            user_id: payload.user_id,
            created_at: now,
            updated_at: now,
        })
    }

    fn not_found(id: &OrderId) -> LedgerError {
        LedgerError::NotFound(id.clone())
    }

    /// Status is the only mutable field of a placed order.
    fn on_update(&mut self, patch: OrderPatch) -> Result<(), LedgerError> {
        self.status = patch.status;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), LedgerError> {
        Ok(())
    }
}
