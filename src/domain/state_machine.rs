use super::order::{Order, OrderStatus};
use super::ports::OrderStoreArc;
use crate::error::{PaymentError, Result};

/// Returns `Ok` only while the order is still NEW.
///
/// Every mutation path (item update, delete, settlement) must pass through
/// this check before touching the order.
pub fn require_new(order: &Order) -> Result<()> {
    if order.status == OrderStatus::New {
        Ok(())
    } else {
        Err(PaymentError::InvalidState {
            id: order.id,
            status: order.status,
        })
    }
}

/// Enforces the order lifecycle: the only legal transitions are
/// NEW → PAID and NEW → FAILED_PAYMENT, and both are irreversible.
///
/// Transitions are persisted through the store's conditional write, so two
/// racing settlements cannot both succeed: the loser observes a conflict and
/// the record keeps the first writer's status.
pub struct OrderStateMachine {
    store: OrderStoreArc,
}

impl OrderStateMachine {
    pub fn new(store: OrderStoreArc) -> Self {
        Self { store }
    }

    /// Moves a NEW order into the given terminal status and persists it.
    ///
    /// A second transition attempt on an already-settled order fails with
    /// `InvalidState` and has no effect on the stored record.
    pub async fn transition(&self, mut order: Order, target: OrderStatus) -> Result<Order> {
        if !target.is_terminal() {
            return Err(PaymentError::Validation(format!(
                "{target} is not a terminal status"
            )));
        }
        require_new(&order)?;
        order.status = target;
        self.store.save_if_status(order, OrderStatus::New).await
    }
}
