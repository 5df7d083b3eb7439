use crate::domain::order::{Order, OrderId, OrderStatus};
use crate::domain::ports::OrderStoreArc;
use crate::domain::state_machine::{self, OrderStateMachine};
use crate::error::{PaymentError, Result};

/// Applies a settlement result to an order.
///
/// Loads the order, verifies it is still NEW and moves it into the requested
/// terminal status through the state machine's conditional write. Runs inside
/// the pipeline; the store write is its only I/O.
pub struct OutcomeHandler {
    store: OrderStoreArc,
    machine: OrderStateMachine,
}

impl OutcomeHandler {
    pub fn new(store: OrderStoreArc) -> Self {
        let machine = OrderStateMachine::new(store.clone());
        Self { store, machine }
    }

    pub async fn mark_paid(&self, id: OrderId) -> Result<Order> {
        self.settle(id, OrderStatus::Paid).await
    }

    pub async fn mark_failed(&self, id: OrderId) -> Result<Order> {
        self.settle(id, OrderStatus::FailedPayment).await
    }

    async fn settle(&self, id: OrderId, target: OrderStatus) -> Result<Order> {
        let order = self
            .store
            .get(id)
            .await?
            .ok_or(PaymentError::NotFound(id))?;
        state_machine::require_new(&order)?;
        self.machine.transition(order, target).await
    }
}
