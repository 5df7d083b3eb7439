use crate::domain::order::{OrderId, OrderStatus};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaymentError>;

#[derive(Error, Debug)]
pub enum PaymentError {
    /// Malformed input (bad item data, non-positive payment amount). Fatal,
    /// never retried.
    #[error("validation error: {0}")]
    Validation(String),
    /// Gateway call failed with a non-2xx status or a transport error. The
    /// only retryable class.
    #[error("payment gateway error: {0}")]
    Gateway(String),
    /// A mutation was attempted on an order that is no longer NEW.
    #[error("order {id} is {status}, expected new")]
    InvalidState { id: OrderId, status: OrderStatus },
    #[error("order {0} not found")]
    NotFound(OrderId),
    /// A conditional store write lost the race: the order's status changed
    /// between read and write.
    #[error("concurrent update conflict on order {0}")]
    Conflict(OrderId),
    /// The dispatcher's queue is closed; no more payments can be submitted.
    #[error("payment dispatcher is shut down")]
    DispatcherClosed,
}

impl PaymentError {
    /// Whether the retry policy may re-attempt the failed operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Gateway(_))
    }
}
