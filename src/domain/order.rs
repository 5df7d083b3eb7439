use crate::error::PaymentError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Globally unique order identifier, assigned once at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Order lifecycle status.
///
/// `New` is the sole initial state. `Paid` and `FailedPayment` are terminal:
/// no transition leads out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    New,
    Paid,
    FailedPayment,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::New)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::New => "NEW",
            Self::Paid => "PAID",
            Self::FailedPayment => "FAILED_PAYMENT",
        };
        f.write_str(s)
    }
}

/// A line item, owned exclusively by its order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub sku: String,
    pub qty: u32,
    pub unit_price: Decimal,
}

impl OrderItem {
    pub fn new(
        sku: impl Into<String>,
        qty: u32,
        unit_price: Decimal,
    ) -> Result<Self, PaymentError> {
        let sku = sku.into();
        if sku.trim().is_empty() {
            return Err(PaymentError::Validation("item sku must not be blank".into()));
        }
        if qty < 1 {
            return Err(PaymentError::Validation("item qty must be at least 1".into()));
        }
        if unit_price < Decimal::ZERO {
            return Err(PaymentError::Validation(
                "item unit price must not be negative".into(),
            ));
        }
        Ok(Self {
            sku,
            qty,
            unit_price,
        })
    }

    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.qty) * self.unit_price
    }
}

/// A customer purchase request, the unit of payment settlement.
///
/// `total` always equals the sum of `qty * unit_price` over `items`; it is
/// recomputed on every mutation, never derived lazily elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: String,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub status: OrderStatus,
}

impl Order {
    pub fn new(
        customer_id: impl Into<String>,
        items: Vec<OrderItem>,
    ) -> Result<Self, PaymentError> {
        let customer_id = customer_id.into();
        if customer_id.trim().is_empty() {
            return Err(PaymentError::Validation(
                "customer id must not be blank".into(),
            ));
        }
        if items.is_empty() {
            return Err(PaymentError::Validation(
                "order must contain at least one item".into(),
            ));
        }
        let total = calculate_total(&items);
        Ok(Self {
            id: OrderId::new(),
            customer_id,
            items,
            total,
            status: OrderStatus::New,
        })
    }

    /// Replaces the item list and recomputes the total.
    ///
    /// Legality of the mutation (order still NEW) is enforced by the state
    /// machine; this only maintains the total invariant.
    pub fn replace_items(&mut self, items: Vec<OrderItem>) -> Result<(), PaymentError> {
        if items.is_empty() {
            return Err(PaymentError::Validation(
                "order must contain at least one item".into(),
            ));
        }
        self.total = calculate_total(&items);
        self.items = items;
        Ok(())
    }
}

/// Sum of `qty * unit_price` over all items.
pub fn calculate_total(items: &[OrderItem]) -> Decimal {
    items.iter().map(OrderItem::line_total).sum()
}
