use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Transfer,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeliveryType {
    Pickup,
    Delivery,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Dispatched,
    Delivered,
    Rejected,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Rejected | OrderStatus::Cancelled
        )
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Dispatched => "dispatched",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Rejected => "rejected",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

/// One ordered product line. Immutable once the order is placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: Uuid,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl LineItem {
    pub fn line_total(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    /// Human-readable sequential number, e.g. `FRY-0001`.
    pub number: String,
    pub branch_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub items: Vec<LineItem>,
    pub delivery_fee: f64,
    pub total: f64,
    pub payment_method: PaymentMethod,
    pub delivery_type: DeliveryType,
    pub status: OrderStatus,
    /// Set iff the order has been claimed or handed off to a worker.
    pub delivery_id: Option<Uuid>,
    /// Worker awaiting branch approval; at most one outstanding request.
    pub delivery_requested_by: Option<Uuid>,
    pub request_approved: bool,
    /// Transfer orders start `false` and stay gated until an admin approves.
    pub admin_approved: bool,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Whether this order counts against a worker's active load.
    pub fn is_active_assignment_for(&self, worker_id: Uuid) -> bool {
        self.delivery_id == Some(worker_id)
            && matches!(self.status, OrderStatus::Preparing | OrderStatus::Dispatched)
    }

    /// The transfer-payment gate: true while kitchen progress is blocked.
    pub fn payment_gated(&self) -> bool {
        self.payment_method == PaymentMethod::Transfer && !self.admin_approved
    }
}
