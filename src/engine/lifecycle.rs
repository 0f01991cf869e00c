use chrono::{DateTime, Duration, Utc};

use crate::error::AppError;
use crate::models::actor::ActorRole;
use crate::models::order::{DeliveryType, Order, OrderStatus, PaymentMethod};

/// Forward transitions per source status. Everything else is invalid.
///
/// `Ready -> Dispatched` appears here but is reachable only through the
/// dispatch hand-off, never through a bare `advance` call.
pub fn allowed_targets(from: OrderStatus) -> &'static [OrderStatus] {
    use OrderStatus::*;
    match from {
        Pending => &[Confirmed, Preparing, Rejected],
        Confirmed => &[Preparing, Rejected],
        Preparing => &[Ready, Rejected],
        Ready => &[Dispatched, Rejected],
        Dispatched => &[Delivered],
        Delivered | Rejected | Cancelled => &[],
    }
}

fn role_may_target(target: OrderStatus, role: ActorRole) -> bool {
    use OrderStatus::*;
    match target {
        Confirmed | Preparing | Ready | Rejected => role.is_staff(),
        Delivered => role == ActorRole::Delivery || role.is_staff(),
        // Only via assign_for_dispatch / cancel, never through advance.
        Dispatched | Pending | Cancelled => false,
    }
}

/// Move an order one step along the lifecycle.
///
/// Checks, in order: the transition table, the actor's role, the transfer
/// payment gate, and the ready-needs-a-worker rule for delivery orders.
pub fn advance(order: &mut Order, target: OrderStatus, role: ActorRole) -> Result<(), AppError> {
    let from = order.status;

    if !allowed_targets(from).contains(&target) {
        return Err(AppError::InvalidTransition {
            from: from.as_label(),
            to: target.as_label(),
        });
    }

    if target == OrderStatus::Dispatched {
        // Dispatch carries a worker assignment with it; a bare status write
        // would leave the order in transit with nobody attached.
        return Err(AppError::InvalidTransition {
            from: from.as_label(),
            to: target.as_label(),
        });
    }

    if !role_may_target(target, role) {
        return Err(AppError::NotAuthorized(format!(
            "role {role:?} may not set status {}",
            target.as_label()
        )));
    }

    if from == OrderStatus::Pending && order.payment_gated() {
        return Err(AppError::PaymentNotApproved);
    }

    if target == OrderStatus::Ready
        && order.delivery_type == DeliveryType::Delivery
        && order.delivery_id.is_none()
    {
        return Err(AppError::Conflict(
            "delivery order needs an assigned worker before ready".to_string(),
        ));
    }

    order.status = target;
    Ok(())
}

/// Admin confirmation that a transfer payment was received. Lifts the
/// payment gate without touching the status.
pub fn approve_payment(order: &mut Order, role: ActorRole) -> Result<(), AppError> {
    if role != ActorRole::Admin {
        return Err(AppError::NotAuthorized(
            "only an admin may approve a transfer payment".to_string(),
        ));
    }

    if order.payment_method != PaymentMethod::Transfer {
        return Err(AppError::BadRequest(
            "cash orders do not require payment approval".to_string(),
        ));
    }

    order.admin_approved = true;
    Ok(())
}

/// Customer-initiated cancellation, allowed only shortly after creation and
/// only before the kitchen starts.
pub fn cancel(
    order: &mut Order,
    role: ActorRole,
    now: DateTime<Utc>,
    window: Duration,
) -> Result<(), AppError> {
    if role != ActorRole::Customer {
        return Err(AppError::NotAuthorized(
            "only the customer may cancel an order".to_string(),
        ));
    }

    if !matches!(order.status, OrderStatus::Pending | OrderStatus::Confirmed) {
        return Err(AppError::InvalidTransition {
            from: order.status.as_label(),
            to: OrderStatus::Cancelled.as_label(),
        });
    }

    if now - order.created_at > window {
        return Err(AppError::Conflict(
            "cancellation window has closed".to_string(),
        ));
    }

    order.status = OrderStatus::Cancelled;
    Ok(())
}
