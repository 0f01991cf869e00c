use uuid::Uuid;

use crate::error::AppError;
use crate::models::actor::ActorRole;
use crate::models::order::{Order, OrderStatus};
use crate::models::worker::DeliveryWorker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// Worker had no active load; the order is theirs immediately.
    Assigned,
    /// Worker already carries at least one order; branch approval required.
    Requested,
}

impl ClaimOutcome {
    pub fn as_label(&self) -> &'static str {
        match self {
            ClaimOutcome::Assigned => "assigned",
            ClaimOutcome::Requested => "requested",
        }
    }
}

fn check_worker(worker: &DeliveryWorker, branch_id: Uuid) -> Result<(), AppError> {
    if !worker.is_eligible() {
        return Err(AppError::WorkerNotEligible(
            "worker is not approved".to_string(),
        ));
    }
    if worker.branch_id != branch_id {
        return Err(AppError::WorkerNotEligible(
            "worker belongs to a different branch".to_string(),
        ));
    }
    Ok(())
}

/// A worker tries to take an order off the kitchen line.
///
/// `active_assignments` is the worker's current load, not counting the order
/// being claimed. Zero means direct assignment; anything more escalates to a
/// pending request the branch must resolve.
///
/// Caller must hold the order's store entry across this call so the
/// check-then-set is atomic against racing claims.
pub fn claim(
    order: &mut Order,
    worker: &DeliveryWorker,
    active_assignments: usize,
) -> Result<ClaimOutcome, AppError> {
    check_worker(worker, order.branch_id)?;

    if order.status != OrderStatus::Preparing {
        return Err(AppError::Conflict(format!(
            "order is {}, only preparing orders can be claimed",
            order.status.as_label()
        )));
    }

    if order.delivery_id.is_some() || order.delivery_requested_by.is_some() {
        return Err(AppError::AlreadyClaimed);
    }

    if active_assignments == 0 {
        order.delivery_id = Some(worker.id);
        Ok(ClaimOutcome::Assigned)
    } else {
        order.delivery_requested_by = Some(worker.id);
        order.request_approved = false;
        Ok(ClaimOutcome::Requested)
    }
}

/// Branch decision on an escalated claim request.
///
/// Approval hands the order to the requester; rejection clears the request
/// so any eligible worker may try again. Resolving when nothing is pending
/// is an error, not a no-op, so UI races surface.
pub fn resolve_request(order: &mut Order, approve: bool, role: ActorRole) -> Result<(), AppError> {
    if !role.is_staff() {
        return Err(AppError::NotAuthorized(
            "only branch staff or an admin may resolve a claim request".to_string(),
        ));
    }

    let Some(requester) = order.delivery_requested_by else {
        return Err(AppError::NoActiveRequest);
    };

    if approve {
        order.delivery_id = Some(requester);
        order.delivery_requested_by = None;
        order.request_approved = true;
    } else {
        order.delivery_requested_by = None;
        order.request_approved = false;
    }
    Ok(())
}

/// Branch hands a ready order to a worker at the counter, bypassing the
/// claim flow. Assignment and the `ready -> dispatched` step happen
/// together or not at all.
pub fn assign_for_dispatch(
    order: &mut Order,
    worker: &DeliveryWorker,
    role: ActorRole,
) -> Result<(), AppError> {
    if !role.is_staff() {
        return Err(AppError::NotAuthorized(
            "only branch staff or an admin may dispatch an order".to_string(),
        ));
    }

    if !worker.is_eligible() {
        return Err(AppError::WorkerNotEligible(
            "worker is not approved".to_string(),
        ));
    }

    if order.status != OrderStatus::Ready {
        return Err(AppError::InvalidTransition {
            from: order.status.as_label(),
            to: OrderStatus::Dispatched.as_label(),
        });
    }

    order.delivery_id = Some(worker.id);
    order.delivery_requested_by = None;
    order.request_approved = false;
    order.status = OrderStatus::Dispatched;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::order::{DeliveryType, LineItem, PaymentMethod};
    use crate::models::worker::WorkerApproval;

    fn branch_id() -> Uuid {
        Uuid::from_u128(7)
    }

    fn preparing_order() -> Order {
        Order {
            id: Uuid::new_v4(),
            number: "FRY-0002".to_string(),
            branch_id: branch_id(),
            customer_id: None,
            items: vec![LineItem {
                product_id: Uuid::new_v4(),
                name: "bucket".to_string(),
                quantity: 1,
                unit_price: 12.0,
            }],
            delivery_fee: 2.0,
            total: 14.0,
            payment_method: PaymentMethod::Cash,
            delivery_type: DeliveryType::Delivery,
            status: OrderStatus::Preparing,
            delivery_id: None,
            delivery_requested_by: None,
            request_approved: false,
            admin_approved: true,
            created_at: Utc::now(),
        }
    }

    fn worker(id_seed: u128, approval: WorkerApproval) -> DeliveryWorker {
        DeliveryWorker {
            id: Uuid::from_u128(id_seed),
            name: "test-worker".to_string(),
            approval,
            branch_id: branch_id(),
            removed: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn idle_worker_gets_direct_assignment() {
        let mut o = preparing_order();
        let w = worker(1, WorkerApproval::Approved);

        let outcome = claim(&mut o, &w, 0).unwrap();

        assert_eq!(outcome, ClaimOutcome::Assigned);
        assert_eq!(o.delivery_id, Some(w.id));
        assert_eq!(o.delivery_requested_by, None);
        // Claiming does not advance the order by itself.
        assert_eq!(o.status, OrderStatus::Preparing);
    }

    #[test]
    fn loaded_worker_is_escalated_to_a_request() {
        let mut o = preparing_order();
        let w = worker(1, WorkerApproval::Approved);

        let outcome = claim(&mut o, &w, 1).unwrap();

        assert_eq!(outcome, ClaimOutcome::Requested);
        assert_eq!(o.delivery_id, None);
        assert_eq!(o.delivery_requested_by, Some(w.id));
        assert!(!o.request_approved);
    }

    #[test]
    fn second_claim_on_assigned_order_fails() {
        let mut o = preparing_order();
        let first = worker(1, WorkerApproval::Approved);
        let second = worker(2, WorkerApproval::Approved);

        claim(&mut o, &first, 0).unwrap();
        let err = claim(&mut o, &second, 0).unwrap_err();

        assert!(matches!(err, AppError::AlreadyClaimed));
        assert_eq!(o.delivery_id, Some(first.id));
    }

    #[test]
    fn pending_request_blocks_other_claims() {
        let mut o = preparing_order();
        let loaded = worker(1, WorkerApproval::Approved);
        let idle = worker(2, WorkerApproval::Approved);

        claim(&mut o, &loaded, 2).unwrap();
        let err = claim(&mut o, &idle, 0).unwrap_err();

        assert!(matches!(err, AppError::AlreadyClaimed));
    }

    #[test]
    fn unapproved_or_foreign_workers_are_ineligible() {
        let mut o = preparing_order();

        let pending = worker(1, WorkerApproval::Pending);
        assert!(matches!(
            claim(&mut o, &pending, 0).unwrap_err(),
            AppError::WorkerNotEligible(_)
        ));

        let mut foreign = worker(2, WorkerApproval::Approved);
        foreign.branch_id = Uuid::from_u128(99);
        assert!(matches!(
            claim(&mut o, &foreign, 0).unwrap_err(),
            AppError::WorkerNotEligible(_)
        ));

        let mut removed = worker(3, WorkerApproval::Approved);
        removed.removed = true;
        assert!(matches!(
            claim(&mut o, &removed, 0).unwrap_err(),
            AppError::WorkerNotEligible(_)
        ));
    }

    #[test]
    fn claim_requires_preparing_status() {
        let mut o = preparing_order();
        o.status = OrderStatus::Ready;
        let w = worker(1, WorkerApproval::Approved);

        assert!(matches!(
            claim(&mut o, &w, 0).unwrap_err(),
            AppError::Conflict(_)
        ));
    }

    #[test]
    fn approving_a_request_assigns_the_requester() {
        let mut o = preparing_order();
        let w = worker(1, WorkerApproval::Approved);
        claim(&mut o, &w, 1).unwrap();

        resolve_request(&mut o, true, ActorRole::Branch).unwrap();

        assert_eq!(o.delivery_id, Some(w.id));
        assert_eq!(o.delivery_requested_by, None);
        assert!(o.request_approved);
    }

    #[test]
    fn rejecting_a_request_frees_the_order() {
        let mut o = preparing_order();
        let w = worker(1, WorkerApproval::Approved);
        claim(&mut o, &w, 1).unwrap();

        resolve_request(&mut o, false, ActorRole::Admin).unwrap();

        assert_eq!(o.delivery_id, None);
        assert_eq!(o.delivery_requested_by, None);
        assert!(!o.request_approved);

        // Same worker may try again with a fresh claim.
        let outcome = claim(&mut o, &w, 0).unwrap();
        assert_eq!(outcome, ClaimOutcome::Assigned);
    }

    #[test]
    fn resolving_twice_reports_no_active_request() {
        let mut o = preparing_order();
        let w = worker(1, WorkerApproval::Approved);
        claim(&mut o, &w, 1).unwrap();

        resolve_request(&mut o, true, ActorRole::Branch).unwrap();
        let err = resolve_request(&mut o, true, ActorRole::Branch).unwrap_err();

        assert!(matches!(err, AppError::NoActiveRequest));
    }

    #[test]
    fn delivery_role_may_not_resolve_requests() {
        let mut o = preparing_order();
        let w = worker(1, WorkerApproval::Approved);
        claim(&mut o, &w, 1).unwrap();

        let err = resolve_request(&mut o, true, ActorRole::Delivery).unwrap_err();
        assert!(matches!(err, AppError::NotAuthorized(_)));
        assert_eq!(o.delivery_requested_by, Some(w.id));
    }

    #[test]
    fn dispatch_handoff_assigns_and_advances_together() {
        let mut o = preparing_order();
        o.status = OrderStatus::Ready;
        let w = worker(1, WorkerApproval::Approved);

        assign_for_dispatch(&mut o, &w, ActorRole::Branch).unwrap();

        assert_eq!(o.status, OrderStatus::Dispatched);
        assert_eq!(o.delivery_id, Some(w.id));
        assert_eq!(o.delivery_requested_by, None);
    }

    #[test]
    fn dispatch_requires_ready_status() {
        let mut o = preparing_order();
        let w = worker(1, WorkerApproval::Approved);

        let err = assign_for_dispatch(&mut o, &w, ActorRole::Branch).unwrap_err();

        assert!(matches!(err, AppError::InvalidTransition { .. }));
        assert_eq!(o.status, OrderStatus::Preparing);
        assert_eq!(o.delivery_id, None);
    }

    #[test]
    fn dispatch_is_staff_only() {
        let mut o = preparing_order();
        o.status = OrderStatus::Ready;
        let w = worker(1, WorkerApproval::Approved);

        let err = assign_for_dispatch(&mut o, &w, ActorRole::Delivery).unwrap_err();
        assert!(matches!(err, AppError::NotAuthorized(_)));
    }
}
