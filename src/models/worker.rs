use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum WorkerApproval {
    Pending,
    Approved,
    Rejected,
}

/// A delivery worker registered against a single home branch.
///
/// Workers are never hard-deleted while historical orders reference them;
/// `removed` marks them ineligible instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryWorker {
    pub id: Uuid,
    pub name: String,
    pub approval: WorkerApproval,
    pub branch_id: Uuid,
    pub removed: bool,
    pub created_at: DateTime<Utc>,
}

impl DeliveryWorker {
    pub fn is_eligible(&self) -> bool {
        self.approval == WorkerApproval::Approved && !self.removed
    }
}
