use serde::{Deserialize, Serialize};

/// The role a caller acts under. Every mutating operation takes this
/// explicitly; nothing is inferred from the transport.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActorRole {
    Customer,
    Branch,
    Admin,
    Delivery,
}

impl ActorRole {
    /// Branch staff and admins share the kitchen-side permissions.
    pub fn is_staff(&self) -> bool {
        matches!(self, ActorRole::Branch | ActorRole::Admin)
    }
}
