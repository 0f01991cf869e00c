pub mod actor;
pub mod branch;
pub mod order;
pub mod worker;
