pub mod claims;
pub mod hours;
pub mod lifecycle;
