//! Location sources for new orders.

pub mod geo;
pub mod location;
