//! Order status state machine.

use serde::{Deserialize, Serialize};

/// The status of an order in its lifecycle.
///
/// Transitions are monotonic:
/// ```text
/// Created ──assign──► Assigned ──complete──► Completed
/// ```
/// No reverse or skip transitions exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order exists and awaits a courier.
    #[default]
    Created,

    /// A courier is carrying the order.
    Assigned,

    /// The order was delivered (terminal).
    Completed,
}

impl OrderStatus {
    /// Returns true if the order can be assigned to a courier.
    pub fn can_assign(&self) -> bool {
        matches!(self, OrderStatus::Created)
    }

    /// Returns true if the order can be completed.
    pub fn can_complete(&self) -> bool {
        matches!(self, OrderStatus::Assigned)
    }

    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "Created",
            OrderStatus::Assigned => "Assigned",
            OrderStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
