use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::item::{LineItem, LineRequest};
use crate::domain::store::Segment;
use crate::pagination::Pagination;

/// Lifecycle states of a delivery/pickup order.
///
/// The flow is `novo → separando → saiu → entregue`; skipping ahead is
/// allowed, moving backwards is not, and `cancelado` is reachable from any
/// non-terminal state. Delivery on `entregue` converts the order into a sale.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Novo,
    Separando,
    Saiu,
    Entregue,
    Cancelado,
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Novo
    }
}

impl OrderStatus {
    /// Statuses counted as "still pending" on the dashboard.
    pub const OPEN: [OrderStatus; 3] = [Self::Novo, Self::Separando, Self::Saiu];

    /// Parses user input. Depots say "preparo" where deliveries say
    /// "separando"; both spell the same state. Anything else is rejected.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "novo" => Some(Self::Novo),
            "separando" | "preparo" => Some(Self::Separando),
            "saiu" => Some(Self::Saiu),
            "entregue" => Some(Self::Entregue),
            "cancelado" => Some(Self::Cancelado),
            _ => None,
        }
    }

    /// Canonical stored value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Novo => "novo",
            Self::Separando => "separando",
            Self::Saiu => "saiu",
            Self::Entregue => "entregue",
            Self::Cancelado => "cancelado",
        }
    }

    /// Segment-appropriate label for the picking state.
    pub fn label(self, segment: Segment) -> &'static str {
        match (self, segment) {
            (Self::Separando, Segment::Deposito | Segment::Bar) => "preparo",
            _ => self.as_str(),
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Entregue | Self::Cancelado)
    }

    fn rank(self) -> u8 {
        match self {
            Self::Novo => 0,
            Self::Separando => 1,
            Self::Saiu => 2,
            Self::Entregue => 3,
            Self::Cancelado => 4,
        }
    }

    /// Explicit transition table: forward along the fulfillment chain or to
    /// `cancelado`; nothing leaves a terminal state.
    pub fn can_transition(self, to: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match to {
            Self::Cancelado => true,
            Self::Novo => false,
            _ => to.rank() > self.rank(),
        }
    }
}

/// Fallback conversion for values read back from storage. Input coming from
/// users goes through [`OrderStatus::parse`] and is rejected instead.
impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        OrderStatus::parse(value).unwrap_or_default()
    }
}

/// Domain representation of an order belonging to a store.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Order {
    pub id: i32,
    pub store_id: i32,
    /// Sequential document number (`P-000001`). Absent only on rows that
    /// predate numbering.
    pub number: Option<String>,
    pub customer_name: Option<String>,
    pub status: OrderStatus,
    pub total_cents: i64,
    /// Idempotence marker: the sale this order was converted into, once
    /// delivered.
    pub converted_sale_id: Option<i32>,
    pub items: Vec<LineItem>,
    pub created_at: NaiveDateTime,
}

/// Payload required to create an order. Stock is reserved per line at
/// creation time.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub store_id: i32,
    pub customer_name: Option<String>,
    pub lines: Vec<LineRequest>,
}

impl NewOrder {
    pub fn new(store_id: i32, customer_name: Option<String>, lines: Vec<LineRequest>) -> Self {
        Self {
            store_id,
            customer_name,
            lines,
        }
    }
}

/// Query definition used to list orders for a store.
#[derive(Debug, Clone)]
pub struct OrderListQuery {
    pub store_id: i32,
    pub status: Option<OrderStatus>,
    pub pagination: Option<Pagination>,
}

impl OrderListQuery {
    pub fn new(store_id: i32) -> Self {
        Self {
            store_id,
            status: None,
            pagination: None,
        }
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_both_spellings_of_the_picking_state() {
        assert_eq!(OrderStatus::parse("separando"), Some(OrderStatus::Separando));
        assert_eq!(OrderStatus::parse("preparo"), Some(OrderStatus::Separando));
        assert_eq!(OrderStatus::parse(" Entregue "), Some(OrderStatus::Entregue));
        assert_eq!(OrderStatus::parse("despachado"), None);
        assert_eq!(OrderStatus::parse(""), None);
    }

    #[test]
    fn forward_transitions_are_allowed() {
        assert!(OrderStatus::Novo.can_transition(OrderStatus::Separando));
        assert!(OrderStatus::Separando.can_transition(OrderStatus::Saiu));
        assert!(OrderStatus::Saiu.can_transition(OrderStatus::Entregue));
        // Skipping ahead is fine.
        assert!(OrderStatus::Novo.can_transition(OrderStatus::Entregue));
    }

    #[test]
    fn backward_transitions_are_rejected() {
        assert!(!OrderStatus::Saiu.can_transition(OrderStatus::Novo));
        assert!(!OrderStatus::Saiu.can_transition(OrderStatus::Separando));
        assert!(!OrderStatus::Separando.can_transition(OrderStatus::Separando));
    }

    #[test]
    fn cancel_is_reachable_from_any_non_terminal_state() {
        for status in OrderStatus::OPEN {
            assert!(status.can_transition(OrderStatus::Cancelado));
        }
    }

    #[test]
    fn terminal_states_have_no_outgoing_transitions() {
        for to in [
            OrderStatus::Novo,
            OrderStatus::Separando,
            OrderStatus::Saiu,
            OrderStatus::Entregue,
            OrderStatus::Cancelado,
        ] {
            assert!(!OrderStatus::Entregue.can_transition(to));
            assert!(!OrderStatus::Cancelado.can_transition(to));
        }
    }

    #[test]
    fn picking_label_follows_the_segment() {
        assert_eq!(OrderStatus::Separando.label(Segment::Delivery), "separando");
        assert_eq!(OrderStatus::Separando.label(Segment::Deposito), "preparo");
        assert_eq!(OrderStatus::Entregue.label(Segment::Deposito), "entregue");
    }
}
