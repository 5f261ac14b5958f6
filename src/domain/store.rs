use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Length of the free trial granted to a freshly created store.
pub const TRIAL_DAYS: i64 = 7;

/// Business segment a store operates in. Drives which document workflows are
/// enabled: depots and deliveries work with orders, bars with tabs.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Deposito,
    Delivery,
    Bar,
}

impl Segment {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "deposito" => Some(Self::Deposito),
            "delivery" => Some(Self::Delivery),
            "bar" => Some(Self::Bar),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deposito => "deposito",
            Self::Delivery => "delivery",
            Self::Bar => "bar",
        }
    }

    /// Segments that run the order (delivery/pickup) workflow.
    pub fn uses_orders(self) -> bool {
        matches!(self, Self::Deposito | Self::Delivery)
    }

    /// Segments that run the table tab workflow.
    pub fn uses_tables(self) -> bool {
        matches!(self, Self::Bar)
    }
}

/// Subscription tier. The tier maps to a fixed bundle of premium feature
/// flags, see [`crate::domain::feature::plan_bundle`].
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    Basic,
    Pro,
    Elite,
}

impl Plan {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "basic" => Some(Self::Basic),
            "pro" => Some(Self::Pro),
            "elite" => Some(Self::Elite),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Pro => "pro",
            Self::Elite => "elite",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Trial,
    Active,
    PastDue,
    Suspended,
}

impl SubscriptionStatus {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "trial" => Some(Self::Trial),
            "active" => Some(Self::Active),
            "past_due" => Some(Self::PastDue),
            "suspended" => Some(Self::Suspended),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trial => "trial",
            Self::Active => "active",
            Self::PastDue => "past_due",
            Self::Suspended => "suspended",
        }
    }
}

/// The kind of sequentially numbered document a store issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Order,
    Sale,
    Tab,
}

impl DocumentKind {
    pub fn prefix(self) -> char {
        match self {
            Self::Order => 'P',
            Self::Sale => 'V',
            Self::Tab => 'C',
        }
    }

    /// Human-readable document number: prefix plus the sequence value padded
    /// to six digits. Values past 999999 simply widen the number; the
    /// sequence stays unique and monotonic.
    pub fn format_number(self, seq: i64) -> String {
        format!("{}-{:06}", self.prefix(), seq)
    }
}

/// Per-kind monotonic counters owned by a store. Only the sequence allocator
/// ever advances these.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct StoreCounters {
    pub next_order_seq: i64,
    pub next_sale_seq: i64,
    pub next_tab_seq: i64,
}

/// A tenant. Every other entity is owned by exactly one store.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Store {
    pub id: i32,
    pub name: String,
    pub segment: Segment,
    pub plan: Plan,
    pub subscription_status: SubscriptionStatus,
    /// End of the paid (or trial) period, if one was ever set.
    pub paid_until: Option<DateTime<Utc>>,
    pub counters: StoreCounters,
    pub created_at: NaiveDateTime,
}

impl Store {
    /// Returns the human-readable reason access is blocked, or `None` when
    /// the subscription is in good standing.
    ///
    /// `paid_until` is already an aware UTC value (normalized at the model
    /// boundary), so the comparison with `now` is always aware-vs-aware.
    pub fn subscription_block(&self, now: DateTime<Utc>) -> Option<&'static str> {
        match self.subscription_status {
            SubscriptionStatus::Suspended => Some("Sua assinatura está suspensa."),
            SubscriptionStatus::PastDue => Some("Pagamento pendente. Regularize para continuar."),
            SubscriptionStatus::Trial => match self.paid_until {
                Some(until) if until < now => {
                    Some("Seu teste grátis terminou. Ative sua assinatura para continuar.")
                }
                _ => None,
            },
            SubscriptionStatus::Active => match self.paid_until {
                Some(until) if until < now => Some("Assinatura vencida. Renove para continuar."),
                _ => None,
            },
        }
    }
}

/// Payload required to create a new store.
#[derive(Debug, Clone)]
pub struct NewStore {
    pub name: String,
    pub segment: Segment,
    /// End of the initial trial window.
    pub trial_until: DateTime<Utc>,
}

impl NewStore {
    pub fn new(name: impl Into<String>, segment: Segment, trial_until: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            segment,
            trial_until,
        }
    }
}

/// Store branding shown in the navigation and on receipts. Editable only
/// under the `white_label` feature.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Branding {
    pub store_id: i32,
    pub product_name: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub whatsapp_support: Option<String>,
    pub receipt_footer: Option<String>,
}

/// Patch applied when a store updates its branding.
#[derive(Debug, Clone)]
pub struct UpdateBranding {
    pub product_name: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub whatsapp_support: Option<String>,
    pub receipt_footer: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn store(status: SubscriptionStatus, paid_until: Option<DateTime<Utc>>) -> Store {
        Store {
            id: 1,
            name: "Loja A".to_string(),
            segment: Segment::Deposito,
            plan: Plan::Basic,
            subscription_status: status,
            paid_until,
            counters: StoreCounters {
                next_order_seq: 1,
                next_sale_seq: 1,
                next_tab_seq: 1,
            },
            created_at: NaiveDateTime::default(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn trial_within_window_is_not_blocked() {
        let store = store(SubscriptionStatus::Trial, Some(now() + Duration::days(3)));
        assert!(store.subscription_block(now()).is_none());
    }

    #[test]
    fn expired_trial_is_blocked() {
        let store = store(SubscriptionStatus::Trial, Some(now() - Duration::days(1)));
        assert!(store.subscription_block(now()).is_some());
    }

    #[test]
    fn expired_active_subscription_is_blocked() {
        let store = store(SubscriptionStatus::Active, Some(now() - Duration::hours(1)));
        assert_eq!(
            store.subscription_block(now()),
            Some("Assinatura vencida. Renove para continuar.")
        );
    }

    #[test]
    fn suspended_and_past_due_block_regardless_of_paid_until() {
        let future = Some(now() + Duration::days(30));
        assert!(
            store(SubscriptionStatus::Suspended, future)
                .subscription_block(now())
                .is_some()
        );
        assert!(
            store(SubscriptionStatus::PastDue, future)
                .subscription_block(now())
                .is_some()
        );
    }

    #[test]
    fn document_numbers_are_zero_padded_and_widen_past_six_digits() {
        assert_eq!(DocumentKind::Order.format_number(1), "P-000001");
        assert_eq!(DocumentKind::Sale.format_number(42), "V-000042");
        assert_eq!(DocumentKind::Tab.format_number(999999), "C-999999");
        assert_eq!(DocumentKind::Order.format_number(1_000_000), "P-1000000");
    }

    #[test]
    fn segment_workflow_toggles_are_mutually_exclusive() {
        for segment in [Segment::Deposito, Segment::Delivery, Segment::Bar] {
            assert_ne!(segment.uses_orders(), segment.uses_tables());
        }
    }
}
