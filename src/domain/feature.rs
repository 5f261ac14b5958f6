use serde::{Deserialize, Serialize};

use crate::domain::store::{Plan, Segment};

/// Every capability a store can be licensed for. Flags are stored per store
/// as sparse rows; a missing row always reads as disabled.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Dashboard,
    Products,
    Sales,
    Customers,
    Orders,
    Tables,
    ReportsExport,
    FinanceModule,
    MultiUser,
    WhiteLabel,
    ThemeCustom,
}

/// The premium flags overwritten whenever a store changes plan. Core and
/// segment flags are never touched by a plan change.
pub const PREMIUM_FEATURES: [Feature; 5] = [
    Feature::ReportsExport,
    Feature::FinanceModule,
    Feature::MultiUser,
    Feature::WhiteLabel,
    Feature::ThemeCustom,
];

/// All known flags, used to lazily seed a complete row set per store.
pub const ALL_FEATURES: [Feature; 11] = [
    Feature::Dashboard,
    Feature::Products,
    Feature::Sales,
    Feature::Customers,
    Feature::Orders,
    Feature::Tables,
    Feature::ReportsExport,
    Feature::FinanceModule,
    Feature::MultiUser,
    Feature::WhiteLabel,
    Feature::ThemeCustom,
];

impl Feature {
    pub fn key(self) -> &'static str {
        match self {
            Self::Dashboard => "core_dashboard",
            Self::Products => "core_products",
            Self::Sales => "core_sales",
            Self::Customers => "core_customers",
            Self::Orders => "segment_orders",
            Self::Tables => "segment_tables",
            Self::ReportsExport => "reports_export",
            Self::FinanceModule => "finance_module",
            Self::MultiUser => "multi_user",
            Self::WhiteLabel => "white_label",
            Self::ThemeCustom => "theme_custom",
        }
    }

    /// Value seeded for a brand new store: core features on, the order
    /// workflow on (the default segment is a depot), everything else off.
    pub fn default_enabled(self) -> bool {
        matches!(
            self,
            Self::Dashboard | Self::Products | Self::Sales | Self::Customers | Self::Orders
        )
    }
}

/// Flag values applied to [`PREMIUM_FEATURES`] when a store is put on `plan`.
pub fn plan_bundle(plan: Plan) -> [(Feature, bool); 5] {
    match plan {
        Plan::Basic => [
            (Feature::ReportsExport, false),
            (Feature::FinanceModule, false),
            (Feature::MultiUser, false),
            (Feature::WhiteLabel, false),
            (Feature::ThemeCustom, false),
        ],
        Plan::Pro => [
            (Feature::ReportsExport, true),
            (Feature::FinanceModule, true),
            (Feature::MultiUser, true),
            (Feature::WhiteLabel, false),
            (Feature::ThemeCustom, false),
        ],
        Plan::Elite => [
            (Feature::ReportsExport, true),
            (Feature::FinanceModule, true),
            (Feature::MultiUser, true),
            (Feature::WhiteLabel, true),
            (Feature::ThemeCustom, true),
        ],
    }
}

/// Flag values applied when a store switches segment: exactly the two
/// workflow toggles, nothing else.
pub fn segment_bundle(segment: Segment) -> [(Feature, bool); 2] {
    [
        (Feature::Orders, segment.uses_orders()),
        (Feature::Tables, segment.uses_tables()),
    ]
}

/// A persisted flag row.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FeatureFlag {
    pub store_id: i32,
    pub key: String,
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elite_bundle_enables_every_premium_flag() {
        assert!(plan_bundle(Plan::Elite).iter().all(|(_, enabled)| *enabled));
    }

    #[test]
    fn basic_bundle_disables_every_premium_flag() {
        assert!(plan_bundle(Plan::Basic).iter().all(|(_, enabled)| !*enabled));
    }

    #[test]
    fn bundles_only_cover_premium_features() {
        for plan in [Plan::Basic, Plan::Pro, Plan::Elite] {
            for (feature, _) in plan_bundle(plan) {
                assert!(PREMIUM_FEATURES.contains(&feature));
            }
        }
    }

    #[test]
    fn segment_bundle_toggles_exactly_the_workflow_flags() {
        let bar = segment_bundle(Segment::Bar);
        assert_eq!(bar, [(Feature::Orders, false), (Feature::Tables, true)]);

        let delivery = segment_bundle(Segment::Delivery);
        assert_eq!(delivery, [(Feature::Orders, true), (Feature::Tables, false)]);
    }

    #[test]
    fn feature_keys_are_unique() {
        let mut keys: Vec<&str> = ALL_FEATURES.iter().map(|f| f.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), ALL_FEATURES.len());
    }
}
