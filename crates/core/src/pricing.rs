//! Pricing and derivation engine.
//!
//! Pure functions recomputed on every catalog snapshot or filter change.
//! Every derivation tolerates blank or malformed numeric-strings (treated as
//! zero) and never panics; the inputs are free-text admin fields.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::catalog::{Plan, PlanDuration, Service};
use crate::types::{PlanId, ServiceId, parse_amount};

/// Identity of the catalog-wide best deal.
///
/// Identified by the stable plan id rather than the plan label, so two
/// same-labelled plans within one service stay distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestDeal {
    pub service_id: ServiceId,
    pub plan_id: PlanId,
}

/// Bundle pricing constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleConfig {
    /// Minimum number of bundle items before the discount applies.
    pub discount_threshold: usize,
    /// Flat discount rate applied to the bundle sum.
    pub discount_rate: Decimal,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            discount_threshold: 3,
            // 10% off once the threshold is reached
            discount_rate: Decimal::new(10, 2),
        }
    }
}

/// One selected plan in a session-local bundle, tagged with its parent
/// service name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleItem {
    pub service_name: String,
    pub plan: Plan,
}

/// Effective shopper price of a plan: sell price minus discount.
#[must_use]
pub fn final_price(plan: &Plan) -> Decimal {
    parse_amount(&plan.sell_price) - parse_amount(&plan.discount)
}

/// Margin on a plan after discount: sell − discount − cost.
#[must_use]
pub fn plan_profit(plan: &Plan) -> Decimal {
    final_price(plan) - parse_amount(&plan.cost_price)
}

/// Sum of [`plan_profit`] over all of a service's plans.
#[must_use]
pub fn service_total_profit(service: &Service) -> Decimal {
    service.plans.iter().map(plan_profit).sum()
}

/// Identify the plan with the highest percentage markup across the whole
/// catalog.
///
/// Only (service, plan) pairs with both price fields non-blank qualify, and
/// a pair must beat the running best strictly, so ties keep the first match
/// in iteration order and a catalog with no positive markup designates no
/// best deal. Pairs whose parsed cost is zero are skipped; there is no
/// meaningful markup over a zero cost.
#[must_use]
pub fn best_deal(services: &[Service]) -> Option<BestDeal> {
    let mut best: Option<(BestDeal, Decimal)> = None;
    for service in services {
        for plan in &service.plans {
            if plan.cost_price.trim().is_empty() || plan.sell_price.trim().is_empty() {
                continue;
            }
            let cost = parse_amount(&plan.cost_price);
            if cost == Decimal::ZERO {
                continue;
            }
            let sell = parse_amount(&plan.sell_price);
            let markup = (sell - cost) / cost * Decimal::ONE_HUNDRED;
            let current_best = best.as_ref().map_or(Decimal::ZERO, |(_, m)| *m);
            if markup > current_best {
                best = Some((
                    BestDeal {
                        service_id: service.id.clone(),
                        plan_id: plan.id.clone(),
                    },
                    markup,
                ));
            }
        }
    }
    best.map(|(deal, _)| deal)
}

/// Percentage saved by buying the service's yearly plan over twelve months
/// of its monthly plan, rounded half-away-from-zero.
///
/// Only the first Monthly and first Yearly plan are considered; a service
/// without both, or with a zero monthly price, saves nothing.
#[must_use]
pub fn savings_percent(service: &Service) -> i64 {
    let monthly = service
        .plans
        .iter()
        .find(|p| p.duration == PlanDuration::Monthly);
    let yearly = service
        .plans
        .iter()
        .find(|p| p.duration == PlanDuration::Yearly);
    let (Some(monthly), Some(yearly)) = (monthly, yearly) else {
        return 0;
    };

    let expected_yearly = parse_amount(&monthly.sell_price) * Decimal::from(12);
    if expected_yearly == Decimal::ZERO {
        return 0;
    }
    let savings =
        (expected_yearly - parse_amount(&yearly.sell_price)) / expected_yearly * Decimal::ONE_HUNDRED;
    savings
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// Total price of a bundle: sum of final prices, with the flat volume
/// discount applied once the item count reaches the configured threshold.
#[must_use]
pub fn bundle_total(items: &[BundleItem], config: &BundleConfig) -> Decimal {
    let sum: Decimal = items.iter().map(|item| final_price(&item.plan)).sum();
    if items.len() >= config.discount_threshold {
        sum * (Decimal::ONE - config.discount_rate)
    } else {
        sum
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{Category, PlanType};
    use std::str::FromStr;

    fn plan(id: &str, label: &str, cost: &str, sell: &str, discount: &str) -> Plan {
        Plan {
            id: PlanId::new(id),
            label: label.to_owned(),
            plan_type: PlanType::FullAccount,
            duration: PlanDuration::Instant,
            cost_price: cost.to_owned(),
            sell_price: sell.to_owned(),
            discount: discount.to_owned(),
            in_stock: true,
        }
    }

    fn service(id: &str, name: &str, plans: Vec<Plan>) -> Service {
        Service {
            id: ServiceId::new(id),
            name: name.to_owned(),
            category: Category::Other,
            service_note: String::new(),
            featured: false,
            plans,
            updated_at: None,
        }
    }

    #[test]
    fn test_plan_profit() {
        let p = plan("p", "X", "10", "20", "5");
        assert_eq!(plan_profit(&p), Decimal::from(5));
    }

    #[test]
    fn test_plan_profit_blank_fields_are_zero() {
        let p = plan("p", "X", "", "20", "");
        assert_eq!(plan_profit(&p), Decimal::from(20));
        let p = plan("p", "X", "", "", "");
        assert_eq!(plan_profit(&p), Decimal::ZERO);
    }

    #[test]
    fn test_final_price() {
        let p = plan("p", "X", "10", "20", "5");
        assert_eq!(final_price(&p), Decimal::from(15));
    }

    #[test]
    fn test_best_deal_picks_highest_markup() {
        let catalog = vec![
            service("a", "A", vec![plan("x", "X", "10", "20", "0")]),
            service("b", "B", vec![plan("y", "Y", "10", "15", "0")]),
        ];
        let deal = best_deal(&catalog).unwrap();
        assert_eq!(deal.service_id, ServiceId::new("a"));
        assert_eq!(deal.plan_id, PlanId::new("x"));
    }

    #[test]
    fn test_best_deal_ties_keep_first() {
        let catalog = vec![
            service("a", "A", vec![plan("x", "X", "10", "20", "0")]),
            service("b", "B", vec![plan("y", "Y", "5", "10", "0")]),
        ];
        let deal = best_deal(&catalog).unwrap();
        assert_eq!(deal.service_id, ServiceId::new("a"));
    }

    #[test]
    fn test_best_deal_skips_blank_and_zero_cost() {
        let catalog = vec![service(
            "a",
            "A",
            vec![
                plan("x", "X", "", "20", "0"),
                plan("y", "Y", "0", "20", "0"),
                plan("z", "Z", "free", "20", "0"),
            ],
        )];
        assert_eq!(best_deal(&catalog), None);
    }

    #[test]
    fn test_best_deal_requires_positive_markup() {
        let catalog = vec![service("a", "A", vec![plan("x", "X", "20", "10", "0")])];
        assert_eq!(best_deal(&catalog), None);
    }

    #[test]
    fn test_savings_percent() {
        let mut monthly = plan("m", "1 Month", "5", "10", "0");
        monthly.duration = PlanDuration::Monthly;
        let mut yearly = plan("y", "1 Year", "50", "90", "0");
        yearly.duration = PlanDuration::Yearly;
        let svc = service("a", "A", vec![monthly, yearly]);
        // round((120 - 90) / 120 * 100) = 25
        assert_eq!(savings_percent(&svc), 25);
    }

    #[test]
    fn test_savings_percent_needs_both_durations() {
        let mut monthly = plan("m", "1 Month", "5", "10", "0");
        monthly.duration = PlanDuration::Monthly;
        let svc = service("a", "A", vec![monthly]);
        assert_eq!(savings_percent(&svc), 0);
    }

    #[test]
    fn test_savings_percent_zero_monthly_price() {
        let mut monthly = plan("m", "1 Month", "0", "", "0");
        monthly.duration = PlanDuration::Monthly;
        let mut yearly = plan("y", "1 Year", "0", "90", "0");
        yearly.duration = PlanDuration::Yearly;
        let svc = service("a", "A", vec![monthly, yearly]);
        assert_eq!(savings_percent(&svc), 0);
    }

    #[test]
    fn test_savings_percent_rounds_half_away_from_zero() {
        // monthly 10 -> expected 120; yearly 59.40 -> 50.5% saved -> 51
        let mut monthly = plan("m", "1 Month", "0", "10", "0");
        monthly.duration = PlanDuration::Monthly;
        let mut yearly = plan("y", "1 Year", "0", "59.40", "0");
        yearly.duration = PlanDuration::Yearly;
        let svc = service("a", "A", vec![monthly, yearly]);
        assert_eq!(savings_percent(&svc), 51);
    }

    #[test]
    fn test_bundle_total_under_threshold() {
        let items = vec![
            BundleItem {
                service_name: "A".to_owned(),
                plan: plan("x", "X", "0", "10", "0"),
            },
            BundleItem {
                service_name: "B".to_owned(),
                plan: plan("y", "Y", "0", "20", "0"),
            },
        ];
        assert_eq!(bundle_total(&items, &BundleConfig::default()), Decimal::from(30));
    }

    #[test]
    fn test_bundle_total_applies_volume_discount() {
        let items = vec![
            BundleItem {
                service_name: "A".to_owned(),
                plan: plan("x", "X", "0", "10", "0"),
            },
            BundleItem {
                service_name: "B".to_owned(),
                plan: plan("y", "Y", "0", "10", "0"),
            },
            BundleItem {
                service_name: "C".to_owned(),
                plan: plan("z", "Z", "0", "10", "0"),
            },
        ];
        assert_eq!(
            bundle_total(&items, &BundleConfig::default()),
            Decimal::from_str("27.0").unwrap()
        );
    }

    #[test]
    fn test_bundle_total_counts_discounted_prices() {
        let items = vec![BundleItem {
            service_name: "A".to_owned(),
            plan: plan("x", "X", "0", "10", "4"),
        }];
        assert_eq!(bundle_total(&items, &BundleConfig::default()), Decimal::from(6));
    }

    #[test]
    fn test_service_total_profit() {
        let svc = service(
            "a",
            "A",
            vec![plan("x", "X", "10", "20", "5"), plan("y", "Y", "1", "2", "")],
        );
        // (20-5-10) + (2-0-1) = 6
        assert_eq!(service_total_profit(&svc), Decimal::from(6));
    }
}
