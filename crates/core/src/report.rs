//! CSV report building.
//!
//! One row per plan across the whole catalog, with the derived final price
//! and profit columns. Generated fully in memory; the admin API and the CLI
//! both serve the same string.

use crate::catalog::Service;
use crate::pricing::{final_price, plan_profit};
use crate::types::format_amount;

/// Report column header.
pub const HEADER: &str =
    "Service,Category,Plan,Type,Duration,Cost,Sell,Discount,FinalPrice,Profit,Stock";

/// Build the catalog report as a CSV document.
#[must_use]
pub fn report_csv(services: &[Service]) -> String {
    let mut csv = String::from(HEADER);
    csv.push('\n');
    for service in services {
        for plan in &service.plans {
            let row = format!(
                "{},{},{},{},{},{},{},{},{},{},{}\n",
                quote(&service.name),
                quote(service.category.as_str()),
                quote(&plan.label),
                quote(plan.plan_type.as_str()),
                quote(plan.duration.as_str()),
                plan.cost_price,
                plan.sell_price,
                plan.discount,
                format_amount(final_price(plan)),
                format_amount(plan_profit(plan)),
                if plan.in_stock { "In Stock" } else { "Out of Stock" },
            );
            csv.push_str(&row);
        }
    }
    csv
}

/// Quote a free-text column, doubling embedded quotes per RFC 4180. Price
/// columns are emitted raw, like the admin panel's export always has.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
