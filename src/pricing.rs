//! Invoice totals under the two fixed rates.

use crate::models::{LineItem, PricingSummary};

/// Discount applied to the subtotal.
pub const DISCOUNT_RATE: f64 = 0.05;
/// VAT applied to the discounted subtotal.
pub const TAX_RATE: f64 = 0.19;

/// Computes subtotal, discount, tax and total for `items`.
///
/// No rounding happens here; amounts keep full precision and are only
/// rounded when formatted for display.
pub fn summarize(items: &[LineItem]) -> PricingSummary {
    let subtotal: f64 = items.iter().map(LineItem::subtotal).sum();
    let discount = subtotal * DISCOUNT_RATE;
    let taxable = subtotal - discount;
    let tax = taxable * TAX_RATE;

    PricingSummary {
        subtotal,
        discount,
        tax,
        total: taxable + tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(id: u32, name: &str, unit_price: f64, quantity: u32) -> LineItem {
        LineItem {
            id,
            name: name.to_string(),
            unit_price,
            quantity,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_list_is_all_zero() {
        assert_eq!(summarize(&[]), PricingSummary::default());
    }

    #[test]
    fn widget_and_gadget() {
        let items = [item(1, "Widget", 10.0, 2), item(2, "Gadget", 5.0, 1)];
        let summary = summarize(&items);

        assert!(close(summary.subtotal, 25.0));
        assert!(close(summary.discount, 1.25));
        assert!(close(summary.tax, 4.5125));
        assert!(close(summary.total, 28.2625));
    }

    #[test]
    fn free_items_cost_nothing() {
        let summary = summarize(&[item(1, "Sample", 0.0, 40)]);
        assert_eq!(summary.total, 0.0);
    }

    fn arb_items() -> impl Strategy<Value = Vec<LineItem>> {
        prop::collection::vec((0.0f64..1_000_000.0, 1u32..10_000), 0..20).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (price, qty))| item(i as u32 + 1, "p", price, qty))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_summary_invariants(items in arb_items()) {
            let s = summarize(&items);

            prop_assert_eq!(s.discount, s.subtotal * DISCOUNT_RATE);
            prop_assert_eq!(s.tax, (s.subtotal - s.discount) * TAX_RATE);
            prop_assert_eq!(s.total, s.subtotal - s.discount + s.tax);
            prop_assert!(s.subtotal >= 0.0 && s.total >= 0.0);
        }
    }
}
