//! Display-ready projections of the workspace and history.
//!
//! Nothing here touches the terminal; `crate::ui` draws these values.

mod currency;

pub use currency::format_currency;

use crate::models::{Invoice, LineItem, LineItemField, PricingSummary};
use crate::pricing::{DISCOUNT_RATE, TAX_RATE};

pub const EMPTY_ITEMS_MESSAGE: &str = "No products added yet.";
pub const EMPTY_HISTORY_MESSAGE: &str = "No saved invoices.";
pub const DELETE_LABEL: &str = "✖";

/// One table cell; `field` is set when the cell can be edited in place.
#[derive(Debug, Clone, PartialEq)]
pub struct CellView {
    pub text: String,
    pub field: Option<LineItemField>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemRow {
    Placeholder(&'static str),
    Item {
        id: u32,
        /// Name, price, quantity, subtotal, delete.
        cells: Vec<CellView>,
    },
}

/// Rows of the active invoice table, in store order.
pub fn item_rows(items: &[LineItem]) -> Vec<ItemRow> {
    if items.is_empty() {
        return vec![ItemRow::Placeholder(EMPTY_ITEMS_MESSAGE)];
    }

    items
        .iter()
        .map(|item| {
            let mut cells: Vec<CellView> = LineItemField::ALL
                .iter()
                .map(|&field| CellView {
                    text: field.raw_value(item),
                    field: Some(field),
                })
                .collect();
            cells.push(CellView {
                text: format_currency(item.subtotal()),
                field: None,
            });
            cells.push(CellView {
                text: DELETE_LABEL.to_string(),
                field: None,
            });

            ItemRow::Item { id: item.id, cells }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    pub subtotal: String,
    pub discount: String,
    pub tax: String,
    pub total: String,
}

impl SummaryView {
    /// (label, value) pairs in display order.
    pub fn lines(&self) -> [(String, &str); 4] {
        [
            ("Subtotal:".to_string(), self.subtotal.as_str()),
            (format!("Discount ({}%):", percent(DISCOUNT_RATE)), self.discount.as_str()),
            (format!("VAT ({}%):", percent(TAX_RATE)), self.tax.as_str()),
            ("NET TOTAL:".to_string(), self.total.as_str()),
        ]
    }
}

fn percent(rate: f64) -> i64 {
    (rate * 100.0).round() as i64
}

pub fn summary_view(summary: &PricingSummary) -> SummaryView {
    SummaryView {
        subtotal: format_currency(summary.subtotal),
        discount: format!("-{}", format_currency(summary.discount)),
        tax: format!("+{}", format_currency(summary.tax)),
        total: format_currency(summary.total),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// `None` for the empty-history placeholder.
    pub invoice_id: Option<i64>,
    pub label: String,
    pub total: String,
}

/// History entries in the order given; callers pass most-recent-first.
pub fn history_entries<'a>(invoices: impl Iterator<Item = &'a Invoice>) -> Vec<HistoryEntry> {
    let entries: Vec<HistoryEntry> = invoices
        .map(|invoice| HistoryEntry {
            invoice_id: Some(invoice.id),
            label: format!("Invoice of {}", invoice.local_date_label()),
            total: format_currency(invoice.summary.total),
        })
        .collect();

    if entries.is_empty() {
        return vec![HistoryEntry {
            invoice_id: None,
            label: EMPTY_HISTORY_MESSAGE.to_string(),
            total: String::new(),
        }];
    }
    entries
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDetailView {
    pub title: String,
    /// Product, price, quantity, subtotal.
    pub rows: Vec<[String; 4]>,
    pub summary: SummaryView,
}

/// Read-only view of a saved invoice, using its frozen summary.
pub fn invoice_detail(invoice: &Invoice) -> InvoiceDetailView {
    let rows = invoice
        .line_items
        .iter()
        .map(|item| {
            [
                item.name.clone(),
                format_currency(item.unit_price),
                item.quantity.to_string(),
                format_currency(item.subtotal()),
            ]
        })
        .collect();

    InvoiceDetailView {
        title: format!("Invoice of {}", invoice.local_date_label()),
        rows,
        summary: summary_view(&invoice.summary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::summarize;
    use chrono::{TimeZone, Utc};

    fn widget() -> LineItem {
        LineItem {
            id: 1,
            name: "Widget".to_string(),
            unit_price: 10.0,
            quantity: 2,
        }
    }

    #[test]
    fn empty_table_has_placeholder_row() {
        assert_eq!(item_rows(&[]), vec![ItemRow::Placeholder(EMPTY_ITEMS_MESSAGE)]);
    }

    #[test]
    fn item_row_marks_editable_cells() {
        let rows = item_rows(&[widget()]);
        let ItemRow::Item { id, cells } = &rows[0] else {
            panic!("expected an item row");
        };

        assert_eq!(*id, 1);
        let texts: Vec<&str> = cells.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Widget", "10", "2", "$ 20", DELETE_LABEL]);
        let editable: Vec<bool> = cells.iter().map(|c| c.field.is_some()).collect();
        assert_eq!(editable, vec![true, true, true, false, false]);
    }

    #[test]
    fn summary_has_signed_discount_and_tax() {
        let view = summary_view(&summarize(&[widget()]));
        assert_eq!(view.subtotal, "$ 20");
        assert_eq!(view.discount, "-$ 1");
        assert_eq!(view.tax, "+$ 4");
        assert_eq!(view.total, "$ 23");
        assert_eq!(view.lines()[1].0, "Discount (5%):");
        assert_eq!(view.lines()[2].0, "VAT (19%):");
    }

    #[test]
    fn empty_history_has_placeholder() {
        let entries = history_entries(std::iter::empty());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].invoice_id, None);
        assert_eq!(entries[0].label, EMPTY_HISTORY_MESSAGE);
    }

    #[test]
    fn detail_uses_frozen_summary() {
        let items = vec![widget()];
        let mut summary = summarize(&items);
        summary.total = 1_000.0;
        let invoice = Invoice::new(1, Utc.timestamp_millis_opt(1).unwrap(), items, summary);

        let detail = invoice_detail(&invoice);
        assert_eq!(detail.rows, vec![[
            "Widget".to_string(),
            "$ 10".to_string(),
            "2".to_string(),
            "$ 20".to_string(),
        ]]);
        assert_eq!(detail.summary.total, "$ 1.000");
    }
}
