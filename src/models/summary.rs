use serde::{Deserialize, Serialize};

/// Totals derived from a list of line items.
///
/// Stored flattened into each invoice record; the tax field keeps the
/// record's `iva` key.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PricingSummary {
    pub subtotal: f64,
    pub discount: f64,
    #[serde(rename = "iva")]
    pub tax: f64,
    pub total: f64,
}

impl PricingSummary {
    /// False when any amount overflowed to infinity or NaN.
    pub fn is_finite(&self) -> bool {
        [self.subtotal, self.discount, self.tax, self.total]
            .iter()
            .all(|amount| amount.is_finite())
    }
}
