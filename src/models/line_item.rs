use serde::{Deserialize, Serialize};

/// One product row of the invoice being built.
///
/// Serialized with the field names of the stored history record
/// (`price` rather than `unit_price`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: u32,
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: f64,
    pub quantity: u32,
}

impl LineItem {
    /// Price times quantity, unrounded.
    pub fn subtotal(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// Editable columns of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineItemField {
    Name,
    UnitPrice,
    Quantity,
}

impl LineItemField {
    pub const ALL: [LineItemField; 3] = [
        LineItemField::Name,
        LineItemField::UnitPrice,
        LineItemField::Quantity,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LineItemField::Name => "Product",
            LineItemField::UnitPrice => "Price",
            LineItemField::Quantity => "Qty",
        }
    }

    pub fn next(self) -> Self {
        match self {
            LineItemField::Name => LineItemField::UnitPrice,
            LineItemField::UnitPrice => LineItemField::Quantity,
            LineItemField::Quantity => LineItemField::Name,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            LineItemField::Name => LineItemField::Quantity,
            LineItemField::UnitPrice => LineItemField::Name,
            LineItemField::Quantity => LineItemField::UnitPrice,
        }
    }

    /// Current value of this column rendered as editable text.
    pub fn raw_value(self, item: &LineItem) -> String {
        match self {
            LineItemField::Name => item.name.clone(),
            LineItemField::UnitPrice => item.unit_price.to_string(),
            LineItemField::Quantity => item.quantity.to_string(),
        }
    }
}
