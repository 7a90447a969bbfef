//! The invoice currently being built.

use tracing::debug;

use crate::error::ValidationError;
use crate::models::{LineItem, LineItemField};
use crate::pricing::summarize;

/// Ordered line items of the open invoice plus the id counter.
#[derive(Debug, Default)]
pub struct Workspace {
    items: Vec<LineItem>,
    last_id: u32,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn get(&self, id: u32) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Owned copy of the current items, used when an invoice is saved.
    pub fn snapshot(&self) -> Vec<LineItem> {
        self.items.clone()
    }

    /// Appends a new line item and returns its id.
    pub fn add(&mut self, name: &str, unit_price: f64, quantity: u32) -> Result<u32, ValidationError> {
        let name = validate_name(name)?;
        let unit_price = validate_price(unit_price)?;
        if quantity == 0 {
            return Err(ValidationError::InvalidQuantity);
        }

        let id = self.last_id + 1;
        self.items.push(LineItem {
            id,
            name,
            unit_price,
            quantity,
        });
        if let Err(err) = self.check_totals() {
            self.items.pop();
            return Err(err);
        }
        self.last_id = id;
        debug!(id, "line item added");

        Ok(id)
    }

    /// Parses the text of the add form and appends the item.
    pub fn add_raw(&mut self, name: &str, price: &str, quantity: &str) -> Result<u32, ValidationError> {
        let unit_price = price
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidPrice)?;
        let quantity = quantity
            .trim()
            .parse::<u32>()
            .map_err(|_| ValidationError::InvalidQuantity)?;

        self.add(name, unit_price, quantity)
    }

    /// Removes the item with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        let removed = self.items.len() != before;
        if removed {
            debug!(id, "line item removed");
        }
        removed
    }

    /// Replaces one field of an item in place.
    ///
    /// The raw value is validated before anything is touched; an unknown id
    /// is a no-op.
    pub fn update(&mut self, id: u32, field: LineItemField, raw_value: &str) -> Result<(), ValidationError> {
        let Some(index) = self.items.iter().position(|item| item.id == id) else {
            return Ok(());
        };

        let mut updated = self.items[index].clone();
        match field {
            LineItemField::Name => {
                updated.name = validate_name(raw_value)?;
            }
            LineItemField::UnitPrice => {
                let value = parse_number(raw_value).ok_or(ValidationError::InvalidPrice)?;
                updated.unit_price = validate_price(value)?;
            }
            LineItemField::Quantity => {
                let value = parse_number(raw_value).ok_or(ValidationError::InvalidQuantity)?;
                if value < 1.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
                    return Err(ValidationError::InvalidQuantity);
                }
                updated.quantity = value as u32;
            }
        }

        let previous = std::mem::replace(&mut self.items[index], updated);
        if let Err(err) = self.check_totals() {
            self.items[index] = previous;
            return Err(err);
        }
        debug!(id, ?field, "line item updated");

        Ok(())
    }

    /// Empties the list and restarts ids at 1.
    pub fn clear(&mut self) {
        self.items.clear();
        self.last_id = 0;
    }

    /// Every total of the current list must stay a finite number.
    fn check_totals(&self) -> Result<(), ValidationError> {
        if summarize(&self.items).is_finite() {
            Ok(())
        } else {
            Err(ValidationError::AmountTooLarge)
        }
    }
}

fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(name.to_string())
}

fn validate_price(price: f64) -> Result<f64, ValidationError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ValidationError::InvalidPrice);
    }
    Ok(price)
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
