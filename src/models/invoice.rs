use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use super::{LineItem, PricingSummary};

/// A finalized invoice. Never edited after it enters the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Milliseconds since the Unix epoch at save time.
    pub id: i64,
    pub date: DateTime<Utc>,
    #[serde(rename = "products")]
    pub line_items: Vec<LineItem>,
    #[serde(flatten)]
    pub summary: PricingSummary,
}

impl Invoice {
    pub fn new(id: i64, date: DateTime<Utc>, line_items: Vec<LineItem>, summary: PricingSummary) -> Self {
        Self {
            id,
            date,
            line_items,
            summary,
        }
    }

    /// Save time in the user's local timezone, for display.
    pub fn local_date_label(&self) -> String {
        self.date
            .with_timezone(&Local)
            .format("%d/%m/%Y, %H:%M:%S")
            .to_string()
    }
}
