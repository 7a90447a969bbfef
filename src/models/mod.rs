mod invoice;
mod line_item;
mod summary;

pub use invoice::Invoice;
pub use line_item::{LineItem, LineItemField};
pub use summary::PricingSummary;
