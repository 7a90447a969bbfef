use thiserror::Error;

/// Rejected user input. Every variant leaves the workspace untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a product name.")]
    EmptyName,
    #[error("Please enter a valid price (a number, zero or more).")]
    InvalidPrice,
    #[error("Please enter a valid quantity (a whole number, one or more).")]
    InvalidQuantity,
    #[error("That amount is too large to total.")]
    AmountTooLarge,
    #[error("You cannot save an empty invoice.")]
    EmptyInvoice,
}
