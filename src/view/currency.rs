use num_format::{Locale, ToFormattedString as _};

/// Formats an amount as Colombian pesos without fractional units.
///
/// Rounds to whole units and groups thousands with '.', e.g. `$ 1.234.567`.
/// Stored amounts are never rounded; this is display only.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round() as i64;
    // `de` groups with '.' like es-CO does.
    let grouped = rounded.unsigned_abs().to_formatted_string(&Locale::de);
    if rounded < 0 {
        format!("-$ {}", grouped)
    } else {
        format!("$ {}", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_fractions() {
        assert_eq!(format_currency(28.2625), "$ 28");
        assert_eq!(format_currency(4.5125), "$ 5");
        assert_eq!(format_currency(0.0), "$ 0");
    }

    #[test]
    fn groups_thousands_with_dots() {
        assert_eq!(format_currency(1_234_567.0), "$ 1.234.567");
        assert_eq!(format_currency(999.6), "$ 1.000");
    }

    #[test]
    fn negative_amounts_keep_sign() {
        assert_eq!(format_currency(-1500.0), "-$ 1.500");
        assert_eq!(format_currency(-0.2), "$ 0");
    }
}
