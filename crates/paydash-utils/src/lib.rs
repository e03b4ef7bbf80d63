//! Utility functions and helpers

use rust_decimal::Decimal;

/// Format an amount with two decimals and Indian digit grouping
/// (`1234567.5` becomes `12,34,567.50`).
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::new();
    if digits.len() > 3 {
        let head = &digits[..digits.len() - 3];
        let lead = head.len() % 2;
        for (i, c) in head.iter().enumerate() {
            if i > 0 && (i + 2 - lead) % 2 == 0 {
                grouped.push(',');
            }
            grouped.push(*c);
        }
        grouped.push(',');
        grouped.extend(&digits[digits.len() - 3..]);
    } else {
        grouped.extend(&digits);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Generate an opaque random identifier (32 hex characters)
pub fn generate_id() -> String {
    format!("{:032x}", rand::random::<u128>())
}
