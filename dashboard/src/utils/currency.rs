use rust_decimal::{Decimal, RoundingStrategy};

/// Chilean peso amount: no decimals, `.` as thousands separator,
/// e.g. `$1.234.567` or `-$950`.
pub fn format_clp(amount: Decimal) -> String {
    let rounded =
        amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().normalize().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, digit) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}
