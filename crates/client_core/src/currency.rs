/// Formats an amount as en-US dollars, e.g. `$1,234.50` or `-$5.00`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // Negative zero keeps its sign, as en-US number formatting does.
    let sign = if amount.is_sign_negative() { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}
