//! Currency formatting.

/// Format an amount with a currency symbol, thousands separators, and two decimals.
///
/// `fmt_money(1234.5, "R$")` -> `"R$ 1,234.50"`.
pub fn fmt_money(value: f64, symbol: &str) -> String {
    let grouped = group_thousands(value, 2);
    if symbol.is_empty() {
        grouped
    } else {
        format!("{symbol} {grouped}")
    }
}

/// Render `value` with `decimals` places and `,` between thousands groups.
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let raw = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw.as_str(), None),
    };

    let mut out = String::with_capacity(raw.len() + raw.len() / 3 + 1);
    if value < 0.0 && raw.chars().any(|c| c != '0' && c != '.') {
        out.push('-');
    }
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(1234567.891, 2), "1,234,567.89");
        assert_eq!(group_thousands(999.0, 2), "999.00");
        assert_eq!(group_thousands(1000.0, 0), "1,000");
        assert_eq!(group_thousands(-2500.5, 1), "-2,500.5");
    }

    #[test]
    fn negative_zero_has_no_sign() {
        assert_eq!(group_thousands(-0.001, 2), "0.00");
    }

    #[test]
    fn money_with_and_without_symbol() {
        assert_eq!(fmt_money(1500.0, "R$"), "R$ 1,500.00");
        assert_eq!(fmt_money(12.346, ""), "12.35");
    }
}
