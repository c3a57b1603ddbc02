use serde::Serialize;

/// A money total together with its display form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyAmount {
    pub amount: f64,
    pub formatted: String,
}

impl CurrencyAmount {
    pub fn new(amount: f64, symbol: &str) -> Self {
        Self {
            amount,
            formatted: format_currency(amount, symbol),
        }
    }
}

/// Formats with two decimals and comma thousands grouping, symbol first:
/// `₹1,234.50`, `₹-20.00`.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let fixed = format!("{amount:.2}");
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

    format!("{symbol}{sign}{}.{fraction}", group_thousands(whole))
}

fn group_thousands(whole: &str) -> String {
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
