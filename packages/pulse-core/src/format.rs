//! Display formatting for prices and returns.

use serde::{Deserialize, Serialize};

/// Shown in place of an undefined value.
pub const PLACEHOLDER: &str = "—";

/// Colour marker for a value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Gain,
    Loss,
    #[default]
    None,
}

impl Tone {
    /// Gain for zero or positive, loss for negative, none when undefined.
    pub fn of(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() && v >= 0.0 => Tone::Gain,
            Some(v) if v.is_finite() => Tone::Loss,
            _ => Tone::None,
        }
    }
}

/// Signed percent with two decimals, e.g. `+5.00%`.
pub fn fmt_pct(fraction: Option<f64>) -> String {
    match fraction.filter(|v| v.is_finite()) {
        Some(v) => format!("{:+.2}%", v * 100.0),
        None => PLACEHOLDER.to_string(),
    }
}

/// Price with thousands separators, e.g. `1,234.56`.
pub fn fmt_price(price: Option<f64>) -> String {
    match price.filter(|v| v.is_finite()) {
        Some(v) => group_thousands(&format!("{:.2}", v)),
        None => PLACEHOLDER.to_string(),
    }
}

/// Signed absolute change with thousands separators, e.g. `+1,234.56`.
pub fn fmt_abs(change: Option<f64>) -> String {
    match change.filter(|v| v.is_finite()) {
        Some(v) => {
            let sign = if v < 0.0 { '-' } else { '+' };
            format!("{}{}", sign, group_thousands(&format!("{:.2}", v.abs())))
        }
        None => PLACEHOLDER.to_string(),
    }
}

fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

/// Numeric values shown in a table row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct RowValues {
    pub price: Option<f64>,
    pub change: Option<f64>,
    pub change_fraction: Option<f64>,
    pub day: Option<f64>,
    pub month: Option<f64>,
    pub ytd: Option<f64>,
}

/// A formatted value with its colour marker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValueText {
    pub text: String,
    pub tone: Tone,
}

impl ValueText {
    fn pct(value: Option<f64>) -> Self {
        Self {
            text: fmt_pct(value),
            tone: Tone::of(value),
        }
    }
}

/// Formatted text for a table row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowText {
    pub price: String,
    pub change: ValueText,
    pub change_pct: ValueText,
    pub day: ValueText,
    pub month: ValueText,
    pub ytd: ValueText,
}

impl RowText {
    /// Format every value of a row.
    pub fn from_values(values: &RowValues) -> Self {
        Self {
            price: fmt_price(values.price),
            change: ValueText {
                text: fmt_abs(values.change),
                tone: Tone::of(values.change),
            },
            change_pct: ValueText::pct(values.change_fraction),
            day: ValueText::pct(values.day),
            month: ValueText::pct(values.month),
            ytd: ValueText::pct(values.ytd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_pct() {
        assert_eq!(fmt_pct(Some(0.05)), "+5.00%");
        assert_eq!(fmt_pct(Some(-0.012345)), "-1.23%");
        assert_eq!(fmt_pct(Some(0.0)), "+0.00%");
        assert_eq!(fmt_pct(None), PLACEHOLDER);
        assert_eq!(fmt_pct(Some(f64::NAN)), PLACEHOLDER);
    }

    #[test]
    fn test_fmt_price() {
        assert_eq!(fmt_price(Some(1234.5)), "1,234.50");
        assert_eq!(fmt_price(Some(999.999)), "1,000.00");
        assert_eq!(fmt_price(Some(12.0)), "12.00");
        assert_eq!(fmt_price(Some(1234567.891)), "1,234,567.89");
        assert_eq!(fmt_price(None), PLACEHOLDER);
    }

    #[test]
    fn test_fmt_abs() {
        assert_eq!(fmt_abs(Some(1234.5)), "+1,234.50");
        assert_eq!(fmt_abs(Some(-2.25)), "-2.25");
        assert_eq!(fmt_abs(Some(-0.001)), "-0.00");
        assert_eq!(fmt_abs(None), PLACEHOLDER);
    }

    #[test]
    fn test_tone() {
        assert_eq!(Tone::of(Some(0.0)), Tone::Gain);
        assert_eq!(Tone::of(Some(-0.1)), Tone::Loss);
        assert_eq!(Tone::of(None), Tone::None);
    }

    #[test]
    fn test_row_text_placeholders() {
        let values = RowValues {
            price: Some(105.0),
            month: Some(0.05),
            ..Default::default()
        };
        let text = RowText::from_values(&values);

        assert_eq!(text.price, "105.00");
        assert_eq!(text.month.text, "+5.00%");
        assert_eq!(text.month.tone, Tone::Gain);
        assert_eq!(text.day.text, PLACEHOLDER);
        assert_eq!(text.change.tone, Tone::None);
    }
}
