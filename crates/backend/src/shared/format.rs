//! Display formatting for KPI cards. Applied at the boundary only; numeric
//! fields stay the source of truth.

/// Formats an integer with comma thousands separators.
///
/// # Examples
/// ```ignore
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

fn sign(value: f64) -> &'static str {
    if value < 0.0 {
        "-"
    } else {
        ""
    }
}

/// Rounded whole value with thousands separators, e.g. `1,234`.
pub fn format_integer(value: f64) -> String {
    format!("{}{}", sign(value), format_number(value.abs().round() as u64))
}

/// Whole currency amount, e.g. `$345`, `-$1,200`.
pub fn format_money(value: f64, currency: &str) -> String {
    format!(
        "{}{}{}",
        sign(value),
        currency,
        format_number(value.abs().round() as u64)
    )
}

/// Currency amount scaled to K/M/B with one decimal, e.g. `$4.2M`.
pub fn format_compact_money(value: f64, currency: &str) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1_000_000_000.0 {
        (abs / 1_000_000_000.0, "B")
    } else if abs >= 1_000_000.0 {
        (abs / 1_000_000.0, "M")
    } else if abs >= 1_000.0 {
        (abs / 1_000.0, "K")
    } else {
        return format_money(value, currency);
    };
    format!("{}{}{:.1}{}", sign(value), currency, scaled, suffix)
}

/// `3.2%`
pub fn format_percent(value: f64, decimals: u8) -> String {
    format!("{:.*}%", decimals as usize, value)
}

/// Change with explicit sign, e.g. `+12.5%`, `-2.1%`, `0.0%`. Undefined changes
/// render as `n/a`.
pub fn format_change(change: Option<f64>) -> String {
    match change {
        Some(c) => {
            let rounded = format!("{:.1}", c.abs());
            if rounded == "0.0" {
                "0.0%".to_string()
            } else if c > 0.0 {
                format!("+{}%", rounded)
            } else {
                format!("-{}%", rounded)
            }
        }
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(345.4, "$"), "$345");
        assert_eq!(format_money(1234.5, "$"), "$1,235");
        assert_eq!(format_money(-1200.0, "$"), "-$1,200");
        assert_eq!(format_integer(1234.0), "1,234");
    }

    #[test]
    fn test_format_compact_money() {
        assert_eq!(format_compact_money(4_200_000.0, "$"), "$4.2M");
        assert_eq!(format_compact_money(12_500.0, "$"), "$12.5K");
        assert_eq!(format_compact_money(345.0, "$"), "$345");
        assert_eq!(format_compact_money(2_000_000_000.0, "$"), "$2.0B");
    }

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(Some(12.5)), "+12.5%");
        assert_eq!(format_change(Some(-2.1)), "-2.1%");
        assert_eq!(format_change(Some(0.0)), "0.0%");
        assert_eq!(format_change(Some(-0.01)), "0.0%");
        assert_eq!(format_change(None), "n/a");
        assert_eq!(format_percent(3.2, 1), "3.2%");
    }
}
