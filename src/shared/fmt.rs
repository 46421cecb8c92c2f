//! Number formatting for table cells.
//!
//! Thousands separators, automatic decimal places for prices, fixed two decimals
//! for percentages.

/// Trims trailing zeros, adds thousands separators.
pub fn group_thousands(formatted: String) -> String {
    let trimmed = if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    };

    let (sign, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", trimmed.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

fn decimal_places(value: f64) -> usize {
    let abs_value = value.abs();

    if abs_value >= 100.0 {
        return 2;
    }

    if abs_value >= 1.0 || abs_value == 0.0 {
        return 4;
    }

    // Sub-dollar coins keep enough precision to show two significant digits.
    let exponent = abs_value.log10().floor().abs() as usize;
    (exponent + 3).min(10)
}

/// Price with auto-detected precision, e.g. `1,234.5` or `0.000123`.
pub fn display(amount: f64) -> String {
    display_with_decimals(amount, decimal_places(amount))
}

/// Format with explicit decimal places (trailing zeros trimmed).
pub fn display_with_decimals(amount: f64, decimals: usize) -> String {
    group_thousands(format!("{:.1$}", amount, decimals))
}

/// Dollar amount, or `-` when the API sent null.
pub fn display_usd(amount: Option<f64>) -> String {
    match amount {
        Some(a) if a.is_finite() => format!("${}", display(a)),
        _ => "-".to_string(),
    }
}

/// Two-decimal percentage, or `N/A` when the API sent null.
pub fn display_percent(change: Option<f64>) -> String {
    match change {
        Some(c) if c.is_finite() => format!("{:.2}%", c),
        _ => "N/A".to_string(),
    }
}
