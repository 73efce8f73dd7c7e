//! Number formatting utilities for human-readable display.
//!
//! KRW amounts are integers on the wire; rates and index levels are floats.

/// 1억 (10^8).
pub const EOK: i64 = 100_000_000;

/// 1만 (10^4).
pub const MAN: i64 = 10_000;

/// Adds thousands separators to a plain decimal string (`"-1234.5"` → `"-1,234.5"`).
pub fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
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

/// Integer division rounding half away from zero.
fn div_round(value: i64, unit: i64) -> i128 {
    let (value, unit) = (i128::from(value), i128::from(unit));
    let half = unit / 2;
    if value >= 0 {
        (value + half) / unit
    } else {
        (value - half) / unit
    }
}

/// Abbreviates a KRW amount with Korean units.
///
/// `>= 1억` → whole 억, `>= 1만` → whole 만, otherwise the amount with separators.
pub fn abbreviate_krw(value: i64) -> String {
    let magnitude = value.unsigned_abs();
    if magnitude >= EOK as u64 {
        format!("{}억", div_round(value, EOK))
    } else if magnitude >= MAN as u64 {
        format!("{}만", div_round(value, MAN))
    } else {
        group_thousands(&value.to_string())
    }
}

/// `71000` → `"71,000원"`.
pub fn format_price(price: i64) -> String {
    format!("{}원", group_thousands(&price.to_string()))
}

/// Signed percentage with two decimals: `1.234` → `"+1.23%"`, `-0.5` → `"-0.50%"`.
pub fn format_rate(rate: f64) -> String {
    if rate > 0.0 {
        format!("+{rate:.2}%")
    } else {
        format!("{rate:.2}%")
    }
}

/// Index level with exactly two decimals and separators: `2650.3` → `"2,650.30"`.
pub fn format_index_level(level: f64) -> String {
    group_thousands(&format!("{level:.2}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("1234567"), "1,234,567");
        assert_eq!(group_thousands("-1234.56"), "-1,234.56");
        assert_eq!(group_thousands("-123"), "-123");
    }

    #[test]
    fn test_abbreviate_eok() {
        assert_eq!(abbreviate_krw(1_200_000_000_000), "12000억");
        assert_eq!(abbreviate_krw(100_000_000), "1억");
        assert_eq!(abbreviate_krw(150_000_000), "2억");
        assert_eq!(abbreviate_krw(149_999_999), "1억");
    }

    #[test]
    fn test_abbreviate_man() {
        assert_eq!(abbreviate_krw(10_000), "1만");
        assert_eq!(abbreviate_krw(99_995_000), "10000만");
        assert_eq!(abbreviate_krw(55_000), "6만");
    }

    #[test]
    fn test_abbreviate_extremes_do_not_overflow() {
        assert_eq!(abbreviate_krw(i64::MAX), "92233720369억");
        assert_eq!(abbreviate_krw(i64::MIN), "-92233720369억");
        assert_eq!(abbreviate_krw(-150_000_000), "-2억");
    }

    #[test]
    fn test_abbreviate_small_amounts() {
        assert_eq!(abbreviate_krw(9_999), "9,999");
        assert_eq!(abbreviate_krw(0), "0");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(71_000), "71,000원");
        assert_eq!(format_price(-1_500), "-1,500원");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(1.234), "+1.23%");
        assert_eq!(format_rate(-0.5), "-0.50%");
        assert_eq!(format_rate(0.0), "0.00%");
    }

    #[test]
    fn test_format_index_level() {
        assert_eq!(format_index_level(2650.3), "2,650.30");
        assert_eq!(format_index_level(871.0), "871.00");
    }
}
