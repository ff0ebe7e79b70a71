//! Locale-aware parsing of the values the dashboard renders for humans:
//! Czech dates (`5.3.2024`, `5. 3. 2024`), decimal commas (`12,5 GB`) and
//! amounts with space-separated thousands (`1 234 Kč`).

use crate::utils::error::{Result, StatusError};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\.\s*(\d{1,2})\.\s*(\d{4})").unwrap());
// 與 JavaScript parseFloat 相同：只取開頭的數字部分
static DECIMAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").unwrap()
});
static INTEGER_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d[\d\s]*").unwrap());

fn value_error(kind: &str, input: &str) -> StatusError {
    StatusError::ValueParseError {
        kind: kind.to_string(),
        input: input.to_string(),
    }
}

/// 取出第一個 `D.M.YYYY` 形式的日期
pub fn parse_locale_date(text: &str) -> Result<NaiveDate> {
    let caps = DATE_PATTERN
        .captures(text)
        .ok_or_else(|| value_error("date", text))?;

    let day: u32 = caps[1].parse().map_err(|_| value_error("date", text))?;
    let month: u32 = caps[2].parse().map_err(|_| value_error("date", text))?;
    let year: i32 = caps[3].parse().map_err(|_| value_error("date", text))?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| value_error("date", text))
}

/// 第一個逗號換成小數點後解析開頭的數字，`"12,5 GB"` → 12.5
pub fn parse_locale_decimal(text: &str) -> Result<f64> {
    let normalized = text.replacen(',', ".", 1);
    let number = DECIMAL_PATTERN
        .find(&normalized)
        .ok_or_else(|| value_error("decimal", text))?
        .as_str()
        .trim();

    number
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| value_error("decimal", text))
}

/// 第一段數字（可含空白千分位），忽略貨幣與單位，`"1 234 Kč"` → 1234
pub fn extract_leading_integer(text: &str) -> Result<u64> {
    let digits: String = INTEGER_PATTERN
        .find(text)
        .ok_or_else(|| value_error("integer", text))?
        .as_str()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();

    digits.parse().map_err(|_| value_error("integer", text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_parse_locale_date() {
        let date = assert_ok!(parse_locale_date("Exp. 5.3.2024 something"));
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());

        let date = assert_ok!(parse_locale_date("platí do 12. 11. 2025"));
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 11, 12).unwrap());
    }

    #[test]
    fn test_parse_locale_date_takes_first_match() {
        let date = assert_ok!(parse_locale_date("od 1.1.2024 do 31.1.2024"));
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_parse_locale_date_failures() {
        assert_err!(parse_locale_date("no date here"));
        assert_err!(parse_locale_date(""));
        assert_err!(parse_locale_date("31.2.2024"));
        assert_err!(parse_locale_date("5.3.24"));
    }

    #[test]
    fn test_parse_locale_decimal() {
        assert_eq!(assert_ok!(parse_locale_decimal("12,5 GB")), 12.5);
        assert_eq!(assert_ok!(parse_locale_decimal("3,5")), 3.5);
        assert_eq!(assert_ok!(parse_locale_decimal(" 50")), 50.0);
        assert_eq!(assert_ok!(parse_locale_decimal("120:30")), 120.0);
        assert_eq!(assert_ok!(parse_locale_decimal("30")), 30.0);
    }

    #[test]
    fn test_parse_locale_decimal_failures() {
        assert_err!(parse_locale_decimal(""));
        assert_err!(parse_locale_decimal("neomezeně"));
        assert_err!(parse_locale_decimal("GB 12,5"));
    }

    #[test]
    fn test_extract_leading_integer() {
        assert_eq!(assert_ok!(extract_leading_integer("1 234 Kč")), 1234);
        assert_eq!(assert_ok!(extract_leading_integer("Kredit: 250 Kč")), 250);
        assert_eq!(assert_ok!(extract_leading_integer("0 Kč do 1.1.2024")), 0);
        assert_eq!(assert_ok!(extract_leading_integer("1\u{a0}500 Kč")), 1500);
    }

    #[test]
    fn test_extract_leading_integer_failures() {
        assert_err!(extract_leading_integer(""));
        assert_err!(extract_leading_integer("Kč"));
    }

    #[test]
    fn test_failures_are_value_parse_errors() {
        use crate::utils::error::ErrorCategory;

        for err in [
            assert_err!(parse_locale_date("bez data")),
            assert_err!(parse_locale_decimal("neomezeně")),
            assert_err!(extract_leading_integer("Kč")),
        ] {
            assert!(matches!(err, StatusError::ValueParseError { .. }));
            assert_eq!(err.category(), ErrorCategory::Parse);
        }
    }
}
