//! Presentation helpers used by the contract documents: `ru-RU` number
//! grouping, contract date styles, the initial payment percentage, and the
//! "Surname I. I." signature form.

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Group separator used by the `ru-RU` number style (U+00A0 NO-BREAK SPACE).
pub const GROUP_SEPARATOR: char = '\u{a0}';

const MONTHS_GENITIVE: [&str; 12] = [
    "Января", "Февраля", "Марта", "Апреля", "Мая", "Июня",
    "Июля", "Августа", "Сентября", "Октября", "Ноября", "Декабря",
];

/// How a contract date is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `22.09.2025`
    Short,
    /// `22 Сентября 2025г.`
    Long,
}

/// Rounds to the nearest whole unit with halves going up (`2.5 → 3`,
/// `-2.5 → -2`).
pub fn round_half_up(value: Decimal) -> Decimal {
    let strategy = if value.is_sign_negative() {
        RoundingStrategy::MidpointTowardZero
    } else {
        RoundingStrategy::MidpointAwayFromZero
    };
    value.round_dp_with_strategy(0, strategy)
}

/// Formats a number the way the `ru-RU` locale does: up to three fraction
/// digits after a comma and no-break-space thousands grouping.
///
/// Zero is always `"0"`, including values that round to negative zero.
pub fn format_number(value: Decimal) -> String {
    let rounded = value
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    if rounded.is_zero() {
        return "0".to_string();
    }

    let digits = rounded.abs().to_string();
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + 4);
    if rounded.is_sign_negative() {
        out.push('-');
    }
    out.push_str(&group_thousands(integer));
    if let Some(fraction) = fraction {
        out.push(',');
        out.push_str(fraction);
    }
    out
}

fn group_thousands(integer: &str) -> String {
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats a monetary amount in whole currency units.
pub fn format_currency(amount: Decimal) -> String {
    format_number(round_half_up(amount))
}

/// Writes `date` in the given contract style.
pub fn format_date(date: NaiveDate, style: DateStyle) -> String {
    match style {
        DateStyle::Short => format!("{:02}.{:02}.{}", date.day(), date.month(), date.year()),
        DateStyle::Long => format!(
            "{} {} {}г.",
            date.day(),
            MONTHS_GENITIVE[date.month0() as usize],
            date.year()
        ),
    }
}

/// Like [`format_date`], with an unset date rendering as an empty string.
pub fn format_optional_date(date: Option<NaiveDate>, style: DateStyle) -> String {
    date.map(|d| format_date(d, style)).unwrap_or_default()
}

/// Share of the total price covered by the down payment, in whole percent.
///
/// Always rounds up, so 33.3% is shown as 34. Returns 0 when either amount is
/// not positive.
pub fn initial_payment_percent(total_price: Decimal, down_payment: Decimal) -> u32 {
    if total_price <= Decimal::ZERO || down_payment <= Decimal::ZERO {
        return 0;
    }
    down_payment
        .checked_div(total_price)
        .and_then(|share| share.checked_mul(dec!(100)))
        .and_then(|percent| percent.ceil().to_u32())
        .unwrap_or(u32::MAX)
}

/// Turns "Ivanov Ivan Ivanovich" into "Ivanov I. I.".
pub fn short_name(full_name: &str) -> String {
    let parts: Vec<&str> = full_name.split_whitespace().collect();
    if parts.len() < 2 {
        return full_name.to_string();
    }

    let initials: Vec<String> = parts[1..]
        .iter()
        .filter_map(|part| part.chars().next())
        .map(|initial| format!("{initial}."))
        .collect();

    format!("{} {}", parts[0], initials.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(dec!(0), "0")]
    #[case(dec!(999), "999")]
    #[case(dec!(1000), "1\u{a0}000")]
    #[case(dec!(9999), "9\u{a0}999")]
    #[case(dec!(-1500), "-1\u{a0}500")]
    #[case(dec!(10000), "10\u{a0}000")]
    #[case(dec!(5000000), "5\u{a0}000\u{a0}000")]
    #[case(dec!(123456.5), "123\u{a0}456,5")]
    #[case(dec!(12.3456), "12,346")]
    #[case(dec!(12.3000), "12,3")]
    #[case(dec!(-25000), "-25\u{a0}000")]
    #[case(dec!(-0.0001), "0")]
    fn test_format_number(#[case] input: Decimal, #[case] expected: &str) {
        assert_eq!(format_number(input), expected);
    }

    #[rstest]
    #[case(dec!(2.5), dec!(3))]
    #[case(dec!(2.49), dec!(2))]
    #[case(dec!(-2.5), dec!(-2))]
    #[case(dec!(-2.51), dec!(-3))]
    #[case(dec!(1333333.3333), dec!(1333333))]
    #[case(Decimal::MAX, Decimal::MAX)]
    fn test_round_half_up(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_half_up(input), expected);
    }

    #[test]
    fn test_format_currency_drops_fraction() {
        assert_eq!(format_currency(dec!(1333333.5)), "1\u{a0}333\u{a0}334");
        assert_eq!(format_currency(dec!(0.4)), "0");
        assert_eq!(format_currency(dec!(999.5)), "1\u{a0}000");
    }

    #[test]
    fn test_format_date_styles() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 2).unwrap();
        assert_eq!(format_date(date, DateStyle::Short), "02.09.2025");
        assert_eq!(format_date(date, DateStyle::Long), "2 Сентября 2025г.");

        let new_year = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        assert_eq!(format_date(new_year, DateStyle::Long), "31 Января 2026г.");
        assert_eq!(format_optional_date(None, DateStyle::Short), "");
    }

    #[rstest]
    #[case(dec!(1000000), dec!(333000), 34)]
    #[case(dec!(1000000), dec!(500000), 50)]
    #[case(dec!(3), dec!(1), 34)]
    #[case(dec!(0), dec!(1000), 0)]
    #[case(dec!(1000000), dec!(0), 0)]
    #[case(dec!(1000000), dec!(-5), 0)]
    #[case(dec!(0.0000000000000000000000000001), Decimal::MAX, u32::MAX)]
    fn test_initial_payment_percent(
        #[case] total: Decimal,
        #[case] down: Decimal,
        #[case] expected: u32,
    ) {
        assert_eq!(initial_payment_percent(total, down), expected);
    }

    #[rstest]
    #[case("Ivanov Ivan Ivanovich", "Ivanov I. I.")]
    #[case("  Петров   Пётр  ", "Петров П.")]
    #[case("Ivanov", "Ivanov")]
    #[case("", "")]
    fn test_short_name(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(short_name(input), expected);
    }
}
