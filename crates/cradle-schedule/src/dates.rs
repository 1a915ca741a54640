//! Fractional-month date arithmetic.
//!
//! Reference offsets and interval rules are expressed in months and may be
//! fractional (6 weeks is 1.5 months). Whole months use calendar arithmetic;
//! the fractional remainder converts at 30 days per month, rounded to the
//! nearest day. Integer truncation of the offset would collapse 1.5 months
//! to 1 and is exactly what this module exists to avoid.

use chrono::{Days, Months, NaiveDate};

/// Days attributed to one month when converting a fractional remainder.
const DAYS_PER_MONTH: f64 = 30.0;

/// Add a (possibly fractional, non-negative) number of months to a date.
///
/// Whole months are added as calendar months (end-of-month clamping per
/// chrono), then the fractional part as rounded days. Saturates at
/// `NaiveDate::MAX` on overflow, which is unreachable for any real schedule.
#[must_use]
pub fn add_months(date: NaiveDate, months: f64) -> NaiveDate {
    let whole = months.trunc() as u32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let extra_days = (months.fract() * DAYS_PER_MONTH).round() as u64;

    date.checked_add_months(Months::new(whole))
        .and_then(|d| d.checked_add_days(Days::new(extra_days)))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[rstest]
    #[case(d(2024, 1, 1), 0.0, d(2024, 1, 1))]
    #[case(d(2024, 1, 1), 1.0, d(2024, 2, 1))]
    #[case(d(2024, 1, 1), 1.5, d(2024, 2, 16))]
    #[case(d(2024, 1, 1), 2.5, d(2024, 3, 16))]
    #[case(d(2024, 1, 10), 1.0, d(2024, 2, 10))]
    #[case(d(2024, 1, 1), 6.0, d(2024, 7, 1))]
    #[case(d(2024, 1, 1), 18.0, d(2025, 7, 1))]
    fn fractional_month_offsets(
        #[case] start: NaiveDate,
        #[case] months: f64,
        #[case] expected: NaiveDate,
    ) {
        assert_eq!(add_months(start, months), expected);
    }

    #[test]
    fn end_of_month_clamps() {
        // Jan 31 + 1 month clamps to Feb 29 in a leap year
        assert_eq!(add_months(d(2024, 1, 31), 1.0), d(2024, 2, 29));
    }

    #[test]
    fn fraction_rounds_to_nearest_day() {
        // 0.05 months = 1.5 days, rounds to 2
        assert_eq!(add_months(d(2024, 1, 1), 0.05), d(2024, 1, 3));
    }
}
