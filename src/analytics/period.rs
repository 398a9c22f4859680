use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::local_day::local_today;

/// Calendar period enclosing "today", used for KPI windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Week,
    Month,
    Year,
}

impl Period {
    /// Day offset from today back to the start of the enclosing period,
    /// shifted by whole periods via `modifier` (0 = the period containing
    /// today, -1 = previous period, +1 = next).
    ///
    /// With modifier 0 the result is always >= 0 (today is on or after its
    /// own period start); positive modifiers can go negative, meaning the
    /// period start lies in the future.
    pub fn days_to_start(self, tz: Tz, modifier: i32, reference: DateTime<Utc>) -> i64 {
        let today = local_today(tz, reference);
        match self {
            Period::Week => {
                // Weeks are ISO, anchored on Monday. Weekday is taken as
                // 0=Sunday..6=Saturday to mirror the dashboard's convention.
                let dow = today.weekday().num_days_from_sunday() as i64;
                (7 + dow - 1) % 7 - 7 * i64::from(modifier)
            }
            // Whole-day difference, not calendar shortcuts: month lengths
            // differ, so subtract actual first-of-month dates.
            Period::Month => (today - first_of_shifted_month(today, modifier)).num_days(),
            Period::Year => {
                let jan1 = NaiveDate::from_ymd_opt(today.year() + modifier, 1, 1)
                    .expect("valid date");
                (today - jan1).num_days()
            }
        }
    }
}

/// First day of the month `offset` months away from `day`'s month,
/// rolling over years as needed.
fn first_of_shifted_month(day: NaiveDate, offset: i32) -> NaiveDate {
    let months = day.year() * 12 + day.month0() as i32 + offset;
    NaiveDate::from_ymd_opt(months.div_euclid(12), months.rem_euclid(12) as u32 + 1, 1)
        .expect("valid date")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const TZ: Tz = chrono_tz::Europe::Berlin;

    fn utc(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    #[test]
    fn week_offsets_are_monday_anchored() {
        // 2026-03-11 is a Wednesday.
        let reference = utc(2026, 3, 11, 12);
        assert_eq!(Period::Week.days_to_start(TZ, 0, reference), 2);
        assert_eq!(Period::Week.days_to_start(TZ, -1, reference), 9);
        assert_eq!(Period::Week.days_to_start(TZ, 1, reference), -5);
        // Monday itself is its own week start.
        assert_eq!(Period::Week.days_to_start(TZ, 0, utc(2026, 3, 9, 12)), 0);
        // Sunday is the last day of the ISO week.
        assert_eq!(Period::Week.days_to_start(TZ, 0, utc(2026, 3, 15, 12)), 6);
    }

    #[test]
    fn month_offsets_cross_month_length_differences() {
        // 2024-03-10: March 1st is 9 days back; February 2024 had 29 days.
        let reference = utc(2024, 3, 10, 12);
        assert_eq!(Period::Month.days_to_start(TZ, 0, reference), 9);
        assert_eq!(Period::Month.days_to_start(TZ, -1, reference), 9 + 29);
        assert_eq!(Period::Month.days_to_start(TZ, 1, reference), 9 - 31);
    }

    #[test]
    fn month_offsets_roll_over_years() {
        let reference = utc(2026, 1, 15, 12);
        assert_eq!(Period::Month.days_to_start(TZ, 0, reference), 14);
        // Previous month start is 2025-12-01.
        assert_eq!(Period::Month.days_to_start(TZ, -1, reference), 14 + 31);
        assert_eq!(
            Period::Month.days_to_start(TZ, -13, reference),
            14 + 31 + 365
        );
    }

    #[test]
    fn year_offsets_account_for_leap_years() {
        // 2024-03-10 is day 69 of the leap year 2024.
        let reference = utc(2024, 3, 10, 12);
        assert_eq!(Period::Year.days_to_start(TZ, 0, reference), 69);
        // 2023 had 365 days.
        assert_eq!(Period::Year.days_to_start(TZ, -1, reference), 69 + 365);
        // 2025 lookahead crosses the rest of leap-year 2024.
        assert_eq!(Period::Year.days_to_start(TZ, 1, reference), 69 - 366);
    }

    #[test]
    fn modifier_zero_is_never_negative_across_a_sample_year() {
        let mut reference = utc(2024, 1, 1, 12);
        for _ in 0..366 {
            for period in [Period::Week, Period::Month, Period::Year] {
                assert!(period.days_to_start(TZ, 0, reference) >= 0);
            }
            reference += chrono::Duration::days(1);
        }
    }

    #[test]
    fn zone_affects_which_day_is_today() {
        // 2026-03-10T01:30Z is already Tuesday 02:30 in Berlin but still
        // Monday 21:30 in New York.
        let reference = utc(2026, 3, 10, 1) + chrono::Duration::minutes(30);
        let berlin = Period::Week.days_to_start(chrono_tz::Europe::Berlin, 0, reference);
        let new_york = Period::Week.days_to_start(chrono_tz::America::New_York, 0, reference);
        assert_eq!(berlin, 1); // already Tuesday in Berlin
        assert_eq!(new_york, 0); // still Monday in New York
    }
}
