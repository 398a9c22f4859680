use std::str::FromStr;

use chrono::{DateTime, Duration, LocalResult, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// An account's timezone string failed to resolve to an IANA zone.
///
/// Fatal for the calling request: substituting a default zone would shift
/// every day boundary for the account and silently corrupt all derived
/// charts and KPIs.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unresolvable IANA timezone {name:?}")]
pub struct TimezoneError {
    pub name: String,
}

/// Resolve an IANA zone name.
///
/// Spaces are normalized to underscores before lookup, tolerating zone names
/// stored as e.g. "America/New York" by older account setup flows.
pub fn resolve_zone(name: &str) -> Result<Tz, TimezoneError> {
    let normalized = name.trim().replace(' ', "_");
    Tz::from_str(&normalized).map_err(|_| TimezoneError {
        name: name.to_string(),
    })
}

/// Wall-clock calendar date in `tz` at the reference instant.
pub fn local_today(tz: Tz, reference: DateTime<Utc>) -> NaiveDate {
    reference.with_timezone(&tz).date_naive()
}

/// Day key for an arbitrary instant in `tz`.
pub fn local_day_of(tz: Tz, instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// UTC instant of local midnight, `days_ago` days before today in `tz`.
///
/// The zone offset is looked up for the resulting date, never cached from
/// today, so boundaries stay correct across DST transitions.
pub fn day_instant(tz: Tz, days_ago: i64, reference: DateTime<Utc>) -> DateTime<Utc> {
    local_midnight(tz, local_today(tz, reference) - Duration::days(days_ago))
}

/// UTC instant where `day` begins in `tz`.
///
/// When local midnight occurs twice (fall-back) the earlier instant wins;
/// when it does not exist (a zone whose spring-forward jumps over 00:00,
/// e.g. America/Santiago) the first valid wall-clock instant of the day is
/// used instead.
pub fn local_midnight(tz: Tz, day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_hms_opt(0, 0, 0).expect("valid time");
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earlier, _) => earlier.with_timezone(&Utc),
        LocalResult::None => {
            let mut probe = midnight;
            loop {
                probe += Duration::minutes(15);
                match tz.from_local_datetime(&probe) {
                    LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                        return dt.with_timezone(&Utc);
                    }
                    LocalResult::None => continue,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn resolves_names_with_spaces() {
        assert_eq!(
            resolve_zone("America/New York").unwrap(),
            chrono_tz::America::New_York
        );
        assert_eq!(
            resolve_zone(" Europe/Berlin ").unwrap(),
            chrono_tz::Europe::Berlin
        );
    }

    #[test]
    fn invalid_zone_is_an_error_not_a_default() {
        let err = resolve_zone("Mars/Olympus_Mons").unwrap_err();
        assert_eq!(err.name, "Mars/Olympus_Mons");
    }

    #[test]
    fn local_today_matches_wall_clock_date() {
        // 2026-02-01T02:30Z is still 2026-01-31 in New York (UTC-5 in winter)
        // but already 2026-02-01 in Berlin and in Tokyo.
        let reference = utc(2026, 2, 1, 2, 30);
        let ny = local_today(chrono_tz::America::New_York, reference);
        assert_eq!((ny.year(), ny.month(), ny.day()), (2026, 1, 31));
        let berlin = local_today(chrono_tz::Europe::Berlin, reference);
        assert_eq!((berlin.month(), berlin.day()), (2, 1));
        let tokyo = local_today(chrono_tz::Asia::Tokyo, reference);
        assert_eq!((tokyo.month(), tokyo.day()), (2, 1));
    }

    #[test]
    fn day_instant_is_local_midnight_of_local_today() {
        let tz = chrono_tz::America::New_York;
        let reference = utc(2026, 1, 15, 18, 0);
        let instant = day_instant(tz, 0, reference);
        assert_eq!(instant, utc(2026, 1, 15, 5, 0));
        assert_eq!(local_day_of(tz, instant), local_today(tz, reference));
    }

    #[test]
    fn new_york_spring_forward_keeps_midnight_on_standard_offset() {
        // 2024-03-10: clocks jump 02:00 -> 03:00, midnight is still UTC-5.
        let tz = chrono_tz::America::New_York;
        let reference = utc(2024, 3, 10, 18, 0);
        assert_eq!(day_instant(tz, 0, reference), utc(2024, 3, 10, 5, 0));
        // The day before is plain EST as well.
        assert_eq!(day_instant(tz, 1, reference), utc(2024, 3, 9, 5, 0));
    }

    #[test]
    fn new_york_fall_back_uses_daylight_offset_at_midnight() {
        // 2024-11-03: clocks fall back at 02:00, midnight is still UTC-4.
        let tz = chrono_tz::America::New_York;
        let reference = utc(2024, 11, 3, 20, 0);
        assert_eq!(day_instant(tz, 0, reference), utc(2024, 11, 3, 4, 0));
        // One day later midnight is back on standard time.
        assert_eq!(
            local_midnight(tz, NaiveDate::from_ymd_opt(2024, 11, 4).unwrap()),
            utc(2024, 11, 4, 5, 0)
        );
    }

    #[test]
    fn berlin_spring_forward_day_boundaries() {
        // EU spring-forward date: offset changes +01:00 -> +02:00 at 02:00.
        let tz = chrono_tz::Europe::Berlin;
        let reference = utc(2024, 3, 31, 12, 0);
        assert_eq!(local_today(tz, reference), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        // Midnight of the transition day itself precedes the jump: +01:00.
        assert_eq!(day_instant(tz, 0, reference), utc(2024, 3, 30, 23, 0));
        assert_eq!(day_instant(tz, 1, reference), utc(2024, 3, 29, 23, 0));
        // The day after the transition is fully on summer time: +02:00.
        assert_eq!(
            local_midnight(tz, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()),
            utc(2024, 3, 31, 22, 0)
        );
    }

    #[test]
    fn skipped_local_midnight_resolves_to_first_valid_instant() {
        // Chile's spring-forward jumps 00:00 -> 01:00; local midnight of
        // 2024-09-08 does not exist. First valid time is 01:00 at UTC-3.
        let tz = chrono_tz::America::Santiago;
        let day = NaiveDate::from_ymd_opt(2024, 9, 8).unwrap();
        assert_eq!(local_midnight(tz, day), utc(2024, 9, 8, 4, 0));
    }
}
