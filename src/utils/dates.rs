//! Date parsing and formatting
//!
//! Converts between [`CalendarMoment`] values and the two fixed layouts
//! `YYYY-MM-DD` and `YYYY-MM-DD HH:MM:SS`, and answers day-relative
//! questions ("is this today?") against a reference timezone.
//!
//! The reference timezone and the clock are explicit: a [`DateKit`] is
//! built from configuration and every day-boundary computation goes
//! through it, so tests can pin both.

use crate::error::{KitError, KitResult};
use crate::stores::SystemClock;
use crate::traits::Clock;
use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike,
    Weekday,
};
use regex::Regex;
use serde::Serialize;
use std::sync::{Arc, LazyLock};
use tracing::warn;

/// Layout name used in `MalformedInput` errors for dates
pub const DATE_LAYOUT: &str = "YYYY-MM-DD";
/// Layout name used in `MalformedInput` errors for date-times
pub const DATE_TIME_LAYOUT: &str = "YYYY-MM-DD HH:MM:SS";

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SECONDS_PER_DAY: i64 = 86_400;

/// Day 0 of the Unix epoch counted from a Monday-first week
///
/// `(days - 3) mod 7` lands on the right weekday only when `days` is
/// derived from a midnight east of UTC (the +08:00 default). Other
/// offsets shift the result by a day; see [`DateKit::weekday_name`].
const WEEKDAY_EPOCH_SHIFT: i64 = 3;

/// Default weekday names, Monday first
pub const DEFAULT_WEEKDAY_NAMES: [&str; 7] = [
    "星期一", "星期二", "星期三", "星期四", "星期五", "星期六", "星期日",
];

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid regex"));
static OFFSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-])([0-9]{2}):?([0-9]{2})$").expect("valid regex"));
static DATE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}$").expect("valid regex")
});

/// A point in time decomposed into calendar components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CalendarMoment {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub nanosecond: u32,
    pub weekday: Weekday,
}

impl CalendarMoment {
    /// Decomposes a naive (wall-clock) date-time
    pub fn from_naive(naive: &NaiveDateTime) -> Self {
        Self {
            year: naive.year(),
            month: naive.month(),
            day: naive.day(),
            hour: naive.hour(),
            minute: naive.minute(),
            second: naive.second(),
            nanosecond: naive.nanosecond(),
            weekday: naive.weekday(),
        }
    }

    /// Decomposes an instant as seen in its own timezone
    pub fn from_datetime<Tz: TimeZone>(datetime: &DateTime<Tz>) -> Self {
        Self::from_naive(&datetime.naive_local())
    }

    /// The calendar date part, or `None` if the components are out of range
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// Recomposes the wall-clock date-time
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        self.date()?
            .and_hms_nano_opt(self.hour, self.minute, self.second, self.nanosecond)
    }

    /// Recomposes the instant in the given fixed-offset timezone
    pub fn to_datetime(&self, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
        offset.from_local_datetime(&self.to_naive()?).single()
    }

    /// `HH:MM`
    pub fn hour_minute(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

/// Formats the date part as `YYYY-MM-DD`
pub fn format_date(moment: &CalendarMoment) -> String {
    format!("{:04}-{:02}-{:02}", moment.year, moment.month, moment.day)
}

/// Formats as `YYYY-MM-DD HH:MM:SS`
pub fn format_date_time(moment: &CalendarMoment) -> String {
    format!(
        "{} {:02}:{:02}:{:02}",
        format_date(moment),
        moment.hour,
        moment.minute,
        moment.second
    )
}

/// Parses an exact `YYYY-MM-DD` string
///
/// The time components of the result are zero.
///
/// # Errors
/// `MalformedInput` if the layout differs or the date does not exist.
pub fn parse_date(input: &str) -> KitResult<CalendarMoment> {
    if !DATE_RE.is_match(input) {
        return Err(KitError::malformed(input, DATE_LAYOUT));
    }
    let date = NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|_| KitError::malformed(input, DATE_LAYOUT))?;
    Ok(CalendarMoment::from_naive(&date.and_time(NaiveTime::MIN)))
}

/// Parses an exact `YYYY-MM-DD HH:MM:SS` string
///
/// # Errors
/// `MalformedInput` if the layout differs or any component is out of range.
pub fn parse_date_time(input: &str) -> KitResult<CalendarMoment> {
    if !DATE_TIME_RE.is_match(input) {
        return Err(KitError::malformed(input, DATE_TIME_LAYOUT));
    }
    let naive = NaiveDateTime::parse_from_str(input, DATE_TIME_FORMAT)
        .map_err(|_| KitError::malformed(input, DATE_TIME_LAYOUT))?;
    Ok(CalendarMoment::from_naive(&naive))
}

/// Formats a `YYYY-MM-DD` string as `MM月dd日`
pub fn month_day_label(input: &str) -> KitResult<String> {
    let moment = parse_date(input)?;
    Ok(format!("{:02}月{:02}日", moment.month, moment.day))
}

/// Parses a UTC offset such as `+08:00` or `-0530`
pub fn parse_offset(input: &str) -> KitResult<FixedOffset> {
    let invalid = || KitError::InvalidOffset(input.to_owned());

    let caps = OFFSET_RE.captures(input.trim()).ok_or_else(invalid)?;
    let hours: i32 = caps[2].parse().map_err(|_| invalid())?;
    let minutes: i32 = caps[3].parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }
    let seconds = hours * 3600 + minutes * 60;
    let seconds = if &caps[1] == "-" { -seconds } else { seconds };
    FixedOffset::east_opt(seconds).ok_or_else(invalid)
}

/// Timezone-aware date operations
///
/// Holds the reference timezone, the weekday names and the clock. Cheap
/// to clone and safe to share across threads.
#[derive(Clone)]
pub struct DateKit {
    offset: FixedOffset,
    weekday_names: Arc<[String; 7]>,
    clock: Arc<dyn Clock>,
}

impl DateKit {
    pub fn new(offset: FixedOffset, weekday_names: [String; 7], clock: Arc<dyn Clock>) -> Self {
        Self {
            offset,
            weekday_names: Arc::new(weekday_names),
            clock,
        }
    }

    /// A kit for `offset` with the default weekday names and the system clock
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self::new(
            offset,
            DEFAULT_WEEKDAY_NAMES.map(String::from),
            Arc::new(SystemClock),
        )
    }

    /// Replaces the clock, keeping timezone and names
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The reference timezone
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The current instant in the reference timezone
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now().with_timezone(&self.offset)
    }

    fn today_date(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Today's date as `YYYY-MM-DD`
    pub fn today(&self) -> String {
        self.now().format(DATE_FORMAT).to_string()
    }

    /// Midnight at the start of today
    pub fn start_of_today(&self) -> DateTime<FixedOffset> {
        let midnight = self.today_date().and_time(NaiveTime::MIN);
        DateTime::from_naive_utc_and_offset(midnight - self.offset, self.offset)
    }

    /// Whether `date` (`YYYY-MM-DD`) is today; malformed input is `false`
    pub fn is_today(&self, date: &str) -> bool {
        parse_date(date)
            .ok()
            .and_then(|moment| moment.date())
            .is_some_and(|d| d == self.today_date())
    }

    /// Whether `date` (`YYYY-MM-DD`) is the day before today
    pub fn is_yesterday(&self, date: &str) -> bool {
        let yesterday = self.today_date().pred_opt();
        parse_date(date)
            .ok()
            .and_then(|moment| moment.date())
            .is_some_and(|d| Some(d) == yesterday)
    }

    /// Unix seconds of midnight at the start of `date` in the reference timezone
    pub fn timestamp_of_date(&self, date: &str) -> KitResult<i64> {
        let naive = parse_date(date)?
            .to_naive()
            .ok_or_else(|| KitError::malformed(date, DATE_LAYOUT))?;
        Ok(naive.and_utc().timestamp() - i64::from(self.offset.local_minus_utc()))
    }

    /// Weekday name for a `YYYY-MM-DD` string
    ///
    /// Computes `(floor(midnight / 86400) - 3) mod 7` and indexes the
    /// Monday-first name table. The formula is kept as is even when it
    /// disagrees with the calendar (offsets at or west of UTC); the
    /// disagreement is logged.
    pub fn weekday_name(&self, date: &str) -> KitResult<String> {
        let timestamp = self.timestamp_of_date(date)?;
        let days = timestamp.div_euclid(SECONDS_PER_DAY);
        let index = (days - WEEKDAY_EPOCH_SHIFT).rem_euclid(7) as usize;

        if let Some(actual) = parse_date(date)?.date().map(|d| d.weekday()) {
            let expected = actual.num_days_from_monday() as usize;
            if expected != index {
                warn!(
                    date,
                    offset = %self.offset,
                    formula_index = index,
                    calendar_index = expected,
                    "weekday formula disagrees with calendar"
                );
            }
        }

        Ok(self.weekday_names[index].clone())
    }

    /// Formats a Unix timestamp string (seconds, fractions allowed)
    ///
    /// # Errors
    /// `InvalidTimestamp` if the string is not a finite number or the
    /// instant cannot be represented.
    pub fn timestamp_to_string(&self, timestamp: &str) -> KitResult<String> {
        let invalid = || KitError::InvalidTimestamp(timestamp.to_owned());

        let value: f64 = timestamp.trim().parse().map_err(|_| invalid())?;
        if !value.is_finite() || value.abs() > i64::MAX as f64 {
            return Err(invalid());
        }
        let whole = value.floor();
        let nanos = (((value - whole) * 1e9).round() as u32).min(999_999_999);
        let instant = DateTime::from_timestamp(whole as i64, nanos).ok_or_else(invalid)?;

        Ok(instant
            .with_timezone(&self.offset)
            .format(DATE_TIME_FORMAT)
            .to_string())
    }

    /// Decomposes the current instant
    pub fn now_moment(&self) -> CalendarMoment {
        CalendarMoment::from_datetime(&self.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::FixedClock;

    fn beijing() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    /// 2024-03-15 02:30:00 +08:00 (Friday)
    fn kit() -> DateKit {
        let clock = FixedClock::at_timestamp(1_710_441_000).unwrap();
        DateKit::with_offset(beijing()).with_clock(Arc::new(clock))
    }

    #[test]
    fn test_parse_date_round_trip() {
        for input in ["2024-01-01", "1970-01-01", "2000-02-29", "9999-12-31"] {
            let moment = parse_date(input).unwrap();
            assert_eq!(format_date(&moment), input);
            assert_eq!((moment.hour, moment.minute, moment.second), (0, 0, 0));
        }
    }

    #[test]
    fn test_parse_date_rejects_bad_layouts() {
        for input in [
            "", "2024-1-01", "2024/01/01", "24-01-01", "2024-01-01 ", " 2024-01-01",
            "2024-13-01", "2023-02-29", "2024-01-32", "２０２４-01-01",
        ] {
            assert!(
                matches!(parse_date(input), Err(KitError::MalformedInput { .. })),
                "{:?}",
                input
            );
        }
    }

    #[test]
    fn test_parse_date_time() {
        let moment = parse_date_time("2007-06-29 14:23:09").unwrap();
        assert_eq!(moment.year, 2007);
        assert_eq!(moment.hour, 14);
        assert_eq!(moment.second, 9);
        assert_eq!(moment.weekday, Weekday::Fri);
        assert_eq!(format_date_time(&moment), "2007-06-29 14:23:09");
        assert_eq!(moment.hour_minute(), "14:23");

        assert!(parse_date_time("2007-06-29").is_err());
        assert!(parse_date_time("2007-06-29 24:00:00").is_err());
        assert!(parse_date_time("2007-06-29T14:23:09").is_err());
    }

    #[test]
    fn test_moment_recomposes_losslessly() {
        let moment = parse_date_time("2021-11-05 23:59:58").unwrap();
        let datetime = moment.to_datetime(beijing()).unwrap();
        assert_eq!(CalendarMoment::from_datetime(&datetime), moment);
    }

    #[test]
    fn test_today_uses_reference_offset() {
        let kit = kit();
        assert_eq!(kit.today(), "2024-03-15");
        assert_eq!(format_date(&kit.now_moment()), "2024-03-15");

        // Same instant is still the 14th in UTC
        let utc = DateKit::with_offset(FixedOffset::east_opt(0).unwrap())
            .with_clock(Arc::new(FixedClock::at_timestamp(1_710_441_000).unwrap()));
        assert_eq!(utc.today(), "2024-03-14");
    }

    #[test]
    fn test_today_and_yesterday_predicates() {
        let kit = kit();
        assert!(kit.is_today(&kit.today()));
        assert!(kit.is_today("2024-03-15"));
        assert!(!kit.is_today("2024-03-14"));
        assert!(kit.is_yesterday("2024-03-14"));
        assert!(!kit.is_yesterday("2024-03-15"));
        assert!(!kit.is_yesterday("2024-03-13"));
        assert!(!kit.is_today("garbage"));
        assert!(!kit.is_yesterday(""));
    }

    #[test]
    fn test_start_of_today() {
        let start = kit().start_of_today();
        assert_eq!(start.to_rfc3339(), "2024-03-15T00:00:00+08:00");
    }

    #[test]
    fn test_timestamp_of_date() {
        assert_eq!(kit().timestamp_of_date("1970-01-01").unwrap(), -28_800);
        assert_eq!(kit().timestamp_of_date("1970-01-02").unwrap(), 57_600);
    }

    #[test]
    fn test_weekday_name_epoch_is_thursday() {
        // floor(-28800 / 86400) = -1, (-1 - 3) mod 7 = 3
        assert_eq!(kit().weekday_name("1970-01-01").unwrap(), "星期四");
    }

    #[test]
    fn test_weekday_name_matches_calendar_east_of_utc() {
        let kit = kit();
        assert_eq!(kit.weekday_name("2024-01-01").unwrap(), "星期一");
        assert_eq!(kit.weekday_name("2024-03-17").unwrap(), "星期日");
        assert!(kit.weekday_name("2024-02-30").is_err());
    }

    #[test]
    fn test_weekday_formula_shifts_at_utc() {
        let utc = DateKit::with_offset(FixedOffset::east_opt(0).unwrap());
        // 2024-01-01 is a Monday; the formula yields Tuesday at UTC
        assert_eq!(utc.weekday_name("2024-01-01").unwrap(), "星期二");
    }

    #[test]
    fn test_timestamp_to_string() {
        let kit = kit();
        assert_eq!(kit.timestamp_to_string("0").unwrap(), "1970-01-01 08:00:00");
        assert_eq!(
            kit.timestamp_to_string("1710441000.75").unwrap(),
            "2024-03-15 02:30:00"
        );
        assert_eq!(kit.timestamp_to_string("-1").unwrap(), "1970-01-01 07:59:59");
    }

    #[test]
    fn test_timestamp_to_string_rejects_garbage() {
        let kit = kit();
        for input in ["", "abc", "12abc", "NaN", "inf", "1e300"] {
            assert!(
                matches!(
                    kit.timestamp_to_string(input),
                    Err(KitError::InvalidTimestamp(_))
                ),
                "{:?}",
                input
            );
        }
    }

    #[test]
    fn test_month_day_label() {
        assert_eq!(month_day_label("2024-03-05").unwrap(), "03月05日");
        assert!(month_day_label("").is_err());
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("+08:00").unwrap(), beijing());
        assert_eq!(
            parse_offset("-05:30").unwrap(),
            FixedOffset::west_opt(5 * 3600 + 1800).unwrap()
        );
        assert_eq!(parse_offset("+0000").unwrap(), FixedOffset::east_opt(0).unwrap());
        assert!(parse_offset("+24:00").is_err());
        assert!(matches!(
            parse_offset("Asia/Beijing"),
            Err(KitError::InvalidOffset(_))
        ));
    }
}
