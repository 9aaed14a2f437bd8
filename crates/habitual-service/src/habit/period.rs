//! Calendar period boundaries for bucketing habit entries.
//!
//! Weeks start on [`WEEK_START`]. Boundaries are computed on the local
//! calendar of the zone the reference instant is expressed in.

use chrono::{
    DateTime, Datelike, Days, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta,
    TimeZone, Utc, Weekday,
};

use habitual_core::config::HabitsConfig;
use habitual_core::types::Frequency;

use crate::error::{ServiceError, ServiceResult};

pub const WEEK_START: Weekday = Weekday::Sun;

/// Longest DST gap searched when local midnight does not exist.
const MAX_GAP_MINUTES: i64 = 3 * 60;

/// Inclusive `[start, end]` span of a period; `end` is the last millisecond.
#[derive(Debug, Clone)]
pub struct DateRange<Tz: TimeZone> {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl<Tz: TimeZone> DateRange<Tz> {
    #[must_use]
    pub fn contains<Other: TimeZone>(&self, instant: &DateTime<Other>) -> bool {
        *instant >= self.start && *instant <= self.end
    }

    #[must_use]
    pub fn to_utc(&self) -> DateRange<Utc> {
        DateRange {
            start: self.start.with_timezone(&Utc),
            end: self.end.with_timezone(&Utc),
        }
    }
}

/// ## Summary
/// First and last calendar day (inclusive) of the period containing `date`.
#[must_use]
pub fn period_days(date: NaiveDate, frequency: Frequency) -> (NaiveDate, NaiveDate) {
    let (first, next) = period_bounds(date, frequency);
    (first, next.pred_opt().unwrap_or(first))
}

/// First day of the period and first day of the following period.
fn period_bounds(date: NaiveDate, frequency: Frequency) -> (NaiveDate, NaiveDate) {
    let first = match frequency {
        Frequency::Daily => date,
        Frequency::Weekly => date.week(WEEK_START).first_day(),
        Frequency::Monthly => date.with_day(1).unwrap_or(date),
    };
    let next = match frequency {
        Frequency::Daily => first.checked_add_days(Days::new(1)),
        Frequency::Weekly => first.checked_add_days(Days::new(7)),
        Frequency::Monthly => first.checked_add_months(Months::new(1)),
    };
    (first, next.unwrap_or(NaiveDate::MAX))
}

/// Local midnight of `date`, resolved to the earliest instant when ambiguous
/// and to the first valid instant after a DST gap.
fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);

    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(instant) | LocalResult::Ambiguous(instant, _) => instant,
        LocalResult::None => first_valid_after(tz, midnight),
    }
}

fn first_valid_after<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Tz> {
    (1..=MAX_GAP_MINUTES)
        .filter_map(|minutes| local.checked_add_signed(TimeDelta::minutes(minutes)))
        .find_map(|candidate| tz.from_local_datetime(&candidate).earliest())
        .unwrap_or_else(|| tz.from_utc_datetime(&local))
}

fn range_for_date<Tz: TimeZone>(tz: &Tz, date: NaiveDate, frequency: Frequency) -> DateRange<Tz> {
    let (first, next) = period_bounds(date, frequency);
    DateRange {
        start: start_of_day(tz, first),
        end: start_of_day(tz, next) - TimeDelta::milliseconds(1),
    }
}

/// ## Summary
/// Returns the day, week or month containing `reference`, on the calendar of
/// the reference's own time zone.
#[must_use]
pub fn date_range<Tz: TimeZone>(reference: &DateTime<Tz>, frequency: Frequency) -> DateRange<Tz> {
    range_for_date(&reference.timezone(), reference.date_naive(), frequency)
}

/// ## Summary
/// Like [`date_range`] for a frequency name; unrecognized names give the daily range.
#[must_use]
pub fn date_range_lenient<Tz: TimeZone>(reference: &DateTime<Tz>, frequency: &str) -> DateRange<Tz> {
    date_range(reference, Frequency::parse_lenient(frequency))
}

/// Calendar used to decide which day an entry belongs to.
#[derive(Debug, Clone, Copy, Default)]
pub enum CalendarZone {
    /// The host system's local zone.
    #[default]
    Local,
    Named(chrono_tz::Tz),
}

impl CalendarZone {
    /// ## Summary
    /// Picks the zone named by `habits.timezone`, or the host zone when unset.
    ///
    /// ## Errors
    /// Returns `InvalidConfiguration` for an unknown IANA zone name.
    pub fn from_config(config: &HabitsConfig) -> ServiceResult<Self> {
        match config.timezone.as_deref().map(str::trim) {
            None | Some("") => Ok(Self::Local),
            Some(name) => name.parse::<chrono_tz::Tz>().map(Self::Named).map_err(|e| {
                ServiceError::InvalidConfiguration(format!("Unknown timezone `{name}`: {e}"))
            }),
        }
    }

    #[must_use]
    pub fn today(self) -> NaiveDate {
        self.date_of(&Utc::now())
    }

    /// Calendar date of an instant in this zone.
    #[must_use]
    pub fn date_of<Other: TimeZone>(self, instant: &DateTime<Other>) -> NaiveDate {
        match self {
            Self::Local => instant.with_timezone(&chrono::Local).date_naive(),
            Self::Named(tz) => instant.with_timezone(&tz).date_naive(),
        }
    }

    #[must_use]
    pub fn period_for_date(self, date: NaiveDate, frequency: Frequency) -> DateRange<Utc> {
        match self {
            Self::Local => range_for_date(&chrono::Local, date, frequency).to_utc(),
            Self::Named(tz) => range_for_date(&tz, date, frequency).to_utc(),
        }
    }
}
