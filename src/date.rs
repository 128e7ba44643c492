//! Resolution of the date strings accepted by the `date` field.
//!
//! Values resolve to an inclusive span of civil days so that both single days
//! (`2020-01-01`, `yesterday`) and periods (`thismonth`) fit one shape. Keywords
//! and `N units ago` are relative to [`DateContext::today`], which is the only
//! time-dependent input of the compilers.

use jiff::{Span, Timestamp, civil::Date, tz::TimeZone};
use std::fmt;

/// "Today" plus the zone that instants (`2020-01-31T10:15:00Z`) are read in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateContext {
    pub tz: TimeZone,
    pub today: Date,
}

impl DateContext {
    /// Today in the system time zone.
    pub fn capture() -> Self {
        let tz = TimeZone::system();
        let zoned = Timestamp::now().to_zoned(tz.clone());
        Self {
            tz,
            today: zoned.date(),
        }
    }

    /// Pinned day, instants read in UTC.
    pub fn at(today: Date) -> Self {
        Self {
            tz: TimeZone::UTC,
            today,
        }
    }
}

impl Default for DateContext {
    fn default() -> Self {
        Self::capture()
    }
}

/// Inclusive range of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: Date,
    pub end: Date,
}

impl DateSpan {
    fn day(date: Date) -> Self {
        Self {
            start: date,
            end: date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateError {
    pub message: String,
    pub input: String,
}

impl DateError {
    fn new(message: impl Into<String>, input: &str) -> Self {
        Self {
            message: message.into(),
            input: input.to_string(),
        }
    }
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.message, self.input)
    }
}

impl std::error::Error for DateError {}

/// Resolves `raw` to the days it denotes. Tried in order: keywords, absolute
/// dates in common layouts, RFC 3339 instants (in the context's zone), ISO
/// date-times, relative spans (`2 weeks ago`).
pub fn resolve_date(raw: &str, context: &DateContext) -> Result<DateSpan, DateError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DateError::new("date requires a value", raw));
    }
    if let Some(span) = keyword_range(trimmed, context) {
        return Ok(span);
    }
    if let Some(date) = parse_absolute_date(trimmed) {
        return Ok(DateSpan::day(date));
    }
    if let Ok(instant) = trimmed.parse::<Timestamp>() {
        return Ok(DateSpan::day(instant.to_zoned(context.tz.clone()).date()));
    }
    if let Ok(datetime) = trimmed.parse::<jiff::civil::DateTime>() {
        return Ok(DateSpan::day(datetime.date()));
    }
    if let Ok(span) = trimmed.parse::<Span>() {
        return context
            .today
            .checked_add(span)
            .map(DateSpan::day)
            .map_err(|err| DateError::new(format!("relative date out of range ({err})"), raw));
    }
    Err(DateError::new("unrecognized date literal", raw))
}

pub(crate) fn shift_days(date: Date, delta: i64) -> Option<Date> {
    let span = Span::new().try_days(delta).ok()?;
    date.checked_add(span).ok()
}

fn keyword_range(keyword: &str, context: &DateContext) -> Option<DateSpan> {
    let lower = keyword.to_ascii_lowercase();
    let today = context.today;
    let year = today.year();
    let month = today.month();
    match lower.as_str() {
        "today" => Some(DateSpan::day(today)),
        "yesterday" => shift_days(today, -1).map(DateSpan::day),
        "thisweek" => {
            let weekday_offset = i64::from(today.weekday().to_monday_zero_offset());
            let start = shift_days(today, -weekday_offset)?;
            week_from(start)
        }
        "lastweek" => {
            let weekday_offset = i64::from(today.weekday().to_monday_zero_offset()) + 7;
            let start = shift_days(today, -weekday_offset)?;
            week_from(start)
        }
        "thismonth" => month_range(year, month),
        "lastmonth" => {
            let (year, month) = if month == 1 {
                (year.checked_sub(1)?, 12)
            } else {
                (year, month - 1)
            };
            month_range(year, month)
        }
        "thisyear" => year_range(year),
        "lastyear" => year_range(year.checked_sub(1)?),
        "pastweek" => trailing_range(today, 7),
        "pastmonth" => trailing_range(today, 30),
        "pastyear" => trailing_range(today, 365),
        _ => None,
    }
}

fn week_from(start: Date) -> Option<DateSpan> {
    let end = shift_days(start, 6)?;
    Some(DateSpan { start, end })
}

fn trailing_range(today: Date, days: i64) -> Option<DateSpan> {
    let start = shift_days(today, -days)?;
    Some(DateSpan { start, end: today })
}

fn month_range(year: i16, month: i8) -> Option<DateSpan> {
    let start = Date::new(year, month, 1).ok()?;
    let end = start.last_of_month();
    Some(DateSpan { start, end })
}

fn year_range(year: i16) -> Option<DateSpan> {
    let start = Date::new(year, 1, 1).ok()?;
    let end = Date::new(year, 12, 31).ok()?;
    Some(DateSpan { start, end })
}

// Year-first layouts are tried first when the input starts with four digits,
// otherwise day/month-first layouts win.
fn parse_absolute_date(raw: &str) -> Option<Date> {
    let sep = raw.chars().find(|ch| matches!(ch, '-' | '/' | '.'))?;
    let mut formats = match sep {
        '-' => vec!["%Y-%m-%d", "%d-%m-%Y", "%m-%d-%Y"],
        '/' => vec!["%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y"],
        '.' => vec!["%Y.%m.%d", "%d.%m.%Y", "%m.%d.%Y"],
        _ => return None,
    };
    let starts_with_year = raw.len() >= 4
        && raw.chars().take(4).all(|c| c.is_ascii_digit())
        && matches!(raw.chars().nth(4), Some('-' | '/' | '.'));
    formats.sort_by_key(|fmt| fmt.starts_with("%Y") != starts_with_year);
    formats
        .into_iter()
        .find_map(|fmt| Date::strptime(fmt, raw).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::{civil::date, tz::offset};

    fn context() -> DateContext {
        // A Wednesday.
        DateContext::at(date(2024, 5, 15))
    }

    fn span(raw: &str) -> DateSpan {
        resolve_date(raw, &context()).unwrap()
    }

    #[test]
    fn absolute_layouts() {
        assert_eq!(span("2020-01-31"), DateSpan::day(date(2020, 1, 31)));
        assert_eq!(span("2020/01/31"), DateSpan::day(date(2020, 1, 31)));
        assert_eq!(span("31.01.2020"), DateSpan::day(date(2020, 1, 31)));
        assert_eq!(span("01/31/2020"), DateSpan::day(date(2020, 1, 31)));
    }

    #[test]
    fn iso_datetime_uses_its_day() {
        assert_eq!(span("2020-01-31T10:15:00"), DateSpan::day(date(2020, 1, 31)));
    }

    #[test]
    fn keywords_are_relative_to_context() {
        assert_eq!(span("today"), DateSpan::day(date(2024, 5, 15)));
        assert_eq!(span("Yesterday"), DateSpan::day(date(2024, 5, 14)));
        assert_eq!(
            span("thisweek"),
            DateSpan {
                start: date(2024, 5, 13),
                end: date(2024, 5, 19)
            }
        );
        assert_eq!(
            span("lastmonth"),
            DateSpan {
                start: date(2024, 4, 1),
                end: date(2024, 4, 30)
            }
        );
        assert_eq!(
            span("thisyear"),
            DateSpan {
                start: date(2024, 1, 1),
                end: date(2024, 12, 31)
            }
        );
    }

    #[test]
    fn relative_span_ago() {
        assert_eq!(span("3 days ago"), DateSpan::day(date(2024, 5, 12)));
        assert_eq!(span("1 month ago"), DateSpan::day(date(2024, 4, 15)));
    }

    #[test]
    fn instants_use_the_context_zone() {
        assert_eq!(span("2020-01-31T03:00:00Z"), DateSpan::day(date(2020, 1, 31)));
        let pacific = DateContext {
            tz: TimeZone::fixed(offset(-8)),
            ..context()
        };
        assert_eq!(
            resolve_date("2020-01-31T03:00:00Z", &pacific).unwrap(),
            DateSpan::day(date(2020, 1, 30))
        );
    }

    #[test]
    fn garbage_is_an_error() {
        let err = resolve_date("not a date", &context()).unwrap_err();
        assert_eq!(err.input, "not a date");
        assert!(resolve_date("  ", &context()).is_err());
    }

    #[test]
    fn shift_days_crosses_month_boundaries() {
        assert_eq!(shift_days(date(2020, 1, 1), -1), Some(date(2019, 12, 31)));
        assert_eq!(shift_days(date(2020, 1, 31), 1), Some(date(2020, 2, 1)));
        assert_eq!(shift_days(date(2020, 1, 31), 0), Some(date(2020, 1, 31)));
        assert_eq!(shift_days(date(2024, 5, 15), -365), Some(date(2023, 5, 16)));
        assert_eq!(shift_days(date(9999, 12, 31), 1), None);
    }
}
