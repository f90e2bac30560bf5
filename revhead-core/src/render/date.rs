//! Humanised commit dates: `"3 days ago (Monday, October 12, 2026 12:00:00 PM)"`.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, TimeDelta, Utc};

/// en-US long date followed by long time.
pub const DEFAULT_DATE_FORMAT: &str = "%A, %B %-d, %Y %-I:%M:%S %p";

/// How absolute dates are written.
///
/// This is passed in explicitly rather than read from process state so that a
/// renderer's output only depends on its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateLocale {
  /// chrono `strftime`-style format for the absolute part.
  pub format: String,
  /// Offset the absolute part is displayed in.
  pub offset: FixedOffset,
}

impl DateLocale {
  /// Locale with an explicit format and offset.
  pub fn new(format: impl Into<String>, offset: FixedOffset) -> Self {
    Self {
      format: format.into(),
      offset,
    }
  }

  /// Whether the format string only contains valid specifiers.
  pub fn is_valid_format(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
  }

  /// Default format, displayed in UTC.
  pub fn utc() -> Self {
    Self::new(DEFAULT_DATE_FORMAT, Utc.fix())
  }

  /// Default format, displayed in the machine's current local offset.
  pub fn local() -> Self {
    Self::new(DEFAULT_DATE_FORMAT, *chrono::Local::now().offset())
  }
}

impl Default for DateLocale {
  fn default() -> Self {
    Self::utc()
  }
}

/// Formats timestamps as relative plus absolute text.
#[derive(Debug, Clone, Default)]
pub struct DateFormatter {
  locale: DateLocale,
  reference_time: Option<DateTime<Utc>>,
}

impl DateFormatter {
  /// Formatter using `locale` and the system clock.
  pub fn new(locale: DateLocale) -> Self {
    Self {
      locale,
      reference_time: None,
    }
  }

  /// Pin "now" to a fixed instant.
  pub fn with_reference_time(mut self, now: DateTime<Utc>) -> Self {
    self.reference_time = Some(now);
    self
  }

  /// Locale used for the absolute part.
  pub fn locale(&self) -> &DateLocale {
    &self.locale
  }

  /// `"<relative> (<absolute>)"`.
  pub fn format_date(&self, timestamp: &DateTime<FixedOffset>) -> String {
    format!("{} ({})", self.relative(timestamp), self.absolute(timestamp))
  }

  /// Coarse relative description such as `"3 days ago"` or `"in 2 hours"`.
  pub fn relative(&self, timestamp: &DateTime<FixedOffset>) -> String {
    let now = self.reference_time.unwrap_or_else(Utc::now);
    let delta = now.signed_duration_since(timestamp.with_timezone(&Utc));
    let span = describe_span(delta.abs());

    if delta < TimeDelta::zero() {
      format!("in {span}")
    } else {
      format!("{span} ago")
    }
  }

  /// Absolute date in the configured locale.
  ///
  /// Falls back to RFC 2822 if the locale's format string is malformed.
  pub fn absolute(&self, timestamp: &DateTime<FixedOffset>) -> String {
    let local = timestamp.with_timezone(&self.locale.offset);
    let mut rendered = String::new();
    if write!(rendered, "{}", local.format(&self.locale.format)).is_err() {
      return local.to_rfc2822();
    }
    rendered
  }
}

fn describe_span(span: TimeDelta) -> String {
  let days = span.num_days();

  let (count, unit) = if span.num_minutes() < 1 {
    (span.num_seconds(), "second")
  } else if span.num_hours() < 1 {
    (span.num_minutes(), "minute")
  } else if days < 1 {
    (span.num_hours(), "hour")
  } else if days < 7 {
    (days, "day")
  } else if days < 30 {
    (days / 7, "week")
  } else if days < 365 {
    (days / 30, "month")
  } else {
    (days / 365, "year")
  };

  if count == 1 {
    format!("1 {unit}")
  } else {
    format!("{count} {unit}s")
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use test_case::test_case;

  use super::*;

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap()
  }

  fn formatter() -> DateFormatter {
    DateFormatter::new(DateLocale::utc()).with_reference_time(now())
  }

  fn ago(delta: TimeDelta) -> DateTime<FixedOffset> {
    (now() - delta).fixed_offset()
  }

  #[test_case(TimeDelta::seconds(0), "0 seconds ago" ; "now")]
  #[test_case(TimeDelta::seconds(1), "1 second ago" ; "one second")]
  #[test_case(TimeDelta::seconds(59), "59 seconds ago" ; "under a minute")]
  #[test_case(TimeDelta::minutes(1), "1 minute ago" ; "one minute")]
  #[test_case(TimeDelta::minutes(59), "59 minutes ago" ; "under an hour")]
  #[test_case(TimeDelta::hours(1), "1 hour ago" ; "one hour")]
  #[test_case(TimeDelta::hours(23), "23 hours ago" ; "under a day")]
  #[test_case(TimeDelta::days(1), "1 day ago" ; "one day")]
  #[test_case(TimeDelta::days(3), "3 days ago" ; "three days")]
  #[test_case(TimeDelta::days(7), "1 week ago" ; "one week")]
  #[test_case(TimeDelta::days(29), "4 weeks ago" ; "under a month")]
  #[test_case(TimeDelta::days(30), "1 month ago" ; "one month")]
  #[test_case(TimeDelta::days(364), "12 months ago" ; "under a year")]
  #[test_case(TimeDelta::days(365), "1 year ago" ; "one year")]
  #[test_case(TimeDelta::days(800), "2 years ago" ; "two years")]
  fn describes_past_spans(delta: TimeDelta, expected: &str) {
    assert_eq!(formatter().relative(&ago(delta)), expected);
  }

  #[test]
  fn describes_future_spans() {
    let future = (now() + TimeDelta::days(2)).fixed_offset();
    assert_eq!(formatter().relative(&future), "in 2 days");
  }

  #[test]
  fn formats_relative_and_absolute_parts() {
    let formatted = formatter().format_date(&ago(TimeDelta::days(3)));
    assert_eq!(formatted, "3 days ago (Monday, October 12, 2026 12:00:00 PM)");
  }

  #[test]
  fn absolute_part_uses_locale_offset() {
    let locale = DateLocale::new("%Y-%m-%d %H:%M %z", FixedOffset::east_opt(2 * 3600).unwrap());
    let formatter = DateFormatter::new(locale).with_reference_time(now());

    assert_eq!(formatter.absolute(&ago(TimeDelta::zero())), "2026-10-15 14:00 +0200");
  }

  #[test]
  fn malformed_format_falls_back_to_rfc2822() {
    assert!(!DateLocale::is_valid_format("%Q %Y"));
    assert!(DateLocale::is_valid_format(DEFAULT_DATE_FORMAT));

    let formatter = DateFormatter::new(DateLocale::new("%Q", Utc.fix())).with_reference_time(now());
    assert_eq!(formatter.absolute(&ago(TimeDelta::zero())), "Thu, 15 Oct 2026 12:00:00 +0000");
  }

  #[test]
  fn source_offset_does_not_change_relative_text() {
    let eastern = FixedOffset::west_opt(5 * 3600).unwrap();
    let timestamp = (now() - TimeDelta::days(2)).with_timezone(&eastern);

    assert_eq!(formatter().relative(&timestamp), "2 days ago");
  }
}
