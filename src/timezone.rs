//! Timezone lookup and the date format used for display.

use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};
use time_tz::{OffsetDateTimeExt, Tz};

/// Day/month/year, the en-GB convention, e.g. "01/02/2024".
const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day padding:zero]/[month repr:numerical padding:zero]/[year]");

/// Get a timezone from its canonical name, e.g. "Pacific/Auckland".
///
/// Returns `None` if `canonical_timezone` is not a known timezone name.
pub fn get_timezone(canonical_timezone: &str) -> Option<&'static Tz> {
    time_tz::timezones::get_by_name(canonical_timezone)
}

/// Format `date_time` as a day/month/year date in `timezone`.
///
/// The UTC offset is the one `timezone` observes at `date_time`, so dates on
/// either side of a daylight saving change land on the right local day.
pub fn format_display_date(date_time: OffsetDateTime, timezone: &Tz) -> String {
    let date = date_time.to_timezone(timezone).date();

    date.format(DISPLAY_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}
