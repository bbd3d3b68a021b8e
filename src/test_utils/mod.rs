#![allow(missing_docs)]

pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod source;

pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment};
pub(crate) use http::{assert_content_type, assert_status_ok, get_header};
pub(crate) use source::{StubRecordSource, store_with};

/// The UTC timezone, for tests that do not care about local time.
pub(crate) fn utc() -> &'static time_tz::Tz {
    crate::timezone::get_timezone("Etc/UTC").expect("Etc/UTC should be a known timezone")
}
