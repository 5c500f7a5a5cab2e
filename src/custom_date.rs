use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Asia;

use crate::error::ParseError;

/// Parses an item timestamp.
///
/// `dc:date` is W3C-DTF (an RFC 3339 profile); RSS 2.0 feeds use RFC 822 in
/// `pubDate`. Values without an offset are taken to be Tokyo local time, which
/// is where the upstream service publishes from.
pub fn parse_feed_date(date_str: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    let date_str = date_str.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(datetime);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc2822(date_str) {
        return Ok(datetime);
    }
    parse_tokyo_local(date_str)
}

fn parse_tokyo_local(date_str: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    let invalid = || ParseError::InvalidDate(date_str.to_string());

    let datetime = match NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%S") {
        Ok(datetime) => datetime,
        Err(_) => {
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| invalid())?;
            NaiveDateTime::new(date, NaiveTime::MIN)
        }
    };

    let tokyo_time = Asia::Tokyo
        .from_local_datetime(&datetime)
        .single()
        .ok_or_else(invalid)?;

    Ok(tokyo_time.fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_w3c_dtf_with_offset() {
        let date = parse_feed_date("2018-04-01T10:15:00+09:00").expect("dc:date must parse");
        assert_eq!(date.to_rfc3339(), "2018-04-01T10:15:00+09:00");
    }

    #[test]
    fn parses_rfc822_pub_date() {
        let date = parse_feed_date("Sun, 01 Apr 2018 01:15:00 GMT").expect("pubDate must parse");
        assert_eq!(date.timestamp(), 1_522_545_300);
    }

    #[test]
    fn naive_values_are_tokyo_time() {
        let date = parse_feed_date("2018-04-01T10:15:00").expect("naive date must parse");
        assert_eq!(date.to_rfc3339(), "2018-04-01T10:15:00+09:00");

        let day = parse_feed_date("2018-04-01").expect("date-only value must parse");
        assert_eq!(day.to_rfc3339(), "2018-04-01T00:00:00+09:00");
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_feed_date("yesterday"),
            Err(ParseError::InvalidDate(value)) if value == "yesterday"
        ));
    }
}
