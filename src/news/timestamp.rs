use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Timelike};

/// Layout of `ArticleRecord::published_at`
pub const DISPLAY_FORMAT: &str = "%Y/%m/%d %H:%M";

/// `02 Jan 2006 15:04:05 -0700`, after the weekday
const NUMERIC_ZONE_FORMAT: &str = "%d %b %Y %H:%M:%S %z";
/// `02 Jan 2006 15:04:05 MST`, the zone name is split off beforehand
const NAMED_ZONE_FORMAT: &str = "%d %b %Y %H:%M:%S";

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Parse a provider publish date. The numeric offset layout is tried first,
/// then the named zone one. The leading weekday must be a day name but is
/// not checked against the date.
pub fn parse_pub_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let (weekday, stamp) = raw.trim().split_once(", ")?;
    if !WEEKDAYS.contains(&weekday) {
        return None;
    }
    DateTime::parse_from_str(stamp, NUMERIC_ZONE_FORMAT)
        .ok()
        .or_else(|| parse_named_zone(stamp))
}

fn parse_named_zone(stamp: &str) -> Option<DateTime<FixedOffset>> {
    let (stamp, zone) = stamp.rsplit_once(' ')?;
    let offset = zone_offset(zone)?;
    NaiveDateTime::parse_from_str(stamp, NAMED_ZONE_FORMAT)
        .ok()?
        .and_local_timezone(offset)
        .single()
}

/// Unknown abbreviations are accepted with a zero offset, the same way the
/// provider's own reference parser treats them.
fn zone_offset(zone: &str) -> Option<FixedOffset> {
    let hours = match zone {
        "UT" | "UTC" | "GMT" | "Z" => 0,
        "KST" => 9,
        "EDT" => -4,
        "EST" | "CDT" => -5,
        "CST" | "MDT" => -6,
        "MST" | "PDT" => -7,
        "PST" => -8,
        z if (3..=5).contains(&z.len()) && z.chars().all(|c| c.is_ascii_uppercase()) => 0,
        _ => return None,
    };
    FixedOffset::east_opt(hours * 3600)
}

/// Convert to local wall-clock time, truncated to the minute.
#[must_use]
pub fn to_local_minute(published: &DateTime<FixedOffset>) -> NaiveDateTime {
    let local = published.with_timezone(&Local).naive_local();
    local
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(local)
}

#[must_use]
pub fn format_display(published: &NaiveDateTime) -> String {
    published.format(DISPLAY_FORMAT).to_string()
}

#[must_use]
pub fn parse_display(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DISPLAY_FORMAT).ok()
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_numeric_offset() {
        let parsed = parse_pub_date("Mon, 14 Apr 2025 09:58:00 +0900").unwrap();
        assert_eq!(
            parsed.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2025, 4, 14, 0, 58, 0).unwrap()
        );
    }

    #[test]
    fn test_named_zones() {
        let gmt = parse_pub_date("Mon, 14 Apr 2025 00:58:00 GMT").unwrap();
        let kst = parse_pub_date("Mon, 14 Apr 2025 09:58:00 KST").unwrap();
        let est = parse_pub_date("Sun, 13 Apr 2025 19:58:00 EST").unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 4, 14, 0, 58, 0).unwrap();
        assert_eq!(gmt.with_timezone(&Utc), expected);
        assert_eq!(kst.with_timezone(&Utc), expected);
        assert_eq!(est.with_timezone(&Utc), expected);
    }

    #[test]
    fn test_unknown_abbreviation_is_utc() {
        let parsed = parse_pub_date("Mon, 14 Apr 2025 00:58:00 XYZ").unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_weekday_is_not_checked_against_the_date() {
        // 14 Apr 2025 is a Monday
        let numeric = parse_pub_date("Tue, 14 Apr 2025 09:58:00 +0900").unwrap();
        let named = parse_pub_date("Sat, 14 Apr 2025 00:58:00 GMT").unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 4, 14, 0, 58, 0).unwrap();
        assert_eq!(numeric.with_timezone(&Utc), expected);
        assert_eq!(named.with_timezone(&Utc), expected);
    }

    #[test]
    fn test_rejects_other_layouts() {
        assert!(parse_pub_date("2025-04-14T09:58:00+09:00").is_none());
        assert!(parse_pub_date("yesterday").is_none());
        assert!(parse_pub_date("").is_none());
        assert!(parse_pub_date("Mon, 14 Apr 2025 09:58:00 +09x0").is_none());
        assert!(parse_pub_date("Mon, 14 Apr 2025 09:58:00 kst").is_none());
        assert!(parse_pub_date("Xyz, 14 Apr 2025 09:58:00 +0900").is_none());
        assert!(parse_pub_date("14 Apr 2025 09:58:00 +0900").is_none());
    }

    #[test]
    fn test_display_round_trip() {
        let parsed = parse_pub_date("Mon, 14 Apr 2025 09:58:31 +0900").unwrap();
        let local = to_local_minute(&parsed);
        assert_eq!(local.second(), 0);
        let shown = format_display(&local);
        assert_eq!(shown.len(), "2025/04/14 09:58".len());
        assert_eq!(parse_display(&shown), Some(local));
    }
}
