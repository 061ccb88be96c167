//! Display-timestamp rule shared by the feed and the conversation list.
//!
//! Same calendar day renders as a short time, the previous calendar day as
//! `Yesterday`, anything else as a full date.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Render `at` relative to `now`, both in the same time zone.
pub fn display_timestamp<Tz: TimeZone>(at: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let day = at.date_naive();
    let today = now.date_naive();

    if day == today {
        at.format("%I:%M %p").to_string()
    } else if today.pred_opt() == Some(day) {
        "Yesterday".to_string()
    } else {
        at.format("%B %-d, %Y").to_string()
    }
}

/// Render a stored UTC instant in the local time zone, relative to now.
pub fn local_display_timestamp(at: &DateTime<Utc>) -> String {
    display_timestamp(&at.with_timezone(&Local), &Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn same_day_renders_short_time() {
        let now = at(2024, 12, 20, 15, 0);
        assert_eq!(display_timestamp(&at(2024, 12, 20, 9, 30), &now), "09:30 AM");
        assert_eq!(display_timestamp(&at(2024, 12, 20, 14, 5), &now), "02:05 PM");
        assert_eq!(display_timestamp(&at(2024, 12, 20, 0, 0), &now), "12:00 AM");
    }

    #[test]
    fn previous_day_renders_yesterday() {
        let now = at(2024, 12, 20, 15, 0);
        assert_eq!(display_timestamp(&at(2024, 12, 19, 23, 59), &now), "Yesterday");
        assert_eq!(display_timestamp(&at(2024, 12, 19, 0, 0), &now), "Yesterday");
    }

    #[test]
    fn older_renders_full_date() {
        let now = at(2024, 12, 20, 15, 0);
        assert_eq!(display_timestamp(&at(2024, 12, 1, 10, 0), &now), "December 1, 2024");
        assert_eq!(display_timestamp(&at(2024, 12, 18, 23, 59), &now), "December 18, 2024");
    }

    #[test]
    fn yesterday_across_year_boundary() {
        let now = at(2025, 1, 1, 8, 0);
        assert_eq!(display_timestamp(&at(2024, 12, 31, 22, 0), &now), "Yesterday");
    }

    #[test]
    fn calendar_day_follows_the_time_zone() {
        // 23:30 UTC on the 19th is already the 20th at UTC+2.
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = at(2024, 12, 20, 13, 0).with_timezone(&tz);
        let msg = at(2024, 12, 19, 23, 30).with_timezone(&tz);
        assert_eq!(display_timestamp(&msg, &now), "01:30 AM");
    }

    #[test]
    fn local_rendering_of_now_is_a_time() {
        let label = local_display_timestamp(&Utc::now());
        assert!(label.ends_with("AM") || label.ends_with("PM"), "got {label}");
    }
}
