//! Slot-time parsing and display formatting.
//!
//! Opening-hours templates arrive as display strings in either 24-hour
//! form ("13:00") or 12-hour form with meridiem ("1:00 PM"). Everything
//! internal works on an hour-of-day integer in `[0, 23]`.

/// Parse a time string into an hour-of-day integer.
///
/// Accepts `"HH:MM"`, `"H:MM AM"`, `"H:MM PM"` (case-insensitive, optional
/// space before the meridiem). Minutes are discarded: partial-hour
/// boundaries truncate to whole hours. A malformed string yields hour 0 —
/// degraded behavior, not an error.
pub fn parse_slot_hour(input: &str) -> i16 {
    let upper = input.trim().to_ascii_uppercase();

    let (time_part, meridiem) = if let Some(rest) = upper.strip_suffix("AM") {
        (rest.trim_end(), Some(false))
    } else if let Some(rest) = upper.strip_suffix("PM") {
        (rest.trim_end(), Some(true))
    } else {
        (upper.as_str(), None)
    };

    let hour_text = time_part.split(':').next().unwrap_or("").trim();
    let Ok(mut hour) = hour_text.parse::<i16>() else {
        return 0;
    };

    match meridiem {
        // 12 AM is midnight, 12 PM is noon.
        Some(false) if hour == 12 => hour = 0,
        Some(true) if hour != 12 => hour += 12,
        _ => {}
    }

    if (0..=23).contains(&hour) { hour } else { 0 }
}

/// Format an hour-of-day integer as a 12-hour display label ("9:00 AM").
pub fn format_slot_label(hour: i16) -> String {
    let (display, meridiem) = match hour {
        0 => (12, "AM"),
        1..=11 => (hour, "AM"),
        12 => (12, "PM"),
        _ => (hour - 12, "PM"),
    };
    format!("{display}:00 {meridiem}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_24_hour() {
        assert_eq!(parse_slot_hour("09:00"), 9);
        assert_eq!(parse_slot_hour("13:00"), 13);
        assert_eq!(parse_slot_hour("00:00"), 0);
        assert_eq!(parse_slot_hour("23:59"), 23);
    }

    #[test]
    fn test_parse_12_hour() {
        assert_eq!(parse_slot_hour("9:00 AM"), 9);
        assert_eq!(parse_slot_hour("1:00 PM"), 13);
        assert_eq!(parse_slot_hour("05:00 PM"), 17);
        assert_eq!(parse_slot_hour("12:00 AM"), 0);
        assert_eq!(parse_slot_hour("12:00 PM"), 12);
        assert_eq!(parse_slot_hour("9:00am"), 9);
    }

    #[test]
    fn test_24_and_12_hour_agree() {
        assert_eq!(parse_slot_hour("13:00"), parse_slot_hour("1:00 PM"));
        assert_eq!(parse_slot_hour("08:00"), parse_slot_hour("8:00 AM"));
    }

    #[test]
    fn test_partial_hours_truncate() {
        assert_eq!(parse_slot_hour("09:30"), 9);
        assert_eq!(parse_slot_hour("4:45 PM"), 16);
    }

    #[test]
    fn test_malformed_yields_zero() {
        assert_eq!(parse_slot_hour(""), 0);
        assert_eq!(parse_slot_hour("noon"), 0);
        assert_eq!(parse_slot_hour("25:00"), 0);
        assert_eq!(parse_slot_hour(":30"), 0);
    }

    #[test]
    fn test_format_labels() {
        assert_eq!(format_slot_label(0), "12:00 AM");
        assert_eq!(format_slot_label(9), "9:00 AM");
        assert_eq!(format_slot_label(12), "12:00 PM");
        assert_eq!(format_slot_label(13), "1:00 PM");
        assert_eq!(format_slot_label(23), "11:00 PM");
    }

    #[test]
    fn test_round_trip() {
        for hour in 0..24i16 {
            assert_eq!(parse_slot_hour(&format_slot_label(hour)), hour);
        }
    }
}
