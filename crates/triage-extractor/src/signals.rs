//! Time, location and recurrence extraction

use crate::patterns::{BOROUGH_PATTERNS, IN_PLACE, RECURRENCE_PATTERNS, TIME_12H, TIME_24H};
use triage_domain::{Borough, ClockTime};

/// Extract the incident time, preferring 12-hour forms over 24-hour forms
///
/// `12am` maps to `00:00` and `12pm` to `12:00`. Matches whose hour or minute
/// cannot form a valid clock time (e.g. `13pm`) are skipped.
pub fn extract_time(text: &str) -> Option<ClockTime> {
    let twelve_hour = TIME_12H.captures_iter(text).find_map(|caps| {
        let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u32 = caps.get(2).map_or(Some(0), |m| m.as_str().parse().ok())?;
        if !(1..=12).contains(&hour) {
            return None;
        }
        let pm = caps.get(3)?.as_str().eq_ignore_ascii_case("pm");
        let hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
        ClockTime::new(hour, minute)
    });
    if twelve_hour.is_some() {
        return twelve_hour;
    }

    TIME_24H.captures_iter(text).find_map(|caps| {
        let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
        ClockTime::new(hour, minute)
    })
}

/// Find a named borough anywhere in the text
pub fn extract_borough(text: &str) -> Option<Borough> {
    BOROUGH_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(borough, _)| *borough)
}

/// Extract a location: a named borough first, else a capitalized phrase after "in"
pub fn extract_location(text: &str) -> Option<String> {
    if let Some(borough) = extract_borough(text) {
        return Some(borough.display_name().to_string());
    }
    IN_PLACE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Extract the first recurrence phrase in priority order
pub fn extract_recurrence(text: &str) -> Option<String> {
    RECURRENCE_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(phrase, _)| phrase.to_string())
}
