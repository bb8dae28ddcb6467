//! Query text and metadata filter construction

use serde_json::{json, Map, Value};
use triage_domain::ParsedComplaint;

/// Text to embed for a complaint
///
/// The complaint text when present, otherwise the structured fields joined
/// as `category: .. | location: .. | time: .. | recurrence: ..`.
pub fn build_query_text(parsed: &ParsedComplaint) -> String {
    let text = parsed.complaint_text.trim();
    if !text.is_empty() {
        return text.to_string();
    }

    let mut parts = vec![format!("category: {}", parsed.category)];
    if let Some(location) = parsed.location.as_deref().filter(|l| !l.trim().is_empty()) {
        parts.push(format!("location: {}", location));
    }
    if let Some(time) = parsed.time_24h {
        parts.push(format!("time: {}", time));
    }
    if let Some(recurrence) = parsed.recurrence.as_deref().filter(|r| !r.trim().is_empty()) {
        parts.push(format!("recurrence: {}", recurrence));
    }
    parts.join(" | ")
}

/// Metadata filter: borough when known, case status when configured
///
/// Returns `None` when there is nothing to filter on.
pub fn build_filter(parsed: &ParsedComplaint, status: Option<&str>) -> Option<Value> {
    let mut filter = Map::new();
    if let Some(borough) = parsed.borough {
        filter.insert("borough".to_string(), json!({ "$eq": borough.filter_value() }));
    }
    if let Some(status) = status {
        filter.insert("status".to_string(), json!({ "$eq": status }));
    }
    if filter.is_empty() {
        None
    } else {
        Some(Value::Object(filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_domain::{Borough, Category, ClockTime};

    #[test]
    fn test_query_text_prefers_complaint_text() {
        let parsed = ParsedComplaint::new("  rats in the alley ", Category::Sanitation);
        assert_eq!(build_query_text(&parsed), "rats in the alley");
    }

    #[test]
    fn test_query_text_from_fields() {
        let mut parsed = ParsedComplaint::new("", Category::Noise);
        parsed.location = Some("Brooklyn".to_string());
        parsed.time_24h = ClockTime::new(2, 0);
        parsed.recurrence = Some("every weekend".to_string());
        assert_eq!(
            build_query_text(&parsed),
            "category: noise | location: Brooklyn | time: 02:00 | recurrence: every weekend"
        );
    }

    #[test]
    fn test_query_text_category_only() {
        let parsed = ParsedComplaint::new("", Category::Unknown);
        assert_eq!(build_query_text(&parsed), "category: unknown");
    }

    #[test]
    fn test_filter_with_borough_and_status() {
        let mut parsed = ParsedComplaint::new("noise", Category::Noise);
        parsed.borough = Some(Borough::StatenIsland);
        let filter = build_filter(&parsed, Some("Closed")).unwrap();
        assert_eq!(filter["borough"]["$eq"], "STATEN ISLAND");
        assert_eq!(filter["status"]["$eq"], "Closed");
    }

    #[test]
    fn test_filter_without_borough() {
        let parsed = ParsedComplaint::new("noise", Category::Noise);
        let filter = build_filter(&parsed, Some("Closed")).unwrap();
        assert!(filter.get("borough").is_none());
        assert!(build_filter(&parsed, None).is_none());
    }
}
