//! Text utilities shared by the note plugins.
//!
//! Previews exist to bound tool-result payloads: list and search
//! operations return at most the first paragraph of a note, capped at
//! [`PREVIEW_MAX`] characters. Full content is only available through the
//! dedicated get-by-id operation.

use chrono::{DateTime, Duration, Months, NaiveDate, TimeZone, Utc};
use tracing::warn;

/// Maximum preview length in characters, before the trailing ellipsis
pub const PREVIEW_MAX: usize = 200;

/// Fraction of the preview window in which a space counts as a usable
/// word boundary. A space earlier than this would drop too much text, so
/// the preview falls back to a hard cut.
const WORD_BOUNDARY_WINDOW: usize = PREVIEW_MAX * 7 / 10;

/// Build a bounded preview of free-text note content.
///
/// A paragraph break before the cap wins and carries no ellipsis; content
/// cut at the cap gets one, at the nearest preceding space when that space
/// falls within the last 30% of the window.
pub fn content_preview(content: &str) -> String {
    let trimmed = content.trim();

    // Paragraph boundary first
    if let Some(pos) = trimmed.find('\n') {
        let first_line = trimmed[..pos].trim_end();
        if first_line.chars().count() <= PREVIEW_MAX {
            return first_line.to_string();
        }
    }

    if trimmed.chars().count() <= PREVIEW_MAX {
        return trimmed.to_string();
    }

    let head: String = trimmed.chars().take(PREVIEW_MAX).collect();
    let cut = match head.rfind(' ') {
        Some(pos) if pos >= WORD_BOUNDARY_WINDOW => head[..pos].to_string(),
        _ => head,
    };
    format!("{}...", cut.trim_end())
}

/// Parse a comma-separated tag list: entries are trimmed, empties dropped,
/// case preserved.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Case-insensitive tag membership test
pub fn tags_contain(tags: &[String], tag: &str) -> bool {
    let needle = tag.to_lowercase();
    tags.iter().any(|t| t.to_lowercase() == needle)
}

/// Parse a human date expression relative to `now` (UTC).
///
/// Recognizes `today`/`now`, `yesterday`, `last week/month/year`, and
/// `N <unit> ago` forms, then falls back to literal `YYYY-MM-DD` or
/// RFC 3339 parsing. Unparseable input falls back to `now`; the fallback
/// is logged because it can mask model typos.
pub fn parse_relative_date(input: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let normalized = input.trim().to_lowercase();

    match normalized.as_str() {
        "today" | "now" => return now,
        "yesterday" => return now - Duration::days(1),
        "last week" => return now - Duration::weeks(1),
        "last month" => return now - Months::new(1),
        "last year" => return now - Months::new(12),
        _ => {}
    }

    if let Some(parsed) = parse_ago(&normalized, now) {
        return parsed;
    }

    if let Ok(date) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Utc.from_utc_datetime(&midnight);
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(input.trim()) {
        return parsed.with_timezone(&Utc);
    }

    warn!(input, "unparseable date expression, falling back to now");
    now
}

/// `N days ago`, `a week ago`, etc.
fn parse_ago(normalized: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = normalized.split_whitespace().collect();
    let [count, unit, "ago"] = parts.as_slice() else {
        return None;
    };

    let count: u32 = match *count {
        "a" | "an" | "one" => 1,
        other => other.parse().ok()?,
    };

    match unit.trim_end_matches('s') {
        "day" => Some(now - Duration::days(i64::from(count))),
        "week" => Some(now - Duration::weeks(i64::from(count))),
        "month" => Some(now - Months::new(count)),
        "year" => now.checked_sub_months(Months::new(count.checked_mul(12)?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_preview_short_content_untouched() {
        assert_eq!(content_preview("milk"), "milk");
    }

    #[test]
    fn test_preview_stops_at_first_paragraph_break() {
        // Full first line, no ellipsis
        assert_eq!(content_preview("milk\neggs"), "milk");
        assert_eq!(content_preview("first paragraph\n\nsecond"), "first paragraph");
    }

    #[test]
    fn test_preview_cap_with_word_boundary() {
        // Words of 9 chars + space: a space lands near the cap, inside the
        // last 30% of the window, so the cut happens at that space.
        let content = "wordwords ".repeat(40);
        let preview = content_preview(&content);
        assert!(preview.ends_with("..."));
        assert!(preview.len() <= PREVIEW_MAX + 3);
        // No mid-word cut
        assert!(preview.trim_end_matches("...").ends_with("wordwords"));
    }

    #[test]
    fn test_preview_hard_cap_without_usable_space() {
        // A single unbroken run has no space at all: hard cut at the cap.
        let content = "x".repeat(500);
        let preview = content_preview(&content);
        assert_eq!(preview.len(), PREVIEW_MAX + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_preview_early_space_is_not_a_boundary() {
        // One space near the start, then an unbroken run: the space is
        // outside the last 30% of the window, so the cap wins.
        let content = format!("ab {}", "y".repeat(500));
        let preview = content_preview(&content);
        assert_eq!(preview.chars().count(), PREVIEW_MAX + 3);
    }

    #[test]
    fn test_preview_length_bound() {
        for content in ["short", &"word ".repeat(100), &"z".repeat(1000)] {
            assert!(content_preview(content).chars().count() <= PREVIEW_MAX + 3);
        }
    }

    #[test]
    fn test_parse_tags_trims_and_drops_empty() {
        assert_eq!(parse_tags("a, b,,c "), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_tags_idempotent() {
        let parsed = parse_tags("a, b,,c ");
        let reparsed = parse_tags(&parsed.join(", "));
        assert_eq!(parsed, reparsed);
    }

    #[test]
    fn test_parse_tags_preserves_case() {
        assert_eq!(parse_tags("Work, URGENT"), vec!["Work", "URGENT"]);
    }

    #[test]
    fn test_tags_contain_case_insensitive() {
        let tags = vec!["Work".to_string(), "urgent".to_string()];
        assert!(tags_contain(&tags, "work"));
        assert!(tags_contain(&tags, "URGENT"));
        assert!(!tags_contain(&tags, "personal"));
    }

    #[test]
    fn test_relative_date_keywords() {
        let now = fixed_now();
        assert_eq!(parse_relative_date("today", now), now);
        assert_eq!(parse_relative_date("NOW", now), now);
        assert_eq!(parse_relative_date("yesterday", now), now - Duration::days(1));
        assert_eq!(parse_relative_date("last week", now), now - Duration::weeks(1));
        assert_eq!(parse_relative_date("last month", now), now - Months::new(1));
        assert_eq!(parse_relative_date("last year", now), now - Months::new(12));
    }

    #[test]
    fn test_relative_date_ago_forms() {
        let now = fixed_now();
        assert_eq!(parse_relative_date("3 days ago", now), now - Duration::days(3));
        assert_eq!(parse_relative_date("2 weeks ago", now), now - Duration::weeks(2));
        assert_eq!(parse_relative_date("a month ago", now), now - Months::new(1));
        assert_eq!(parse_relative_date("1 year ago", now), now - Months::new(12));
    }

    #[test]
    fn test_literal_date_ignores_now() {
        let now = fixed_now();
        let parsed = parse_relative_date("2024-01-01", now);
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_rfc3339_literal() {
        let now = fixed_now();
        let parsed = parse_relative_date("2024-03-05T08:30:00Z", now);
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 5, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_gibberish_falls_back_to_now() {
        let now = fixed_now();
        assert_eq!(parse_relative_date("gibberish", now), now);
    }
}
