//! Regex date extraction from raw HTML.
//!
//! The monitored legislation pages carry a revision marker near the top of
//! the document ("редакція від DD.MM.YYYY"). The primary pattern targets
//! that marker; a bare date-shaped fallback pattern covers layout changes
//! that move or reword the label.

use chrono::NaiveDate;
use regex::Regex;

/// Apply an ordered list of patterns to raw page text.
///
/// Returns the first match that parses as a `DD.MM.YYYY` calendar date,
/// normalized to `YYYY-MM-DD`. A pattern that matches but does not parse
/// counts as a miss and the next pattern is tried.
pub fn extract_date(patterns: &[String], text: &str) -> Option<String> {
    for pattern in patterns {
        let Ok(re) = Regex::new(pattern) else {
            continue;
        };
        let Some(captures) = re.captures(text) else {
            continue;
        };
        let matched = captures
            .get(1)
            .or_else(|| captures.get(0))
            .map(|m| m.as_str())?;
        if let Some(date) = normalize_date(matched) {
            return Some(date);
        }
    }
    None
}

/// Parse `DD.MM.YYYY` and render as `YYYY-MM-DD`.
fn normalize_date(raw: &str) -> Option<String> {
    NaiveDate::parse_from_str(raw, "%d.%m.%Y")
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> Vec<String> {
        vec![
            r"редакція від\s(\d{2}\.\d{2}\.\d{4})".into(),
            r"(\d{2}\.\d{2}\.\d{4})".into(),
        ]
    }

    #[test]
    fn extracts_labeled_revision_date() {
        let html = "<span>Документ 254к/96-вр, редакція від 01.01.2020</span>";
        assert_eq!(
            extract_date(&patterns(), html),
            Some("2020-01-01".to_string())
        );
    }

    #[test]
    fn labeled_pattern_wins_over_bare_dates() {
        let html = "прийняття від 28.06.1996 ... редакція від 01.01.2020";
        assert_eq!(
            extract_date(&patterns(), html),
            Some("2020-01-01".to_string())
        );
    }

    #[test]
    fn falls_back_to_bare_date_when_label_missing() {
        let html = "<td>остання зміна 15.03.2024</td>";
        assert_eq!(
            extract_date(&patterns(), html),
            Some("2024-03-15".to_string())
        );
    }

    #[test]
    fn no_match_yields_none() {
        assert_eq!(extract_date(&patterns(), "<html>no dates here</html>"), None);
    }

    #[test]
    fn date_shaped_garbage_is_skipped() {
        // 45.13.2024 matches the shape but is not a calendar date
        assert_eq!(extract_date(&patterns(), "оновлено 45.13.2024"), None);
    }

    #[test]
    fn empty_pattern_list_yields_none() {
        assert_eq!(extract_date(&[], "редакція від 01.01.2020"), None);
    }

    #[test]
    fn normalizes_to_iso_format() {
        assert_eq!(normalize_date("31.12.2019"), Some("2019-12-31".to_string()));
        assert_eq!(normalize_date("32.12.2019"), None);
    }
}
