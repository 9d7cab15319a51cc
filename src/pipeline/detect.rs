//! Change detection between snapshots.
//!
//! Compares the freshly built snapshot against the last persisted one and
//! produces the ordered alert list. Detection is pure: it never touches
//! the network or the filesystem, and the alert order is fixed by the
//! source table regardless of which fields actually changed.

use crate::models::{Alert, Snapshot, SourceConfig, SourceKind};

/// Compare two snapshots field by field, in source-table order.
///
/// Per-kind policy:
/// - `html-date`: alert only when the current value is present and differs
///   from the previous one. A present-to-absent transition stays silent,
///   so an extraction failure cannot masquerade as a repealed law.
/// - `api-probe`: alert whenever the current value is `false`, independent
///   of the previous value. This is a liveness check, not a change check.
/// - `feed-titles`: alert only when both lists are non-empty and their
///   first elements differ. An empty list on either side suppresses the
///   check to avoid false positives on transient fetch failure.
pub fn detect(sources: &[&SourceConfig], previous: &Snapshot, current: &Snapshot) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for source in sources {
        match source.kind {
            SourceKind::HtmlDate => {
                let Some(curr) = current.date(&source.field) else {
                    continue;
                };
                if previous.date(&source.field) != Some(curr) {
                    alerts.push(Alert::new(
                        source.category,
                        source.render_message(Some(curr)),
                    ));
                }
            }
            SourceKind::ApiProbe => {
                if current.flag(&source.field) == Some(false) {
                    alerts.push(Alert::new(source.category, source.render_message(None)));
                }
            }
            SourceKind::FeedTitles => {
                let prev_first = previous.titles(&source.field).first();
                let curr_first = current.titles(&source.field).first();
                if let (Some(prev), Some(curr)) = (prev_first, curr_first) {
                    if prev != curr {
                        alerts.push(Alert::new(
                            source.category,
                            source.render_message(Some(curr)),
                        ));
                    }
                }
            }
        }
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertCategory, Config, Domain, FieldValue};
    use chrono::Utc;

    fn sources(config: &Config) -> Vec<&SourceConfig> {
        config.sources.iter().collect()
    }

    fn snapshot(fields: &[(&str, FieldValue)]) -> Snapshot {
        let mut snapshot = Snapshot::at(Utc::now());
        for (field, value) in fields {
            snapshot.set(*field, value.clone());
        }
        snapshot
    }

    fn date(s: &str) -> FieldValue {
        FieldValue::Date(s.to_string())
    }

    fn titles(items: &[&str]) -> FieldValue {
        FieldValue::Titles(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn equal_present_dates_stay_silent() {
        let config = Config::default();
        let prev = snapshot(&[("constitution_last", date("2025-01-01"))]);
        let curr = snapshot(&[("constitution_last", date("2025-01-01"))]);

        assert!(detect(&sources(&config), &prev, &curr).is_empty());
    }

    #[test]
    fn changed_date_fires_one_alert_with_new_value() {
        let config = Config::default();
        let prev = snapshot(&[
            ("constitution_last", date("2025-01-01")),
            ("nacp_api_ok", FieldValue::Flag(true)),
        ]);
        let curr = snapshot(&[
            ("constitution_last", date("2025-01-02")),
            ("nacp_api_ok", FieldValue::Flag(true)),
        ]);

        let alerts = detect(&sources(&config), &prev, &curr);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].category, AlertCategory::Law);
        assert!(alerts[0].message.contains("Constitution"));
        assert!(alerts[0].message.contains("2025-01-02"));
    }

    #[test]
    fn absent_current_date_never_alerts() {
        let config = Config::default();
        let prev = snapshot(&[("constitution_last", date("2025-01-01"))]);

        let gone = snapshot(&[("constitution_last", FieldValue::Missing)]);
        assert!(detect(&sources(&config), &prev, &gone).is_empty());

        let omitted = snapshot(&[]);
        assert!(detect(&sources(&config), &prev, &omitted).is_empty());
    }

    #[test]
    fn first_run_with_present_date_alerts() {
        let config = Config::default();
        let curr = snapshot(&[("civil_code_last", date("2025-03-01"))]);

        let alerts = detect(&sources(&config), &Snapshot::empty(), &curr);
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].message.contains("Civil Code"));
    }

    #[test]
    fn probe_false_always_alerts() {
        let config = Config::default();
        let curr = snapshot(&[("nacp_api_ok", FieldValue::Flag(false))]);

        for prev in [
            snapshot(&[("nacp_api_ok", FieldValue::Flag(true))]),
            snapshot(&[("nacp_api_ok", FieldValue::Flag(false))]),
            Snapshot::empty(),
        ] {
            let alerts = detect(&sources(&config), &prev, &curr);
            assert_eq!(alerts.len(), 1);
            assert_eq!(alerts[0].category, AlertCategory::System);
        }
    }

    #[test]
    fn probe_true_never_alerts() {
        let config = Config::default();
        let prev = snapshot(&[("nacp_api_ok", FieldValue::Flag(false))]);
        let curr = snapshot(&[("nacp_api_ok", FieldValue::Flag(true))]);

        assert!(detect(&sources(&config), &prev, &curr).is_empty());
    }

    #[test]
    fn absent_probe_field_stays_silent() {
        let config = Config::default();
        let prev = snapshot(&[("nacp_api_ok", FieldValue::Flag(true))]);
        let curr = snapshot(&[]);

        assert!(detect(&sources(&config), &prev, &curr).is_empty());
    }

    #[test]
    fn empty_list_on_either_side_suppresses() {
        let config = Config::default();

        let prev_empty = snapshot(&[("ofsi_titles", titles(&[]))]);
        let curr_full = snapshot(&[("ofsi_titles", titles(&["New Sanction A"]))]);
        assert!(detect(&sources(&config), &prev_empty, &curr_full).is_empty());

        let prev_full = snapshot(&[("ofsi_titles", titles(&["Old Sanction"]))]);
        let curr_empty = snapshot(&[("ofsi_titles", titles(&[]))]);
        assert!(detect(&sources(&config), &prev_full, &curr_empty).is_empty());
    }

    #[test]
    fn equal_first_titles_stay_silent() {
        let config = Config::default();
        let prev = snapshot(&[("ofac_titles", titles(&["Same Lead", "older"]))]);
        let curr = snapshot(&[("ofac_titles", titles(&["Same Lead", "newer tail"]))]);

        assert!(detect(&sources(&config), &prev, &curr).is_empty());
    }

    #[test]
    fn changed_first_title_fires_one_alert() {
        let config = Config::default();
        let prev = snapshot(&[("ofsi_titles", titles(&["Old Lead"]))]);
        let curr = snapshot(&[("ofsi_titles", titles(&["New Lead", "Old Lead"]))]);

        let alerts = detect(&sources(&config), &prev, &curr);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].category, AlertCategory::Sanction);
        assert!(alerts[0].message.contains("New Lead"));
    }

    #[test]
    fn alert_order_follows_source_table() {
        let config = Config::default();

        // Trigger only civil code and OFAC; civil code must come first
        let prev = snapshot(&[
            ("civil_code_last", date("2025-01-01")),
            ("ofac_titles", titles(&["Old"])),
        ]);
        let curr = snapshot(&[
            ("civil_code_last", date("2025-02-01")),
            ("nacp_api_ok", FieldValue::Flag(true)),
            ("ofac_titles", titles(&["New"])),
        ]);

        let law = detect(&config.sources_for(Domain::Law), &prev, &curr);
        let sanctions = detect(&config.sources_for(Domain::Sanctions), &prev, &curr);
        let alerts: Vec<Alert> = law.into_iter().chain(sanctions).collect();

        assert_eq!(alerts.len(), 2);
        assert!(alerts[0].message.contains("Civil Code"));
        assert!(alerts[1].message.contains("OFAC"));
    }

    #[test]
    fn full_trigger_set_is_deterministically_ordered() {
        let config = Config::default();
        let prev = snapshot(&[
            ("ofsi_titles", titles(&["x"])),
            ("ofac_titles", titles(&["y"])),
        ]);
        let curr = snapshot(&[
            ("constitution_last", date("2025-01-02")),
            ("criminal_code_last", date("2025-01-03")),
            ("civil_code_last", date("2025-01-04")),
            ("nacp_api_ok", FieldValue::Flag(false)),
            ("ofsi_titles", titles(&["x2"])),
            ("ofac_titles", titles(&["y2"])),
        ]);

        let law = detect(&config.sources_for(Domain::Law), &prev, &curr);
        let sanctions = detect(&config.sources_for(Domain::Sanctions), &prev, &curr);
        let messages: Vec<String> = law
            .into_iter()
            .chain(sanctions)
            .map(|a| a.message)
            .collect();

        assert_eq!(messages.len(), 6);
        assert!(messages[0].contains("Constitution"));
        assert!(messages[1].contains("Criminal Code"));
        assert!(messages[2].contains("Civil Code"));
        assert!(messages[3].contains("NACP"));
        assert!(messages[4].contains("OFSI"));
        assert!(messages[5].contains("OFAC"));
    }
}
