//! Triage-queue query links attached to each calendar event.

use crate::config::ComponentFilter;
use crate::model::cycle::DutyCycle;

/// One labelled search link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageLink {
    pub label: &'static str,
    pub url: String,
}

/// Builds the per-cycle triage links.
///
/// - "New bugs filed this cycle": bugs created in `[start, end)`.
/// - "Untriaged bugs": open bugs whose severity is unset (`--`).
///
/// Both are restricted to `components` when any are configured.
pub fn triage_links(
    base_url: &str,
    cycle: &DutyCycle,
    components: &[ComponentFilter],
) -> Vec<TriageLink> {
    let start = cycle.start.format("%Y-%m-%d").to_string();
    let end = cycle.end().format("%Y-%m-%d").to_string();

    let new_bugs = vec![
        ("query_format", "advanced"),
        ("chfield", "[Bug creation]"),
        ("chfieldfrom", start.as_str()),
        ("chfieldto", end.as_str()),
    ];
    let untriaged = vec![
        ("query_format", "advanced"),
        ("bug_severity", "--"),
        ("resolution", "---"),
    ];

    vec![
        TriageLink {
            label: "New bugs filed this cycle",
            url: build_query_url(base_url, &new_bugs, components),
        },
        TriageLink {
            label: "Untriaged bugs",
            url: build_query_url(base_url, &untriaged, components),
        },
    ]
}

fn build_query_url(base_url: &str, params: &[(&str, &str)], components: &[ComponentFilter]) -> String {
    let mut pairs: Vec<(&str, &str)> = params.to_vec();
    for filter in components {
        pairs.push(("product", filter.product.as_str()));
        if let Some(component) = &filter.component {
            pairs.push(("component", component.as_str()));
        }
    }

    let mut url = base_url.trim().to_string();
    url.push(if url.contains('?') { '&' } else { '?' });
    for (index, (key, value)) in pairs.iter().enumerate() {
        if index > 0 {
            url.push('&');
        }
        url.push_str(&percent_encode(key));
        url.push('=');
        url.push_str(&percent_encode(value));
    }
    url
}

/// Percent-encodes everything except RFC 3986 unreserved characters.
fn percent_encode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(char::from(byte))
            }
            other => encoded.push_str(&format!("%{other:02X}")),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::{percent_encode, triage_links};
    use crate::config::ComponentFilter;
    use crate::model::cycle::DutyCycle;
    use chrono::NaiveDate;

    #[test]
    fn percent_encode_escapes_reserved_and_non_ascii() {
        assert_eq!(percent_encode("[Bug creation]"), "%5BBug%20creation%5D");
        assert_eq!(percent_encode("DOM: Core & HTML"), "DOM%3A%20Core%20%26%20HTML");
        assert_eq!(percent_encode("é"), "%C3%A9");
        assert_eq!(percent_encode("a-b_c.d~"), "a-b_c.d~");
    }

    #[test]
    fn links_carry_cycle_dates_and_components() {
        let cycle = DutyCycle::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(), "alice");
        let components = vec![
            ComponentFilter::parse("Core::Networking").unwrap(),
            ComponentFilter::parse("Toolkit").unwrap(),
        ];
        let links = triage_links("https://bugs.example.test/buglist.cgi", &cycle, &components);

        assert_eq!(links.len(), 2);
        assert_eq!(
            links[0].url,
            "https://bugs.example.test/buglist.cgi?query_format=advanced\
             &chfield=%5BBug%20creation%5D&chfieldfrom=2026-10-18&chfieldto=2026-10-25\
             &product=Core&component=Networking&product=Toolkit"
        );
        assert!(links[1].url.contains("bug_severity=--"));
        assert!(!links[1].url.contains("chfieldfrom"));
    }

    #[test]
    fn base_url_with_existing_query_is_extended() {
        let cycle = DutyCycle::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(), "alice");
        let links = triage_links("https://bugs.example.test/q?list=1", &cycle, &[]);
        assert!(links[1].url.starts_with("https://bugs.example.test/q?list=1&query_format="));
    }
}
