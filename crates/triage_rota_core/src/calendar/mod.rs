//! Calendar artifact rendering.
//!
//! # Responsibility
//! - Render the full duty history into one iCalendar document.
//! - Attach triage-queue links and contact details to every event.
//!
//! # Invariants
//! - Output depends only on inputs: identical history, metadata and settings
//!   always render byte-identical documents (`DTSTAMP` derives from the cycle
//!   date, never from the wall clock).
//! - One all-day event per cycle, spanning exactly the cycle's seven days.

mod ics;
mod links;

pub use links::{triage_links, TriageLink};

use crate::config::{ComponentFilter, RotaConfig};
use crate::model::cycle::{DutyCycle, DutyHistory};
use ics::IcsWriter;
use serde_json::Value;
use std::collections::BTreeMap;

const PRODUCT_ID: &str = "-//triage-rota//triage-rota calendar//EN";
const UID_DOMAIN: &str = "triage-rota";

/// Presentation settings for the rendered calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSettings {
    pub name: String,
    pub timezone: String,
    pub query_base_url: String,
    pub components: Vec<ComponentFilter>,
}

impl CalendarSettings {
    pub fn from_config(config: &RotaConfig) -> Self {
        Self {
            name: config.rotation.calendar_name.clone(),
            timezone: config.rotation.timezone.clone(),
            query_base_url: config.rotation.query_base_url.clone(),
            components: config.components.clone(),
        }
    }
}

/// Renders every cycle in `history` as an all-day, week-long event.
///
/// `metadata` supplies optional contact details keyed by person name.
pub fn render_calendar(
    history: &DutyHistory,
    metadata: &BTreeMap<String, Value>,
    settings: &CalendarSettings,
) -> String {
    let mut writer = IcsWriter::new();
    writer
        .begin("VCALENDAR")
        .raw("VERSION", "2.0")
        .text("PRODID", PRODUCT_ID)
        .raw("CALSCALE", "GREGORIAN")
        .raw("METHOD", "PUBLISH")
        .text("X-WR-CALNAME", &settings.name)
        .text("X-WR-TIMEZONE", &settings.timezone);

    for cycle in history.cycles() {
        write_event(&mut writer, &cycle, metadata.get(&cycle.person), settings);
    }

    writer.end("VCALENDAR");
    writer.finish()
}

fn write_event(
    writer: &mut IcsWriter,
    cycle: &DutyCycle,
    metadata: Option<&Value>,
    settings: &CalendarSettings,
) {
    let start = cycle.start.format("%Y%m%d").to_string();
    let end = cycle.end().format("%Y%m%d").to_string();

    writer
        .begin("VEVENT")
        .text("UID", &format!("{start}-{}@{UID_DOMAIN}", slug(&cycle.person)))
        .raw("DTSTAMP", &format!("{start}T000000Z"))
        .raw("DTSTART;VALUE=DATE", &start)
        .raw("DTEND;VALUE=DATE", &end)
        .text("SUMMARY", &format!("Triage duty: {}", cycle.person))
        .text("DESCRIPTION", &describe(cycle, metadata, settings))
        .raw("TRANSP", "TRANSPARENT")
        .end("VEVENT");
}

fn describe(cycle: &DutyCycle, metadata: Option<&Value>, settings: &CalendarSettings) -> String {
    let mut lines = vec![format!(
        "{} is on triage duty from {} to {} ({}).",
        cycle.person,
        cycle.start.format("%Y-%m-%d"),
        cycle.last_day().format("%Y-%m-%d"),
        settings.timezone
    )];

    let contacts = contact_lines(metadata);
    if !contacts.is_empty() {
        lines.push(String::new());
        lines.extend(contacts);
    }

    lines.push(String::new());
    for link in triage_links(&settings.query_base_url, cycle, &settings.components) {
        lines.push(format!("{}: {}", link.label, link.url));
    }

    if !settings.components.is_empty() {
        let names: Vec<String> = settings.components.iter().map(ToString::to_string).collect();
        lines.push(String::new());
        lines.push(format!("Components: {}", names.join(", ")));
    }

    lines.join("\n")
}

/// Flattens scalar metadata fields into `key: value` lines, sorted by key.
fn contact_lines(metadata: Option<&Value>) -> Vec<String> {
    let Some(Value::Object(fields)) = metadata else {
        return Vec::new();
    };
    let mut keys: Vec<&String> = fields.keys().collect();
    keys.sort();
    keys.into_iter()
        .filter_map(|key| {
            let rendered = match &fields[key.as_str()] {
                Value::String(text) => text.clone(),
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                _ => return None,
            };
            Some(format!("{key}: {rendered}"))
        })
        .collect()
}

fn slug(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let trimmed = slug.trim_matches('-');
    if trimmed.is_empty() {
        "person".to_string()
    } else {
        trimmed.to_string()
    }
}
