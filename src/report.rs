//! Network state reports.
//!
//! Generates both JSON and human-readable text reports.

use color_eyre::eyre::{Context, Result};
use serde::Serialize;

use crate::loader::LoadedNetwork;
use crate::network::{SchgError, State, SwitchTag, SwitchingError};

/// One switch as reported
#[derive(Debug, Clone, Serialize)]
pub struct SwitchEntry {
    pub name: String,
    pub kind: SwitchTag,
    pub state: State,
    pub substation: bool,
    /// False for switches declared without any link
    pub linked: bool,
}

/// One link as reported
#[derive(Debug, Clone, Serialize)]
pub struct LinkEntry {
    pub first: String,
    pub second: String,
    pub energized: bool,
}

/// Result of one requested toggle
#[derive(Debug, Clone, Serialize)]
pub struct ToggleOutcome {
    pub name: String,
    pub accepted: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<SwitchingError>,
    /// Set when the toggle could not be attempted at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToggleOutcome {
    pub fn from_result(name: &str, result: Result<(), SchgError>) -> Self {
        let (accepted, reasons, error) = match result {
            Ok(()) => (true, Vec::new(), None),
            Err(SchgError::Switching(rejected)) => (false, rejected.into_reasons(), None),
            Err(other) => (false, Vec::new(), Some(other.to_string())),
        };

        Self {
            name: name.to_string(),
            accepted,
            reasons,
            error,
        }
    }
}

/// Snapshot of a loaded network and the toggles applied to it
#[derive(Debug, Clone, Serialize)]
pub struct NetworkReport {
    pub switches: Vec<SwitchEntry>,
    pub links: Vec<LinkEntry>,
    pub energized_switches: usize,
    pub energized_links: usize,
    pub meshed: bool,
    pub substations_interconnected: bool,
    pub toggles: Vec<ToggleOutcome>,
}

impl NetworkReport {
    pub fn new(loaded: &LoadedNetwork, toggles: Vec<ToggleOutcome>) -> Self {
        let network = loaded.network();

        let switches = loaded
            .switches()
            .into_iter()
            .map(|sw| SwitchEntry {
                name: sw.name().to_string(),
                kind: sw.kind().tag(),
                state: sw.state(),
                substation: sw.on_substation(),
                linked: network.contains(sw.name()),
            })
            .collect();

        let links = network
            .links()
            .map(|link| {
                let (first, second) = link.switches();
                LinkEntry {
                    first: first.to_string(),
                    second: second.to_string(),
                    energized: network.is_link_energized(link),
                }
            })
            .collect();

        Self {
            switches,
            links,
            energized_switches: network.energized_switches().len(),
            energized_links: network.energized_links().len(),
            meshed: network.is_meshed(),
            substations_interconnected: network.substations_interconnected(),
            toggles,
        }
    }

    /// Whether any requested toggle was refused
    pub fn has_rejections(&self) -> bool {
        self.toggles.iter().any(|outcome| !outcome.accepted)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report to JSON")
    }

    pub fn to_text(&self) -> String {
        let mut lines: Vec<String> = Vec::new();

        lines.push("=".repeat(60));
        lines.push("                    SWITCHING REPORT".to_string());
        lines.push("=".repeat(60));
        lines.push(String::new());

        if !self.toggles.is_empty() {
            lines.push("Toggles:".to_string());
            for outcome in &self.toggles {
                let verdict = if outcome.accepted {
                    "accepted".to_string()
                } else if let Some(error) = &outcome.error {
                    format!("failed: {}", error)
                } else {
                    let reasons: Vec<String> =
                        outcome.reasons.iter().map(|r| r.to_string()).collect();
                    format!("rejected: {}", reasons.join(", "))
                };
                lines.push(format!("  {:<20} {}", outcome.name, verdict));
            }
            lines.push(String::new());
        }

        lines.push(format!("Switches ({}):", self.switches.len()));
        lines.push(format!(
            "  {:<20} {:<8} {:<6} {}",
            "NAME", "KIND", "STATE", "NOTES"
        ));
        for sw in &self.switches {
            let mut notes = Vec::new();
            if sw.substation {
                notes.push("substation");
            }
            if !sw.linked {
                notes.push("unlinked");
            }
            lines.push(format!(
                "  {:<20} {:<8} {:<6} {}",
                sw.name,
                sw.kind.to_string(),
                sw.state.to_string(),
                notes.join(", ")
            ));
        }
        lines.push(String::new());

        lines.push(format!("Links ({}):", self.links.len()));
        for link in &self.links {
            let marker = if link.energized { "energized" } else { "dead" };
            lines.push(format!("  {} - {} ({})", link.first, link.second, marker));
        }
        lines.push(String::new());

        lines.push(format!(
            "Energized: {} switches, {} links",
            self.energized_switches, self.energized_links
        ));
        lines.push(format!("Meshed: {}", yes_no(self.meshed)));
        lines.push(format!(
            "Substations interconnected: {}",
            yes_no(self.substations_interconnected)
        ));

        lines.join("\n")
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Dialect;

    fn sample() -> LoadedNetwork {
        let commands: Vec<String> = [
            "s1 onload on substation a",
            "a offload on b",
            "b onload off s2",
            "s2 onload on substation",
            "spare onload off",
        ]
        .iter()
        .map(|line| line.to_string())
        .collect();

        LoadedNetwork::from_commands(&commands, Dialect::Plain).unwrap()
    }

    #[test]
    fn test_report_snapshot() {
        let loaded = sample();
        let report = NetworkReport::new(&loaded, Vec::new());

        assert_eq!(report.switches.len(), 5);
        assert_eq!(report.links.len(), 3);
        assert_eq!(report.energized_switches, 3);
        assert_eq!(report.energized_links, 1);
        assert!(!report.substations_interconnected);

        let spare = report.switches.iter().find(|sw| sw.name == "spare").unwrap();
        assert!(!spare.linked);
    }

    #[test]
    fn test_toggle_outcomes() {
        let mut loaded = sample();
        let result = loaded.toggle("b");
        let outcome = ToggleOutcome::from_result("b", result);

        assert!(!outcome.accepted);
        assert_eq!(
            outcome.reasons,
            vec![SwitchingError::CausesSubstationsInterconnection]
        );

        let outcome = ToggleOutcome::from_result("ghost", loaded.toggle("ghost"));
        assert!(!outcome.accepted);
        assert!(outcome.error.is_some());

        let report = NetworkReport::new(&loaded, vec![outcome]);
        assert!(report.has_rejections());
    }

    #[test]
    fn test_renderers() {
        let loaded = sample();
        let report = NetworkReport::new(
            &loaded,
            vec![ToggleOutcome::from_result("spare", Ok(()))],
        );

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["switches"][0]["name"], "a");
        assert_eq!(json["switches"][0]["kind"], "offload");
        assert_eq!(json["toggles"][0]["accepted"], true);

        let text = report.to_text();
        assert!(text.contains("SWITCHING REPORT"));
        assert!(text.contains("a - s1 (energized)"));
        assert!(text.contains("spare                accepted"));
    }
}
