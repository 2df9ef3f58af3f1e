//! Merge event sets from several sources into one calendar.

use std::collections::HashSet;

use tracing::debug;

use crate::event::{CalendarEvent, NamedEvents};

/// Combine group and project events into one deduplicated list.
///
/// Group events are taken as they are (only exact duplicates collapse).
/// A project event is added only when no event with the same location is
/// already present, so group events win over project events and earlier
/// project events win over later ones.
pub fn merge(groups: &[NamedEvents], projects: &[NamedEvents]) -> Vec<CalendarEvent> {
    let mut merged = Vec::new();
    let mut structural: HashSet<&CalendarEvent> = HashSet::new();

    for event in groups.iter().flat_map(|source| &source.events) {
        if structural.insert(event) {
            merged.push(event.clone());
        }
    }

    let mut seen: HashSet<String> = merged
        .iter()
        .map(|event| event.identity().to_string())
        .collect();

    for source in projects {
        for event in &source.events {
            if seen.insert(event.identity().to_string()) {
                merged.push(event.clone());
            } else {
                debug!(
                    source = %source.name,
                    location = event.identity(),
                    "Dropping duplicate event"
                );
            }
        }
    }

    merged
}
