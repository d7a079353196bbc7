//! Chronological reconstruction of procedural events.

use crate::entity::Entity;
use casekeys::ChronoKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Plea,
    Conviction,
    Sentencing,
}

impl EventKind {
    pub fn label(self) -> &'static str {
        match self {
            EventKind::Plea => "Plea",
            EventKind::Conviction => "Convicted",
            EventKind::Sentencing => "Sentenced",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEvent {
    pub date: String,
    pub chrono_key: ChronoKey,
    pub entity_index: usize,
    pub entity_name: String,
    pub kind: EventKind,
    pub sentence: Option<String>,
}

impl TimelineEvent {
    /// Sentences are shown next to conviction and sentencing events only.
    pub fn shows_sentence(&self) -> bool {
        self.kind != EventKind::Plea && self.sentence.is_some()
    }
}

/// Events sharing one date string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineGroup {
    pub date: String,
    pub chrono_key: ChronoKey,
    pub events: Vec<TimelineEvent>,
}

/// Events for one entity in procedural order. A conviction on the same
/// date text as the plea, or a sentencing matching either, is not repeated.
pub fn entity_events(index: usize, entity: &Entity) -> Vec<TimelineEvent> {
    let dates = &entity.dates;
    let plea = dates.plea.as_deref();
    let convicted = dates.conviction.as_deref();
    let conviction = convicted.filter(|c| Some(*c) != plea);
    let sentencing = dates
        .sentencing
        .as_deref()
        .filter(|s| Some(*s) != plea && Some(*s) != convicted);

    [
        (EventKind::Plea, plea),
        (EventKind::Conviction, conviction),
        (EventKind::Sentencing, sentencing),
    ]
    .into_iter()
    .filter_map(|(kind, date)| {
        let date = date?;
        Some(TimelineEvent {
            date: date.to_string(),
            chrono_key: ChronoKey::parse(date),
            entity_index: index,
            entity_name: entity.name.clone(),
            kind,
            sentence: entity.sentence.clone(),
        })
    })
    .collect()
}

/// All events in entity order, then procedural order.
pub fn collect_events(entities: &[Entity]) -> Vec<TimelineEvent> {
    entities
        .iter()
        .enumerate()
        .flat_map(|(index, entity)| entity_events(index, entity))
        .collect()
}

/// Events sorted by date key and grouped by identical date text.
///
/// Dates with the same key (for example "March 14, 2019" and
/// "March 2019") are ordered by where their text first appears, so every
/// distinct date string forms exactly one group. Within a group events keep
/// emission order.
pub fn reconstruct(entities: &[Entity]) -> Vec<TimelineGroup> {
    let mut events = collect_events(entities);

    let mut first_seen: HashMap<String, usize> = HashMap::new();
    for event in &events {
        let next = first_seen.len();
        first_seen.entry(event.date.clone()).or_insert(next);
    }
    // Stable, so emission order survives inside each date.
    events.sort_by_key(|event| (event.chrono_key, first_seen[&event.date]));

    let mut groups: Vec<TimelineGroup> = Vec::new();
    for event in events {
        match groups.last_mut() {
            Some(group) if group.date == event.date => group.events.push(event),
            _ => groups.push(TimelineGroup {
                date: event.date.clone(),
                chrono_key: event.chrono_key,
                events: vec![event],
            }),
        }
    }
    groups
}
