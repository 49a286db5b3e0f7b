//! Timetable slot resolution.
//!
//! The rendered timetable is a fixed grid: weekdays across, one-hour display
//! slots down. Entries carry their own start/end times, which are mapped onto
//! slots by label first and by start time second.

use std::collections::BTreeMap;

use chrono::{NaiveTime, Timelike};
use serde::Serialize;

use crate::model::{Day, TimetableEntry};

/// Fuzzy matching tolerance, in minutes, within the same hour.
pub const FUZZY_MINUTES: u32 = 30;

/// Display rows of the default grid.
pub const DEFAULT_SLOTS: [&str; 9] = [
    "08:00 AM - 09:00 AM",
    "09:00 AM - 10:00 AM",
    "10:00 AM - 11:00 AM",
    "11:00 AM - 12:00 PM",
    "12:00 PM - 01:00 PM",
    "01:00 PM - 02:00 PM",
    "02:00 PM - 03:00 PM",
    "03:00 PM - 04:00 PM",
    "04:00 PM - 05:00 PM",
];

/// Parse a time written as `HH:MM` (24-hour), `HH:MM:SS` or `hh:mm AM`.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
}

/// Format a time the way slot labels do: `10:00 AM`.
pub fn format_time(t: NaiveTime) -> String {
    t.format("%I:%M %p").to_string()
}

/// The entry's own slot-style label, e.g. `10:00 AM - 11:00 AM`.
pub fn entry_label(entry: &TimetableEntry) -> Option<String> {
    let start = parse_time(&entry.start_time)?;
    let end = parse_time(&entry.end_time)?;
    Some(format!("{} - {}", format_time(start), format_time(end)))
}

/// Start time of a slot label (the part before ` - `).
pub fn slot_start(slot: &str) -> Option<NaiveTime> {
    let start = slot.split(" - ").next()?;
    parse_time(start)
}

fn is_exact_match(slot: &str, entry: &TimetableEntry) -> bool {
    if entry_label(entry).is_some_and(|label| label == slot) {
        return true;
    }
    format!("{} - {}", entry.start_time.trim(), entry.end_time.trim()) == slot
}

/// Same hour, minutes within [`FUZZY_MINUTES`]. There is no wraparound:
/// 10:50 never matches an 11:00 slot.
fn is_fuzzy_match(slot_start: NaiveTime, entry: &TimetableEntry) -> bool {
    let Some(start) = parse_time(&entry.start_time) else {
        return false;
    };
    start.hour() == slot_start.hour() && start.minute().abs_diff(slot_start.minute()) <= FUZZY_MINUTES
}

/// Find the entry displayed in `slot` among one day's entries.
///
/// Exact label matches are preferred over fuzzy ones; within each pass the
/// first entry in list order wins.
pub fn find_entry_for_slot<'a>(
    slot: &str,
    entries: &'a [TimetableEntry],
) -> Option<&'a TimetableEntry> {
    slot_match_index(slot, entries).map(|i| &entries[i])
}

fn slot_match_index(slot: &str, entries: &[TimetableEntry]) -> Option<usize> {
    if let Some(exact) = entries.iter().position(|e| is_exact_match(slot, e)) {
        return Some(exact);
    }
    let start = slot_start(slot)?;
    entries.iter().position(|e| is_fuzzy_match(start, e))
}

/// Group entries by day, preserving list order within each day.
pub fn group_by_day(entries: &[TimetableEntry]) -> BTreeMap<Day, Vec<TimetableEntry>> {
    let mut by_day: BTreeMap<Day, Vec<TimetableEntry>> = BTreeMap::new();
    for entry in entries {
        by_day.entry(entry.day).or_default().push(entry.clone());
    }
    by_day
}

/// A resolved day × slot grid.
#[derive(Debug, Clone, Serialize)]
pub struct TimetableGrid {
    pub days: Vec<Day>,
    pub slots: Vec<String>,
    /// `rows[slot][day]`
    pub rows: Vec<Vec<Option<TimetableEntry>>>,
    /// Entries that landed in no cell (off-grid day, or no slot matched).
    pub unplaced: Vec<TimetableEntry>,
}

impl TimetableGrid {
    /// Resolve entries onto the default weekday grid.
    pub fn build(entries: &[TimetableEntry]) -> Self {
        let slots: Vec<String> = DEFAULT_SLOTS.iter().map(|s| s.to_string()).collect();
        Self::with_layout(&Day::WEEKDAYS, &slots, entries)
    }

    pub fn with_layout(days: &[Day], slots: &[String], entries: &[TimetableEntry]) -> Self {
        // Entries are tracked by position so identical entries stay distinct.
        let columns: Vec<(Vec<usize>, Vec<TimetableEntry>)> = days
            .iter()
            .map(|day| {
                let positions: Vec<usize> = (0..entries.len())
                    .filter(|&i| entries[i].day == *day)
                    .collect();
                let day_entries = positions.iter().map(|&i| entries[i].clone()).collect();
                (positions, day_entries)
            })
            .collect();

        let mut placed = vec![false; entries.len()];
        let rows: Vec<Vec<Option<TimetableEntry>>> = slots
            .iter()
            .map(|slot| {
                columns
                    .iter()
                    .map(|(positions, day_entries)| {
                        let i = slot_match_index(slot, day_entries)?;
                        placed[positions[i]] = true;
                        Some(day_entries[i].clone())
                    })
                    .collect()
            })
            .collect();

        let unplaced = entries
            .iter()
            .zip(&placed)
            .filter(|(_, placed)| !**placed)
            .map(|(e, _)| e.clone())
            .collect::<Vec<_>>();

        if !unplaced.is_empty() {
            tracing::debug!(count = unplaced.len(), "timetable entries outside the grid");
        }

        Self {
            days: days.to_vec(),
            slots: slots.to_vec(),
            rows,
            unplaced,
        }
    }

    pub fn cell(&self, day: Day, slot_index: usize) -> Option<&TimetableEntry> {
        let col = self.days.iter().position(|d| *d == day)?;
        self.rows.get(slot_index)?.get(col)?.as_ref()
    }

    /// Number of filled cells.
    pub fn filled(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_some()).count()
    }
}
