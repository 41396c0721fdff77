//! Combining imported entries with the ones already known.

use std::collections::HashSet;

use tracing::debug;

use crate::types::ReflectionEntry;

/// Drop later duplicates, keeping first occurrences in order.
///
/// Two entries are the same when time, values, and comment all match.
pub fn unique_entries(items: &[ReflectionEntry]) -> Vec<ReflectionEntry> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .filter(|entry| seen.insert(*entry))
        .cloned()
        .collect()
}

/// Union of `current` and `incoming` without duplicates, sorted by time.
///
/// Idempotent: merging the same `incoming` again changes nothing.
pub fn merge_entries(
    current: &[ReflectionEntry],
    incoming: &[ReflectionEntry],
) -> Vec<ReflectionEntry> {
    let combined: Vec<ReflectionEntry> = current.iter().chain(incoming).cloned().collect();
    let mut merged = unique_entries(&combined);
    merged.sort_by_key(|entry| entry.time);

    let imported = merged.len().saturating_sub(current.len());
    debug!(
        imported,
        filtered_out = incoming.len().saturating_sub(imported),
        total = merged.len(),
        "merged entries"
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(day: u32, data: [u8; 8], comment: &str) -> ReflectionEntry {
        ReflectionEntry::new(
            Utc.with_ymd_and_hms(2024, 2, day, 9, 0, 0).unwrap(),
            data,
            comment,
        )
    }

    #[test]
    fn removes_exact_duplicates() {
        let a = at(1, [1; 8], "");
        let b = at(2, [2; 8], "");
        let merged = merge_entries(&[a.clone(), b.clone()], &[b.clone(), a.clone()]);
        assert_eq!(merged, vec![a, b]);
    }

    #[test]
    fn comment_is_part_of_identity() {
        let plain = at(1, [5; 8], "");
        let noted = at(1, [5; 8], "note");
        let merged = merge_entries(&[plain.clone()], &[noted.clone()]);
        assert_eq!(merged.len(), 2);
        assert!(merged.contains(&plain));
        assert!(merged.contains(&noted));
    }

    #[test]
    fn values_are_part_of_identity() {
        let merged = merge_entries(&[at(1, [5; 8], "")], &[at(1, [6; 8], "")]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn sorts_by_time() {
        let merged = merge_entries(
            &[at(20, [1; 8], ""), at(3, [1; 8], "")],
            &[at(10, [1; 8], ""), at(1, [1; 8], "")],
        );
        let days: Vec<u32> = merged
            .iter()
            .map(|e| e.time.format("%d").to_string().parse().unwrap())
            .collect();
        assert_eq!(days, vec![1, 3, 10, 20]);
    }

    #[test]
    fn idempotent() {
        let a = vec![at(5, [1; 8], "x"), at(2, [2; 8], "")];
        let b = vec![at(2, [2; 8], ""), at(9, [3; 8], "y")];
        let once = merge_entries(&a, &b);
        let twice = merge_entries(&once, &b);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_inputs() {
        assert!(merge_entries(&[], &[]).is_empty());
        let a = vec![at(1, [1; 8], "")];
        assert_eq!(merge_entries(&a, &[]), a);
        assert_eq!(merge_entries(&[], &a), a);
    }

    #[test]
    fn unique_keeps_first_occurrence_order() {
        let a = at(9, [1; 8], "");
        let b = at(1, [1; 8], "");
        assert_eq!(unique_entries(&[a.clone(), b.clone(), a.clone()]), vec![a, b]);
    }
}
