//! Version 1: one byte per value, uncompressed, no comments.

use super::Protocol;
use crate::layout::{WireLayout, LAYOUT_V1};
use crate::types::ReflectionEntry;

pub struct ProtocolV1;

impl Protocol for ProtocolV1 {
    fn layout(&self) -> &WireLayout {
        &LAYOUT_V1
    }

    fn revive_entries(&self, entries: Vec<ReflectionEntry>) -> Vec<ReflectionEntry> {
        entries
            .into_iter()
            .map(|entry| ReflectionEntry {
                comment: String::new(),
                ..entry
            })
            .collect()
    }
}
