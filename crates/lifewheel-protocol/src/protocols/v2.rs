//! Version 2: nibble-packed values, deflate-compressed, no comments.

use super::Protocol;
use crate::layout::{WireLayout, LAYOUT_V2};
use crate::types::ReflectionEntry;

pub struct ProtocolV2;

impl Protocol for ProtocolV2 {
    fn layout(&self) -> &WireLayout {
        &LAYOUT_V2
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
