//! Version 3: nibble-packed values and comments, deflate-compressed,
//! every entry prefixed with its byte length.

use super::Protocol;
use crate::layout::{WireLayout, LAYOUT_V3};

pub struct ProtocolV3;

impl Protocol for ProtocolV3 {
    fn layout(&self) -> &WireLayout {
        &LAYOUT_V3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::inflate;
    use crate::types::ReflectionEntry;
    use chrono::{TimeZone, Utc};

    #[test]
    fn keeps_comments() {
        let entry = ReflectionEntry::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            [1, 2, 3, 4, 5, 6, 7, 8],
            "hej",
        );
        let encoded = ProtocolV3.encode_entries(&[entry.clone()]).unwrap();
        let raw = inflate(&encoded).unwrap();
        assert_eq!(
            hex::encode(raw),
            "000000010000000f65920080123456780000000368656a"
        );
        assert_eq!(ProtocolV3.decode_entries(&encoded).unwrap(), vec![entry]);
    }
}
