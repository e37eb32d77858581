/// Best-effort text recovery from legacy `attributedBody` blobs.
///
/// The blob is an archived attributed string. Rather than parse the archive,
/// we decode it lossily and cut the text out between class-name markers:
///
/// ```text
/// ... NSString <6 bytes: flags, '+', len> TEXT <12 bytes> NSDictionary ... NSNumber ...
/// ```
///
/// Any missing marker yields `None`. Offsets count characters of the lossy
/// decode, so each invalid byte in the framing counts as one replacement char.

/// Everything from the first occurrence of this marker on is discarded.
pub const OUTER_MARKER: &str = "NSNumber";

/// The text lives after the first occurrence of this marker (up to the next one).
pub const STRING_MARKER: &str = "NSString";

/// The text ends somewhere before this marker.
pub const DICTIONARY_MARKER: &str = "NSDictionary";

/// Framing characters between `NSString` and the text.
pub const PREFIX_CHARS: usize = 6;

/// Framing characters between the text and `NSDictionary`.
pub const SUFFIX_CHARS: usize = 12;

/// Pick the message body from the plain-text column, falling back to the
/// archived blob only when the text column is empty or NULL.
pub fn extract_body(text: Option<&str>, archived: Option<&[u8]>) -> Option<String> {
    if let Some(text) = text.filter(|t| !t.is_empty()) {
        return Some(text.to_string());
    }

    match archived {
        Some(blob) if !blob.is_empty() => extract_archived_text(blob),
        _ => None,
    }
}

/// Recover the plain-text payload from an archived attributed string.
pub fn extract_archived_text(blob: &[u8]) -> Option<String> {
    let decoded = String::from_utf8_lossy(blob);

    let (outer, _) = decoded.split_once(OUTER_MARKER)?;
    let (_, after_string) = outer.split_once(STRING_MARKER)?;
    let segment = after_string
        .split_once(STRING_MARKER)
        .map_or(after_string, |(head, _)| head);
    let (framed, _) = segment.split_once(DICTIONARY_MARKER)?;

    Some(strip_framing(framed))
}

/// Drop the fixed prefix and suffix. Too-short input yields an empty string.
fn strip_framing(framed: &str) -> String {
    let chars: Vec<char> = framed.chars().collect();
    if chars.len() <= PREFIX_CHARS + SUFFIX_CHARS {
        return String::new();
    }
    chars[PREFIX_CHARS..chars.len() - SUFFIX_CHARS].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lay out `text` the way the archiver does for a plain single-part message.
    fn archived(text: &str) -> Vec<u8> {
        let len = text.len() as u8;
        assert!(len < 0x80, "test helper only handles short single-byte lengths");

        let mut blob = Vec::new();
        blob.extend_from_slice(b"\x04\x0bstreamtyped\x81\xe8\x03\x84\x01@\x84\x84\x84\x12NSAttributedString\x00");
        blob.extend_from_slice(b"\x84\x84\x08NSObject\x00\x85\x92\x84\x84\x84\x08NSString");
        blob.extend_from_slice(b"\x01\x94\x84\x01+");
        blob.push(len);
        blob.extend_from_slice(text.as_bytes());
        blob.extend_from_slice(b"\x86\x84\x02iI\x01");
        blob.push(len);
        blob.extend_from_slice(b"\x92\x84\x84\x84\x0cNSDictionary\x00\x94\x84\x01i\x01");
        blob.extend_from_slice(b"\x92\x84\x96\x96\x1d__kIMMessagePartAttributeName\x86\x92");
        blob.extend_from_slice(b"\x84\x84\x84\x08NSNumber\x00\x84\x84\x07NSValue\x00\x94\x84\x01*\x84\x99\x99\x00\x86\x86\x86");
        blob
    }

    #[test]
    fn text_column_wins() {
        let blob = archived("from the blob");
        assert_eq!(extract_body(Some("from the column"), Some(&blob)).as_deref(), Some("from the column"));
        assert_eq!(extract_body(Some("plain"), Some(b"garbage")).as_deref(), Some("plain"));
        assert_eq!(extract_body(Some("plain"), None).as_deref(), Some("plain"));
    }

    #[test]
    fn nothing_to_extract() {
        assert_eq!(extract_body(None, None), None);
        assert_eq!(extract_body(Some(""), None), None);
        assert_eq!(extract_body(None, Some(b"")), None);
    }

    #[test]
    fn empty_text_falls_back_to_blob() {
        let blob = archived("Hello, world!");
        assert_eq!(extract_body(Some(""), Some(&blob)).as_deref(), Some("Hello, world!"));
        assert_eq!(extract_body(None, Some(&blob)).as_deref(), Some("Hello, world!"));
    }

    #[test]
    fn recovers_multibyte_text() {
        let blob = archived("café ☕");
        assert_eq!(extract_archived_text(&blob).as_deref(), Some("café ☕"));
    }

    #[test]
    fn missing_markers_yield_none() {
        assert_eq!(extract_archived_text(b"no markers here at all"), None);
        // Outer marker present, string marker missing.
        assert_eq!(extract_archived_text(b"xxxxxx hello xxxxxxxxxxxx NSDictionary NSNumber"), None);
        // String marker only after the outer marker.
        assert_eq!(extract_archived_text(b"NSNumber NSString xxxxxxhelloxxxxxxxxxxxxNSDictionary"), None);
        // Dictionary marker missing.
        assert_eq!(extract_archived_text(b"NSStringxxxxxxhelloxxxxxxxxxxxxNSNumber"), None);
        // Dictionary marker is case-sensitive.
        assert_eq!(extract_archived_text(b"NSStringxxxxxxhelloxxxxxxxxxxxxNSdictionaryNSNumber"), None);
    }

    #[test]
    fn pins_marker_offsets() {
        let blob = b"NSString123456hello123456789012NSDictionaryNSNumber";
        assert_eq!(extract_archived_text(blob).as_deref(), Some("hello"));
    }

    #[test]
    fn segment_stops_at_second_string_marker() {
        // The dictionary marker after a second NSString is not considered.
        let blob = b"NSString123456hello123456789012NSStringNSDictionaryNSNumber";
        assert_eq!(extract_archived_text(blob), None);
    }

    #[test]
    fn short_segment_is_empty_not_none() {
        let blob = b"NSString123456789012345678NSDictionaryNSNumber";
        assert_eq!(extract_archived_text(blob).as_deref(), Some(""));
        assert_eq!(extract_archived_text(b"NSStringNSDictionaryNSNumber").as_deref(), Some(""));
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let blob = b"\xff\xfeNSString\xff23456hi\xff23456789012NSDictionaryNSNumber";
        assert_eq!(extract_archived_text(blob).as_deref(), Some("hi"));
    }
}
