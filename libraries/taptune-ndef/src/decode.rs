//! Tag payload decoding

use crate::uri::uri_prefix;
use taptune_core::TagPayload;
use tracing::debug;

/// Language artifact occasionally leaking from NDEF text records: the
/// status byte (UTF-8, two-letter language code) followed by `en`.
const TEXT_LANGUAGE_ARTIFACT: &str = "\u{2}en";

/// Decode a tag payload into a canonical content string
///
/// Only the first record of the first message counts; later records and
/// messages are ignored by design. Anything undecodable yields `None`,
/// logged at debug level. A decode failure is an expected outcome for
/// foreign tags, not an error.
pub fn decode(payload: &TagPayload) -> Option<String> {
    let Some(bytes) = first_record_payload(payload) else {
        debug!("tag payload carries no records");
        return None;
    };
    decode_bytes(bytes)
}

/// The first record's payload bytes, whatever envelope the platform used
fn first_record_payload(payload: &TagPayload) -> Option<&[u8]> {
    match payload {
        TagPayload::Bytes(bytes) => Some(bytes.as_slice()),
        TagPayload::Record(record) => Some(record.payload.as_slice()),
        TagPayload::Message(message) => message.records.first().map(|r| r.payload.as_slice()),
        TagPayload::Read { messages } => messages
            .first()
            .and_then(|message| message.records.first())
            .map(|record| record.payload.as_slice()),
    }
}

fn decode_bytes(payload: &[u8]) -> Option<String> {
    if payload.is_empty() {
        debug!("record payload is empty");
        return None;
    }

    // A text record's status byte collides with URI code 0x02; when the
    // full three-byte language artifact is present the text reading wins.
    let (prefix, rest) = match payload {
        [0x02, b'e', b'n', rest @ ..] => ("", rest),
        [code, rest @ ..] if *code <= 0x23 => (uri_prefix(*code).unwrap_or(""), rest),
        _ => ("", payload),
    };

    let Ok(text) = std::str::from_utf8(rest) else {
        debug!(len = payload.len(), "record payload is not valid UTF-8");
        return None;
    };

    let combined = format!("{prefix}{text}");
    let cleaned = combined
        .strip_prefix(TEXT_LANGUAGE_ARTIFACT)
        .unwrap_or(&combined)
        .trim();

    if cleaned.is_empty() {
        debug!("record payload decoded to an empty string");
        return None;
    }
    Some(cleaned.to_string())
}
