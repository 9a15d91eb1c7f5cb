//! Turning raw payload bytes into clean text.

use std::borrow::Cow;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use feed_fetch::RawPayload;
use feed_model::{TextEncoding, Transfer};

use crate::error::{IngestError, Result};

/// Decodes a payload into text ready for header resolution.
///
/// Applies the transfer decoding, then the character encoding (dropping a
/// BOM), then removes NUL characters and trailing line breaks. Leading lines
/// are kept so descriptor header offsets still count physical lines.
pub fn decode_payload(payload: &RawPayload) -> Result<String> {
    let bytes = match payload.transfer {
        Transfer::Plain => Cow::Borrowed(payload.bytes.as_slice()),
        Transfer::Base64 => {
            Cow::Owned(decode_base64(&payload.bytes).map_err(|message| {
                IngestError::Decode {
                    resource: payload.resource.clone(),
                    message,
                }
            })?)
        }
    };

    let text = decode_text(&bytes, payload.encoding);
    if text.had_errors {
        tracing::warn!(
            resource = %payload.resource,
            encoding = %payload.encoding,
            "Payload contained byte sequences invalid for its encoding; replaced"
        );
    }
    Ok(text.text)
}

/// Text decoded from bytes, plus whether replacement characters were needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub had_errors: bool,
}

/// Decodes bytes with `encoding`, then strips NULs and trailing line breaks.
pub fn decode_text(bytes: &[u8], encoding: TextEncoding) -> DecodedText {
    let (decoded, had_errors) = encoding.encoding().decode_with_bom_removal(bytes);
    DecodedText {
        text: repair_text(&decoded),
        had_errors,
    }
}

/// Removes stray NUL characters and the line breaks ending the document.
///
/// Field whitespace is left alone: a final row ending in an empty tab field
/// keeps its trailing delimiter.
pub fn repair_text(text: &str) -> String {
    let cleaned = if text.contains('\0') {
        Cow::Owned(text.replace('\0', ""))
    } else {
        Cow::Borrowed(text)
    };
    cleaned.trim_end_matches(['\r', '\n']).to_string()
}

fn decode_base64(bytes: &[u8]) -> std::result::Result<Vec<u8>, String> {
    let compact: Vec<u8> = bytes
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    STANDARD.decode(compact).map_err(|e| e.to_string())
}
