//! # Hidden content
//!
//! Posts can hide a message behind a visible carrier (usually one emoji) by
//! appending one Unicode variation selector per byte of UTF-8 text. Clients
//! show only the carrier until the reader asks to reveal it; revealing decodes
//! the bytes and runs the recovered text through the full pipeline.

use std::string::FromUtf8Error;
use std::sync::{Arc, OnceLock};

use thiserror::Error;

use crate::document::ParsedDocument;
use crate::tokenize::kinds::Selectors;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecretDecodeError {
    #[error("payload carries no hidden bytes")]
    Empty,
    #[error("hidden bytes are not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}

/// Variation-selector steganography.
pub struct EmojiCoder;

impl EmojiCoder {
    /// Hides `text` behind `carrier`.
    pub fn encode(carrier: &str, text: &str) -> String {
        let mut out = String::with_capacity(carrier.len() + text.len() * 4);
        out.push_str(carrier);
        out.extend(text.bytes().map(Selectors::from_byte));
        out
    }

    /// Recovers the hidden text. Leading carrier characters are skipped, as is
    /// an emoji presentation selector directly after them; decoding stops at
    /// the first character after the selector run.
    pub fn decode(payload: &str) -> Result<String, SecretDecodeError> {
        let mut chars = payload
            .chars()
            .skip_while(|c| !Selectors::is_selector(*c))
            .peekable();
        if chars.peek() == Some(&Selectors::EMOJI_PRESENTATION) {
            chars.next();
        }
        let bytes: Vec<u8> = chars.map_while(Selectors::to_byte).collect();
        if bytes.is_empty() {
            return Err(SecretDecodeError::Empty);
        }
        Ok(String::from_utf8(bytes)?)
    }

    pub fn is_coded(text: &str) -> bool {
        text.chars().any(Selectors::is_supplement)
    }
}

/// Decodes `payload` and hands the recovered text to `parse`.
///
/// `depth` is the nesting level of this reveal, 1 for a secret in a top-level
/// post. Past `max_depth`, or when the payload does not decode, the result is
/// the payload itself as a single plain-text paragraph.
pub fn decode_secret(
    payload: &str,
    depth: usize,
    max_depth: usize,
    parse: impl FnOnce(&str) -> Arc<ParsedDocument>,
) -> Arc<ParsedDocument> {
    if depth > max_depth {
        log::debug!("secret at depth {depth} exceeds limit {max_depth}; showing payload");
        return Arc::new(ParsedDocument::plain_fallback(payload));
    }
    match EmojiCoder::decode(payload) {
        Ok(text) => parse(&text),
        Err(err) => {
            log::debug!("secret payload did not decode: {err}");
            Arc::new(ParsedDocument::plain_fallback(payload))
        }
    }
}

/// A write-once slot a background reveal publishes into. Nothing is ever
/// published if the reveal is abandoned.
#[derive(Debug, Default)]
pub struct RevealSlot {
    value: OnceLock<Arc<ParsedDocument>>,
}

impl RevealSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `doc` unless something was published first. Returns whether
    /// this call won.
    pub fn publish(&self, doc: Arc<ParsedDocument>) -> bool {
        self.value.set(doc).is_ok()
    }

    pub fn get(&self) -> Option<Arc<ParsedDocument>> {
        self.value.get().cloned()
    }

    pub fn is_published(&self) -> bool {
        self.value.get().is_some()
    }
}
