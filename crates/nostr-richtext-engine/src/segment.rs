//! # Segments
//!
//! The typed fragments a post body is split into. Every segment keeps the exact
//! source text it was classified from plus any trailing characters the
//! classifier refused to swallow (sentence punctuation after a URL, a hashtag or
//! a mention). Concatenating `text + extra` of every segment in order, together
//! with the paragraph separators, reproduces the original content byte for byte.

pub(crate) const ZERO_WIDTH_SPACE: char = '\u{200B}';

/// A byte range `[start, end)` into the content a segment was derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// What a decoded entity reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MentionKind {
    User,
    Note,
    Event,
    Address,
    Relay,
    SecretKey,
}

/// Classification of a segment.
///
/// This is a closed set: every consumer matches exhaustively, so a new kind is a
/// compile error at each match site until it is handled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Text that isn't part of any special construct (including line breaks).
    PlainText,
    /// A `nostr:`/`@`/bare bech32 entity, or a legacy `#[n]` tag reference.
    Mention {
        kind: MentionKind,
        /// Hex id, `kind:pubkey:identifier` coordinate, or relay URL.
        canonical_id: String,
    },
    /// `#name`. The `#` is not part of `name`.
    Hashtag { name: String },
    /// A link. Schemeless links (`example.com/path`) have `has_scheme == false`.
    Url { has_scheme: bool },
    Email,
    Phone,
    LightningInvoice,
    LightningWithdrawRequest,
    CashuToken,
    /// A `:shortcode:` with a matching `emoji` tag.
    EmojiShortcode { name: String, url: String },
    /// Text hidden in variation selectors; revealed lazily.
    SecretBlock,
    /// A link to an image, either by extension or by declared mime type.
    ImageReference { url: String },
    /// A `data:image/...;base64,` URI.
    InlineImageData { payload: String },
}

/// A classified fragment of post content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    pub kind: SegmentKind,
    /// The classified source text.
    pub text: String,
    /// Trailing characters not consumed by the classification.
    pub extra: Option<String>,
    /// Where `text` followed by `extra` sits in the source.
    pub span: Span,
}

impl Segment {
    pub fn new(kind: SegmentKind, text: impl Into<String>, extra: Option<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            extra,
            span,
        }
    }

    pub fn plain(text: impl Into<String>, span: Span) -> Self {
        Self::new(SegmentKind::PlainText, text, None, span)
    }

    pub fn is_plain(&self) -> bool {
        matches!(self.kind, SegmentKind::PlainText)
    }

    /// Images render as media rather than text and take part in gallery grouping.
    pub fn is_image(&self) -> bool {
        matches!(
            self.kind,
            SegmentKind::ImageReference { .. } | SegmentKind::InlineImageData { .. }
        )
    }

    /// Plain text made only of whitespace (spaces, tabs, single line breaks)
    /// and zero-width spaces.
    pub fn is_blank(&self) -> bool {
        self.is_plain()
            && self
                .text
                .chars()
                .all(|c| c.is_whitespace() || c == ZERO_WIDTH_SPACE)
    }

    /// A plain-text whitespace run that ends a paragraph: it holds a blank line.
    pub fn is_paragraph_break(&self) -> bool {
        self.is_blank() && is_blank_line_run(&self.text)
    }

    /// The source text covered by this segment, `extra` included.
    pub fn source_text(&self) -> String {
        match &self.extra {
            Some(extra) => format!("{}{}", self.text, extra),
            None => self.text.clone(),
        }
    }

    pub fn extra_str(&self) -> &str {
        self.extra.as_deref().unwrap_or("")
    }
}

/// Whitespace containing at least two line feeds, i.e. at least one blank line.
pub(crate) fn is_blank_line_run(text: &str) -> bool {
    text.chars().all(char::is_whitespace) && text.bytes().filter(|b| *b == b'\n').count() >= 2
}
