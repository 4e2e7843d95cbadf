//! UniFFI bindings for nostr-richtext mobile apps
//!
//! Exposes the rich-text engine to Kotlin and Swift clients: parse a post with
//! its tags, get back paragraphs, a render plan and side maps as plain records.

use nostr_richtext_engine::{
    EngineOptions, Gallery, GalleryLayout, ImageMeta, InlinePiece, MentionKind, Paragraph,
    ParsedDocument, RenderUnit, RichTextEngine, Segment, SegmentKind,
};
use std::num::NonZeroUsize;

uniffi::setup_scaffolding!();

// ============ Errors ============

/// Errors that can cross the FFI boundary
/// Note: Field is named `reason` not `message` to avoid conflict with Throwable.message in Kotlin
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FfiError {
    #[error("Invalid option: {reason}")]
    InvalidOption { reason: String },
}

// ============ Parser Handle ============

/// A shared parser with its own result cache.
///
/// Apps usually keep one for the process and call it from any thread.
#[derive(uniffi::Object)]
pub struct RichTextParser {
    engine: RichTextEngine,
}

#[uniffi::export]
impl RichTextParser {
    /// Create a parser with default limits.
    #[uniffi::constructor]
    pub fn new() -> Self {
        Self {
            engine: RichTextEngine::default(),
        }
    }

    /// Create a parser keeping up to `capacity` parsed posts.
    #[uniffi::constructor]
    pub fn with_capacity(capacity: u32) -> Result<Self, FfiError> {
        let cache_capacity =
            NonZeroUsize::new(capacity as usize).ok_or_else(|| FfiError::InvalidOption {
                reason: "cache capacity must be at least 1".to_string(),
            })?;
        Ok(Self {
            engine: RichTextEngine::new(EngineOptions {
                cache_capacity,
                ..EngineOptions::default()
            }),
        })
    }

    /// Parse post content with the event's tags.
    pub fn parse(
        &self,
        content: String,
        tags: Vec<Vec<String>>,
        callback_uri: Option<String>,
    ) -> DocumentDto {
        let doc = self
            .engine
            .parse(&content, &tags, callback_uri.as_deref());
        DocumentDto::from_engine(&doc)
    }

    /// Decode a secret segment's text. `depth` is 1 for a top-level post.
    pub fn decode_secret(&self, payload: String, tags: Vec<Vec<String>>, depth: u32) -> DocumentDto {
        let doc = self.engine.decode_secret(&payload, &tags, depth as usize);
        DocumentDto::from_engine(&doc)
    }

    /// Number of posts currently cached.
    pub fn cached_count(&self) -> u64 {
        self.engine.cache().len() as u64
    }

    pub fn clear_cache(&self) {
        self.engine.clear_cache();
    }
}

impl Default for RichTextParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============ DTOs ============

/// A parsed post, ready for rendering.
#[derive(uniffi::Record)]
pub struct DocumentDto {
    pub paragraphs: Vec<ParagraphDto>,
    pub render_plan: Vec<RenderUnitDto>,
    /// Emoji shortcode name to image URL
    pub emojis: Vec<EntryDto>,
    pub images: Vec<ImageMetaDto>,
    /// Hashtag (lowercase) to icon id
    pub hashtag_icons: Vec<EntryDto>,
    /// Link URLs in content order, for previews
    pub urls: Vec<String>,
}

impl DocumentDto {
    fn from_engine(doc: &ParsedDocument) -> Self {
        Self {
            paragraphs: doc.paragraphs().iter().map(ParagraphDto::from_engine).collect(),
            render_plan: render_plan_dtos(doc),
            emojis: doc
                .emojis()
                .iter()
                .map(|(key, value)| EntryDto {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
            images: doc.images().values().map(ImageMetaDto::from_engine).collect(),
            hashtag_icons: doc
                .hashtag_icons()
                .iter()
                .map(|(key, icon)| EntryDto {
                    key: key.clone(),
                    value: icon.id().to_string(),
                })
                .collect(),
            urls: doc.urls().to_vec(),
        }
    }
}

/// An ordered key/value pair from one of the document's side maps.
#[derive(uniffi::Record)]
pub struct EntryDto {
    pub key: String,
    pub value: String,
}

#[derive(uniffi::Record)]
pub struct ParagraphDto {
    pub segments: Vec<SegmentDto>,
    pub is_rtl: bool,
    /// Blank-line text that ended this paragraph
    pub separator: Option<String>,
}

impl ParagraphDto {
    fn from_engine(paragraph: &Paragraph) -> Self {
        Self {
            segments: paragraph.segments.iter().map(SegmentDto::from_engine).collect(),
            is_rtl: paragraph.is_rtl,
            separator: paragraph.separator.as_ref().map(|s| s.text.clone()),
        }
    }
}

/// A classified run of post text.
#[derive(uniffi::Record)]
pub struct SegmentDto {
    /// Segment type, e.g. "text", "mention", "hashtag", "url", "image"
    pub kind: String,
    /// Matched text as it appears in the post
    pub text: String,
    /// Trailing punctuation to render after the segment as plain text
    pub extra: Option<String>,
    /// Byte offsets into the original content
    pub start: u64,
    pub end: u64,
    /// Mention id, hashtag name, emoji or image URL, or inline image payload
    pub value: Option<String>,
    /// For mentions: "user", "note", "event", "address", "relay" or "secret_key"
    pub mention_kind: Option<String>,
}

impl SegmentDto {
    fn from_engine(segment: &Segment) -> Self {
        let (kind, value, mention_kind) = match &segment.kind {
            SegmentKind::PlainText => ("text", None, None),
            SegmentKind::Mention { kind, canonical_id } => (
                "mention",
                Some(canonical_id.clone()),
                Some(mention_kind_name(*kind)),
            ),
            SegmentKind::Hashtag { name } => ("hashtag", Some(name.clone()), None),
            SegmentKind::Url { has_scheme: true } => ("url", None, None),
            SegmentKind::Url { has_scheme: false } => ("schemeless_url", None, None),
            SegmentKind::Email => ("email", None, None),
            SegmentKind::Phone => ("phone", None, None),
            SegmentKind::LightningInvoice => ("lightning_invoice", None, None),
            SegmentKind::LightningWithdrawRequest => ("lightning_withdraw", None, None),
            SegmentKind::CashuToken => ("cashu", None, None),
            SegmentKind::EmojiShortcode { url, .. } => ("emoji", Some(url.clone()), None),
            SegmentKind::SecretBlock => ("secret", None, None),
            SegmentKind::ImageReference { url } => ("image", Some(url.clone()), None),
            SegmentKind::InlineImageData { payload } => ("image_data", Some(payload.clone()), None),
        };
        Self {
            kind: kind.to_string(),
            text: segment.text.clone(),
            extra: segment.extra.clone(),
            start: segment.span.start as u64,
            end: segment.span.end as u64,
            value,
            mention_kind: mention_kind.map(str::to_string),
        }
    }
}

fn mention_kind_name(kind: MentionKind) -> &'static str {
    match kind {
        MentionKind::User => "user",
        MentionKind::Note => "note",
        MentionKind::Event => "event",
        MentionKind::Address => "address",
        MentionKind::Relay => "relay",
        MentionKind::SecretKey => "secret_key",
    }
}

#[derive(uniffi::Record)]
pub struct ImageMetaDto {
    pub url: String,
    pub mime_type: Option<String>,
    pub dim: Option<String>,
    pub blurhash: Option<String>,
    pub alt: Option<String>,
    pub hash: Option<String>,
    pub content_warning: Option<String>,
    pub callback_uri: Option<String>,
}

impl ImageMetaDto {
    fn from_engine(meta: &ImageMeta) -> Self {
        let meta = meta.clone();
        Self {
            url: meta.url,
            mime_type: meta.mime_type,
            dim: meta.dim,
            blurhash: meta.blurhash,
            alt: meta.alt,
            hash: meta.hash,
            content_warning: meta.content_warning,
            callback_uri: meta.callback_uri,
        }
    }
}

#[derive(uniffi::Record)]
pub struct GalleryDto {
    pub images: Vec<SegmentDto>,
    /// "single", "side_by_side", "one_large_two_small", "grid_2x2" or "wrapping"
    pub layout: String,
    pub columns: u32,
}

impl GalleryDto {
    fn from_engine(gallery: &Gallery) -> Self {
        let (layout, columns) = match gallery.layout() {
            GalleryLayout::Empty => ("empty", 0),
            GalleryLayout::Single => ("single", 1),
            GalleryLayout::SideBySide => ("side_by_side", 2),
            GalleryLayout::OneLargeTwoSmall => ("one_large_two_small", 2),
            GalleryLayout::Grid2x2 => ("grid_2x2", 2),
            GalleryLayout::Wrapping { columns } => ("wrapping", columns as u32),
        };
        Self {
            images: gallery.images.iter().map(SegmentDto::from_engine).collect(),
            layout: layout.to_string(),
            columns,
        }
    }
}

/// Either a segment or an inline gallery inside a mixed paragraph.
#[derive(uniffi::Record)]
pub struct InlinePieceDto {
    pub segment: Option<SegmentDto>,
    pub gallery: Option<GalleryDto>,
}

/// One unit of the render plan.
#[derive(uniffi::Record)]
pub struct RenderUnitDto {
    /// "paragraph", "gallery" or "mixed"
    pub kind: String,
    /// Range of paragraph indices this unit covers
    pub first_paragraph: u32,
    pub end_paragraph: u32,
    pub gallery: Option<GalleryDto>,
    /// Only for "mixed"
    pub pieces: Vec<InlinePieceDto>,
}

fn render_plan_dtos(doc: &ParsedDocument) -> Vec<RenderUnitDto> {
    doc.render_plan()
        .iter()
        .zip(doc.render_ranges())
        .map(|(unit, range)| {
            let (kind, gallery, pieces) = match unit {
                RenderUnit::SingleParagraph(_) => ("paragraph", None, vec![]),
                RenderUnit::Gallery(gallery) => {
                    ("gallery", Some(GalleryDto::from_engine(gallery)), vec![])
                }
                RenderUnit::MixedParagraph { pieces, .. } => (
                    "mixed",
                    None,
                    pieces
                        .iter()
                        .map(|piece| match piece {
                            InlinePiece::Segment(segment) => InlinePieceDto {
                                segment: Some(SegmentDto::from_engine(segment)),
                                gallery: None,
                            },
                            InlinePiece::Gallery(gallery) => InlinePieceDto {
                                segment: None,
                                gallery: Some(GalleryDto::from_engine(gallery)),
                            },
                        })
                        .collect(),
                ),
            };
            RenderUnitDto {
                kind: kind.to_string(),
                first_paragraph: range.start as u32,
                end_paragraph: range.end as u32,
                gallery,
                pieces,
            }
        })
        .collect()
}

// ============ Standalone Functions ============

/// Whether content is probably markdown and better shown by a markdown renderer.
#[uniffi::export]
pub fn looks_like_markdown(content: String) -> bool {
    nostr_richtext_engine::looks_like_markdown(&content)
}
