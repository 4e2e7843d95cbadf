//! # Parsed documents
//!
//! The immutable result of running the pipeline over one (content, tags) pair.

use std::collections::BTreeMap;

use crate::gallery::RenderUnit;
use crate::paragraph::Paragraph;
use crate::resolve::HashtagIcon;
use crate::segment::{Segment, Span};

/// Metadata for one inline image, keyed in the document by the image's URL
/// (or the full `data:` URI for inline data).
///
/// The engine collects these from `imeta` tags, URL fragments and data URIs
/// but never interprets them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ImageMeta {
    pub url: String,
    pub mime_type: Option<String>,
    /// `WIDTHxHEIGHT`, as declared.
    pub dim: Option<String>,
    pub blurhash: Option<String>,
    pub alt: Option<String>,
    /// Hex sha256 of the file.
    pub hash: Option<String>,
    pub content_warning: Option<String>,
    /// The caller's navigation context, echoed back for click handling.
    pub callback_uri: Option<String>,
}

impl ImageMeta {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn is_image_mime(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|m| m.to_ascii_lowercase().starts_with("image/"))
    }

    /// Fills every unset field from `other`.
    pub(crate) fn merge_missing(&mut self, other: ImageMeta) {
        fn fill(slot: &mut Option<String>, value: Option<String>) {
            if slot.is_none() {
                *slot = value;
            }
        }
        fill(&mut self.mime_type, other.mime_type);
        fill(&mut self.dim, other.dim);
        fill(&mut self.blurhash, other.blurhash);
        fill(&mut self.alt, other.alt);
        fill(&mut self.hash, other.hash);
        fill(&mut self.content_warning, other.content_warning);
        fill(&mut self.callback_uri, other.callback_uri);
    }
}

/// A fully parsed post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub(crate) paragraphs: Vec<Paragraph>,
    pub(crate) render_plan: Vec<RenderUnit>,
    pub(crate) emojis: BTreeMap<String, String>,
    pub(crate) images: BTreeMap<String, ImageMeta>,
    pub(crate) hashtag_icons: BTreeMap<String, HashtagIcon>,
    pub(crate) urls: Vec<String>,
}

impl ParsedDocument {
    /// The document shown when hidden content cannot be decoded: one paragraph
    /// holding the payload as plain text.
    pub fn plain_fallback(payload: &str) -> Self {
        let paragraph = Paragraph::from_segments(vec![Segment::plain(
            payload,
            Span::new(0, payload.len()),
        )]);
        Self {
            render_plan: crate::gallery::group_for_gallery(std::slice::from_ref(&paragraph)),
            paragraphs: vec![paragraph],
            emojis: BTreeMap::new(),
            images: BTreeMap::new(),
            hashtag_icons: BTreeMap::new(),
            urls: vec![],
        }
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Paragraphs grouped into render units (galleries, mixed and single
    /// paragraphs), computed once at parse time.
    pub fn render_plan(&self) -> &[RenderUnit] {
        &self.render_plan
    }

    /// Paragraph indices behind each render unit, parallel to
    /// [`Self::render_plan`].
    pub fn render_ranges(&self) -> Vec<std::ops::Range<usize>> {
        crate::gallery::unit_ranges(&self.paragraphs, &self.render_plan)
    }

    /// Emoji shortcode → image URL, from `emoji` tags.
    pub fn emojis(&self) -> &BTreeMap<String, String> {
        &self.emojis
    }

    /// Image URL or data URI → metadata.
    pub fn images(&self) -> &BTreeMap<String, ImageMeta> {
        &self.images
    }

    /// Lowercased hashtag name → icon, for hashtags present in the content.
    pub fn hashtag_icons(&self) -> &BTreeMap<String, HashtagIcon> {
        &self.hashtag_icons
    }

    /// Link URLs in first-occurrence order, without duplicates.
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.paragraphs.iter().flat_map(|p| p.segments.iter())
    }

    /// Reconstructs the source content from segments and separators.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for paragraph in &self.paragraphs {
            for segment in &paragraph.segments {
                out.push_str(&segment.text);
                out.push_str(segment.extra_str());
            }
            if let Some(separator) = &paragraph.separator {
                out.push_str(&separator.text);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::RenderUnit;
    use crate::segment::SegmentKind;

    #[test]
    fn fallback_is_single_plain_paragraph() {
        let doc = ParsedDocument::plain_fallback("garbled");
        assert_eq!(doc.paragraphs().len(), 1);
        let segments = &doc.paragraphs()[0].segments;
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, SegmentKind::PlainText);
        assert_eq!(segments[0].text, "garbled");
        assert!(matches!(doc.render_plan(), [RenderUnit::SingleParagraph(_)]));
        assert_eq!(doc.text(), "garbled");
    }

    #[test]
    fn merge_missing_keeps_existing_values() {
        let mut meta = ImageMeta {
            mime_type: Some("image/png".into()),
            ..ImageMeta::new("https://x/a.png")
        };
        meta.merge_missing(ImageMeta {
            mime_type: Some("image/jpeg".into()),
            dim: Some("10x20".into()),
            ..ImageMeta::default()
        });
        assert_eq!(meta.mime_type.as_deref(), Some("image/png"));
        assert_eq!(meta.dim.as_deref(), Some("10x20"));
        assert!(meta.is_image_mime());
    }
}
