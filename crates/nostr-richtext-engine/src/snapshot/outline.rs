//! Line-oriented text renderings of parse results.
//!
//! Strings are printed with `{:?}` so whitespace and line breaks stay visible.

use std::fmt::Write as _;

use crate::document::ParsedDocument;
use crate::gallery::{Gallery, InlinePiece, RenderUnit};
use crate::segment::{Segment, SegmentKind};

pub fn kind_label(kind: &SegmentKind) -> String {
    match kind {
        SegmentKind::PlainText => "Text".into(),
        SegmentKind::Mention { kind, canonical_id } => format!("Mention({kind:?} {canonical_id})"),
        SegmentKind::Hashtag { name } => format!("Hashtag({name})"),
        SegmentKind::Url { has_scheme: true } => "Url".into(),
        SegmentKind::Url { has_scheme: false } => "Url(schemeless)".into(),
        SegmentKind::Email => "Email".into(),
        SegmentKind::Phone => "Phone".into(),
        SegmentKind::LightningInvoice => "Invoice".into(),
        SegmentKind::LightningWithdrawRequest => "Withdraw".into(),
        SegmentKind::CashuToken => "Cashu".into(),
        SegmentKind::EmojiShortcode { name, .. } => format!("Emoji({name})"),
        SegmentKind::SecretBlock => "Secret".into(),
        SegmentKind::ImageReference { .. } => "Image".into(),
        SegmentKind::InlineImageData { .. } => "ImageData".into(),
    }
}

fn segment_line(segment: &Segment) -> String {
    let mut line = format!("{} {:?}", kind_label(&segment.kind), segment.text);
    if let Some(extra) = &segment.extra {
        let _ = write!(line, " +{extra:?}");
    }
    line
}

/// One line per paragraph header, segment and separator.
pub fn outline(doc: &ParsedDocument) -> String {
    let mut lines = vec![];
    for (i, paragraph) in doc.paragraphs().iter().enumerate() {
        let direction = if paragraph.is_rtl { "rtl" } else { "ltr" };
        lines.push(format!("P{i} {direction}"));
        for segment in &paragraph.segments {
            lines.push(format!("  {}", segment_line(segment)));
        }
        if let Some(separator) = &paragraph.separator {
            lines.push(format!("  -- {:?}", separator.text));
        }
    }
    lines.join("\n")
}

fn gallery_label(gallery: &Gallery) -> String {
    format!("Gallery x{} {:?}", gallery.images.len(), gallery.layout())
}

/// One line per render unit.
pub fn render_plan_outline(doc: &ParsedDocument) -> String {
    let mut lines = vec![];
    for (unit, range) in doc.render_plan().iter().zip(doc.render_ranges()) {
        // lone images that swallowed blank paragraphs show their whole range
        let paragraphs = if range.len() == 1 {
            format!("P{}", range.start)
        } else {
            format!("P{}..{}", range.start, range.end)
        };
        match unit {
            RenderUnit::SingleParagraph(_) => lines.push(format!("Single {paragraphs}")),
            RenderUnit::Gallery(gallery) => {
                lines.push(format!(
                    "{} P{}..{}",
                    gallery_label(gallery),
                    range.start,
                    range.end
                ));
            }
            RenderUnit::MixedParagraph { pieces, .. } => {
                let pieces: Vec<String> = pieces
                    .iter()
                    .map(|piece| match piece {
                        InlinePiece::Segment(segment) => segment_line(segment),
                        InlinePiece::Gallery(gallery) => gallery_label(gallery),
                    })
                    .collect();
                lines.push(format!("Mixed {paragraphs}: {}", pieces.join(" | ")));
            }
        }
    }
    lines.join("\n")
}

/// Side maps: emoji, images, hashtag icons and links.
pub fn metadata_outline(doc: &ParsedDocument) -> String {
    let mut lines = vec![];
    for (name, url) in doc.emojis() {
        lines.push(format!("emoji {name} -> {url}"));
    }
    for (key, meta) in doc.images() {
        let mut line = format!("image {key}");
        for (label, value) in [
            ("mime", &meta.mime_type),
            ("dim", &meta.dim),
            ("alt", &meta.alt),
        ] {
            if let Some(value) = value {
                let _ = write!(line, " {label}={value:?}");
            }
        }
        lines.push(line);
    }
    for (name, icon) in doc.hashtag_icons() {
        lines.push(format!("icon #{name} -> {}", icon.id()));
    }
    for url in doc.urls() {
        lines.push(format!("link {url}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::parse_uncached;

    fn parse(content: &str) -> ParsedDocument {
        parse_uncached(content, &[], None, usize::MAX)
    }

    #[test]
    fn outline_of_simple_post() {
        let doc = parse("gm #nostr!\n\nשלום");
        insta::assert_snapshot!(outline(&doc), @r##"
        P0 ltr
          Text "gm "
          Hashtag(nostr) "#nostr" +"!"
          -- "\n\n"
        P1 rtl
          Text "שלום"
        "##);
    }

    #[test]
    fn render_plan_of_gallery_post() {
        let doc = parse(
            "https://x.com/1.png\n\nhttps://x.com/2.png\n\nlook https://x.com/3.png https://x.com/4.png",
        );
        insta::assert_snapshot!(render_plan_outline(&doc), @r##"
        Gallery x2 SideBySide P0..2
        Mixed P2: Text "look " | Gallery x2 SideBySide
        "##);
    }

    #[test]
    fn render_plan_of_lone_image_with_trailing_blank() {
        let doc = parse("gm\n\nhttps://x.com/1.png\n\n");
        insta::assert_snapshot!(render_plan_outline(&doc), @r"
        Single P0
        Single P1..3
        ");
    }

    #[test]
    fn metadata_lists_side_maps() {
        let doc = parse("#zap example.com https://x.com/a.png");
        insta::assert_snapshot!(metadata_outline(&doc), @r"
        image https://x.com/a.png
        icon #zap -> lightning
        link example.com
        ");
    }
}
