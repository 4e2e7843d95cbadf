//! # Paragraph assembly
//!
//! Splits resolved segments into paragraphs at blank lines. The whitespace
//! segment that ends a paragraph is kept as its `separator`, so paragraphs
//! still reconstruct the source exactly.

use std::ops::RangeInclusive;

use crate::segment::{Segment, Span};

/// Right-to-left script blocks.
const RTL_RANGES: [RangeInclusive<u32>; 10] = [
    0x0590..=0x05FF, // Hebrew
    0x0600..=0x06FF, // Arabic
    0x0700..=0x074F, // Syriac
    0x0750..=0x077F, // Arabic Supplement
    0x0780..=0x07BF, // Thaana
    0x07C0..=0x07FF, // NKo
    0x0800..=0x085F, // Samaritan, Mandaic
    0x08A0..=0x08FF, // Arabic Extended-A
    0xFB1D..=0xFDFF, // Hebrew and Arabic presentation forms A
    0xFE70..=0xFEFF, // Arabic presentation forms B
];

fn is_rtl_char(c: char) -> bool {
    let cp = c as u32;
    RTL_RANGES.iter().any(|r| r.contains(&cp))
}

/// Direction of the first strongly directional character, if any.
fn first_strong_is_rtl(text: &str) -> Option<bool> {
    text.chars()
        .find(|c| c.is_alphabetic())
        .map(is_rtl_char)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub segments: Vec<Segment>,
    pub is_rtl: bool,
    /// The blank-line whitespace that ended this paragraph; `None` for the last.
    pub separator: Option<Segment>,
}

impl Paragraph {
    pub(crate) fn from_segments(segments: Vec<Segment>) -> Self {
        let is_rtl = segments
            .iter()
            .filter(|s| !s.is_blank())
            .find_map(|s| first_strong_is_rtl(&s.text))
            .unwrap_or(false);
        Self {
            segments,
            is_rtl,
            separator: None,
        }
    }

    /// No segments at all, e.g. between two consecutive blank lines.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.segments.iter().all(Segment::is_blank)
    }

    /// Source range covered by the segments and the separator.
    pub fn span(&self) -> Option<Span> {
        let start = self.segments.first().or(self.separator.as_ref())?.span.start;
        let end = self
            .separator
            .as_ref()
            .or(self.segments.last())?
            .span
            .end;
        Some(Span::new(start, end))
    }
}

/// Groups segments into paragraphs. Always returns at least one paragraph;
/// empty ones are kept as placeholders.
pub fn assemble(segments: Vec<Segment>) -> Vec<Paragraph> {
    let mut paragraphs = vec![];
    let mut current = vec![];
    for segment in segments {
        if segment.is_paragraph_break() {
            let mut paragraph = Paragraph::from_segments(std::mem::take(&mut current));
            paragraph.separator = Some(segment);
            paragraphs.push(paragraph);
        } else {
            current.push(segment);
        }
    }
    paragraphs.push(Paragraph::from_segments(current));
    paragraphs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve;
    use crate::tokenize::tokenize;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn paragraphs(content: &str) -> Vec<Paragraph> {
        assemble(resolve(tokenize(content), &[], None).segments)
    }

    fn texts(content: &str) -> Vec<String> {
        paragraphs(content)
            .iter()
            .map(|p| p.segments.iter().map(Segment::source_text).collect())
            .collect()
    }

    #[test]
    fn empty_content_is_one_empty_paragraph() {
        let ps = paragraphs("");
        assert_eq!(ps.len(), 1);
        assert!(ps[0].is_empty());
        assert!(ps[0].is_blank());
        assert_eq!(ps[0].span(), None);
    }

    #[test]
    fn splits_on_blank_lines_only() {
        assert_eq!(texts("one\ntwo\n\nthree"), vec!["one\ntwo", "three"]);
    }

    #[test]
    fn whitespace_only_line_counts_as_blank() {
        assert_eq!(texts("a\n  \nb"), vec!["a", "b"]);
    }

    #[test]
    fn empty_paragraphs_are_kept() {
        assert_eq!(texts("\n\na\n\n"), vec!["", "a", ""]);
    }

    #[test]
    fn separator_preserves_source() {
        let ps = paragraphs("a\n\n\nb");
        assert_eq!(ps[0].separator.as_ref().map(|s| s.text.as_str()), Some("\n\n\n"));
        assert_eq!(ps[0].span(), Some(Span::new(0, 4)));
        assert_eq!(ps[1].separator, None);
    }

    #[rstest]
    #[case("שלום עולם", true)]
    #[case("مرحبا بالعالم", true)]
    #[case("hello", false)]
    #[case("123 שלום", true)]
    #[case("#nostr مرحبا", false)]
    #[case("42", false)]
    fn direction_from_first_strong_char(#[case] content: &str, #[case] rtl: bool) {
        assert_eq!(paragraphs(content)[0].is_rtl, rtl);
    }
}
