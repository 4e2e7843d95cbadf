//! # Image-run grouping
//!
//! Decides which images render on their own and which collapse into a
//! multi-image gallery.
//!
//! ## Rules
//!
//! 1. A blank paragraph renders as itself.
//! 2. An image-only paragraph starts a run that extends over following
//!    image-only paragraphs and the blank paragraphs between them. A run with
//!    more than one image becomes a single [`Gallery`]; a run with exactly one
//!    image renders as the original paragraph.
//! 3. A paragraph mixing text and images keeps its text inline. Consecutive
//!    images inside it (ignoring whitespace between them) collapse into one
//!    gallery when there are two or more; a lone image stays inline.
//! 4. Anything else renders as itself.
//!
//! The helpers below are pure functions over index ranges so each rule can be
//! tested on its own.

use std::ops::Range;

use crate::paragraph::Paragraph;
use crate::segment::Segment;

/// Per-paragraph image statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRunAnalysis {
    pub image_count: usize,
    /// At least one image and nothing but whitespace besides.
    pub is_image_only: bool,
    pub has_multiple_images: bool,
}

impl ImageRunAnalysis {
    pub fn of(paragraph: &Paragraph) -> Self {
        let image_count = paragraph.segments.iter().filter(|s| s.is_image()).count();
        let is_image_only = image_count > 0
            && paragraph
                .segments
                .iter()
                .all(|s| s.is_image() || s.is_blank());
        Self {
            image_count,
            is_image_only,
            has_multiple_images: image_count > 1,
        }
    }
}

/// How the grouping pass treats a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphClass {
    /// No segments or whitespace only.
    Blank,
    ImageOnly { images: usize },
    Mixed { images: usize },
    Text,
}

impl ParagraphClass {
    pub fn of(paragraph: &Paragraph) -> Self {
        if paragraph.is_blank() {
            return ParagraphClass::Blank;
        }
        let analysis = ImageRunAnalysis::of(paragraph);
        match (analysis.image_count, analysis.is_image_only) {
            (0, _) => ParagraphClass::Text,
            (images, true) => ParagraphClass::ImageOnly { images },
            (images, false) => ParagraphClass::Mixed { images },
        }
    }
}

/// Gallery arrangement for a given number of images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GalleryLayout {
    Empty,
    /// One full-width image.
    Single,
    SideBySide,
    /// One large image with two smaller ones stacked beside it.
    OneLargeTwoSmall,
    Grid2x2,
    /// A wrapping grid; wider once there are more than nine images.
    Wrapping { columns: usize },
}

impl GalleryLayout {
    const WIDE_GRID_THRESHOLD: usize = 9;

    pub fn for_count(count: usize) -> Self {
        match count {
            0 => GalleryLayout::Empty,
            1 => GalleryLayout::Single,
            2 => GalleryLayout::SideBySide,
            3 => GalleryLayout::OneLargeTwoSmall,
            4 => GalleryLayout::Grid2x2,
            n if n <= Self::WIDE_GRID_THRESHOLD => GalleryLayout::Wrapping { columns: 3 },
            _ => GalleryLayout::Wrapping { columns: 4 },
        }
    }
}

/// A group of images rendered together.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Gallery {
    pub images: Vec<Segment>,
    /// Indices of the paragraphs the images were collected from.
    pub paragraphs: Range<usize>,
}

impl Gallery {
    pub fn layout(&self) -> GalleryLayout {
        GalleryLayout::for_count(self.images.len())
    }
}

/// One element of a mixed paragraph's inline flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlinePiece {
    Segment(Segment),
    Gallery(Gallery),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderUnit {
    SingleParagraph(Paragraph),
    Gallery(Gallery),
    /// Text with one or more inline galleries.
    MixedParagraph {
        paragraph: Paragraph,
        pieces: Vec<InlinePiece>,
    },
}

/// End (exclusive) of the image run starting at `start`, which must be an
/// image-only paragraph. The run takes every following blank or image-only
/// paragraph, including blank ones after the last image.
pub fn image_run_end(classes: &[ParagraphClass], start: usize) -> usize {
    let mut end = start + 1;
    while end < classes.len() {
        match classes[end] {
            ParagraphClass::ImageOnly { .. } | ParagraphClass::Blank => end += 1,
            ParagraphClass::Mixed { .. } | ParagraphClass::Text => break,
        }
    }
    end
}

/// Paragraph indices each unit of `plan` was built from, in plan order.
/// A lone image renders as one paragraph but also covers the blank
/// paragraphs its run consumed.
pub fn unit_ranges(paragraphs: &[Paragraph], plan: &[RenderUnit]) -> Vec<Range<usize>> {
    let mut next = 0;
    plan.iter()
        .map(|unit| {
            let range = match unit {
                RenderUnit::Gallery(gallery) => gallery.paragraphs.clone(),
                RenderUnit::SingleParagraph(paragraph)
                    if matches!(
                        ParagraphClass::of(paragraph),
                        ParagraphClass::ImageOnly { .. }
                    ) =>
                {
                    let blanks = paragraphs
                        .get(next + 1..)
                        .unwrap_or_default()
                        .iter()
                        .take_while(|p| p.is_blank())
                        .count();
                    next..next + 1 + blanks
                }
                RenderUnit::SingleParagraph(_) | RenderUnit::MixedParagraph { .. } => {
                    next..next + 1
                }
            };
            next = range.end;
            range
        })
        .collect()
}

/// Ranges of consecutive images inside one paragraph's segments, each holding
/// at least two images. Whitespace between images does not break a run.
pub fn inline_image_runs(segments: &[Segment]) -> Vec<Range<usize>> {
    let mut runs = vec![];
    let mut i = 0;
    while i < segments.len() {
        if !segments[i].is_image() {
            i += 1;
            continue;
        }
        let start = i;
        let mut end = i + 1;
        let mut images = 1;
        let mut j = i + 1;
        while j < segments.len() && (segments[j].is_image() || segments[j].is_blank()) {
            if segments[j].is_image() {
                images += 1;
                end = j + 1;
            }
            j += 1;
        }
        if images > 1 {
            runs.push(start..end);
        }
        i = end;
    }
    runs
}

fn images_in(paragraphs: &[Paragraph]) -> Vec<Segment> {
    paragraphs
        .iter()
        .flat_map(|p| p.segments.iter())
        .filter(|s| s.is_image())
        .cloned()
        .collect()
}

fn inline_pieces(paragraph: &Paragraph, index: usize, runs: &[Range<usize>]) -> Vec<InlinePiece> {
    let segments = &paragraph.segments;
    let mut pieces = vec![];
    let mut i = 0;
    for run in runs {
        pieces.extend(segments[i..run.start].iter().cloned().map(InlinePiece::Segment));
        pieces.push(InlinePiece::Gallery(Gallery {
            images: segments[run.clone()]
                .iter()
                .filter(|s| s.is_image())
                .cloned()
                .collect(),
            paragraphs: index..index + 1,
        }));
        i = run.end;
    }
    pieces.extend(segments[i..].iter().cloned().map(InlinePiece::Segment));
    pieces
}

/// Groups paragraphs into render units. Total over any input.
pub fn group_for_gallery(paragraphs: &[Paragraph]) -> Vec<RenderUnit> {
    let classes: Vec<ParagraphClass> = paragraphs.iter().map(ParagraphClass::of).collect();
    let mut units = Vec::new();
    let mut i = 0;

    while i < paragraphs.len() {
        match classes[i] {
            ParagraphClass::ImageOnly { .. } => {
                let end = image_run_end(&classes, i);
                let images = images_in(&paragraphs[i..end]);
                if images.len() > 1 {
                    units.push(RenderUnit::Gallery(Gallery {
                        images,
                        paragraphs: i..end,
                    }));
                } else {
                    units.push(RenderUnit::SingleParagraph(paragraphs[i].clone()));
                }
                i = end;
            }
            ParagraphClass::Mixed { images } if images > 1 => {
                let runs = inline_image_runs(&paragraphs[i].segments);
                if runs.is_empty() {
                    units.push(RenderUnit::SingleParagraph(paragraphs[i].clone()));
                } else {
                    units.push(RenderUnit::MixedParagraph {
                        paragraph: paragraphs[i].clone(),
                        pieces: inline_pieces(&paragraphs[i], i, &runs),
                    });
                }
                i += 1;
            }
            ParagraphClass::Blank | ParagraphClass::Mixed { .. } | ParagraphClass::Text => {
                units.push(RenderUnit::SingleParagraph(paragraphs[i].clone()));
                i += 1;
            }
        }
    }

    units
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paragraph::assemble;
    use crate::resolve::resolve;
    use crate::tokenize::tokenize;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn plan(content: &str) -> Vec<RenderUnit> {
        group_for_gallery(&assemble(resolve(tokenize(content), &[], None).segments))
    }

    fn img(n: usize) -> String {
        format!("https://img.example/{n}.png")
    }

    #[rstest]
    #[case(0, GalleryLayout::Empty)]
    #[case(1, GalleryLayout::Single)]
    #[case(2, GalleryLayout::SideBySide)]
    #[case(3, GalleryLayout::OneLargeTwoSmall)]
    #[case(4, GalleryLayout::Grid2x2)]
    #[case(5, GalleryLayout::Wrapping { columns: 3 })]
    #[case(9, GalleryLayout::Wrapping { columns: 3 })]
    #[case(10, GalleryLayout::Wrapping { columns: 4 })]
    #[case(1000, GalleryLayout::Wrapping { columns: 4 })]
    fn layout_policy(#[case] count: usize, #[case] layout: GalleryLayout) {
        assert_eq!(GalleryLayout::for_count(count), layout);
    }

    #[test]
    fn run_end_swallows_inner_and_trailing_blanks() {
        use ParagraphClass::*;
        let classes = [
            ImageOnly { images: 1 },
            Blank,
            ImageOnly { images: 2 },
            Blank,
            Text,
        ];
        assert_eq!(image_run_end(&classes, 0), 4);
        assert_eq!(image_run_end(&classes, 2), 4);
        assert_eq!(image_run_end(&[ImageOnly { images: 1 }, Blank, Blank], 0), 3);
    }

    #[test]
    fn trailing_blank_paragraphs_join_the_gallery() {
        let content = format!("{}\n\n{}\n\n \u{200B}\n\n", img(1), img(2));
        let paragraphs = assemble(resolve(tokenize(&content), &[], None).segments);
        assert_eq!(paragraphs.len(), 4);
        let units = group_for_gallery(&paragraphs);
        let [RenderUnit::Gallery(gallery)] = units.as_slice() else {
            panic!("expected one gallery, got {units:?}");
        };
        assert_eq!(gallery.images.len(), 2);
        assert_eq!(gallery.paragraphs, 0..4);
        assert_eq!(unit_ranges(&paragraphs, &units), vec![0..4]);
    }

    #[test]
    fn lone_image_covers_its_trailing_blanks() {
        let content = format!("intro\n\n{}\n\n", img(1));
        let paragraphs = assemble(resolve(tokenize(&content), &[], None).segments);
        let units = group_for_gallery(&paragraphs);
        assert_eq!(units.len(), 2);
        assert!(matches!(&units[1], RenderUnit::SingleParagraph(p) if p.segments[0].is_image()));
        assert_eq!(unit_ranges(&paragraphs, &units), vec![0..1, 1..3]);
    }

    #[test]
    fn run_end_stops_at_mixed() {
        use ParagraphClass::*;
        let classes = [ImageOnly { images: 1 }, Mixed { images: 2 }];
        assert_eq!(image_run_end(&classes, 0), 1);
    }

    #[test]
    fn inline_runs_skip_whitespace_between_images() {
        let content = format!("see {} {}\n{} now {}", img(1), img(2), img(3), img(4));
        let segments = resolve(tokenize(&content), &[], None).segments;
        let runs = inline_image_runs(&segments);
        assert_eq!(runs.len(), 1);
        let images = segments[runs[0].clone()]
            .iter()
            .filter(|s| s.is_image())
            .count();
        assert_eq!(images, 3);
    }

    #[test]
    fn single_image_is_single_paragraph() {
        assert!(matches!(plan(&img(1)).as_slice(), [RenderUnit::SingleParagraph(_)]));
    }

    #[test]
    fn consecutive_image_paragraphs_form_one_gallery() {
        let content = format!("{}\n\n{}\n\n{}", img(1), img(2), img(3));
        let units = plan(&content);
        let [RenderUnit::Gallery(gallery)] = units.as_slice() else {
            panic!("expected one gallery, got {units:?}");
        };
        assert_eq!(gallery.images.len(), 3);
        assert_eq!(gallery.layout(), GalleryLayout::OneLargeTwoSmall);
        assert_eq!(gallery.paragraphs, 0..3);
    }

    #[test]
    fn text_breaks_image_runs() {
        let content = format!("{}\n\ntext\n\n{}", img(1), img(2));
        let units = plan(&content);
        assert_eq!(units.len(), 3);
        assert!(units.iter().all(|u| matches!(u, RenderUnit::SingleParagraph(_))));
    }

    #[test]
    fn mixed_paragraph_gets_inline_gallery() {
        let content = format!("intro\n\nsee this {} {} now\n\noutro", img(1), img(2));
        let units = plan(&content);
        assert_eq!(units.len(), 3);
        let RenderUnit::MixedParagraph { pieces, .. } = &units[1] else {
            panic!("expected mixed paragraph, got {:?}", units[1]);
        };
        let shape: Vec<&str> = pieces
            .iter()
            .map(|p| match p {
                InlinePiece::Segment(s) => s.text.as_str(),
                InlinePiece::Gallery(_) => "<gallery>",
            })
            .collect();
        assert_eq!(shape, vec!["see this ", "<gallery>", " now"]);
        let InlinePiece::Gallery(gallery) = &pieces[1] else {
            unreachable!()
        };
        assert_eq!(gallery.layout(), GalleryLayout::SideBySide);
        assert_eq!(gallery.paragraphs, 1..2);
    }

    #[test]
    fn images_split_by_text_stay_inline() {
        let content = format!("a {} b {} c", img(1), img(2));
        assert!(matches!(plan(&content).as_slice(), [RenderUnit::SingleParagraph(_)]));
    }

    #[test]
    fn empty_input_yields_one_unit() {
        assert!(matches!(plan("").as_slice(), [RenderUnit::SingleParagraph(p)] if p.is_empty()));
    }
}
