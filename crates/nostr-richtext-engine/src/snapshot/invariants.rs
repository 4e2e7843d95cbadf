use crate::document::ParsedDocument;
use crate::gallery::RenderUnit;
use crate::segment::Span;

/// Validates pipeline output invariants for `doc` parsed from `content`.
///
/// Asserts that:
/// - Segment and separator spans tile the content from 0 to its end
/// - Each span slices back to exactly the segment's text and extra
/// - No segment is zero-width (unless the content is empty)
/// - Only separators hold blank lines
/// - Reconstruction reproduces the content
/// - The render plan covers every paragraph, in order
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(content: &str, doc: &ParsedDocument) {
    let n = content.len();
    let mut pos = 0;

    let mut expect_at = |span: Span, text: &str, what: &str| {
        assert_eq!(
            span.start, pos,
            "{what} span {span:?} does not start where the previous one ended ({pos})"
        );
        assert!(
            span.start <= span.end && span.end <= n,
            "{what} span out of bounds: {span:?} (content len: {n})"
        );
        let sliced = content.get(span.start..span.end);
        assert_eq!(
            sliced,
            Some(text),
            "{what} span {span:?} does not slice back to its text"
        );
        pos = span.end;
    };

    assert!(
        !doc.paragraphs().is_empty(),
        "document has no paragraphs"
    );
    for (i, paragraph) in doc.paragraphs().iter().enumerate() {
        for segment in &paragraph.segments {
            assert!(
                n == 0 || !segment.span.is_empty(),
                "zero-width segment in paragraph {i}: {segment:?}"
            );
            assert!(
                !segment.is_paragraph_break(),
                "blank line inside paragraph {i}: {segment:?}"
            );
            expect_at(segment.span, &segment.source_text(), "segment");
        }
        if let Some(separator) = &paragraph.separator {
            assert!(
                separator.is_paragraph_break(),
                "separator of paragraph {i} is not a blank line: {separator:?}"
            );
            expect_at(separator.span, &separator.text, "separator");
        }
    }
    assert_eq!(pos, n, "segments end at {pos}, content is {n} bytes");
    assert_eq!(doc.text(), content, "reconstruction differs from content");

    check_plan_coverage(doc);
}

fn check_plan_coverage(doc: &ParsedDocument) {
    let mut next = 0;
    for (unit, covered) in doc.render_plan().iter().zip(doc.render_ranges()) {
        assert_eq!(
            covered.start, next,
            "render unit covers {covered:?}, expected to start at {next}"
        );
        assert!(
            covered.end <= doc.paragraphs().len(),
            "render unit covers {covered:?} past the last paragraph"
        );
        if let RenderUnit::SingleParagraph(p) | RenderUnit::MixedParagraph { paragraph: p, .. } =
            unit
        {
            assert_eq!(
                &doc.paragraphs()[next],
                p,
                "render plan skips or reorders paragraphs at {next}"
            );
            assert!(
                doc.paragraphs()[next + 1..covered.end]
                    .iter()
                    .all(|skipped| skipped.is_blank()),
                "render unit at {next} swallows non-blank paragraphs"
            );
        }
        next = covered.end;
    }
    assert_eq!(
        next,
        doc.paragraphs().len(),
        "render plan stops at paragraph {next}"
    );
}
