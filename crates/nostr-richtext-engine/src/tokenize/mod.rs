//! # Tokenizer
//!
//! Partitions raw post content into an ordered sequence of [`RawSegment`]s in a
//! single left-to-right scan.
//!
//! ## Scanning model
//!
//! - Whitespace runs that contain a line feed become their own plain-text
//!   segment so the paragraph assembler can find blank lines.
//! - At each word start, opening brackets and quotes are skipped as text, then
//!   every matcher in [`matchers::PRIORITY`] is tried on the word.
//! - The longest match wins. Trailing punctuation right after the match goes
//!   into the segment's `extra`, and the next token may start right after it.
//! - When nothing matches, the scan moves to the next `:` inside the word and
//!   tries only the emoji matcher there, so `gm:wave:` still offers `:wave:`.
//!   Words with no such position are consumed as text.
//! - Matchers see at most [`MAX_TOKEN_LEN`] bytes. A token that runs into the
//!   cap is dropped and the word stays text. Inline image data is exempt since
//!   its payload is consumed as far as it is read.
//!
//! Each word's end is found once and every matcher reads a bounded window, so
//! the scan is linear in the content length. It is also total: any input
//! produces segments whose text and extra, concatenated, reproduce the input
//! exactly.

pub mod cursor;
pub mod entity;
pub mod kinds;
pub mod matchers;

use crate::segment::{Segment, SegmentKind, Span, ZERO_WIDTH_SPACE};

use cursor::Cursor;
use kinds::{Punctuation, Shortcode};
use matchers::Match;

/// Longest token, in bytes, any matcher is shown at once.
pub const MAX_TOKEN_LEN: usize = 16 * 1024;

/// Classification as produced by the tokenizer, before tags are consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawKind {
    /// Classification needs nothing from the tags.
    Final(SegmentKind),
    /// A `:name:` that is an emoji only if an `emoji` tag names it.
    EmojiCandidate { name: String },
    /// A legacy `#[n]` reference into the tag list.
    TagIndex { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSegment {
    pub kind: RawKind,
    pub text: String,
    pub extra: Option<String>,
    pub span: Span,
}

impl RawSegment {
    fn plain(text: &str, span: Span) -> Self {
        Self {
            kind: RawKind::Final(SegmentKind::PlainText),
            text: text.to_string(),
            extra: None,
            span,
        }
    }

    /// Converts an already-final segment; candidates are left to the resolver.
    pub fn into_final(self) -> Result<Segment, Self> {
        match self.kind {
            RawKind::Final(kind) => Ok(Segment::new(kind, self.text, self.extra, self.span)),
            _ => Err(self),
        }
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ZERO_WIDTH_SPACE
}

/// Tokenizes the whole of `content`.
pub fn tokenize(content: &str) -> Vec<RawSegment> {
    tokenize_bounded(content, usize::MAX)
}

/// Tokenizes at most `max_len` bytes of `content` (rounded down to a char
/// boundary). The remainder is kept verbatim as one trailing plain-text segment.
pub fn tokenize_bounded(content: &str, max_len: usize) -> Vec<RawSegment> {
    let cut = floor_char_boundary(content, max_len);
    let (head, tail) = content.split_at(cut);
    let mut out = scan(head);
    if !tail.is_empty() {
        log::debug!(
            "content of {} bytes exceeds limit of {max_len}; {} bytes left unscanned",
            content.len(),
            tail.len()
        );
        out.push(RawSegment::plain(tail, Span::new(cut, content.len())));
    }
    log::trace!(
        "tokenized {} bytes into {} segments",
        content.len(),
        out.len()
    );
    out
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    let mut i = index.min(s.len());
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn flush_text(out: &mut Vec<RawSegment>, content: &str, start: usize, end: usize) {
    if end > start {
        out.push(RawSegment::plain(&content[start..end], Span::new(start, end)));
    }
}

fn scan(content: &str) -> Vec<RawSegment> {
    let mut cur = Cursor::new(content, 0);
    let mut out = vec![];
    let mut text_start = cur.pos();

    while let Some(c) = cur.peek() {
        if c.is_whitespace() {
            let start = cur.pos();
            cur.bump_while(char::is_whitespace);
            if content[start..cur.pos()].contains('\n') {
                flush_text(&mut out, content, text_start, start);
                flush_text(&mut out, content, start, cur.pos());
                text_start = cur.pos();
            }
            continue;
        }
        if c == ZERO_WIDTH_SPACE {
            cur.bump();
            continue;
        }

        let word_end = cur.pos() + matchers::run_len(cur.rest(), |c| !is_separator(c));
        scan_word(content, &mut cur, word_end, &mut out, &mut text_start);
    }

    flush_text(&mut out, content, text_start, cur.pos());
    out
}

/// Emits the tokens of the word ending at `word_end`. Text between them stays
/// pending from `text_start`.
fn scan_word(
    content: &str,
    cur: &mut Cursor<'_>,
    word_end: usize,
    out: &mut Vec<RawSegment>,
    text_start: &mut usize,
) {
    let mut at_token_start = true;
    while cur.pos() < word_end {
        let rest = &content[cur.pos()..word_end];
        if at_token_start && rest.starts_with(Punctuation::is_opener) {
            cur.bump();
            continue;
        }

        let Some(m) = match_at(rest, at_token_start) else {
            let first = rest.chars().next().map_or(rest.len(), char::len_utf8);
            let skip = rest[first..]
                .find(Shortcode::DELIM)
                .map_or(rest.len(), |i| first + i);
            cur.bump_n(skip);
            at_token_start = false;
            continue;
        };

        let start = cur.pos();
        let extra_len = Punctuation::trailing_run(&rest[m.len..]);
        flush_text(out, content, *text_start, start);
        out.push(RawSegment {
            kind: m.kind,
            text: rest[..m.len].to_string(),
            extra: (extra_len > 0).then(|| rest[m.len..m.len + extra_len].to_string()),
            span: Span::new(start, start + m.len + extra_len),
        });
        cur.bump_n(m.len + extra_len);
        *text_start = cur.pos();
        at_token_start = true;
    }
}

/// The token at the start of `rest`, trying every matcher at a token start
/// and only the emoji matcher at a `:` inside a word.
fn match_at(rest: &str, at_token_start: bool) -> Option<Match> {
    let window = &rest[..floor_char_boundary(rest, MAX_TOKEN_LEN)];
    let capped = window.len() < rest.len();
    let found = if at_token_start {
        matchers::best_match(window)
    } else {
        matchers::emoji(window)
    };
    match found {
        Some(m) if !capped || m.len < window.len() => Some(m),
        _ if at_token_start && capped => matchers::inline_data(rest),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::time::{Duration, Instant};

    fn kinds(content: &str) -> Vec<(String, RawKind)> {
        tokenize(content)
            .into_iter()
            .map(|s| (format!("{}{}", s.text, s.extra.unwrap_or_default()), s.kind))
            .collect()
    }

    fn plain() -> RawKind {
        RawKind::Final(SegmentKind::PlainText)
    }

    #[test]
    fn empty_input_has_no_segments() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn plain_text_is_one_segment() {
        assert_eq!(kinds("just some words"), vec![("just some words".into(), plain())]);
    }

    #[test]
    fn hashtag_keeps_trailing_punctuation_as_extra() {
        let segs = tokenize("I love #bitcoin.");
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[1].text, "#bitcoin");
        assert_eq!(segs[1].extra.as_deref(), Some("."));
        assert_eq!(segs[1].span, Span::new(7, 16));
    }

    #[test]
    fn line_breaks_are_separate_segments() {
        assert_eq!(
            kinds("a\n\nb c\nd"),
            vec![
                ("a".into(), plain()),
                ("\n\n".into(), plain()),
                ("b c".into(), plain()),
                ("\n".into(), plain()),
                ("d".into(), plain()),
            ]
        );
    }

    #[test]
    fn openers_before_tokens_stay_text() {
        let segs = tokenize("(see https://example.com)");
        assert_eq!(segs[0].text, "(see ");
        assert_eq!(segs[1].text, "https://example.com");
        assert_eq!(segs[1].extra.as_deref(), Some(")"));
    }

    #[test]
    fn adjacent_emoji_candidates() {
        let segs = tokenize(":a::b:");
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].kind, RawKind::EmojiCandidate { name: "a".into() });
        assert_eq!(segs[1].kind, RawKind::EmojiCandidate { name: "b".into() });
    }

    #[test]
    fn zero_width_space_separates_words() {
        let segs = tokenize("x\u{200B}#tag");
        assert_eq!(segs[0].text, "x\u{200B}");
        assert_eq!(
            segs[1].kind,
            RawKind::Final(SegmentKind::Hashtag { name: "tag".into() })
        );
    }

    #[test]
    fn spans_are_contiguous_and_lossless() {
        let content = "gm #nostr, see https://x.com/a.png\n\n:wave: alice@example.com 555-123-4567!";
        let segs = tokenize(content);
        let mut pos = 0;
        let mut rebuilt = String::new();
        for s in &segs {
            assert_eq!(s.span.start, pos);
            let full = format!("{}{}", s.text, s.extra.clone().unwrap_or_default());
            assert_eq!(&content[s.span.start..s.span.end], full);
            rebuilt.push_str(&full);
            pos = s.span.end;
        }
        assert_eq!(rebuilt, content);
    }

    fn rebuild(segs: &[RawSegment]) -> String {
        segs.iter()
            .map(|s| format!("{}{}", s.text, s.extra.as_deref().unwrap_or_default()))
            .collect()
    }

    #[test]
    fn emoji_inside_a_word() {
        assert_eq!(
            kinds("gm:wave:!"),
            vec![
                ("gm".into(), plain()),
                (":wave:!".into(), RawKind::EmojiCandidate { name: "wave".into() }),
            ]
        );
        assert_eq!(tokenize("gm:wave:!")[1].extra.as_deref(), Some("!"));
    }

    #[rstest]
    #[case("note: ratio 3:2")]
    #[case("12:30")]
    #[case("std::mem")]
    fn colons_without_shortcodes_stay_text(#[case] content: &str) {
        assert_eq!(kinds(content), vec![(content.into(), plain())]);
    }

    #[test]
    fn token_reaching_the_cap_stays_text() {
        let content = format!("#{}", "a".repeat(MAX_TOKEN_LEN));
        assert_eq!(kinds(&content), vec![(content.clone(), plain())]);
    }

    #[test]
    fn inline_data_longer_than_the_cap_is_kept_whole() {
        let content = format!("data:image/png;base64,{}", "A".repeat(MAX_TOKEN_LEN + 4));
        let segs = tokenize(&content);
        assert_eq!(segs.len(), 1);
        assert!(matches!(
            &segs[0].kind,
            RawKind::Final(SegmentKind::InlineImageData { payload }) if payload.len() == MAX_TOKEN_LEN + 4
        ));
    }

    const LONG_INPUT: usize = 64 * 1024;

    #[rstest]
    #[case::glued_hashtags("#a".repeat(LONG_INPUT / 2), Some(LONG_INPUT / 2))]
    #[case::glued_shortcodes(":a:".repeat(LONG_INPUT / 3), Some(LONG_INPUT / 3))]
    #[case::glued_tag_indexes("#[1]".repeat(LONG_INPUT / 4), Some(LONG_INPUT / 4))]
    #[case::unbalanced_parens(format!("https://x.com/{}", ")".repeat(LONG_INPUT)), None)]
    #[case::open_parens(format!("https://x.com/{}", "(".repeat(LONG_INPUT)), None)]
    #[case::colon_run(format!("a{}", ":b".repeat(LONG_INPUT / 2)), None)]
    #[case::dotted_labels("ab.".repeat(LONG_INPUT / 3), None)]
    #[case::phone_like("1-".repeat(LONG_INPUT / 2), None)]
    fn pathological_words_scan_in_linear_time(
        #[case] content: String,
        #[case] segments: Option<usize>,
    ) {
        let started = Instant::now();
        let segs = tokenize(&content);
        let elapsed = started.elapsed();

        assert!(elapsed < Duration::from_secs(5), "took {elapsed:?}");
        assert_eq!(rebuild(&segs), content);
        if let Some(n) = segments {
            assert_eq!(segs.len(), n);
        }
    }

    #[test]
    fn bounded_scan_keeps_tail_verbatim() {
        let segs = tokenize_bounded("#a #b #c", 3);
        assert_eq!(
            segs.last().map(|s| (s.text.as_str(), s.span)),
            Some(("#b #c", Span::new(3, 8)))
        );
        assert!(
            matches!(&segs[0].kind, RawKind::Final(SegmentKind::Hashtag { name }) if name == "a")
        );
    }

    #[test]
    fn bounded_scan_respects_char_boundaries() {
        let segs = tokenize_bounded("héllo", 2);
        let rebuilt: String = segs.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(rebuilt, "héllo");
        assert_eq!(segs[0].text, "h");
    }
}
