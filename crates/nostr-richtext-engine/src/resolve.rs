//! # Tag resolution
//!
//! Cross-references tokenizer output with the event's tags in a single pass:
//!
//! - `:name:` candidates become emoji only when an `emoji` tag names them,
//!   otherwise they fall back to plain text with their delimiters.
//! - `#[n]` references become mentions of the `p`, `e` or `a` tag at index `n`.
//! - Links whose declared mime type is `image/*` become image references.
//! - Image metadata, hashtag icons and the link list are collected on the way.

use std::collections::{BTreeMap, BTreeSet};

use crate::document::ImageMeta;
use crate::segment::{MentionKind, Segment, SegmentKind};
use crate::tokenize::kinds::InlineData;
use crate::tokenize::{RawKind, RawSegment};

/// A tag is a name followed by positional values: `["p", "<hex>", "<relay>"]`.
pub type Tag = Vec<String>;

const EMOJI_TAG: &str = "emoji";
const IMETA_TAG: &str = "imeta";

/// Icons the client draws next to well-known hashtags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HashtagIcon {
    Bitcoin,
    Cashu,
    Coffee,
    Footstr,
    Grownostr,
    Lightning,
    Mate,
    Nostr,
    Skull,
}

impl HashtagIcon {
    const REGISTRY: [(&'static str, HashtagIcon); 16] = [
        ("bitcoin", HashtagIcon::Bitcoin),
        ("btc", HashtagIcon::Bitcoin),
        ("cashu", HashtagIcon::Cashu),
        ("coffeechain", HashtagIcon::Coffee),
        ("coffeestr", HashtagIcon::Coffee),
        ("footstr", HashtagIcon::Footstr),
        ("grownostr", HashtagIcon::Grownostr),
        ("lightning", HashtagIcon::Lightning),
        ("lightningnetwork", HashtagIcon::Lightning),
        ("zap", HashtagIcon::Lightning),
        ("zaps", HashtagIcon::Lightning),
        ("mate", HashtagIcon::Mate),
        ("matestr", HashtagIcon::Mate),
        ("nostr", HashtagIcon::Nostr),
        ("plebchain", HashtagIcon::Nostr),
        ("skullofsatoshi", HashtagIcon::Skull),
    ];

    /// Case-insensitive registry lookup.
    pub fn for_hashtag(name: &str) -> Option<HashtagIcon> {
        let lower = name.to_lowercase();
        Self::REGISTRY
            .iter()
            .find(|(tag, _)| *tag == lower)
            .map(|(_, icon)| *icon)
    }

    pub fn id(self) -> &'static str {
        match self {
            HashtagIcon::Bitcoin => "bitcoin",
            HashtagIcon::Cashu => "cashu",
            HashtagIcon::Coffee => "coffee",
            HashtagIcon::Footstr => "footstr",
            HashtagIcon::Grownostr => "grownostr",
            HashtagIcon::Lightning => "lightning",
            HashtagIcon::Mate => "mate",
            HashtagIcon::Nostr => "nostr",
            HashtagIcon::Skull => "skull",
        }
    }
}

/// What the resolver reads out of the tag list up front.
#[derive(Debug, Default)]
pub struct TagContext<'a> {
    tags: &'a [Tag],
    emojis: BTreeMap<String, String>,
    imeta: BTreeMap<String, ImageMeta>,
}

impl<'a> TagContext<'a> {
    pub fn new(tags: &'a [Tag]) -> Self {
        let mut emojis = BTreeMap::new();
        let mut imeta = BTreeMap::new();
        for tag in tags {
            match tag.first().map(String::as_str) {
                Some(EMOJI_TAG) => {
                    if let [_, name, url, ..] = tag.as_slice() {
                        // later tags override earlier ones
                        emojis.insert(name.clone(), url.clone());
                    }
                }
                Some(IMETA_TAG) => {
                    if let Some(meta) = parse_imeta(&tag[1..]) {
                        imeta.insert(meta.url.clone(), meta);
                    }
                }
                _ => {}
            }
        }
        Self {
            tags,
            emojis,
            imeta,
        }
    }

    pub fn emoji_url(&self, name: &str) -> Option<&str> {
        self.emojis.get(name).map(String::as_str)
    }

    pub fn emojis(&self) -> &BTreeMap<String, String> {
        &self.emojis
    }

    pub fn imeta(&self, url: &str) -> Option<&ImageMeta> {
        self.imeta.get(url)
    }

    /// Resolves `#[index]` against the positional tag list.
    pub fn tag_index_mention(&self, index: usize) -> Option<SegmentKind> {
        let tag = self.tags.get(index)?;
        let [name, value, ..] = tag.as_slice() else {
            return None;
        };
        let kind = match name.as_str() {
            "p" => MentionKind::User,
            "e" => MentionKind::Event,
            "a" => MentionKind::Address,
            _ => return None,
        };
        Some(SegmentKind::Mention {
            kind,
            canonical_id: value.clone(),
        })
    }
}

/// Reads `"key value"` entries of one `imeta` tag. Entries without a `url`
/// describe nothing we can key on and are dropped.
fn parse_imeta(entries: &[String]) -> Option<ImageMeta> {
    let mut meta = ImageMeta::default();
    for entry in entries {
        let Some((key, value)) = entry.split_once(' ') else {
            continue;
        };
        apply_meta_field(&mut meta, key, value.trim());
    }
    (!meta.url.is_empty()).then_some(meta)
}

fn apply_meta_field(meta: &mut ImageMeta, key: &str, value: &str) {
    let value = value.to_string();
    match key {
        "url" => meta.url = value,
        "m" => meta.mime_type = Some(value),
        "dim" => meta.dim = Some(value),
        "blurhash" => meta.blurhash = Some(value),
        "alt" => meta.alt = Some(value),
        "x" => meta.hash = Some(value),
        "content-warning" => meta.content_warning = Some(value),
        _ => {}
    }
}

/// Metadata carried in a URL fragment: `https://x/a.jpg#m=image/jpeg&dim=10x20`.
fn fragment_meta(link: &str) -> Option<ImageMeta> {
    let parsed = url::Url::parse(link).ok()?;
    let fragment = parsed.fragment()?;
    let mut meta = ImageMeta::new(link);
    let mut any = false;
    for (key, value) in url::form_urlencoded::parse(fragment.as_bytes()) {
        if key == "url" {
            continue;
        }
        apply_meta_field(&mut meta, &key, &value);
        any = true;
    }
    any.then_some(meta)
}

/// `data:image/png;base64,...` → `image/png`.
fn data_uri_mime(uri: &str) -> Option<String> {
    let rest = uri.get(InlineData::PREFIX.len()..)?;
    let (subtype, _) = rest.split_once(';')?;
    Some(format!("image/{}", subtype.to_ascii_lowercase()))
}

/// Everything the resolver produces.
#[derive(Debug, Default)]
pub struct Resolved {
    pub segments: Vec<Segment>,
    pub emojis: BTreeMap<String, String>,
    pub images: BTreeMap<String, ImageMeta>,
    pub hashtag_icons: BTreeMap<String, HashtagIcon>,
    pub urls: Vec<String>,
}

/// Resolves raw segments against `tags`. `callback_uri` is copied onto every
/// image's metadata.
pub fn resolve(raw: Vec<RawSegment>, tags: &[Tag], callback_uri: Option<&str>) -> Resolved {
    let ctx = TagContext::new(tags);
    let mut out = Resolved {
        emojis: ctx.emojis().clone(),
        ..Resolved::default()
    };
    let mut seen_urls = BTreeSet::new();

    for raw_segment in raw {
        let segment = match raw_segment.into_final() {
            Ok(segment) => segment,
            Err(candidate) => resolve_candidate(&ctx, candidate),
        };
        let segment = upgrade_declared_image(&ctx, segment);

        match &segment.kind {
            SegmentKind::Hashtag { name } => {
                if let Some(icon) = HashtagIcon::for_hashtag(name) {
                    out.hashtag_icons.insert(name.to_lowercase(), icon);
                }
            }
            SegmentKind::Url { .. } => {
                if seen_urls.insert(segment.text.clone()) {
                    out.urls.push(segment.text.clone());
                }
            }
            SegmentKind::ImageReference { url } => {
                let meta = image_meta(&ctx, url, None, callback_uri);
                out.images.entry(url.clone()).or_insert(meta);
            }
            SegmentKind::InlineImageData { .. } => {
                let meta = image_meta(
                    &ctx,
                    &segment.text,
                    data_uri_mime(&segment.text),
                    callback_uri,
                );
                out.images.entry(segment.text.clone()).or_insert(meta);
            }
            SegmentKind::PlainText
            | SegmentKind::Mention { .. }
            | SegmentKind::Email
            | SegmentKind::Phone
            | SegmentKind::LightningInvoice
            | SegmentKind::LightningWithdrawRequest
            | SegmentKind::CashuToken
            | SegmentKind::EmojiShortcode { .. }
            | SegmentKind::SecretBlock => {}
        }

        push_merging_text(&mut out.segments, segment);
    }
    out
}

fn resolve_candidate(ctx: &TagContext<'_>, raw: RawSegment) -> Segment {
    let kind = match &raw.kind {
        RawKind::EmojiCandidate { name } => {
            ctx.emoji_url(name)
                .map(|url| SegmentKind::EmojiShortcode {
                    name: name.clone(),
                    url: url.to_string(),
                })
        }
        RawKind::TagIndex { index } => ctx.tag_index_mention(*index),
        RawKind::Final(kind) => Some(kind.clone()),
    };
    match kind {
        Some(kind) => Segment::new(kind, raw.text, raw.extra, raw.span),
        None => {
            let text = format!("{}{}", raw.text, raw.extra.unwrap_or_default());
            Segment::plain(text, raw.span)
        }
    }
}

/// A link the tags (or its own fragment) declare as an image renders as one.
fn upgrade_declared_image(ctx: &TagContext<'_>, segment: Segment) -> Segment {
    if !matches!(segment.kind, SegmentKind::Url { has_scheme: true }) {
        return segment;
    }
    let declared = ctx
        .imeta(&segment.text)
        .is_some_and(ImageMeta::is_image_mime)
        || fragment_meta(&segment.text).is_some_and(|m| m.is_image_mime());
    if !declared {
        return segment;
    }
    Segment {
        kind: SegmentKind::ImageReference {
            url: segment.text.clone(),
        },
        ..segment
    }
}

fn image_meta(
    ctx: &TagContext<'_>,
    key: &str,
    mime_type: Option<String>,
    callback_uri: Option<&str>,
) -> ImageMeta {
    let mut meta = ctx
        .imeta(key)
        .cloned()
        .unwrap_or_else(|| ImageMeta::new(key));
    if let Some(from_fragment) = fragment_meta(key) {
        meta.merge_missing(from_fragment);
    }
    meta.merge_missing(ImageMeta {
        mime_type,
        callback_uri: callback_uri.map(str::to_string),
        ..ImageMeta::default()
    });
    meta
}

/// Appends `segment`, folding it into a preceding plain-text segment when
/// neither is a line break.
fn push_merging_text(segments: &mut Vec<Segment>, segment: Segment) {
    let mergeable = |a: &Segment| a.is_plain() && !a.text.contains('\n');
    if let Some(last) = segments.last_mut() {
        if mergeable(last) && mergeable(&segment) && last.span.end == segment.span.start {
            last.text.push_str(&segment.text);
            last.span.end = segment.span.end;
            return;
        }
    }
    segments.push(segment);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::tokenize;
    use pretty_assertions::assert_eq;

    fn tags(raw: &[&[&str]]) -> Vec<Tag> {
        raw.iter()
            .map(|t| t.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    fn resolve_str(content: &str, tags: &[Tag]) -> Resolved {
        resolve(tokenize(content), tags, None)
    }

    #[test]
    fn emoji_resolves_with_tag() {
        let tags = tags(&[&["emoji", "smile", "https://x/s.png"]]);
        let resolved = resolve_str("hello :smile: world", &tags);
        assert_eq!(resolved.segments.len(), 3);
        assert_eq!(
            resolved.segments[1].kind,
            SegmentKind::EmojiShortcode {
                name: "smile".into(),
                url: "https://x/s.png".into()
            }
        );
        assert_eq!(
            resolved.emojis.get("smile").map(String::as_str),
            Some("https://x/s.png")
        );
    }

    #[test]
    fn unresolved_emoji_stays_plain_text() {
        let resolved = resolve_str("hello :smile: world", &[]);
        assert_eq!(resolved.segments.len(), 1);
        assert_eq!(resolved.segments[0].kind, SegmentKind::PlainText);
        assert_eq!(resolved.segments[0].text, "hello :smile: world");
    }

    #[test]
    fn last_emoji_tag_wins() {
        let tags = tags(&[
            &["emoji", "wave", "https://x/1.png"],
            &["emoji", "wave", "https://x/2.png"],
        ]);
        let ctx = TagContext::new(&tags);
        assert_eq!(ctx.emoji_url("wave"), Some("https://x/2.png"));
    }

    #[test]
    fn tag_index_mentions() {
        let tags = tags(&[
            &["p", "aa11"],
            &["e", "bb22", "wss://relay"],
            &["a", "30023:cc33:slug"],
            &["t", "nostr"],
        ]);
        let resolved = resolve_str("#[0] #[1] #[2] #[3] #[9]", &tags);
        let kinds: Vec<_> = resolved
            .segments
            .iter()
            .filter(|s| !s.is_plain())
            .map(|s| s.kind.clone())
            .collect();
        assert_eq!(
            kinds,
            vec![
                SegmentKind::Mention {
                    kind: MentionKind::User,
                    canonical_id: "aa11".into()
                },
                SegmentKind::Mention {
                    kind: MentionKind::Event,
                    canonical_id: "bb22".into()
                },
                SegmentKind::Mention {
                    kind: MentionKind::Address,
                    canonical_id: "30023:cc33:slug".into()
                },
            ]
        );
        assert!(resolved.segments.last().unwrap().text.ends_with("#[3] #[9]"));
    }

    #[test]
    fn imeta_upgrades_declared_image() {
        let tags = tags(&[&[
            "imeta",
            "url https://cdn.example/abc",
            "m image/jpeg",
            "dim 640x480",
            "alt a cat",
        ]]);
        let resolved = resolve_str("look https://cdn.example/abc", &tags);
        assert_eq!(
            resolved.segments[1].kind,
            SegmentKind::ImageReference {
                url: "https://cdn.example/abc".into()
            }
        );
        let meta = &resolved.images["https://cdn.example/abc"];
        assert_eq!(meta.dim.as_deref(), Some("640x480"));
        assert_eq!(meta.alt.as_deref(), Some("a cat"));
        assert!(resolved.urls.is_empty());
    }

    #[test]
    fn fragment_metadata_is_read() {
        let link = "https://x.example/v#m=image%2Fpng&dim=1x2";
        let resolved = resolve(tokenize(link), &[], Some("nostr:note1abc"));
        let meta = &resolved.images[link];
        assert_eq!(meta.mime_type.as_deref(), Some("image/png"));
        assert_eq!(meta.dim.as_deref(), Some("1x2"));
        assert_eq!(meta.callback_uri.as_deref(), Some("nostr:note1abc"));
    }

    #[test]
    fn data_uri_contributes_mime() {
        let uri = "data:image/gif;base64,R0lGODlhAQABAAAAACw=";
        let resolved = resolve_str(uri, &[]);
        assert_eq!(
            resolved.images[uri].mime_type.as_deref(),
            Some("image/gif")
        );
    }

    #[test]
    fn urls_are_deduplicated_in_order() {
        let resolved = resolve_str("b.com https://a.com b.com https://a.com", &[]);
        assert_eq!(resolved.urls, vec!["b.com", "https://a.com"]);
    }

    #[test]
    fn hashtag_icons_are_case_insensitive() {
        let resolved = resolve_str("#Bitcoin #zap #random", &[]);
        assert_eq!(
            resolved.hashtag_icons.into_iter().collect::<Vec<_>>(),
            vec![
                ("bitcoin".to_string(), HashtagIcon::Bitcoin),
                ("zap".to_string(), HashtagIcon::Lightning),
            ]
        );
    }
}
