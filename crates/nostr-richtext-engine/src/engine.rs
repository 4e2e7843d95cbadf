//! # Engine facade
//!
//! [`RichTextEngine`] ties the pipeline stages together behind a cache:
//!
//! ```text
//! content + tags → tokenize → resolve → assemble → group_for_gallery → ParsedDocument
//! ```
//!
//! The engine holds no global state. Create one per process (or per test) and
//! share it by reference or `Arc`.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::cache::ParseCache;
use crate::document::ParsedDocument;
use crate::gallery::{RenderUnit, group_for_gallery};
use crate::paragraph::assemble;
use crate::resolve::{Tag, resolve};
use crate::secret::{self, RevealSlot};
use crate::segment::{Segment, SegmentKind};
use crate::tokenize::tokenize_bounded;

/// Engine tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Number of parsed documents kept in the cache.
    pub cache_capacity: NonZeroUsize,
    /// How deeply hidden content may nest; 1 reveals only top-level secrets.
    pub max_secret_depth: usize,
    /// Bytes scanned per post; the rest is kept as plain text.
    pub max_content_len: usize,
}

impl EngineOptions {
    pub const DEFAULT_MAX_SECRET_DEPTH: usize = 1;
    pub const DEFAULT_MAX_CONTENT_LEN: usize = 256 * 1024;
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            cache_capacity: ParseCache::DEFAULT_CAPACITY,
            max_secret_depth: Self::DEFAULT_MAX_SECRET_DEPTH,
            max_content_len: Self::DEFAULT_MAX_CONTENT_LEN,
        }
    }
}

/// Runs the whole pipeline without touching any cache.
pub fn parse_uncached(
    content: &str,
    tags: &[Tag],
    callback_uri: Option<&str>,
    max_content_len: usize,
) -> ParsedDocument {
    let resolved = resolve(
        tokenize_bounded(content, max_content_len),
        tags,
        callback_uri,
    );
    let paragraphs = assemble(resolved.segments);
    let render_plan = group_for_gallery(&paragraphs);
    ParsedDocument {
        paragraphs,
        render_plan,
        emojis: resolved.emojis,
        images: resolved.images,
        hashtag_icons: resolved.hashtag_icons,
        urls: resolved.urls,
    }
}

pub struct RichTextEngine {
    options: EngineOptions,
    cache: ParseCache,
}

impl RichTextEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            cache: ParseCache::new(options.cache_capacity),
            options,
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn cache(&self) -> &ParseCache {
        &self.cache
    }

    /// Parses `content` with its event `tags`, reusing a cached result when
    /// one exists.
    ///
    /// `callback_uri` is attached to image metadata. It is not part of the
    /// cache key: when given, images of the cached document are copied with it.
    pub fn parse(
        &self,
        content: &str,
        tags: &[Tag],
        callback_uri: Option<&str>,
    ) -> Arc<ParsedDocument> {
        let doc = self.cache.get_or_compute(content, tags, || {
            parse_uncached(content, tags, None, self.options.max_content_len)
        });
        with_callback(doc, callback_uri)
    }

    /// The render plan for `content`, from the cached document.
    pub fn render_plan(&self, content: &str, tags: &[Tag]) -> Vec<RenderUnit> {
        self.parse(content, tags, None).render_plan().to_vec()
    }

    /// Decodes a hidden payload and parses what it hides with the parent's
    /// tags. `depth` is 1 for a secret found in a top-level post.
    pub fn decode_secret(&self, payload: &str, tags: &[Tag], depth: usize) -> Arc<ParsedDocument> {
        secret::decode_secret(payload, depth, self.options.max_secret_depth, |text| {
            self.parse(text, tags, None)
        })
    }

    /// Reveals a [`SegmentKind::SecretBlock`]; other segments have nothing hidden.
    pub fn reveal(
        &self,
        segment: &Segment,
        tags: &[Tag],
        depth: usize,
    ) -> Option<Arc<ParsedDocument>> {
        match segment.kind {
            SegmentKind::SecretBlock => Some(self.decode_secret(&segment.text, tags, depth)),
            _ => None,
        }
    }

    /// Decodes on a worker thread and publishes into `slot`. Dropping the
    /// handle without joining is fine; the slot is simply filled later.
    pub fn spawn_reveal(
        self: &Arc<Self>,
        payload: String,
        tags: Vec<Tag>,
        depth: usize,
        slot: Arc<RevealSlot>,
    ) -> JoinHandle<()> {
        let engine = Arc::clone(self);
        thread::spawn(move || {
            let doc = engine.decode_secret(&payload, &tags, depth);
            if !slot.publish(doc) {
                log::debug!("reveal slot already published; dropping result");
            }
        })
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

impl Default for RichTextEngine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

fn with_callback(doc: Arc<ParsedDocument>, callback_uri: Option<&str>) -> Arc<ParsedDocument> {
    let Some(callback_uri) = callback_uri else {
        return doc;
    };
    if doc.images.is_empty() {
        return doc;
    }
    let mut copy = ParsedDocument::clone(&doc);
    copy.images = doc
        .images
        .iter()
        .map(|(key, meta)| {
            let mut meta = meta.clone();
            meta.callback_uri = Some(callback_uri.to_string());
            (key.clone(), meta)
        })
        .collect::<BTreeMap<_, _>>();
    Arc::new(copy)
}

/// Whether `content` reads like markdown and should go to a markdown renderer
/// instead of this engine.
pub fn looks_like_markdown(content: &str) -> bool {
    const PREFIXES: [&str; 2] = ["> ", "# "];
    const MARKERS: [&str; 5] = ["##", "__", "**", "```", "]("];
    PREFIXES.iter().any(|p| content.starts_with(p))
        || MARKERS.iter().any(|m| content.contains(m))
}
