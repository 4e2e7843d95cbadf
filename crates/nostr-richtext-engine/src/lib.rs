pub mod cache;
pub mod document;
pub mod engine;
pub mod gallery;
pub mod paragraph;
pub mod resolve;
pub mod secret;
pub mod segment;
pub mod snapshot;
pub mod tokenize;

// Re-export key types for easier usage
pub use cache::ParseCache;
pub use document::{ImageMeta, ParsedDocument};
pub use engine::{EngineOptions, RichTextEngine, looks_like_markdown, parse_uncached};
pub use gallery::{
    Gallery, GalleryLayout, ImageRunAnalysis, InlinePiece, RenderUnit, group_for_gallery,
};
pub use paragraph::{Paragraph, assemble};
pub use resolve::{HashtagIcon, Tag, resolve};
pub use secret::{EmojiCoder, RevealSlot, SecretDecodeError};
pub use segment::{MentionKind, Segment, SegmentKind, Span};
pub use tokenize::{RawKind, RawSegment, tokenize};
