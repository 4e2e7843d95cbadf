//! # Token Kinds
//!
//! Kind-specific types that own their lexical delimiters.
//!
//! ## Types
//!
//! - **`Entity`**: `nostr:` / `@` prefixes and the bech32 prefixes of each entity
//! - **`Hashtag`**, **`TagIndex`**: `#name` and the legacy `#[n]`
//! - **`Shortcode`**: `:name:`
//! - **`Link`**, **`InlineData`**: schemes, image extensions, `data:image/...;base64,`
//! - **`Lightning`**, **`Cashu`**: payment prefixes
//! - **`Selectors`**: the variation-selector blocks hidden text is coded in
//! - **`Punctuation`**: the characters split off after a token, and openers before one
//!
//! ## Design Principle
//!
//! All delimiter constants live here, not scattered in matcher code.
//! The matchers call these constants; they never hardcode `npub1` or `#[`.

pub mod emoji;
pub mod entity;
pub mod hashtag;
pub mod link;
pub mod payment;
pub mod punctuation;
pub mod selectors;

pub use emoji::Shortcode;
pub use entity::Entity;
pub use hashtag::{Hashtag, TagIndex};
pub use link::{InlineData, Link};
pub use payment::{Cashu, Lightning};
pub use punctuation::Punctuation;
pub use selectors::Selectors;
