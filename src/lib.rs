//! # SkipRope
//!
//! A small, fast rope library built on a skip list with character-indexed
//! spans.
//!
//! This crate enables fast in-memory string editing, where an edit may insert
//! or delete text anywhere in the string. Unlike editing a [`String`]
//! directly, a rope avoids moving everything after the edit point on every
//! change. All editing operations are O(log n) in the size of the string.
//!
//! ## Example
//!
//! ```
//! use skiprope::SkipRope;
//!
//! let mut rope = SkipRope::from("Some large text document");
//! rope.insert(5, "really "); // "Some really large text document"
//! rope.remove(5..12);        // back to "Some large text document"
//! assert_eq!(rope, "Some large text document");
//! ```
//!
//! ## Positions are character counts
//!
//! Every position taken or returned by this library counts unicode
//! characters (codepoints), not bytes and not grapheme clusters. Counting
//! codepoints is stable across time and portable across languages, which is
//! why collaborative editors have largely standardized on it. The polar bear
//! ("🐻‍❄️") renders as one glyph but contains 4 codepoints in 13 UTF-8 bytes:
//!
//! ```
//! # use skiprope::SkipRope;
//! let mut rope = SkipRope::from("🐻‍❄️");
//! assert_eq!(rope.len_bytes(), 13);
//! assert_eq!(rope.len_chars(), 4);
//!
//! rope.remove(1..4); // Remove "polar" from our polar bear.
//! assert_eq!(rope, "🐻");
//! ```
//!
//! ## Determinism
//!
//! Node heights are the only source of randomness. A rope created with
//! [`SkipRope::new_with_seed`] replays the exact same internal structure for
//! the same sequence of edits, which makes bugs reproducible.

mod iter;
mod rope;
mod utils;

pub use crate::iter::{Chars, CharsInRange, ContentIter, SliceIter, Substrings, SubstringsInRange};
pub use crate::rope::SkipRope;
