//! Law-style property tests for the rope, checked against a flat String as
//! the reference implementation.

use proptest::prelude::*;
use skiprope::SkipRope;
use std::ops::Range;

const EDIT_CHARS: [char; 12] =
    ['a', 'b', 'c', '1', ' ', '©', '½', 'δ', 'Ϡ', '←', '𐆐', '𐆚'];

fn text_strategy(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(0usize..EDIT_CHARS.len(), 0..max_len)
        .prop_map(|v| v.into_iter().map(|i| EDIT_CHARS[i]).collect())
}

/// A random editing operation, with its position given as a fraction of the
/// document length so it stays valid as the document grows and shrinks.
#[derive(Clone, Debug)]
enum EditOp {
    Insert { pos_pct: f64, content: String },
    Delete { pos_pct: f64, len: usize },
}

fn edit_op_strategy() -> impl Strategy<Value = EditOp> {
    prop_oneof![
        (0.0..=1.0f64, text_strategy(200))
            .prop_map(|(pos_pct, content)| EditOp::Insert { pos_pct, content }),
        (0.0..=1.0f64, 0usize..20)
            .prop_map(|(pos_pct, len)| EditOp::Delete { pos_pct, len }),
    ]
}

fn pct_to_pos(pct: f64, len: usize) -> usize {
    ((pct * len as f64) as usize).min(len)
}

fn char_range_to_byte_range(s: &str, range: Range<usize>) -> Range<usize> {
    let mut iter = s.char_indices().map(|(p, _)| p).skip(range.start).peekable();

    let start = iter.peek().map_or_else(|| s.len(), |&p| p);
    let mut iter = iter.skip(range.end - range.start).peekable();
    let end = iter.peek().map_or_else(|| s.len(), |&p| p);

    start..end
}

proptest! {
    #[test]
    fn insert_empty_string_is_a_noop(
        seed in any::<u64>(),
        base in text_strategy(300),
        pos_pct in 0.0..=1.0f64,
    ) {
        let mut r = SkipRope::new_with_seed(seed);
        r.insert(0, &base);

        let pos = pct_to_pos(pos_pct, r.len_chars());
        r.insert(pos, "");
        r.check();
        prop_assert_eq!(r.to_string(), base);
    }

    #[test]
    fn delete_zero_chars_is_a_noop(
        seed in any::<u64>(),
        base in text_strategy(300),
        pos_pct in 0.0..=1.0f64,
    ) {
        let mut r = SkipRope::new_with_seed(seed);
        r.insert(0, &base);

        let pos = pct_to_pos(pos_pct, r.len_chars());
        r.remove(pos..pos);
        r.check();
        prop_assert_eq!(r.to_string(), base);
    }

    #[test]
    fn insert_then_delete_restores(
        seed in any::<u64>(),
        base in text_strategy(300),
        text in text_strategy(300),
        pos_pct in 0.0..=1.0f64,
    ) {
        let mut r = SkipRope::new_with_seed(seed);
        r.insert(0, &base);

        let pos = pct_to_pos(pos_pct, r.len_chars());
        r.insert(pos, &text);
        r.check();

        r.remove(pos..pos + text.chars().count());
        r.check();
        prop_assert_eq!(r.to_string(), base);
    }

    #[test]
    fn split_inserts_are_equivalent(
        seed in any::<u64>(),
        base in text_strategy(100),
        text in text_strategy(300),
        pos_pct in 0.0..=1.0f64,
        split_pct in 0.0..=1.0f64,
    ) {
        let text_chars = text.chars().count();
        let split_chars = pct_to_pos(split_pct, text_chars);
        let split_byte = text
            .char_indices()
            .nth(split_chars)
            .map_or_else(|| text.len(), |(i, _)| i);
        let (s1, s2) = text.split_at(split_byte);

        let mut whole = SkipRope::new_with_seed(seed);
        whole.insert(0, &base);
        let pos = pct_to_pos(pos_pct, whole.len_chars());
        whole.insert(pos, &text);
        whole.check();

        let mut parts = SkipRope::new_with_seed(seed.wrapping_add(1));
        parts.insert(0, &base);
        parts.insert(pos, s1);
        parts.insert(pos + split_chars, s2);
        parts.check();

        prop_assert_eq!(whole.to_string(), parts.to_string());
        prop_assert!(whole == parts);
    }

    #[test]
    fn matches_a_flat_buffer(
        seed in any::<u64>(),
        ops in prop::collection::vec(edit_op_strategy(), 0..64),
    ) {
        let mut r = SkipRope::new_with_seed(seed);
        let mut s = String::new();

        for op in &ops {
            match op {
                EditOp::Insert { pos_pct, content } => {
                    let len = s.chars().count();
                    let pos = pct_to_pos(*pos_pct, len);

                    r.insert(pos, content);
                    let byte_pos = s
                        .char_indices()
                        .nth(pos)
                        .map_or_else(|| s.len(), |(i, _)| i);
                    s.insert_str(byte_pos, content);
                }
                EditOp::Delete { pos_pct, len } => {
                    let chars = s.chars().count();
                    let pos = pct_to_pos(*pos_pct, chars);
                    let dlen = (*len).min(chars - pos);

                    r.remove(pos..pos + dlen);
                    let byte_range = char_range_to_byte_range(&s, pos..pos + dlen);
                    s.drain(byte_range);
                }
            }

            r.check();
            let flat = r.to_string();
            prop_assert_eq!(&flat, &s);
            prop_assert_eq!(r.len_chars(), s.chars().count());
            prop_assert_eq!(r.len_bytes(), s.len());
        }
    }
}
