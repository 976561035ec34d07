//! UTF-8 helpers shared by the rope core and its iterators. Index conversion
//! defers to str_indices, which is much faster than walking char_indices.

/// Byte length of the codepoint whose lead byte is `byte`. Inputs come from
/// `str` data, so only classical 1 to 4 byte lead bytes can show up here.
#[inline]
pub(crate) fn codepoint_size(byte: u8) -> usize {
    if byte <= 0x7f {
        1
    } else if byte < 0xc0 {
        debug_assert!(false, "continuation byte {byte:#04x} used as a lead byte");
        1
    } else if byte <= 0xdf {
        2
    } else if byte <= 0xef {
        3
    } else {
        4
    }
}

/// The byte offset after `char_pos` characters of `s`. Positions past the end
/// map to the end.
#[inline]
pub(crate) fn str_chars_to_bytes(s: &str, char_pos: usize) -> usize {
    str_indices::chars::to_byte_idx(s, char_pos)
}

#[inline]
pub(crate) fn count_chars(s: &str) -> usize {
    str_indices::chars::count(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codepoint_sizes() {
        assert_eq!(codepoint_size(b'a'), 1);
        assert_eq!(codepoint_size("é".as_bytes()[0]), 2);
        assert_eq!(codepoint_size("€".as_bytes()[0]), 3);
        assert_eq!(codepoint_size("😘".as_bytes()[0]), 4);
    }

    #[test]
    fn char_byte_conversion() {
        let s = "κό𝕐𝕆😘σμε";
        for (chars, (bytes, _)) in s.char_indices().enumerate() {
            assert_eq!(str_chars_to_bytes(s, chars), bytes);
        }
        assert_eq!(str_chars_to_bytes(s, s.chars().count()), s.len());
        assert_eq!(count_chars(s), s.chars().count());
    }
}
