use std::cmp::min;
use std::ops::Range;

use crate::rope::{Node, SkipRope};
use crate::utils::str_chars_to_bytes;

/// An iterator over the nodes of the list, in text order.
pub(crate) struct NodeIter<'a>(Option<&'a Node>);

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        let prev = self.0;
        if let Some(n) = self.0 {
            *self = NodeIter(unsafe { n.first_next().node.as_ref() });
        }
        prev
    }
}

/// A content iterator walks the strings in the rope, yielding one
/// `(substring, char_len)` pair per node.
pub struct ContentIter<'a> {
    next: Option<&'a Node>,
}

impl<'a> ContentIter<'a> {
    pub fn substrings(self) -> Substrings<'a> {
        Substrings(self)
    }

    pub fn chars(self) -> Chars<'a> {
        self.into()
    }
}

impl<'a> Iterator for ContentIter<'a> {
    type Item = (&'a str, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.next?;
        self.next = unsafe { n.first_next().node.as_ref() };
        Some((n.as_str(), n.num_chars()))
    }
}

/// Iterator over the substrings in some content. This is just a hand-written
/// .map(|(s, len)| s) so a rope iterator can be embedded in other iterators
/// without naming closure types.
pub struct Substrings<'a, I: Iterator<Item = (&'a str, usize)> = ContentIter<'a>>(I);

impl<'a, I: Iterator<Item = (&'a str, usize)>> Substrings<'a, I> {
    /// Collect the visited content into a string.
    pub fn into_string(self) -> String {
        self.collect::<String>()
    }
}

impl<'a, I: Iterator<Item = (&'a str, usize)>> Iterator for Substrings<'a, I> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(s, _)| s)
    }
}

/// Iterator over the individual characters in a rope (or rope slice).
pub struct Chars<'a, I: Iterator<Item = (&'a str, usize)> = ContentIter<'a>> {
    inner: I,
    current: std::str::Chars<'a>,
}

impl<'a, I: Iterator<Item = (&'a str, usize)>> From<I> for Chars<'a, I> {
    fn from(inner: I) -> Self {
        Self { inner, current: "".chars() }
    }
}

impl<'a, I: Iterator<Item = (&'a str, usize)>> Iterator for Chars<'a, I> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        self.current.next().or_else(|| {
            self.current = self.inner.next()?.0.chars();
            let next = self.current.next();
            // None of the items returned by the inner iterator are empty.
            debug_assert!(next.is_some());
            next
        })
    }
}

/// Iterate over a sub-range of the rope.
pub struct SliceIter<'a> {
    inner: ContentIter<'a>,
    skip: usize,
    take_len: usize,
}

pub type SubstringsInRange<'a> = Substrings<'a, SliceIter<'a>>;
pub type CharsInRange<'a> = Chars<'a, SliceIter<'a>>;

impl<'a> SliceIter<'a> {
    pub fn substrings(self) -> SubstringsInRange<'a> {
        Substrings(self)
    }

    pub fn chars(self) -> CharsInRange<'a> {
        self.into()
    }
}

impl<'a> Iterator for SliceIter<'a> {
    type Item = (&'a str, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.take_len == 0 {
            return None;
        }

        self.inner.next().map(|(mut s, mut char_len)| {
            if self.skip > 0 {
                let byte = str_chars_to_bytes(s, self.skip);
                assert!(byte < s.len());

                s = &s[byte..];
                char_len -= self.skip;
                self.skip = 0;
            }

            if self.take_len < char_len {
                let byte = str_chars_to_bytes(s, self.take_len);
                s = &s[0..byte];
                char_len = self.take_len;
            }

            self.take_len -= char_len;

            (s, char_len)
        })
    }
}

impl SkipRope {
    pub(crate) fn node_iter(&self) -> NodeIter {
        NodeIter(unsafe { self.heads[0].node.as_ref() })
    }

    /// Iterate over the rope, visiting each substring in [`str`] chunks.
    /// Whenever possible this is the best way to read the contents of a rope
    /// back, because it copies nothing and allocates nothing.
    ///
    /// ## Stability warning
    ///
    /// The iterator always returns all the characters in document order, but
    /// how they are grouped into chunks depends on internal details. Don't
    /// depend on the specific chunking.
    ///
    /// # Example
    ///
    /// ```
    /// # use skiprope::*;
    /// let rope = SkipRope::from("oh hai");
    /// let mut string = String::new();
    /// for str in rope.substrings() {
    ///     string.push_str(str);
    /// }
    /// assert_eq!(string, "oh hai");
    /// ```
    pub fn substrings(&self) -> Substrings<'_> {
        self.substrings_with_len().substrings()
    }

    /// Like [`substrings`](Self::substrings), but each item also carries its
    /// length in unicode characters. The lengths are already known, so this
    /// saves the caller a recount.
    ///
    /// # Example
    ///
    /// ```
    /// # use skiprope::*;
    /// let rope = SkipRope::from("oh hai");
    /// let mut string = String::new();
    /// for (str, char_len) in rope.substrings_with_len() {
    ///     assert_eq!(str.chars().count(), char_len);
    ///     string.push_str(str);
    /// }
    /// assert_eq!(string, "oh hai");
    /// ```
    pub fn substrings_with_len(&self) -> ContentIter {
        ContentIter { next: unsafe { self.heads[0].node.as_ref() } }
    }

    /// Get an iterator over all characters in the rope.
    ///
    /// In most cases this is less efficient than iterating chunk-at-a-time
    /// with [`substrings`](Self::substrings).
    ///
    /// # Example
    ///
    /// ```
    /// # use skiprope::*;
    /// let rope = SkipRope::from("oh hai");
    /// assert_eq!("oh hai", rope.chars().collect::<String>());
    /// ```
    pub fn chars(&self) -> Chars {
        self.substrings_with_len().chars()
    }

    /// Iterate through the substrings within the given character range.
    ///
    /// # Example
    ///
    /// ```
    /// # use skiprope::*;
    /// let rope = SkipRope::from("xxxGreetings!xxx");
    /// let mut string = String::new();
    /// for s in rope.slice_substrings(3..rope.len_chars() - 3) {
    ///     string.push_str(s);
    /// }
    /// assert_eq!(string, "Greetings!");
    /// ```
    pub fn slice_substrings(&self, range: Range<usize>) -> SubstringsInRange {
        self.slice_substrings_with_len(range).substrings()
    }

    /// Iterate through `(substring, char_len)` chunks across a character
    /// range in the document. The range is clamped to the rope's length.
    ///
    /// # Example
    ///
    /// ```
    /// # use skiprope::*;
    /// let rope = SkipRope::from("xxxGreetings!xxx");
    /// let string = rope.slice_substrings_with_len(3..13)
    ///     .map(|(str, _len)| str)
    ///     .collect::<String>();
    /// assert_eq!(string, "Greetings!");
    /// ```
    pub fn slice_substrings_with_len(&self, range: Range<usize>) -> SliceIter {
        assert!(range.start <= range.end);
        let end = min(range.end, self.len_chars());
        let start = min(range.start, end);

        let (node, offset) = self.read_cursor_at_char(start);
        SliceIter { inner: ContentIter { next: node }, skip: offset, take_len: end - start }
    }

    /// Iterate through the characters in the rope within the given character
    /// range.
    ///
    /// # Example
    ///
    /// ```
    /// # use skiprope::*;
    /// let rope = SkipRope::from("xxxGreetings!xxx");
    /// assert_eq!("Greetings!",
    ///     rope.slice_chars(3..rope.len_chars() - 3).collect::<String>()
    /// );
    /// ```
    pub fn slice_chars(&self, range: Range<usize>) -> CharsInRange {
        self.slice_substrings_with_len(range).chars()
    }
}
