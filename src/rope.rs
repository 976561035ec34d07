// A rope (fancy editable string) built on a skip list of small UTF-8 buffers.
// Every forward pointer records how many characters it spans, which turns the
// ordinary skip list into a positional index: finding, inserting or deleting
// text at an arbitrary character offset costs O(log n) in the length of the
// string.
//
// The list is managed through raw pointers and C-style dynamic arrays, with
// each node's forward array allocated inline after its header. Nothing in
// here is thread safe.

use std::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use std::cmp::min;
use std::ops::Range;
use std::{fmt, mem, ptr, str};

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use crate::utils::{codepoint_size, count_chars, str_chars_to_bytes};

/// Number of bytes of string data stored inline in each node. Node contents
/// always hold whole codepoints, so a full node may use slightly less.
pub(crate) const NODE_STR_SIZE: usize = 128;

/// Tallest node the list will ever allocate. 60 levels comfortably index
/// ropes of up to ~2^60 characters.
pub(crate) const MAX_HEIGHT: usize = 60;
const MAX_HEIGHT_U8: u8 = MAX_HEIGHT as u8;

// The head pointer vector starts with room for this many levels and doubles
// whenever a taller node shows up. It never shrinks.
const INITIAL_HEAD_CAPACITY: usize = 10;

#[derive(Copy, Clone, Debug)]
pub(crate) struct SkipEntry {
    /// The successor at this level, or null at the end of the list.
    pub(crate) node: *mut Node,

    /// The number of characters between the start of the owning node (or the
    /// start of the rope, for head entries) and the start of `node`.
    pub(crate) skip_chars: usize,
}

impl SkipEntry {
    fn new() -> Self {
        SkipEntry { node: ptr::null_mut(), skip_chars: 0 }
    }
}

// Each node is allocated as a single block: this fixed-size header followed
// immediately by `height` forward entries. The zero-length `nexts` array
// marks where the entries begin.
#[repr(C)] // Prevent field reordering; nexts must stay last.
pub(crate) struct Node {
    /// The first `num_bytes` of this hold well-formed UTF-8.
    pub(crate) str: [u8; NODE_STR_SIZE],

    /// Number of bytes in `str` in use.
    pub(crate) num_bytes: u8,

    /// Number of levels this node participates in. Also the length of the
    /// forward array that follows the header.
    pub(crate) height: u8,

    nexts: [SkipEntry; 0],
}

// Make sure the forward entries land on a correctly aligned boundary. This
// should be guaranteed by repr(C); the test will fail if that ever stops
// being true.
#[test]
fn test_align() {
    #[repr(C)]
    struct Check([SkipEntry; 0]);
    assert!(mem::align_of::<Check>() >= mem::align_of::<SkipEntry>());
}

impl Node {
    pub(crate) fn nexts(&self) -> &[SkipEntry] {
        unsafe { std::slice::from_raw_parts(self.nexts.as_ptr(), self.height as usize) }
    }

    pub(crate) fn nexts_mut(&mut self) -> &mut [SkipEntry] {
        unsafe { std::slice::from_raw_parts_mut(self.nexts.as_mut_ptr(), self.height as usize) }
    }

    fn layout_with_height(height: u8) -> Layout {
        Layout::from_size_align(
            mem::size_of::<Node>() + mem::size_of::<SkipEntry>() * (height as usize),
            mem::align_of::<Node>(),
        )
        .unwrap()
    }

    fn alloc(height: u8) -> *mut Node {
        assert!(height >= 1 && height <= MAX_HEIGHT_U8);

        let layout = Self::layout_with_height(height);
        unsafe {
            let node = alloc(layout) as *mut Node;
            if node.is_null() {
                handle_alloc_error(layout);
            }
            ptr::write(
                node,
                Node { str: [0; NODE_STR_SIZE], num_bytes: 0, height, nexts: [] },
            );
            for next in (*node).nexts_mut() {
                *next = SkipEntry::new();
            }
            node
        }
    }

    unsafe fn free(p: *mut Node) {
        dealloc(p as *mut u8, Self::layout_with_height((*p).height));
    }

    pub(crate) fn content_slice(&self) -> &[u8] {
        &self.str[..self.num_bytes as usize]
    }

    pub(crate) fn as_str(&self) -> &str {
        if cfg!(debug_assertions) {
            str::from_utf8(self.content_slice()).unwrap()
        } else {
            unsafe { str::from_utf8_unchecked(self.content_slice()) }
        }
    }

    // The height is at least 1, so the first forward entry always exists.
    pub(crate) fn first_next(&self) -> &SkipEntry {
        unsafe { &*self.nexts.as_ptr() }
    }

    /// A node's level 0 skip spans exactly its own characters.
    pub(crate) fn num_chars(&self) -> usize {
        self.first_next().skip_chars
    }
}

// The locator output. For each level, the last node starting at or before the
// target position (null when that is the head vector itself) and how many
// characters of that node's span precede the target.
struct RopeCursor([SkipEntry; MAX_HEIGHT]);

// How much of `s` fits in one node: the longest prefix of whole codepoints no
// longer than NODE_STR_SIZE bytes. Returns (bytes, chars).
fn str_next_chunk(s: &str) -> (usize, usize) {
    let bytes = s.as_bytes();
    let mut byte_len = 0;
    let mut char_len = 0;

    while byte_len < bytes.len() {
        let cs = codepoint_size(bytes[byte_len]);
        if byte_len + cs > NODE_STR_SIZE {
            break;
        }
        byte_len += cs;
        char_len += 1;
    }

    (byte_len, char_len)
}

/// A rope optimized for efficient edits at arbitrary character positions,
/// even in very long strings.
///
/// All positions are measured in unicode characters (codepoints), not bytes.
///
/// ```
/// use skiprope::SkipRope;
///
/// let mut rope = SkipRope::from("Some large text document");
/// rope.insert(5, "really "); // "Some really large text document"
/// rope.remove(0..5);         // "really large text document"
/// assert_eq!(rope, "really large text document");
/// ```
pub struct SkipRope {
    // The total number of characters in the rope.
    num_chars: usize,

    // The total number of bytes the characters take up, encoded as UTF-8.
    num_bytes: usize,

    // The maximum height of any live node; 0 while the rope is empty.
    height: usize,

    // Per-level entry points into the list. The vector's length is the
    // allocated level capacity; entries at height.. are unused.
    pub(crate) heads: Vec<SkipEntry>,

    // Node heights are drawn from this. Owning the generator keeps the
    // structure reproducible from a seed.
    rng: SmallRng,
}

impl SkipRope {
    /// Create an empty rope, seeding the height generator from system
    /// entropy.
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Create an empty rope whose node heights are derived from `seed`. Two
    /// ropes built with the same seed and the same edit sequence have
    /// identical internal structure, which makes test failures replayable.
    pub fn new_with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        SkipRope {
            num_chars: 0,
            num_bytes: 0,
            height: 0,
            heads: vec![SkipEntry::new(); INITIAL_HEAD_CAPACITY],
            rng,
        }
    }

    /// The length of the rope in bytes, as UTF-8.
    pub fn len_bytes(&self) -> usize {
        self.num_bytes
    }

    /// The length of the rope in unicode characters.
    pub fn len_chars(&self) -> usize {
        self.num_chars
    }

    pub fn is_empty(&self) -> bool {
        self.num_chars == 0
    }

    // Geometric draw: each extra level is half as likely as the one before.
    fn random_height(&mut self) -> u8 {
        let h = 1 + self.rng.next_u64().leading_ones() as usize;
        min(h, MAX_HEIGHT) as u8
    }

    // The forward entry at `level` hanging off `node`, where a null node
    // stands for the head vector.
    fn forward(&self, node: *const Node, level: usize) -> SkipEntry {
        if node.is_null() {
            self.heads[level]
        } else {
            unsafe { (*node).nexts()[level] }
        }
    }

    fn forward_mut(&mut self, node: *mut Node, level: usize) -> *mut SkipEntry {
        if node.is_null() {
            &mut self.heads[level]
        } else {
            unsafe { (*node).nexts_mut().as_mut_ptr().add(level) }
        }
    }

    // Walk to a character position, recording for every level the entry that
    // a mutation there will have to inspect or rewrite. Descends from the
    // top, moving right only while the next skip is strictly smaller than
    // the remaining offset, so a position on a node boundary resolves to the
    // earlier node.
    fn cursor_at_char(&self, char_pos: usize) -> RopeCursor {
        debug_assert!(char_pos <= self.num_chars);

        let mut cursor = RopeCursor([SkipEntry::new(); MAX_HEIGHT]);
        let mut e: *mut Node = ptr::null_mut();
        let mut offset = char_pos; // Characters still to skip.

        let mut level = self.height;
        while level > 0 {
            level -= 1;
            loop {
                let next = self.forward(e, level);
                if offset > next.skip_chars {
                    // Go right.
                    offset -= next.skip_chars;
                    e = next.node;
                    assert!(!e.is_null(), "rope ended before the target position");
                } else {
                    // Record this level and go down.
                    cursor.0[level] = SkipEntry { node: e, skip_chars: offset };
                    break;
                }
            }
        }

        cursor
    }

    // Add `by` characters to every forward entry on the cursor's path. Used
    // when an edit changes the amount of text under the cursor without
    // changing the node structure.
    fn update_path_offsets(&mut self, cursor: &RopeCursor, by: isize) {
        for level in 0..self.height {
            let entry = cursor.0[level];
            unsafe {
                let skip = &mut (*self.forward_mut(entry.node, level)).skip_chars;
                *skip = skip.wrapping_add(by as usize);
            }
        }
    }

    // Thread a freshly allocated node holding `contents` in at the cursor,
    // stitching it into every level up to its randomly chosen height. The
    // cursor is re-aimed at the end of the new node so consecutive calls
    // insert consecutive pieces. `pos` is the character position of the
    // insertion in the whole rope.
    unsafe fn insert_node_at(
        &mut self,
        cursor: &mut RopeCursor,
        pos: usize,
        contents: &str,
        num_chars: usize,
    ) {
        debug_assert!(!contents.is_empty());
        debug_assert!(contents.len() <= NODE_STR_SIZE);
        debug_assert_eq!(count_chars(contents), num_chars);

        let old_height = self.height;
        let new_height = self.random_height() as usize;

        let new_node = Node::alloc(new_height as u8);
        (*new_node).num_bytes = contents.len() as u8;
        (&mut (*new_node).str)[..contents.len()].copy_from_slice(contents.as_bytes());

        // A node taller than anything alive so far raises the rope, and may
        // need a bigger head vector first.
        if new_height > old_height {
            self.height = new_height;
            if new_height > self.heads.len() {
                let mut capacity = self.heads.len();
                while capacity < new_height {
                    capacity *= 2;
                }
                self.heads.resize(capacity, SkipEntry::new());
            }
        }

        let mut level = 0;
        while level < new_height {
            let nexts = (*new_node).nexts_mut();
            if level < old_height {
                let prev = self.forward_mut(cursor.0[level].node, level);
                nexts[level].node = (*prev).node;
                nexts[level].skip_chars =
                    num_chars + (*prev).skip_chars - cursor.0[level].skip_chars;

                (*prev).node = new_node;
                (*prev).skip_chars = cursor.0[level].skip_chars;
            } else {
                // A brand new level. The head slot spans everything in front
                // of the insertion point; the node spans everything after.
                nexts[level].node = ptr::null_mut();
                nexts[level].skip_chars = self.num_chars - pos + num_chars;

                self.heads[level].node = new_node;
                self.heads[level].skip_chars = pos;
            }

            cursor.0[level] = SkipEntry { node: new_node, skip_chars: num_chars };
            level += 1;
        }

        // Levels that skip over the new node entirely just get longer.
        while level < old_height {
            (*self.forward_mut(cursor.0[level].node, level)).skip_chars += num_chars;
            cursor.0[level].skip_chars += num_chars;
            level += 1;
        }

        self.num_chars += num_chars;
        self.num_bytes += contents.len();
    }

    unsafe fn insert_at_cursor(
        &mut self,
        cursor: &mut RopeCursor,
        mut pos: usize,
        contents: &str,
    ) {
        let e = cursor.0[0].node;
        let offset = cursor.0[0].skip_chars;

        // The cursor measures characters into the target node. Editing the
        // byte buffer needs that as a byte offset.
        let mut offset_bytes = 0;
        if !e.is_null() && offset > 0 {
            debug_assert!(offset <= (*e).num_chars());
            offset_bytes = str_chars_to_bytes((*e).as_str(), offset);
        }

        let num_inserted_bytes = contents.len();

        if !e.is_null() && (*e).num_bytes as usize + num_inserted_bytes <= NODE_STR_SIZE {
            // Fast path: the text fits in the node the cursor landed on.
            // Shift the tail bytes out of the way and splice it straight in.
            let buf = (*e).str.as_mut_ptr();
            if offset_bytes < (*e).num_bytes as usize {
                ptr::copy(
                    buf.add(offset_bytes),
                    buf.add(offset_bytes + num_inserted_bytes),
                    (*e).num_bytes as usize - offset_bytes,
                );
            }
            ptr::copy_nonoverlapping(
                contents.as_bytes().as_ptr(),
                buf.add(offset_bytes),
                num_inserted_bytes,
            );

            (*e).num_bytes += num_inserted_bytes as u8;
            self.num_bytes += num_inserted_bytes;

            let num_inserted_chars = count_chars(contents);
            self.num_chars += num_inserted_chars;
            self.update_path_offsets(cursor, num_inserted_chars as isize);
        } else {
            // There isn't room; we'll need at least one new node. If the
            // insertion point sits in the middle of a node, detach that
            // node's tail first and re-insert it after the new text.
            let mut end_buf = [0u8; NODE_STR_SIZE];
            let mut num_end_bytes = 0;
            let mut num_end_chars = 0;

            if !e.is_null() {
                num_end_bytes = (*e).num_bytes as usize - offset_bytes;
                if num_end_bytes > 0 {
                    end_buf[..num_end_bytes]
                        .copy_from_slice(&(&(*e).str)[offset_bytes..(*e).num_bytes as usize]);
                    num_end_chars = (*e).num_chars() - offset;

                    (*e).num_bytes = offset_bytes as u8;
                    self.update_path_offsets(cursor, -(num_end_chars as isize));
                    self.num_chars -= num_end_chars;
                    self.num_bytes -= num_end_bytes;
                }
            }

            // Insert the new text as a run of nodes, splitting it into
            // codepoint-aligned pieces no bigger than a node's buffer.
            let mut remainder = contents;
            while !remainder.is_empty() {
                let (piece_bytes, piece_chars) = str_next_chunk(remainder);
                debug_assert!(piece_bytes > 0);

                let (piece, rest) = remainder.split_at(piece_bytes);
                self.insert_node_at(cursor, pos, piece, piece_chars);
                pos += piece_chars;
                remainder = rest;
            }

            if num_end_bytes > 0 {
                let end_str = str::from_utf8_unchecked(&end_buf[..num_end_bytes]);
                self.insert_node_at(cursor, pos, end_str, num_end_chars);
            }
        }
    }

    unsafe fn remove_at_cursor(&mut self, cursor: &mut RopeCursor, mut length: usize) {
        let mut offset = cursor.0[0].skip_chars;
        let mut e = cursor.0[0].node;

        while length > 0 {
            {
                // At the end of the current node's span, or still on the
                // head: step into the node the removal actually starts in.
                let next = self.forward(e, 0);
                if e.is_null() || offset == next.skip_chars {
                    e = next.node;
                    offset = 0;
                }
            }
            debug_assert!(!e.is_null());

            let num_chars = (*e).num_chars();
            let removed = min(length, num_chars - offset);
            debug_assert!(removed > 0);

            let height = (*e).height as usize;

            if removed < num_chars {
                // Part of the node survives. Close the byte gap and shorten
                // the node's own spans.
                let s = (*e).as_str();
                let leading_bytes = str_chars_to_bytes(s, offset);
                let removed_bytes = str_chars_to_bytes(&s[leading_bytes..], removed);
                let trailing_bytes = (*e).num_bytes as usize - leading_bytes - removed_bytes;

                let buf = (*e).str.as_mut_ptr();
                if trailing_bytes > 0 {
                    ptr::copy(
                        buf.add(leading_bytes + removed_bytes),
                        buf.add(leading_bytes),
                        trailing_bytes,
                    );
                }
                (*e).num_bytes -= removed_bytes as u8;
                self.num_bytes -= removed_bytes;

                for entry in (*e).nexts_mut() {
                    entry.skip_chars -= removed;
                }
            } else {
                // The whole node goes. Splice it out of every level it
                // occupies, merging its spans into its predecessors'.
                for level in 0..height {
                    let from = (*e).nexts()[level];
                    let prev = self.forward_mut(cursor.0[level].node, level);
                    (*prev).node = from.node;
                    (*prev).skip_chars += from.skip_chars - removed;
                }

                self.num_bytes -= (*e).num_bytes as usize;
                let next = (*e).first_next().node;
                Node::free(e);
                e = next;
            }

            // Levels above the node still span the removed characters.
            for level in height..self.height {
                (*self.forward_mut(cursor.0[level].node, level)).skip_chars -= removed;
            }

            self.num_chars -= removed;
            length -= removed;
        }

        // Removing the last node of a level leaves its head slot with no
        // successor; pull the rope height back down to the tallest survivor.
        while self.height > 0 && self.heads[self.height - 1].node.is_null() {
            self.height -= 1;
        }
    }

    /// Insert `contents` so that its first character lands at character
    /// position `pos`. A position past the end of the rope appends.
    ///
    /// ```
    /// # use skiprope::SkipRope;
    /// let mut rope = SkipRope::from("hllo");
    /// rope.insert(1, "e");
    /// assert_eq!(rope, "hello");
    /// ```
    pub fn insert(&mut self, pos: usize, contents: &str) {
        if contents.is_empty() {
            return;
        }
        let pos = min(pos, self.num_chars);

        let mut cursor = self.cursor_at_char(pos);
        unsafe {
            self.insert_at_cursor(&mut cursor, pos, contents);
        }
    }

    /// Remove the characters in `range`. Both ends are clamped to the length
    /// of the rope, so removing past the end just truncates.
    ///
    /// ```
    /// # use skiprope::SkipRope;
    /// let mut rope = SkipRope::from("hello there");
    /// rope.remove(5..100);
    /// assert_eq!(rope, "hello");
    /// ```
    pub fn remove(&mut self, range: Range<usize>) {
        let start = min(range.start, self.num_chars);
        let end = min(range.end, self.num_chars);
        if start >= end {
            return;
        }

        let mut cursor = self.cursor_at_char(start);
        unsafe {
            self.remove_at_cursor(&mut cursor, end - start);
        }
    }

    /// Walk the whole structure and assert every internal invariant: chain
    /// and skip agreement on every level, count totals, height agreement,
    /// UTF-8 validity and buffer capacity. O(n); meant for tests and
    /// debugging.
    #[doc(hidden)]
    pub fn check(&self) {
        assert!(self.height <= MAX_HEIGHT);
        assert!(self.heads.len() >= self.height);
        assert!(self.heads.len() >= INITIAL_HEAD_CAPACITY);

        // Expected next node and its character position, per level.
        let mut expected: Vec<(*const Node, usize)> = (0..self.height)
            .map(|level| (self.heads[level].node as *const Node, self.heads[level].skip_chars))
            .collect();

        let mut num_chars = 0;
        let mut num_bytes = 0;
        let mut max_height = 0;

        for n in self.node_iter() {
            assert!(n.num_bytes > 0, "empty nodes must be spliced out");
            assert!(n.height >= 1 && n.height <= MAX_HEIGHT_U8);
            assert!((n.height as usize) <= self.height);
            max_height = max_height.max(n.height as usize);

            let s = str::from_utf8(n.content_slice()).unwrap();
            assert_eq!(count_chars(s), n.num_chars());

            for (level, exp) in expected[..n.height as usize].iter_mut().enumerate() {
                assert_eq!(exp.0, n as *const Node, "wrong node chained at level {level}");
                assert_eq!(exp.1, num_chars, "wrong skip total at level {level}");
                *exp = (n.nexts()[level].node, num_chars + n.nexts()[level].skip_chars);
            }

            num_chars += n.num_chars();
            num_bytes += n.num_bytes as usize;
        }

        for (level, exp) in expected.iter().enumerate() {
            assert!(exp.0.is_null(), "level {level} does not reach the end of the rope");
            assert_eq!(exp.1, num_chars, "level {level} skips don't sum to the length");
        }

        assert_eq!(self.num_chars, num_chars);
        assert_eq!(self.num_bytes, num_bytes);
        assert_eq!(self.height, max_height, "rope height out of sync with its nodes");
    }

    /// Dump the structure of the list to stdout, one line per node with its
    /// per-level skips.
    #[doc(hidden)]
    pub fn print(&self) {
        println!(
            "chars: {}\tbytes: {}\theight: {}",
            self.num_chars, self.num_bytes, self.height
        );

        print!("HEAD:");
        for entry in &self.heads[..self.height] {
            print!(" |{} ", entry.skip_chars);
        }
        println!();

        for (i, node) in self.node_iter().enumerate() {
            print!("{}:", i);
            for entry in node.nexts() {
                print!(" |{} ", entry.skip_chars);
            }
            println!("      : {:?}", node.as_str());
        }
    }

    // Find the node containing `char_pos` and the character offset inside
    // it, for read-only traversal. A position on a node boundary resolves to
    // the following node; the end of the rope yields None.
    pub(crate) fn read_cursor_at_char(&self, char_pos: usize) -> (Option<&Node>, usize) {
        debug_assert!(char_pos <= self.num_chars);

        let cursor = self.cursor_at_char(char_pos);
        let e = cursor.0[0].node;
        let offset = cursor.0[0].skip_chars;

        unsafe {
            if e.is_null() {
                (self.heads[0].node.as_ref(), 0)
            } else if offset == (*e).num_chars() {
                ((*e).first_next().node.as_ref(), 0)
            } else {
                (Some(&*e), offset)
            }
        }
    }
}

impl Drop for SkipRope {
    fn drop(&mut self) {
        let mut node = self.heads[0].node;
        unsafe {
            while !node.is_null() {
                let next = (*node).first_next().node;
                Node::free(node);
                node = next;
            }
        }
    }
}

impl Default for SkipRope {
    fn default() -> Self {
        SkipRope::new()
    }
}

impl Clone for SkipRope {
    fn clone(&self) -> Self {
        let mut r = SkipRope {
            num_chars: self.num_chars,
            num_bytes: self.num_bytes,
            height: self.height,
            heads: vec![SkipEntry::new(); self.heads.len()],
            rng: self.rng.clone(),
        };

        for level in 0..self.height {
            r.heads[level].skip_chars = self.heads[level].skip_chars;
        }

        // The forward entry per level still waiting to be aimed at the next
        // copied node. The head vector is not resized below, so these stay
        // valid.
        let mut tails: [*mut SkipEntry; MAX_HEIGHT] = [ptr::null_mut(); MAX_HEIGHT];
        for (level, tail) in tails[..self.height].iter_mut().enumerate() {
            *tail = &mut r.heads[level];
        }

        for other in self.node_iter() {
            let height = other.height;
            let node = Node::alloc(height);
            unsafe {
                (*node).num_bytes = other.num_bytes;
                let len = other.num_bytes as usize;
                (&mut (*node).str)[..len].copy_from_slice(&other.str[..len]);

                let nexts = (*node).nexts_mut();
                for level in 0..height as usize {
                    nexts[level].skip_chars = other.nexts()[level].skip_chars;
                    (*tails[level]).node = node;
                    tails[level] = &mut nexts[level];
                }
            }
        }

        r
    }
}

impl PartialEq for SkipRope {
    // Compares the byte streams chunk by chunk, so the two ropes don't have
    // to agree on where their node boundaries fall.
    fn eq(&self, other: &SkipRope) -> bool {
        if self.num_bytes != other.num_bytes || self.num_chars != other.num_chars {
            return false;
        }

        let mut other_iter = other.node_iter().map(|n| n.content_slice());
        let mut os = other_iter.next();
        let mut opos: usize = 0; // Byte position in os.

        for n in self.node_iter() {
            let s = n.content_slice();
            let mut pos: usize = 0; // Byte position in s.

            while pos < s.len() {
                let oss = match os {
                    Some(oss) => oss,
                    None => return false,
                };

                let amt = min(s.len() - pos, oss.len() - opos);
                debug_assert!(amt > 0);
                if s[pos..pos + amt] != oss[opos..opos + amt] {
                    return false;
                }

                pos += amt;
                opos += amt;
                if opos == oss.len() {
                    os = other_iter.next();
                    opos = 0;
                }
            }
        }

        true
    }
}
impl Eq for SkipRope {}

impl SkipRope {
    fn eq_str(&self, other: &str) -> bool {
        if self.num_bytes != other.len() {
            return false;
        }

        let mut pos = 0;
        for n in self.node_iter() {
            let s = n.content_slice();
            if other.as_bytes()[pos..pos + s.len()] != *s {
                return false;
            }
            pos += s.len();
        }
        true
    }
}

impl PartialEq<str> for SkipRope {
    fn eq(&self, other: &str) -> bool {
        self.eq_str(other)
    }
}

impl PartialEq<&str> for SkipRope {
    fn eq(&self, other: &&str) -> bool {
        self.eq_str(other)
    }
}

impl PartialEq<String> for SkipRope {
    fn eq(&self, other: &String) -> bool {
        self.eq_str(other)
    }
}

impl PartialEq<String> for &SkipRope {
    fn eq(&self, other: &String) -> bool {
        self.eq_str(other)
    }
}

impl PartialEq<&String> for SkipRope {
    fn eq(&self, other: &&String) -> bool {
        self.eq_str(other)
    }
}

impl<'a> From<&'a str> for SkipRope {
    fn from(s: &'a str) -> SkipRope {
        let mut rope = SkipRope::new();
        rope.insert(0, s);
        rope
    }
}

impl From<String> for SkipRope {
    fn from(s: String) -> SkipRope {
        SkipRope::from(s.as_str())
    }
}

impl From<&SkipRope> for String {
    fn from(rope: &SkipRope) -> String {
        let mut content = String::with_capacity(rope.num_bytes);
        for node in rope.node_iter() {
            content.push_str(node.as_str());
        }
        content
    }
}

impl fmt::Display for SkipRope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in self.node_iter() {
            f.write_str(node.as_str())?;
        }
        Ok(())
    }
}

impl fmt::Debug for SkipRope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SkipRope").field(&String::from(self)).finish()
    }
}

impl<'a> Extend<&'a str> for SkipRope {
    fn extend<T: IntoIterator<Item = &'a str>>(&mut self, iter: T) {
        for s in iter {
            self.insert(self.num_chars, s);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_distribution_looks_geometric() {
        let mut r = SkipRope::new_with_seed(42);

        let samples = 10_000;
        let mut total = 0u64;
        for _ in 0..samples {
            let h = r.random_height();
            assert!(h >= 1 && h <= MAX_HEIGHT_U8);
            total += h as u64;
        }

        // A geometric draw with p = 1/2 has mean 2.
        let mean = total as f64 / samples as f64;
        assert!((1.8..2.2).contains(&mean), "suspicious height mean {mean}");
    }

    #[test]
    fn chunks_never_split_codepoints() {
        // 3 byte codepoints leave a 2 byte remainder at the node limit.
        let s = "€".repeat(100);
        let (bytes, chars) = str_next_chunk(&s);
        assert!(bytes <= NODE_STR_SIZE);
        assert_eq!(bytes % 3, 0);
        assert_eq!(chars, bytes / 3);

        // ASCII fills the node exactly.
        let s = "x".repeat(NODE_STR_SIZE * 2);
        assert_eq!(str_next_chunk(&s), (NODE_STR_SIZE, NODE_STR_SIZE));

        // Short strings come back whole.
        assert_eq!(str_next_chunk("héllo"), (6, 5));
    }
}
