//! Transfer cursors shared between the driver and a [`StreamEngine`].
//!
//! A cursor is a `(buffer, position, size)` triple.  [`InCursor`] tracks how
//! much of the currently loaded input chunk the engine has consumed;
//! [`OutCursor`] tracks how much of the output buffer the engine has filled.
//! Both are rebuilt by the driver for every chunk / engine invocation, so an
//! engine only ever sees the region it is allowed to touch.  Positions only
//! move forward and never past the end of the underlying slice.
//!
//! [`StreamEngine`]: crate::engine::StreamEngine

/// Read cursor over a filled region of the input buffer.
#[derive(Debug)]
pub struct InCursor<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> InCursor<'a> {
    /// Cursor over `src` with nothing consumed yet (`pos = 0`, `size = src.len()`).
    pub fn new(src: &'a [u8]) -> Self {
        InCursor { src, pos: 0 }
    }

    /// Number of bytes already consumed by the engine.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Number of valid bytes behind the cursor.
    #[inline]
    pub fn size(&self) -> usize {
        self.src.len()
    }

    /// The whole filled region, consumed or not.
    #[inline]
    pub fn filled(&self) -> &'a [u8] {
        self.src
    }

    /// The unread part of the filled region.
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.src[self.pos..]
    }

    /// `true` once every byte of the chunk has been handed to the engine.
    #[inline]
    pub fn is_consumed(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Marks `n` more bytes as consumed.
    ///
    /// # Panics
    /// If the new position would pass the end of the chunk.
    pub fn advance(&mut self, n: usize) {
        self.set_pos(self.pos + n);
    }

    /// Moves the read position to `pos`.
    ///
    /// # Panics
    /// If `pos` goes backwards or past the end of the chunk.
    pub fn set_pos(&mut self, pos: usize) {
        assert!(
            pos >= self.pos && pos <= self.src.len(),
            "input cursor moved from {} to {} (size {})",
            self.pos,
            pos,
            self.src.len()
        );
        self.pos = pos;
    }
}

/// Write cursor over the output buffer.
#[derive(Debug)]
pub struct OutCursor<'a> {
    dst: &'a mut [u8],
    pos: usize,
}

impl<'a> OutCursor<'a> {
    /// Cursor over the whole of `dst` with nothing written yet.
    pub fn new(dst: &'a mut [u8]) -> Self {
        OutCursor { dst, pos: 0 }
    }

    /// Number of bytes produced so far.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Total room behind the cursor.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.dst.len()
    }

    /// Bytes still available to the engine.
    #[inline]
    pub fn spare(&self) -> usize {
        self.dst.len() - self.pos
    }

    /// The produced prefix, ready to be written out.
    #[inline]
    pub fn written(&self) -> &[u8] {
        &self.dst[..self.pos]
    }

    /// Unwritten tail of the buffer.
    #[inline]
    pub fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.dst[self.pos..]
    }

    /// Whole buffer plus the current position, for engines that track the
    /// position themselves and report it back through [`OutCursor::set_pos`].
    #[inline]
    pub fn buffer_mut(&mut self) -> (&mut [u8], usize) {
        (&mut *self.dst, self.pos)
    }

    /// Copies as much of `bytes` as fits and returns how many were taken.
    pub fn put(&mut self, bytes: &[u8]) -> usize {
        let n = bytes.len().min(self.spare());
        self.dst[self.pos..self.pos + n].copy_from_slice(&bytes[..n]);
        self.pos += n;
        n
    }

    /// Marks `n` more bytes as produced.
    ///
    /// # Panics
    /// If the new position would pass the end of the buffer.
    pub fn advance(&mut self, n: usize) {
        self.set_pos(self.pos + n);
    }

    /// Moves the write position to `pos`.
    ///
    /// # Panics
    /// If `pos` goes backwards or past the end of the buffer.
    pub fn set_pos(&mut self, pos: usize) {
        assert!(
            pos >= self.pos && pos <= self.dst.len(),
            "output cursor moved from {} to {} (capacity {})",
            self.pos,
            pos,
            self.dst.len()
        );
        self.pos = pos;
    }
}
