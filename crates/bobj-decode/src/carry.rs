//! Carry buffer for fields split across chunk boundaries.

/// Widest single field in the stream: the 12-byte origin offset.
pub const MAX_FIELD_WIDTH: usize = 12;

/// Bytes of a field that has only partially arrived.
///
/// The carry never holds a complete field: as soon as it reaches the width
/// of the pending field the field is taken out and decoded.
#[derive(Debug, Default)]
pub(crate) struct Carry {
    buf: [u8; MAX_FIELD_WIDTH],
    len: usize,
}

impl Carry {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Top the carry up towards `width` bytes from the head of `chunk`.
    ///
    /// Returns the number of bytes taken from `chunk`, and the completed
    /// field if the carry reached `width`. A completed field leaves the
    /// carry empty.
    pub fn fill(&mut self, width: usize, chunk: &[u8]) -> (usize, Option<Field>) {
        debug_assert!(width <= MAX_FIELD_WIDTH && self.len < width);

        let take = (width - self.len).min(chunk.len());
        self.buf[self.len..self.len + take].copy_from_slice(&chunk[..take]);
        self.len += take;

        if self.len < width {
            return (take, None);
        }

        let field = Field {
            buf: self.buf,
            len: width,
        };
        self.len = 0;
        (take, Some(field))
    }
}

/// A complete field reassembled from the carry.
pub(crate) struct Field {
    buf: [u8; MAX_FIELD_WIDTH],
    len: usize,
}

impl Field {
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}
