//! Decoded mesh buffers.

use crate::header::{FormatHeader, IndexWidth};

/// Index data, stored at the width declared by the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexBuffer {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl IndexBuffer {
    /// An empty buffer with room for exactly `count` indices.
    #[must_use]
    pub fn with_capacity(width: IndexWidth, count: usize) -> Self {
        match width {
            IndexWidth::U8 => Self::U8(Vec::with_capacity(count)),
            IndexWidth::U16 => Self::U16(Vec::with_capacity(count)),
            IndexWidth::U32 => Self::U32(Vec::with_capacity(count)),
        }
    }

    #[must_use]
    pub fn width(&self) -> IndexWidth {
        match self {
            Self::U8(_) => IndexWidth::U8,
            Self::U16(_) => IndexWidth::U16,
            Self::U32(_) => IndexWidth::U32,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::U32(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index at position `i`, widened to `u32`.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<u32> {
        match self {
            Self::U8(v) => v.get(i).map(|&x| u32::from(x)),
            Self::U16(v) => v.get(i).map(|&x| u32::from(x)),
            Self::U32(v) => v.get(i).copied(),
        }
    }

    /// Iterate over all indices, widened to `u32`.
    pub fn iter(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        match self {
            Self::U8(v) => Box::new(v.iter().map(|&x| u32::from(x))),
            Self::U16(v) => Box::new(v.iter().map(|&x| u32::from(x))),
            Self::U32(v) => Box::new(v.iter().copied()),
        }
    }

    /// Largest index in the buffer.
    #[must_use]
    pub fn max_index(&self) -> Option<u32> {
        self.iter().max()
    }

    /// Raw index data in native byte order, ready for upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::U8(v) => v.as_slice(),
            Self::U16(v) => bytemuck::cast_slice(v),
            Self::U32(v) => bytemuck::cast_slice(v),
        }
    }

    /// Append indices from little-endian bytes.
    ///
    /// `bytes` must be a whole number of indices.
    pub(crate) fn extend_le(&mut self, bytes: &[u8]) {
        match self {
            Self::U8(v) => v.extend_from_slice(bytes),
            Self::U16(v) => v.extend(
                bytes
                    .chunks_exact(2)
                    .map(|b| u16::from_le_bytes([b[0], b[1]])),
            ),
            Self::U32(v) => v.extend(
                bytes
                    .chunks_exact(4)
                    .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]])),
            ),
        }
    }
}

/// The finished output of a decode session.
///
/// Vertex data is a flat run of 32-bit words; group it into records of
/// [`stride`](Self::stride) words to read individual vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBuffers {
    header: FormatHeader,
    vertex_words: Vec<u32>,
    indices: IndexBuffer,
}

impl MeshBuffers {
    pub(crate) fn new(header: FormatHeader, vertex_words: Vec<u32>, indices: IndexBuffer) -> Self {
        debug_assert_eq!(vertex_words.len(), header.vertex_word_count as usize);
        debug_assert_eq!(indices.len(), header.index_count as usize);
        Self {
            header,
            vertex_words,
            indices,
        }
    }

    #[must_use]
    pub fn header(&self) -> &FormatHeader {
        &self.header
    }

    #[must_use]
    pub fn vertex_words(&self) -> &[u32] {
        &self.vertex_words
    }

    #[must_use]
    pub fn indices(&self) -> &IndexBuffer {
        &self.indices
    }

    #[must_use]
    pub fn stride(&self) -> usize {
        self.header.stride()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.header.vertex_count()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.header.triangle_count()
    }

    /// Vertex records, each `stride` words long.
    ///
    /// A trailing partial record, if the word count is not a multiple of the
    /// stride, is not yielded.
    pub fn vertices(&self) -> std::slice::ChunksExact<'_, u32> {
        self.vertex_words.chunks_exact(self.stride())
    }

    /// Raw vertex data in native byte order, ready for upload.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertex_words)
    }

    /// Take the buffers apart.
    #[must_use]
    pub fn into_parts(self) -> (FormatHeader, Vec<u32>, IndexBuffer) {
        (self.header, self.vertex_words, self.indices)
    }
}
