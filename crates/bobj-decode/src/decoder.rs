//! The incremental decode state machine.
//!
//! A [`MeshDecoder`] is fed chunks in stream order. Whole fields are decoded
//! straight out of each chunk; a field that straddles a chunk boundary is
//! reassembled in the carry buffer before it is decoded. Vertex words and
//! indices are decoded one unit at a time, so record strides never matter
//! here.

use crate::carry::Carry;
use crate::error::{DecodeError, DecodeResult};
use crate::header::{
    Components, FormatHeader, IndexWidth, PartialHeader, read_f64, read_u32, read_vec3,
};
use crate::mesh::{IndexBuffer, MeshBuffers};
use crate::options::{DecodeOptions, TrailingDataPolicy};

/// Position of the decoder in the stream.
///
/// States only ever advance, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DecodeState {
    HeaderIndexWidth,
    HeaderFlags,
    HeaderScale,
    HeaderOffset,
    VertexBufferLength,
    IndexCount,
    VertexData,
    IndexData,
    Done,
}

impl DecodeState {
    /// Number of bytes the next field in this state occupies.
    #[must_use]
    pub fn field_width(self, index_width: IndexWidth) -> usize {
        match self {
            Self::HeaderIndexWidth | Self::HeaderFlags => 1,
            Self::HeaderScale => 8,
            Self::HeaderOffset => 12,
            Self::VertexBufferLength | Self::IndexCount | Self::VertexData => 4,
            Self::IndexData => index_width.bytes(),
            Self::Done => 0,
        }
    }

    /// Whether the header is still being read.
    #[must_use]
    pub fn is_header(self) -> bool {
        self < Self::VertexData
    }
}

/// Outcome of feeding one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// More bytes are needed.
    NeedMore,
    /// The mesh is complete. `trailing` bytes of the chunk were past the end
    /// of the payload and were not decoded.
    Complete { trailing: usize },
}

/// Incremental BOBJ decoder for one stream.
///
/// ```
/// use bobj_decode::{MeshDecoder, Status};
///
/// // 2-byte indices, no optional components, empty buffers.
/// let mut bytes = vec![2, 0];
/// bytes.extend_from_slice(&1.0f64.to_le_bytes());
/// bytes.extend_from_slice(&[0; 12]);
/// bytes.extend_from_slice(&0u32.to_le_bytes());
/// bytes.extend_from_slice(&0u32.to_le_bytes());
///
/// let mut decoder = MeshDecoder::new();
/// for chunk in bytes.chunks(7) {
///     if let Status::Complete { .. } = decoder.feed(chunk).unwrap() {
///         break;
///     }
/// }
/// let mesh = decoder.finish().unwrap();
/// assert!(mesh.vertex_words().is_empty());
/// ```
#[derive(Debug)]
pub struct MeshDecoder {
    options: DecodeOptions,
    state: DecodeState,
    carry: Carry,
    partial: PartialHeader,
    header: Option<FormatHeader>,
    vertex_words: Vec<u32>,
    indices: IndexBuffer,
    consumed: u64,
    failed: bool,
}

impl Default for MeshDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshDecoder {
    /// Create a decoder with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(DecodeOptions::default())
    }

    /// Create a decoder with the given options.
    #[must_use]
    pub fn with_options(options: DecodeOptions) -> Self {
        Self {
            options,
            state: DecodeState::HeaderIndexWidth,
            carry: Carry::default(),
            partial: PartialHeader::default(),
            header: None,
            vertex_words: Vec::new(),
            indices: IndexBuffer::U8(Vec::new()),
            consumed: 0,
            failed: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> DecodeState {
        self.state
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state == DecodeState::Done
    }

    /// The header, once every header field has been read.
    #[must_use]
    pub fn header(&self) -> Option<&FormatHeader> {
        self.header.as_ref()
    }

    /// Bytes accepted so far, including any held in the carry buffer.
    #[must_use]
    pub fn bytes_consumed(&self) -> u64 {
        self.consumed
    }

    /// Bytes of a partially received field waiting for the next chunk.
    #[must_use]
    pub fn carried(&self) -> usize {
        self.carry.len()
    }

    /// Feed the next chunk of the stream.
    ///
    /// Any error is terminal; later calls return [`DecodeError::Poisoned`].
    pub fn feed(&mut self, chunk: &[u8]) -> DecodeResult<Status> {
        if self.failed {
            return Err(DecodeError::Poisoned);
        }
        let result = self.feed_inner(chunk);
        if result.is_err() {
            self.failed = true;
        }
        result
    }

    /// Hand over the decoded buffers.
    ///
    /// Fails with [`DecodeError::IncompleteStream`] unless every declared
    /// byte has been decoded.
    pub fn finish(self) -> DecodeResult<MeshBuffers> {
        if self.failed {
            return Err(DecodeError::Poisoned);
        }
        match self.header {
            Some(header) if self.state == DecodeState::Done => {
                Ok(MeshBuffers::new(header, self.vertex_words, self.indices))
            }
            _ => Err(DecodeError::IncompleteStream {
                state: self.state,
                consumed: self.consumed,
            }),
        }
    }

    fn feed_inner(&mut self, mut chunk: &[u8]) -> DecodeResult<Status> {
        while self.state != DecodeState::Done && !chunk.is_empty() {
            if self.carry.is_empty() {
                let used = self.decode_run(chunk)?;
                chunk = &chunk[used..];
                if self.state == DecodeState::Done || chunk.is_empty() {
                    break;
                }
            }

            // Whatever is left is shorter than the pending field.
            let width = self.pending_width();
            let (taken, field) = self.carry.fill(width, chunk);
            chunk = &chunk[taken..];
            self.consumed += taken as u64;
            if let Some(field) = field {
                self.apply_field(field.as_bytes())?;
            }
        }

        if self.state != DecodeState::Done {
            return Ok(Status::NeedMore);
        }

        let trailing = chunk.len();
        if trailing > 0 && self.options.trailing_data == TrailingDataPolicy::Reject {
            return Err(DecodeError::TrailingData(trailing));
        }
        Ok(Status::Complete { trailing })
    }

    /// Decode as many whole fields as `bytes` holds, returning the number of
    /// bytes used. Requires an empty carry.
    fn decode_run(&mut self, bytes: &[u8]) -> DecodeResult<usize> {
        let mut used = 0;
        loop {
            let rest = &bytes[used..];
            let n = match self.state {
                DecodeState::Done => break,
                DecodeState::VertexData => {
                    let remaining = self.vertex_target() - self.vertex_words.len();
                    let n = remaining.min(rest.len() / 4) * 4;
                    self.vertex_words.extend(
                        rest[..n]
                            .chunks_exact(4)
                            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]])),
                    );
                    n
                }
                DecodeState::IndexData => {
                    let width = self.pending_width();
                    let remaining = self.index_target() - self.indices.len();
                    let n = remaining.min(rest.len() / width) * width;
                    self.indices.extend_le(&rest[..n]);
                    n
                }
                header_state => {
                    let width = header_state.field_width(IndexWidth::U32);
                    if rest.len() < width {
                        0
                    } else {
                        self.apply_field(&rest[..width])?;
                        width
                    }
                }
            };
            if n == 0 {
                break;
            }
            used += n;
            self.consumed += n as u64;
            self.settle();
        }
        Ok(used)
    }

    /// Decode one complete field for the current state.
    fn apply_field(&mut self, field: &[u8]) -> DecodeResult<()> {
        debug_assert_eq!(field.len(), self.pending_width());

        self.state = match self.state {
            DecodeState::HeaderIndexWidth => {
                let width = IndexWidth::from_byte(field[0], self.options.index_width)?;
                self.partial.index_width = Some(width);
                DecodeState::HeaderFlags
            }
            DecodeState::HeaderFlags => {
                self.partial.components = Components::from_bits_truncate(field[0]);
                DecodeState::HeaderScale
            }
            DecodeState::HeaderScale => {
                self.partial.scale = read_f64(field);
                DecodeState::HeaderOffset
            }
            DecodeState::HeaderOffset => {
                self.partial.origin = read_vec3(field);
                DecodeState::VertexBufferLength
            }
            DecodeState::VertexBufferLength => {
                let count = read_u32(field);
                check_limit("vertex word", count, self.options.limits.max_vertex_words)?;
                self.partial.vertex_word_count = count;
                DecodeState::IndexCount
            }
            DecodeState::IndexCount => {
                let count = read_u32(field);
                check_limit("index", count, self.options.limits.max_indices)?;
                self.allocate(self.partial.finish(count));
                DecodeState::VertexData
            }
            DecodeState::VertexData => {
                self.vertex_words.push(read_u32(field));
                DecodeState::VertexData
            }
            DecodeState::IndexData => {
                self.indices.extend_le(field);
                DecodeState::IndexData
            }
            DecodeState::Done => DecodeState::Done,
        };
        self.settle();
        Ok(())
    }

    /// Size the output buffers from the finished header.
    fn allocate(&mut self, header: FormatHeader) {
        self.vertex_words = Vec::with_capacity(header.vertex_word_count as usize);
        self.indices = IndexBuffer::with_capacity(header.index_width, header.index_count as usize);
        self.header = Some(header);
    }

    /// Move past payload stages whose buffers are full.
    fn settle(&mut self) {
        if self.state == DecodeState::VertexData && self.vertex_words.len() == self.vertex_target()
        {
            self.state = DecodeState::IndexData;
        }
        if self.state == DecodeState::IndexData && self.indices.len() == self.index_target() {
            self.state = DecodeState::Done;
        }
    }

    fn pending_width(&self) -> usize {
        let index_width = self.partial.index_width.unwrap_or(IndexWidth::U32);
        self.state.field_width(index_width)
    }

    fn vertex_target(&self) -> usize {
        self.header.map_or(0, |h| h.vertex_word_count as usize)
    }

    fn index_target(&self) -> usize {
        self.header.map_or(0, |h| h.index_count as usize)
    }
}

fn check_limit(what: &'static str, declared: u32, limit: u32) -> DecodeResult<()> {
    if declared > limit {
        return Err(DecodeError::MeshTooLarge {
            what,
            declared,
            limit,
        });
    }
    Ok(())
}

/// Decode a complete in-memory stream.
pub fn decode_slice(bytes: &[u8], options: DecodeOptions) -> DecodeResult<MeshBuffers> {
    let mut decoder = MeshDecoder::with_options(options);
    decoder.feed(bytes)?;
    decoder.finish()
}
