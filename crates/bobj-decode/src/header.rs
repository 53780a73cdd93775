//! Header fields and their readers.

use bitflags::bitflags;
use glam::Vec3;

use crate::error::{DecodeError, DecodeResult};
use crate::options::IndexWidthPolicy;

/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 30;

/// Byte width of each element in the index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexWidth {
    U8 = 1,
    U16 = 2,
    U32 = 4,
}

impl IndexWidth {
    /// Interpret the first header byte.
    ///
    /// Under [`IndexWidthPolicy::FallbackToU32`] any unrecognised value
    /// selects 4-byte indices.
    pub fn from_byte(byte: u8, policy: IndexWidthPolicy) -> DecodeResult<Self> {
        match (byte, policy) {
            (1, _) => Ok(Self::U8),
            (2, _) => Ok(Self::U16),
            (4, _) => Ok(Self::U32),
            (_, IndexWidthPolicy::FallbackToU32) => Ok(Self::U32),
            (other, IndexWidthPolicy::Strict) => Err(DecodeError::MalformedHeader(other)),
        }
    }

    /// Width in bytes.
    #[must_use]
    pub const fn bytes(self) -> usize {
        self as usize
    }

    /// Largest index representable at this width.
    #[must_use]
    pub const fn max_value(self) -> u32 {
        match self {
            Self::U8 => 0xFF,
            Self::U16 => 0xFFFF,
            Self::U32 => u32::MAX,
        }
    }
}

bitflags! {
    /// Optional per-vertex components, from the second header byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Components: u8 {
        const UV = 1 << 0;
        const NORMAL = 1 << 1;
        const COLOR = 1 << 2;
    }
}

impl Components {
    /// Number of 32-bit words in one vertex record.
    ///
    /// Two base words (packed position and color), plus one for each of
    /// normal and UV.
    #[must_use]
    pub fn stride(self) -> usize {
        2 + usize::from(self.contains(Self::NORMAL)) + usize::from(self.contains(Self::UV))
    }

    #[must_use]
    pub fn has_uv(self) -> bool {
        self.contains(Self::UV)
    }

    #[must_use]
    pub fn has_normal(self) -> bool {
        self.contains(Self::NORMAL)
    }

    #[must_use]
    pub fn has_color(self) -> bool {
        self.contains(Self::COLOR)
    }
}

/// The fully decoded preamble of a BOBJ stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormatHeader {
    pub index_width: IndexWidth,
    pub components: Components,
    /// Position scale factor.
    pub scale: f64,
    /// Position origin offset.
    pub origin: Vec3,
    /// Number of 32-bit words in the vertex payload.
    pub vertex_word_count: u32,
    /// Number of indices in the index payload.
    pub index_count: u32,
}

impl FormatHeader {
    /// Number of 32-bit words per vertex record.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.components.stride()
    }

    /// Number of whole vertex records declared by the header.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_word_count as usize / self.stride()
    }

    /// Number of whole triangles declared by the header.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.index_count as usize / 3
    }

    /// Total payload length in bytes, excluding the header.
    #[must_use]
    pub fn payload_len(&self) -> u64 {
        u64::from(self.vertex_word_count) * 4
            + u64::from(self.index_count) * self.index_width.bytes() as u64
    }
}

/// Header fields collected so far.
///
/// Each field is written once, by the state that owns it.
#[derive(Debug, Default)]
pub(crate) struct PartialHeader {
    pub index_width: Option<IndexWidth>,
    pub components: Components,
    pub scale: f64,
    pub origin: Vec3,
    pub vertex_word_count: u32,
}

impl PartialHeader {
    pub fn finish(&self, index_count: u32) -> FormatHeader {
        FormatHeader {
            index_width: self.index_width.unwrap_or(IndexWidth::U32),
            components: self.components,
            scale: self.scale,
            origin: self.origin,
            vertex_word_count: self.vertex_word_count,
            index_count,
        }
    }
}

pub(crate) fn read_f64(field: &[u8]) -> f64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&field[..8]);
    f64::from_le_bytes(raw)
}

pub(crate) fn read_u32(field: &[u8]) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&field[..4]);
    u32::from_le_bytes(raw)
}

pub(crate) fn read_vec3(field: &[u8]) -> Vec3 {
    let component = |i: usize| f32::from_bits(read_u32(&field[i * 4..]));
    Vec3::new(component(0), component(1), component(2))
}
