//! Reference encoder, used to produce fixtures and test streams.

use glam::Vec3;
use thiserror::Error;

use crate::header::{Components, HEADER_LEN, IndexWidth};

/// Errors produced while encoding a mesh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("index {index} at position {position} does not fit in {width:?}")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        width: IndexWidth,
    },

    #[error("{what} count {len} does not fit in 32 bits")]
    TooLarge { what: &'static str, len: usize },
}

/// Header settings for an encoded mesh.
#[derive(Debug, Clone, Copy)]
pub struct MeshEncoder {
    index_width: IndexWidth,
    components: Components,
    scale: f64,
    origin: Vec3,
}

impl MeshEncoder {
    #[must_use]
    pub fn new(index_width: IndexWidth) -> Self {
        Self {
            index_width,
            components: Components::empty(),
            scale: 1.0,
            origin: Vec3::ZERO,
        }
    }

    #[must_use]
    pub fn components(mut self, components: Components) -> Self {
        self.components = components;
        self
    }

    #[must_use]
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    /// Write the 30-byte header for the given buffer sizes.
    pub fn write_header(&self, out: &mut Vec<u8>, vertex_word_count: u32, index_count: u32) {
        out.push(self.index_width as u8);
        out.push(self.components.bits());
        out.extend_from_slice(&self.scale.to_le_bytes());
        for component in self.origin.to_array() {
            out.extend_from_slice(&component.to_le_bytes());
        }
        out.extend_from_slice(&vertex_word_count.to_le_bytes());
        out.extend_from_slice(&index_count.to_le_bytes());
    }

    /// Encode a complete stream.
    pub fn encode(&self, vertex_words: &[u32], indices: &[u32]) -> Result<Vec<u8>, EncodeError> {
        let word_count = count("vertex word", vertex_words.len())?;
        let index_count = count("index", indices.len())?;

        let width = self.index_width;
        let mut out =
            Vec::with_capacity(HEADER_LEN + vertex_words.len() * 4 + indices.len() * width.bytes());
        self.write_header(&mut out, word_count, index_count);

        for word in vertex_words {
            out.extend_from_slice(&word.to_le_bytes());
        }

        for (position, &index) in indices.iter().enumerate() {
            if index > width.max_value() {
                return Err(EncodeError::IndexOutOfRange {
                    position,
                    index,
                    width,
                });
            }
            out.extend_from_slice(&index.to_le_bytes()[..width.bytes()]);
        }

        Ok(out)
    }
}

fn count(what: &'static str, len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::TooLarge { what, len })
}

/// Encode a mesh with the given header settings.
pub fn encode_mesh(
    encoder: &MeshEncoder,
    vertex_words: &[u32],
    indices: &[u32],
) -> Result<Vec<u8>, EncodeError> {
    encoder.encode(vertex_words, indices)
}
