//! Incremental decoding of BOBJ binary meshes.
//!
//! This crate turns a BOBJ byte stream into vertex and index buffers without
//! ever holding the whole stream in memory. Bytes can arrive in chunks of any
//! size and alignment: fields split across chunks are reassembled in a small
//! carry buffer.
//!
//! # Design principles
//!
//! - **Synchronous**: No async, no threading primitives; the caller drives
//!   the decoder one chunk at a time
//! - **Bounded memory**: Output buffers are sized from the header before any
//!   payload arrives, and never grow past it
//! - **Web-compatible**: Compiles to WASM
//!
//! # Format
//!
//! All values are little-endian.
//!
//! | Offset | Size | Field |
//! |---|---|---|
//! | 0 | 1 | index width (1, 2 or 4) |
//! | 1 | 1 | components: bit 0 UV, bit 1 normal, bit 2 color |
//! | 2 | 8 | scale (`f64`) |
//! | 10 | 12 | origin offset (3 × `f32`) |
//! | 22 | 4 | vertex word count (`u32`) |
//! | 26 | 4 | index count (`u32`) |
//! | 30 | 4 × words | vertex words (`u32`) |
//! | … | width × count | indices |
//!
//! # Key items
//!
//! - [`MeshDecoder`]: the chunk-fed state machine
//! - [`decode_slice`]: decode a stream already in memory
//! - [`MeshBuffers`]: the finished vertex and index buffers
//! - [`encode::MeshEncoder`]: reference encoder

mod carry;
mod decoder;
mod error;
mod header;
mod mesh;
mod options;

pub mod encode;

pub use carry::MAX_FIELD_WIDTH;
pub use glam::Vec3;

pub use decoder::{DecodeState, MeshDecoder, Status, decode_slice};
pub use error::{DecodeError, DecodeResult};
pub use header::{Components, FormatHeader, HEADER_LEN, IndexWidth};
pub use mesh::{IndexBuffer, MeshBuffers};
pub use options::{DecodeLimits, DecodeOptions, IndexWidthPolicy, TrailingDataPolicy};
