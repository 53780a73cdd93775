//! Async client for streaming and decoding BOBJ meshes.
//!
//! Meshes are decoded while their bytes arrive: the response body (or file)
//! is pulled one chunk at a time and fed to a
//! [`MeshDecoder`](bobj_decode::MeshDecoder), so memory use is bounded by the
//! decoded buffers plus a single chunk.
//!
//! # Example
//!
//! ```no_run
//! use bobj::{Client, MemoryCache};
//!
//! # async fn example() -> Result<(), bobj::Error> {
//! let client = Client::with_cache(MemoryCache::new());
//! let mesh = client.fetch_mesh("https://example.com/models/teapot.bobj").await?;
//! println!("{} vertices, {} triangles", mesh.vertex_count(), mesh.triangle_count());
//! # Ok(())
//! # }
//! ```
//!
//! Any [`ChunkSource`] can be decoded directly with [`decode_stream`].

mod cache;
mod client;
mod error;
mod source;
mod stream;

pub use bobj_decode as decode;
pub use bobj_decode::{
    DecodeError, DecodeLimits, DecodeOptions, IndexBuffer, IndexWidth, IndexWidthPolicy,
    MeshBuffers, TrailingDataPolicy,
};
pub use cache::{Cache, MemoryCache, NoCache};
pub use client::{Client, ClientOptions};
pub use error::{Error, Result};
#[cfg(not(target_family = "wasm"))]
pub use source::FileSource;
pub use source::{ChunkSource, HttpSource, SliceSource};
pub use stream::decode_stream;
