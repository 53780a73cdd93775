//! Byte-chunk sources.
//!
//! A [`ChunkSource`] yields the stream in order, one chunk per call, and
//! `None` once the stream has ended. Chunk sizes are up to the source.

use std::future::Future;

use bytes::Bytes;

use crate::error::{Error, Result};

/// An ordered sequence of byte chunks with an explicit end.
pub trait ChunkSource: Send {
    type Chunk: AsRef<[u8]> + Send;

    /// Identifier of the asset behind this source, used in errors and logs.
    fn id(&self) -> &str;

    /// Wait for the next chunk. `Ok(None)` marks the end of the stream.
    fn next_chunk(&mut self) -> impl Future<Output = Result<Option<Self::Chunk>>> + Send;
}

/// Response body of an HTTP GET, read chunk by chunk as it arrives.
#[derive(Debug)]
pub struct HttpSource {
    url: String,
    response: reqwest::Response,
}

impl HttpSource {
    /// Wrap a response whose status has already been checked.
    #[must_use]
    pub fn new(url: impl Into<String>, response: reqwest::Response) -> Self {
        Self {
            url: url.into(),
            response,
        }
    }

    /// Declared body length, if the server sent one.
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.response.content_length()
    }
}

impl ChunkSource for HttpSource {
    type Chunk = Bytes;

    fn id(&self) -> &str {
        &self.url
    }

    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        self.response.chunk().await.map_err(|source| Error::Http {
            url: self.url.clone(),
            source,
        })
    }
}

/// A local file, read in fixed-size chunks.
#[cfg(not(target_family = "wasm"))]
#[derive(Debug)]
pub struct FileSource {
    path: String,
    file: tokio::fs::File,
    chunk_size: usize,
}

#[cfg(not(target_family = "wasm"))]
impl FileSource {
    /// Default read size.
    pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

    pub async fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|source| Error::Io {
                path: display.clone(),
                source,
            })?;
        Ok(Self {
            path: display,
            file,
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
        })
    }

    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

#[cfg(not(target_family = "wasm"))]
impl ChunkSource for FileSource {
    type Chunk = Vec<u8>;

    fn id(&self) -> &str {
        &self.path
    }

    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        use tokio::io::AsyncReadExt;

        let mut buf = vec![0; self.chunk_size];
        let n = self.file.read(&mut buf).await.map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })?;
        if n == 0 {
            return Ok(None);
        }
        buf.truncate(n);
        Ok(Some(buf))
    }
}

/// An in-memory stream served in chunks of a fixed size.
///
/// Handy for embedded assets and for exercising chunk boundaries in tests.
#[derive(Debug, Clone)]
pub struct SliceSource {
    id: String,
    data: Bytes,
    chunk_size: usize,
    position: usize,
}

impl SliceSource {
    #[must_use]
    pub fn new(id: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            id: id.into(),
            chunk_size: data.len().max(1),
            data,
            position: 0,
        }
    }

    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Bytes not yet handed out.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }
}

impl ChunkSource for SliceSource {
    type Chunk = Bytes;

    fn id(&self) -> &str {
        &self.id
    }

    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        if self.position == self.data.len() {
            return Ok(None);
        }
        let end = (self.position + self.chunk_size).min(self.data.len());
        let chunk = self.data.slice(self.position..end);
        self.position = end;
        Ok(Some(chunk))
    }
}
