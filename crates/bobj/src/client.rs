//! Fetch client.

use std::sync::Arc;

use bobj_decode::{DecodeOptions, MeshBuffers};

use crate::cache::{Cache, NoCache};
use crate::error::{Error, Result};
use crate::source::HttpSource;
use crate::stream::decode_stream;

/// Settings for a [`Client`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Options applied to every decode session.
    pub decode: DecodeOptions,
    /// `User-Agent` header sent with each request.
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            decode: DecodeOptions::default(),
            user_agent: concat!("bobj/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

/// Client for fetching and decoding BOBJ meshes.
///
/// Meshes are decoded while the body streams in; the raw bytes are never
/// collected. Decoded meshes are kept in the cache `C`, keyed by location.
#[derive(Debug)]
pub struct Client<C = NoCache> {
    http: reqwest::Client,
    cache: C,
    options: ClientOptions,
}

impl Client<NoCache> {
    /// Create a client without caching and with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_cache(NoCache)
    }
}

impl Default for Client<NoCache> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Cache> Client<C> {
    /// Create a client with the given cache and default options.
    #[must_use]
    pub fn with_cache(cache: C) -> Self {
        Self {
            http: reqwest::Client::new(),
            cache,
            options: ClientOptions::default(),
        }
    }

    /// Create a client with the given cache and options.
    ///
    /// The user agent is also set on each request, so clients made with
    /// [`Client::with_cache`] send it too.
    pub fn with_options(cache: C, options: ClientOptions) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(options.user_agent.clone())
            .build()
            .map_err(Error::Client)?;
        Ok(Self {
            http,
            cache,
            options,
        })
    }

    #[must_use]
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    #[must_use]
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Send a GET request and hand back the body as a chunk source.
    ///
    /// Non-success statuses and empty bodies fail here, before any decoding.
    pub async fn open_url(&self, url: &str) -> Result<HttpSource> {
        let response = self
            .http
            .get(url)
            .header(reqwest::header::USER_AGENT, self.options.user_agent.as_str())
            .send()
            .await
            .map_err(|source| Error::Http {
                url: url.to_owned(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_owned(),
                status,
            });
        }
        if status == reqwest::StatusCode::NO_CONTENT || response.content_length() == Some(0) {
            return Err(Error::MissingBody {
                url: url.to_owned(),
            });
        }

        Ok(HttpSource::new(url, response))
    }

    /// Fetch and decode the mesh at `url`.
    pub async fn fetch_mesh(&self, url: &str) -> Result<Arc<MeshBuffers>> {
        if let Some(mesh) = self.cache.get(url) {
            tracing::debug!("Cache hit for {}", url);
            return Ok(mesh);
        }

        let mut source = self.open_url(url).await?;
        let mesh = Arc::new(decode_stream(&mut source, self.options.decode).await?);
        self.cache.insert(url, Arc::clone(&mesh));
        Ok(mesh)
    }

    /// Decode the mesh stored in a local file.
    #[cfg(not(target_family = "wasm"))]
    pub async fn load_file(&self, path: impl AsRef<std::path::Path>) -> Result<Arc<MeshBuffers>> {
        let path = path.as_ref();
        let key = path.display().to_string();
        if let Some(mesh) = self.cache.get(&key) {
            tracing::debug!("Cache hit for {}", key);
            return Ok(mesh);
        }

        let mut source = crate::source::FileSource::open(path).await?;
        let mesh = Arc::new(decode_stream(&mut source, self.options.decode).await?);
        self.cache.insert(&key, Arc::clone(&mesh));
        Ok(mesh)
    }

    /// Load a mesh from an `http://` or `https://` URL, or from a local path
    /// (optionally prefixed with `file://`).
    pub async fn load(&self, location: &str) -> Result<Arc<MeshBuffers>> {
        if location.starts_with("http://") || location.starts_with("https://") {
            return self.fetch_mesh(location).await;
        }

        self.load_local(location.strip_prefix("file://").unwrap_or(location))
            .await
    }

    #[cfg(not(target_family = "wasm"))]
    async fn load_local(&self, path: &str) -> Result<Arc<MeshBuffers>> {
        self.load_file(path).await
    }

    #[cfg(target_family = "wasm")]
    async fn load_local(&self, path: &str) -> Result<Arc<MeshBuffers>> {
        Err(Error::Io {
            path: path.to_owned(),
            source: std::io::Error::from(std::io::ErrorKind::Unsupported),
        })
    }
}
