//! Pull loop driving a [`MeshDecoder`] from a [`ChunkSource`].

use bobj_decode::{DecodeOptions, MeshBuffers, MeshDecoder, Status, TrailingDataPolicy};

use crate::error::{Error, Result};
use crate::source::ChunkSource;

/// Decode a mesh from `source`.
///
/// Chunks are requested one at a time, and the next one only after the
/// current one has been fully decoded. Once the mesh is complete no further
/// chunks are requested, except under [`TrailingDataPolicy::Reject`], where
/// the source is polled exactly once more and any bytes it returns fail the
/// decode.
///
/// Fails with [`DecodeError::IncompleteStream`](bobj_decode::DecodeError)
/// if the source ends early, and passes source failures through unchanged.
pub async fn decode_stream<S: ChunkSource>(
    source: &mut S,
    options: DecodeOptions,
) -> Result<MeshBuffers> {
    let id = source.id().to_owned();
    let mut decoder = MeshDecoder::with_options(options);
    let mut chunks = 0usize;
    let mut header_logged = false;

    tracing::debug!("Decoding mesh from {}", id);

    // `finish` below reports a stream that ends before the mesh is done.
    while let Some(chunk) = source.next_chunk().await? {
        chunks += 1;
        let status = decoder
            .feed(chunk.as_ref())
            .map_err(|e| Error::decode(&id, e))?;

        if !header_logged && let Some(header) = decoder.header() {
            tracing::trace!(
                "{}: {} vertex words, {} indices of {} bytes",
                id,
                header.vertex_word_count,
                header.index_count,
                header.index_width.bytes()
            );
            header_logged = true;
        }

        if let Status::Complete { trailing } = status {
            if trailing > 0 {
                tracing::warn!("{}: ignoring {} bytes after mesh payload", id, trailing);
            }
            break;
        }
    }

    // Sources may be unbounded, so only one more chunk is looked at.
    if decoder.is_done()
        && options.trailing_data == TrailingDataPolicy::Reject
        && let Some(chunk) = source.next_chunk().await?
    {
        decoder
            .feed(chunk.as_ref())
            .map_err(|e| Error::decode(&id, e))?;
    }

    let consumed = decoder.bytes_consumed();
    let mesh = decoder.finish().map_err(|e| Error::decode(&id, e))?;

    tracing::debug!(
        "Decoded {}: {} vertices, {} triangles from {} bytes in {} chunks",
        id,
        mesh.vertex_count(),
        mesh.triangle_count(),
        consumed,
        chunks
    );

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use bobj_decode::encode::MeshEncoder;
    use bobj_decode::{Components, DecodeError, DecodeState, IndexBuffer, IndexWidth};
    use bytes::Bytes;

    use super::*;
    use crate::source::SliceSource;

    fn scenario_bytes() -> Vec<u8> {
        MeshEncoder::new(IndexWidth::U8)
            .components(Components::UV)
            .scale(1.5)
            .encode(&[1, 2, 3, 4, 5, 6], &[0, 1, 0])
            .unwrap()
    }

    /// Serves fixed chunks, then optionally fails instead of ending.
    struct ScriptedSource {
        chunks: Vec<Vec<u8>>,
        fail_at_end: bool,
        requested: usize,
    }

    impl ScriptedSource {
        fn new(chunks: Vec<Vec<u8>>) -> Self {
            Self {
                chunks,
                fail_at_end: false,
                requested: 0,
            }
        }
    }

    impl ChunkSource for ScriptedSource {
        type Chunk = Vec<u8>;

        fn id(&self) -> &str {
            "scripted"
        }

        async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
            self.requested += 1;
            if self.chunks.is_empty() {
                if self.fail_at_end {
                    return Err(Error::MissingBody {
                        url: "scripted".to_owned(),
                    });
                }
                return Ok(None);
            }
            Ok(Some(self.chunks.remove(0)))
        }
    }

    #[tokio::test]
    async fn test_decode_single_byte_chunks() {
        let mut source = SliceSource::new("mem", scenario_bytes()).with_chunk_size(1);
        let mesh = decode_stream(&mut source, DecodeOptions::default())
            .await
            .unwrap();
        assert_eq!(mesh.vertex_words(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(mesh.indices(), &IndexBuffer::U8(vec![0, 1, 0]));
    }

    #[tokio::test]
    async fn test_stops_requesting_after_done() {
        let bytes = scenario_bytes();
        let mut source = ScriptedSource::new(vec![
            bytes[..10].to_vec(),
            bytes[10..].to_vec(),
            vec![0xFF; 4],
        ]);
        decode_stream(&mut source, DecodeOptions::default())
            .await
            .unwrap();
        assert_eq!(source.requested, 2);
        assert_eq!(source.chunks.len(), 1);
    }

    #[tokio::test]
    async fn test_reject_trailing_chunk() {
        let bytes = scenario_bytes();
        let mut source = ScriptedSource::new(vec![bytes, vec![0xFF, 0xFF]]);
        let options = DecodeOptions::default().with_trailing_data(TrailingDataPolicy::Reject);
        let err = decode_stream(&mut source, options).await.unwrap_err();
        assert_eq!(err.decode_error(), Some(&DecodeError::TrailingData(2)));
        assert_eq!(source.requested, 2);
    }

    /// Serves one mesh, then empty chunks forever.
    struct EndlessSource {
        payload: Option<Vec<u8>>,
        polls: usize,
    }

    impl ChunkSource for EndlessSource {
        type Chunk = Vec<u8>;

        fn id(&self) -> &str {
            "endless"
        }

        async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
            self.polls += 1;
            Ok(Some(self.payload.take().unwrap_or_default()))
        }
    }

    #[tokio::test]
    async fn test_reject_returns_on_endless_source() {
        let mut source = EndlessSource {
            payload: Some(scenario_bytes()),
            polls: 0,
        };
        let options = DecodeOptions::default().with_trailing_data(TrailingDataPolicy::Reject);
        let mesh = tokio::time::timeout(
            std::time::Duration::from_secs(2),
            decode_stream(&mut source, options),
        )
        .await
        .expect("decode_stream did not return")
        .unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(source.polls, 2);
    }

    #[tokio::test]
    async fn test_reject_passes_clean_stream() {
        let mut source = SliceSource::new("mem", Bytes::from(scenario_bytes())).with_chunk_size(5);
        let options = DecodeOptions::default().with_trailing_data(TrailingDataPolicy::Reject);
        let mesh = decode_stream(&mut source, options).await.unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[tokio::test]
    async fn test_incomplete_stream() {
        let bytes = scenario_bytes();
        let mut source = SliceSource::new("short", bytes[..32].to_vec()).with_chunk_size(7);
        let err = decode_stream(&mut source, DecodeOptions::default())
            .await
            .unwrap_err();
        assert!(!err.is_transport());
        assert!(matches!(
            err,
            Error::Decode {
                ref source_id,
                source: DecodeError::IncompleteStream {
                    state: DecodeState::VertexData,
                    consumed: 32,
                },
            } if source_id == "short"
        ));
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let bytes = scenario_bytes();
        let mut source = ScriptedSource::new(vec![bytes[..20].to_vec()]);
        source.fail_at_end = true;
        let err = decode_stream(&mut source, DecodeOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert!(matches!(err, Error::MissingBody { .. }));
    }

    #[tokio::test]
    async fn test_malformed_header() {
        let mut bytes = scenario_bytes();
        bytes[0] = 7;
        let mut source = SliceSource::new("bad", bytes);
        let err = decode_stream(&mut source, DecodeOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.decode_error(), Some(&DecodeError::MalformedHeader(7)));
    }
}
