//! Load BOBJ meshes from URLs or files and report what they contain.
//!
//! Usage: `bobj-client [--strict-trailing] [--fallback-index-width] <url-or-path>...`

mod loader;

use std::process::ExitCode;
use std::sync::Arc;

use bobj::{
    Client, ClientOptions, DecodeOptions, IndexWidthPolicy, MemoryCache, MeshBuffers,
    TrailingDataPolicy,
};

use crate::loader::MeshLoader;

const USAGE: &str =
    "usage: bobj-client [--strict-trailing] [--fallback-index-width] <url-or-path>...";

/// Parsed command line.
#[derive(Debug, PartialEq, Eq)]
struct Args {
    decode: DecodeOptions,
    locations: Vec<String>,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut decode = DecodeOptions::default();
        let mut locations = Vec::new();

        for arg in args {
            if arg == "--strict-trailing" {
                decode = decode.with_trailing_data(TrailingDataPolicy::Reject);
            } else if arg == "--fallback-index-width" {
                decode = decode.with_index_width(IndexWidthPolicy::FallbackToU32);
            } else if arg.starts_with("--") {
                return Err(format!("unknown flag: {arg}"));
            } else {
                locations.push(arg);
            }
        }

        if locations.is_empty() {
            return Err("no meshes given".to_owned());
        }
        Ok(Self { decode, locations })
    }
}

/// Checks a renderer would make before building GPU buffers.
fn consumer_warnings(mesh: &MeshBuffers) -> Vec<String> {
    let mut warnings = Vec::new();
    let header = mesh.header();

    if header.index_count % 3 != 0 {
        warnings.push(format!(
            "index count {} is not a multiple of 3",
            header.index_count
        ));
    }
    if mesh.vertex_words().len() % mesh.stride() != 0 {
        warnings.push(format!(
            "{} vertex words do not divide into records of {}",
            mesh.vertex_words().len(),
            mesh.stride()
        ));
    }
    if let Some(max) = mesh.indices().max_index()
        && max as usize >= mesh.vertex_count()
    {
        warnings.push(format!(
            "index {max} out of range for {} vertices",
            mesh.vertex_count()
        ));
    }
    warnings
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let options = ClientOptions {
        decode: args.decode,
        ..ClientOptions::default()
    };
    let client = match Client::with_options(MemoryCache::new(), options) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut loader = MeshLoader::new(client, tokio::runtime::Handle::current());
    for location in &args.locations {
        loader.request(location.clone(), location.clone());
    }

    let mut failed = 0usize;
    while let Some(loaded) = loader.recv().await {
        // Failures are logged by the loader.
        let Ok(mesh) = loaded.result else {
            failed += 1;
            continue;
        };

        let header = mesh.header();
        tracing::info!(
            "Loaded mesh '{}': {} vertices ({} words each), {} triangles, {}-byte indices, scale={}, origin={}",
            loaded.id,
            mesh.vertex_count(),
            mesh.stride(),
            mesh.triangle_count(),
            header.index_width.bytes(),
            header.scale,
            header.origin
        );
        for warning in consumer_warnings(&mesh) {
            tracing::warn!("Mesh '{}' from {}: {}", loaded.id, loaded.location, warning);
        }
    }

    if failed > 0 {
        tracing::error!("{} of {} meshes failed to load", failed, args.locations.len());
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
