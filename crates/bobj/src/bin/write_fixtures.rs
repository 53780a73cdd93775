//! Write BOBJ fixture files for manual testing and for other implementations.
//!
//! Each fixture is written as a `.bobj` stream plus a `.json` summary of the
//! values it was encoded from.
//!
//! Run: `cargo run -p bobj --features test-tools --bin write_fixtures -- [output_dir]`

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use bobj::decode::{Components, Vec3};
use bobj::decode::encode::MeshEncoder;
use bobj::{DecodeOptions, IndexWidth};

const DEFAULT_OUTPUT_DIR: &str = "fixtures";

struct Fixture {
    name: &'static str,
    encoder: MeshEncoder,
    vertex_words: Vec<u32>,
    indices: Vec<u32>,
}

fn fixtures() -> Vec<Fixture> {
    // A unit quad with position+color, normal and UV words per vertex.
    let quad_words: Vec<u32> = (0..4u32)
        .flat_map(|v| [v, 0xFF00_00FF, 0x7F7F_FF00, v * 0x4000])
        .collect();

    // A 16x16 grid, two words per vertex, 4-byte indices.
    let grid = 16u32;
    let grid_words: Vec<u32> = (0..grid * grid).flat_map(|v| [v, 0xFFFF_FFFF]).collect();
    let grid_indices: Vec<u32> = (0..grid - 1)
        .flat_map(|y| (0..grid - 1).map(move |x| (x, y)))
        .flat_map(|(x, y)| {
            let i = y * grid + x;
            [i, i + 1, i + grid, i + 1, i + grid + 1, i + grid]
        })
        .collect();

    vec![
        Fixture {
            name: "empty",
            encoder: MeshEncoder::new(IndexWidth::U16),
            vertex_words: Vec::new(),
            indices: Vec::new(),
        },
        Fixture {
            name: "two_vertices_uv",
            encoder: MeshEncoder::new(IndexWidth::U8)
                .components(Components::UV)
                .scale(1.5),
            vertex_words: vec![1, 2, 3, 4, 5, 6],
            indices: vec![0, 1, 0],
        },
        Fixture {
            name: "quad_full",
            encoder: MeshEncoder::new(IndexWidth::U16)
                .components(Components::all())
                .scale(0.01)
                .origin(Vec3::new(-0.5, -0.5, 0.0)),
            vertex_words: quad_words,
            indices: vec![0, 1, 2, 2, 1, 3],
        },
        Fixture {
            name: "grid_u32",
            encoder: MeshEncoder::new(IndexWidth::U32).scale(0.5),
            vertex_words: grid_words,
            indices: grid_indices,
        },
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let output_dir = args.get(1).map_or(DEFAULT_OUTPUT_DIR, String::as_str);
    let output_path = Path::new(output_dir);
    fs::create_dir_all(output_path)?;

    println!("Writing fixtures to '{}'...\n", output_path.display());

    for fixture in fixtures() {
        let bytes = fixture
            .encoder
            .encode(&fixture.vertex_words, &fixture.indices)?;

        // Make sure the fixture decodes before saving it.
        let mesh = bobj::decode::decode_slice(&bytes, DecodeOptions::default())?;

        let bobj_path = output_path.join(format!("{}.bobj", fixture.name));
        File::create(&bobj_path)?.write_all(&bytes)?;

        let header = mesh.header();
        let summary = serde_json::json!({
            "name": fixture.name,
            "byte_len": bytes.len(),
            "index_width": header.index_width.bytes(),
            "components": header.components.bits(),
            "scale": header.scale,
            "origin": header.origin.to_array(),
            "stride": mesh.stride(),
            "vertex_word_count": header.vertex_word_count,
            "vertex_count": mesh.vertex_count(),
            "index_count": header.index_count,
            "triangle_count": mesh.triangle_count(),
            "first_vertex_words": mesh.vertex_words().iter().take(16).collect::<Vec<_>>(),
            "first_indices": mesh.indices().iter().take(24).collect::<Vec<_>>(),
        });
        let json_path = output_path.join(format!("{}.json", fixture.name));
        File::create(&json_path)?.write_all(serde_json::to_string_pretty(&summary)?.as_bytes())?;

        println!(
            "  {}: {} bytes, {} vertices, {} triangles",
            fixture.name,
            bytes.len(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );
    }

    println!("\nLoad one with: cargo run -p bobj-client -- {output_dir}/quad_full.bobj");

    Ok(())
}
