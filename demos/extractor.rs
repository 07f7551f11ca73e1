// SPDX-FileCopyrightText: 2026 cache317 contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::env;
use std::fs::File;
use std::io::Write;

use cache317::cache::{CacheData, CacheLayout};
use cache317::resource::{ResourceResolver, UnpackedResource};

/// A simple program that decodes an object and writes its mesh out as a Wavefront OBJ file
fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        println!("Usage: extractor [cache dir] [object id] [destination]");
        return;
    }

    // Collect our arguments
    let cache_dir = &args[1];
    let Ok(object_id) = args[2].parse::<u32>() else {
        println!("{} is not a valid object id!", args[2]);
        return;
    };
    let destination_path = &args[3];

    let mut resolver = ResourceResolver::new();
    resolver.add_source(UnpackedResource::from_existing(cache_dir));

    let mut cache = CacheData::new(resolver, CacheLayout::default());

    let object = match cache.object(object_id) {
        Ok(object) => object,
        Err(err) => {
            println!("Failed to read object {}: {}", object_id, err);
            return;
        }
    };

    println!("{:#?}", object);

    // The mesh comes back already recolored and scaled for this object.
    let mesh = match cache.mesh_for(&object) {
        Ok(mesh) => mesh,
        Err(err) => {
            println!("Failed to read mesh {}: {}", object.model_id, err);
            return;
        }
    };

    let mut contents = String::new();
    for i in 0..mesh.vertex_count() {
        if let Some(vertex) = mesh.vertex(i) {
            contents.push_str(&format!("v {} {} {}\n", vertex.x, -vertex.y, vertex.z));
        }
    }
    for i in 0..mesh.triangle_count() {
        if let Some([a, b, c]) = mesh.triangle(i) {
            // OBJ indices are 1-based
            contents.push_str(&format!("f {} {} {}\n", a + 1, b + 1, c + 1));
        }
    }

    // Create the file to write into.
    let Ok(mut file) = File::create(destination_path) else {
        println!("Failed to open file {} for writing.", destination_path);
        return;
    };

    if file.write_all(contents.as_bytes()).is_err() {
        println!("Failed to write to file {}.", destination_path);
        return;
    };

    println!(
        "Successfully extracted object {} ({} vertices, {} triangles) to {}!",
        object_id,
        mesh.vertex_count(),
        mesh.triangle_count(),
        destination_path
    );
}
