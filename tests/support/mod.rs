#![allow(dead_code)]

use std::path::Path;

use adcanvas::{DrawCall, MemoryImageLoader, TemplateConfig};

pub fn load_template(name: &str) -> TemplateConfig {
    TemplateConfig::from_path(Path::new("tests/data/templates").join(name)).unwrap()
}

/// Encode a solid-color PNG in memory.
pub fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Loader serving the images referenced by `full.json`, except the ones listed in `missing`.
pub fn template_images(missing: &[&str]) -> MemoryImageLoader {
    let mut loader = MemoryImageLoader::new();
    for (location, rgba) in [
        ("pattern.png", [255, 0, 0, 255]),
        ("mask.png", [0, 0, 255, 255]),
        ("stroke.png", [0, 255, 0, 128]),
        ("photo.png", [255, 255, 0, 255]),
    ] {
        if !missing.contains(&location) {
            loader.insert(location, png_bytes(4, 4, rgba));
        }
    }
    loader
}

pub fn call_kinds(calls: &[DrawCall]) -> Vec<&'static str> {
    calls
        .iter()
        .map(|c| match c {
            DrawCall::Clear => "clear",
            DrawCall::FillRect { .. } => "rect",
            DrawCall::FillPath { .. } => "path",
            DrawCall::DrawImage { .. } => "image",
            DrawCall::FillText { .. } => "text",
            DrawCall::Flush => "flush",
        })
        .collect()
}
