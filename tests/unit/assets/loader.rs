use std::io::Cursor;

use base64::Engine as _;

use super::*;
use crate::foundation::error::ImageLoadErrorKind;

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("adcanvas-loader-{tag}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./a//b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn fs_loader_reads_relative_and_file_urls() {
    let dir = temp_dir("fs");
    std::fs::write(dir.join("pattern.png"), png_bytes(3, 2)).unwrap();
    let loader = FsImageLoader::new(&dir);

    let img = pollster::block_on(loader.load(&ImageRef::location("pattern.png"))).unwrap();
    assert_eq!((img.width, img.height), (3, 2));

    let img = pollster::block_on(loader.load(&ImageRef::location("file://./pattern.png"))).unwrap();
    assert_eq!((img.width, img.height), (3, 2));
}

#[cfg(unix)]
#[test]
fn fs_loader_reads_absolute_file_urls() {
    let dir = temp_dir("abs");
    let path = dir.join("a.png");
    std::fs::write(&path, png_bytes(5, 1)).unwrap();
    let abs = path.to_string_lossy().to_string();
    assert!(abs.starts_with('/'));
    let loader = FsImageLoader::new("/nonexistent-root");

    let img = pollster::block_on(loader.load(&ImageRef::location(format!("file://{abs}")))).unwrap();
    assert_eq!((img.width, img.height), (5, 1));

    let img = pollster::block_on(loader.load(&ImageRef::location(format!(
        "file://localhost{abs}"
    ))))
    .unwrap();
    assert_eq!((img.width, img.height), (5, 1));
}

#[test]
fn data_urls_decode_without_lookup() {
    let b64 = base64::engine::general_purpose::STANDARD.encode(png_bytes(3, 4));
    let url = format!("data:image/png;base64,{b64}");
    let fs = FsImageLoader::new("/nonexistent-root");
    let mem = MemoryImageLoader::new();

    let img = pollster::block_on(fs.load(&ImageRef::location(url.clone()))).unwrap();
    assert_eq!((img.width, img.height), (3, 4));
    let img = pollster::block_on(mem.load(&ImageRef::location(url))).unwrap();
    assert_eq!((img.width, img.height), (3, 4));

    let (head, tail) = b64.split_at(b64.len() / 2);
    let wrapped = format!("data:image/png;BASE64,{head}\n  {tail}");
    let img = pollster::block_on(fs.load(&ImageRef::location(wrapped))).unwrap();
    assert_eq!((img.width, img.height), (3, 4));

    let escaped: String = png_bytes(2, 2)
        .iter()
        .map(|b| format!("%{b:02X}"))
        .collect();
    let img = pollster::block_on(mem.load(&ImageRef::location(format!(
        "data:image/png,{escaped}"
    ))))
    .unwrap();
    assert_eq!((img.width, img.height), (2, 2));
}

#[test]
fn malformed_data_urls_are_decode_errors() {
    let loader = FsImageLoader::new("/nonexistent-root");
    for url in [
        "data:image/png;base64,!!!not-base64!!!",
        "data:image/png;base64",
        "data:image/png,%G0",
        "data:text/plain,hello",
    ] {
        let err = pollster::block_on(loader.load(&ImageRef::location(url))).unwrap_err();
        assert_eq!(err.kind, ImageLoadErrorKind::Decode, "{url}");
        assert!(err.reference.starts_with("<data url"), "{url}");
    }
}

#[test]
fn fs_loader_error_kinds() {
    let dir = temp_dir("errors");
    std::fs::write(dir.join("broken.png"), b"nope").unwrap();
    let loader = FsImageLoader::new(&dir);

    let err = pollster::block_on(loader.load(&ImageRef::location("missing.png"))).unwrap_err();
    assert_eq!(err.kind, ImageLoadErrorKind::Fetch);

    let err = pollster::block_on(loader.load(&ImageRef::location("broken.png"))).unwrap_err();
    assert_eq!(err.kind, ImageLoadErrorKind::Decode);
    assert_eq!(err.reference, "broken.png");

    let err = pollster::block_on(loader.load(&ImageRef::location("https://example.com/a.png")))
        .unwrap_err();
    assert_eq!(err.kind, ImageLoadErrorKind::Unsupported);

    let err = pollster::block_on(loader.load(&ImageRef::location("../escape.png"))).unwrap_err();
    assert_eq!(err.kind, ImageLoadErrorKind::Fetch);
}

#[test]
fn encoded_refs_bypass_location_lookup() {
    let loader = MemoryImageLoader::new();
    let img = pollster::block_on(loader.load(&ImageRef::encoded(png_bytes(4, 4)))).unwrap();
    assert_eq!((img.width, img.height), (4, 4));

    let fs = FsImageLoader::new("/nonexistent-root");
    let img = pollster::block_on(fs.load(&ImageRef::encoded(png_bytes(1, 5)))).unwrap();
    assert_eq!((img.width, img.height), (1, 5));
}

#[test]
fn memory_loader_lookup() {
    let loader = MemoryImageLoader::new().with("mask.png", png_bytes(2, 2));
    assert!(pollster::block_on(loader.load(&ImageRef::location("mask.png"))).is_ok());
    let err = pollster::block_on(loader.load(&ImageRef::location("other.png"))).unwrap_err();
    assert_eq!(err.kind, ImageLoadErrorKind::Fetch);
}

#[test]
fn image_ref_labels_and_serde() {
    assert_eq!(ImageRef::location("a.png").label(), "a.png");
    assert_eq!(
        ImageRef::location("data:image/png;base64,AAAA").label(),
        "<data url, 26 chars>"
    );
    assert_eq!(
        ImageRef::encoded(vec![1u8, 2, 3]).label(),
        "<embedded image, 3 bytes>"
    );
    let r: ImageRef = serde_json::from_str("\"stroke.png\"").unwrap();
    assert_eq!(r, ImageRef::location("stroke.png"));
    assert!(serde_json::from_str::<ImageRef>("\"  \"").is_err());
}
