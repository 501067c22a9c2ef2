use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine;

use crate::assets::decode::{DecodedImage, decode_image};
use crate::foundation::error::{AdError, AdResult, ImageLoadError};

/// Reference to an image that a loader can resolve.
#[derive(Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Location string (relative path, `file://` URL, `data:` URL or other URL) interpreted by
    /// the loader.
    Location(String),
    /// Encoded image bytes held in memory (PNG, JPEG, ...).
    Encoded(Arc<[u8]>),
}

impl ImageRef {
    /// Reference an image by location.
    pub fn location(s: impl Into<String>) -> Self {
        Self::Location(s.into())
    }

    /// Reference encoded image bytes held in memory.
    pub fn encoded(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Encoded(bytes.into())
    }

    /// Short label for logs and errors. Never contains image bytes.
    pub fn label(&self) -> String {
        match self {
            ImageRef::Location(s) if s.starts_with(DATA_URL_PREFIX) => {
                format!("<data url, {} chars>", s.len())
            }
            ImageRef::Location(s) => s.clone(),
            ImageRef::Encoded(b) => format!("<embedded image, {} bytes>", b.len()),
        }
    }
}

impl std::fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageRef::Location(s) => f.debug_tuple("Location").field(s).finish(),
            ImageRef::Encoded(b) => f.debug_tuple("Encoded").field(&b.len()).finish(),
        }
    }
}

impl<'de> serde::Deserialize<'de> for ImageRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.trim().is_empty() {
            return Err(serde::de::Error::custom("image reference must be non-empty"));
        }
        Ok(Self::Location(s))
    }
}

/// Capability that turns an [`ImageRef`] into pixels.
///
/// This is the only asynchronous boundary of the engine. Every call is independent: loaders are
/// not expected to cache or deduplicate, and the renderer calls `load` once per image layer, per
/// render.
pub trait ImageLoader {
    /// Resolve and decode one image.
    fn load(&self, image: &ImageRef) -> impl Future<Output = Result<DecodedImage, ImageLoadError>>;
}

fn decode_for(image: &ImageRef, bytes: &[u8]) -> Result<DecodedImage, ImageLoadError> {
    decode_image(bytes).map_err(|e| ImageLoadError::decode(image.label(), format!("{e:#}")))
}

const DATA_URL_PREFIX: &str = "data:";

/// Payload bytes of a `data:` URL, or `None` when `location` is not one.
///
/// Metadata ends at the first comma. A `;base64` parameter selects base64 (ASCII whitespace is
/// ignored); otherwise the payload is percent-decoded.
fn data_url_bytes(image: &ImageRef, location: &str) -> Option<Result<Vec<u8>, ImageLoadError>> {
    let rest = location.strip_prefix(DATA_URL_PREFIX)?;
    let Some((metadata, data)) = rest.split_once(',') else {
        return Some(Err(ImageLoadError::decode(
            image.label(),
            "missing comma in data URL",
        )));
    };

    let is_base64 = metadata
        .split(';')
        .skip(1)
        .any(|param| param.trim().eq_ignore_ascii_case("base64"));
    let bytes = if is_base64 {
        let cleaned: Vec<u8> = data
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        base64::engine::general_purpose::STANDARD
            .decode(cleaned)
            .map_err(|e| ImageLoadError::decode(image.label(), format!("invalid base64: {e}")))
    } else {
        percent_decode(data)
            .map_err(|reason| ImageLoadError::decode(image.label(), reason))
    };
    Some(bytes)
}

fn percent_decode(input: &str) -> Result<Vec<u8>, String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        let hex = bytes
            .get(i + 1..i + 3)
            .filter(|pair| pair.iter().all(u8::is_ascii_hexdigit))
            .and_then(|pair| std::str::from_utf8(pair).ok())
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .ok_or_else(|| format!("invalid percent-escape at byte {i}"))?;
        out.push(hex);
        i += 3;
    }
    Ok(out)
}

/// Loader that reads locations from a directory on the local filesystem.
///
/// Relative locations are resolved under `root`. `file:///abs/path` (or `file://localhost/...`)
/// names an absolute path; any other `file://` remainder is resolved under `root` like a plain
/// relative location. `data:` URLs are decoded in memory. Network URLs are rejected as
/// unsupported: fetching remote images is left to the caller.
///
/// Reads are blocking `std::fs` calls made inside `load`; the returned future completes on its
/// first poll.
#[derive(Clone, Debug)]
pub struct FsImageLoader {
    root: PathBuf,
}

impl FsImageLoader {
    /// Create a loader rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory relative locations are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, location: &str) -> Result<PathBuf, ImageLoadError> {
        if let Some((scheme, _)) = location.split_once("://")
            && scheme != "file"
        {
            return Err(ImageLoadError::unsupported(
                location,
                format!("scheme '{scheme}' is not handled by the filesystem loader"),
            ));
        }
        let raw = match location.strip_prefix("file://") {
            Some(rest) => {
                let rest = rest
                    .strip_prefix("localhost")
                    .filter(|path| path.starts_with('/'))
                    .unwrap_or(rest);
                if rest.starts_with('/') {
                    return Ok(PathBuf::from(rest));
                }
                rest
            }
            None => location,
        };
        let norm =
            normalize_rel_path(raw).map_err(|e| ImageLoadError::fetch(location, e.to_string()))?;
        Ok(self.root.join(Path::new(&norm)))
    }
}

impl ImageLoader for FsImageLoader {
    async fn load(&self, image: &ImageRef) -> Result<DecodedImage, ImageLoadError> {
        match image {
            ImageRef::Encoded(bytes) => decode_for(image, bytes),
            ImageRef::Location(location) => {
                if let Some(bytes) = data_url_bytes(image, location) {
                    return decode_for(image, &bytes?);
                }
                let path = self.resolve(location)?;
                let bytes = std::fs::read(&path).map_err(|e| {
                    ImageLoadError::fetch(location.as_str(), format!("read '{}': {e}", path.display()))
                })?;
                decode_for(image, &bytes)
            }
        }
    }
}

/// Loader backed by an in-memory table of encoded images keyed by location.
///
/// `data:` URLs are decoded directly and never looked up. Bytes are decoded again on every
/// `load`.
#[derive(Clone, Debug, Default)]
pub struct MemoryImageLoader {
    entries: HashMap<String, Arc<[u8]>>,
}

impl MemoryImageLoader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register encoded bytes under `location`, replacing any previous entry.
    pub fn insert(&mut self, location: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        self.entries.insert(location.into(), bytes.into());
    }

    /// Builder-style [`MemoryImageLoader::insert`].
    pub fn with(mut self, location: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        self.insert(location, bytes);
        self
    }
}

impl ImageLoader for MemoryImageLoader {
    async fn load(&self, image: &ImageRef) -> Result<DecodedImage, ImageLoadError> {
        match image {
            ImageRef::Encoded(bytes) => decode_for(image, bytes),
            ImageRef::Location(location) => {
                if let Some(bytes) = data_url_bytes(image, location) {
                    return decode_for(image, &bytes?);
                }
                let bytes = self.entries.get(location).ok_or_else(|| {
                    ImageLoadError::fetch(location.as_str(), "no such entry in memory loader")
                })?;
                decode_for(image, bytes)
            }
        }
    }
}

/// Normalize and validate asset-relative paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub(crate) fn normalize_rel_path(source: &str) -> AdResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(AdError::configuration("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(AdError::configuration("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(AdError::configuration("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(AdError::configuration(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
