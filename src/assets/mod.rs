//! Image references, loaders and decoding.

pub(crate) mod decode;
pub(crate) mod loader;
