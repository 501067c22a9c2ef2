//! Layer resolution and text layout.

pub(crate) mod resolver;
pub(crate) mod text;
