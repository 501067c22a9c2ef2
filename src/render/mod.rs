//! Surfaces and the draw pipeline.

pub(crate) mod cpu;
pub(crate) mod pipeline;
pub(crate) mod recording;
pub(crate) mod rounded_rect;
pub(crate) mod surface;
