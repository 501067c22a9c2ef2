//! Template configuration and per-render state.

pub(crate) mod model;
pub(crate) mod state;
