//! Preview renderers.

pub mod turtle;
