//! CLI library components for the feed tool.

pub mod export;
pub mod logging;
pub mod render;
pub mod session;
