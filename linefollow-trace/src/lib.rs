pub mod trace;

#[cfg(feature = "render")]
pub mod render;
