//! Layer compositing.

/// Premultiplied RGBA8 blend math.
pub mod blend;
/// Compositor contract and the built-in PNG compositor.
pub mod compositor;
