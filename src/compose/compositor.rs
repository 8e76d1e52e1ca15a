use std::io::Cursor;

use anyhow::Context;

use crate::compose::blend::{over_at_origin, premultiply_in_place, unpremultiply_in_place};
use crate::foundation::error::{TraitstackError, TraitstackResult};

/// Stacks encoded raster buffers into one encoded raster.
///
/// `layers[0]` is the base; later buffers are drawn on top at the same origin. Implementations
/// must be safe to call from several threads at once.
pub trait Compositor: Send + Sync {
    /// Composite `layers` bottom to top and return the encoded result.
    fn composite(&self, layers: &[&[u8]]) -> TraitstackResult<Vec<u8>>;

    /// File extension of the encoded output, without the dot.
    fn extension(&self) -> &str;
}

/// Decodes any format the `image` crate understands and writes PNG.
///
/// The output canvas takes the base layer's dimensions; upper layers are clipped to it.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngCompositor;

impl PngCompositor {
    /// Construct the compositor.
    pub fn new() -> Self {
        Self
    }
}

impl Compositor for PngCompositor {
    fn composite(&self, layers: &[&[u8]]) -> TraitstackResult<Vec<u8>> {
        let Some((base, rest)) = layers.split_first() else {
            return Err(TraitstackError::Other(anyhow::anyhow!(
                "composite needs at least one layer"
            )));
        };

        let (mut canvas, size) = decode_premul(base, 0)?;
        for (i, layer) in rest.iter().enumerate() {
            let (pixels, layer_size) = decode_premul(layer, i + 1)?;
            over_at_origin(&mut canvas, size, &pixels, layer_size)?;
        }
        unpremultiply_in_place(&mut canvas);

        let img = image::RgbaImage::from_raw(size.0, size.1, canvas).ok_or_else(|| {
            TraitstackError::Other(anyhow::anyhow!("composited buffer does not match canvas"))
        })?;
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .context("encode composited png")?;
        Ok(out)
    }

    fn extension(&self) -> &str {
        "png"
    }
}

fn decode_premul(bytes: &[u8], layer: usize) -> TraitstackResult<(Vec<u8>, (u32, u32))> {
    let rgba = image::load_from_memory(bytes)
        .with_context(|| format!("decode layer {layer}"))?
        .to_rgba8();
    let size = rgba.dimensions();
    let mut pixels = rgba.into_raw();
    premultiply_in_place(&mut pixels);
    Ok((pixels, size))
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
