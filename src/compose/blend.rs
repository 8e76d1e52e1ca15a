use crate::foundation::error::{TraitstackError, TraitstackResult};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over for one premultiplied pixel.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = u16::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - sa;
    let mut out = [0u8; 4];
    for i in 0..4 {
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(u16::from(src[i]), dc);
    }
    out
}

/// Draw `src` over `dst` with both anchored at the top-left origin.
///
/// Pixels of `src` outside `dst` are clipped. Both buffers are row-major premultiplied RGBA8.
pub fn over_at_origin(
    dst: &mut [u8],
    dst_size: (u32, u32),
    src: &[u8],
    src_size: (u32, u32),
) -> TraitstackResult<()> {
    let (dw, dh) = (dst_size.0 as usize, dst_size.1 as usize);
    let (sw, sh) = (src_size.0 as usize, src_size.1 as usize);
    if dst.len() != dw * dh * 4 || src.len() != sw * sh * 4 {
        return Err(TraitstackError::Other(anyhow::anyhow!(
            "over_at_origin expects buffers matching width*height*4"
        )));
    }

    let cols = dw.min(sw);
    for y in 0..dh.min(sh) {
        let d_row = &mut dst[y * dw * 4..(y * dw + cols) * 4];
        let s_row = &src[y * sw * 4..(y * sw + cols) * 4];
        for (d, s) in d_row.chunks_exact_mut(4).zip(s_row.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

/// Convert straight-alpha RGBA8 to premultiplied in place.
pub fn premultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = mul_div255(u16::from(px[0]), a) as u8;
        px[1] = mul_div255(u16::from(px[1]), a) as u8;
        px[2] = mul_div255(u16::from(px[2]), a) as u8;
    }
}

/// Convert premultiplied RGBA8 back to straight alpha in place.
pub fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

fn add_sat_u8(a: u16, b: u16) -> u8 {
    (a + b).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/compose/blend.rs"]
mod tests;
