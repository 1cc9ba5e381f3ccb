/// An 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const OPAQUE_BLACK: Rgba = Rgba([0, 0, 0, 255]);

    pub fn gray(level: u8, alpha: u8) -> Self {
        Self([level, level, level, alpha])
    }

    pub fn alpha(self) -> u8 {
        self.0[3]
    }
}

/// Over-composites `fg` (with its own alpha) onto `bg`.
///
/// Each color channel is `trunc(fg * a + bg * (1 - a))`; the result is
/// always fully opaque.
pub fn blend(fg: Rgba, bg: Rgba) -> Rgba {
    let alpha = fg.alpha() as f64 / 255.0;
    Rgba([
        blend_channel(fg.0[0], bg.0[0], alpha),
        blend_channel(fg.0[1], bg.0[1], alpha),
        blend_channel(fg.0[2], bg.0[2], alpha),
        255,
    ])
}

/// Blends `fg` into the RGBA pixel slice `px` in place.
pub fn blend_into(px: &mut [u8], fg: Rgba) {
    let out = blend(fg, Rgba([px[0], px[1], px[2], px[3]]));
    px[..4].copy_from_slice(&out.0);
}

#[inline]
pub fn blend_channel(fg: u8, bg: u8, alpha: f64) -> u8 {
    (fg as f64 * alpha + bg as f64 * (1.0 - alpha)) as u8
}

/// Quantizes a unit opacity to 8 bits by truncation.
pub fn unit_to_alpha(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}
