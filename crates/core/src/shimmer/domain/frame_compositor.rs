use std::f64::consts::TAU;

use ndarray::s;

use crate::shared::frame::{Frame, RGBA_CHANNELS};
use crate::shared::spoiler_config::ShimmerSettings;
use crate::shimmer::domain::alpha_blend::{blend_channel, blend_into, unit_to_alpha, Rgba};
use crate::shimmer::domain::shimmer_dot::ShimmerDot;

/// Dot opacity in `[0, 1]` at `frame_index` of `frame_count`.
///
/// All dots share the oscillation `speed * 2π * (index / count)` and differ
/// only by their phase offset.
pub fn shimmer_brightness(
    frame_index: usize,
    frame_count: usize,
    shimmer_speed: f64,
    phase: f64,
) -> f64 {
    let progress = if frame_count == 0 {
        0.0
    } else {
        frame_index as f64 / frame_count as f64
    };
    let center = shimmer_speed * TAU * progress;
    0.5 + 0.5 * (center + phase).sin()
}

/// Composites a black overlay of opacity `darken_fraction` over every pixel.
pub fn darken(frame: &mut Frame, darken_fraction: f64) {
    debug_assert_eq!(frame.channels(), RGBA_CHANNELS);
    let alpha = unit_to_alpha(darken_fraction) as f64 / 255.0;
    let mut pixels = frame.as_ndarray_mut();
    pixels
        .slice_mut(s![.., .., 0..3])
        .mapv_inplace(|bg| blend_channel(0, bg, alpha));
    pixels.slice_mut(s![.., .., 3]).fill(255);
}

/// Composites a `size x size` square of `dot`'s gray at `alpha`, with its
/// top-left corner at the dot position, clipped to the frame.
pub fn draw_dot(frame: &mut Frame, dot: &ShimmerDot, size: u32, alpha: u8) {
    debug_assert_eq!(frame.channels(), RGBA_CHANNELS);
    let width = frame.width();
    let x_end = dot.x.saturating_add(size).min(width);
    let y_end = dot.y.saturating_add(size).min(frame.height());
    let color = Rgba::gray(dot.gray, alpha);
    let channels = RGBA_CHANNELS as usize;
    let data = frame.data_mut();
    for y in dot.y..y_end {
        for x in dot.x..x_end {
            let offset = (y as usize * width as usize + x as usize) * channels;
            blend_into(&mut data[offset..offset + channels], color);
        }
    }
}

/// Renders frame `index`: base copy, darken overlay, then every dot at its
/// current shimmer brightness, in dot order.
pub fn render_frame(
    base: &Frame,
    dots: &[ShimmerDot],
    index: usize,
    settings: &ShimmerSettings,
) -> Frame {
    let mut frame = base.with_index(index);
    darken(&mut frame, settings.darken_fraction);

    for dot in dots {
        let brightness = shimmer_brightness(
            index,
            settings.frame_count,
            settings.shimmer_speed,
            dot.phase,
        );
        let alpha = unit_to_alpha(brightness);
        draw_dot(&mut frame, dot, settings.dot_size, alpha);
    }
    frame
}
