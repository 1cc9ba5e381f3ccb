use crate::shared::frame::Frame;

/// Pads `frame` to even width and height, centered on opaque black.
///
/// Each dimension grows by at most one pixel. The image sits at
/// `new / 2 - old / 2`, so an odd dimension gains its extra pixel on the
/// left/top edge. Even-sized frames are returned unchanged.
pub fn pad_to_even(frame: Frame) -> Frame {
    let (w, h) = (frame.width(), frame.height());
    if w % 2 == 0 && h % 2 == 0 {
        return frame;
    }
    let (nw, nh) = (w + w % 2, h + h % 2);
    let (ox, oy) = center_offset((w, h), (nw, nh));

    let channels = frame.channels() as usize;
    let mut canvas = Frame::black(nw, nh);
    let row_len = w as usize * channels;
    for row in 0..h as usize {
        let src = row * row_len;
        let dst = ((row + oy as usize) * nw as usize + ox as usize) * channels;
        canvas.data_mut()[dst..dst + row_len].copy_from_slice(&frame.data()[src..src + row_len]);
    }
    canvas.with_index(frame.index())
}

/// Top-left offset that centers an `inner` box inside an `outer` box.
pub fn center_offset(inner: (u32, u32), outer: (u32, u32)) -> (u32, u32) {
    (outer.0 / 2 - inner.0 / 2, outer.1 / 2 - inner.1 / 2)
}
