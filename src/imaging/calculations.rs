//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//! Derived sides are computed in 64-bit integers and truncated, never rounded.

use super::params::{BaseSide, HorizontalAlign, VerticalAlign};

/// Where a scaled copy of the source lands on a canvas.
///
/// Offsets are signed: a copy larger than its canvas gets a negative offset
/// and is clipped when composited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// Cover a `width`×`height` area starting at the origin.
    pub fn at_origin(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// `value * numerator / denominator`, truncated.
///
/// A zero denominator yields 0, which canvas allocation later rejects.
fn scale(value: u32, numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return 0;
    }
    let scaled = u64::from(value) * u64::from(numerator) / u64::from(denominator);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

fn height_for_width(width: u32, source: (u32, u32)) -> u32 {
    scale(width, source.1, source.0)
}

fn width_for_height(height: u32, source: (u32, u32)) -> u32 {
    scale(height, source.0, source.1)
}

/// Calculate output dimensions for a resize request.
///
/// # Arguments
/// * `source` - Source image dimensions (width, height)
/// * `target` - Requested dimensions (width, height)
/// * `base_side` - Which requested side is kept exactly
///
/// # Returns
/// * `(width, height)` - Output dimensions
///
/// `Restricted` always lets the height drive the width, except for a square
/// source requested narrower than tall, where the width drives the height.
pub fn calculate_resize_dimensions(
    source: (u32, u32),
    target: (u32, u32),
    base_side: BaseSide,
) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let fix_width = (tgt_w, height_for_width(tgt_w, source));
    let fix_height = (width_for_height(tgt_h, source), tgt_h);

    match base_side {
        BaseSide::None => target,
        BaseSide::Width => fix_width,
        BaseSide::Height => fix_height,
        BaseSide::Big => {
            if src_w > src_h {
                fix_width
            } else if src_w < src_h {
                fix_height
            } else if tgt_w > tgt_h {
                fix_width
            } else {
                fix_height
            }
        }
        BaseSide::Small => {
            if src_w < src_h {
                fix_width
            } else if src_w > src_h {
                fix_height
            } else if tgt_w < tgt_h {
                fix_width
            } else {
                fix_height
            }
        }
        BaseSide::Restricted => {
            if src_w != src_h {
                fix_height
            } else if tgt_w < tgt_h {
                fix_width
            } else {
                fix_height
            }
        }
    }
}

/// Calculate the size of a thumbnail's scaled copy.
///
/// The side matching the larger source side is set to the canvas side; the
/// other follows the aspect ratio. A square source fills the canvas exactly.
pub fn calculate_thumbnail_fit(source: (u32, u32), canvas: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (canvas_w, canvas_h) = canvas;

    if src_w > src_h {
        (canvas_w, height_for_width(canvas_w, source))
    } else if src_w < src_h {
        (width_for_height(canvas_h, source), canvas_h)
    } else {
        (canvas_w, canvas_h)
    }
}

fn center_offset(canvas: u32, scaled: u32) -> i64 {
    // i64 division truncates toward zero, also for negative gaps
    (i64::from(canvas) - i64::from(scaled)) / 2
}

fn far_offset(canvas: u32, scaled: u32) -> i64 {
    i64::from(canvas) - i64::from(scaled)
}

pub fn horizontal_offset(canvas_w: u32, scaled_w: u32, align: HorizontalAlign) -> i64 {
    match align {
        HorizontalAlign::Left => 0,
        HorizontalAlign::Center => center_offset(canvas_w, scaled_w),
        HorizontalAlign::Right => far_offset(canvas_w, scaled_w),
    }
}

pub fn vertical_offset(canvas_h: u32, scaled_h: u32, align: VerticalAlign) -> i64 {
    match align {
        VerticalAlign::Top => 0,
        VerticalAlign::Center => center_offset(canvas_h, scaled_h),
        VerticalAlign::Bottom => far_offset(canvas_h, scaled_h),
    }
}

/// Calculate where a thumbnail's scaled copy sits on its canvas.
pub fn calculate_thumbnail_placement(
    source: (u32, u32),
    canvas: (u32, u32),
    h_align: HorizontalAlign,
    v_align: VerticalAlign,
) -> Placement {
    let (width, height) = calculate_thumbnail_fit(source, canvas);
    Placement {
        x: horizontal_offset(canvas.0, width, h_align),
        y: vertical_offset(canvas.1, height, v_align),
        width,
        height,
    }
}
