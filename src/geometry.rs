use crate::constants::defaults::UNSET;
use crate::error::{MfdError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub const fn new(left: i64, top: i64, width: i64, height: i64) -> Self {
        Self { left, top, width, height }
    }

    /// Same size anchored at the origin
    pub const fn at_origin(self) -> Self {
        Self::new(0, 0, self.width, self.height)
    }

    /// False while either dimension still holds the unset sentinel
    pub const fn has_size(self) -> bool {
        self.width >= 0 && self.height >= 0
    }
}

/// Crop boundaries used when extracting a sub-image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offsets {
    pub x_start: i64,
    pub x_finish: i64,
    pub y_start: i64,
    pub y_finish: i64,
}

impl Offsets {
    pub const UNSET: Offsets = Offsets {
        x_start: UNSET,
        x_finish: UNSET,
        y_start: UNSET,
        y_finish: UNSET,
    };
}

/// Size-only containment: positions of both rectangles are ignored
pub fn is_inside(outer: Rect, inner: Rect) -> bool {
    inner.width <= outer.width && inner.height <= outer.height
}

/// Center `inner`'s dimensions on `outer`'s midpoint
/// Only the size of `inner` is used, its position never feeds the result
pub fn center_in(outer: Rect, inner: Rect) -> Result<Rect> {
    if !is_inside(outer, inner) {
        return Err(MfdError::Geometry { outer, inner, reason: "inner larger than outer" });
    }

    let centered = outer
        .left
        .checked_add(outer.width / 2)
        .and_then(|x| x.checked_sub(inner.width / 2))
        .zip(
            outer
                .top
                .checked_add(outer.height / 2)
                .and_then(|y| y.checked_sub(inner.height / 2)),
        );

    match centered {
        Some((left, top)) => Ok(Rect::new(left, top, inner.width, inner.height)),
        None => Err(MfdError::Geometry { outer, inner, reason: "centered position out of range" }),
    }
}
