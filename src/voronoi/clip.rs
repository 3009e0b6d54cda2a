//! Outcode (Cohen-Sutherland) segment clipping against the output rectangle

use glam::DVec2;

use super::geometry::{Bounds, TOLERANCE};

const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BELOW: u8 = 4;
const ABOVE: u8 = 8;

/// 4-bit region code of `p` against the rectangle's half-planes
fn outcode(p: DVec2, bounds: &Bounds) -> u8 {
    let mut code = INSIDE;
    if p.x < bounds.left {
        code |= LEFT;
    } else if p.x > bounds.right() {
        code |= RIGHT;
    }
    if p.y < bounds.top {
        code |= ABOVE;
    } else if p.y > bounds.bottom() {
        code |= BELOW;
    }
    code
}

/// Point where segment `p0 -> p1` crosses the boundary named by `code`
///
/// The boundary coordinate is assigned exactly, so clipped endpoints compare
/// equal to the rectangle side they land on.
fn boundary_crossing(p0: DVec2, p1: DVec2, code: u8, bounds: &Bounds) -> DVec2 {
    let d = p1 - p0;
    if code & ABOVE != 0 {
        DVec2::new(p0.x + d.x * (bounds.top - p0.y) / d.y, bounds.top)
    } else if code & BELOW != 0 {
        DVec2::new(p0.x + d.x * (bounds.bottom() - p0.y) / d.y, bounds.bottom())
    } else if code & RIGHT != 0 {
        DVec2::new(bounds.right(), p0.y + d.y * (bounds.right() - p0.x) / d.x)
    } else {
        DVec2::new(bounds.left, p0.y + d.y * (bounds.left - p0.x) / d.x)
    }
}

/// Clip the segment `p0 -> p1` to `bounds` (inclusive)
///
/// Returns `None` when no part of the segment is inside, or when what is
/// left has collapsed to a single point.
pub fn clip_segment(mut p0: DVec2, mut p1: DVec2, bounds: &Bounds) -> Option<(DVec2, DVec2)> {
    let mut code0 = outcode(p0, bounds);
    let mut code1 = outcode(p1, bounds);

    // Each pass moves one endpoint onto a boundary line; four passes per
    // endpoint is the most that can ever be needed.
    for _ in 0..8 {
        if code0 | code1 == INSIDE {
            if p0.distance_squared(p1) < TOLERANCE * TOLERANCE {
                return None;
            }
            return Some((p0, p1));
        }
        if code0 & code1 != 0 {
            return None;
        }

        if code0 != INSIDE {
            p0 = boundary_crossing(p0, p1, code0, bounds);
            code0 = outcode(p0, bounds);
        } else {
            p1 = boundary_crossing(p1, p0, code1, bounds);
            code1 = outcode(p1, bounds);
        }
    }

    None
}
