//! Geometry kernel for the planar sweep
//!
//! Bisector construction, bisector intersection and the "is this point right
//! of the arc boundary" test. Coefficient and determinant checks use
//! [`TOLERANCE`] instead of failing on near-degenerate input; site ordering
//! is always exact.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

/// Absolute tolerance for coefficient and determinant checks
pub const TOLERANCE: f64 = 1e-10;

/// Which side of a bisector a beachline half-edge represents
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Axis-aligned output rectangle
///
/// `top` is the minimum y coordinate; y grows downward like screen space.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Create a bounding rectangle
    ///
    /// # Errors
    ///
    /// Returns `DegenerateBounds` if width or height is not strictly positive
    /// (or not finite).
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Result<Self> {
        let finite = left.is_finite() && top.is_finite() && width.is_finite() && height.is_finite();
        if !finite || !(width > 0.0) || !(height > 0.0) {
            return Err(MapError::DegenerateBounds { width, height });
        }
        Ok(Self {
            left,
            top,
            width,
            height,
        })
    }

    /// Square rectangle anchored at the origin
    pub fn square(extent: f64) -> Result<Self> {
        Self::new(0.0, 0.0, extent, extent)
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Inclusive containment test
    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    /// True when `p` lies on one of the four sides (within [`TOLERANCE`])
    pub fn on_boundary(&self, p: DVec2) -> bool {
        (p.x - self.left).abs() < TOLERANCE
            || (p.x - self.right()).abs() < TOLERANCE
            || (p.y - self.top).abs() < TOLERANCE
            || (p.y - self.bottom()).abs() < TOLERANCE
    }

    /// The four corners, clockwise from top-left
    pub fn corners(&self) -> [DVec2; 4] {
        [
            DVec2::new(self.left, self.top),
            DVec2::new(self.right(), self.top),
            DVec2::new(self.right(), self.bottom()),
            DVec2::new(self.left, self.bottom()),
        ]
    }

    /// Map a point into `[-1, 1]²`, centre of the rectangle at the origin
    pub fn normalize(&self, p: DVec2) -> DVec2 {
        DVec2::new(
            2.0 * ((p.x - self.left) / self.width - 0.5),
            2.0 * ((p.y - self.top) / self.height - 0.5),
        )
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }
}

/// Line `a·x + b·y = c`; one of `a`, `b` is exactly 1
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Line {
    /// True when `a` is the unit coefficient (the line is closer to vertical)
    #[inline]
    pub fn is_steep(&self) -> bool {
        (self.a - 1.0).abs() < TOLERANCE
    }
}

/// Perpendicular bisector between two sites
///
/// `left` is the lower site when the bisector was created, `right` the other
/// one; the half-edge orientation tests are phrased against `right`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bisector {
    pub line: Line,
    pub left: DVec2,
    pub right: DVec2,
}

impl Bisector {
    #[inline]
    pub fn site(&self, side: Side) -> DVec2 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// Build the perpendicular bisector of `s1` and `s2`
///
/// The coefficient on the axis with the larger coordinate delta is
/// normalized to 1.
pub fn bisect(s1: DVec2, s2: DVec2) -> Bisector {
    let dx = s2.x - s1.x;
    let dy = s2.y - s1.y;
    let c = s1.x * dx + s1.y * dy + (dx * dx + dy * dy) * 0.5;

    let line = if dx.abs() > dy.abs() {
        Line {
            a: 1.0,
            b: dy / dx,
            c: c / dx,
        }
    } else {
        Line {
            a: dx / dy,
            b: 1.0,
            c: c / dy,
        }
    };

    Bisector {
        line,
        left: s1,
        right: s2,
    }
}

/// Intersect two adjacent beachline boundaries
///
/// Returns `None` when the bisectors share their right site, are (nearly)
/// parallel, or meet on the diverging side of the lower one, i.e. when the
/// arcs between them never collapse.
pub fn intersect(e1: &Bisector, side1: Side, e2: &Bisector, side2: Side) -> Option<DVec2> {
    if e1.right == e2.right {
        return None;
    }

    let (l1, l2) = (e1.line, e2.line);
    let d = l1.a * l2.b - l1.b * l2.a;
    if d.abs() < TOLERANCE {
        return None;
    }

    let xint = (l1.c * l2.b - l2.c * l1.b) / d;
    let yint = (l2.c * l1.a - l1.c * l2.a) / d;

    // Must agree exactly with the site queue order
    let lower_first = compare_y_then_x(e1.right, e2.right).is_lt();
    let (e, side) = if lower_first { (e1, side1) } else { (e2, side2) };

    let right_of_site = xint >= e.right.x;
    if (right_of_site && side == Side::Left) || (!right_of_site && side == Side::Right) {
        return None;
    }

    Some(DVec2::new(xint, yint))
}

/// Is `p` to the right of the half-edge `(bisector, side)`?
///
/// Steep bisectors use the line coefficients directly; the general case
/// compares squared distances so that nothing cancels catastrophically.
pub fn is_right_of(e: &Bisector, side: Side, p: DVec2) -> bool {
    let top = e.right;
    let right_of_site = p.x > top.x;

    if right_of_site && side == Side::Left {
        return true;
    }
    if !right_of_site && side == Side::Right {
        return false;
    }

    let Line { a, b, c } = e.line;
    let above = if e.line.is_steep() {
        let dyp = p.y - top.y;
        let dxp = p.x - top.x;
        let mut fast = false;
        let mut above;

        if (!right_of_site && b < 0.0) || (right_of_site && b >= 0.0) {
            above = dyp >= b * dxp;
            fast = above;
        } else {
            above = p.x + p.y * b > c;
            if b < 0.0 {
                above = !above;
            }
            if !above {
                fast = true;
            }
        }

        if !fast {
            let dxs = top.x - e.left.x;
            above = b * (dxp * dxp - dyp * dyp)
                < dxs * dyp * (1.0 + 2.0 * dxp / dxs + b * b);
            if b < 0.0 {
                above = !above;
            }
        }
        above
    } else {
        let yl = c - a * p.x;
        let t1 = p.y - yl;
        let t2 = p.x - top.x;
        let t3 = yl - top.y;
        t1 * t1 > t2 * t2 + t3 * t3
    };

    match side {
        Side::Left => above,
        Side::Right => !above,
    }
}

/// Site ordering used by the sweep: smaller y first, then smaller x
#[inline]
pub fn compare_y_then_x(a: DVec2, b: DVec2) -> std::cmp::Ordering {
    a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x))
}
