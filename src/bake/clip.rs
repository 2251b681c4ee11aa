//! Convex polygon clipping in texel space.
//!
//! Sutherland–Hodgman: the subject polygon (a texel square) is clipped
//! successively against each edge of a convex clip polygon (the UV triangle).
//! Works for either winding of the clip polygon.

use smallvec::SmallVec;

use crate::util::Vec2;

/// Clipped polygon. A square clipped by a triangle has at most 7 vertices.
pub type Polygon = SmallVec<[Vec2; 8]>;

/// Which side of the directed line `a -> b` the point `c` lies on:
/// `1` left, `-1` right, `0` collinear.
#[inline]
pub fn left_of(a: Vec2, b: Vec2, c: Vec2) -> i32 {
    let x = (b - a).perp_dot(c - b);
    if x < 0.0 {
        -1
    } else if x > 0.0 {
        1
    } else {
        0
    }
}

/// Intersection of the infinite line through `x0, x1` with the open segment
/// `y0 .. y1`. `None` if parallel or if the hit is not strictly inside the segment.
#[inline]
pub fn line_intersection(x0: Vec2, x1: Vec2, y0: Vec2, y1: Vec2) -> Option<Vec2> {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let d = x0 - y0;
    let denom = dy.perp_dot(dx);
    if denom == 0.0 {
        return None;
    }
    let t = d.perp_dot(dx) / denom;
    if t <= 0.0 || t >= 1.0 {
        return None;
    }
    Some(y0 + t * dy)
}

/// Clip `subject` against the convex polygon `clip` (at least 3 vertices).
///
/// Returns the intersection polygon, empty if they do not overlap. The
/// result is meaningless for a collinear clip polygon; reject those first.
pub fn convex_clip(subject: &[Vec2], clip: &[Vec2]) -> Polygon {
    let mut output: Polygon = subject.iter().copied().collect();
    if clip.len() < 3 {
        output.clear();
        return output;
    }

    // Winding of the clip polygon; points on the outer side of an edge are dropped.
    let dir = left_of(clip[0], clip[1], clip[2]);
    let n = clip.len();

    for i in 0..n {
        if output.is_empty() {
            break;
        }
        let (edge0, edge1) = (clip[(i + n - 1) % n], clip[i]);
        let input = std::mem::take(&mut output);

        let mut v0 = input[input.len() - 1];
        let mut side0 = left_of(edge0, edge1, v0);
        for &v1 in &input {
            let side1 = left_of(edge0, edge1, v1);
            if side0 != 0 && side0 + side1 == 0 {
                if let Some(x) = line_intersection(edge0, edge1, v0, v1) {
                    output.push(x);
                }
            }
            if side1 != -dir {
                output.push(v1);
            }
            v0 = v1;
            side0 = side1;
        }
    }

    output
}
