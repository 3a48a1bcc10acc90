use foundation::math::Vec2;

use crate::components::{ProjectedShape, ScreenPolygon};

/// Crossing-number test for a single ring. The ring may or may not repeat
/// its first vertex at the end.
pub fn ring_contains(ring: &[Vec2], p: Vec2) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Even-odd fill over each polygon's rings (so holes are outside); a point is
/// inside the shape when any polygon contains it.
pub fn polygons_contain(polygons: &[ScreenPolygon], p: Vec2) -> bool {
    polygons.iter().any(|rings| {
        rings
            .iter()
            .filter(|ring| ring_contains(ring, p))
            .count()
            % 2
            == 1
    })
}

/// Returns the index of the topmost shape under `p`.
///
/// Ordering contract: `draw_order` lists shape indices back to front, so the
/// last listed shape that contains `p` wins.
pub fn pick_topmost<S: AsRef<ProjectedShape>>(
    shapes: &[S],
    draw_order: &[usize],
    p: Vec2,
) -> Option<usize> {
    draw_order
        .iter()
        .rev()
        .copied()
        .find(|&idx| shapes.get(idx).is_some_and(|s| s.as_ref().contains(p)))
}
