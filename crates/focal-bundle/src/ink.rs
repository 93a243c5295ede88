//! Waypoint placement for a candidate bundle.

use crate::arena::{Arena, NodeIx};
use crate::geom::{self, Vec2};

const PHI: f64 = 1.618_033_988_749_895;
const SEARCH_TAU: f64 = 0.1;
const MAX_SEARCH_STEPS: usize = 64;

/// A candidate bundle: the members routed through a shared `m1`-`m2` span.
#[derive(Debug, Clone)]
pub(crate) struct Combined {
    pub members: Vec<NodeIx>,
    pub m1: Vec2,
    pub m2: Vec2,
    pub ink: f64,
}

/// Places the waypoints of `members` by minimizing `ink * (1 + sin(max_turn) / angle_strength)`.
///
/// Waypoints slide along the segment between the start centroid and the end centroid;
/// `x` in `[0, 1]` puts `m1` at `x / 2` and `m2` at `1 - x / 2` of the way.
pub(crate) fn combine(arena: &Arena, members: Vec<NodeIx>, angle_strength: f64) -> Combined {
    let (top, bottom) = centroids(arena, &members);
    let waypoints = |x: f64| {
        let x = x / 2.0;
        (geom::lerp(top, bottom, x), geom::lerp(top, bottom, 1.0 - x))
    };
    let cost = |x: f64| {
        let (m1, m2) = waypoints(x);
        let ink = arena.members_ink(&members, m1, m2) + geom::dist(m1, m2);
        let alpha = max_turning_angle(arena, &members, m1, m2);
        ink * (1.0 + alpha.sin() / angle_strength)
    };

    let x = golden_section_search(0.0, 1.0, 0.72, SEARCH_TAU, cost);
    let (m1, m2) = waypoints(x);
    let ink = arena.members_ink(&members, m1, m2) + geom::dist(m1, m2);
    Combined {
        members,
        m1,
        m2,
        ink,
    }
}

fn centroids(arena: &Arena, members: &[NodeIx]) -> (Vec2, Vec2) {
    let mut top = [0.0, 0.0];
    let mut bottom = [0.0, 0.0];
    for &ix in members {
        let c = arena.get(ix).coords;
        top[0] += c[0];
        top[1] += c[1];
        bottom[0] += c[2];
        bottom[1] += c[3];
    }
    let n = members.len().max(1) as f64;
    ([top[0] / n, top[1] / n], [bottom[0] / n, bottom[1] / n])
}

/// Largest angle between the shared span and any member's approach to it.
///
/// Degenerate directions (a member endpoint sitting on a waypoint, or `m1 == m2`) are skipped.
fn max_turning_angle(arena: &Arena, members: &[NodeIx], m1: Vec2, m2: Vec2) -> f64 {
    let m2_to_m1 = geom::sub(m1, m2);
    let m1_to_m2 = geom::sub(m2, m1);
    let span = geom::norm(m2_to_m1);
    let angle_between = |v: Vec2, axis: Vec2| {
        let a = (geom::dot(v, axis) / geom::norm(v) / span).clamp(-1.0, 1.0).acos();
        if a.is_finite() { a.abs() } else { 0.0 }
    };

    let mut angle: f64 = 0.0;
    for &ix in members {
        let n = arena.get(ix);
        angle = angle.max(angle_between(geom::sub(n.start(), m1), m2_to_m1));
        angle = angle.max(angle_between(geom::sub(n.end(), m2), m1_to_m2));
    }
    angle
}

/// Golden-section search for the minimum of `f` bracketed by `a`, `b`, `c`.
fn golden_section_search(
    mut a: f64,
    mut b: f64,
    mut c: f64,
    tau: f64,
    f: impl Fn(f64) -> f64,
) -> f64 {
    let resphi = 2.0 - PHI;
    for _ in 0..MAX_SEARCH_STEPS {
        let right_wider = c - b > b - a;
        let x = if right_wider {
            b + resphi * (c - b)
        } else {
            b - resphi * (b - a)
        };
        if (c - a).abs() < tau * (b.abs() + x.abs()) {
            return (c + a) / 2.0;
        }
        match (f(x) < f(b), right_wider) {
            (true, true) => (a, b) = (b, x),
            (true, false) => (c, b) = (b, x),
            (false, true) => c = x,
            (false, false) => a = x,
        }
    }
    (c + a) / 2.0
}
