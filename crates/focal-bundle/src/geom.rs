pub type Vec2 = [f64; 2];

pub(crate) fn sub(a: Vec2, b: Vec2) -> Vec2 {
    [a[0] - b[0], a[1] - b[1]]
}

pub(crate) fn dot(a: Vec2, b: Vec2) -> f64 {
    a[0] * b[0] + a[1] * b[1]
}

pub(crate) fn norm(a: Vec2) -> f64 {
    dot(a, a).sqrt()
}

pub(crate) fn dist(a: Vec2, b: Vec2) -> f64 {
    norm(sub(a, b))
}

/// `a * (1 - t) + b * t`.
pub(crate) fn lerp(a: Vec2, b: Vec2, t: f64) -> Vec2 {
    [a[0] * (1.0 - t) + b[0] * t, a[1] * (1.0 - t) + b[1] * t]
}

pub(crate) fn start(coords: &[f64; 4]) -> Vec2 {
    [coords[0], coords[1]]
}

pub(crate) fn end(coords: &[f64; 4]) -> Vec2 {
    [coords[2], coords[3]]
}

pub(crate) fn midpoint(coords: &[f64; 4]) -> Vec2 {
    lerp(start(coords), end(coords), 0.5)
}

/// Orthogonal projection of `p` onto the line through `a` and `b` (`a` when they coincide).
pub(crate) fn project_onto_line(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = sub(b, a);
    let len2 = dot(ab, ab);
    if len2 == 0.0 {
        return a;
    }
    let c = dot(sub(p, a), ab) / len2;
    [a[0] + c * ab[0], a[1] + c * ab[1]]
}
