use nalgebra::{DMatrix, DVector};

use super::ProjectionInput;
use crate::geom::Point;
use crate::rng::XorShift64Star;

const SMALL: f64 = 1e-9;
const PI_TOL: f64 = 1e-7;
const MAX_POWER_ITERATIONS: usize = 10_000;

/// Two leading eigenvectors of the double-centred squared-distance matrix, approximated from a
/// max-min pivot sample. `None` when the sample is degenerate.
pub(super) fn project(input: &ProjectionInput<'_>, max_pivots: usize) -> Option<Vec<Point>> {
    let n = input.len();
    if n < 3 {
        return None;
    }
    let mut rng = XorShift64Star::new(input.random_seed);
    let k = n.min(max_pivots.max(2));

    // Greedy max-min sampling: each pivot is the node farthest from all previous pivots.
    let mut c = DMatrix::<f64>::zeros(n, k);
    let mut pivots = vec![0usize; k];
    let mut min_dist = vec![f64::INFINITY; n];
    let mut pivot = rng.next_usize(n);
    for col in 0..k {
        pivots[col] = pivot;
        let mut far = (0usize, f64::MIN);
        for i in 0..n {
            let d = if i == pivot { 0.0 } else { input.distance(pivot, i) };
            c[(i, col)] = d * d;
            min_dist[i] = min_dist[i].min(d);
            if min_dist[i] > far.1 {
                far = (i, min_dist[i]);
            }
        }
        pivot = far.0;
    }

    let mut phi = DMatrix::<f64>::zeros(k, k);
    for i in 0..k {
        for j in 0..k {
            phi[(i, j)] = c[(pivots[j], i)];
        }
    }
    let inv = regularized_inverse(&phi)?;

    let mut y1 = DVector::<f64>::from_fn(n, |_, _| rng.next_f64_unit());
    let mut y2 = DVector::<f64>::from_fn(n, |_, _| rng.next_f64_unit());
    normalize(&mut y1);
    normalize(&mut y2);
    let (v1, theta1) = eigenvector(&c, &inv, None, y1);
    let (v2, theta2) = eigenvector(&c, &inv, Some(&v1), y2);
    let xs = v1 * theta1.abs().sqrt();
    let ys = v2 * theta2.abs().sqrt();

    let points: Vec<Point> = (0..n).map(|i| Point::new(xs[i], ys[i])).collect();
    points
        .iter()
        .all(|p| p.x.is_finite() && p.y.is_finite())
        .then_some(points)
}

fn regularized_inverse(phi: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let svd = nalgebra::linalg::SVD::new(phi.clone(), true, true);
    let u = svd.u?;
    let v_t = svd.v_t?;
    let s = svd.singular_values;
    if s.is_empty() || s[0] == 0.0 {
        return None;
    }
    let max_s = s[0] * s[0] * s[0];
    let sig = DMatrix::<f64>::from_fn(s.len(), s.len(), |i, j| {
        let si2 = s[i] * s[i];
        if i != j || si2 == 0.0 {
            return 0.0;
        }
        s[i] / (si2 + max_s / si2)
    });
    Some(v_t.transpose() * sig * u.transpose())
}

/// Power iteration on `-0.5 * C * INV * C^T` with centring, orthogonal to `against` if given.
fn eigenvector(
    c: &DMatrix<f64>,
    inv: &DMatrix<f64>,
    against: Option<&DVector<f64>>,
    mut y: DVector<f64>,
) -> (DVector<f64>, f64) {
    let mut previous = SMALL;
    let mut theta = 0.0;
    for _ in 0..MAX_POWER_ITERATIONS {
        let mut v = y.clone();
        if let Some(a) = against {
            let proj = a.dot(&v);
            v -= a * proj;
        }
        let t = centre(&v);
        let t = c * (inv * (c.transpose() * t)) * -0.5;
        let mut next = centre(&t);
        theta = v.dot(&next);
        normalize(&mut next);

        let current = v.dot(&next);
        let ratio = (current / if previous.abs() < SMALL { SMALL } else { previous }).abs();
        y = next;
        if (1.0..=1.0 + PI_TOL).contains(&ratio) {
            break;
        }
        previous = current;
    }
    (y, theta)
}

fn centre(v: &DVector<f64>) -> DVector<f64> {
    let mean = v.mean();
    v.map(|x| x - mean)
}

fn normalize(v: &mut DVector<f64>) {
    let norm = v.norm();
    if norm.is_finite() && norm > 0.0 {
        *v /= norm;
    }
}
