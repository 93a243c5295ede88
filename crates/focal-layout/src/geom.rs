use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<[f64; 2]> for Point {
    fn from(p: [f64; 2]) -> Self {
        Self { x: p[0], y: p[1] }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        let (dx, dy) = (p.x - self.x, p.y - self.y);
        (0.0..=self.width).contains(&dx) && (0.0..=self.height).contains(&dy)
    }

    /// Moves `p` inside the rectangle shrunk by `padding` on every side.
    ///
    /// When the rectangle is narrower than `2 * padding` the point lands `padding` from the
    /// left/top edge.
    pub fn clamp_inside(&self, p: Point, padding: f64) -> Point {
        Point::new(
            self.x + padding.max((self.width - padding).min(p.x - self.x)),
            self.y + padding.max((self.height - padding).min(p.y - self.y)),
        )
    }

    /// Bounding box of `points` grown by `padding`; `None` when empty.
    pub fn around(points: impl IntoIterator<Item = Point>, padding: f64) -> Option<Self> {
        let (x, y) = extents(points)?;
        Some(Self::new(
            x.0 - padding,
            y.0 - padding,
            x.1 - x.0 + 2.0 * padding,
            y.1 - y.0 + 2.0 * padding,
        ))
    }
}

/// `((min_x, max_x), (min_y, max_y))`, or `None` for an empty input.
pub fn extents(points: impl IntoIterator<Item = Point>) -> Option<((f64, f64), (f64, f64))> {
    let mut it = points.into_iter();
    let first = it.next()?;
    let init = ((first.x, first.x), (first.y, first.y));
    Some(it.fold(init, |((x0, x1), (y0, y1)), p| {
        ((x0.min(p.x), x1.max(p.x)), (y0.min(p.y), y1.max(p.y)))
    }))
}
