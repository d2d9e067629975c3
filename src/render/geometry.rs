use nalgebra::{Isometry2, Point2, UnitComplex};
use serde::Serialize;
use std::fmt;

/// Rigid 2D transform in screen coordinates (y grows downwards).
pub type Transform = Isometry2<f64>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[cfg(test)]
    pub fn distance_to(&self, other: Point) -> f64 {
        nalgebra::distance(&Point2::from(*self), &Point2::from(other))
    }
}

impl From<Point> for Point2<f64> {
    fn from(p: Point) -> Self {
        Point2::new(p.x, p.y)
    }
}

impl From<Point2<f64>> for Point {
    fn from(p: Point2<f64>) -> Self {
        Point::new(p.x, p.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Rotation about `pivot`; positive degrees turn clockwise on screen.
pub fn rotation_about(degrees: f64, pivot: Point) -> Transform {
    Isometry2::rotation_wrt_point(UnitComplex::new(degrees.to_radians()), pivot.into())
}

pub fn apply(transform: &Transform, p: Point) -> Point {
    transform.transform_point(&p.into()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(p: Point, expected: Point) {
        assert!(p.distance_to(expected) < 1e-9, "{} != {}", p, expected);
    }

    #[test]
    fn quarter_turn_moves_top_to_right() {
        let pivot = Point::new(100.0, 100.0);
        let r = rotation_about(90.0, pivot);
        assert_near(apply(&r, Point::new(100.0, 50.0)), Point::new(150.0, 100.0));
        assert_near(apply(&r, pivot), pivot);
    }

    #[test]
    fn four_quarter_turns_are_identity() {
        let pivot = Point::new(12.0, -3.0);
        let quarter = rotation_about(90.0, pivot);
        let full = quarter * quarter * quarter * quarter;
        let p = Point::new(7.5, 42.0);
        assert_near(apply(&full, p), p);
    }

    #[test]
    fn composition_applies_the_right_operand_first() {
        let outer = rotation_about(90.0, Point::new(0.0, 0.0));
        let inner = rotation_about(90.0, Point::new(10.0, 0.0));
        // inner takes the origin to (10, -10), outer then to (10, 10)
        assert_near(apply(&(outer * inner), Point::new(0.0, 0.0)), Point::new(10.0, 10.0));
    }
}
