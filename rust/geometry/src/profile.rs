// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closed 2D section outlines and their triangulation

use crate::error::{Error, Result};
use nalgebra::Point2;

/// Closed section outline.
///
/// The last vertex repeats the first. Outlines built by
/// [`crate::sections::polygon_for`] wind counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon2D {
    pub points: Vec<Point2<f64>>,
}

impl Polygon2D {
    /// Close an open ring by repeating its first vertex.
    pub fn closed(mut ring: Vec<Point2<f64>>) -> Self {
        if let Some(first) = ring.first().copied() {
            if ring.last() != Some(&first) || ring.len() == 1 {
                ring.push(first);
            }
        }
        Self { points: ring }
    }

    /// Axis-aligned rectangle centred on the origin.
    pub fn rectangle(width: f64, height: f64) -> Self {
        let half_x = width / 2.0;
        let half_y = height / 2.0;
        Self::closed(vec![
            Point2::new(-half_x, -half_y),
            Point2::new(half_x, -half_y),
            Point2::new(half_x, half_y),
            Point2::new(-half_x, half_y),
        ])
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First vertex equals the last one.
    pub fn is_closed(&self) -> bool {
        self.points.len() > 3 && self.points.first() == self.points.last()
    }

    /// Vertices without the closing repeat.
    pub fn ring(&self) -> &[Point2<f64>] {
        if self.is_closed() {
            &self.points[..self.points.len() - 1]
        } else {
            &self.points
        }
    }

    /// Signed area by the shoelace formula (positive when counter-clockwise).
    pub fn signed_area(&self) -> f64 {
        let ring = self.ring();
        let n = ring.len();
        if n < 3 {
            return 0.0;
        }
        let twice: f64 = (0..n)
            .map(|i| {
                let a = ring[i];
                let b = ring[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// `(min, max)` corners of the bounding box.
    pub fn bounds(&self) -> (Point2<f64>, Point2<f64>) {
        self.points.iter().fold(
            (
                Point2::new(f64::MAX, f64::MAX),
                Point2::new(f64::MIN, f64::MIN),
            ),
            |(min, max), p| {
                (
                    Point2::new(min.x.min(p.x), min.y.min(p.y)),
                    Point2::new(max.x.max(p.x), max.y.max(p.y)),
                )
            },
        )
    }

    /// Triangulate the outline using earcutr
    /// Returns triangle indices into [`Polygon2D::ring`]
    pub fn triangulate(&self) -> Result<Vec<usize>> {
        let ring = self.ring();
        if ring.len() < 3 {
            return Err(Error::InvalidPolygon(
                "Polygon must have at least 3 vertices".to_string(),
            ));
        }

        let mut vertices = Vec::with_capacity(ring.len() * 2);
        for p in ring {
            vertices.push(p.x);
            vertices.push(p.y);
        }

        earcutr::earcut(&vertices, &[], 2).map_err(|e| Error::TriangulationError(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_closed_repeats_first_vertex() {
        let poly = Polygon2D::closed(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ]);
        assert_eq!(poly.len(), 4);
        assert!(poly.is_closed());
        assert_eq!(poly.ring().len(), 3);

        // Already-closed input is left alone
        let again = Polygon2D::closed(poly.points.clone());
        assert_eq!(again.len(), 4);
    }

    #[test]
    fn test_rectangle_area_and_winding() {
        let rect = Polygon2D::rectangle(2.0, 3.0);
        assert_relative_eq!(rect.signed_area(), 6.0, epsilon = 1e-12);
        let (min, max) = rect.bounds();
        assert_relative_eq!(min.x, -1.0);
        assert_relative_eq!(max.y, 1.5);
    }

    #[test]
    fn test_clockwise_area_is_negative() {
        let poly = Polygon2D::closed(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ]);
        assert!(poly.signed_area() < 0.0);
        assert_relative_eq!(poly.area(), 1.0);
    }

    #[test]
    fn test_triangulate_square() {
        let rect = Polygon2D::rectangle(1.0, 1.0);
        let indices = rect.triangulate().unwrap();
        assert_eq!(indices.len(), 6);
        assert!(indices.iter().all(|&i| i < 4));
    }
}
