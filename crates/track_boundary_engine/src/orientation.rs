//! Umlaufsinn geschlossener Kurven.

use crate::error::{Result, TrackError};
use crate::geometry::placement::bounds;
use crate::offset::OffsetSide;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Relative Schwelle, unter der eine Fläche als 0 gilt (bezogen auf die Bounding-Box).
const AREA_EPSILON: f64 = 1e-12;

/// Umlaufsinn eines Polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winding {
    CounterClockwise,
    Clockwise,
}

impl Winding {
    /// Seite, auf der das Innere liegt (gegen den Uhrzeigersinn: links).
    pub fn inner_side(self) -> OffsetSide {
        match self {
            Self::CounterClockwise => OffsetSide::Left,
            Self::Clockwise => OffsetSide::Right,
        }
    }
}

/// Vorzeichenbehaftete Fläche (Gauss'sche Trapezformel).
///
/// Offene Punktfolgen werden implizit geschlossen; ein duplizierter
/// Schlusspunkt trägt nichts bei. Positiv bedeutet gegen den Uhrzeigersinn.
pub fn signed_area(points: &[DVec2]) -> Result<f64> {
    if points.len() < 3 {
        return Err(TrackError::InsufficientData {
            needed: 3,
            found: points.len(),
        });
    }
    if points.iter().any(|p| !p.is_finite()) {
        return Err(TrackError::degenerate("Fläche mit nicht-endlichen Punkten"));
    }

    // Relativ zum ersten Punkt rechnen, damit grosse Koordinaten nicht auslöschen
    let origin = points[0];
    let n = points.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let a = points[i] - origin;
            let b = points[(i + 1) % n] - origin;
            a.perp_dot(b)
        })
        .sum();
    let area = 0.5 * twice;

    let scale = bounds(points)
        .map(|(lo, hi)| (hi - lo).length_squared())
        .unwrap_or(0.0);
    if area.abs() <= AREA_EPSILON * scale || scale == 0.0 {
        return Err(TrackError::degenerate("Polygon ohne Fläche hat keinen Umlaufsinn"));
    }
    Ok(area)
}

/// Umlaufsinn aus dem Vorzeichen der Fläche.
pub fn winding(points: &[DVec2]) -> Result<Winding> {
    let area = signed_area(points)?;
    Ok(if area > 0.0 {
        Winding::CounterClockwise
    } else {
        Winding::Clockwise
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Vec<DVec2> {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(10.0, 10.0),
            DVec2::new(0.0, 10.0),
        ]
    }

    #[test]
    fn counter_clockwise_square_has_positive_area() {
        assert_relative_eq!(signed_area(&square()).unwrap(), 100.0, epsilon = 1e-9);
        assert_eq!(winding(&square()).unwrap(), Winding::CounterClockwise);
        assert_eq!(Winding::CounterClockwise.inner_side(), OffsetSide::Left);
    }

    #[test]
    fn sign_ignores_start_vertex_and_scale() {
        let base = square();
        let reference = signed_area(&base).unwrap();
        for start in 0..base.len() {
            let mut rotated = base.clone();
            rotated.rotate_left(start);
            assert_relative_eq!(signed_area(&rotated).unwrap(), reference, epsilon = 1e-9);
        }
        for factor in [0.001, 3.5, 1e4] {
            let scaled: Vec<DVec2> = base.iter().map(|&p| p * factor).collect();
            assert!(signed_area(&scaled).unwrap() > 0.0);
        }
    }

    #[test]
    fn reversal_flips_sign() {
        let mut reversed = square();
        reversed.reverse();
        assert_relative_eq!(signed_area(&reversed).unwrap(), -100.0, epsilon = 1e-9);
        assert_eq!(winding(&reversed).unwrap().inner_side(), OffsetSide::Right);
    }

    #[test]
    fn closing_duplicate_does_not_change_area() {
        let mut closed = square();
        closed.push(DVec2::ZERO);
        assert_relative_eq!(signed_area(&closed).unwrap(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let line = [DVec2::ZERO, DVec2::X, DVec2::new(2.0, 0.0)];
        assert!(matches!(
            signed_area(&line),
            Err(TrackError::DegenerateInput(_))
        ));
    }
}
