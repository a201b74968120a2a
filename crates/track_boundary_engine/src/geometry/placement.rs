//! Platzierungs-Transformationen für Mittellinien und Kegellisten.

use crate::error::{require_positive, Result, TrackError};
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Zielrechteck für [`fit_into_area`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaFit {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub padding: f64,
}

impl AreaFit {
    pub fn new(width: f64, height: f64, padding: f64) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }
}

/// Achsenparallele Bounding-Box `(min, max)`.
pub fn bounds(points: &[DVec2]) -> Option<(DVec2, DVec2)> {
    let first = *points.first()?;
    Some(
        points
            .iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
    )
}

/// Skaliert gleichmässig in das gepolsterte Rechteck und zentriert.
pub fn fit_into_area(points: &[DVec2], area: &AreaFit) -> Result<Vec<DVec2>> {
    let available = DVec2::new(
        area.width - 2.0 * area.padding,
        area.height - 2.0 * area.padding,
    );
    require_positive("area.width", available.x)?;
    require_positive("area.height", available.y)?;

    let (lo, hi) = bounds(points).ok_or(TrackError::InsufficientData {
        needed: 1,
        found: 0,
    })?;
    let extent = hi - lo;

    let scale = match (extent.x > 0.0, extent.y > 0.0) {
        (true, true) => (available.x / extent.x).min(available.y / extent.y),
        (true, false) => available.x / extent.x,
        (false, true) => available.y / extent.y,
        (false, false) => {
            return Err(TrackError::degenerate(
                "Bounding-Box ohne Ausdehnung kann nicht eingepasst werden",
            ));
        }
    };

    let origin = DVec2::splat(area.padding) + (available - extent * scale) * 0.5;
    Ok(points.iter().map(|&p| origin + (p - lo) * scale).collect())
}

/// Skaliert um den Ursprung, sodass die Polylinienlänge `length` beträgt.
pub fn scale_to_length(points: &[DVec2], length: f64) -> Result<Vec<DVec2>> {
    require_positive("length", length)?;
    let current = super::polyline_length(points);
    if current <= 0.0 {
        return Err(TrackError::degenerate("Pfad der Länge 0 kann nicht skaliert werden"));
    }
    Ok(scale_uniform(points, length / current))
}

/// Verschiebt, sodass alle Koordinaten nicht-negativ sind.
pub fn shift_non_negative(points: &[DVec2]) -> Vec<DVec2> {
    let Some((lo, _)) = bounds(points) else {
        return Vec::new();
    };
    let shift = (-lo).max(DVec2::ZERO);
    points.iter().map(|&p| p + shift).collect()
}

/// Gleichmässige Skalierung um den Ursprung (z.B. Pixel nach Meter).
pub fn scale_uniform(points: &[DVec2], factor: f64) -> Vec<DVec2> {
    points.iter().map(|&p| p * factor).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fit_into_area_centers_and_pads() {
        let pts = [DVec2::new(0.0, 0.0), DVec2::new(10.0, 5.0)];
        let out = fit_into_area(&pts, &AreaFit::new(100.0, 100.0, 10.0)).unwrap();
        assert_relative_eq!(out[0].x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(out[1].x, 90.0, epsilon = 1e-9);
        assert_relative_eq!(out[0].y, 30.0, epsilon = 1e-9);
        assert_relative_eq!(out[1].y, 70.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_extent_is_degenerate() {
        let pts = [DVec2::ONE, DVec2::ONE];
        assert!(matches!(
            fit_into_area(&pts, &AreaFit::new(10.0, 10.0, 0.0)),
            Err(TrackError::DegenerateInput(_))
        ));
        assert!(scale_to_length(&pts, 5.0).is_err());
    }

    #[test]
    fn shift_only_moves_negative_axes() {
        let out = shift_non_negative(&[DVec2::new(-2.0, 3.0), DVec2::new(1.0, 5.0)]);
        assert_eq!(out, vec![DVec2::new(0.0, 3.0), DVec2::new(3.0, 5.0)]);
    }

    #[test]
    fn scale_to_length_hits_target() {
        let pts = [DVec2::ZERO, DVec2::new(3.0, 4.0)];
        let out = scale_to_length(&pts, 50.0).unwrap();
        assert_relative_eq!(super::super::polyline_length(&out), 50.0, epsilon = 1e-9);
    }
}
