//! Kurvenmodell: Polylinien, gefittete Kurven, Vereinfachung und Platzierung.
//!
//! Alle Koordinaten sind `glam::DVec2` (f64). Die Typen sind nach der
//! Konstruktion unveränderlich und können frei zwischen Threads geteilt werden.

pub mod composite;
pub mod curve;
pub mod line;
pub mod placement;
pub mod polycurve;
pub mod simplify;
pub mod spline;

pub use composite::{CompositeCurve, PieceSamples};
pub use curve::{fit, Curve, FittedCurve};
pub use line::LineFit;
pub use placement::{fit_into_area, scale_to_length, scale_uniform, shift_non_negative, AreaFit};
pub use polycurve::{Closure, PolyCurve, CLOSURE_EPSILON};
pub use simplify::simplify;
pub use spline::CubicSpline;

use glam::DVec2;

/// Abstand, unterhalb dessen zwei aufeinanderfolgende Punkte als Duplikat gelten.
pub const DUPLICATE_EPSILON: f64 = 1e-9;

/// Approximierte Länge einer Polyline.
pub fn polyline_length(points: &[DVec2]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Kumulierte Sehnenlänge, beginnend bei 0.0 (gleiche Länge wie `points`).
pub fn cumulative_lengths(points: &[DVec2]) -> Vec<f64> {
    let mut cumulative = Vec::with_capacity(points.len());
    let mut total = 0.0;
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            total += points[i - 1].distance(*p);
        }
        cumulative.push(total);
    }
    cumulative
}

/// Entfernt nicht-endliche Punkte und direkt aufeinanderfolgende Duplikate.
///
/// Freihand-Striche enthalten beides (Maus ausserhalb der Zeichenfläche,
/// Stillstand beim Ziehen).
pub fn sanitize_points(points: &[DVec2]) -> Vec<DVec2> {
    let mut result: Vec<DVec2> = Vec::with_capacity(points.len());
    for &p in points {
        if !p.is_finite() {
            continue;
        }
        if let Some(last) = result.last() {
            if last.distance(p) <= DUPLICATE_EPSILON {
                continue;
            }
        }
        result.push(p);
    }
    if result.len() < points.len() {
        log::debug!(
            "Bereinigung: {} von {} Punkten verworfen",
            points.len() - result.len(),
            points.len()
        );
    }
    result
}

/// Gleitender Mittelwert über `window` Punkte.
///
/// Bei geschlossenen Läufen wird über die Naht hinweg gemittelt, bei offenen
/// schrumpft das Fenster an den Rändern und die Endpunkte bleiben fix.
pub fn moving_average(points: &[DVec2], window: usize, closed: bool) -> Vec<DVec2> {
    let n = points.len();
    if window <= 1 || n < 3 {
        return points.to_vec();
    }
    let half = (window / 2) as isize;

    (0..n)
        .map(|i| {
            if !closed && (i == 0 || i == n - 1) {
                return points[i];
            }
            let mut sum = DVec2::ZERO;
            let mut count = 0.0;
            for k in -half..=half {
                let j = i as isize + k;
                let idx = if closed {
                    j.rem_euclid(n as isize) as usize
                } else if j < 0 || j >= n as isize {
                    continue;
                } else {
                    j as usize
                };
                sum += points[idx];
                count += 1.0;
            }
            sum / count
        })
        .collect()
}

/// Prüft alle Punkte auf Endlichkeit.
pub(crate) fn all_finite(points: &[DVec2]) -> bool {
    points.iter().all(|p| p.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sanitize_drops_nan_and_consecutive_duplicates() {
        let raw = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, 0.0),
            DVec2::new(f64::NAN, 1.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, f64::INFINITY),
            DVec2::new(1.0, 0.0),
            DVec2::new(2.0, 0.0),
        ];
        let clean = sanitize_points(&raw);
        assert_eq!(
            clean,
            vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(1.0, 0.0),
                DVec2::new(2.0, 0.0)
            ]
        );
    }

    #[test]
    fn cumulative_lengths_start_at_zero() {
        let pts = [
            DVec2::new(0.0, 0.0),
            DVec2::new(3.0, 4.0),
            DVec2::new(3.0, 10.0),
        ];
        let cum = cumulative_lengths(&pts);
        assert_eq!(cum.len(), 3);
        assert_relative_eq!(cum[0], 0.0);
        assert_relative_eq!(cum[1], 5.0);
        assert_relative_eq!(cum[2], 11.0);
        assert_relative_eq!(polyline_length(&pts), 11.0);
    }

    #[test]
    fn moving_average_keeps_open_endpoints() {
        let pts = [
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 3.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(3.0, 3.0),
            DVec2::new(4.0, 0.0),
        ];
        let smooth = moving_average(&pts, 3, false);
        assert_eq!(smooth[0], pts[0]);
        assert_eq!(smooth[4], pts[4]);
        assert_relative_eq!(smooth[2].y, 2.0);
    }
}
