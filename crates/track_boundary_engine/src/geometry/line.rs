//! Least-Squares-Gerade über einen synthetischen Index-Parameter.

use super::curve::Curve;
use super::{all_finite, DUPLICATE_EPSILON};
use crate::error::{Result, TrackError};
use glam::DVec2;

/// Gerade `p(t) = origin + slope · t` mit `t = u · span`, `span = n − 1`.
///
/// Entspricht einem Polynom ersten Grades in x und y gegen den Punkt-Index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    origin: DVec2,
    slope: DVec2,
    span: f64,
}

impl LineFit {
    /// Fittet die Gerade an mindestens zwei Punkte.
    pub fn fit(points: &[DVec2]) -> Result<Self> {
        if points.len() < 2 {
            return Err(TrackError::degenerate(format!(
                "Geraden-Fit braucht mindestens 2 Punkte, {} vorhanden",
                points.len()
            )));
        }
        if !all_finite(points) {
            return Err(TrackError::degenerate("Geraden-Fit mit nicht-endlichen Punkten"));
        }

        let n = points.len() as f64;
        let t_mean = (n - 1.0) / 2.0;
        let p_mean = points.iter().copied().sum::<DVec2>() / n;

        let mut num = DVec2::ZERO;
        let mut den = 0.0;
        for (i, &p) in points.iter().enumerate() {
            let dt = i as f64 - t_mean;
            num += (p - p_mean) * dt;
            den += dt * dt;
        }
        let slope = num / den;
        let span = n - 1.0;

        if (slope * span).length() <= DUPLICATE_EPSILON {
            return Err(TrackError::degenerate("Geraden-Fit über einen Lauf der Länge 0"));
        }

        Ok(Self {
            origin: p_mean - slope * t_mean,
            slope,
            span,
        })
    }

    /// Position beim Index-Parameter `t` (nicht normalisiert).
    pub fn at_index(&self, t: f64) -> DVec2 {
        self.origin + self.slope * t
    }

    /// Mittlerer euklidischer Abstand der Punkte zu ihrer Fit-Position.
    pub fn mean_residual(&self, points: &[DVec2]) -> f64 {
        if points.is_empty() {
            return 0.0;
        }
        let sum: f64 = points
            .iter()
            .enumerate()
            .map(|(i, p)| p.distance(self.at_index(i as f64)))
            .sum();
        sum / points.len() as f64
    }

    /// Länge der Geraden zwischen `u = 0` und `u = 1`.
    pub fn length(&self) -> f64 {
        (self.slope * self.span).length()
    }
}

impl Curve for LineFit {
    fn sample(&self, u: f64) -> DVec2 {
        self.at_index(u.clamp(0.0, 1.0) * self.span)
    }

    fn derivative(&self, _u: f64) -> DVec2 {
        self.slope * self.span
    }

    fn is_closed(&self) -> bool {
        false
    }
}
