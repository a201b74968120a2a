//! Aneinandergereihte Einzel-Fits der klassifizierten Segmente.

use super::curve::{normalize_param, Curve, FittedCurve};
use super::{polyline_length, PolyCurve, DUPLICATE_EPSILON};
use crate::error::{Result, TrackError};
use glam::DVec2;

/// Stützstellen je Stück beim Abtasten einer [`CompositeCurve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSamples {
    pub line: usize,
    pub spline: usize,
}

impl Default for PieceSamples {
    fn default() -> Self {
        Self {
            line: 20,
            spline: 30,
        }
    }
}

/// Stückweise Kurve; Parameterbereiche proportional zur Sehnenlänge der Stücke.
#[derive(Debug, Clone)]
pub struct CompositeCurve {
    pieces: Vec<FittedCurve>,
    /// `pieces.len() + 1` Grenzen von 0.0 bis 1.0.
    breaks: Vec<f64>,
    closed: bool,
}

/// Stützstellen zur Längenschätzung eines Stücks.
const LENGTH_PROBE_SAMPLES: usize = 32;

impl CompositeCurve {
    pub fn new(pieces: Vec<FittedCurve>, closed: bool) -> Result<Self> {
        if pieces.is_empty() {
            return Err(TrackError::InsufficientData {
                needed: 1,
                found: 0,
            });
        }
        let lengths: Vec<f64> = pieces
            .iter()
            .map(|p| polyline_length(&p.resample_uniform(LENGTH_PROBE_SAMPLES)))
            .collect();
        let total: f64 = lengths.iter().sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(TrackError::degenerate("zusammengesetzte Kurve der Länge 0"));
        }

        let mut breaks = Vec::with_capacity(pieces.len() + 1);
        let mut acc = 0.0;
        breaks.push(0.0);
        for len in &lengths {
            acc += len;
            breaks.push(acc / total);
        }
        if let Some(last) = breaks.last_mut() {
            *last = 1.0;
        }

        Ok(Self {
            pieces,
            breaks,
            closed,
        })
    }

    pub fn pieces(&self) -> &[FittedCurve] {
        &self.pieces
    }

    /// `true`, wenn die Kurve aus genau einem Spline besteht (keine Ecken, keine Geraden).
    pub fn is_single_spline(&self) -> bool {
        self.pieces.len() == 1 && self.pieces[0].is_spline()
    }

    /// Tastet jedes Stück mit der passenden Stützstellenzahl ab und verbindet
    /// die Läufe. Direkt aufeinanderfolgende Duplikate werden entfernt.
    pub fn points_with(&self, samples: PieceSamples) -> Vec<DVec2> {
        let mut result: Vec<DVec2> = Vec::new();
        for piece in &self.pieces {
            let n = if piece.is_spline() {
                samples.spline
            } else {
                samples.line
            };
            for p in piece.resample_uniform(n.max(2)) {
                if result
                    .last()
                    .is_some_and(|last| last.distance(p) <= DUPLICATE_EPSILON)
                {
                    continue;
                }
                result.push(p);
            }
        }
        result
    }

    /// Wie [`Self::points_with`], aber als [`PolyCurve`] mit der Schliessung der Kurve.
    pub fn to_polyline_with(&self, samples: PieceSamples) -> Result<PolyCurve> {
        let points = self.points_with(samples);
        if self.closed {
            PolyCurve::closed(points)
        } else {
            PolyCurve::open(points)
        }
    }

    fn locate(&self, u: f64) -> (usize, f64) {
        let u = normalize_param(u, self.closed);
        let idx = self.breaks.partition_point(|&b| b <= u);
        let i = idx.saturating_sub(1).min(self.pieces.len() - 1);
        let width = self.breaks[i + 1] - self.breaks[i];
        let local = if width > 0.0 {
            ((u - self.breaks[i]) / width).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (i, local)
    }
}

impl Curve for CompositeCurve {
    fn sample(&self, u: f64) -> DVec2 {
        let (i, local) = self.locate(u);
        self.pieces[i].sample(local)
    }

    fn derivative(&self, u: f64) -> DVec2 {
        let (i, local) = self.locate(u);
        let width = self.breaks[i + 1] - self.breaks[i];
        if width <= 0.0 {
            return DVec2::ZERO;
        }
        self.pieces[i].derivative(local) / width
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn to_polyline(&self, samples: usize) -> Result<PolyCurve> {
        let per_piece = (samples / self.pieces.len()).max(2);
        self.to_polyline_with(PieceSamples {
            line: 2,
            spline: per_piece,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LineFit;
    use approx::assert_relative_eq;

    fn line(a: DVec2, b: DVec2) -> FittedCurve {
        FittedCurve::Line(LineFit::fit(&[a, b]).unwrap())
    }

    #[test]
    fn breaks_follow_piece_lengths() {
        let curve = CompositeCurve::new(
            vec![
                line(DVec2::ZERO, DVec2::new(10.0, 0.0)),
                line(DVec2::new(10.0, 0.0), DVec2::new(10.0, 30.0)),
            ],
            false,
        )
        .unwrap();
        let p = curve.sample(0.25);
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-9);
        let q = curve.sample(0.5);
        assert_relative_eq!(q.y, 10.0, epsilon = 1e-9);
        assert!(!curve.is_single_spline());
    }

    #[test]
    fn piece_samples_drop_shared_endpoints() {
        let curve = CompositeCurve::new(
            vec![
                line(DVec2::ZERO, DVec2::new(10.0, 0.0)),
                line(DVec2::new(10.0, 0.0), DVec2::new(10.0, 10.0)),
            ],
            false,
        )
        .unwrap();
        let pts = curve.points_with(PieceSamples { line: 3, spline: 10 });
        assert_eq!(pts.len(), 5);
    }

    #[test]
    fn empty_composite_is_rejected() {
        assert!(CompositeCurve::new(Vec::new(), true).is_err());
    }
}
