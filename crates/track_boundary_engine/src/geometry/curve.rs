//! Gemeinsamer Vertrag aller parametrischen Kurven und die Fit-Auswahl.

use super::{moving_average, CubicSpline, LineFit, PolyCurve};
use crate::error::Result;
use crate::segment::SegmentKind;
use glam::DVec2;

/// Parametrische ebene Kurve mit `u ∈ [0, 1]`.
///
/// `u` ist **keine** Bogenlänge. Bogenlängen-Abfragen laufen über
/// [`crate::sampling::ArcLengthTable`].
pub trait Curve {
    /// Position bei `u`.
    fn sample(&self, u: f64) -> DVec2;

    /// Ableitung nach `u`.
    fn derivative(&self, u: f64) -> DVec2;

    /// Geschlossene Kurven kehren bei `u = 1` zum Start zurück.
    fn is_closed(&self) -> bool;

    /// `n` Punkte bei gleichverteiltem Parameter (inklusive beider Enden).
    fn resample_uniform(&self, n: usize) -> Vec<DVec2> {
        match n {
            0 => Vec::new(),
            1 => vec![self.sample(0.0)],
            _ => (0..n)
                .map(|i| self.sample(i as f64 / (n - 1) as f64))
                .collect(),
        }
    }

    /// Polylinien-Näherung mit `samples` Stützstellen.
    fn to_polyline(&self, samples: usize) -> Result<PolyCurve> {
        let points = self.resample_uniform(samples.max(2));
        if self.is_closed() {
            PolyCurve::closed(points)
        } else {
            PolyCurve::open(points)
        }
    }
}

/// Normalisiert `u` für offene (clamp) bzw. geschlossene (wrap) Kurven.
pub(crate) fn normalize_param(u: f64, closed: bool) -> f64 {
    if closed {
        if u == 1.0 { 1.0 } else { u.rem_euclid(1.0) }
    } else {
        u.clamp(0.0, 1.0)
    }
}

/// Ergebnis eines Einzel-Fits: Gerade oder Spline.
#[derive(Debug, Clone)]
pub enum FittedCurve {
    Line(LineFit),
    Spline(CubicSpline),
}

impl FittedCurve {
    /// `true` für Spline-Fits.
    pub fn is_spline(&self) -> bool {
        matches!(self, Self::Spline(_))
    }
}

impl Curve for FittedCurve {
    fn sample(&self, u: f64) -> DVec2 {
        match self {
            Self::Line(line) => line.sample(u),
            Self::Spline(spline) => spline.sample(u),
        }
    }

    fn derivative(&self, u: f64) -> DVec2 {
        match self {
            Self::Line(line) => line.derivative(u),
            Self::Spline(spline) => spline.derivative(u),
        }
    }

    fn is_closed(&self) -> bool {
        match self {
            Self::Line(_) => false,
            Self::Spline(spline) => spline.is_closed(),
        }
    }
}

/// Fittet einen Punktlauf.
///
/// - `Curved` mit mindestens 3 Punkten: interpolierender kubischer Spline
///   (periodisch wenn `closed`), optional vorab mit gleitendem Mittel geglättet.
/// - `Straight` oder weniger als 3 Punkte: Least-Squares-Gerade über den Index.
pub fn fit(
    points: &[DVec2],
    closed: bool,
    kind: SegmentKind,
    smoothing_window: usize,
) -> Result<FittedCurve> {
    if kind == SegmentKind::Straight || points.len() < 3 {
        return LineFit::fit(points).map(FittedCurve::Line);
    }
    let input = if smoothing_window > 1 {
        moving_average(points, smoothing_window, closed)
    } else {
        points.to_vec()
    };
    CubicSpline::fit(&input, closed).map(FittedCurve::Spline)
}
