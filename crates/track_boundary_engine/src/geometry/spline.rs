//! Interpolierender kubischer Spline mit Sehnenlängen-Parametrisierung.
//!
//! Offen: natürliche Randbedingungen (zweite Ableitung 0 an den Enden).
//! Geschlossen: periodisch, C2-stetig über die Naht.

use super::curve::{normalize_param, Curve};
use super::{all_finite, cumulative_lengths, CLOSURE_EPSILON, DUPLICATE_EPSILON};
use crate::error::{Result, TrackError};
use glam::DVec2;
use std::ops::{Div, Mul, Sub};

/// Kubischer Spline durch alle Stützpunkte.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    /// Stützpunkte; bei periodischen Splines inklusive Schlusspunkt.
    points: Vec<DVec2>,
    /// Normalisierte Knoten in `[0, 1]`.
    knots: Vec<f64>,
    /// Zweite Ableitungen an den Knoten.
    second: Vec<DVec2>,
    closed: bool,
}

impl CubicSpline {
    /// Fittet den Spline. `closed` erzeugt einen periodischen Spline; ein
    /// vorhandener Schlusspunkt (gleich dem Start) wird dabei ignoriert.
    pub fn fit(points: &[DVec2], closed: bool) -> Result<Self> {
        if !all_finite(points) {
            return Err(TrackError::degenerate("Spline mit nicht-endlichen Punkten"));
        }
        let mut pts = points.to_vec();
        if closed
            && pts.len() > 1
            && pts[0].distance(pts[pts.len() - 1]) <= CLOSURE_EPSILON
        {
            pts.pop();
        }

        let needed = if closed { 3 } else { 2 };
        if pts.len() < needed {
            return Err(TrackError::InsufficientData {
                needed,
                found: pts.len(),
            });
        }
        if closed {
            pts.push(pts[0]);
        }
        if pts.windows(2).any(|w| w[0].distance(w[1]) <= DUPLICATE_EPSILON) {
            return Err(TrackError::degenerate(
                "Spline mit doppelten aufeinanderfolgenden Punkten",
            ));
        }

        let cumulative = cumulative_lengths(&pts);
        let total = cumulative[cumulative.len() - 1];
        if !(total.is_finite() && total > 0.0) {
            return Err(TrackError::degenerate("Spline-Länge ist nicht endlich"));
        }
        let knots: Vec<f64> = cumulative.iter().map(|c| c / total).collect();
        let h: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();
        if h.iter().any(|&step| step.is_nan() || step <= 1e-12) {
            return Err(TrackError::degenerate("Spline-Knotenabstand ist 0"));
        }

        let second = if closed {
            periodic_second_derivatives(&pts, &h)
        } else {
            natural_second_derivatives(&pts, &h)
        };

        Ok(Self {
            points: pts,
            knots,
            second,
            closed,
        })
    }

    /// Stützpunkte (periodisch: inklusive Schlusspunkt).
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// Normalisierte Knoten.
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    fn interval(&self, u: f64) -> (usize, f64, f64) {
        let idx = self.knots.partition_point(|&k| k <= u);
        let i = idx.saturating_sub(1).min(self.knots.len() - 2);
        let h = self.knots[i + 1] - self.knots[i];
        let a = (self.knots[i + 1] - u) / h;
        let b = (u - self.knots[i]) / h;
        (i, a, b)
    }
}

impl Curve for CubicSpline {
    fn sample(&self, u: f64) -> DVec2 {
        let u = normalize_param(u, self.closed);
        let (i, a, b) = self.interval(u);
        let h = self.knots[i + 1] - self.knots[i];
        self.points[i] * a
            + self.points[i + 1] * b
            + (self.second[i] * (a * a * a - a) + self.second[i + 1] * (b * b * b - b)) * (h * h)
                / 6.0
    }

    fn derivative(&self, u: f64) -> DVec2 {
        let u = normalize_param(u, self.closed);
        let (i, a, b) = self.interval(u);
        let h = self.knots[i + 1] - self.knots[i];
        (self.points[i + 1] - self.points[i]) / h
            + (self.second[i] * (1.0 - 3.0 * a * a) + self.second[i + 1] * (3.0 * b * b - 1.0)) * h
                / 6.0
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

fn natural_second_derivatives(points: &[DVec2], h: &[f64]) -> Vec<DVec2> {
    let n = points.len();
    let mut second = vec![DVec2::ZERO; n];
    if n < 3 {
        return second;
    }
    let inner = n - 2;
    let mut sub = vec![0.0; inner];
    let mut diag = vec![0.0; inner];
    let mut sup = vec![0.0; inner];
    let mut rhs = vec![DVec2::ZERO; inner];
    for k in 0..inner {
        let i = k + 1;
        sub[k] = h[i - 1];
        diag[k] = 2.0 * (h[i - 1] + h[i]);
        sup[k] = h[i];
        rhs[k] =
            ((points[i + 1] - points[i]) / h[i] - (points[i] - points[i - 1]) / h[i - 1]) * 6.0;
    }
    let solved = solve_tridiagonal(&sub, &diag, &sup, &rhs);
    second[1..n - 1].copy_from_slice(&solved);
    second
}

/// `points` enthält den Schlusspunkt (`points[m] == points[0]`).
fn periodic_second_derivatives(points: &[DVec2], h: &[f64]) -> Vec<DVec2> {
    let m = points.len() - 1;
    let prev = |i: usize| (i + m - 1) % m;
    let next = |i: usize| (i + 1) % m;

    let mut sub = vec![0.0; m];
    let mut diag = vec![0.0; m];
    let mut sup = vec![0.0; m];
    let mut rhs = vec![DVec2::ZERO; m];
    for i in 0..m {
        let h_prev = h[prev(i)];
        let h_cur = h[i];
        sub[i] = h_prev;
        diag[i] = 2.0 * (h_prev + h_cur);
        sup[i] = h_cur;
        rhs[i] = ((points[next(i)] - points[i]) / h_cur - (points[i] - points[prev(i)]) / h_prev)
            * 6.0;
    }

    let mut second = solve_cyclic(&sub, &diag, &sup, &rhs);
    second.push(second[0]);
    second
}

/// Thomas-Algorithmus für tridiagonale Systeme.
///
/// `sub[0]` und `sup[n-1]` werden ignoriert.
fn solve_tridiagonal<T>(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[T]) -> Vec<T>
where
    T: Copy + Sub<Output = T> + Mul<f64, Output = T> + Div<f64, Output = T>,
{
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d: Vec<T> = Vec::with_capacity(n);

    c[0] = sup[0] / diag[0];
    d.push(rhs[0] / diag[0]);
    for i in 1..n {
        let m = diag[i] - sub[i] * c[i - 1];
        c[i] = sup[i] / m;
        let value = (rhs[i] - d[i - 1] * sub[i]) / m;
        d.push(value);
    }

    for i in (0..n - 1).rev() {
        d[i] = d[i] - d[i + 1] * c[i];
    }
    d
}

/// Zyklisch tridiagonales System per Sherman-Morrison.
///
/// Eckelemente: `A[0][n-1] = sub[0]`, `A[n-1][0] = sup[n-1]`. Benötigt `n >= 3`.
fn solve_cyclic(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[DVec2]) -> Vec<DVec2> {
    let n = diag.len();
    let beta = sub[0];
    let alpha = sup[n - 1];
    let gamma = -diag[0];

    let mut bb = diag.to_vec();
    bb[0] = diag[0] - gamma;
    bb[n - 1] = diag[n - 1] - alpha * beta / gamma;

    let x = solve_tridiagonal(sub, &bb, sup, rhs);

    let mut u = vec![0.0; n];
    u[0] = gamma;
    u[n - 1] = alpha;
    let z = solve_tridiagonal(sub, &bb, sup, &u);

    let fact = (x[0] + x[n - 1] * (beta / gamma)) / (1.0 + z[0] + beta * z[n - 1] / gamma);
    x.iter()
        .zip(&z)
        .map(|(&xi, &zi)| xi - fact * zi)
        .collect()
}
