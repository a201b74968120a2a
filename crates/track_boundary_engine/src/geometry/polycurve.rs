//! Unveränderliche Polyline mit gecachter Sehnenlänge.

use super::curve::{normalize_param, Curve};
use super::{all_finite, cumulative_lengths};
use crate::error::{Result, TrackError};
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Abstand, ab dem erster und letzter Punkt als identisch gelten.
pub const CLOSURE_EPSILON: f64 = 1e-6;

/// Regel, nach der ein Punktlauf geschlossen wird.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Closure {
    /// Geschlossen, wenn die Lücke zwischen Ende und Start kleiner als `threshold` ist.
    Auto { threshold: f64 },
    /// Immer geschlossen.
    Closed,
    /// Immer offen.
    Open,
}

impl Default for Closure {
    fn default() -> Self {
        Self::Auto { threshold: 10.0 }
    }
}

/// Geordnete Punktfolge, optional geschlossen.
///
/// Bei geschlossenen Kurven ist der letzte Punkt eine Kopie des ersten.
/// [`PolyCurve::vertices`] liefert die Ecken ohne diese Kopie.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyCurve {
    points: Vec<DVec2>,
    closed: bool,
    cumulative: Vec<f64>,
}

impl PolyCurve {
    /// Offene Polyline aus mindestens zwei Punkten.
    pub fn open(points: Vec<DVec2>) -> Result<Self> {
        Self::build(points, false)
    }

    /// Geschlossene Polyline. Der Startpunkt wird angehängt, falls Ende und
    /// Start nicht schon zusammenfallen.
    pub fn closed(mut points: Vec<DVec2>) -> Result<Self> {
        validate(&points)?;
        let first = points[0];
        let last = points[points.len() - 1];
        if first.distance(last) > CLOSURE_EPSILON {
            points.push(first);
        } else if let Some(end) = points.last_mut() {
            *end = first;
        }
        if points.len() < 4 {
            return Err(TrackError::InsufficientData {
                needed: 3,
                found: points.len() - 1,
            });
        }
        Self::build(points, true)
    }

    /// Schliesst den Lauf, wenn die Lücke zwischen Ende und Start kleiner als
    /// `closure_threshold` ist, sonst bleibt er offen.
    pub fn with_closure(points: Vec<DVec2>, closure_threshold: f64) -> Result<Self> {
        validate(&points)?;
        let gap = points[0].distance(points[points.len() - 1]);
        if gap <= CLOSURE_EPSILON || gap < closure_threshold {
            Self::closed(points)
        } else {
            Self::open(points)
        }
    }

    /// Wendet die gewählte [`Closure`]-Regel an.
    pub fn from_closure(points: Vec<DVec2>, closure: Closure) -> Result<Self> {
        match closure {
            Closure::Auto { threshold } => Self::with_closure(points, threshold),
            Closure::Closed => Self::closed(points),
            Closure::Open => Self::open(points),
        }
    }

    fn build(points: Vec<DVec2>, closed: bool) -> Result<Self> {
        validate(&points)?;
        let cumulative = cumulative_lengths(&points);
        let total = cumulative.last().copied().unwrap_or(0.0);
        if total <= 0.0 {
            return Err(TrackError::degenerate("Polyline mit Gesamtlänge 0"));
        }
        Ok(Self {
            points,
            closed,
            cumulative,
        })
    }

    /// Alle Punkte, bei geschlossenen Kurven inklusive Schlusspunkt.
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// Ecken ohne den duplizierten Schlusspunkt.
    pub fn vertices(&self) -> &[DVec2] {
        if self.closed {
            &self.points[..self.points.len() - 1]
        } else {
            &self.points
        }
    }

    /// Kumulierte Sehnenlänge je Punkt.
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Gesamtlänge (inklusive Schlusskante bei geschlossenen Kurven).
    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Gleiche Kurve mit umgekehrter Punktreihenfolge.
    pub fn reversed(&self) -> Self {
        let points: Vec<DVec2> = self.points.iter().rev().copied().collect();
        let cumulative = cumulative_lengths(&points);
        Self {
            points,
            closed: self.closed,
            cumulative,
        }
    }

    /// Index der Kante, auf der die Bogenlänge `s` liegt.
    fn segment_at(&self, s: f64) -> usize {
        let idx = self.cumulative.partition_point(|&c| c <= s);
        idx.saturating_sub(1).min(self.points.len() - 2)
    }
}

fn validate(points: &[DVec2]) -> Result<()> {
    if points.len() < 2 {
        return Err(TrackError::InsufficientData {
            needed: 2,
            found: points.len(),
        });
    }
    if !all_finite(points) {
        return Err(TrackError::degenerate("Polyline enthält nicht-endliche Punkte"));
    }
    Ok(())
}

impl Curve for PolyCurve {
    fn sample(&self, u: f64) -> DVec2 {
        let s = normalize_param(u, self.closed) * self.length();
        let i = self.segment_at(s);
        let seg_len = self.cumulative[i + 1] - self.cumulative[i];
        if seg_len <= 0.0 {
            return self.points[i];
        }
        let t = ((s - self.cumulative[i]) / seg_len).clamp(0.0, 1.0);
        self.points[i].lerp(self.points[i + 1], t)
    }

    fn derivative(&self, u: f64) -> DVec2 {
        let s = normalize_param(u, self.closed) * self.length();
        let i = self.segment_at(s);
        let seg_len = self.cumulative[i + 1] - self.cumulative[i];
        if seg_len <= 0.0 {
            return DVec2::ZERO;
        }
        (self.points[i + 1] - self.points[i]) / seg_len * self.length()
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn to_polyline(&self, _samples: usize) -> Result<PolyCurve> {
        Ok(self.clone())
    }
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
    fn closed_appends_start_point() {
        let curve = PolyCurve::closed(square()).unwrap();
        assert_eq!(curve.points().len(), 5);
        assert_eq!(curve.vertices().len(), 4);
        assert_relative_eq!(curve.length(), 40.0);
        assert!(curve.is_closed());
    }

    #[test]
    fn closed_does_not_duplicate_existing_closure() {
        let mut pts = square();
        pts.push(DVec2::new(0.0, 1e-8));
        let curve = PolyCurve::closed(pts).unwrap();
        assert_eq!(curve.points().len(), 5);
        assert_eq!(curve.points()[4], curve.points()[0]);
    }

    #[test]
    fn auto_closure_respects_threshold() {
        let mut pts = square();
        pts.push(DVec2::new(0.0, 3.0));
        let near = PolyCurve::with_closure(pts.clone(), 5.0).unwrap();
        assert!(near.is_closed());
        let far = PolyCurve::with_closure(pts, 2.0).unwrap();
        assert!(!far.is_closed());
    }

    #[test]
    fn sample_follows_chord_length() {
        let curve = PolyCurve::closed(square()).unwrap();
        let p = curve.sample(0.375);
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, 5.0, epsilon = 1e-9);
        let end = curve.sample(1.0);
        assert_relative_eq!(end.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(end.y, 0.0, epsilon = 1e-9);
        let d = curve.derivative(0.1);
        assert_relative_eq!(d.x, 40.0, epsilon = 1e-9);
    }

    #[test]
    fn invalid_input_is_rejected() {
        assert!(matches!(
            PolyCurve::open(vec![DVec2::ZERO]),
            Err(TrackError::InsufficientData { .. })
        ));
        assert!(matches!(
            PolyCurve::open(vec![DVec2::ZERO, DVec2::new(f64::NAN, 0.0)]),
            Err(TrackError::DegenerateInput(_))
        ));
        assert!(PolyCurve::open(vec![DVec2::ONE, DVec2::ONE]).is_err());
        assert!(PolyCurve::closed(vec![DVec2::ZERO, DVec2::X]).is_err());
    }
}
