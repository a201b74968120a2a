//! Zerlegt ein Polygon in gerade und gekrümmte Läufe.
//!
//! Ablauf: Douglas-Peucker, Knickwinkel je Ecke, Trennung an scharfen oder
//! herausragenden Ecken, Residuen-Test je Lauf.

use crate::error::{Result, TrackError};
use crate::geometry::{fit, simplify, CompositeCurve, Curve, FittedCurve, LineFit, PolyCurve};
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Art eines Laufs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Straight,
    Curved,
}

/// Zusammenhängender Lauf aus Polygon-Ecken.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub points: Vec<DVec2>,
    pub kind: SegmentKind,
    /// Nur gesetzt, wenn ein einziger Lauf ein geschlossenes Polygon ohne Ecke abdeckt.
    pub closed: bool,
}

/// Parameter des Klassifikators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    /// Douglas-Peucker-Toleranz (Welteinheiten).
    pub simplify_tolerance: f64,
    /// Abweichung von 180°, ab der eine Ecke als Knick gilt.
    pub angle_threshold_deg: f64,
    /// Mittleres Residuum, unter dem ein Lauf als gerade gilt.
    pub residual_threshold: f64,
    /// Knicke bis zu dieser Abweichung trennen nur, wenn sie deutlich stärker
    /// als beide Nachbarn knicken.
    pub bend_limit_deg: f64,
}

/// Obergrenze der Vereinfachungstoleranz relativ zur Bounding-Box-Diagonale.
const RELATIVE_SIMPLIFY_TOLERANCE: f64 = 1e-3;

/// Faktor, um den ein Knick unterhalb von `bend_limit_deg` beide Nachbarn
/// übertreffen muss. Auf einem Kreis liegende Ecken erreichen ihn nie.
const PROMINENCE_FACTOR: f64 = 2.0;

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            simplify_tolerance: 0.05,
            angle_threshold_deg: 5.0,
            residual_threshold: 0.25,
            bend_limit_deg: 30.0,
        }
    }
}

/// Winkel (Grad) zwischen den Kanten zum Vorgänger und zum Nachfolger.
///
/// 180° entspricht einer geraden Fortsetzung.
pub fn turn_angle_deg(prev: DVec2, current: DVec2, next: DVec2) -> f64 {
    let a = prev - current;
    let b = next - current;
    let denom = a.length() * b.length();
    if denom <= f64::EPSILON {
        return 180.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Klassifiziert das Polygon in gerade und gekrümmte Läufe.
pub fn classify(polygon: &PolyCurve, params: &ClassifierParams) -> Result<Vec<Segment>> {
    let closed = polygon.is_closed();
    let tolerance = effective_tolerance(polygon.vertices(), params.simplify_tolerance);
    let simplified = simplify(polygon.vertices(), tolerance, closed);
    let n = simplified.len();
    let needed = if closed { 3 } else { 2 };
    if n < needed {
        return Err(TrackError::InsufficientData { needed, found: n });
    }

    let deviation = deviations(&simplified, closed);
    let boundaries: Vec<usize> = (0..n)
        .filter(|&i| {
            let Some(dev) = deviation[i] else {
                return true;
            };
            if dev <= params.angle_threshold_deg {
                return false;
            }
            if dev > params.bend_limit_deg {
                return true;
            }
            // Offene Endpunkte zählen als gerade Nachbarn
            let around = |step| {
                neighbour(i, n, closed, step)
                    .and_then(|j| deviation[j])
                    .unwrap_or(0.0)
            };
            dev >= PROMINENCE_FACTOR * around(-1).max(around(1))
        })
        .collect();

    log::debug!(
        "Klassifikation: {} Ecken nach Vereinfachung, {} Trennstellen",
        n,
        boundaries.len()
    );

    let runs = split_runs(&simplified, &boundaries, closed);
    runs.into_iter()
        .map(|(points, run_closed)| {
            let kind = run_kind(&points, run_closed, params.residual_threshold);
            Ok(Segment {
                points,
                kind,
                closed: run_closed,
            })
        })
        .collect()
}

/// Toleranz für Douglas-Peucker, begrenzt auf einen Bruchteil der Ausdehnung.
///
/// Kleine Formen würden sonst auf wenige Ecken mit scharfen Knicken schrumpfen.
fn effective_tolerance(points: &[DVec2], tolerance: f64) -> f64 {
    let Some(&first) = points.first() else {
        return tolerance;
    };
    let (min, max) = points
        .iter()
        .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
    tolerance.min(RELATIVE_SIMPLIFY_TOLERANCE * min.distance(max))
}

/// Knickabweichung `|180° − Winkel|` je Ecke; `None` für offene Endpunkte.
fn deviations(points: &[DVec2], closed: bool) -> Vec<Option<f64>> {
    let n = points.len();
    (0..n)
        .map(|i| {
            let prev = neighbour(i, n, closed, -1)?;
            let next = neighbour(i, n, closed, 1)?;
            let angle = turn_angle_deg(points[prev], points[i], points[next]);
            Some((180.0 - angle).abs())
        })
        .collect()
}

fn neighbour(i: usize, n: usize, closed: bool, step: isize) -> Option<usize> {
    let j = i as isize + step;
    if closed {
        Some(j.rem_euclid(n as isize) as usize)
    } else if j < 0 || j >= n as isize {
        None
    } else {
        Some(j as usize)
    }
}

/// Schneidet die Ecken an den Trennstellen in Läufe (Trennecken gehören zu beiden Nachbarn).
fn split_runs(points: &[DVec2], boundaries: &[usize], closed: bool) -> Vec<(Vec<DVec2>, bool)> {
    let n = points.len();
    if !closed {
        return boundaries
            .windows(2)
            .map(|w| (points[w[0]..=w[1]].to_vec(), false))
            .collect();
    }
    if boundaries.is_empty() {
        return vec![(points.to_vec(), true)];
    }

    // Rotation: Start an der ersten Trennstelle, keine Naht mitten im Lauf
    let start = boundaries[0];
    let rotated: Vec<DVec2> = (0..=n).map(|k| points[(start + k) % n]).collect();
    let mut cuts: Vec<usize> = boundaries.iter().map(|&b| (b + n - start) % n).collect();
    cuts.push(n);

    cuts.windows(2)
        .map(|w| (rotated[w[0]..=w[1]].to_vec(), false))
        .collect()
}

fn run_kind(points: &[DVec2], closed: bool, residual_threshold: f64) -> SegmentKind {
    if closed {
        return SegmentKind::Curved;
    }
    if points.len() < 3 {
        return SegmentKind::Straight;
    }
    match LineFit::fit(points) {
        Ok(line) if line.mean_residual(points) < residual_threshold => SegmentKind::Straight,
        _ => SegmentKind::Curved,
    }
}

/// Fittet jeden Lauf mit der Kurvenart seines Typs und verbindet die Stücke.
pub fn build_curve(
    segments: &[Segment],
    closed: bool,
    smoothing_window: usize,
) -> Result<CompositeCurve> {
    let pieces = segments
        .iter()
        .map(|segment| fit(&segment.points, segment.closed, segment.kind, smoothing_window))
        .collect::<Result<Vec<FittedCurve>>>()?;
    CompositeCurve::new(pieces, closed)
}
