//! Abtastung in gleichen Bogenlängen-Abständen.
//!
//! Der Kurvenparameter `u` ist keine Bogenlänge. [`ArcLengthTable`] bildet
//! über eine dichte Abtastung eine monotone Zuordnung Bogenlänge → `u`.

use crate::error::{require_positive, Result, TrackError};
use crate::geometry::{cumulative_lengths, Curve, PolyCurve};
use glam::DVec2;

/// Mindestanzahl dichter Abtastpunkte.
pub const MIN_DENSE_SAMPLES: usize = 1000;

/// Höchstzahl an Zielpunkten einer einzelnen Abtastung.
pub const MAX_SPACING_TARGETS: usize = 10_000_000;

/// Zuordnung kumulierte Sehnenlänge → Kurvenparameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcLengthTable {
    params: Vec<f64>,
    lengths: Vec<f64>,
}

impl ArcLengthTable {
    /// Tastet die Kurve bei `dense_samples` (mindestens [`MIN_DENSE_SAMPLES`])
    /// gleichverteilten Parametern ab.
    pub fn build<C: Curve + ?Sized>(curve: &C, dense_samples: usize) -> Self {
        let n = dense_samples.max(MIN_DENSE_SAMPLES);
        let params: Vec<f64> = (0..n).map(|i| i as f64 / (n - 1) as f64).collect();
        let points: Vec<DVec2> = params.iter().map(|&u| curve.sample(u)).collect();
        let lengths = cumulative_lengths(&points);
        Self { params, lengths }
    }

    pub fn total_length(&self) -> f64 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Parameter `u` zur Bogenlänge `s` (lineare Interpolation, auf `[0, L]` begrenzt).
    pub fn param_at(&self, s: f64) -> f64 {
        interpolate(&self.lengths, &self.params, s)
    }
}

/// Lineare Interpolation von `values` über die monotonen Stützstellen `keys`.
fn interpolate<T>(keys: &[f64], values: &[T], s: f64) -> T
where
    T: Copy
        + std::ops::Add<Output = T>
        + std::ops::Sub<Output = T>
        + std::ops::Mul<f64, Output = T>,
{
    let last = keys.len() - 1;
    // `min`/`max` statt `clamp`: kein Abbruch bei NaN-Stützstellen
    let s = s.max(0.0).min(keys[last]);
    let idx = keys.partition_point(|&k| k <= s);
    let i = idx.saturating_sub(1).min(last.saturating_sub(1));
    if last == 0 {
        return values[0];
    }
    let span = keys[i + 1] - keys[i];
    if span <= 0.0 {
        return values[i];
    }
    let t = ((s - keys[i]) / span).clamp(0.0, 1.0);
    values[i] + (values[i + 1] - values[i]) * t
}

/// Ziel-Bogenlängen: `n = max(2, floor(L / spacing) + 1)` gleichverteilt von 0 bis L.
///
/// Bei geschlossenen Kurven fällt das letzte Ziel (identisch mit dem ersten) weg.
/// Mehr als [`MAX_SPACING_TARGETS`] Ziele ergeben `InvalidParameter` für `spacing`.
pub fn spacing_targets(total_length: f64, spacing: f64, closed: bool) -> Result<Vec<f64>> {
    let steps = (total_length / spacing + 1e-9).floor();
    if !steps.is_finite() || steps >= MAX_SPACING_TARGETS as f64 {
        return Err(TrackError::InvalidParameter {
            name: "spacing",
            value: spacing,
        });
    }
    let n = (steps as usize + 1).max(2);
    let count = if closed { n - 1 } else { n };
    Ok((0..count)
        .map(|k| total_length * k as f64 / (n - 1) as f64)
        .collect())
}

/// Punkte in gleichen Bogenlängen-Abständen entlang einer gefitteten Kurve.
pub fn sample_by_spacing<C: Curve + ?Sized>(
    curve: &C,
    spacing: f64,
    dense_samples: usize,
) -> Result<Vec<DVec2>> {
    let spacing = require_positive("spacing", spacing)?;
    let table = ArcLengthTable::build(curve, dense_samples);
    let total = table.total_length();
    if !(total.is_finite() && total > 0.0) {
        return Err(TrackError::degenerate("Kurve der Länge 0 kann nicht abgetastet werden"));
    }
    let points: Vec<DVec2> = spacing_targets(total, spacing, curve.is_closed())?
        .into_iter()
        .map(|s| curve.sample(table.param_at(s)))
        .collect();
    log::debug!(
        "Bogenlängen-Abtastung: L = {:.3}, Abstand {:.3}, {} Punkte",
        total,
        spacing,
        points.len()
    );
    Ok(points)
}

/// Direkte Interpolation entlang der kumulierten Sehnenlänge einer Polyline.
pub fn sample_polyline_by_spacing(polyline: &PolyCurve, spacing: f64) -> Result<Vec<DVec2>> {
    sample_points_by_spacing(polyline.points(), spacing, polyline.is_closed())
}

/// Wie [`sample_polyline_by_spacing`], für rohe Koordinatenpaare.
///
/// Bei `closed` muss der Schlusspunkt bereits enthalten sein.
pub fn sample_points_by_spacing(
    points: &[DVec2],
    spacing: f64,
    closed: bool,
) -> Result<Vec<DVec2>> {
    if points.len() < 2 {
        return Err(TrackError::InsufficientData {
            needed: 2,
            found: points.len(),
        });
    }
    let spacing = require_positive("spacing", spacing)?;
    let cumulative = cumulative_lengths(points);
    let total = cumulative[cumulative.len() - 1];
    if !(total.is_finite() && total > 0.0) {
        return Err(TrackError::degenerate("Polyline der Länge 0 kann nicht abgetastet werden"));
    }
    Ok(spacing_targets(total, spacing, closed)?
        .into_iter()
        .map(|s| interpolate(&cumulative, points, s))
        .collect())
}
