//! Parallelverschiebung von Mittellinien zu Streckenrändern.
//!
//! Zwei Strategien:
//! - Normalenverschiebung: jeder Abtastpunkt wandert entlang seiner Normalen.
//!   Erhält die Punktzahl, kann bei engen Kurven Schleifen bilden.
//! - Parallelkurve: echter Offset über `cavalier_contours` mit runden
//!   Verbindungen; zerfällt das Ergebnis, bleibt die längste Komponente.

use crate::error::{require_positive, Result, TrackError};
use crate::geometry::{simplify::point_segment_distance, Curve, PolyCurve};
use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline};
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Seite relativ zur Laufrichtung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetSide {
    Left,
    Right,
}

impl OffsetSide {
    /// +1 für links, −1 für rechts.
    pub fn sign(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Konkret ausgeführte Offset-Strategie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetStrategy {
    NormalDisplacement,
    ParallelCurve,
}

/// Konfigurierbare Strategiewahl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetMode {
    /// Glatter Einzel-Spline: Normalen, sonst Parallelkurve.
    #[default]
    Auto,
    NormalDisplacement,
    ParallelCurve,
}

impl OffsetMode {
    /// Löst `Auto` anhand der Kurvenform auf.
    pub fn resolve(self, single_smooth_spline: bool) -> OffsetStrategy {
        match self {
            Self::Auto if single_smooth_spline => OffsetStrategy::NormalDisplacement,
            Self::Auto => OffsetStrategy::ParallelCurve,
            Self::NormalDisplacement => OffsetStrategy::NormalDisplacement,
            Self::ParallelCurve => OffsetStrategy::ParallelCurve,
        }
    }
}

/// Abtastung und Bogen-Toleranz für [`offset`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetOptions {
    /// Stützstellen entlang der Quellkurve.
    pub samples: usize,
    /// Maximaler Sehnenfehler beim Auflösen von Bögen in Geraden.
    pub arc_tolerance: f64,
}

impl Default for OffsetOptions {
    fn default() -> Self {
        Self {
            samples: 1000,
            arc_tolerance: 0.01,
        }
    }
}

/// Beide Ränder einer Mittellinie.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetPair {
    pub left: PolyCurve,
    pub right: PolyCurve,
}

impl OffsetPair {
    pub fn side(&self, side: OffsetSide) -> &PolyCurve {
        match side {
            OffsetSide::Left => &self.left,
            OffsetSide::Right => &self.right,
        }
    }
}

/// Normalenverschiebung bei `samples` gleichverteilten Parameterwerten.
pub fn offset_by_normals<C: Curve + ?Sized>(
    curve: &C,
    distance: f64,
    side: OffsetSide,
    samples: usize,
) -> Result<PolyCurve> {
    let distance = require_positive("distance", distance)?;
    let n = samples.max(2);
    let closed = curve.is_closed();
    // Bei geschlossenen Kurven ist u = 1 identisch mit u = 0
    let count = if closed { n - 1 } else { n };
    let signed = distance * side.sign();

    let points: Vec<DVec2> = (0..count)
        .map(|i| {
            let u = i as f64 / (n - 1) as f64;
            let d = curve.derivative(u);
            let norm = d.length();
            let tangent = if norm > 0.0 { d / norm } else { d };
            curve.sample(u) + tangent.perp() * signed
        })
        .collect();

    if points.iter().any(|p| !p.is_finite()) {
        return Err(TrackError::degenerate("Normalen-Offset erzeugt nicht-endliche Punkte"));
    }
    if closed {
        PolyCurve::closed(points)
    } else {
        PolyCurve::open(points)
    }
}

/// Echter Parallel-Offset einer Polyline.
pub fn offset_parallel(
    polyline: &PolyCurve,
    distance: f64,
    side: OffsetSide,
    arc_tolerance: f64,
) -> Result<PolyCurve> {
    let distance = require_positive("distance", distance)?;
    let arc_tolerance = require_positive("arc_tolerance", arc_tolerance)?;
    let closed = polyline.is_closed();

    let mut source = if closed {
        Polyline::new_closed()
    } else {
        Polyline::new()
    };
    for p in polyline.vertices() {
        source.add_vertex(PlineVertex::new(p.x, p.y, 0.0));
    }

    let mut result = longest_offset(&source, distance * side.sign(), arc_tolerance);
    // Vorzeichenkonvention der Bibliothek an der tatsächlichen Lage prüfen
    if let Some(points) = &result {
        if side_of(polyline.points(), points) * side.sign() < 0.0 {
            result = longest_offset(&source, -distance * side.sign(), arc_tolerance);
        }
    }

    let Some(points) = result else {
        return Err(TrackError::OffsetFailed(format!(
            "Parallel-Offset um {distance} ergibt keine Kurve"
        )));
    };

    log::debug!(
        "Parallel-Offset: {} Quellpunkte, {} Ergebnispunkte",
        polyline.vertices().len(),
        points.len()
    );

    let built = if closed {
        PolyCurve::closed(points)
    } else {
        PolyCurve::open(points)
    };
    built.map_err(|e| TrackError::OffsetFailed(e.to_string()))
}

/// Längste Komponente des Offsets, Bögen bereits in Geraden aufgelöst.
fn longest_offset(source: &Polyline<f64>, offset: f64, arc_tolerance: f64) -> Option<Vec<DVec2>> {
    source
        .parallel_offset(offset)
        .into_iter()
        .filter_map(|pline| pline.arcs_to_approx_lines(arc_tolerance))
        .max_by(|a, b| a.path_length().total_cmp(&b.path_length()))
        .map(|pline| {
            pline
                .vertex_data
                .iter()
                .map(|v| DVec2::new(v.x, v.y))
                .collect::<Vec<_>>()
        })
        .filter(|points| points.len() >= 2)
}

/// Mittleres Vorzeichen (+1 links, −1 rechts) der Punkte relativ zur Quelle.
fn side_of(source: &[DVec2], points: &[DVec2]) -> f64 {
    let mut sum = 0.0;
    for &p in points {
        let nearest = source.windows(2).min_by(|a, b| {
            point_segment_distance(p, a[0], a[1]).total_cmp(&point_segment_distance(p, b[0], b[1]))
        });
        if let Some(edge) = nearest {
            sum += (edge[1] - edge[0]).perp_dot(p - edge[0]).signum();
        }
    }
    sum
}

/// Offset mit expliziter Strategie.
///
/// Die Parallelkurve arbeitet auf der Polylinien-Näherung der Kurve mit
/// `options.samples` Stützstellen.
pub fn offset<C: Curve + ?Sized>(
    curve: &C,
    distance: f64,
    side: OffsetSide,
    strategy: OffsetStrategy,
    options: &OffsetOptions,
) -> Result<PolyCurve> {
    match strategy {
        OffsetStrategy::NormalDisplacement => {
            offset_by_normals(curve, distance, side, options.samples)
        }
        OffsetStrategy::ParallelCurve => {
            require_positive("distance", distance)?;
            let polyline = curve.to_polyline(options.samples)?;
            offset_parallel(&polyline, distance, side, options.arc_tolerance)
        }
    }
}

/// Beide Seiten mit derselben Strategie.
pub fn offset_pair<C: Curve + ?Sized>(
    curve: &C,
    distance: f64,
    strategy: OffsetStrategy,
    options: &OffsetOptions,
) -> Result<OffsetPair> {
    Ok(OffsetPair {
        left: offset(curve, distance, OffsetSide::Left, strategy, options)?,
        right: offset(curve, distance, OffsetSide::Right, strategy, options)?,
    })
}
