//! Pipelines vom Rohinput zur Markerliste.
//!
//! - [`synthesize`]: Mittellinie (Freihand-Strich oder Bild-Skelett) → beide Ränder → Marker
//! - [`trace_contours`]: Randkonturen direkt aus einem Konturextraktor → Marker
//! - [`reconstruct`]: erkannte Kegel + Fahrspur → beschriftete Marker und Randkurven

use crate::dedup::dedupe_by;
use crate::error::Result;
use crate::geometry::{moving_average, sanitize_points, Closure, CubicSpline, Curve, PolyCurve};
use crate::marker::{interleave, Marker, Side};
use crate::offset::{offset_pair, OffsetSide, OffsetStrategy};
use crate::orientation::{winding, Winding};
use crate::params::EngineParams;
use crate::sampling::sample_polyline_by_spacing;
use crate::segment::{build_curve, classify};
use crate::separation::{classify_sides, order_loop, Separation};
use glam::DVec2;

/// Ergebnis von [`synthesize`] und [`trace_contours`].
#[derive(Debug, Clone)]
pub struct TrackLayout {
    /// Marker in Erzeugungsreihenfolge, bereits ausgedünnt.
    pub markers: Vec<Marker>,
    pub outer: PolyCurve,
    /// Fehlt, wenn eine Kontur ohne Innenloch übergeben wurde.
    pub inner: Option<PolyCurve>,
    /// Nur bei geschlossenen Mittellinien bekannt.
    pub winding: Option<Winding>,
    /// Nur bei [`synthesize`] gesetzt.
    pub strategy: Option<OffsetStrategy>,
}

impl TrackLayout {
    pub fn count(&self, side: Side) -> usize {
        self.markers.iter().filter(|m| m.side == side).count()
    }
}

/// Ergebnis von [`reconstruct`].
#[derive(Debug, Clone)]
pub struct Reconstruction {
    /// Ein Marker je Erkennung, Position unverändert.
    pub markers: Vec<Marker>,
    pub separation: Separation,
    /// Periodischer Spline durch den geordneten Innenrand.
    pub inner_curve: Option<CubicSpline>,
    pub outer_curve: Option<CubicSpline>,
}

/// Erzeugt beide Ränder aus einer Mittellinie und setzt Marker im Abstand
/// `sample_spacing`.
pub fn synthesize(
    centerline: &[DVec2],
    closure: Closure,
    params: &EngineParams,
) -> Result<TrackLayout> {
    params.validate()?;
    let clean = sanitize_points(centerline);
    let polyline = PolyCurve::from_closure(clean, closure)?;

    let segments = classify(&polyline, &params.classifier)?;
    let curve = build_curve(&segments, polyline.is_closed(), params.smoothing_window)?;

    let (inner_side, detected) = if polyline.is_closed() {
        let w = winding(polyline.vertices())?;
        (w.inner_side(), Some(w))
    } else {
        log::info!("Offene Mittellinie: linke Seite gilt als innen");
        (OffsetSide::Left, None)
    };

    let strategy = params.offset_mode.resolve(curve.is_single_spline());
    log::debug!(
        "Synthese: {} Segmente, Strategie {:?}, innen {:?}",
        segments.len(),
        strategy,
        inner_side
    );

    let pair = offset_pair(&curve, params.half_width, strategy, &params.offset_options())?;
    let inner = pair.side(inner_side).clone();
    let outer = pair.side(inner_side.opposite()).clone();

    let markers = place_markers(&outer, Some(&inner), params)?;
    log::info!(
        "Synthese: {} Marker (Rand aussen {:.1}, innen {:.1})",
        markers.len(),
        outer.length(),
        inner.length()
    );

    Ok(TrackLayout {
        markers,
        outer,
        inner: Some(inner),
        winding: detected,
        strategy: Some(strategy),
    })
}

/// Setzt Marker auf direkt gegebene Randkonturen.
///
/// Jede Kontur wird klassifiziert, stückweise gefittet und mit
/// `line_samples` bzw. `spline_samples` Stützstellen je Stück abgetastet.
pub fn trace_contours(
    outer: &[DVec2],
    inner: Option<&[DVec2]>,
    params: &EngineParams,
) -> Result<TrackLayout> {
    params.validate()?;
    let outer_boundary = fit_contour(outer, params)?;
    let inner_boundary = inner.map(|c| fit_contour(c, params)).transpose()?;

    let markers = place_markers(&outer_boundary, inner_boundary.as_ref(), params)?;
    log::info!("Konturen: {} Marker", markers.len());

    Ok(TrackLayout {
        markers,
        winding: winding(outer_boundary.vertices()).ok(),
        outer: outer_boundary,
        inner: inner_boundary,
        strategy: None,
    })
}

fn fit_contour(contour: &[DVec2], params: &EngineParams) -> Result<PolyCurve> {
    let polyline = PolyCurve::closed(sanitize_points(contour))?;
    let segments = classify(&polyline, &params.classifier)?;
    let curve = build_curve(&segments, true, params.smoothing_window)?;
    curve.to_polyline_with(params.piece_samples())
}

/// Tastet beide Ränder ab, verzahnt aussen/innen und dünnt aus.
fn place_markers(
    outer: &PolyCurve,
    inner: Option<&PolyCurve>,
    params: &EngineParams,
) -> Result<Vec<Marker>> {
    let outer_points = sample_polyline_by_spacing(outer, params.sample_spacing)?;
    let inner_points = match inner {
        Some(ring) => sample_polyline_by_spacing(ring, params.sample_spacing)?,
        None => Vec::new(),
    };
    let markers = interleave(&outer_points, &inner_points);
    Ok(dedupe_by(&markers, params.min_marker_spacing, |m| m.position))
}

/// Beschriftet erkannte Kegel anhand der Fahrspur und fittet beide Ränder.
///
/// Vor dem Fit werden die geordneten Ränder mit `smoothing_window` geglättet.
/// Ein degenerierter Rand-Fit ist kein Fehler: die Kurve fehlt dann und
/// es wird gewarnt.
pub fn reconstruct(
    detections: &[DVec2],
    pose_trail: &[DVec2],
    params: &EngineParams,
) -> Result<Reconstruction> {
    let sides = classify_sides(detections, pose_trail)?;
    let markers: Vec<Marker> = detections
        .iter()
        .zip(&sides)
        .map(|(&p, &side)| Marker::new(side, p))
        .collect();

    let mut separation = Separation::default();
    for m in &markers {
        match m.side {
            Side::Inner => separation.inner.push(m.position),
            Side::Outer => separation.outer.push(m.position),
        }
    }

    let inner_curve = fit_boundary(&separation.inner, Side::Inner, params.smoothing_window);
    let outer_curve = fit_boundary(&separation.outer, Side::Outer, params.smoothing_window);
    log::info!(
        "Rekonstruktion: {} innen, {} aussen",
        separation.inner.len(),
        separation.outer.len()
    );

    Ok(Reconstruction {
        markers,
        separation,
        inner_curve,
        outer_curve,
    })
}

fn fit_boundary(points: &[DVec2], side: Side, smoothing_window: usize) -> Option<CubicSpline> {
    if points.len() < 3 {
        return None;
    }
    let ordered = sanitize_points(&order_loop(points));
    let smoothed = moving_average(&ordered, smoothing_window, true);
    match CubicSpline::fit(&smoothed, true) {
        Ok(spline) => Some(spline),
        Err(e) => {
            log::warn!("Rand {:?} nicht fitbar: {}", side, e);
            None
        }
    }
}
