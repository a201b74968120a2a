//! Parameter der Pipelines.
//!
//! `EngineParams` bündelt alle Stellschrauben; die `const`-Werte dienen als Default.

use crate::error::{require_positive, Result};
use crate::geometry::PieceSamples;
use crate::offset::{OffsetMode, OffsetOptions};
use crate::segment::ClassifierParams;
use serde::{Deserialize, Serialize};

// ── Strecke ─────────────────────────────────────────────────────────

/// Abstand Mittellinie → Rand (Welteinheiten).
pub const HALF_WIDTH: f64 = 1.5;
/// Abstand aufeinanderfolgender Marker entlang eines Randes.
pub const SAMPLE_SPACING: f64 = 5.0;
/// Mindestabstand zweier beliebiger Marker nach dem Ausdünnen.
pub const MIN_MARKER_SPACING: f64 = 2.0;
/// Lücke Ende → Start, unter der ein Strich als geschlossen gilt.
pub const CLOSURE_THRESHOLD: f64 = 10.0;

// ── Abtastung ───────────────────────────────────────────────────────

/// Dichte Abtastung für die Bogenlängen-Tabelle.
pub const DENSE_SAMPLES: usize = 1000;
/// Stützstellen je Geraden-Stück bei Konturen.
pub const LINE_SAMPLES: usize = 20;
/// Stützstellen je Spline-Stück bei Konturen.
pub const SPLINE_SAMPLES: usize = 30;

// ── Offset ──────────────────────────────────────────────────────────

/// Sehnenfehler beim Auflösen runder Offset-Ecken.
pub const ARC_TOLERANCE: f64 = 0.01;

/// Alle Parameter eines Pipeline-Laufs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    pub classifier: ClassifierParams,
    pub half_width: f64,
    pub sample_spacing: f64,
    pub min_marker_spacing: f64,
    pub closure_threshold: f64,
    pub dense_samples: usize,
    /// Fenster des gleitenden Mittels vor dem Spline-Fit (≤ 1: exakte Interpolation).
    pub smoothing_window: usize,
    pub arc_tolerance: f64,
    pub offset_mode: OffsetMode,
    pub line_samples: usize,
    pub spline_samples: usize,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            classifier: ClassifierParams::default(),
            half_width: HALF_WIDTH,
            sample_spacing: SAMPLE_SPACING,
            min_marker_spacing: MIN_MARKER_SPACING,
            closure_threshold: CLOSURE_THRESHOLD,
            dense_samples: DENSE_SAMPLES,
            smoothing_window: 0,
            arc_tolerance: ARC_TOLERANCE,
            offset_mode: OffsetMode::Auto,
            line_samples: LINE_SAMPLES,
            spline_samples: SPLINE_SAMPLES,
        }
    }
}

impl EngineParams {
    /// Prüft die Längen-Parameter vor einem Lauf.
    pub fn validate(&self) -> Result<()> {
        require_positive("half_width", self.half_width)?;
        require_positive("sample_spacing", self.sample_spacing)?;
        require_positive("arc_tolerance", self.arc_tolerance)?;
        Ok(())
    }

    pub fn offset_options(&self) -> OffsetOptions {
        OffsetOptions {
            samples: self.dense_samples,
            arc_tolerance: self.arc_tolerance,
        }
    }

    pub fn piece_samples(&self) -> PieceSamples {
        PieceSamples {
            line: self.line_samples,
            spline: self.spline_samples,
        }
    }
}
