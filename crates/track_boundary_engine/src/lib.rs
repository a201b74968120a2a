//! Streckenrand-Engine: modelliert Mittellinien und Ränder als Kurven und
//! setzt beschriftete Marker (Kegel) entlang beider Ränder.
//!
//! Reine Berechnung ohne Datei-I/O und ohne geteilten Zustand. Alle Typen
//! sind nach der Konstruktion unveränderlich.

pub mod dedup;
pub mod error;
pub mod geometry;
pub mod marker;
pub mod offset;
pub mod orientation;
pub mod params;
pub mod pipeline;
pub mod sampling;
pub mod segment;
pub mod separation;
pub mod spatial;

pub use dedup::{dedupe, dedupe_by};
pub use error::{Result, TrackError};
pub use geometry::{
    fit, fit_into_area, sanitize_points, scale_to_length, scale_uniform, shift_non_negative,
    AreaFit, Closure, CompositeCurve, CubicSpline, Curve, FittedCurve, LineFit, PieceSamples,
    PolyCurve,
};
pub use marker::{interleave, Marker, Side};
pub use offset::{
    offset, offset_by_normals, offset_pair, offset_parallel, OffsetMode, OffsetOptions,
    OffsetPair, OffsetSide, OffsetStrategy,
};
pub use orientation::{signed_area, winding, Winding};
pub use params::EngineParams;
pub use pipeline::{reconstruct, synthesize, trace_contours, Reconstruction, TrackLayout};
pub use sampling::{sample_by_spacing, sample_polyline_by_spacing, ArcLengthTable};
pub use segment::{build_curve, classify, ClassifierParams, Segment, SegmentKind};
pub use separation::{order_loop, separate, Separation};
pub use spatial::{SpatialIndex, SpatialMatch};
