//! Fehlertypen der Engine.

use thiserror::Error;

/// Ergebnis-Alias für alle Engine-Operationen.
pub type Result<T> = std::result::Result<T, TrackError>;

/// Fehlerarten der Streckenrand-Engine.
///
/// Keine Variante wird intern durch Ersatz-Geometrie aufgefangen: der Aufrufer
/// entscheidet, ob er überspringt, die Rohpunkte übernimmt oder abbricht.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackError {
    /// Zu wenige, doppelte oder nicht-endliche Punkte, Null-Länge oder Null-Fläche.
    #[error("degenerierte Eingabe: {0}")]
    DegenerateInput(String),
    /// Parallel-Offset leer oder nicht rekonstruierbar.
    #[error("Offset fehlgeschlagen: {0}")]
    OffsetFailed(String),
    /// Noch nicht genug Daten (z.B. Live-Update mit wenigen Detektionen).
    #[error("zu wenige Daten: {needed} benötigt, {found} vorhanden")]
    InsufficientData { needed: usize, found: usize },
    /// Ungültiger Parameter (negativ, NaN, unendlich).
    #[error("ungültiger Parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

impl TrackError {
    /// Hilfskonstruktor für `DegenerateInput`.
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateInput(reason.into())
    }

    /// `true` für Zustände, die im Live-Betrieb als vorübergehend gelten.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}

/// Prüft, dass ein Längen-Parameter endlich und strikt positiv ist.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(TrackError::InvalidParameter { name, value })
    }
}
