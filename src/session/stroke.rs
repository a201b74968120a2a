//! Freihand-Strich als Mittellinie.

use glam::DVec2;
use track_boundary_engine::{sanitize_points, Closure, PolyCurve};

/// Zeichnet einen Freihand-Strich auf.
///
/// Gehört dem Aufrufer; es gibt keinen globalen Zeichenzustand.
/// Nicht-endliche Positionen werden ignoriert.
#[derive(Debug, Clone, Default)]
pub struct StrokeSession {
    points: Vec<DVec2>,
    active: bool,
}

impl StrokeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Beginnt einen neuen Strich; ein vorheriger wird verworfen.
    pub fn begin(&mut self, pos: DVec2) {
        self.points.clear();
        self.active = true;
        self.push(pos);
    }

    /// Hängt eine Position an, solange der Strich aktiv ist.
    pub fn extend(&mut self, pos: DVec2) {
        if self.active {
            self.push(pos);
        }
    }

    /// Beendet den Strich. Punkte bleiben erhalten.
    pub fn end(&mut self) {
        self.active = false;
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// Übergibt den Strich als Mittellinie an die Engine.
    pub fn into_centerline(self, closure: Closure) -> track_boundary_engine::Result<PolyCurve> {
        PolyCurve::from_closure(sanitize_points(&self.points), closure)
    }

    fn push(&mut self, pos: DVec2) {
        if !pos.is_finite() {
            log::debug!("Strich: nicht-endliche Position ignoriert");
            return;
        }
        // Mausereignisse ohne Bewegung
        if self.points.last() == Some(&pos) {
            return;
        }
        self.points.push(pos);
    }
}
