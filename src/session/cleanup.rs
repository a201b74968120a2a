//! Manuelle Bereinigung einer Kegelliste: Kegel markieren, dann entfernen.

use indexmap::IndexSet;
use std::path::{Path, PathBuf};
use track_boundary_engine::SpatialIndex;

use crate::formats::{ConeFile, ConeRecord};
use glam::DVec2;

/// Löschmarkierungen über einer Kegelliste.
///
/// Markierungen werden in Klick-Reihenfolge gehalten; die Liste selbst
/// bleibt bis [`CleanupSession::apply`] unverändert.
#[derive(Debug)]
pub struct CleanupSession {
    cones: Vec<ConeRecord>,
    marked: IndexSet<usize>,
    index: SpatialIndex,
}

impl CleanupSession {
    pub fn new(file: ConeFile) -> Self {
        let positions: Vec<DVec2> = file.cones.iter().map(ConeRecord::position).collect();
        Self {
            index: SpatialIndex::from_points(&positions),
            cones: file.cones,
            marked: IndexSet::new(),
        }
    }

    pub fn cones(&self) -> &[ConeRecord] {
        &self.cones
    }

    /// Markiert bzw. entmarkiert einen Kegel. Gibt den neuen Zustand zurück;
    /// ungültige Indizes werden ignoriert.
    pub fn toggle(&mut self, index: usize) -> bool {
        if index >= self.cones.len() {
            return false;
        }
        if self.marked.shift_remove(&index) {
            false
        } else {
            self.marked.insert(index);
            true
        }
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.marked.contains(&index)
    }

    /// Markierte Indizes in Klick-Reihenfolge.
    pub fn marked(&self) -> impl Iterator<Item = usize> + '_ {
        self.marked.iter().copied()
    }

    pub fn marked_count(&self) -> usize {
        self.marked.len()
    }

    /// Nächster Kegel zu `pos` innerhalb von `max_distance`.
    pub fn pick_nearest(&self, pos: DVec2, max_distance: f64) -> Option<usize> {
        self.index
            .nearest(pos)
            .filter(|hit| hit.distance <= max_distance)
            .map(|hit| hit.index)
    }

    /// Klick auf die Karte: schaltet den nächsten Kegel um.
    pub fn toggle_nearest(&mut self, pos: DVec2, max_distance: f64) -> Option<usize> {
        let index = self.pick_nearest(pos, max_distance)?;
        self.toggle(index);
        Some(index)
    }

    /// Entfernt alle markierten Kegel; Reihenfolge der übrigen bleibt erhalten.
    pub fn apply(self) -> ConeFile {
        let removed = self.marked.len();
        let cones: Vec<ConeRecord> = self
            .cones
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !self.marked.contains(i))
            .map(|(_, cone)| cone)
            .collect();
        log::info!("{} Kegel entfernt, {} verbleiben", removed, cones.len());
        ConeFile { cones }
    }
}

/// Zielpfad der bereinigten Datei: `<stem>_updated.<ext>` im selben Ordner.
pub fn updated_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cones".to_string());
    let file_name = match path.extension() {
        Some(ext) => format!("{}_updated.{}", stem, ext.to_string_lossy()),
        None => format!("{}_updated", stem),
    };
    path.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> CleanupSession {
        let cones = (0..5)
            .map(|i| ConeRecord {
                color: if i % 2 == 0 { "yellow" } else { "blue" }.to_string(),
                x: i as f64 * 3.0,
                y: 0.0,
            })
            .collect();
        CleanupSession::new(ConeFile { cones })
    }

    #[test]
    fn toggle_marks_and_unmarks() {
        let mut s = session();
        assert!(s.toggle(2));
        assert!(s.is_marked(2));
        assert!(!s.toggle(2));
        assert!(!s.is_marked(2));
        assert!(!s.toggle(99));
        assert_eq!(s.marked_count(), 0);
    }

    #[test]
    fn pick_respects_max_distance() {
        let s = session();
        assert_eq!(s.pick_nearest(DVec2::new(6.4, 0.5), 1.0), Some(2));
        assert_eq!(s.pick_nearest(DVec2::new(7.5, 5.0), 1.0), None);
    }

    #[test]
    fn apply_keeps_order_of_remaining() {
        let mut s = session();
        s.toggle_nearest(DVec2::new(12.0, 0.0), 0.5);
        s.toggle(1);
        assert_eq!(s.marked().collect::<Vec<_>>(), vec![4, 1]);
        let file = s.apply();
        let xs: Vec<f64> = file.cones.iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![0.0, 6.0, 9.0]);
    }

    #[test]
    fn updated_path_keeps_extension() {
        assert_eq!(
            updated_path(Path::new("out/track.v2.yaml")),
            PathBuf::from("out/track.v2_updated.yaml")
        );
        assert_eq!(updated_path(Path::new("cones")), PathBuf::from("cones_updated"));
    }
}
