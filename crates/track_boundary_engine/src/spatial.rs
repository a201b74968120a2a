//! Spatial-Index (KD-Tree) für Nachbarschaftsabfragen auf Kegelpositionen.

use glam::DVec2;
use kiddo::{KdTree, SquaredEuclidean};

/// Ergebnis einer Distanzabfrage gegen den Spatial-Index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialMatch {
    /// Index des Punkts in der Eingabeliste
    pub index: usize,
    /// Euklidische Distanz zum Suchpunkt
    pub distance: f64,
}

/// Read-only Spatial-Index über einer Punktliste.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    tree: KdTree<f64, 2>,
    len: usize,
}

impl SpatialIndex {
    /// Baut einen Index; das Item jedes Eintrags ist sein Listenindex.
    pub fn from_points(points: &[DVec2]) -> Self {
        let entries: Vec<[f64; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
        let tree: KdTree<f64, 2> = (&entries).into();
        Self {
            tree,
            len: points.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Nächster Punkt zur Query-Position.
    pub fn nearest(&self, query: DVec2) -> Option<SpatialMatch> {
        if self.is_empty() {
            return None;
        }
        let result = self.tree.nearest_one::<SquaredEuclidean>(&[query.x, query.y]);
        Some(SpatialMatch {
            index: result.item as usize,
            distance: result.distance.sqrt(),
        })
    }

    /// Alle Punkte innerhalb `radius`, aufsteigend nach Distanz.
    pub fn within_radius(&self, query: DVec2, radius: f64) -> Vec<SpatialMatch> {
        if self.is_empty() || radius.is_nan() || radius < 0.0 {
            return Vec::new();
        }
        let mut results: Vec<SpatialMatch> = self
            .tree
            .within::<SquaredEuclidean>(&[query.x, query.y], radius * radius)
            .into_iter()
            .map(|entry| SpatialMatch {
                index: entry.item as usize,
                distance: entry.distance.sqrt(),
            })
            .collect();
        results.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.index.cmp(&b.index)));
        results
    }
}
